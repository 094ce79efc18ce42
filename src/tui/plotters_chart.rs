//! Plotters-powered chart widget for Ratatui.
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`, sharing the drawing code with the SVG export.

use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::chart::ChartSpec;
use crate::plot::{Theme, draw_chart};

/// Render-only wrapper around a chart description.
pub struct ChartWidget<'a> {
    pub spec: &'a ChartSpec,
}

impl Widget for ChartWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a chart.
        // In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let spec = self.spec;
        let widget = widget_fn(move |root| {
            draw_chart(&root, spec, &Theme::terminal())?;
            Ok(())
        });

        widget.render(area, buf);
    }
}
