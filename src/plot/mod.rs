//! Plotters drawing of `ChartSpec`s.
//!
//! Drawing is generic over the Plotters backend so the same code paints into
//! the terminal buffer (`plotters-ratatui-backend`) and into SVG strings.
//! Categorical axes are laid out on integer positions `0..n`; tick labels are
//! mapped back to category names by the label formatter.

use std::f64::consts::{FRAC_PI_2, TAU};
use std::ops::Range;

use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

use crate::chart::{BarGaps, ChartKind, ChartSpec};

pub mod svg;

pub use svg::render_svg;

/// Series palette (plotly-like qualitative colors).
pub const PALETTE: [RGBColor; 10] = [
    RGBColor(99, 110, 250),
    RGBColor(239, 85, 59),
    RGBColor(0, 204, 150),
    RGBColor(171, 99, 250),
    RGBColor(255, 161, 90),
    RGBColor(25, 211, 243),
    RGBColor(255, 102, 146),
    RGBColor(182, 232, 128),
    RGBColor(255, 151, 255),
    RGBColor(254, 203, 82),
];

pub fn palette(index: usize) -> RGBColor {
    PALETTE[index % PALETTE.len()]
}

/// Backend-dependent styling.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub foreground: RGBColor,
    pub background: Option<RGBColor>,
    /// Draw the chart title inside the drawing area.
    pub caption: bool,
    pub caption_size: f64,
    pub label_size: f64,
    pub margin: u32,
    pub x_label_area: u32,
    pub y_label_area: u32,
    pub max_x_labels: usize,
}

impl Theme {
    /// Terminal cells are low-res: compact label areas, no caption (the
    /// surrounding block carries the title).
    pub fn terminal() -> Self {
        Self {
            foreground: WHITE,
            background: None,
            caption: false,
            caption_size: 10.0,
            label_size: 10.0,
            margin: 1,
            x_label_area: 3,
            y_label_area: 8,
            max_x_labels: 6,
        }
    }

    pub fn light() -> Self {
        Self {
            foreground: RGBColor(42, 63, 95),
            background: Some(WHITE),
            caption: true,
            caption_size: 17.0,
            label_size: 12.0,
            margin: 12,
            x_label_area: 40,
            y_label_area: 60,
            max_x_labels: 12,
        }
    }
}

type Chart2d<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;
type DrawResult<DB> = Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// Draw one chart into `root`.
pub fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    theme: &Theme,
) -> DrawResult<DB> {
    if let Some(bg) = theme.background {
        root.fill(&bg)?;
    }

    match spec.kind {
        ChartKind::Line => draw_line(root, spec, theme),
        ChartKind::Bar => draw_bars(root, spec, theme),
        ChartKind::GroupedBar => draw_grouped_bars(root, spec, theme),
        ChartKind::Pie => draw_pie(root, spec, theme),
    }
}

fn build_chart<'a, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    theme: &Theme,
    x: Range<f64>,
    y: Range<f64>,
    axes: bool,
) -> Result<Chart2d<'a, DB>, DrawingAreaErrorKind<DB::ErrorType>> {
    let mut builder = ChartBuilder::on(root);
    builder.margin(theme.margin);
    if axes {
        builder
            .set_label_area_size(LabelAreaPosition::Left, theme.y_label_area)
            .set_label_area_size(LabelAreaPosition::Bottom, theme.x_label_area);
    }
    if theme.caption {
        builder.caption(
            spec.title.as_str(),
            ("sans-serif", theme.caption_size)
                .into_font()
                .color(&theme.foreground),
        );
    }
    builder.build_cartesian_2d(x, y)
}

fn draw_axes<DB: DrawingBackend>(
    chart: &mut Chart2d<'_, DB>,
    spec: &ChartSpec,
    theme: &Theme,
    categories: &[String],
) -> DrawResult<DB> {
    let fmt_x = |v: &f64| category_label(categories, *v);
    let fmt_y = |v: &f64| format_tick(*v);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(spec.x_field.as_str())
        .y_desc(spec.y_field.as_str())
        .x_labels(categories.len().clamp(1, theme.max_x_labels))
        .y_labels(5)
        .x_label_formatter(&fmt_x)
        .y_label_formatter(&fmt_y)
        .label_style(("sans-serif", theme.label_size).into_font().color(&theme.foreground))
        .axis_desc_style(("sans-serif", theme.label_size).into_font().color(&theme.foreground))
        .axis_style(&theme.foreground)
        .bold_line_style(&theme.foreground)
        .draw()
}

fn draw_line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    theme: &Theme,
) -> DrawResult<DB> {
    let categories = spec.categories();
    let values: Vec<f64> = spec.data.iter().map(|d| d.value).collect();
    let y = value_bounds(&values, false);

    let mut chart = build_chart(root, spec, theme, category_range(categories.len()), y, true)?;
    draw_axes(&mut chart, spec, theme, &categories)?;

    let color = palette(0);
    let points = values.iter().enumerate().map(|(i, v)| (i as f64, *v));
    chart.draw_series(LineSeries::new(points.clone(), &color))?;
    chart.draw_series(points.map(|p| Pixel::new(p, color)))?;
    Ok(())
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    theme: &Theme,
) -> DrawResult<DB> {
    let categories = spec.categories();
    let values: Vec<f64> = spec.data.iter().map(|d| d.value).collect();
    let y = value_bounds(&values, true);
    let gaps = spec.gaps.unwrap_or_default();
    let half = (1.0 - gaps.bar_gap).clamp(0.05, 1.0) / 2.0;

    let mut chart = build_chart(root, spec, theme, category_range(categories.len()), y, true)?;
    draw_axes(&mut chart, spec, theme, &categories)?;

    let style = palette(0).filled();
    chart.draw_series(values.iter().enumerate().map(|(i, v)| {
        let x = i as f64;
        Rectangle::new([(x - half, 0.0), (x + half, *v)], style)
    }))?;
    Ok(())
}

fn draw_grouped_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    theme: &Theme,
) -> DrawResult<DB> {
    let categories = spec.categories();
    let groups = spec.groups();
    let values: Vec<f64> = spec.data.iter().map(|d| d.value).collect();
    let y = value_bounds(&values, true);
    let gaps = spec.gaps.unwrap_or_default();

    let mut chart = build_chart(root, spec, theme, category_range(categories.len()), y, true)?;
    draw_axes(&mut chart, spec, theme, &categories)?;

    let bars = spec.data.iter().filter_map(|d| {
        let slot = categories.iter().position(|c| *c == d.x.to_string())?;
        let group = d
            .group
            .as_ref()
            .and_then(|g| groups.iter().position(|name| *name == g.to_string()))
            .unwrap_or(0);
        let (x0, x1) = grouped_bar_span(slot, group, groups.len().max(1), gaps);
        Some(Rectangle::new([(x0, 0.0), (x1, d.value)], palette(group).filled()))
    });
    chart.draw_series(bars)?;
    Ok(())
}

fn draw_pie<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    spec: &ChartSpec,
    theme: &Theme,
) -> DrawResult<DB> {
    let mut chart = build_chart(root, spec, theme, -1.1..1.1, -1.1..1.1, false)?;

    let wedges = pie_wedges(&spec.data.iter().map(|d| d.value).collect::<Vec<_>>());
    chart.draw_series(
        wedges
            .into_iter()
            .map(|(idx, points)| Polygon::new(points, palette(idx).filled())),
    )?;
    Ok(())
}

/// `[-0.5, n - 0.5]` so each category sits centered on its integer slot.
fn category_range(n: usize) -> Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

/// Tick label for a categorical axis: the category at an integer position, blank otherwise.
fn category_label(categories: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    categories.get(idx as usize).cloned().unwrap_or_default()
}

fn format_tick(v: f64) -> String {
    if v.abs() >= 10_000.0 {
        format!("{:.0}k", v / 1000.0)
    } else if v.abs() >= 100.0 || v == v.trunc() {
        format!("{v:.0}")
    } else {
        format!("{v:.2}")
    }
}

/// Padded value bounds; bar charts always include zero.
pub fn value_bounds(values: &[f64], include_zero: bool) -> Range<f64> {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for &v in values.iter().filter(|v| v.is_finite()) {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if include_zero {
        lo = lo.min(0.0);
        hi = hi.max(0.0);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return 0.0..1.0;
    }
    if hi <= lo {
        let pad = (hi.abs() * 0.1).max(1.0);
        return (lo - pad)..(hi + pad);
    }

    let pad = (hi - lo) * 0.05;
    let lo = if include_zero && lo >= 0.0 { 0.0 } else { lo - pad };
    lo..(hi + pad)
}

/// Horizontal extent of one bar inside a category slot.
///
/// The slot keeps `bar_gap` free between categories; each of the `n_groups`
/// bars then keeps `group_gap` of its share free.
pub fn grouped_bar_span(slot: usize, group: usize, n_groups: usize, gaps: BarGaps) -> (f64, f64) {
    let slot_width = (1.0 - gaps.bar_gap).clamp(0.05, 1.0);
    let share = slot_width / n_groups as f64;
    let bar_width = share * (1.0 - gaps.group_gap).clamp(0.05, 1.0);

    let left = slot as f64 - slot_width / 2.0 + share * group as f64 + (share - bar_width) / 2.0;
    (left, left + bar_width)
}

/// Unit-circle wedges, clockwise from 12 o'clock, tagged with the datum index.
///
/// Non-positive values get no wedge.
pub fn pie_wedges(values: &[f64]) -> Vec<(usize, Vec<(f64, f64)>)> {
    let total: f64 = values.iter().filter(|v| **v > 0.0 && v.is_finite()).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut out = Vec::new();
    let mut start = FRAC_PI_2;
    for (idx, &v) in values.iter().enumerate() {
        if !(v > 0.0 && v.is_finite()) {
            continue;
        }
        let sweep = v / total * TAU;
        let steps = ((sweep / TAU) * 72.0).ceil().max(2.0) as usize;

        let mut points = Vec::with_capacity(steps + 2);
        points.push((0.0, 0.0));
        for s in 0..=steps {
            let angle = start - sweep * s as f64 / steps as f64;
            points.push((angle.cos(), angle.sin()));
        }
        out.push((idx, points));
        start -= sweep;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_integer_ticks() {
        let cats = vec!["Jan".to_string(), "Feb".to_string()];
        assert_eq!(category_label(&cats, 0.0), "Jan");
        assert_eq!(category_label(&cats, 1.0), "Feb");
        assert_eq!(category_label(&cats, 0.5), "");
        assert_eq!(category_label(&cats, 2.0), "");
        assert_eq!(category_label(&cats, -1.0), "");
    }

    #[test]
    fn bar_bounds_include_zero() {
        let r = value_bounds(&[10.0, 20.0], true);
        assert_eq!(r.start, 0.0);
        assert!(r.end > 20.0);

        let r = value_bounds(&[10.0, 20.0], false);
        assert!(r.start < 10.0 && r.start > 0.0);
    }

    #[test]
    fn degenerate_bounds_are_widened() {
        let r = value_bounds(&[5.0], false);
        assert!(r.start < 5.0 && r.end > 5.0);
        assert_eq!(value_bounds(&[], false), 0.0..1.0);
    }

    #[test]
    fn grouped_bars_stay_inside_their_slot() {
        let gaps = BarGaps {
            bar_gap: 0.02,
            group_gap: 0.1,
        };
        let (l0, r0) = grouped_bar_span(3, 0, 2, gaps);
        let (l1, r1) = grouped_bar_span(3, 1, 2, gaps);

        assert!(l0 >= 3.0 - 0.5 && r1 <= 3.0 + 0.5);
        assert!(r0 < l1);
        assert!(((r0 - l0) - (r1 - l1)).abs() < 1e-12);
    }

    #[test]
    fn pie_wedges_cover_the_circle() {
        let wedges = pie_wedges(&[3.0, 0.0, 1.0]);
        assert_eq!(wedges.len(), 2);
        assert_eq!(wedges[0].0, 0);
        assert_eq!(wedges[1].0, 2);

        // First wedge starts at 12 o'clock; the last ends back there.
        let first = &wedges[0].1;
        assert!((first[1].0).abs() < 1e-9 && (first[1].1 - 1.0).abs() < 1e-9);
        let last = wedges[1].1.last().unwrap();
        assert!((last.0).abs() < 1e-9 && (last.1 - 1.0).abs() < 1e-9);

        assert!(pie_wedges(&[0.0, -1.0]).is_empty());
    }
}
