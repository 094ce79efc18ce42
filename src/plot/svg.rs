//! SVG rendering of chart descriptions (HTTP page and file exports).

use plotters::prelude::*;

use crate::chart::ChartSpec;
use crate::error::AppError;
use crate::plot::{Theme, draw_chart};

/// Render `spec` into a standalone SVG document.
pub fn render_svg(spec: &ChartSpec, width: u32, height: u32) -> Result<String, AppError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (width, height)).into_drawing_area();
        draw_chart(&root, spec, &Theme::light())
            .map_err(|e| AppError::new(4, format!("Failed to draw chart '{}': {e}", spec.title)))?;
        root.present()
            .map_err(|e| AppError::new(4, format!("Failed to finish SVG '{}': {e}", spec.title)))?;
    }
    Ok(svg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::{record, table};
    use crate::domain::ReportMode;
    use crate::report::render_report;

    #[test]
    fn renders_every_chart_kind() {
        let t = table(vec![
            record(1980, "Jan", 1, "Sedan", 100.0, 10.0, 5.0),
            record(1980, "Feb", 1, "Truck", 200.0, 30.0, 6.0),
        ]);
        let output = render_report(&t, 1980, Some(ReportMode::Recession)).unwrap();

        for chart in output.charts() {
            let svg = render_svg(chart, 480, 320).unwrap();
            assert!(svg.starts_with("<svg"), "unexpected prefix for {}", chart.title);
            assert!(svg.contains("</svg>"));
        }
    }

    #[test]
    fn empty_pie_still_renders() {
        let t = table(vec![
            record(1980, "Jan", 1, "Sedan", 100.0, 0.0, 5.0),
            record(1980, "Feb", 1, "Truck", 200.0, 0.0, 6.0),
        ]);
        let output = render_report(&t, 1980, Some(ReportMode::Recession)).unwrap();
        let pie = output.charts().nth(2).unwrap();
        assert!(render_svg(pie, 200, 200).is_ok());
    }
}
