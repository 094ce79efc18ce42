//! Export a rendered report to disk.
//!
//! The export is meant to be easy to consume downstream:
//! - `report.json`: the output container exactly as the JSON API serves it
//! - one SVG per chart, named by grid position and title

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use crate::error::AppError;
use crate::plot::render_svg;
use crate::report::ReportOutput;

pub const SVG_WIDTH: u32 = 800;
pub const SVG_HEIGHT: u32 = 500;

/// Write the report JSON plus chart SVGs into `dir` (created if needed).
///
/// Returns the paths written, JSON first.
pub fn export_report(dir: &Path, output: &ReportOutput) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(dir)
        .map_err(|e| AppError::new(2, format!("Failed to create export dir '{}': {e}", dir.display())))?;

    let mut written = Vec::new();

    let json_path = dir.join("report.json");
    write_report_json(&json_path, output)?;
    written.push(json_path);

    if let ReportOutput::Charts(rows) = output {
        for (row_idx, row) in rows.iter().enumerate() {
            for (col_idx, chart) in row.charts.iter().enumerate() {
                let name = format!("chart_{}_{}_{}.svg", row_idx + 1, col_idx + 1, slug(&chart.title));
                let path = dir.join(name);
                let svg = render_svg(chart, SVG_WIDTH, SVG_HEIGHT)?;
                std::fs::write(&path, svg).map_err(|e| {
                    AppError::new(2, format!("Failed to write SVG '{}': {e}", path.display()))
                })?;
                written.push(path);
            }
        }
    }

    tracing::info!(dir = %dir.display(), files = written.len(), "report exported");
    Ok(written)
}

/// Write the output container as pretty JSON.
pub fn write_report_json(path: &Path, output: &ReportOutput) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create report JSON '{}': {e}", path.display())))?;

    serde_json::to_writer_pretty(file, output)
        .map_err(|e| AppError::new(2, format!("Failed to write report JSON: {e}")))?;

    Ok(())
}

/// Lower-case ASCII slug for file names.
fn slug(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    out.trim_end_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::{record, table};
    use crate::domain::ReportMode;
    use crate::report::render_report;

    #[test]
    fn slugs_titles() {
        assert_eq!(
            slug("Average Vehicle Sales by Type in Recession of 1980"),
            "average_vehicle_sales_by_type_in_recession_of_1980"
        );
        assert_eq!(slug("Trend (1980 - 2023)"), "trend_1980_2023");
    }

    #[test]
    fn exports_json_and_one_svg_per_chart() {
        let dir = tempfile::tempdir().unwrap();
        let t = table(vec![
            record(1980, "Jan", 1, "Sedan", 100.0, 10.0, 5.0),
            record(1980, "Feb", 1, "Truck", 200.0, 30.0, 6.0),
        ]);
        let output = render_report(&t, 1980, Some(ReportMode::Recession)).unwrap();

        let files = export_report(dir.path(), &output).unwrap();

        assert_eq!(files.len(), 5);
        assert!(files[0].ends_with("report.json"));
        assert!(files[1].file_name().unwrap().to_string_lossy().starts_with("chart_1_1_"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&files[0]).unwrap()).unwrap();
        assert_eq!(json["type"], "charts");
        assert_eq!(json["content"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn alert_exports_json_only() {
        let dir = tempfile::tempdir().unwrap();
        let t = table(vec![record(1980, "Jan", 1, "Sedan", 100.0, 10.0, 5.0)]);
        let output = render_report(&t, 1980, Some(ReportMode::Recession)).unwrap();

        let files = export_report(&dir.path().join("nested"), &output).unwrap();
        assert_eq!(files.len(), 1);
    }
}
