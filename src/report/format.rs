//! Plain-text formatting of a rendered report.
//!
//! We keep formatting code in one place so the report rules stay free of
//! presentation concerns and output changes are localized.

use crate::chart::{ChartKind, ChartSpec};
use crate::report::ReportOutput;

/// Format the whole output container for terminal printing.
pub fn format_report(output: &ReportOutput) -> String {
    match output {
        ReportOutput::Empty => "No report selected.\n".to_string(),
        ReportOutput::Alert(alert) => format!("!! {}\n", alert.message),
        ReportOutput::Charts(rows) => {
            let mut out = String::new();
            for (row_idx, row) in rows.iter().enumerate() {
                for (col_idx, chart) in row.charts.iter().enumerate() {
                    out.push_str(&format!("[{}.{}] ", row_idx + 1, col_idx + 1));
                    out.push_str(&format_chart(chart));
                    out.push('\n');
                }
            }
            out
        }
    }
}

/// Format one chart as a title line plus an aligned value table.
pub fn format_chart(chart: &ChartSpec) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} ({})\n", chart.title, kind_label(chart.kind)));

    let x_header = match &chart.color_field {
        Some(color) => format!("{} / {}", chart.x_field, color),
        None => chart.x_field.clone(),
    };

    let labels: Vec<String> = chart
        .data
        .iter()
        .map(|d| match &d.group {
            Some(group) => format!("{} / {}", d.x, group),
            None => d.x.to_string(),
        })
        .collect();

    let width = labels
        .iter()
        .map(|l| l.chars().count())
        .chain(std::iter::once(x_header.chars().count()))
        .max()
        .unwrap_or(0);

    out.push_str(&format!("  {x_header:<width$}  {}\n", chart.y_field));

    let total = chart.total();
    for (label, datum) in labels.iter().zip(&chart.data) {
        if chart.kind == ChartKind::Pie && total > 0.0 {
            out.push_str(&format!(
                "  {label:<width$}  {:>14.2}  ({:>5.1}%)\n",
                datum.value,
                datum.value / total * 100.0
            ));
        } else {
            out.push_str(&format!("  {label:<width$}  {:>14.2}\n", datum.value));
        }
    }

    out
}

fn kind_label(kind: ChartKind) -> &'static str {
    match kind {
        ChartKind::Line => "line",
        ChartKind::Bar => "bar",
        ChartKind::Pie => "pie",
        ChartKind::GroupedBar => "grouped bar",
    }
}

/// Format the year dropdown options, one per line.
pub fn format_years(years: &[i32]) -> String {
    let mut out = String::new();
    for year in years {
        out.push_str(&format!("{year}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::{record, table};
    use crate::domain::ReportMode;
    use crate::report::render_report;

    #[test]
    fn formats_pie_shares() {
        let t = table(vec![
            record(1980, "Jan", 1, "Sedan", 100.0, 75.0, 5.0),
            record(1980, "Feb", 1, "Truck", 100.0, 25.0, 5.0),
        ]);
        let output = render_report(&t, 1980, Some(ReportMode::Recession)).unwrap();
        let text = format_report(&output);

        assert!(text.contains("[2.1] Total Expenditure by Vehicle Type During the Recession of 1980 (pie)"));
        assert!(text.contains("75.0%"));
        assert!(text.contains("Unemployment Rate / Vehicle Type"));
    }

    #[test]
    fn formats_alert_and_empty() {
        let t = table(vec![record(1980, "Jan", 1, "Sedan", 100.0, 75.0, 5.0)]);
        let alert = render_report(&t, 1980, Some(ReportMode::Recession)).unwrap();
        assert!(format_report(&alert).starts_with("!! Attention!"));
        assert_eq!(format_report(&ReportOutput::Empty), "No report selected.\n");
    }

    #[test]
    fn formats_years_one_per_line() {
        assert_eq!(format_years(&[1980, 1981]), "1980\n1981\n");
    }
}
