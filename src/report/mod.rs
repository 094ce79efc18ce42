//! Report rules: year-selector enablement and the per-mode chart sets.
//!
//! Both rules are pure functions of the table and the current control values,
//! so every front-end (terminal, HTTP, CLI) shares them unchanged.

use serde::Serialize;

use crate::aggregate::{mean_by, sum_by};
use crate::chart::{BarGaps, ChartSpec};
use crate::data::SalesTable;
use crate::domain::{Column, ReportMode, SalesRecord};
use crate::error::AppError;

pub mod format;

pub use format::{format_report, format_years};

/// Fewer matching recession rows than this renders the alert instead of charts.
pub const MIN_RECESSION_ROWS: usize = 2;

/// Spacing of the unemployment-rate chart.
pub const UNEMPLOYMENT_GAPS: BarGaps = BarGaps {
    bar_gap: 0.02,
    group_gap: 0.1,
};

/// Inline message shown instead of charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub message: String,
    pub color: String,
    pub font_size: String,
}

impl Alert {
    fn no_data(year: i32) -> Self {
        Self {
            message: format!("Attention! There is no relevant data to display for {year}."),
            color: "red".to_string(),
            font_size: "18px".to_string(),
        }
    }
}

/// A row of two charts in the output container.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRow {
    pub class_name: String,
    pub charts: [ChartSpec; 2],
}

impl ChartRow {
    fn new(left: ChartSpec, right: ChartSpec) -> Self {
        Self {
            class_name: "chart-item".to_string(),
            charts: [left, right],
        }
    }
}

/// Content of the output container.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum ReportOutput {
    /// No report selected (or an unknown selection).
    Empty,
    Alert(Alert),
    Charts(Vec<ChartRow>),
}

impl ReportOutput {
    pub fn charts(&self) -> impl Iterator<Item = &ChartSpec> {
        let rows: &[ChartRow] = match self {
            ReportOutput::Charts(rows) => rows,
            _ => &[],
        };
        rows.iter().flat_map(|row| row.charts.iter())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, ReportOutput::Empty)
    }
}

/// The year selector is disabled exactly when no report mode is selected.
pub fn year_selector_disabled(selected: Option<&str>) -> bool {
    selected.is_none_or(|s| s.trim().is_empty())
}

/// Render the output container from raw control values.
pub fn render_report_for(
    table: &SalesTable,
    year: i32,
    selected: Option<&str>,
) -> Result<ReportOutput, AppError> {
    render_report(table, year, selected.and_then(ReportMode::from_value))
}

/// Render the output container for a parsed selection.
pub fn render_report(
    table: &SalesTable,
    year: i32,
    mode: Option<ReportMode>,
) -> Result<ReportOutput, AppError> {
    match mode {
        Some(ReportMode::Recession) => recession_report(table, year),
        Some(ReportMode::Yearly) => yearly_report(table, year),
        None => Ok(ReportOutput::Empty),
    }
}

fn recession_report(table: &SalesTable, year: i32) -> Result<ReportOutput, AppError> {
    let rows: Vec<&SalesRecord> = table.recession_rows(year);
    if rows.len() < MIN_RECESSION_ROWS {
        tracing::info!(year, rows = rows.len(), "not enough recession data");
        return Ok(ReportOutput::Alert(Alert::no_data(year)));
    }

    let records = || rows.iter().copied();

    let by_month = mean_by(records(), &[Column::Month], Column::AutomobileSales)?;
    let by_type = mean_by(records(), &[Column::VehicleType], Column::AutomobileSales)?;
    let spend = sum_by(records(), &[Column::VehicleType], Column::AdvertisingExpenditure)?;
    let unemployment = sum_by(
        records(),
        &[Column::UnemploymentRate, Column::VehicleType],
        Column::AutomobileSales,
    )?;

    Ok(ReportOutput::Charts(vec![
        ChartRow::new(
            ChartSpec::line(
                format!("Average Automobile Sales Fluctuation for Recession Periods ({year})"),
                &by_month,
            ),
            ChartSpec::bar(
                format!("Average Vehicle Sales by Type in Recession of {year}"),
                &by_type,
            ),
        ),
        ChartRow::new(
            ChartSpec::pie(
                format!("Total Expenditure by Vehicle Type During the Recession of {year}"),
                &spend,
            ),
            ChartSpec::grouped_bar(
                format!("Effect of Unemployment Rate on Vehicle Type and Sales in Recession of {year}"),
                &unemployment,
                UNEMPLOYMENT_GAPS,
            )?,
        ),
    ]))
}

fn yearly_report(table: &SalesTable, year: i32) -> Result<ReportOutput, AppError> {
    let records = table.records();
    let (first, last) = table.year_range();

    let by_year = mean_by(records, &[Column::Year], Column::AutomobileSales)?;
    let by_month = mean_by(records, &[Column::Month], Column::AutomobileSales)?;
    let by_type = mean_by(records, &[Column::VehicleType], Column::AutomobileSales)?;
    let spend = sum_by(records, &[Column::VehicleType], Column::AdvertisingExpenditure)?;

    Ok(ReportOutput::Charts(vec![
        ChartRow::new(
            ChartSpec::line(
                format!("Annual Sales Trend by Vehicle Type ({first} - {last})"),
                &by_year,
            ),
            ChartSpec::line(format!("Monthly Sales Fluctuation in {year}"), &by_month),
        ),
        ChartRow::new(
            ChartSpec::bar(format!("Average Sales by Vehicle Type in {year}"), &by_type),
            ChartSpec::pie(
                format!("Total Expenditure by Vehicle Type ({first} - {last})"),
                &spend,
            ),
        ),
    ]))
}
