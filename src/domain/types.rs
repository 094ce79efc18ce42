//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - deserialized straight from the normalized CSV rows
//! - grouped/aggregated in memory
//! - exported to JSON alongside the chart descriptions

use std::cmp::Ordering;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Public historical automobile sales dataset used when no other location is configured.
pub const DEFAULT_DATA_URL: &str = "https://cf-courses-data.s3.us.cloud-object-storage.appdomain.cloud/IBMDeveloperSkillsNetwork-DV0101EN-SkillsNetwork/Data%20Files/historical_automobile_sales.csv";

/// Environment variable (or `.env` entry) overriding the dataset location.
pub const DATA_ENV_VAR: &str = "AUTOSALES_DATA";

/// One row of the loaded table.
///
/// Field names match the *normalized* column headers (`Vehicle_Type` becomes
/// `Vehicle Type`), see `io::ingest::normalize_column_name`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    #[serde(rename = "Year")]
    pub year: i32,
    #[serde(rename = "Month")]
    pub month: String,
    /// 1 when the record falls within a recession period, 0 otherwise.
    #[serde(rename = "Recession")]
    pub recession: u8,
    #[serde(rename = "Vehicle Type")]
    pub vehicle_type: String,
    #[serde(rename = "Automobile Sales")]
    pub automobile_sales: f64,
    #[serde(rename = "Advertising Expenditure")]
    pub advertising_expenditure: f64,
    #[serde(rename = "Unemployment Rate")]
    pub unemployment_rate: f64,
}

impl SalesRecord {
    pub fn is_recession(&self) -> bool {
        self.recession == 1
    }
}

/// Columns of the table that the dashboard knows how to group or reduce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Column {
    Year,
    Month,
    Recession,
    VehicleType,
    AutomobileSales,
    AdvertisingExpenditure,
    UnemploymentRate,
}

impl Column {
    /// Columns that must exist (after normalization) for a dataset to load.
    pub const REQUIRED: [Column; 7] = [
        Column::Year,
        Column::Month,
        Column::Recession,
        Column::VehicleType,
        Column::AutomobileSales,
        Column::AdvertisingExpenditure,
        Column::UnemploymentRate,
    ];

    /// Normalized column name as it appears in the table header.
    pub fn name(self) -> &'static str {
        match self {
            Column::Year => "Year",
            Column::Month => "Month",
            Column::Recession => "Recession",
            Column::VehicleType => "Vehicle Type",
            Column::AutomobileSales => "Automobile Sales",
            Column::AdvertisingExpenditure => "Advertising Expenditure",
            Column::UnemploymentRate => "Unemployment Rate",
        }
    }

    /// Grouping key for a record.
    pub fn key_of(self, record: &SalesRecord) -> GroupKey {
        match self {
            Column::Year => GroupKey::Int(i64::from(record.year)),
            Column::Month => GroupKey::Text(record.month.clone()),
            Column::Recession => GroupKey::Int(i64::from(record.recession)),
            Column::VehicleType => GroupKey::Text(record.vehicle_type.clone()),
            Column::AutomobileSales => GroupKey::Number(record.automobile_sales),
            Column::AdvertisingExpenditure => GroupKey::Number(record.advertising_expenditure),
            Column::UnemploymentRate => GroupKey::Number(record.unemployment_rate),
        }
    }

    /// Numeric value of a record for this column, `None` for categorical columns.
    pub fn value_of(self, record: &SalesRecord) -> Option<f64> {
        match self {
            Column::Year => Some(f64::from(record.year)),
            Column::Recession => Some(f64::from(record.recession)),
            Column::AutomobileSales => Some(record.automobile_sales),
            Column::AdvertisingExpenditure => Some(record.advertising_expenditure),
            Column::UnemploymentRate => Some(record.unemployment_rate),
            Column::Month | Column::VehicleType => None,
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single grouping key value.
///
/// Keys are totally ordered (integers, then floats, then text) so grouped
/// output has a deterministic ascending order.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum GroupKey {
    Int(i64),
    Number(f64),
    Text(String),
}

impl GroupKey {
    fn rank(&self) -> u8 {
        match self {
            GroupKey::Int(_) => 0,
            GroupKey::Number(_) => 1,
            GroupKey::Text(_) => 2,
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Int(a), GroupKey::Int(b)) => a.cmp(b),
            (GroupKey::Number(a), GroupKey::Number(b)) => a.total_cmp(b),
            (GroupKey::Text(a), GroupKey::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Int(v) => write!(f, "{v}"),
            GroupKey::Number(v) => write!(f, "{v}"),
            GroupKey::Text(v) => f.write_str(v),
        }
    }
}

/// Top-level report selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportMode {
    #[serde(rename = "Recession Statistics")]
    Recession,
    #[serde(rename = "Yearly Statistics")]
    Yearly,
}

impl ReportMode {
    pub const ALL: [ReportMode; 2] = [ReportMode::Recession, ReportMode::Yearly];

    /// Control value carried by the report-type dropdown.
    pub fn value(self) -> &'static str {
        match self {
            ReportMode::Recession => "Recession Statistics",
            ReportMode::Yearly => "Yearly Statistics",
        }
    }

    /// Human-facing option label.
    pub fn label(self) -> &'static str {
        self.value()
    }

    /// Parse a dropdown value. Matching is exact: padded, re-cased, unknown
    /// or blank values select nothing.
    pub fn from_value(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|mode| mode.value() == raw)
    }
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// Where the dataset is loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Url(String),
    Path(PathBuf),
}

impl DataSource {
    /// `http://` and `https://` locations are fetched; anything else is a local path.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(raw.to_string())
        } else {
            DataSource::Path(PathBuf::from(raw))
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Url(url) => f.write_str(url),
            DataSource::Path(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Resolved runtime configuration for every front-end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub source: DataSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_mode_parses_exact_values_only() {
        assert_eq!(ReportMode::from_value("Recession Statistics"), Some(ReportMode::Recession));
        assert_eq!(ReportMode::from_value("Yearly Statistics"), Some(ReportMode::Yearly));
        assert_eq!(ReportMode::from_value(" Yearly Statistics "), None);
        assert_eq!(ReportMode::from_value("yearly statistics"), None);
        assert_eq!(ReportMode::from_value("Global Statistics"), None);
        assert_eq!(ReportMode::from_value(""), None);
    }

    #[test]
    fn group_keys_order_numerically() {
        let mut keys = vec![
            GroupKey::Number(10.5),
            GroupKey::Number(2.25),
            GroupKey::Number(-1.0),
        ];
        keys.sort();
        assert_eq!(
            keys,
            vec![GroupKey::Number(-1.0), GroupKey::Number(2.25), GroupKey::Number(10.5)]
        );
        assert_eq!(GroupKey::Number(5.6).to_string(), "5.6");
    }

    #[test]
    fn data_source_detects_urls() {
        assert_eq!(
            DataSource::parse("HTTPS://example.com/a.csv"),
            DataSource::Url("HTTPS://example.com/a.csv".to_string())
        );
        assert_eq!(
            DataSource::parse("data/sales.csv"),
            DataSource::Path(PathBuf::from("data/sales.csv"))
        );
    }
}
