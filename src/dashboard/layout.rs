//! Static description of the dashboard's controls.
//!
//! Built once from the loaded table; front-ends render it however they like.

use serde::Serialize;

use crate::data::SalesTable;
use crate::domain::ReportMode;

pub const PAGE_TITLE: &str = "Automobile Statistics Dashboard";
pub const HEADING: &str = "Automobile Sales Statistics Dashboard";
pub const PROMPT: &str = "Select Statistics:";

/// Named controls. The ids are the ones the page and the JSON API expose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ControlId {
    #[serde(rename = "dropdown-statistics")]
    Statistics,
    #[serde(rename = "select-year")]
    Year,
    #[serde(rename = "output-container")]
    Output,
}

impl ControlId {
    pub fn as_str(self) -> &'static str {
        match self {
            ControlId::Statistics => "dropdown-statistics",
            ControlId::Year => "select-year",
            ControlId::Output => "output-container",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropdownOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dropdown {
    pub id: ControlId,
    pub placeholder: String,
    pub options: Vec<DropdownOption>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardLayout {
    pub title: String,
    pub heading: String,
    pub prompt: String,
    pub statistics: Dropdown,
    pub year: Dropdown,
    /// Year values backing `year.options`, ascending.
    pub years: Vec<i32>,
    pub output_id: ControlId,
}

impl DashboardLayout {
    pub fn from_table(table: &SalesTable) -> Self {
        let statistics = Dropdown {
            id: ControlId::Statistics,
            placeholder: "Select a report type".to_string(),
            options: ReportMode::ALL
                .iter()
                .map(|mode| DropdownOption {
                    label: mode.label().to_string(),
                    value: mode.value().to_string(),
                })
                .collect(),
        };

        let years = table.years().to_vec();
        let year = Dropdown {
            id: ControlId::Year,
            placeholder: "Select a year".to_string(),
            options: years
                .iter()
                .map(|y| DropdownOption {
                    label: y.to_string(),
                    value: y.to_string(),
                })
                .collect(),
        };

        Self {
            title: PAGE_TITLE.to_string(),
            heading: HEADING.to_string(),
            prompt: PROMPT.to_string(),
            statistics,
            year,
            years,
            output_id: ControlId::Output,
        }
    }

    /// Initial value of the year dropdown: its first option.
    pub fn default_year(&self) -> i32 {
        self.years.first().copied().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::{record, table};

    #[test]
    fn year_options_match_distinct_table_years() {
        let t = table(vec![
            record(1985, "Jan", 0, "Sedan", 1.0, 1.0, 1.0),
            record(1980, "Jan", 0, "Sedan", 1.0, 1.0, 1.0),
            record(1985, "Feb", 0, "Sedan", 1.0, 1.0, 1.0),
        ]);
        let layout = DashboardLayout::from_table(&t);

        let values: Vec<&str> = layout.year.options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(values, vec!["1980", "1985"]);
        assert_eq!(layout.default_year(), 1980);
        assert_eq!(layout.statistics.options.len(), 2);
        assert_eq!(layout.statistics.options[1].value, "Yearly Statistics");
    }

    #[test]
    fn serializes_control_ids() {
        let t = table(vec![record(1980, "Jan", 0, "Sedan", 1.0, 1.0, 1.0)]);
        let json = serde_json::to_value(DashboardLayout::from_table(&t)).unwrap();
        assert_eq!(json["statistics"]["id"], "dropdown-statistics");
        assert_eq!(json["year"]["id"], "select-year");
        assert_eq!(json["output_id"], "output-container");
        assert_eq!(json["title"], PAGE_TITLE);
    }
}
