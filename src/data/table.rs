//! Immutable in-memory sales table.

use std::collections::BTreeSet;

use crate::domain::SalesRecord;
use crate::error::AppError;

/// The loaded dataset.
///
/// Built once at startup and then only read. Distinct years are computed at
/// construction so the year dropdown never has to rescan the records.
#[derive(Debug, Clone)]
pub struct SalesTable {
    records: Vec<SalesRecord>,
    columns: Vec<String>,
    years: Vec<i32>,
}

impl SalesTable {
    /// Build a table from already-parsed records.
    ///
    /// `columns` are the normalized header names of the source, kept for
    /// diagnostics. An empty record list is rejected.
    pub fn new(records: Vec<SalesRecord>, columns: Vec<String>) -> Result<Self, AppError> {
        if records.is_empty() {
            return Err(AppError::new(3, "Dataset contains no rows."));
        }

        let years = records
            .iter()
            .map(|r| r.year)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        Ok(Self {
            records,
            columns,
            years,
        })
    }

    pub fn records(&self) -> &[SalesRecord] {
        &self.records
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Distinct years, ascending.
    pub fn years(&self) -> &[i32] {
        &self.years
    }

    /// `(min, max)` year of the table.
    pub fn year_range(&self) -> (i32, i32) {
        // `new` rejects empty tables, so `years` always has at least one entry.
        let first = self.years.first().copied().unwrap_or_default();
        let last = self.years.last().copied().unwrap_or(first);
        (first, last)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records flagged as recession periods within `year`.
    pub fn recession_rows(&self, year: i32) -> Vec<&SalesRecord> {
        self.records
            .iter()
            .filter(|r| r.is_recession() && r.year == year)
            .collect()
    }
}

/// Test helper: build a record with the fields the report rules look at.
#[cfg(test)]
pub(crate) fn record(
    year: i32,
    month: &str,
    recession: u8,
    vehicle_type: &str,
    sales: f64,
    advertising: f64,
    unemployment: f64,
) -> SalesRecord {
    SalesRecord {
        year,
        month: month.to_string(),
        recession,
        vehicle_type: vehicle_type.to_string(),
        automobile_sales: sales,
        advertising_expenditure: advertising,
        unemployment_rate: unemployment,
    }
}

/// Test helper: table with the required columns only.
#[cfg(test)]
pub(crate) fn table(records: Vec<SalesRecord>) -> SalesTable {
    let columns = crate::domain::Column::REQUIRED
        .iter()
        .map(|c| c.name().to_string())
        .collect();
    SalesTable::new(records, columns).expect("test table must not be empty")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn years_are_distinct_and_sorted() {
        let t = table(vec![
            record(1982, "Jan", 1, "Sedan", 10.0, 1.0, 5.0),
            record(1980, "Feb", 0, "Sedan", 10.0, 1.0, 5.0),
            record(1982, "Mar", 0, "Sedan", 10.0, 1.0, 5.0),
        ]);
        assert_eq!(t.years(), &[1980, 1982]);
        assert_eq!(t.year_range(), (1980, 1982));
    }

    #[test]
    fn empty_table_is_rejected() {
        let err = SalesTable::new(Vec::new(), Vec::new()).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn recession_rows_filter_flag_and_year() {
        let t = table(vec![
            record(1980, "Jan", 1, "Sedan", 10.0, 1.0, 5.0),
            record(1980, "Feb", 0, "Sedan", 10.0, 1.0, 5.0),
            record(1981, "Jan", 1, "Sedan", 10.0, 1.0, 5.0),
        ]);
        let rows = t.recession_rows(1980);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].month, "Jan");
    }
}
