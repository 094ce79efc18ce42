//! CSV ingest and column normalization.
//!
//! This module is responsible for turning the raw automobile sales CSV into an
//! immutable `SalesTable`:
//! - headers are normalized (`Vehicle_Type` -> `Vehicle Type`,
//!   `unemployment_rate` -> `Unemployment Rate`)
//! - the required schema is validated before any row is read
//! - rows are deserialized strictly; the first bad row aborts the load

use std::io::Read;

use csv::StringRecord;

use crate::data::table::SalesTable;
use crate::domain::{Column, SalesRecord};
use crate::error::AppError;

/// Normalize a source header: underscores become spaces and every word is title-cased.
///
/// A letter is upper-cased when it does not follow another letter and
/// lower-cased otherwise, so `GDP` becomes `Gdp` and `growth_rate` becomes
/// `Growth Rate`.
pub fn normalize_column_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation reports `Year` missing.
    let name = name.trim().trim_start_matches('\u{feff}');

    let mut out = String::with_capacity(name.len());
    let mut prev_is_alpha = false;
    for ch in name.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if prev_is_alpha {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(ch);
            prev_is_alpha = false;
        }
    }
    out
}

/// Read only the header row and validate it against the required schema.
///
/// Returns the normalized column names. Used to vet candidate files before
/// committing to a full load.
pub fn read_schema<R: Read>(input: R) -> Result<Vec<String>, AppError> {
    normalized_headers(&mut csv_reader(input))
}

/// Read a CSV stream into a `SalesTable`.
pub fn read_sales_table<R: Read>(input: R) -> Result<SalesTable, AppError> {
    let mut reader = csv_reader(input);
    let columns = normalized_headers(&mut reader)?;
    reader.set_headers(StringRecord::from(columns.clone()));

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<SalesRecord>().enumerate() {
        // +2: records start on the line after the header, and lines are 1-based.
        let line = idx + 2;
        let record = result.map_err(|e| AppError::new(3, format!("Invalid row at line {line}: {e}")))?;
        if record.recession > 1 {
            return Err(AppError::new(
                3,
                format!(
                    "Invalid row at line {line}: Recession must be 0 or 1 (got {}).",
                    record.recession
                ),
            ));
        }
        records.push(record);
    }

    let table = SalesTable::new(records, columns)?;
    tracing::info!(
        rows = table.len(),
        years = table.years().len(),
        "dataset loaded"
    );
    Ok(table)
}

fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(input)
}

fn normalized_headers<R: Read>(reader: &mut csv::Reader<R>) -> Result<Vec<String>, AppError> {
    let headers = reader
        .headers()
        .map_err(|e| AppError::new(2, format!("Failed to read CSV headers: {e}")))?;

    let columns: Vec<String> = headers.iter().map(normalize_column_name).collect();
    ensure_required_columns_exist(&columns)?;
    Ok(columns)
}

fn ensure_required_columns_exist(columns: &[String]) -> Result<(), AppError> {
    let missing: Vec<&str> = Column::REQUIRED
        .iter()
        .map(|c| c.name())
        .filter(|name| !columns.iter().any(|c| c == name))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(AppError::new(
            2,
            format!("Dataset is missing required column(s): {}.", missing.join(", ")),
        ))
    }
}
