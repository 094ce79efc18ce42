//! Group-by aggregation over the in-memory table.
//!
//! A single pass accumulates `(sum, count)` per group key; groups come out in
//! ascending key order, which is the order charts render categories in.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::{Column, GroupKey, SalesRecord};
use crate::error::AppError;

/// How a group's values are reduced to one number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    Mean,
    Sum,
}

/// One reduced group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    /// One key value per grouping column, in grouping order.
    pub key: Vec<GroupKey>,
    pub value: f64,
}

/// Ephemeral grouping result, consumed to build a chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedSeries {
    pub keys: Vec<Column>,
    pub value: Column,
    pub reduction: Reduction,
    pub rows: Vec<GroupRow>,
}

impl AggregatedSeries {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Key values of the first grouping column, in row order.
    pub fn first_keys(&self) -> Vec<&GroupKey> {
        self.rows.iter().filter_map(|r| r.key.first()).collect()
    }
}

/// Group `records` by `keys` and reduce the `value` column.
///
/// Fails when no key column is given or when `value` is not numeric.
pub fn group_by<'a, I>(
    records: I,
    keys: &[Column],
    value: Column,
    reduction: Reduction,
) -> Result<AggregatedSeries, AppError>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    if keys.is_empty() {
        return Err(AppError::new(3, "Aggregation needs at least one key column."));
    }

    if matches!(value, Column::Month | Column::VehicleType) {
        return Err(AppError::new(
            3,
            format!("Column '{value}' is not numeric and cannot be reduced."),
        ));
    }

    let mut groups: BTreeMap<Vec<GroupKey>, (f64, usize)> = BTreeMap::new();
    for record in records {
        let Some(v) = value.value_of(record) else {
            continue;
        };
        let key = keys.iter().map(|c| c.key_of(record)).collect();
        let slot = groups.entry(key).or_insert((0.0, 0));
        slot.0 += v;
        slot.1 += 1;
    }

    let rows = groups
        .into_iter()
        .map(|(key, (sum, count))| GroupRow {
            key,
            value: match reduction {
                Reduction::Sum => sum,
                Reduction::Mean => sum / count as f64,
            },
        })
        .collect();

    Ok(AggregatedSeries {
        keys: keys.to_vec(),
        value,
        reduction,
        rows,
    })
}

/// `group_by` with the mean reducer.
pub fn mean_by<'a, I>(records: I, keys: &[Column], value: Column) -> Result<AggregatedSeries, AppError>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    group_by(records, keys, value, Reduction::Mean)
}

/// `group_by` with the sum reducer.
pub fn sum_by<'a, I>(records: I, keys: &[Column], value: Column) -> Result<AggregatedSeries, AppError>
where
    I: IntoIterator<Item = &'a SalesRecord>,
{
    group_by(records, keys, value, Reduction::Sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::record;

    fn sample() -> Vec<SalesRecord> {
        vec![
            record(1980, "Jan", 1, "Sedan", 100.0, 10.0, 5.5),
            record(1980, "Feb", 1, "Sedan", 300.0, 20.0, 5.5),
            record(1980, "Jan", 1, "Truck", 200.0, 30.0, 6.0),
            record(1981, "Apr", 0, "Truck", 50.0, 40.0, 4.2),
        ]
    }

    #[test]
    fn mean_groups_in_ascending_key_order() {
        let records = sample();
        let series = mean_by(&records, &[Column::Month], Column::AutomobileSales).unwrap();

        let keys: Vec<String> = series.first_keys().iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["Apr", "Feb", "Jan"]);

        let values: Vec<f64> = series.rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![50.0, 300.0, 150.0]);
    }

    #[test]
    fn sum_over_two_keys() {
        let records = sample();
        let series = sum_by(
            &records,
            &[Column::UnemploymentRate, Column::VehicleType],
            Column::AutomobileSales,
        )
        .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(
            series.rows[0].key,
            vec![GroupKey::Number(4.2), GroupKey::Text("Truck".to_string())]
        );
        assert_eq!(
            series.rows[1].key,
            vec![GroupKey::Number(5.5), GroupKey::Text("Sedan".to_string())]
        );
        assert_eq!(series.rows[1].value, 400.0);
        assert_eq!(series.rows[2].value, 200.0);
    }

    #[test]
    fn categorical_value_column_is_an_error() {
        let records = sample();
        let err = mean_by(&records, &[Column::Year], Column::VehicleType).unwrap_err();
        assert_eq!(err.exit_code(), 3);
        assert!(err.message().contains("Vehicle Type"));
    }

    #[test]
    fn no_records_yields_empty_series() {
        let records: Vec<SalesRecord> = Vec::new();
        let series = sum_by(&records, &[Column::VehicleType], Column::AdvertisingExpenditure).unwrap();
        assert!(series.is_empty());
    }
}
