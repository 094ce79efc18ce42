//! Backend-neutral chart descriptions.
//!
//! A `ChartSpec` carries everything a renderer needs (kind, title, fields,
//! data points, bar spacing) and nothing backend-specific. The terminal, SVG
//! and JSON outputs all consume the same value.

use serde::Serialize;

use crate::aggregate::AggregatedSeries;
use crate::domain::GroupKey;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    GroupedBar,
}

/// Spacing for bar charts, as fractions of a category slot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BarGaps {
    /// Gap between bars of adjacent categories.
    pub bar_gap: f64,
    /// Gap between bars of the same category.
    pub group_gap: f64,
}

impl Default for BarGaps {
    fn default() -> Self {
        Self {
            bar_gap: 0.2,
            group_gap: 0.0,
        }
    }
}

/// One plotted value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Datum {
    /// Category (line/bar x value, pie slice name).
    pub x: GroupKey,
    /// Color grouping value (grouped bars only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<GroupKey>,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    /// Field on the category axis (slice names for pies).
    pub x_field: String,
    /// Field on the value axis (slice sizes for pies).
    pub y_field: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gaps: Option<BarGaps>,
    pub data: Vec<Datum>,
}

/// Legend row for charts whose colors carry meaning.
#[derive(Debug, Clone, PartialEq)]
pub struct LegendEntry {
    pub label: String,
    /// Index into the renderer's palette.
    pub color_index: usize,
    /// Share of the total (pie charts only).
    pub share: Option<f64>,
}

impl ChartSpec {
    pub fn line(title: impl Into<String>, series: &AggregatedSeries) -> Self {
        Self::single_key(ChartKind::Line, title.into(), series)
    }

    pub fn bar(title: impl Into<String>, series: &AggregatedSeries) -> Self {
        Self::single_key(ChartKind::Bar, title.into(), series)
    }

    pub fn pie(title: impl Into<String>, series: &AggregatedSeries) -> Self {
        Self::single_key(ChartKind::Pie, title.into(), series)
    }

    /// Bars on the first key, colored by the second key.
    pub fn grouped_bar(
        title: impl Into<String>,
        series: &AggregatedSeries,
        gaps: BarGaps,
    ) -> Result<Self, AppError> {
        let [x_col, color_col] = series.keys.as_slice() else {
            return Err(AppError::new(
                3,
                format!(
                    "Grouped bar charts need exactly two key columns (got {}).",
                    series.keys.len()
                ),
            ));
        };

        let data = series
            .rows
            .iter()
            .filter_map(|row| match &row.key[..] {
                [x, group] => Some(Datum {
                    x: x.clone(),
                    group: Some(group.clone()),
                    value: row.value,
                }),
                _ => None,
            })
            .collect();

        Ok(Self {
            kind: ChartKind::GroupedBar,
            title: title.into(),
            x_field: x_col.name().to_string(),
            y_field: series.value.name().to_string(),
            color_field: Some(color_col.name().to_string()),
            gaps: Some(gaps),
            data,
        })
    }

    fn single_key(kind: ChartKind, title: String, series: &AggregatedSeries) -> Self {
        let x_field = series
            .keys
            .first()
            .map(|c| c.name().to_string())
            .unwrap_or_default();

        let data = series
            .rows
            .iter()
            .filter_map(|row| {
                row.key.first().map(|x| Datum {
                    x: x.clone(),
                    group: None,
                    value: row.value,
                })
            })
            .collect();

        Self {
            kind,
            title,
            x_field,
            y_field: series.value.name().to_string(),
            color_field: None,
            gaps: match kind {
                ChartKind::Bar => Some(BarGaps::default()),
                _ => None,
            },
            data,
        }
    }

    /// Distinct category labels in first-appearance order.
    pub fn categories(&self) -> Vec<String> {
        distinct(self.data.iter().map(|d| d.x.to_string()))
    }

    /// Distinct color groups in first-appearance order (grouped bars).
    pub fn groups(&self) -> Vec<String> {
        distinct(self.data.iter().filter_map(|d| d.group.as_ref().map(|g| g.to_string())))
    }

    pub fn total(&self) -> f64 {
        self.data.iter().map(|d| d.value).sum()
    }

    /// Legend rows: slices for pies, color groups for grouped bars, none otherwise.
    pub fn legend(&self) -> Vec<LegendEntry> {
        match self.kind {
            ChartKind::Pie => {
                let total = self.total();
                self.data
                    .iter()
                    .enumerate()
                    .map(|(idx, d)| LegendEntry {
                        label: d.x.to_string(),
                        color_index: idx,
                        share: (total > 0.0).then(|| d.value / total),
                    })
                    .collect()
            }
            ChartKind::GroupedBar => self
                .groups()
                .into_iter()
                .enumerate()
                .map(|(idx, label)| LegendEntry {
                    label,
                    color_index: idx,
                    share: None,
                })
                .collect(),
            ChartKind::Line | ChartKind::Bar => Vec::new(),
        }
    }
}

fn distinct(items: impl Iterator<Item = String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
