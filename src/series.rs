//! Series transformation: per-case metric columns → line-chart rows
//!
//! Two modes feed the line charts:
//!
//! - **Single case** ([`solo_rows`]): one row per epoch index, one column per
//!   selected metric. The columns of one case share an epoch axis, so no
//!   alignment is needed.
//! - **Comparison** ([`merge_cases`]): one fixed metric, one column per case,
//!   rows keyed by epoch *value* so cases with different series lengths
//!   still line up.
//!
//! Rows are keyed in a `BTreeMap<i64, ChartRow>` and emitted in ascending
//! epoch order. A case with no point at some epoch leaves that column absent
//! from the row; it is never filled with 0.
//!
//! An empty selection produces the single placeholder row `{"epoch": 0}` so
//! a renderer never receives an empty table.
//!
//! A column named `epoch` would collide with the row key once flattened; it
//! is renamed with [`RESERVED_SUFFIX`] (`"epoch (case)"`).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::dataset::MetricsSeries;
use crate::metric::MetricKey;

/// Suffix appended to a column name that equals its row's key field.
pub const RESERVED_SUFFIX: &str = " (case)";

/// Column name for `column`, renamed when it equals the row key `reserved`.
pub(crate) fn escape_column(column: &str, reserved: &str) -> String {
    if column == reserved {
        warn!(column, "column name collides with the row key, renamed");
        format!("{column}{RESERVED_SUFFIX}")
    } else {
        column.to_string()
    }
}

/// One epoch of a line chart.
///
/// Serialized flat: `{"epoch": 2, "ti-64-8": 0.12, "s-64-8": 0.15}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartRow {
    /// Epoch (x-axis value)
    pub epoch: i64,
    /// Column name → value; absent columns mean "no data point"
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl ChartRow {
    /// Create a row with no columns.
    #[must_use]
    pub const fn new(epoch: i64) -> Self {
        Self {
            epoch,
            values: BTreeMap::new(),
        }
    }

    /// The `{epoch: 0}` row emitted for empty selections.
    #[must_use]
    pub const fn placeholder() -> Self {
        Self::new(0)
    }

    /// Value of a column, `None` when the row has no point for it.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }

    /// Whether the row carries no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Union of column names across rows, in first-seen order.
///
/// A line chart draws one line per returned name.
#[must_use]
pub fn column_names(rows: &[ChartRow]) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for row in rows {
        for column in row.values.keys() {
            if !names.contains(column) {
                names.push(column.clone());
            }
        }
    }
    names
}

/// Rows for one case and a subset of its metrics.
///
/// Column names are the metrics' canonical keys (`valid_rmse`).
#[must_use]
pub fn solo_rows(series: &MetricsSeries, keys: &[MetricKey]) -> Vec<ChartRow> {
    if keys.is_empty() || series.is_empty() {
        return vec![ChartRow::placeholder()];
    }

    series
        .epochs()
        .iter()
        .enumerate()
        .map(|(i, &epoch)| ChartRow {
            epoch,
            values: keys
                .iter()
                .filter_map(|key| {
                    let value = series.values(*key).get(i)?;
                    Some((key.as_str().to_string(), *value))
                })
                .collect(),
        })
        .collect()
}

/// Merge one metric of several cases into epoch-aligned rows.
///
/// Column names are the case names.
#[must_use]
pub fn merge_cases<'a, I>(cases: I, key: MetricKey) -> Vec<ChartRow>
where
    I: IntoIterator<Item = (&'a str, &'a MetricsSeries)>,
{
    merge_columns(
        cases
            .into_iter()
            .map(|(case, series)| (case, series.epochs(), series.values(key))),
    )
}

/// Merge `(column, epochs, values)` triples into epoch-aligned rows.
///
/// `epochs[i]` and `values[i]` form one point; extra entries of the longer
/// slice are ignored. A column that repeats an epoch keeps its last value.
#[must_use]
pub fn merge_columns<'a, I>(columns: I) -> Vec<ChartRow>
where
    I: IntoIterator<Item = (&'a str, &'a [i64], &'a [f64])>,
{
    let mut rows: BTreeMap<i64, ChartRow> = BTreeMap::new();
    let mut merged = 0_usize;

    for (column, epochs, values) in columns {
        let column = escape_column(column, "epoch");
        for (&epoch, &value) in epochs.iter().zip(values) {
            rows.entry(epoch)
                .or_insert_with(|| ChartRow::new(epoch))
                .values
                .insert(column.clone(), value);
        }
        merged += 1;
    }

    debug!(columns = merged, rows = rows.len(), "merged chart columns");

    if rows.is_empty() {
        return vec![ChartRow::placeholder()];
    }
    rows.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(epochs: Vec<i64>, valid_rmse: Vec<f64>) -> MetricsSeries {
        MetricsSeries::builder(epochs)
            .metric(MetricKey::ValidRmse, valid_rmse)
            .fill_remaining(1.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_merge_aligns_by_epoch_value() {
        let rows = merge_columns([
            ("A", &[1_i64, 2][..], &[1.0, 2.0][..]),
            ("B", &[2_i64, 3][..], &[5.0, 6.0][..]),
        ]);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].epoch, 1);
        assert_eq!(rows[0].get("A"), Some(1.0));
        assert_eq!(rows[0].get("B"), None);
        assert_eq!(rows[1].get("A"), Some(2.0));
        assert_eq!(rows[1].get("B"), Some(5.0));
        assert_eq!(rows[2].get("A"), None);
        assert_eq!(rows[2].get("B"), Some(6.0));
    }

    #[test]
    fn test_merge_absent_column_serializes_absent() {
        let rows = merge_columns([
            ("A", &[1_i64, 2][..], &[1.0, 2.0][..]),
            ("B", &[2_i64, 3][..], &[5.0, 6.0][..]),
        ]);
        let json = serde_json::to_value(&rows).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"epoch": 1, "A": 1.0},
                {"epoch": 2, "A": 2.0, "B": 5.0},
                {"epoch": 3, "B": 6.0}
            ])
        );
    }

    #[test]
    fn test_empty_selection_yields_placeholder() {
        let rows = merge_cases(std::iter::empty::<(&str, &MetricsSeries)>(), MetricKey::ValidRmse);
        assert_eq!(rows, vec![ChartRow::placeholder()]);
        assert_eq!(serde_json::to_value(&rows).unwrap(), serde_json::json!([{"epoch": 0}]));
    }

    #[test]
    fn test_merge_cases_orders_unsorted_epochs() {
        let a = series(vec![3, 1, 2], vec![0.3, 0.1, 0.2]);
        let rows = merge_cases([("a", &a)], MetricKey::ValidRmse);
        let epochs: Vec<i64> = rows.iter().map(|r| r.epoch).collect();
        assert_eq!(epochs, vec![1, 2, 3]);
        assert_eq!(rows[0].get("a"), Some(0.1));
    }

    #[test]
    fn test_solo_rows_use_metric_keys() {
        let s = series(vec![1, 2], vec![0.4, 0.3]);
        let rows = solo_rows(&s, &[MetricKey::ValidRmse, MetricKey::TrainL1]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].epoch, 2);
        assert_eq!(rows[1].get("valid_rmse"), Some(0.3));
        assert_eq!(rows[1].get("train_l1"), Some(1.0));
        assert_eq!(column_names(&rows), vec!["train_l1", "valid_rmse"]);
    }

    #[test]
    fn test_solo_rows_without_metrics_yields_placeholder() {
        let s = series(vec![1, 2], vec![0.4, 0.3]);
        assert_eq!(solo_rows(&s, &[]), vec![ChartRow::placeholder()]);
    }

    #[test]
    fn test_case_named_epoch_keeps_its_own_key() {
        let rows = merge_columns([
            ("epoch", &[1_i64, 2][..], &[0.5, 0.4][..]),
            ("b", &[2_i64][..], &[0.7][..]),
        ]);
        assert_eq!(rows[0].get("epoch (case)"), Some(0.5));

        let json = serde_json::to_string(&rows[1]).unwrap();
        assert_eq!(json, r#"{"epoch":2,"b":0.7,"epoch (case)":0.4}"#);
        assert_eq!(column_names(&rows), vec!["epoch (case)", "b"]);
    }

    #[test]
    fn test_chart_row_roundtrips_through_json() {
        let json = r#"{"epoch": 7, "b-32-4": 0.5}"#;
        let row: ChartRow = serde_json::from_str(json).unwrap();
        assert_eq!(row.epoch, 7);
        assert_eq!(row.get("b-32-4"), Some(0.5));
    }
}
