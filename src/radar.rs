//! Radar aggregation: per-case summaries → one row per subject
//!
//! A radar chart draws one axis per *subject* (a labelled summary field) and
//! one polygon per case:
//!
//! ```text
//! subject            ti-64-8   s-64-8
//! Train RMSE         0.12      0.10
//! Valid RMSE         0.15      0.13
//! ...
//! ```
//!
//! The subject list fixes both which fields are read and the row order. A
//! field that a summary lacks is skipped for that case; it is not read as 0.
//! With no cases at all, [`aggregate`] returns [`default_table`] so the chart
//! always has a well-formed shape. A case named `subject` is renamed with
//! [`RESERVED_SUFFIX`](crate::series::RESERVED_SUFFIX) so it cannot shadow the row key.

use std::collections::BTreeMap;
use std::str::FromStr;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::dataset::{NormalizationSummary, SummaryField};
use crate::metric::MetricKey;
use crate::series::escape_column;
use crate::{Error, Result};

/// Column name of the empty-selection fallback table.
pub const NO_DATA: &str = "No Data";

/// One radar axis: a display label and the summary field it reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RadarSubject {
    /// Axis label, also the row key
    pub label: &'static str,
    /// Summary field plotted on the axis
    pub field: SummaryField,
}

impl RadarSubject {
    /// Create a subject with a custom label.
    #[must_use]
    pub const fn new(label: &'static str, field: SummaryField) -> Self {
        Self { label, field }
    }

    /// Subject for a metric, labelled with the metric's display label.
    #[must_use]
    pub const fn metric(key: MetricKey) -> Self {
        Self::new(key.label(), SummaryField::Metric(key))
    }

    /// Total training time subject.
    #[must_use]
    pub const fn train_time() -> Self {
        Self::new(SummaryField::TrainTime.label(), SummaryField::TrainTime)
    }
}

/// Predefined subject lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RadarProfile {
    /// All 18 metrics plus total training time
    #[default]
    Full,
    /// The 12 RMSE/NRMSE subjects of the minimum-error chart
    Minimum,
    /// Train, valid and per-variable RMSE plus training cost, labelled as
    /// accuracies (`Train Acc`, `Dens Valid Acc`, ...).
    ///
    /// The cost axis is labelled `Node Hours` and reads the summary's total
    /// training time, the only cost field a summary records.
    Rmse,
}

impl RadarProfile {
    /// Subjects of this profile, in row order.
    #[must_use]
    pub fn subjects(self) -> Vec<RadarSubject> {
        use MetricKey::{
            DensValidL1, DensValidNrmse, DensValidRmse, PtempValidL1, PtempValidNrmse,
            PtempValidRmse, TrainL1, TrainNrmse, TrainRmse, UwndValidL1, UwndValidNrmse,
            UwndValidRmse, ValidL1, ValidNrmse, ValidRmse, WwndValidL1, WwndValidNrmse,
            WwndValidRmse,
        };

        match self {
            // NRMSE before RMSE for every validation group
            Self::Full => [
                TrainRmse,
                TrainNrmse,
                TrainL1,
                ValidNrmse,
                ValidRmse,
                ValidL1,
                DensValidNrmse,
                DensValidRmse,
                DensValidL1,
                PtempValidNrmse,
                PtempValidRmse,
                PtempValidL1,
                UwndValidNrmse,
                UwndValidRmse,
                UwndValidL1,
                WwndValidNrmse,
                WwndValidRmse,
                WwndValidL1,
            ]
            .into_iter()
            .map(RadarSubject::metric)
            .chain(std::iter::once(RadarSubject::train_time()))
            .collect(),
            Self::Minimum => [
                TrainRmse,
                TrainNrmse,
                ValidNrmse,
                ValidRmse,
                DensValidNrmse,
                DensValidRmse,
                PtempValidNrmse,
                PtempValidRmse,
                UwndValidNrmse,
                UwndValidRmse,
                WwndValidNrmse,
                WwndValidRmse,
            ]
            .into_iter()
            .map(RadarSubject::metric)
            .collect(),
            Self::Rmse => vec![
                RadarSubject::new("Train Acc", SummaryField::Metric(TrainRmse)),
                RadarSubject::new("Valid Acc", SummaryField::Metric(ValidRmse)),
                RadarSubject::new("Dens Valid Acc", SummaryField::Metric(DensValidRmse)),
                RadarSubject::new("PTemp Valid Acc", SummaryField::Metric(PtempValidRmse)),
                RadarSubject::new("UWnd Valid Acc", SummaryField::Metric(UwndValidRmse)),
                RadarSubject::new("WWnd Valid Acc", SummaryField::Metric(WwndValidRmse)),
                RadarSubject::new("Node Hours", SummaryField::TrainTime),
            ],
        }
    }
}

impl FromStr for RadarProfile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(Self::Full),
            "min" | "minimum" => Ok(Self::Minimum),
            "rmse" => Ok(Self::Rmse),
            _ => Err(Error::InvalidInput(format!(
                "unknown radar profile '{s}' (expected full, minimum or rmse)"
            ))),
        }
    }
}

/// One radar axis with a value per case.
///
/// Serialized flat: `{"subject": "Train RMSE", "ti-64-8": 0.12}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadarRow {
    /// Axis label
    pub subject: String,
    /// Case name → value
    #[serde(flatten)]
    pub values: BTreeMap<String, f64>,
}

impl RadarRow {
    /// Value of a column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<f64> {
        self.values.get(column).copied()
    }
}

/// Flatten per-case summaries into one row per subject.
///
/// Rows come out in subject order; subjects sharing a label share a row. A
/// subject no case has a value for produces no row. A case named `subject`
/// becomes the column `subject` + [`RESERVED_SUFFIX`](crate::series::RESERVED_SUFFIX).
#[must_use]
pub fn aggregate<'a, I>(cases: I, subjects: &[RadarSubject]) -> Vec<RadarRow>
where
    I: IntoIterator<Item = (&'a str, &'a NormalizationSummary)>,
{
    let mut slot_of: FxHashMap<&str, usize> = FxHashMap::default();
    for (i, subject) in subjects.iter().enumerate() {
        slot_of.entry(subject.label).or_insert(i);
    }

    let mut slots: Vec<Option<RadarRow>> = vec![None; subjects.len()];
    for (case, summary) in cases {
        let column = escape_column(case, "subject");
        for subject in subjects {
            let Some(value) = summary.field(subject.field) else {
                continue;
            };
            let slot = slot_of[subject.label];
            slots[slot]
                .get_or_insert_with(|| RadarRow {
                    subject: subject.label.to_string(),
                    values: BTreeMap::new(),
                })
                .values
                .insert(column.clone(), value);
        }
    }

    let rows: Vec<RadarRow> = slots.into_iter().flatten().collect();
    if rows.is_empty() {
        return default_table(subjects);
    }
    rows
}

/// Fallback table: every subject with a single `"No Data" = 0` column.
#[must_use]
pub fn default_table(subjects: &[RadarSubject]) -> Vec<RadarRow> {
    let mut rows: Vec<RadarRow> = Vec::with_capacity(subjects.len());
    for subject in subjects {
        if rows.iter().any(|row| row.subject == subject.label) {
            continue;
        }
        rows.push(RadarRow {
            subject: subject.label.to_string(),
            values: BTreeMap::from([(NO_DATA.to_string(), 0.0)]),
        });
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(train_rmse: f64) -> NormalizationSummary {
        MetricKey::ALL
            .into_iter()
            .fold(NormalizationSummary::new(), |s, key| s.with(key, 0.5))
            .with(MetricKey::TrainRmse, train_rmse)
            .with_train_time(60.0)
    }

    #[test]
    fn test_aggregate_one_column_per_case() {
        let a = summary(0.1);
        let b = summary(0.2);
        let rows = aggregate([("a", &a), ("b", &b)], &RadarProfile::Rmse.subjects());

        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].subject, "Train Acc");
        assert_eq!(rows[0].get("a"), Some(0.1));
        assert_eq!(rows[0].get("b"), Some(0.2));
        assert_eq!(rows[6].subject, "Node Hours");
        assert_eq!(rows[6].get("b"), Some(60.0));
    }

    #[test]
    fn test_missing_field_is_skipped_not_zeroed() {
        let partial = NormalizationSummary::new().with(MetricKey::ValidRmse, 0.3);
        let rows = aggregate([("p", &partial)], &RadarProfile::Full.subjects());

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].subject, "Valid RMSE");
        assert_eq!(rows[0].get("p"), Some(0.3));
    }

    #[test]
    fn test_rows_follow_subject_order_not_arrival_order() {
        let late = NormalizationSummary::new().with(MetricKey::ValidRmse, 0.3);
        let early = NormalizationSummary::new().with(MetricKey::TrainRmse, 0.1);
        let rows = aggregate([("late", &late), ("early", &early)], &RadarProfile::Full.subjects());

        let subjects: Vec<&str> = rows.iter().map(|r| r.subject.as_str()).collect();
        assert_eq!(subjects, vec!["Train RMSE", "Valid RMSE"]);
    }

    #[test]
    fn test_empty_selection_yields_default_table() {
        let subjects = RadarProfile::Minimum.subjects();
        let rows = aggregate(std::iter::empty::<(&str, &NormalizationSummary)>(), &subjects);

        assert_eq!(rows.len(), 12);
        for (row, subject) in rows.iter().zip(&subjects) {
            assert_eq!(row.subject, subject.label);
            assert_eq!(row.values.len(), 1);
            assert_eq!(row.get(NO_DATA), Some(0.0));
        }
    }

    #[test]
    fn test_shared_label_shares_row() {
        let subjects = [
            RadarSubject::new("Error", SummaryField::Metric(MetricKey::TrainRmse)),
            RadarSubject::new("Error", SummaryField::Metric(MetricKey::ValidRmse)),
        ];
        let s = summary(0.1);
        let rows = aggregate([("a", &s)], &subjects);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("a"), Some(0.5));
        assert_eq!(default_table(&subjects).len(), 1);
    }

    fn labels(profile: RadarProfile) -> Vec<&'static str> {
        profile.subjects().iter().map(|s| s.label).collect()
    }

    #[test]
    fn test_full_profile_label_order() {
        assert_eq!(
            labels(RadarProfile::Full),
            vec![
                "Train RMSE",
                "Train NRMSE",
                "Train L1",
                "Valid NRMSE",
                "Valid RMSE",
                "Valid L1",
                "Dens Valid NRMSE",
                "Dens Valid RMSE",
                "Dens Valid L1",
                "PTemp Valid NRMSE",
                "PTemp Valid RMSE",
                "PTemp Valid L1",
                "UWnd Valid NRMSE",
                "UWnd Valid RMSE",
                "UWnd Valid L1",
                "WWnd Valid NRMSE",
                "WWnd Valid RMSE",
                "WWnd Valid L1",
                "Total Training Time",
            ]
        );
    }

    #[test]
    fn test_rmse_profile_labels_and_fields() {
        assert_eq!(
            labels(RadarProfile::Rmse),
            vec![
                "Train Acc",
                "Valid Acc",
                "Dens Valid Acc",
                "PTemp Valid Acc",
                "UWnd Valid Acc",
                "WWnd Valid Acc",
                "Node Hours",
            ]
        );
        let subjects = RadarProfile::Rmse.subjects();
        assert_eq!(subjects[1].field, SummaryField::Metric(MetricKey::ValidRmse));
        assert_eq!(subjects[6].field, SummaryField::TrainTime);
    }

    #[test]
    fn test_case_named_subject_keeps_its_own_key() {
        let s = summary(0.1);
        let subjects = [RadarSubject::metric(MetricKey::TrainRmse)];
        let rows = aggregate([("subject", &s)], &subjects);

        assert_eq!(rows[0].subject, "Train RMSE");
        assert_eq!(rows[0].get("subject (case)"), Some(0.1));
        assert_eq!(
            serde_json::to_string(&rows[0]).unwrap(),
            r#"{"subject":"Train RMSE","subject (case)":0.1}"#
        );
    }

    #[test]
    fn test_profile_parsing() {
        assert_eq!("MIN".parse::<RadarProfile>().unwrap(), RadarProfile::Minimum);
        assert_eq!("full".parse::<RadarProfile>().unwrap(), RadarProfile::Full);
        assert!("radial".parse::<RadarProfile>().is_err());
        assert_eq!(RadarProfile::Full.subjects().len(), 19);
    }
}
