//! Normalization Summary - one scalar snapshot per case

use serde::Deserialize;

use super::MetricsSeries;
use crate::metric::{MetricKey, METRIC_COUNT};
use crate::{Error, Result};

/// Field of a summary that a chart can read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SummaryField {
    /// One of the 18 metric scalars
    Metric(MetricKey),
    /// Total training time in seconds
    TrainTime,
}

impl SummaryField {
    /// Display label of the field.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Metric(key) => key.label(),
            Self::TrainTime => "Total Training Time",
        }
    }
}

/// Scalar snapshot (typically best or last value) of every metric for a case.
///
/// The normalization dataset requires every metric; the "min" dataset variant
/// may omit some, and omitted fields read as `None`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "SummaryRecord")]
pub struct NormalizationSummary {
    values: [Option<f64>; METRIC_COUNT],
    train_time: Option<f64>,
}

impl NormalizationSummary {
    /// Create an empty summary.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set one metric value.
    #[must_use]
    pub fn with(mut self, key: MetricKey, value: f64) -> Self {
        self.values[key.index()] = Some(value);
        self
    }

    /// Set the total training time.
    #[must_use]
    pub const fn with_train_time(mut self, seconds: f64) -> Self {
        self.train_time = Some(seconds);
        self
    }

    /// Get one metric value.
    #[must_use]
    pub const fn get(&self, key: MetricKey) -> Option<f64> {
        self.values[key.index()]
    }

    /// Get the total training time in seconds.
    #[must_use]
    pub const fn train_time(&self) -> Option<f64> {
        self.train_time
    }

    /// Read a chart field.
    #[must_use]
    pub const fn field(&self, field: SummaryField) -> Option<f64> {
        match field {
            SummaryField::Metric(key) => self.get(key),
            SummaryField::TrainTime => self.train_time,
        }
    }

    /// Check that all 18 metrics are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteSummary`] naming the first missing key.
    pub fn ensure_complete(&self, case: &str) -> Result<()> {
        match MetricKey::ALL.into_iter().find(|key| self.get(*key).is_none()) {
            Some(key) => Err(Error::IncompleteSummary {
                case: case.to_string(),
                key: key.as_str(),
            }),
            None => Ok(()),
        }
    }

    /// Derive a minimum snapshot from a full series.
    ///
    /// Each metric becomes the smallest value in its column; `train_time`
    /// carries the series' total training time. Used when a build ships
    /// without a precomputed "min" dataset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptySeries`] if the series has no epochs.
    pub fn derive_min(case: &str, series: &MetricsSeries) -> Result<Self> {
        if series.is_empty() {
            return Err(Error::EmptySeries(case.to_string()));
        }

        let mut summary = Self::new();
        for key in MetricKey::ALL {
            summary.values[key.index()] = series.values(key).iter().copied().reduce(f64::min);
        }
        summary.train_time = series.total_training_time();
        Ok(summary)
    }
}

/// On-disk shape of one summary entry.
#[derive(Deserialize)]
struct SummaryRecord {
    train_rmse: Option<f64>,
    train_nrmse: Option<f64>,
    train_l1: Option<f64>,
    valid_rmse: Option<f64>,
    valid_nrmse: Option<f64>,
    valid_l1: Option<f64>,
    dens_valid_rmse: Option<f64>,
    dens_valid_nrmse: Option<f64>,
    dens_valid_l1: Option<f64>,
    ptemp_valid_rmse: Option<f64>,
    ptemp_valid_nrmse: Option<f64>,
    ptemp_valid_l1: Option<f64>,
    uwnd_valid_rmse: Option<f64>,
    uwnd_valid_nrmse: Option<f64>,
    uwnd_valid_l1: Option<f64>,
    wwnd_valid_rmse: Option<f64>,
    wwnd_valid_nrmse: Option<f64>,
    wwnd_valid_l1: Option<f64>,
    train_time: Option<f64>,
}

impl From<SummaryRecord> for NormalizationSummary {
    fn from(r: SummaryRecord) -> Self {
        // Same order as MetricKey::ALL
        Self {
            values: [
                r.train_rmse,
                r.train_nrmse,
                r.train_l1,
                r.valid_rmse,
                r.valid_nrmse,
                r.valid_l1,
                r.dens_valid_rmse,
                r.dens_valid_nrmse,
                r.dens_valid_l1,
                r.ptemp_valid_rmse,
                r.ptemp_valid_nrmse,
                r.ptemp_valid_l1,
                r.uwnd_valid_rmse,
                r.uwnd_valid_nrmse,
                r.uwnd_valid_l1,
                r.wwnd_valid_rmse,
                r.wwnd_valid_nrmse,
                r.wwnd_valid_l1,
            ],
            train_time: r.train_time,
        }
    }
}
