//! Metrics Series - per-epoch time series for one case

use serde::Deserialize;

use crate::metric::{MetricKey, METRIC_COUNT};
use crate::{Error, Result};

/// Full per-epoch time series for one case.
///
/// Each of the 18 metric columns is aligned by index with `epoch`:
/// `values(key)[i]` was recorded at `epochs()[i]`. The equal-length
/// invariant is enforced on decode and by the builder, so consumers can
/// index columns with the epoch axis freely.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "SeriesRecord")]
pub struct MetricsSeries {
    epoch: Vec<i64>,
    columns: [Vec<f64>; METRIC_COUNT],
    total_training_time: Option<f64>,
    final_training_acc: Option<f64>,
}

impl MetricsSeries {
    /// Create a builder over the given epoch axis.
    #[must_use]
    pub fn builder(epoch: Vec<i64>) -> MetricsSeriesBuilder {
        MetricsSeriesBuilder::new(epoch)
    }

    /// Get the epoch axis.
    #[must_use]
    pub fn epochs(&self) -> &[i64] {
        &self.epoch
    }

    /// Get the values of one metric, aligned with [`Self::epochs`].
    #[must_use]
    pub fn values(&self, key: MetricKey) -> &[f64] {
        &self.columns[key.index()]
    }

    /// Iterate `(epoch, value)` pairs of one metric.
    pub fn points(&self, key: MetricKey) -> impl Iterator<Item = (i64, f64)> + '_ {
        self.epoch.iter().copied().zip(self.values(key).iter().copied())
    }

    /// Number of epochs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.epoch.len()
    }

    /// Whether the series has no epochs.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.epoch.is_empty()
    }

    /// Total training time in seconds, if recorded.
    #[must_use]
    pub const fn total_training_time(&self) -> Option<f64> {
        self.total_training_time
    }

    /// Final training accuracy/loss, if recorded.
    #[must_use]
    pub const fn final_training_acc(&self) -> Option<f64> {
        self.final_training_acc
    }

    /// Check that every metric column has one value per epoch.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SeriesLengthMismatch`] naming the first offending key.
    pub fn validate(&self, case: &str) -> Result<()> {
        match self.first_ragged() {
            Some((key, actual)) => Err(Error::SeriesLengthMismatch {
                case: case.to_string(),
                key: key.as_str(),
                expected: self.epoch.len(),
                actual,
            }),
            None => Ok(()),
        }
    }

    fn first_ragged(&self) -> Option<(MetricKey, usize)> {
        MetricKey::ALL
            .into_iter()
            .map(|key| (key, self.values(key).len()))
            .find(|&(_, actual)| actual != self.epoch.len())
    }
}

/// Builder for `MetricsSeries`.
///
/// Every metric column must be supplied, either explicitly with
/// [`MetricsSeriesBuilder::metric`] or in bulk with
/// [`MetricsSeriesBuilder::fill_remaining`].
#[derive(Debug)]
pub struct MetricsSeriesBuilder {
    epoch: Vec<i64>,
    columns: [Option<Vec<f64>>; METRIC_COUNT],
    total_training_time: Option<f64>,
    final_training_acc: Option<f64>,
}

impl MetricsSeriesBuilder {
    /// Create a new builder over the given epoch axis.
    #[must_use]
    pub fn new(epoch: Vec<i64>) -> Self {
        Self {
            epoch,
            columns: Default::default(),
            total_training_time: None,
            final_training_acc: None,
        }
    }

    /// Set the values of one metric.
    #[must_use]
    pub fn metric(mut self, key: MetricKey, values: Vec<f64>) -> Self {
        self.columns[key.index()] = Some(values);
        self
    }

    /// Set every metric not yet supplied to a constant column.
    #[must_use]
    pub fn fill_remaining(mut self, value: f64) -> Self {
        let len = self.epoch.len();
        for column in &mut self.columns {
            if column.is_none() {
                *column = Some(vec![value; len]);
            }
        }
        self
    }

    /// Set the total training time in seconds.
    #[must_use]
    pub const fn total_training_time(mut self, seconds: f64) -> Self {
        self.total_training_time = Some(seconds);
        self
    }

    /// Set the final training accuracy/loss.
    #[must_use]
    pub const fn final_training_acc(mut self, value: f64) -> Self {
        self.final_training_acc = Some(value);
        self
    }

    /// Build the `MetricsSeries`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if a metric column was never supplied,
    /// or [`Error::SeriesLengthMismatch`] if a column does not match the
    /// epoch axis.
    pub fn build(self) -> Result<MetricsSeries> {
        let mut columns: [Vec<f64>; METRIC_COUNT] = Default::default();
        for (key, column) in MetricKey::ALL.into_iter().zip(self.columns) {
            columns[key.index()] = column
                .ok_or_else(|| Error::InvalidInput(format!("metric column {key} not supplied")))?;
        }

        let series = MetricsSeries {
            epoch: self.epoch,
            columns,
            total_training_time: self.total_training_time,
            final_training_acc: self.final_training_acc,
        };
        series.validate("<builder>")?;
        Ok(series)
    }
}

/// On-disk shape of one metrics dataset entry.
#[derive(Deserialize)]
struct SeriesRecord {
    epoch: Vec<i64>,
    train_rmse: Vec<f64>,
    train_nrmse: Vec<f64>,
    train_l1: Vec<f64>,
    valid_rmse: Vec<f64>,
    valid_nrmse: Vec<f64>,
    valid_l1: Vec<f64>,
    dens_valid_rmse: Vec<f64>,
    dens_valid_nrmse: Vec<f64>,
    dens_valid_l1: Vec<f64>,
    ptemp_valid_rmse: Vec<f64>,
    ptemp_valid_nrmse: Vec<f64>,
    ptemp_valid_l1: Vec<f64>,
    uwnd_valid_rmse: Vec<f64>,
    uwnd_valid_nrmse: Vec<f64>,
    uwnd_valid_l1: Vec<f64>,
    wwnd_valid_rmse: Vec<f64>,
    wwnd_valid_nrmse: Vec<f64>,
    wwnd_valid_l1: Vec<f64>,
    total_training_time: Option<f64>,
    final_training_acc: Option<f64>,
}

impl TryFrom<SeriesRecord> for MetricsSeries {
    type Error = String;

    fn try_from(r: SeriesRecord) -> std::result::Result<Self, Self::Error> {
        // Same order as MetricKey::ALL
        let series = Self {
            epoch: r.epoch,
            columns: [
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
            total_training_time: r.total_training_time,
            final_training_acc: r.final_training_acc,
        };
        match series.first_ragged() {
            Some((key, actual)) => Err(format!(
                "{key} has {actual} values but epoch has {}",
                series.epoch.len()
            )),
            None => Ok(series),
        }
    }
}
