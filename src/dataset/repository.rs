//! Metrics Repository - the three static datasets, loaded once

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::{Dataset, MetricsSeries, NormalizationSummary};
use crate::config::RepositoryConfig;
use crate::{Error, Result};

/// Dataset names used in lookups and error messages.
pub const METRICS: &str = "metrics";
/// Normalization dataset name.
pub const NORMALIZATION: &str = "normalization";
/// Optional min dataset name.
pub const MIN: &str = "min";

/// Lookup contract over the static datasets.
///
/// Consumers take a `MetricsSource` rather than reaching for global state,
/// so tests can inject a fake repository.
pub trait MetricsSource: Send + Sync {
    /// All case names of the metrics dataset, in file order.
    fn case_names(&self) -> Vec<&str>;

    /// Per-epoch series of a case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the case is absent.
    fn metrics(&self, case: &str) -> Result<&MetricsSeries>;

    /// Normalization summary of a case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if the case is absent.
    fn normalization(&self, case: &str) -> Result<&NormalizationSummary>;

    /// "Min" summary of a case.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatasetUnavailable`] when the build has no min
    /// dataset, or [`Error::NotFound`] if the case is absent.
    fn min(&self, case: &str) -> Result<&NormalizationSummary> {
        let _ = case;
        Err(Error::DatasetUnavailable(MIN))
    }
}

/// Immutable repository of the static datasets.
///
/// Built once at startup and shared read-only (typically behind an `Arc`).
/// Every metrics series is validated for equal-length columns and every
/// normalization summary for completeness, so lookups never hand out a
/// malformed record.
#[derive(Debug, Clone)]
pub struct MetricsRepository {
    metrics: Dataset<MetricsSeries>,
    normalization: Dataset<NormalizationSummary>,
    min: Option<Dataset<NormalizationSummary>>,
    loaded_at: DateTime<Utc>,
}

impl MetricsRepository {
    /// Assemble a repository from parsed datasets, validating every record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SeriesLengthMismatch`] or
    /// [`Error::IncompleteSummary`] for the first invalid record. Ragged
    /// series decoded from JSON are already rejected as
    /// [`Error::MalformedRecord`] by the loader.
    pub fn new(
        metrics: Dataset<MetricsSeries>,
        normalization: Dataset<NormalizationSummary>,
        min: Option<Dataset<NormalizationSummary>>,
    ) -> Result<Self> {
        for (case, series) in metrics.iter() {
            series.validate(case)?;
        }
        for (case, summary) in normalization.iter() {
            summary.ensure_complete(case)?;
        }

        let missing = metrics
            .names()
            .filter(|case| !normalization.contains(case))
            .count();
        if missing > 0 {
            warn!(missing, "cases without a normalization summary");
        }

        info!(
            cases = metrics.len(),
            normalization = normalization.len(),
            min = min.as_ref().map(Dataset::len),
            "metrics repository loaded"
        );

        Ok(Self {
            metrics,
            normalization,
            min,
            loaded_at: Utc::now(),
        })
    }

    /// Parse and assemble a repository from JSON documents.
    ///
    /// # Errors
    ///
    /// Returns a decode error for malformed documents, or a validation
    /// error as in [`MetricsRepository::new`].
    pub fn from_json_strs(metrics: &str, normalization: &str, min: Option<&str>) -> Result<Self> {
        Self::new(
            Dataset::from_json_str(METRICS, metrics)?,
            Dataset::from_json_str(NORMALIZATION, normalization)?,
            min.map(|json| Dataset::from_json_str(MIN, json)).transpose()?,
        )
    }

    /// Load the datasets named by a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::StorageError`] if a file cannot be read, plus any
    /// error of [`MetricsRepository::from_json_strs`].
    pub fn load(config: &RepositoryConfig) -> Result<Self> {
        let metrics = read_dataset_file(config.metrics())?;
        let normalization = read_dataset_file(config.normalization())?;
        let min = config.min().map(read_dataset_file).transpose()?;

        Self::from_json_strs(&metrics, &normalization, min.as_deref())
    }

    /// When the datasets were loaded.
    #[must_use]
    pub const fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Whether the optional min dataset is present.
    #[must_use]
    pub const fn has_min(&self) -> bool {
        self.min.is_some()
    }

    /// Number of cases in the metrics dataset.
    #[must_use]
    pub fn case_count(&self) -> usize {
        self.metrics.len()
    }
}

impl MetricsSource for MetricsRepository {
    fn case_names(&self) -> Vec<&str> {
        self.metrics.names().collect()
    }

    fn metrics(&self, case: &str) -> Result<&MetricsSeries> {
        self.metrics.get(case)
    }

    fn normalization(&self, case: &str) -> Result<&NormalizationSummary> {
        self.normalization.get(case)
    }

    fn min(&self, case: &str) -> Result<&NormalizationSummary> {
        self.min
            .as_ref()
            .ok_or(Error::DatasetUnavailable(MIN))?
            .get(case)
    }
}

fn read_dataset_file(path: &Path) -> Result<String> {
    debug!(path = %path.display(), "reading dataset");
    fs::read_to_string(path).map_err(|e| {
        Error::StorageError(format!("Failed to read dataset {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metric::MetricKey;

    fn series_json(epochs: &str, value: f64) -> String {
        let len = epochs.split(',').count();
        let column = vec![value.to_string(); len].join(", ");
        let mut fields = vec![format!("\"epoch\": [{epochs}]")];
        for key in MetricKey::ALL {
            fields.push(format!("\"{key}\": [{column}]"));
        }
        format!("{{{}}}", fields.join(", "))
    }

    fn summary_json(value: f64) -> String {
        let fields: Vec<String> =
            MetricKey::ALL.iter().map(|key| format!("\"{key}\": {value}")).collect();
        format!("{{{}, \"train_time\": 10.0}}", fields.join(", "))
    }

    fn repository(min: Option<&str>) -> MetricsRepository {
        let metrics = format!(
            "{{\"ti-64-8\": {}, \"s-32-4\": {}}}",
            series_json("1, 2, 3", 0.5),
            series_json("1, 2", 0.25)
        );
        let normalization = format!(
            "{{\"ti-64-8\": {}, \"s-32-4\": {}}}",
            summary_json(0.1),
            summary_json(0.2)
        );
        MetricsRepository::from_json_strs(&metrics, &normalization, min).unwrap()
    }

    #[test]
    fn test_lookups() {
        let repo = repository(None);
        assert_eq!(repo.case_names(), vec!["ti-64-8", "s-32-4"]);
        assert_eq!(repo.metrics("s-32-4").unwrap().len(), 2);
        assert_eq!(
            repo.normalization("ti-64-8").unwrap().get(MetricKey::ValidRmse),
            Some(0.1)
        );
        assert!(repo.metrics("b-16-2").unwrap_err().is_not_found());
    }

    #[test]
    fn test_min_dataset_is_optional() {
        let repo = repository(None);
        assert!(!repo.has_min());
        assert!(matches!(repo.min("ti-64-8"), Err(Error::DatasetUnavailable("min"))));

        let repo = repository(Some(r#"{"ti-64-8": {"valid_rmse": 0.05}}"#));
        assert!(repo.has_min());
        assert_eq!(repo.min("ti-64-8").unwrap().get(MetricKey::ValidRmse), Some(0.05));
        assert!(repo.min("s-32-4").unwrap_err().is_not_found());
    }

    #[test]
    fn test_incomplete_normalization_is_rejected() {
        let metrics = format!("{{\"ti-64-8\": {}}}", series_json("1", 0.5));
        let err = MetricsRepository::from_json_strs(
            &metrics,
            r#"{"ti-64-8": {"valid_rmse": 0.1}}"#,
            None,
        )
        .unwrap_err();
        assert!(matches!(err, Error::IncompleteSummary { .. }));
    }

    #[test]
    fn test_ragged_series_is_rejected() {
        let mut json = series_json("1, 2", 0.5);
        json = json.replacen("\"train_l1\": [0.5, 0.5]", "\"train_l1\": [0.5]", 1);
        let metrics = format!("{{\"ti-64-8\": {json}}}");
        let normalization = format!("{{\"ti-64-8\": {}}}", summary_json(0.1));
        let err = MetricsRepository::from_json_strs(&metrics, &normalization, None).unwrap_err();
        match err {
            Error::MalformedRecord { dataset: "metrics", case, source } => {
                assert_eq!(case, "ti-64-8");
                assert!(source.to_string().contains("train_l1 has 1 values but epoch has 2"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
