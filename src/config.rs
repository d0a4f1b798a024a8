//! Repository configuration
//!
//! A config file is a small JSON document naming the dataset files:
//!
//! ```json
//! {
//!   "metrics": "data/metrics.json",
//!   "normalization": "data/normalization.json",
//!   "min": "data/min.json"
//! }
//! ```
//!
//! Relative paths resolve against the directory holding the config file.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Paths of the static dataset files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    metrics: PathBuf,
    normalization: PathBuf,
    #[serde(default)]
    min: Option<PathBuf>,
}

impl RepositoryConfig {
    /// Create a builder with the required dataset paths.
    #[must_use]
    pub fn builder(
        metrics: impl Into<PathBuf>,
        normalization: impl Into<PathBuf>,
    ) -> RepositoryConfigBuilder {
        RepositoryConfigBuilder::new(metrics, normalization)
    }

    /// Read a JSON config file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or decoded.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;
        let config: Self = serde_json::from_str(&text)
            .map_err(|e| Error::Config(format!("Invalid config {}: {e}", path.display())))?;

        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolve_against(base))
    }

    /// Make relative dataset paths relative to `base`.
    #[must_use]
    pub fn resolve_against(self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        Self {
            metrics: resolve(self.metrics),
            normalization: resolve(self.normalization),
            min: self.min.map(resolve),
        }
    }

    /// Metrics dataset path.
    #[must_use]
    pub fn metrics(&self) -> &Path {
        &self.metrics
    }

    /// Normalization dataset path.
    #[must_use]
    pub fn normalization(&self) -> &Path {
        &self.normalization
    }

    /// Min dataset path, if configured.
    #[must_use]
    pub fn min(&self) -> Option<&Path> {
        self.min.as_deref()
    }
}

/// Builder for `RepositoryConfig`.
#[derive(Debug)]
pub struct RepositoryConfigBuilder {
    metrics: PathBuf,
    normalization: PathBuf,
    min: Option<PathBuf>,
}

impl RepositoryConfigBuilder {
    /// Create a new builder with the required paths.
    #[must_use]
    pub fn new(metrics: impl Into<PathBuf>, normalization: impl Into<PathBuf>) -> Self {
        Self {
            metrics: metrics.into(),
            normalization: normalization.into(),
            min: None,
        }
    }

    /// Set the optional min dataset path.
    #[must_use]
    pub fn min(mut self, path: impl Into<PathBuf>) -> Self {
        self.min = Some(path.into());
        self
    }

    /// Build the `RepositoryConfig`.
    #[must_use]
    pub fn build(self) -> RepositoryConfig {
        RepositoryConfig {
            metrics: self.metrics,
            normalization: self.normalization,
            min: self.min,
        }
    }
}
