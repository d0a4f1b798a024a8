//! Error types for metrics-board
//!
//! Lookup failures name the dataset and the case so a caller can isolate
//! them per case instead of blanking a whole comparison.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// metrics-board error types
#[derive(Error, Debug)]
pub enum Error {
    /// Case name has no entry in the requested dataset
    #[error("Case '{case}' not found in {dataset} dataset")]
    NotFound {
        /// Dataset that was searched (`metrics`, `normalization`, `min`)
        dataset: &'static str,
        /// Requested case name
        case: String,
    },

    /// Optional dataset was not loaded in this build
    #[error("The {0} dataset is not loaded\nProvide it with --{0} or in the config file")]
    DatasetUnavailable(&'static str),

    /// A metric sequence does not line up with the epoch axis
    #[error("Case '{case}': {key} has {actual} values but epoch has {expected}")]
    SeriesLengthMismatch {
        /// Case whose series is inconsistent
        case: String,
        /// Offending metric key
        key: &'static str,
        /// Length of the epoch sequence
        expected: usize,
        /// Length of the metric sequence
        actual: usize,
    },

    /// Summary record lacks a metric that the dataset requires
    #[error("Case '{case}': normalization summary is missing {key}")]
    IncompleteSummary {
        /// Case whose summary is incomplete
        case: String,
        /// Missing metric key
        key: &'static str,
    },

    /// Dataset entry could not be decoded
    #[error("Malformed {dataset} entry for case '{case}': {source}")]
    MalformedRecord {
        /// Dataset the entry belongs to
        dataset: &'static str,
        /// Case name of the entry
        case: String,
        /// Underlying decode error
        #[source]
        source: serde_json::Error,
    },

    /// Series has no epochs to summarize
    #[error("Case '{0}' has an empty series")]
    EmptySeries(String),

    /// Invalid caller input (unknown metric key, bad profile name, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Storage error (dataset files, Parquet export)
    #[error("Storage error: {0}")]
    StorageError(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Arrow error
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error is a per-case lookup miss.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
