//! Static dataset access
//!
//! The training pipeline publishes three JSON documents, each mapping a case
//! name to a record:
//!
//! ```text
//! metrics.json        case → MetricsSeries          (epoch + 18 metric columns)
//! normalization.json  case → NormalizationSummary   (18 scalars + train_time)
//! min.json            case → NormalizationSummary   (optional, may be partial)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use metrics_board::dataset::{Dataset, MetricsSource, MetricsRepository, NormalizationSummary};
//! use metrics_board::metric::MetricKey;
//!
//! let summary = MetricKey::ALL
//!     .into_iter()
//!     .fold(NormalizationSummary::new(), |s, key| s.with(key, 0.1));
//!
//! let repo = MetricsRepository::new(
//!     Dataset::new("metrics"),
//!     Dataset::from_entries("normalization", [("ti-64-8", summary)]),
//!     None,
//! )?;
//!
//! assert!(repo.normalization("ti-64-8").is_ok());
//! assert!(repo.normalization("ti-64-4").unwrap_err().is_not_found());
//! # Ok::<(), metrics_board::Error>(())
//! ```

mod metrics_series;
mod repository;
mod summary;
mod table;

pub use metrics_series::{MetricsSeries, MetricsSeriesBuilder};
pub use repository::{MetricsRepository, MetricsSource, METRICS, MIN, NORMALIZATION};
pub use summary::{NormalizationSummary, SummaryField};
pub use table::Dataset;
