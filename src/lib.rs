//! # metrics-board: Chart Tables for Training-Run Comparison
//!
//! **Version**: 0.1.0
//!
//! metrics-board loads the static result files of a training pipeline and
//! turns them into chart-ready tables for browsing and comparing named
//! experiment runs ("cases") such as `ti-64-8`.
//!
//! ## Pipeline
//!
//! ```text
//! metrics.json ─┐
//! normalization ├─► MetricsRepository ─► series  (line charts, epoch-aligned)
//! min.json ─────┘         │            ─► radar   (one row per subject)
//!                         │            ─► bubble  (x / y / size points)
//!                   cases (parse, group, sort, select)
//! ```
//!
//! ## Example Usage
//!
//! ```rust
//! use metrics_board::dataset::{MetricsRepository, MetricsSource};
//! use metrics_board::metric::MetricKey;
//! use metrics_board::series::merge_cases;
//!
//! let metrics = r#"{"ti-64-8": {
//!     "epoch": [1, 2],
//!     "train_rmse": [0.5, 0.4], "train_nrmse": [0.5, 0.4], "train_l1": [0.5, 0.4],
//!     "valid_rmse": [0.6, 0.5], "valid_nrmse": [0.6, 0.5], "valid_l1": [0.6, 0.5],
//!     "dens_valid_rmse": [0.1, 0.1], "dens_valid_nrmse": [0.1, 0.1], "dens_valid_l1": [0.1, 0.1],
//!     "ptemp_valid_rmse": [0.1, 0.1], "ptemp_valid_nrmse": [0.1, 0.1], "ptemp_valid_l1": [0.1, 0.1],
//!     "uwnd_valid_rmse": [0.1, 0.1], "uwnd_valid_nrmse": [0.1, 0.1], "uwnd_valid_l1": [0.1, 0.1],
//!     "wwnd_valid_rmse": [0.1, 0.1], "wwnd_valid_nrmse": [0.1, 0.1], "wwnd_valid_l1": [0.1, 0.1]
//! }}"#;
//! let repo = MetricsRepository::from_json_strs(metrics, "{}", None)?;
//!
//! let series = repo.metrics("ti-64-8")?;
//! let rows = merge_cases([("ti-64-8", series)], MetricKey::ValidRmse);
//! assert_eq!(rows.len(), 2);
//! assert_eq!(rows[1].get("ti-64-8"), Some(0.5));
//! # Ok::<(), metrics_board::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod bubble;
pub mod cases;
#[cfg(feature = "tokio")]
pub mod compare;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod metric;
pub mod radar;
pub mod series;
pub mod view;

pub use error::{Error, Result};
