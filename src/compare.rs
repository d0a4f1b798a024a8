//! Comparison fetch: concurrent per-case lookups joined before derivation
//!
//! A comparison view needs the series and the normalization summary of every
//! selected case. [`fetch_comparison`] dispatches one lookup task per case on
//! the tokio runtime and waits for all of them before any table is derived.
//! Completion order is irrelevant: results are reassembled in request order.
//!
//! Failures are isolated per case. A case missing from either dataset is
//! reported in [`Comparison::failures`] and left out of every derived table;
//! the remaining cases still render. [`min_summaries`] applies the same rule
//! to the minimum-error radar.
//!
//! ```rust
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> metrics_board::Result<()> {
//! use std::sync::Arc;
//! use metrics_board::compare::fetch_comparison;
//! use metrics_board::dataset::{Dataset, MetricsRepository};
//!
//! let repo = Arc::new(MetricsRepository::new(
//!     Dataset::new("metrics"),
//!     Dataset::new("normalization"),
//!     None,
//! )?);
//!
//! let comparison = fetch_comparison(repo, &["ti-64-8".to_string()]).await;
//! assert!(comparison.cases().is_empty());
//! assert_eq!(comparison.failures().len(), 1);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use crate::bubble::{case_bubbles, BubblePoint, BubbleSpec};
use crate::dataset::{MetricsSeries, MetricsSource, NormalizationSummary};
use crate::metric::MetricKey;
use crate::radar::{aggregate, RadarRow, RadarSubject};
use crate::series::{merge_cases, ChartRow};
use crate::Error;

/// Series and summary of one successfully loaded case.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedCase {
    /// Case name
    pub name: String,
    /// Per-epoch series
    pub series: MetricsSeries,
    /// Normalization summary
    pub summary: NormalizationSummary,
}

/// A case that could not be loaded.
#[derive(Debug)]
pub struct CaseFailure {
    /// Case name
    pub case: String,
    /// Why the lookup failed
    pub error: Error,
}

/// Joined result of a comparison fetch.
#[derive(Debug, Default)]
pub struct Comparison {
    cases: Vec<LoadedCase>,
    failures: Vec<CaseFailure>,
}

impl Comparison {
    /// Loaded cases, in request order.
    #[must_use]
    pub fn cases(&self) -> &[LoadedCase] {
        &self.cases
    }

    /// Cases that failed to load, in request order.
    #[must_use]
    pub fn failures(&self) -> &[CaseFailure] {
        &self.failures
    }

    /// Whether every requested case loaded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Epoch-aligned line-chart rows of one metric, one column per case.
    #[must_use]
    pub fn chart(&self, key: MetricKey) -> Vec<ChartRow> {
        merge_cases(self.cases.iter().map(|c| (c.name.as_str(), &c.series)), key)
    }

    /// Radar rows over the loaded cases' normalization summaries.
    #[must_use]
    pub fn radar(&self, subjects: &[RadarSubject]) -> Vec<RadarRow> {
        aggregate(self.cases.iter().map(|c| (c.name.as_str(), &c.summary)), subjects)
    }

    /// Bubble points over the loaded cases' normalization summaries.
    #[must_use]
    pub fn bubbles(&self, specs: &[BubbleSpec]) -> Vec<BubblePoint> {
        case_bubbles(self.cases.iter().map(|c| (c.name.as_str(), &c.summary)), specs)
    }
}

fn load_case<S: MetricsSource + ?Sized>(source: &S, case: &str) -> crate::Result<LoadedCase> {
    Ok(LoadedCase {
        name: case.to_string(),
        series: source.metrics(case)?.clone(),
        summary: source.normalization(case)?.clone(),
    })
}

/// Per-case minimum summaries for the minimum-error radar.
#[derive(Debug, Default)]
pub struct MinSummaries {
    summaries: Vec<(String, NormalizationSummary)>,
    failures: Vec<CaseFailure>,
}

impl MinSummaries {
    /// Resolved summaries, in request order.
    #[must_use]
    pub fn summaries(&self) -> &[(String, NormalizationSummary)] {
        &self.summaries
    }

    /// Cases without a minimum summary, in request order.
    #[must_use]
    pub fn failures(&self) -> &[CaseFailure] {
        &self.failures
    }

    /// Radar rows over the resolved summaries.
    #[must_use]
    pub fn radar(&self, subjects: &[RadarSubject]) -> Vec<RadarRow> {
        aggregate(
            self.summaries.iter().map(|(case, summary)| (case.as_str(), summary)),
            subjects,
        )
    }
}

fn min_summary<S: MetricsSource + ?Sized>(
    source: &S,
    case: &str,
) -> crate::Result<NormalizationSummary> {
    match source.min(case) {
        Ok(summary) => Ok(summary.clone()),
        Err(Error::DatasetUnavailable(_)) => {
            info!(case = %case, "min dataset not loaded, deriving from series");
            NormalizationSummary::derive_min(case, source.metrics(case)?)
        }
        Err(e) => Err(e),
    }
}

/// Resolve the minimum summary of every case.
///
/// Reads the min dataset when loaded, otherwise derives minima from each
/// case's series. A case that resolves neither way lands in
/// [`MinSummaries::failures`] without affecting the others.
pub fn min_summaries<S: MetricsSource + ?Sized>(source: &S, cases: &[String]) -> MinSummaries {
    let mut out = MinSummaries::default();
    for case in cases {
        match min_summary(source, case) {
            Ok(summary) => out.summaries.push((case.clone(), summary)),
            Err(error) => {
                warn!(case = %case, error = %error, "excluding case from min radar");
                out.failures.push(CaseFailure {
                    case: case.clone(),
                    error,
                });
            }
        }
    }
    out
}

/// Look up every case concurrently and join the results.
///
/// Never fails as a whole; per-case errors land in
/// [`Comparison::failures`].
pub async fn fetch_comparison<S>(source: Arc<S>, cases: &[String]) -> Comparison
where
    S: MetricsSource + 'static,
{
    let mut tasks = JoinSet::new();
    for (position, case) in cases.iter().enumerate() {
        let source = Arc::clone(&source);
        let case = case.clone();
        tasks.spawn(async move {
            let result = load_case(source.as_ref(), &case);
            (position, case, result)
        });
    }

    let mut slots: Vec<Option<(String, crate::Result<LoadedCase>)>> =
        std::iter::repeat_with(|| None).take(cases.len()).collect();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((position, case, result)) => slots[position] = Some((case, result)),
            Err(e) => warn!(error = %e, "case lookup task aborted"),
        }
    }

    let mut comparison = Comparison::default();
    for (position, slot) in slots.into_iter().enumerate() {
        let (case, result) = slot.unwrap_or_else(|| {
            let case = cases[position].clone();
            let error = Error::Other(format!("lookup task for '{case}' did not complete"));
            (case, Err(error))
        });
        match result {
            Ok(loaded) => comparison.cases.push(loaded),
            Err(error) => {
                warn!(case = %case, error = %error, "excluding case from comparison");
                comparison.failures.push(CaseFailure { case, error });
            }
        }
    }

    debug!(
        loaded = comparison.cases.len(),
        failed = comparison.failures.len(),
        "comparison fetch joined"
    );
    comparison
}
