//! Bubble chart points from normalization summaries

use serde::{Deserialize, Serialize};

use crate::dataset::NormalizationSummary;
use crate::metric::MetricKey;

/// One bubble: position from two metrics, radius from a third.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BubblePoint {
    /// Legend name
    pub name: String,
    /// X-axis value
    pub x: f64,
    /// Y-axis value
    pub y: f64,
    /// Bubble size
    pub size: f64,
}

/// A bubble definition: `(name, x, y, size)` metric triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BubbleSpec {
    /// Legend name
    pub name: &'static str,
    /// Metric on the x axis
    pub x: MetricKey,
    /// Metric on the y axis
    pub y: MetricKey,
    /// Metric driving the bubble size
    pub size: MetricKey,
}

/// Train-vs-valid comparisons plotted by the bubble view.
pub const DEFAULT_BUBBLES: [BubbleSpec; 2] = [
    BubbleSpec {
        name: "Train RMSE vs Valid RMSE",
        x: MetricKey::TrainRmse,
        y: MetricKey::ValidRmse,
        size: MetricKey::TrainL1,
    },
    BubbleSpec {
        name: "Train NRMSE vs Valid NRMSE",
        x: MetricKey::TrainNrmse,
        y: MetricKey::ValidNrmse,
        size: MetricKey::DensValidL1,
    },
];

/// Bubble points of one summary. A spec whose metrics are missing from the
/// summary yields no point.
#[must_use]
pub fn bubble_points(summary: &NormalizationSummary, specs: &[BubbleSpec]) -> Vec<BubblePoint> {
    specs
        .iter()
        .filter_map(|spec| {
            Some(BubblePoint {
                name: spec.name.to_string(),
                x: summary.get(spec.x)?,
                y: summary.get(spec.y)?,
                size: summary.get(spec.size)?,
            })
        })
        .collect()
}

/// Bubble points of several cases, names prefixed with the case
/// (`ti-64-8: Train RMSE vs Valid RMSE`).
#[must_use]
pub fn case_bubbles<'a, I>(cases: I, specs: &[BubbleSpec]) -> Vec<BubblePoint>
where
    I: IntoIterator<Item = (&'a str, &'a NormalizationSummary)>,
{
    cases
        .into_iter()
        .flat_map(|(case, summary)| {
            bubble_points(summary, specs).into_iter().map(move |mut point| {
                point.name = format!("{case}: {}", point.name);
                point
            })
        })
        .collect()
}
