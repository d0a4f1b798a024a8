//! Epoch merge benchmarks
//!
//! Measures multi-case line-chart assembly: overlapping epoch ranges, one
//! column per case, as the comparison view builds it on every selection
//! change.
//!
//! Run with: cargo bench --bench series_merge

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use metrics_board::dataset::{MetricsSeries, NormalizationSummary};
use metrics_board::metric::MetricKey;
use metrics_board::radar::{aggregate, RadarProfile};
use metrics_board::series::merge_cases;

const EPOCHS: i64 = 500;

fn series(offset: i64) -> MetricsSeries {
    let epochs: Vec<i64> = (offset..offset + EPOCHS).collect();
    let values: Vec<f64> = epochs.iter().map(|&e| 1.0 / (e as f64 + 1.0)).collect();
    MetricsSeries::builder(epochs)
        .metric(MetricKey::ValidRmse, values)
        .fill_remaining(0.5)
        .build()
        .unwrap()
}

/// Benchmark epoch-aligned merge over a growing number of cases
fn bench_merge_cases(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge_cases");

    for cases in [2_usize, 8, 32] {
        let names: Vec<String> = (0..cases).map(|i| format!("ti-64-{i}")).collect();
        let all: Vec<MetricsSeries> = (0..cases).map(|i| series(i as i64 * 10)).collect();

        group.bench_with_input(BenchmarkId::new("valid_rmse", cases), &cases, |b, _| {
            b.iter(|| {
                merge_cases(
                    names.iter().map(String::as_str).zip(all.iter()),
                    black_box(MetricKey::ValidRmse),
                )
            });
        });
    }

    group.finish();
}

/// Benchmark radar aggregation with the full subject list
fn bench_radar_aggregate(c: &mut Criterion) {
    let summary = MetricKey::ALL
        .into_iter()
        .fold(NormalizationSummary::new(), |s, key| s.with(key, 0.25))
        .with_train_time(3600.0);
    let names: Vec<String> = (0..32).map(|i| format!("s-32-{i}")).collect();
    let subjects = RadarProfile::Full.subjects();

    c.bench_function("radar_aggregate_32_cases", |b| {
        b.iter(|| {
            aggregate(
                names.iter().map(|n| (n.as_str(), black_box(&summary))),
                &subjects,
            )
        });
    });
}

criterion_group!(benches, bench_merge_cases, bench_radar_aggregate);
criterion_main!(benches);
