use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueHint};
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use metrics_board::bubble::DEFAULT_BUBBLES;
use metrics_board::cases::{group_by_type, sort_cases_by_type, CaseName, ModelType, Selection};
use metrics_board::compare::{fetch_comparison, min_summaries, CaseFailure, Comparison};
use metrics_board::config::RepositoryConfig;
use metrics_board::dataset::{MetricsRepository, MetricsSource};
use metrics_board::export::{chart_to_record_batch, radar_to_record_batch, write_parquet};
use metrics_board::metric::MetricKey;
use metrics_board::radar::RadarProfile;
use metrics_board::series::solo_rows;

#[derive(Parser, Debug)]
#[command(author, version, about = "Chart tables for comparing training runs", long_about = None)]
struct Cli {
    /// JSON config naming the dataset files
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Per-epoch metrics dataset (overrides the config)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    metrics: Option<PathBuf>,

    /// Normalization summary dataset (overrides the config)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    normalization: Option<PathBuf>,

    /// Optional min summary dataset (overrides the config)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    min: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, short, global = true, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List cases, grouped by model type and ordered for display
    Cases(CasesArgs),
    /// Line-chart rows of one case
    Series(SeriesArgs),
    /// Epoch-aligned rows of one metric across cases
    Compare(CompareArgs),
    /// Radar rows across cases
    Radar(RadarArgs),
    /// Bubble points across cases
    Bubble(BubbleArgs),
    /// Write a chart table to a Parquet file
    Export(ExportArgs),
}

#[derive(Parser, Debug)]
struct CasesArgs {
    /// Only cases whose name contains this type prefix
    #[arg(long = "type")]
    model_type: Option<ModelType>,

    /// Keep cases with this batch size (repeatable)
    #[arg(long = "batch")]
    batch_sizes: Vec<u32>,

    /// Keep cases with this patch size (repeatable)
    #[arg(long = "patch")]
    patch_sizes: Vec<u32>,
}

#[derive(Parser, Debug)]
struct SeriesArgs {
    /// Case to chart
    #[arg(long)]
    case: String,

    /// Metrics to include
    #[arg(long = "metric", default_values = ["train_rmse", "valid_rmse"])]
    metrics: Vec<MetricKey>,
}

#[derive(Parser, Debug)]
struct CompareArgs {
    /// Metric to align across cases
    #[arg(long, default_value = "valid_rmse")]
    metric: MetricKey,

    /// Cases to compare
    cases: Vec<String>,
}

#[derive(Parser, Debug)]
struct RadarArgs {
    /// Subject list (full, minimum, rmse)
    #[arg(long, default_value = "full")]
    profile: RadarProfile,

    /// Read the min dataset instead of normalization summaries
    #[arg(long = "use-min", action = ArgAction::SetTrue)]
    use_min: bool,

    /// Cases to plot
    cases: Vec<String>,
}

#[derive(Parser, Debug)]
struct BubbleArgs {
    /// Cases to plot
    cases: Vec<String>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Metric to export as an epoch-aligned table
    #[arg(long, default_value = "valid_rmse", conflicts_with = "radar")]
    metric: MetricKey,

    /// Export radar rows of this profile instead of a metric
    #[arg(long)]
    radar: Option<RadarProfile>,

    /// Output Parquet file
    #[arg(short, long, value_hint = ValueHint::FilePath)]
    out: PathBuf,

    /// Cases to export
    cases: Vec<String>,
}

#[derive(Serialize)]
struct FailureReport<'a> {
    case: &'a str,
    error: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let repo = Arc::new(load_repository(&cli)?);

    match cli.command {
        Command::Cases(args) => handle_cases(repo.as_ref(), &args),
        Command::Series(args) => handle_series(repo.as_ref(), &args),
        Command::Compare(args) => handle_compare(repo, &args).await,
        Command::Radar(args) => handle_radar(repo, &args).await,
        Command::Bubble(args) => handle_bubble(repo, &args).await,
        Command::Export(args) => handle_export(repo, &args).await,
    }
}

fn load_repository(cli: &Cli) -> Result<MetricsRepository> {
    let base = match cli.config.as_ref() {
        Some(path) => Some(
            RepositoryConfig::from_json_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
        ),
        None => None,
    };

    let metrics = cli
        .metrics
        .clone()
        .or_else(|| base.as_ref().map(|c| c.metrics().to_path_buf()))
        .ok_or_else(|| anyhow!("no metrics dataset: pass --metrics or --config"))?;
    let normalization = cli
        .normalization
        .clone()
        .or_else(|| base.as_ref().map(|c| c.normalization().to_path_buf()))
        .ok_or_else(|| anyhow!("no normalization dataset: pass --normalization or --config"))?;
    let min = cli
        .min
        .clone()
        .or_else(|| base.as_ref().and_then(|c| c.min().map(PathBuf::from)));

    let mut builder = RepositoryConfig::builder(metrics, normalization);
    if let Some(min) = min {
        builder = builder.min(min);
    }
    let config = builder.build();

    MetricsRepository::load(&config).context("failed to load datasets")
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

fn handle_cases(repo: &MetricsRepository, args: &CasesArgs) -> Result<()> {
    let mut selection = Selection::new();
    for &batch in &args.batch_sizes {
        selection.toggle_batch_size(batch);
    }
    for &patch in &args.patch_sizes {
        selection.toggle_patch_size(patch);
    }

    let names = repo.case_names();
    let mut kept: Vec<&str> = match args.model_type {
        Some(model_type) => {
            let groups = group_by_type(&names);
            let group = groups.get(&model_type).cloned().unwrap_or_default();
            selection
                .filter(&names)
                .into_iter()
                .filter(|name| group.iter().any(|g| g == name))
                .collect()
        }
        None => selection.filter(&names),
    };
    sort_cases_by_type(&mut kept);

    let parsed: Vec<CaseName> = kept.into_iter().map(CaseName::parse).collect();
    print_json(&parsed)
}

fn handle_series(repo: &MetricsRepository, args: &SeriesArgs) -> Result<()> {
    let series = repo.metrics(&args.case)?;
    print_json(&solo_rows(series, &args.metrics))
}

fn report_failures(failures: &[CaseFailure]) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    let reports: Vec<FailureReport<'_>> = failures
        .iter()
        .map(|f| FailureReport {
            case: &f.case,
            error: f.error.to_string(),
        })
        .collect();
    warn!(failed = reports.len(), "some cases could not be loaded");
    let mut stderr = io::stderr().lock();
    serde_json::to_writer_pretty(&mut stderr, &reports)?;
    writeln!(stderr)?;
    Ok(())
}

async fn compare(repo: Arc<MetricsRepository>, cases: &[String]) -> Result<Comparison> {
    let comparison = fetch_comparison(repo, cases).await;
    report_failures(comparison.failures())?;
    Ok(comparison)
}

async fn handle_compare(repo: Arc<MetricsRepository>, args: &CompareArgs) -> Result<()> {
    let comparison = compare(repo, &args.cases).await?;
    print_json(&comparison.chart(args.metric))
}

async fn handle_radar(repo: Arc<MetricsRepository>, args: &RadarArgs) -> Result<()> {
    let subjects = args.profile.subjects();
    if !args.use_min {
        let comparison = compare(repo, &args.cases).await?;
        return print_json(&comparison.radar(&subjects));
    }

    let minima = min_summaries(repo.as_ref(), &args.cases);
    report_failures(minima.failures())?;
    print_json(&minima.radar(&subjects))
}

async fn handle_bubble(repo: Arc<MetricsRepository>, args: &BubbleArgs) -> Result<()> {
    let comparison = compare(repo, &args.cases).await?;
    print_json(&comparison.bubbles(&DEFAULT_BUBBLES))
}

async fn handle_export(repo: Arc<MetricsRepository>, args: &ExportArgs) -> Result<()> {
    let comparison = compare(repo, &args.cases).await?;
    let batch = match args.radar {
        Some(profile) => radar_to_record_batch(&comparison.radar(&profile.subjects()))?,
        None => chart_to_record_batch(&comparison.chart(args.metric))?,
    };
    write_parquet(&args.out, &batch)
        .with_context(|| format!("failed to export to {}", args.out.display()))?;
    info!(rows = batch.num_rows(), path = %args.out.display(), "export complete");
    Ok(())
}
