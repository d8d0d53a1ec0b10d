use analytics::AnalyticsEngine;
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use configuration::{load_settings, Settings};
use core_types::{BucketFill, DateRange, RecencyReference};
use dataset::{load_csv, Dataset, LoadOptions};
use std::path::PathBuf;

mod logging;
mod render;

/// The main entry point for the Storefront dashboard.
fn main() -> anyhow::Result<()> {
    // Load DASHBOARD__* overrides from a .env file if one exists.
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();
    let _log_guard = logging::init(cli.log_dir.as_deref())?;

    let mut settings =
        load_settings(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(path) = cli.data {
        settings.dataset.path = path;
    }

    // The dataset is loaded exactly once and only read afterwards.
    let dataset = load_dataset(&settings)?;

    // Execute the appropriate command
    match cli.command {
        Commands::Bounds => handle_bounds(&dataset),
        Commands::Report(args) => handle_report(args, &dataset, settings),
        Commands::Export(args) => handle_export(args, &dataset, settings),
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Explore the e-commerce order dataset: time series, rankings, demographics
/// and RFM segmentation over any date range.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Settings file (defaults to ./config.toml when present).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// The dataset file, overriding `dataset.path`.
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Also write logs to a daily rolling file in this directory.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dataset's row count and its purchase date range.
    Bounds,
    /// Print summary metrics and every ranking as text tables.
    Report(ReportArgs),
    /// Print the full dashboard as JSON.
    Export(ExportArgs),
}

#[derive(Args)]
struct FilterArgs {
    /// First purchase day to include (format: YYYY-MM-DD). Defaults to the earliest order.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last purchase day to include (format: YYYY-MM-DD). Defaults to the latest order.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Whether empty days/months appear in the time series (dense or sparse).
    #[arg(long)]
    bucket_fill: Option<BucketFill>,

    /// Which latest date RFM recency is measured from (filtered or dataset).
    #[arg(long)]
    recency_reference: Option<RecencyReference>,
}

#[derive(Parser)]
struct ReportArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Rows per product, category and seller ranking.
    #[arg(long)]
    top: Option<usize>,

    /// Also print the day-by-day order table.
    #[arg(long)]
    daily: bool,
}

#[derive(Parser)]
struct ExportArgs {
    #[command(flatten)]
    filter: FilterArgs,

    /// Indent the JSON output.
    #[arg(long)]
    pretty: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn load_dataset(settings: &Settings) -> anyhow::Result<Dataset> {
    let options = LoadOptions {
        delimiter: settings.dataset.delimiter_byte()?,
    };
    let path = &settings.dataset.path;

    // The span drives the spinner on stderr while the file is parsed.
    let span = tracing::info_span!("load_dataset");
    let _entered = span.enter();
    load_csv(path, options).with_context(|| format!("Failed to load dataset from {}", path.display()))
}

fn handle_bounds(dataset: &Dataset) -> anyhow::Result<()> {
    match dataset.bounds() {
        Some(bounds) => println!("{} rows, {}", dataset.len(), bounds),
        None => println!("The dataset is empty."),
    }
    Ok(())
}

fn handle_report(args: ReportArgs, dataset: &Dataset, mut settings: Settings) -> anyhow::Result<()> {
    if let Some(top) = args.top {
        anyhow::ensure!(top > 0, "--top must be at least 1");
        settings.display.top_n = top;
    }
    let (engine, range) = prepare(&args.filter, dataset, &settings);

    let dashboard = engine
        .build(dataset, range)
        .context("Failed to build the dashboard")?;
    print!("{}", render::report(&dashboard, &settings.display, args.daily));
    Ok(())
}

fn handle_export(args: ExportArgs, dataset: &Dataset, settings: Settings) -> anyhow::Result<()> {
    let (engine, range) = prepare(&args.filter, dataset, &settings);

    let dashboard = engine
        .build(dataset, range)
        .context("Failed to build the dashboard")?;
    let json = if args.pretty {
        serde_json::to_string_pretty(&dashboard)?
    } else {
        serde_json::to_string(&dashboard)?
    };
    println!("{json}");
    Ok(())
}

/// Applies the command-line overrides to the analysis settings and resolves
/// the date filter.
fn prepare(filter: &FilterArgs, dataset: &Dataset, settings: &Settings) -> (AnalyticsEngine, DateRange) {
    let mut analysis = settings.analysis;
    if let Some(fill) = filter.bucket_fill {
        analysis.bucket_fill = fill;
    }
    if let Some(reference) = filter.recency_reference {
        analysis.recency_reference = reference;
    }

    let range = resolve_range(dataset, filter.from, filter.to);
    tracing::info!(
        %range,
        bucket_fill = %analysis.bucket_fill,
        recency_reference = %analysis.recency_reference,
        "Building dashboard."
    );
    (AnalyticsEngine::new(analysis), range)
}

/// Fills in whichever end of the filter the user left open with the
/// dataset's own bounds. For an empty dataset the open ends resolve to a range
/// that covers nothing.
fn resolve_range(dataset: &Dataset, from: Option<NaiveDate>, to: Option<NaiveDate>) -> DateRange {
    let default = dataset.all().range();
    DateRange::new(from.unwrap_or(default.start), to.unwrap_or(default.end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::OrderRecord;

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2017, month, day).unwrap()
    }

    fn dataset() -> Dataset {
        let records = [(2, 3), (9, 30)]
            .iter()
            .enumerate()
            .map(|(i, (m, d))| {
                let ts = date(*m, *d).and_hms_opt(12, 0, 0).unwrap();
                OrderRecord::new(format!("o{i}"), "c", "u", ts)
            })
            .collect();
        Dataset::from_records(records)
    }

    #[test]
    fn open_filter_ends_default_to_dataset_bounds() {
        let ds = dataset();
        assert_eq!(resolve_range(&ds, None, None), DateRange::new(date(2, 3), date(9, 30)));
        assert_eq!(
            resolve_range(&ds, Some(date(5, 1)), None),
            DateRange::new(date(5, 1), date(9, 30))
        );
        assert_eq!(
            resolve_range(&ds, None, Some(date(4, 1))),
            DateRange::new(date(2, 3), date(4, 1))
        );
    }

    #[test]
    fn empty_dataset_resolves_to_an_empty_range() {
        let ds = Dataset::default();
        assert!(resolve_range(&ds, None, None).is_empty());
        assert!(resolve_range(&ds, Some(date(1, 1)), None).is_empty());
    }

    #[test]
    fn cli_accepts_policy_overrides() {
        let cli = Cli::try_parse_from([
            "storefront",
            "--data",
            "orders.csv",
            "export",
            "--from",
            "2017-01-01",
            "--bucket-fill",
            "sparse",
            "--recency-reference",
            "dataset",
            "--pretty",
        ])
        .unwrap();
        assert_eq!(cli.data, Some(PathBuf::from("orders.csv")));
        let Commands::Export(args) = cli.command else {
            panic!("expected the export command");
        };
        assert_eq!(args.filter.from, Some(date(1, 1)));
        assert_eq!(args.filter.bucket_fill, Some(BucketFill::Sparse));
        assert_eq!(args.filter.recency_reference, Some(RecencyReference::Dataset));
        assert!(args.pretty);

        let settings = Settings::default();
        let (engine, range) = prepare(&args.filter, &dataset(), &settings);
        assert_eq!(engine.settings().bucket_fill, BucketFill::Sparse);
        assert_eq!(range, DateRange::new(date(1, 1), date(9, 30)));
    }

    #[test]
    fn cli_rejects_unknown_policy_names() {
        let parsed = Cli::try_parse_from(["storefront", "report", "--bucket-fill", "weekly"]);
        assert!(parsed.is_err());
    }
}
