//! National Water Model streamflow fetcher.
//!
//! Reads streamflow for one or more comids from a mounted NWM archive and
//! prints a product → valid time → values JSON document on stdout:
//! - Retrospective (reanalysis) hours read a ±5 day hourly window
//! - Forecast hours read the short-range run, the medium-range run, or both
//! - Files that cannot be read land in an `Error` product keyed by path
//!
//! Logs go to stderr as JSON.

mod config;

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use netcdf_parser::NetcdfStreamflowSource;
use nwm_common::PublicationHour;
use retrieval::{FetchRequest, IndexTable, ProductRequest};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use config::FetcherConfig;

/// Hours behind wall-clock time that reliably have published output.
const DEFAULT_LAG_HOURS: i64 = 2;

#[derive(Parser, Debug)]
#[command(name = "nwm-fetch")]
#[command(about = "Fetch NWM streamflow for a publication hour and a set of comids")]
struct Args {
    /// Publication hour as YYYY-MM-DD-HH (default: two hours ago, UTC)
    #[arg(long)]
    date_time: Option<String>,

    /// Forecast product: short, medium or both
    #[arg(long, default_value = "short")]
    product: ProductRequest,

    /// Comid to fetch
    #[arg(long, default_value = "900")]
    comid: i64,

    /// Additional comids
    #[arg(value_name = "COMID")]
    comids: Vec<i64>,

    /// Mount point of the NWM archive
    #[arg(long, env = "ARCHIVE_ROOT")]
    archive_root: Option<PathBuf>,

    /// Comid ↔ feature position table
    #[arg(long, env = "INDEX_TABLE")]
    index_table: Option<PathBuf>,

    /// Optional YAML configuration file
    #[arg(long, env = "FETCHER_CONFIG")]
    config: Option<PathBuf>,

    /// Report true comids instead of feature positions
    #[arg(long)]
    resolve_comids: bool,

    /// Write Prometheus exposition text here when the run finishes
    #[arg(long)]
    metrics_file: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_writer(std::io::stderr)
        .json()
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install Prometheus recorder")?;

    let config = load_config(&args)?;

    let hour = match &args.date_time {
        Some(s) => s
            .parse::<PublicationHour>()
            .with_context(|| format!("Invalid --date-time '{}', expected YYYY-MM-DD-HH", s))?,
        None => PublicationHour::hours_ago(DEFAULT_LAG_HOURS),
    };

    let mut comids = vec![args.comid];
    comids.extend(args.comids.iter().copied());

    info!(
        hour = %hour,
        product = %args.product,
        comids = ?comids,
        archive_root = %config.archive_root.display(),
        "Starting NWM streamflow fetch"
    );

    let table = IndexTable::load(&config.index_table)?;

    let source = Arc::new(
        NetcdfStreamflowSource::new(config.archive_root.clone()).with_variable(&config.variable),
    );
    let request = FetchRequest {
        hour,
        comids,
        product: args.product,
    };

    let results = retrieval::fetch(source, &table, &request, &config.fetch).await?;
    info!(
        products = ?results.products().collect::<Vec<_>>(),
        values = results.value_count(),
        "Fetch complete"
    );

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer(&mut out, &results).context("Failed to write results")?;
    writeln!(out)?;

    if let Some(path) = &args.metrics_file {
        std::fs::write(path, prometheus_handle.render())
            .with_context(|| format!("Failed to write metrics to {:?}", path))?;
    }

    Ok(())
}

/// File config (if any) with command-line overrides applied.
fn load_config(args: &Args) -> Result<FetcherConfig> {
    let mut config = match &args.config {
        Some(path) => FetcherConfig::load(path)?,
        None => FetcherConfig::default(),
    };

    if let Some(root) = &args.archive_root {
        config.archive_root = root.clone();
    }
    if let Some(table) = &args.index_table {
        config.index_table = table.clone();
    }
    if args.resolve_comids {
        config.fetch.resolve_comids = true;
    }

    config.validate()?;
    Ok(config)
}
