//! CLI entry point for the roster rater.
//!
//! Provides subcommands for a one-off report over a roster CSV, exporting
//! the filtered view, and watching a published roster on a refresh interval.

use anyhow::{Context, Result, anyhow};
use clap::{Args, Parser, Subcommand};
use roster_rater::analyzers::analyzer::{ViewOptions, analyze, annotate, view};
use roster_rater::analyzers::correlation::Correlation;
use roster_rater::analyzers::search::find_by_name;
use roster_rater::analyzers::types::RosterReport;
use roster_rater::config::RosterConfig;
use roster_rater::model::LoadedDataset;
use roster_rater::output::{print_json, print_pretty, write_view_csv};
use roster_rater::refresh::spawn_refresh;
use roster_rater::source::{CachedSource, load_or_empty, source_for};
use std::collections::BTreeSet;
use std::ffi::OsStr;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "roster_rater")]
#[command(about = "Score statistics, grade bands and rankings for a student roster", long_about = None)]
struct Cli {
    /// JSON config file (column names, cache TTL, refresh interval)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct ViewArgs {
    /// Case-insensitive substring to match against student names
    #[arg(short, long, default_value = "")]
    search: String,

    /// Only show these classes in the view (repeatable)
    #[arg(long = "class", value_name = "CLASS")]
    classes: Vec<String>,

    /// Size of the top / bottom ranking views
    #[arg(short = 'n', long)]
    top: Option<usize>,
}

impl ViewArgs {
    fn options(&self, config: &RosterConfig) -> ViewOptions {
        ViewOptions {
            show_all: self.classes.is_empty(),
            classes: self.classes.iter().cloned().collect::<BTreeSet<_>>(),
            search: self.search.clone(),
            top_n: self.top.unwrap_or(config.top_n),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a roster from a file or URL
    Report {
        /// Path to file or URL to fetch (falls back to ROSTER_SOURCE / config)
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        #[command(flatten)]
        view: ViewArgs,

        /// Show details for the student with exactly this name
        #[arg(long)]
        student: Option<String>,

        /// Log the report as JSON instead of debug format
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Export the filtered view as CSV
    Export {
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        #[command(flatten)]
        view: ViewArgs,

        /// CSV file to write
        #[arg(short, long, default_value = "roster_export.csv")]
        output: String,

        /// Gzip compress the CSV
        #[arg(long, default_value_t = false)]
        gzip: bool,
    },
    /// Reload the roster periodically and log each snapshot's report
    Watch {
        #[arg(value_name = "FILE_OR_URL")]
        source: Option<String>,

        #[command(flatten)]
        view: ViewArgs,

        /// Refresh interval in seconds (defaults to config refresh_secs)
        #[arg(short = 'r', long)]
        interval: Option<u64>,

        /// Number of refresh cycles (0 = until Ctrl+C)
        #[arg(long, default_value_t = 0)]
        cycles: u64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/roster_rater.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("roster_rater.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RosterConfig::load(path).with_context(|| format!("loading config {path}"))?,
        None => RosterConfig::default(),
    }
    .with_env_overrides();

    match cli.command {
        Commands::Report {
            source,
            view: view_args,
            student,
            json,
        } => {
            let location = resolve_source(source, &config)?;
            let source = source_for(&location, config.columns.clone());
            let loaded = load_or_empty(&*source).await?;

            let dataset = match loaded {
                LoadedDataset::Empty => {
                    warn!(source = %location, "Roster could not be loaded or has no rows");
                    return Ok(());
                }
                LoadedDataset::Populated(dataset) => dataset,
            };

            let annotated = annotate(&dataset);
            let report = analyze(&annotated, &view_args.options(&config));
            log_headline(&report);

            if json {
                print_json(&report)?;
            } else {
                print_pretty(&report);
            }

            if let Some(name) = student {
                match find_by_name(&annotated, &name) {
                    Some(row) => info!(
                        student = %name,
                        class = row.class_label(),
                        daily = ?row.record.daily_score,
                        test = ?row.record.test_score,
                        composite = ?row.composite_score,
                        "Student detail"
                    ),
                    None => warn!(student = %name, "Student not found"),
                }
            }
        }
        Commands::Export {
            source,
            view: view_args,
            output,
            gzip,
        } => {
            let location = resolve_source(source, &config)?;
            let source = source_for(&location, config.columns.clone());
            let loaded = load_or_empty(&*source).await?;
            let annotated = annotate(&loaded.into_dataset());

            let rows = view(&annotated, &view_args.options(&config));
            write_view_csv(&output, rows, &config.columns, gzip)
                .with_context(|| format!("writing {output}"))?;
        }
        Commands::Watch {
            source,
            view: view_args,
            interval,
            cycles,
        } => {
            let location = resolve_source(source, &config)?;
            let period = interval.map(Duration::from_secs).unwrap_or(config.refresh_period());
            if period.is_zero() {
                return Err(anyhow!("refresh interval must be greater than 0"));
            }
            let options = view_args.options(&config);

            let cached = CachedSource::new(
                source_for(&location, config.columns.clone()),
                config.cache_ttl(),
            );
            let (handle, mut snapshots) = spawn_refresh(cached, period, cycles);

            if cycles == 0 {
                info!(interval_secs = period.as_secs(), "Refreshing indefinitely. Press Ctrl+C to stop.");
            }

            loop {
                tokio::select! {
                    changed = snapshots.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let Some(snapshot) = snapshots.borrow_and_update().clone() else {
                            continue;
                        };
                        let report = analyze(&snapshot.data, &options);
                        info!(cycle = snapshot.cycle, loaded_at = %snapshot.loaded_at, "Snapshot received");
                        log_headline(&report);
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Stopping refresh");
                        return Ok(handle.cancel().await?);
                    }
                }
            }

            handle.wait().await?;
        }
    }

    Ok(())
}

/// Picks the roster location: CLI argument, then ROSTER_SOURCE / config.
fn resolve_source(cli_source: Option<String>, config: &RosterConfig) -> Result<String> {
    cli_source
        .or_else(|| config.source.clone())
        .ok_or_else(|| anyhow!("no roster source given (argument, ROSTER_SOURCE or config `source`)"))
}

fn log_headline(report: &RosterReport<'_>) {
    let daily_mean = report.daily.summary.as_ref().map(|s| format!("{:.2}", s.mean));
    let test_mean = report.test.summary.as_ref().map(|s| format!("{:.2}", s.mean));

    info!(
        total = report.total_students,
        daily_mean = daily_mean.as_deref().unwrap_or("-"),
        test_mean = test_mean.as_deref().unwrap_or("-"),
        in_view = report.view.len(),
        "Roster summary"
    );

    match &report.correlation {
        Correlation::Defined { r, strength, pairs } => info!(
            r = *r,
            strength = strength.label(),
            pairs = *pairs,
            "Daily/test correlation"
        ),
        Correlation::Undefined => info!("Daily/test correlation undefined"),
    }

    for ranked in &report.top {
        info!(
            rank = ranked.rank,
            name = ranked.row.name().unwrap_or("-"),
            class = ranked.row.class_label(),
            composite = ?ranked.row.composite_score,
            "Top student"
        );
    }

    for group in &report.classes {
        info!(
            class = group.class_label(),
            members = group.members(),
            daily_mean = ?group.daily_mean(),
            daily_std = ?group.daily_std(),
            test_mean = ?group.test_mean(),
            test_std = ?group.test_std(),
            "Class summary"
        );
    }
}
