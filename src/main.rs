//! CLI entry point for the studyweek reporting tool.
//!
//! Provides subcommands for building the batch weekly report across the
//! roster, analyzing a single student's sheet over a date range, and
//! listing the active week catalog.

use std::ffi::OsStr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use studyweek::aggregate::mean_over_range;
use studyweek::columns::ALL_VARIABLES;
use studyweek::fetch::{BasicClient, fetch_bytes};
use studyweek::goals::compare_against_baseline;
use studyweek::ingest::{DATE_FORMAT, ingest_sheet};
use studyweek::output::{print_json, print_pretty, write_report_csv};
use studyweek::parser::parse_table;
use studyweek::report::{ReportConfig, build_weekly_report};
use studyweek::roster::Roster;
use studyweek::sheets::HttpSheetSource;
use studyweek::snapshot;
use studyweek::summary::{DEFAULT_MIN_SLEEP_HOURS, DEFAULT_MIN_STUDY_HOURS, SummaryThresholds};
use studyweek::weeks::WeekCatalog;
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "studyweek")]
#[command(about = "Weekly study-time aggregation and ranking reports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Week catalog to use: "numbered", "exam", or a path to a JSON file
    #[arg(long, global = true, default_value = "numbered")]
    catalog: String,

    /// School year the built-in catalogs start in
    #[arg(long, global = true, default_value_t = 2026)]
    year: i32,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the ranked weekly report for every student on the roster
    Report {
        /// Path to the roster JSON file
        #[arg(short, long, default_value = "roster.json")]
        roster: String,

        /// Label of the week to report on (e.g. "11주차")
        #[arg(short, long)]
        week: String,

        /// Directory holding per-week rank snapshots
        #[arg(long, default_value = "snapshots")]
        snapshot_dir: String,

        /// CSV file to write the ranked report to
        #[arg(short, long, default_value = "report.csv")]
        output: String,

        /// Maximum number of concurrent sheet fetches
        #[arg(short, long, default_value_t = 5)]
        concurrency: usize,

        /// Per-student fetch+aggregate timeout in seconds
        #[arg(long, default_value_t = 20)]
        timeout_secs: u64,

        /// Overall batch deadline in seconds
        #[arg(long, default_value_t = 120)]
        deadline_secs: u64,

        /// Minimum weekly study hours before the comment admonishes
        #[arg(long, default_value_t = DEFAULT_MIN_STUDY_HOURS)]
        min_study_hours: f64,

        /// Minimum weekly sleep hours before the comment admonishes
        #[arg(long, default_value_t = DEFAULT_MIN_SLEEP_HOURS)]
        min_sleep_hours: f64,

        /// Also print the full report as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Analyze one student's sheet over a date range
    Student {
        /// Path to a CSV file or URL of a sheet export
        #[arg(value_name = "FILE_OR_URL")]
        source: String,

        /// Student identifier the records belong to
        #[arg(short, long)]
        id: String,

        /// Range start, YYYY-MM-DD (inclusive)
        #[arg(long)]
        from: String,

        /// Range end, YYYY-MM-DD (inclusive)
        #[arg(long)]
        to: String,
    },
    /// List the weeks of the active catalog
    Weeks {
        /// First week label of an inclusive range to list
        #[arg(long)]
        from: Option<String>,

        /// Last week label of an inclusive range to list
        #[arg(long)]
        to: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/studyweek.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("studyweek.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse().unwrap()));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse().unwrap()));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();
    let catalog = load_catalog(&cli.catalog, cli.year)?;

    match cli.command {
        Commands::Report {
            roster,
            week,
            snapshot_dir,
            output,
            concurrency,
            timeout_secs,
            deadline_secs,
            min_study_hours,
            min_sleep_hours,
            json,
        } => {
            let roster = Roster::load(&roster)?;
            let config = ReportConfig {
                concurrency,
                per_student_timeout: Duration::from_secs(timeout_secs),
                deadline: Duration::from_secs(deadline_secs),
                thresholds: SummaryThresholds {
                    min_study_hours,
                    min_sleep_hours,
                },
            };

            // Best-effort previous-week baseline; None degrades movement to —.
            let previous = catalog
                .week_with_label(&week)
                .and_then(|w| w.week_number.checked_sub(1))
                .and_then(|n| snapshot::load(&snapshot_dir, n));

            let source = Arc::new(HttpSheetSource::new(BasicClient::new()));
            let report =
                build_weekly_report(source, &roster, &catalog, &week, previous.as_ref(), &config)
                    .await?;

            for failure in &report.failures {
                warn!(
                    student_id = %failure.student_id,
                    reason = %failure.reason,
                    "Student not ranked this week"
                );
            }

            print_pretty(&report);
            write_report_csv(&output, &report)?;
            info!(output = %output, ranked = report.rows.len(), "Report written");

            snapshot::save(&snapshot_dir, report.week_number, &report.entries)?;

            if json {
                print_json(&report)?;
            }
        }
        Commands::Student {
            source,
            id,
            from,
            to,
        } => {
            let from = parse_date(&from)?;
            let to = parse_date(&to)?;

            let bytes = fetcher(&source).await?;
            let table = parse_table(&bytes)?;
            let ingested = ingest_sheet(&id, &table, &catalog)?;

            if !ingested.missing_variables.is_empty() {
                let missing: Vec<&str> = ingested
                    .missing_variables
                    .iter()
                    .map(|v| v.header())
                    .collect();
                warn!(student_id = %id, ?missing, "Sheet is missing expected variables");
            }

            let means = mean_over_range(&ingested.records, from, to, ALL_VARIABLES);
            let comparisons = compare_against_baseline(&means, &ingested.goals);

            info!(student_id = %id, %from, %to, records = ingested.records.len(), "Date-range analysis");
            for (variable, cmp) in &comparisons {
                info!(
                    variable = variable.header(),
                    value = %cmp.display_value,
                    vs_goal = %cmp.display_delta,
                    status = ?cmp.status,
                    "Variable"
                );
            }
        }
        Commands::Weeks { from, to } => {
            let weeks = match (&from, &to) {
                (Some(first), Some(last)) => catalog.weeks_between(first, last)?,
                _ => catalog.weeks(),
            };
            info!(total = weeks.len(), "Week catalog");
            for week in weeks {
                info!(
                    week_number = week.week_number,
                    label = %week.label,
                    start = %week.start,
                    end = %week.end,
                    "Week"
                );
            }
        }
    }

    Ok(())
}

/// Resolves the `--catalog` flag to a catalog instance. The two built-in
/// variants are separate instances and are never merged.
fn load_catalog(choice: &str, year: i32) -> Result<WeekCatalog> {
    match choice {
        "numbered" => Ok(WeekCatalog::numbered(year)),
        "exam" => Ok(WeekCatalog::exam_weeks(year)),
        path => WeekCatalog::load(path),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .with_context(|| format!("invalid date \"{raw}\", expected YYYY-MM-DD"))
}

/// Loads sheet bytes from a local file path or fetches them over HTTP.
#[tracing::instrument(fields(source = %url))]
async fn fetcher(url: &String) -> Result<Vec<u8>> {
    let bytes = if url.starts_with("http") {
        let client = BasicClient::new();
        fetch_bytes(&client, url).await?
    } else {
        std::fs::read(url)?
    };
    Ok(bytes)
}
