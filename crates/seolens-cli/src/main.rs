use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use seolens_audit::AuditConfig;
use seolens_core::{AuditRecord, ScoreResult};

#[derive(Debug, Parser)]
#[command(name = "seolens")]
#[command(about = "Audit a web page for SEO signals and score the result")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Audit a page and print the scored result as JSON.
    Audit {
        /// Page to audit; bare domains get an https:// prefix.
        url: String,
        /// Page-load timeout in seconds.
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,
        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
    /// Re-score a previously saved audit record.
    Score {
        /// Path to a JSON file holding an audit record.
        record: PathBuf,
        /// Pretty-print the JSON output.
        #[arg(long)]
        pretty: bool,
    },
}

/// What both commands print: the collected record and its score.
#[derive(Debug, Serialize)]
struct ScoredReport {
    record: AuditRecord,
    score: ScoreResult,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Audit {
            url,
            timeout_secs,
            pretty,
        } => run_audit_command(&url, timeout_secs, pretty).await,
        Commands::Score { record, pretty } => run_score_command(&record, pretty),
    }
}

/// Audit one page and print `{record, score}` to stdout.
///
/// Audit failures (invalid URL, unreachable page) exit with code 2 so
/// scripts can tell them apart from IO errors.
async fn run_audit_command(url: &str, timeout_secs: u64, pretty: bool) -> anyhow::Result<ExitCode> {
    let config = AuditConfig {
        page_timeout_secs: timeout_secs,
        ..AuditConfig::default()
    };

    let record = match seolens_audit::run_audit(&config, url).await {
        Ok(record) => record,
        Err(e) => {
            eprintln!("error: {e}");
            return Ok(ExitCode::from(2));
        }
    };
    let score = seolens_scoring::calculate_score(&record);

    print_report(&ScoredReport { record, score }, pretty)?;
    Ok(ExitCode::SUCCESS)
}

/// Re-score a saved audit record from a JSON file.
fn run_score_command(path: &Path, pretty: bool) -> anyhow::Result<ExitCode> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let record = parse_record(&raw)
        .with_context(|| format!("failed to parse {} as an audit record", path.display()))?;

    let score = seolens_scoring::calculate_score(&record);
    print_report(&ScoredReport { record, score }, pretty)?;
    Ok(ExitCode::SUCCESS)
}

/// Accept either a bare record or the `{record, score}` wrapper that the
/// `audit` command prints, so its output can be piped back in unchanged.
fn parse_record(raw: &str) -> Result<AuditRecord, serde_json::Error> {
    #[derive(Deserialize)]
    struct Wrapper {
        record: AuditRecord,
    }

    serde_json::from_str::<AuditRecord>(raw).or_else(|record_err| {
        serde_json::from_str::<Wrapper>(raw)
            .map(|w| w.record)
            .map_err(|_| record_err)
    })
}

fn print_report(report: &ScoredReport, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(report)?
    } else {
        serde_json::to_string(report)?
    };
    println!("{json}");
    Ok(())
}
