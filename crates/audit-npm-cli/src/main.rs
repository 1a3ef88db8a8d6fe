//! audit-npm - fail the build on npm dependency vulnerabilities
//!
//! Runs `npm audit --json` in a project directory, drops entries below the
//! severity threshold or fully covered by the ignore list, and exits 1 when
//! anything is left.
//!
//! ## Usage
//!
//! - `audit-npm`: audit the current directory
//! - `audit-npm path/to/project`: audit another directory
//! - `audit-npm -s high -i CVE-2021-23337,CVE-2024-29041`

mod reporter;

use anyhow::{Context, Result};
use audit_npm_core::init_tracing;
use audit_npm_runner::{
    AuditConfig, AuditPipeline, AuditRequest, CommandSource, ConfigOverrides, PipelineError,
    DEFAULT_TIMEOUT_SECS,
};
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, Level};

#[derive(Parser)]
#[command(name = "audit-npm")]
#[command(author = "Stevedores Org")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Audit npm dependencies against a severity threshold", long_about = None)]
struct Cli {
    /// Directory containing package.json (shorthand for --target-directory)
    #[arg(value_name = "DIR", conflicts_with = "target_directory")]
    directory: Option<PathBuf>,

    /// Directory containing package.json (default: current directory)
    #[arg(short, long)]
    target_directory: Option<PathBuf>,

    /// Severity threshold: info, low, moderate, high, critical (default: moderate)
    #[arg(short, long, env = "AUDIT_NPM_SEVERITY")]
    severity: Option<String>,

    /// Comma-separated CVE ids to ignore, added to the config file's list
    #[arg(short, long, value_delimiter = ',', env = "AUDIT_NPM_IGNORE")]
    ignore: Vec<String>,

    /// Config file path (default: audit-npm.config.json in the target directory)
    #[arg(short, long, env = "AUDIT_NPM_CONFIG")]
    config: Option<PathBuf>,

    /// Reference date for ignore expiry, YYYY-MM-DD (default: today)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Timeout for npm audit in seconds (0 disables)
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Report output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long)]
    json_logs: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    init_tracing(cli.json_logs, level);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<bool> {
    let directory = resolve_target(cli.target_directory.or(cli.directory))?;
    info!(directory = %directory.display(), "Target directory");

    if !directory.is_dir() {
        anyhow::bail!("Target directory does not exist: {}", directory.display());
    }

    let overrides = ConfigOverrides {
        config_file: cli.config,
        severity: cli.severity,
        ignore: cli.ignore,
    };
    let config = load_config(&directory, &overrides)?;

    info!(severity = %config.severity, "Severity threshold");
    if !config.ignore.is_empty() {
        info!(ignore = %config.ignore_ids().join(", "), "Ignoring CVE ids");
    }

    let reference_date = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let request = AuditRequest {
        directory,
        config,
        reference_date,
    };

    let source = CommandSource::npm(cli.timeout);
    let outcome = AuditPipeline::run(&source, &request)
        .await
        .map_err(stage_failure)?;

    match cli.format {
        OutputFormat::Text => println!("{}", reporter::render_text(&outcome)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&outcome).context("Failed to serialize outcome")?
        ),
    }

    Ok(outcome.passed())
}

fn load_config(directory: &Path, overrides: &ConfigOverrides) -> Result<AuditConfig> {
    AuditConfig::load(directory, overrides)
        .map_err(PipelineError::from)
        .map_err(stage_failure)
}

fn stage_failure(err: PipelineError) -> anyhow::Error {
    let stage = err.stage();
    anyhow::Error::new(err).context(format!("Audit failed at the {} stage", stage))
}

/// Absolute target directory; defaults to the current directory.
fn resolve_target(target: Option<PathBuf>) -> Result<PathBuf> {
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(absolutize(&cwd, target))
}

fn absolutize(cwd: &Path, target: Option<PathBuf>) -> PathBuf {
    match target {
        Some(path) if path.is_absolute() => path,
        Some(path) => cwd.join(path),
        None => cwd.to_path_buf(),
    }
}
