//! Error types for audit execution, configuration and the pipeline.

use audit_npm_core::ReportError;
use std::path::PathBuf;

/// Failures while obtaining raw audit output.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("target directory does not exist: {}", .0.display())]
    TargetNotFound(PathBuf),

    #[error("audit command is empty")]
    EmptyCommand,

    #[error("failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("audit timed out after {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    #[error(
        "audit produced no output (exit code: {}, stderr: {stderr})",
        display_exit_code(.exit_code)
    )]
    EmptyOutput {
        exit_code: Option<i32>,
        stderr: String,
    },

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

fn display_exit_code(code: &Option<i32>) -> String {
    code.map_or_else(|| "none".to_string(), |c| c.to_string())
}

/// Failures while loading `audit-npm.config.json`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to load config file {}: {source}", .path.display())]
    Load {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },
}

/// A failed audit run, tagged with the stage that failed.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("config stage failed: {0}")]
    Config(#[from] ConfigError),

    #[error("audit stage failed: {0}")]
    Audit(#[from] RunnerError),

    #[error("parse stage failed: {0}")]
    Parse(#[from] ReportError),
}

impl PipelineError {
    pub fn stage(&self) -> &'static str {
        match self {
            PipelineError::Config(_) => "config",
            PipelineError::Audit(_) => "audit",
            PipelineError::Parse(_) => "parse",
        }
    }
}
