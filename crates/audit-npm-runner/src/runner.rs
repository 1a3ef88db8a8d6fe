//! Audit process execution.

use std::path::Path;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tracing::{debug, info};

use crate::command::AuditCommand;
use crate::error::RunnerError;

/// Captured output of an audit process.
#[derive(Debug, Clone)]
pub struct AuditOutput {
    /// Exit code, if the process exited normally.
    pub exit_code: Option<i32>,

    /// Captured stdout (the report).
    pub stdout: String,

    /// Captured stderr.
    pub stderr: String,

    /// Duration in milliseconds.
    pub duration_ms: u64,
}

/// Runs an [`AuditCommand`] inside a project directory.
pub struct AuditRunner;

impl AuditRunner {
    /// Execute `command` in `directory` and return its captured output.
    ///
    /// A non-zero exit status is not an error: `npm audit` exits 1 whenever it
    /// finds vulnerabilities. Empty or whitespace-only stdout is.
    pub async fn execute(
        command: &AuditCommand,
        directory: &Path,
    ) -> Result<AuditOutput, RunnerError> {
        let start = Instant::now();

        let is_dir = tokio::fs::metadata(directory)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(RunnerError::TargetNotFound(directory.to_path_buf()));
        }

        if command.program.is_empty() {
            return Err(RunnerError::EmptyCommand);
        }

        info!(directory = %directory.display(), command = %command.display(), "Running audit");

        let child = Command::new(&command.program)
            .args(&command.args)
            .current_dir(directory)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        let output = if command.timeout_secs > 0 {
            tokio::time::timeout(
                Duration::from_secs(command.timeout_secs),
                child.wait_with_output(),
            )
            .await
            .map_err(|_| RunnerError::Timeout {
                timeout_secs: command.timeout_secs,
            })??
        } else {
            child.wait_with_output().await?
        };

        let duration_ms = start.elapsed().as_millis() as u64;
        let exit_code = output.status.code();
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !stderr.is_empty() {
            debug!(stderr = %stderr, "audit stderr");
        }

        if stdout.trim().is_empty() {
            return Err(RunnerError::EmptyOutput { exit_code, stderr });
        }

        info!(exit_code = ?exit_code, duration_ms, "Audit completed");

        Ok(AuditOutput {
            exit_code,
            stdout,
            stderr,
            duration_ms,
        })
    }
}
