//! Where raw audit reports come from.

use async_trait::async_trait;
use std::path::Path;

use crate::command::AuditCommand;
use crate::error::RunnerError;
use crate::runner::AuditRunner;

/// Supplies raw audit report text for a project directory.
#[async_trait]
pub trait ReportSource: Send + Sync {
    /// Fetch the report for `directory`.
    async fn fetch(&self, directory: &Path) -> Result<String, RunnerError>;

    /// Short name for log lines.
    fn name(&self) -> &str;
}

/// Runs an external audit command and returns its stdout.
#[derive(Debug, Clone, Default)]
pub struct CommandSource {
    command: AuditCommand,
}

impl CommandSource {
    pub fn new(command: AuditCommand) -> Self {
        Self { command }
    }

    /// `npm audit --json` with the given timeout.
    pub fn npm(timeout_secs: u64) -> Self {
        Self::new(AuditCommand::npm(timeout_secs))
    }
}

#[async_trait]
impl ReportSource for CommandSource {
    async fn fetch(&self, directory: &Path) -> Result<String, RunnerError> {
        AuditRunner::execute(&self.command, directory)
            .await
            .map(|output| output.stdout)
    }

    fn name(&self) -> &str {
        &self.command.program
    }
}
