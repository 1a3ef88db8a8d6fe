//! Audit command definitions.

use serde::{Deserialize, Serialize};

/// Default timeout for `npm audit`, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// An external command that writes an audit report to stdout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuditCommand {
    /// Executable to launch.
    pub program: String,

    /// Arguments passed to `program`.
    pub args: Vec<String>,

    /// Timeout in seconds. Zero disables the timeout.
    pub timeout_secs: u64,
}

impl AuditCommand {
    /// `npm audit --json` for the current platform.
    pub fn npm(timeout_secs: u64) -> Self {
        Self::npm_for(cfg!(windows), timeout_secs)
    }

    /// `npm audit --json`, wrapped in `cmd.exe /c` on Windows where `npm` is a
    /// batch script that cannot be spawned directly.
    pub fn npm_for(windows: bool, timeout_secs: u64) -> Self {
        let audit = ["audit", "--json"].map(String::from);
        if windows {
            let mut args = vec!["/c".to_string(), "npm".to_string()];
            args.extend(audit);
            Self {
                program: "cmd.exe".to_string(),
                args,
                timeout_secs,
            }
        } else {
            Self {
                program: "npm".to_string(),
                args: audit.to_vec(),
                timeout_secs,
            }
        }
    }

    /// A custom command, e.g. an alternate package manager.
    pub fn custom(program: impl Into<String>, args: Vec<String>, timeout_secs: u64) -> Self {
        Self {
            program: program.into(),
            args,
            timeout_secs,
        }
    }

    /// Shell-style rendering for log lines.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for AuditCommand {
    fn default() -> Self {
        Self::npm(DEFAULT_TIMEOUT_SECS)
    }
}
