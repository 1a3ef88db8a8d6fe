//! audit-npm runner
//!
//! The pieces around the core policy engine:
//! - Runs `npm audit --json` in a project directory
//! - Loads `audit-npm.config.json` and merges CLI overrides
//! - Drives parse / resolve / analyze and evaluates the pass/fail gate

pub mod command;
pub mod config;
pub mod error;
pub mod gate;
pub mod pipeline;
pub mod runner;
pub mod source;

// Re-export key types
pub use command::{AuditCommand, DEFAULT_TIMEOUT_SECS};
pub use config::{AuditConfig, ConfigOverrides, CONFIG_FILE_NAME, DEFAULT_SEVERITY};
pub use error::{ConfigError, PipelineError, RunnerError};
pub use gate::{AuditGate, GateVerdict};
pub use pipeline::{AuditOutcome, AuditPipeline, AuditRequest};
pub use runner::{AuditOutput, AuditRunner};
pub use source::{CommandSource, ReportSource};
