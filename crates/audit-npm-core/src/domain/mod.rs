//! Domain models for audit-npm.
//!
//! - `Report`, `Vulnerability`, `Advisory`: the normalized audit report
//! - `Severity`: the total order used for threshold checks
//! - `AnalysisResult`: reported / ignored classification

pub mod analysis;
pub mod error;
pub mod report;
pub mod severity;

pub use analysis::{AnalysisResult, IgnoredVulnerability, ReportedVulnerability};
pub use error::{ReportError, Result};
pub use report::{Advisory, FixAvailability, Report, ReportMetadata, Vulnerability};
pub use severity::Severity;
