//! audit-npm core library
//!
//! Turns `npm audit --json` output into a normalized [`Report`] and classifies
//! its entries against a severity threshold and a dated CVE ignore list:
//!
//! ```text
//! raw text -> parse_report -> Report -> analyze(threshold, active ignores) -> AnalysisResult
//! ```
//!
//! Everything here is synchronous and free of process or file I/O.

pub mod analyzer;
pub mod domain;
pub mod ignore;
pub mod parser;
pub mod telemetry;

pub use analyzer::analyze;
pub use domain::severity::rank;
pub use domain::{
    Advisory, AnalysisResult, FixAvailability, IgnoredVulnerability, Report, ReportError,
    ReportMetadata, ReportedVulnerability, Result, Severity, Vulnerability,
};
pub use ignore::{resolve_ignores, ExpiredIgnore, IgnoreEntry, IgnoreResolution};
pub use parser::parse_report;
pub use telemetry::init_tracing;
