//! Audit pipeline: fetch, parse, resolve ignores, analyze, gate.

use audit_npm_core::{
    analyze, parse_report, resolve_ignores, AnalysisResult, ExpiredIgnore, ReportMetadata,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::AuditConfig;
use crate::error::{PipelineError, RunnerError};
use crate::gate::{AuditGate, GateVerdict};
use crate::source::ReportSource;

/// Inputs for one audit run.
#[derive(Debug, Clone)]
pub struct AuditRequest {
    /// Project directory containing `package.json`.
    pub directory: PathBuf,

    /// Effective threshold and ignore list.
    pub config: AuditConfig,

    /// Date against which ignore expiry is checked.
    pub reference_date: NaiveDate,
}

/// Result of a complete audit run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditOutcome {
    /// Identifier attached to every log line of this run.
    pub run_id: Uuid,

    pub directory: PathBuf,

    pub severity_threshold: String,

    pub reference_date: NaiveDate,

    /// SHA-256 of the raw report text.
    pub report_digest: String,

    /// Counts as declared by the audit tool.
    pub metadata: ReportMetadata,

    pub analysis: AnalysisResult,

    /// Ignore entries past their `until` date.
    pub expired_ignores: Vec<ExpiredIgnore>,

    pub verdict: GateVerdict,

    /// Total duration in milliseconds.
    pub duration_ms: u64,
}

impl AuditOutcome {
    pub fn passed(&self) -> bool {
        self.verdict.passed
    }

    pub fn exit_code(&self) -> i32 {
        self.verdict.exit_code()
    }
}

/// Audit pipeline orchestrator.
pub struct AuditPipeline;

impl AuditPipeline {
    /// Run one audit.
    ///
    /// Fails at the `audit` stage when the source fails or returns blank
    /// text, and at the `parse` stage when the report is malformed. Neither
    /// is retried.
    pub async fn run(
        source: &dyn ReportSource,
        request: &AuditRequest,
    ) -> Result<AuditOutcome, PipelineError> {
        let start = Instant::now();
        let run_id = Uuid::new_v4();

        info!(
            run_id = %run_id,
            source = source.name(),
            directory = %request.directory.display(),
            severity = %request.config.severity,
            "Starting audit"
        );

        let raw = source.fetch(&request.directory).await?;
        if raw.trim().is_empty() {
            return Err(RunnerError::EmptyOutput {
                exit_code: None,
                stderr: String::new(),
            }
            .into());
        }
        let report_digest = compute_report_digest(&raw);

        let report = parse_report(&raw)?;
        info!(
            run_id = %run_id,
            packages = report.vulnerabilities.len(),
            total = report.metadata.total_vulnerabilities,
            "Parsed audit report"
        );

        let ignores = resolve_ignores(&request.config.ignore, request.reference_date);
        for expired in &ignores.expired {
            warn!(
                run_id = %run_id,
                id = %expired.id,
                until = %expired.until,
                "Ignore entry expired"
            );
        }

        let analysis = analyze(&report, &request.config.severity, &ignores.active);
        let verdict = AuditGate::evaluate(&analysis);

        let duration_ms = start.elapsed().as_millis() as u64;
        info!(
            run_id = %run_id,
            reported = analysis.reported.len(),
            ignored = analysis.ignored.len(),
            passed = verdict.passed,
            duration_ms,
            "Audit finished"
        );

        Ok(AuditOutcome {
            run_id,
            directory: request.directory.clone(),
            severity_threshold: request.config.severity.clone(),
            reference_date: request.reference_date,
            report_digest,
            metadata: report.metadata,
            analysis,
            expired_ignores: ignores.expired,
            verdict,
            duration_ms,
        })
    }
}

/// Hex SHA-256 of the raw report.
fn compute_report_digest(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
