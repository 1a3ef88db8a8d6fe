//! Classified outcome of applying policy to a [`crate::Report`].

use serde::{Deserialize, Serialize};

use super::report::Vulnerability;

/// A vulnerability that breaches the threshold and is not suppressed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportedVulnerability {
    pub name: String,
    pub vulnerability: Vulnerability,
}

/// A vulnerability suppressed because every one of its CVE ids is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IgnoredVulnerability {
    pub name: String,
    pub vulnerability: Vulnerability,
    /// The ignore ids that matched, in the vulnerability's CVE order.
    pub matched_cve_ids: Vec<String>,
}

/// Result of [`crate::analyze`].
///
/// Both lists follow report order. Entries below the threshold and transitive
/// placeholders appear in neither.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnalysisResult {
    pub reported: Vec<ReportedVulnerability>,
    pub ignored: Vec<IgnoredVulnerability>,
}

impl AnalysisResult {
    /// The sole pass/fail signal: anything left in `reported`.
    pub fn has_failures(&self) -> bool {
        !self.reported.is_empty()
    }

    pub fn reported_names(&self) -> Vec<&str> {
        self.reported.iter().map(|r| r.name.as_str()).collect()
    }

    pub fn ignored_names(&self) -> Vec<&str> {
        self.ignored.iter().map(|i| i.name.as_str()).collect()
    }
}
