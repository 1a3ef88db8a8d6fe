//! Normalized vulnerability report.
//!
//! Built once per run by [`crate::parser::parse_report`] and never mutated
//! afterwards. Package order follows the order of the source document.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// One security advisory attached to a vulnerable package.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Advisory {
    /// GitHub advisory id (`GHSA-xxxx-xxxx-xxxx`), empty when unknown.
    pub ghsa_id: String,
    /// CVE ids in source order. May be empty.
    pub cve_ids: Vec<String>,
    pub title: String,
    pub url: String,
    pub severity: String,
    /// Affected version range expression.
    pub range: String,
}

/// Whether upgrading resolves the vulnerability.
///
/// npm emits either a boolean or an object describing the upgrade (usually a
/// semver-major bump). Any object counts as [`FixAvailability::Available`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FixAvailability {
    Available,
    Unavailable,
    #[default]
    Unknown,
}

impl From<Option<bool>> for FixAvailability {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => FixAvailability::Available,
            Some(false) => FixAvailability::Unavailable,
            None => FixAvailability::Unknown,
        }
    }
}

impl fmt::Display for FixAvailability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FixAvailability::Available => "fix available",
            FixAvailability::Unavailable => "no fix",
            FixAvailability::Unknown => "unknown",
        })
    }
}

/// One package's entry in the report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Vulnerability {
    pub name: String,
    pub severity: String,
    pub is_direct: bool,
    /// Advisories attached directly to this package.
    ///
    /// Empty when every `via` element named another package: the entry is then
    /// only a pointer to where the real advisory lives.
    pub advisories: Vec<Advisory>,
    /// Downstream packages affected through this one.
    pub effects: Vec<String>,
    pub range: String,
    pub fix_available: FixAvailability,
}

impl Vulnerability {
    /// True when the entry carries no advisory of its own.
    pub fn is_transitive_placeholder(&self) -> bool {
        self.advisories.is_empty()
    }

    /// Every non-empty CVE id across all advisories, in order, duplicates kept.
    pub fn cve_ids(&self) -> Vec<&str> {
        self.advisories
            .iter()
            .flat_map(|a| a.cve_ids.iter())
            .map(String::as_str)
            .filter(|id| !id.is_empty())
            .collect()
    }

    /// Non-empty GHSA ids, one per advisory that has one.
    pub fn ghsa_ids(&self) -> Vec<&str> {
        self.advisories
            .iter()
            .map(|a| a.ghsa_id.as_str())
            .filter(|id| !id.is_empty())
            .collect()
    }
}

/// Aggregate counts from the report's `metadata.vulnerabilities` section.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportMetadata {
    /// Declared total when present, otherwise the sum of the per-severity counts.
    pub total_vulnerabilities: u64,
    /// Per-severity counts. Never contains a `total` key.
    pub severity_counts: BTreeMap<String, u64>,
}

/// Parsed audit report.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Report {
    /// Keyed by package name, in document order.
    pub vulnerabilities: IndexMap<String, Vulnerability>,
    pub metadata: ReportMetadata,
}

impl Report {
    pub fn is_empty(&self) -> bool {
        self.vulnerabilities.is_empty()
    }
}
