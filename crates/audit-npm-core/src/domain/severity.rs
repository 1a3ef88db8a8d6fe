//! Severity levels and their total order.
//!
//! npm reports severities as free-form lowercase strings. The ranking here is
//! case-insensitive and total: anything unrecognized ranks as [`Severity::Info`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// Advisory severity, ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Moderate,
    High,
    Critical,
}

impl Severity {
    /// All levels in ascending order.
    pub const ALL: [Severity; 5] = [
        Severity::Info,
        Severity::Low,
        Severity::Moderate,
        Severity::High,
        Severity::Critical,
    ];

    /// Look up a level by label, ignoring ASCII case.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.as_str().eq_ignore_ascii_case(label))
    }

    /// Like [`Severity::from_label`], but unknown labels become `Info`.
    pub fn from_label_lossy(label: &str) -> Self {
        Self::from_label(label).unwrap_or(Severity::Info)
    }

    /// Integer position in the order (`info` = 0 … `critical` = 4).
    pub fn rank(self) -> u8 {
        match self {
            Severity::Info => 0,
            Severity::Low => 1,
            Severity::Moderate => 2,
            Severity::High => 3,
            Severity::Critical => 4,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Moderate => "moderate",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rank a raw severity string. Never fails.
pub fn rank(severity: &str) -> u8 {
    Severity::from_label_lossy(severity).rank()
}
