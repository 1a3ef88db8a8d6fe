//! Time-bounded ignore list resolution.
//!
//! An ignore entry is either a bare id (never expires) or an `{id, until}`
//! record. A dated entry is active up to and including its `until` date and
//! expired from the following day. Resolution takes the reference date as an
//! argument; picking "today" belongs to the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One configured ignore entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum IgnoreEntry {
    /// `"CVE-2021-23337"`
    Id(String),
    /// `{ "id": "CVE-2021-23337", "until": "2025-06-30" }`
    Scoped {
        id: String,
        #[serde(default)]
        until: Option<NaiveDate>,
    },
}

impl IgnoreEntry {
    pub fn until_date(id: impl Into<String>, until: NaiveDate) -> Self {
        IgnoreEntry::Scoped {
            id: id.into(),
            until: Some(until),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            IgnoreEntry::Id(id) | IgnoreEntry::Scoped { id, .. } => id,
        }
    }

    pub fn until(&self) -> Option<NaiveDate> {
        match self {
            IgnoreEntry::Id(_) => None,
            IgnoreEntry::Scoped { until, .. } => *until,
        }
    }

    /// Active when undated or when `reference_date <= until`.
    pub fn is_active_on(&self, reference_date: NaiveDate) -> bool {
        self.until().map_or(true, |until| reference_date <= until)
    }
}

impl From<&str> for IgnoreEntry {
    fn from(id: &str) -> Self {
        IgnoreEntry::Id(id.to_string())
    }
}

impl From<String> for IgnoreEntry {
    fn from(id: String) -> Self {
        IgnoreEntry::Id(id)
    }
}

/// An entry whose `until` date has passed. Reported, never applied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpiredIgnore {
    pub id: String,
    pub until: NaiveDate,
}

/// Outcome of [`resolve_ignores`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct IgnoreResolution {
    /// Deduplicated ids to suppress.
    pub active: BTreeSet<String>,
    /// Expired entries in configuration order.
    pub expired: Vec<ExpiredIgnore>,
}

/// Split configured entries into the active id set and the expired list.
pub fn resolve_ignores(entries: &[IgnoreEntry], reference_date: NaiveDate) -> IgnoreResolution {
    let mut resolution = IgnoreResolution::default();

    for entry in entries {
        match entry.until() {
            Some(until) if !entry.is_active_on(reference_date) => {
                resolution.expired.push(ExpiredIgnore {
                    id: entry.id().to_string(),
                    until,
                });
            }
            _ => {
                resolution.active.insert(entry.id().to_string());
            }
        }
    }

    resolution
}
