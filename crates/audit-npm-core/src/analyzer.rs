//! Threshold and ignore-list classification.
//!
//! Each report entry ends up in exactly one of three places:
//! - skipped: a transitive placeholder, or below the severity threshold
//! - ignored: every one of its CVE ids is in the active ignore set
//! - reported: everything else
//!
//! Ignoring is all-or-nothing and CVE-scoped. A partial match is still
//! reported, and an entry without CVE ids can never be ignored.

use std::collections::BTreeSet;

use crate::domain::analysis::{AnalysisResult, IgnoredVulnerability, ReportedVulnerability};
use crate::domain::report::Report;
use crate::domain::severity;

/// Classify every entry of `report`. Output order follows report order.
pub fn analyze(
    report: &Report,
    severity_threshold: &str,
    active_ignores: &BTreeSet<String>,
) -> AnalysisResult {
    let threshold = severity::rank(severity_threshold);
    let mut result = AnalysisResult::default();

    for (name, vuln) in &report.vulnerabilities {
        // The advisory is attributed to another package's own entry.
        if vuln.is_transitive_placeholder() {
            tracing::debug!(package = %name, "skipping transitive placeholder");
            continue;
        }

        if severity::rank(&vuln.severity) < threshold {
            tracing::debug!(package = %name, severity = %vuln.severity, "below threshold");
            continue;
        }

        let cve_ids = vuln.cve_ids();
        let matched: Vec<String> = cve_ids
            .iter()
            .filter(|id| active_ignores.contains(**id))
            .map(|id| id.to_string())
            .collect();

        if !cve_ids.is_empty() && matched.len() == cve_ids.len() {
            result.ignored.push(IgnoredVulnerability {
                name: name.clone(),
                vulnerability: vuln.clone(),
                matched_cve_ids: matched,
            });
        } else {
            result.reported.push(ReportedVulnerability {
                name: name.clone(),
                vulnerability: vuln.clone(),
            });
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::{Advisory, FixAvailability, Vulnerability};

    fn advisory(cves: &[&str]) -> Advisory {
        Advisory {
            ghsa_id: String::new(),
            cve_ids: cves.iter().map(|c| c.to_string()).collect(),
            title: String::new(),
            url: String::new(),
            severity: "high".to_string(),
            range: String::new(),
        }
    }

    fn report(entries: Vec<(&str, &str, Vec<Advisory>)>) -> Report {
        let mut report = Report::default();
        for (name, severity, advisories) in entries {
            report.vulnerabilities.insert(
                name.to_string(),
                Vulnerability {
                    name: name.to_string(),
                    severity: severity.to_string(),
                    is_direct: true,
                    advisories,
                    effects: vec![],
                    range: String::new(),
                    fix_available: FixAvailability::Unknown,
                },
            );
        }
        report
    }

    fn ignores(ids: &[&str]) -> BTreeSet<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_empty_report_passes() {
        let result = analyze(&Report::default(), "moderate", &ignores(&[]));
        assert!(result.reported.is_empty());
        assert!(result.ignored.is_empty());
        assert!(!result.has_failures());
    }

    #[test]
    fn test_placeholder_never_surfaces() {
        let r = report(vec![("mkdirp", "critical", vec![])]);
        let result = analyze(&r, "info", &ignores(&[]));
        assert!(!result.has_failures());
        assert!(result.ignored.is_empty());
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let r = report(vec![
            ("a", "low", vec![advisory(&[])]),
            ("b", "moderate", vec![advisory(&[])]),
            ("c", "high", vec![advisory(&[])]),
        ]);
        let result = analyze(&r, "moderate", &ignores(&[]));
        assert_eq!(result.reported_names(), vec!["b", "c"]);
    }

    #[test]
    fn test_unknown_threshold_ranks_as_info() {
        let r = report(vec![("a", "info", vec![advisory(&[])])]);
        let result = analyze(&r, "bogus", &ignores(&[]));
        assert_eq!(result.reported_names(), vec!["a"]);
    }

    #[test]
    fn test_all_cves_ignored_moves_to_ignored() {
        let r = report(vec![(
            "x",
            "high",
            vec![advisory(&["CVE-A"]), advisory(&["CVE-B"])],
        )]);
        let result = analyze(&r, "low", &ignores(&["CVE-B", "CVE-A"]));
        assert!(result.reported.is_empty());
        assert_eq!(result.ignored.len(), 1);
        assert_eq!(result.ignored[0].matched_cve_ids, vec!["CVE-A", "CVE-B"]);
    }

    #[test]
    fn test_partial_match_is_reported() {
        let r = report(vec![(
            "x",
            "high",
            vec![advisory(&["CVE-A"]), advisory(&["CVE-B"])],
        )]);
        let result = analyze(&r, "low", &ignores(&["CVE-A"]));
        assert_eq!(result.reported_names(), vec!["x"]);
        assert!(result.ignored.is_empty());
    }

    #[test]
    fn test_entry_without_cves_cannot_be_ignored() {
        let mut adv = advisory(&[]);
        adv.ghsa_id = "GHSA-aaaa-bbbb-cccc".to_string();
        let r = report(vec![("x", "high", vec![adv])]);
        let result = analyze(&r, "low", &ignores(&["GHSA-aaaa-bbbb-cccc", ""]));
        assert_eq!(result.reported_names(), vec!["x"]);
    }

    #[test]
    fn test_duplicate_cves_all_must_match() {
        let r = report(vec![(
            "x",
            "high",
            vec![advisory(&["CVE-A"]), advisory(&["CVE-A"])],
        )]);
        let result = analyze(&r, "low", &ignores(&["CVE-A"]));
        assert_eq!(result.ignored.len(), 1);
        assert_eq!(result.ignored[0].matched_cve_ids, vec!["CVE-A", "CVE-A"]);
    }

    #[test]
    fn test_below_threshold_is_neither_reported_nor_ignored() {
        let r = report(vec![("x", "low", vec![advisory(&["CVE-A"])])]);
        let result = analyze(&r, "high", &ignores(&["CVE-A"]));
        assert!(result.reported.is_empty());
        assert!(result.ignored.is_empty());
    }
}
