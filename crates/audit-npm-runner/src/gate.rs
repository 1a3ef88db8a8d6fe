//! Pass/fail gate over an [`AnalysisResult`].

use audit_npm_core::AnalysisResult;
use serde::{Deserialize, Serialize};

/// Gate evaluation verdict.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GateVerdict {
    /// Whether the gate passed.
    pub passed: bool,

    /// One line per reported vulnerability (empty if passed).
    pub violations: Vec<String>,

    /// Summary message.
    pub message: String,
}

impl GateVerdict {
    /// Process exit status for this verdict.
    pub fn exit_code(&self) -> i32 {
        if self.passed {
            0
        } else {
            1
        }
    }
}

/// Audit gate evaluation rules.
pub struct AuditGate;

impl AuditGate {
    /// The gate fails iff anything was reported. Ignored entries never fail it.
    pub fn evaluate(result: &AnalysisResult) -> GateVerdict {
        let violations: Vec<String> = result
            .reported
            .iter()
            .map(|r| {
                let vuln = &r.vulnerability;
                let cves = vuln.cve_ids();
                if cves.is_empty() {
                    format!("{} ({})", r.name, vuln.severity)
                } else {
                    format!("{} ({}): {}", r.name, vuln.severity, cves.join(", "))
                }
            })
            .collect();

        let passed = !result.has_failures();
        let message = if passed {
            "npm audit passed: no vulnerabilities above threshold".to_string()
        } else {
            format!(
                "npm audit failed: {} vulnerabilities found above threshold",
                violations.len()
            )
        };

        GateVerdict {
            passed,
            violations,
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use audit_npm_core::{
        Advisory, FixAvailability, IgnoredVulnerability, ReportedVulnerability, Vulnerability,
    };

    fn vuln(name: &str, severity: &str, cves: &[&str]) -> Vulnerability {
        Vulnerability {
            name: name.to_string(),
            severity: severity.to_string(),
            is_direct: true,
            advisories: vec![Advisory {
                ghsa_id: String::new(),
                cve_ids: cves.iter().map(|c| c.to_string()).collect(),
                title: String::new(),
                url: String::new(),
                severity: severity.to_string(),
                range: String::new(),
            }],
            effects: vec![],
            range: String::new(),
            fix_available: FixAvailability::Unknown,
        }
    }

    #[test]
    fn test_empty_result_passes() {
        let verdict = AuditGate::evaluate(&AnalysisResult::default());
        assert!(verdict.passed);
        assert!(verdict.violations.is_empty());
        assert_eq!(verdict.exit_code(), 0);
    }

    #[test]
    fn test_ignored_only_passes() {
        let result = AnalysisResult {
            reported: vec![],
            ignored: vec![IgnoredVulnerability {
                name: "lodash".to_string(),
                vulnerability: vuln("lodash", "critical", &["CVE-1"]),
                matched_cve_ids: vec!["CVE-1".to_string()],
            }],
        };
        let verdict = AuditGate::evaluate(&result);
        assert!(verdict.passed);
        assert_eq!(verdict.exit_code(), 0);
    }

    #[test]
    fn test_reported_fails() {
        let result = AnalysisResult {
            reported: vec![
                ReportedVulnerability {
                    name: "lodash".to_string(),
                    vulnerability: vuln("lodash", "critical", &["CVE-2021-23337"]),
                },
                ReportedVulnerability {
                    name: "url-only".to_string(),
                    vulnerability: vuln("url-only", "high", &[]),
                },
            ],
            ignored: vec![],
        };
        let verdict = AuditGate::evaluate(&result);
        assert!(!verdict.passed);
        assert_eq!(verdict.exit_code(), 1);
        assert_eq!(
            verdict.violations,
            vec!["lodash (critical): CVE-2021-23337", "url-only (high)"]
        );
        assert!(verdict.message.contains("2 vulnerabilities"));
    }
}
