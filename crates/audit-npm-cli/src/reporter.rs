//! Human-readable rendering of an [`AuditOutcome`].

use audit_npm_core::{rank, Vulnerability};
use audit_npm_runner::AuditOutcome;

/// Render the outcome as plain text, one line per entry.
pub fn render_text(outcome: &AuditOutcome) -> String {
    let mut lines = Vec::new();
    let analysis = &outcome.analysis;

    if !analysis.ignored.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Ignored vulnerabilities ({}):",
            analysis.ignored.len()
        ));
        for item in &analysis.ignored {
            lines.push(format!(
                "  {} | {} | {} | ignored: {}",
                item.vulnerability.severity.to_uppercase(),
                item.name,
                item.vulnerability.range,
                item.matched_cve_ids.join(", "),
            ));
        }
    }

    if !analysis.reported.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Vulnerabilities found ({}):",
            analysis.reported.len()
        ));

        // Stable sort keeps report order within a severity.
        let mut sorted: Vec<_> = analysis.reported.iter().collect();
        sorted.sort_by_key(|r| std::cmp::Reverse(rank(&r.vulnerability.severity)));

        for item in sorted {
            let vuln = &item.vulnerability;
            lines.push(format!(
                "  {} | {} | {} | {} | {} | {}",
                vuln.severity.to_uppercase(),
                item.name,
                if vuln.is_direct { "direct" } else { "transitive" },
                vuln.fix_available,
                vuln.range,
                id_display(vuln),
            ));
        }
    }

    if !outcome.expired_ignores.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Expired ignore entries ({}):",
            outcome.expired_ignores.len()
        ));
        for expired in &outcome.expired_ignores {
            lines.push(format!("  {} (expired {})", expired.id, expired.until));
        }
    }

    lines.push(String::new());
    lines.push(outcome.verdict.message.clone());

    lines.join("\n")
}

/// CVE ids, else GHSA ids, else `no ID`.
fn id_display(vuln: &Vulnerability) -> String {
    let cves = vuln.cve_ids();
    if !cves.is_empty() {
        return cves.join(", ");
    }
    let ghsas = vuln.ghsa_ids();
    if !ghsas.is_empty() {
        return ghsas.join(", ");
    }
    "no ID".to_string()
}
