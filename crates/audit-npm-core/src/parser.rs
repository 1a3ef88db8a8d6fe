//! `npm audit --json` report parser.
//!
//! The audit document is loosely typed: `via` mixes advisory objects with
//! package-name strings, `fixAvailable` is either a boolean or an object, and
//! the GHSA id moved from the URL into its own field in npm 9. Each such field
//! is decoded by inspecting its shape first and falling back to a default when
//! the shape is unrecognized, so only structurally required fields can fail a
//! parse.
//!
//! Required per entry: `severity`, `isDirect`, `range`, `via`.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use crate::domain::error::{ReportError, Result};
use crate::domain::report::{Advisory, FixAvailability, Report, ReportMetadata, Vulnerability};

const GHSA_PREFIX: &str = "GHSA-";
const DEFAULT_SEVERITY: &str = "info";
const TOTAL_KEY: &str = "total";

/// Parse raw audit output into a [`Report`].
///
/// Callers must not pass empty output; an empty audit run is an upstream
/// failure, not a malformed report.
pub fn parse_report(raw: &str) -> Result<Report> {
    let root: Value = serde_json::from_str(raw)?;
    let root = root.as_object().ok_or(ReportError::NotAnObject)?;

    if let Some(error) = root.get("error").and_then(Value::as_object) {
        return Err(tool_error(error));
    }

    let mut vulnerabilities = IndexMap::new();
    match root.get("vulnerabilities") {
        None | Some(Value::Null) => {}
        Some(Value::Object(entries)) => {
            for (name, entry) in entries {
                let vulnerability = parse_vulnerability(name, entry)?;
                vulnerabilities.insert(name.clone(), vulnerability);
            }
        }
        Some(_) => {
            return Err(ReportError::InvalidSection {
                section: "vulnerabilities",
                expected: "an object",
            })
        }
    }

    let metadata = parse_metadata(root);

    tracing::debug!(
        packages = vulnerabilities.len(),
        total = metadata.total_vulnerabilities,
        "parsed audit report"
    );

    Ok(Report {
        vulnerabilities,
        metadata,
    })
}

fn tool_error(error: &Map<String, Value>) -> ReportError {
    ReportError::ToolReported {
        code: non_empty_str(error, "code").unwrap_or("unknown").to_string(),
        summary: non_empty_str(error, "summary")
            .or_else(|| non_empty_str(error, "detail"))
            .unwrap_or("")
            .to_string(),
    }
}

// ---------------------------------------------------------------------------
// Field shapes
// ---------------------------------------------------------------------------

/// One element of an entry's `via` list.
enum ViaEntry<'a> {
    /// An advisory attached to this package.
    Advisory(&'a Map<String, Value>),
    /// The name of another package that carries the advisory.
    Package,
    Unrecognized,
}

impl<'a> ViaEntry<'a> {
    fn classify(value: &'a Value) -> Self {
        match value {
            Value::Object(advisory) => ViaEntry::Advisory(advisory),
            Value::String(_) => ViaEntry::Package,
            _ => ViaEntry::Unrecognized,
        }
    }
}

fn fix_availability(value: Option<&Value>) -> FixAvailability {
    match value {
        // An object describes the upgrade, which means one exists.
        Some(Value::Object(_)) => FixAvailability::Available,
        other => FixAvailability::from(other.and_then(Value::as_bool)),
    }
}

fn non_empty_str<'a>(object: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    object
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

fn string_or<'a>(object: &'a Map<String, Value>, key: &str, default: &'a str) -> String {
    non_empty_str(object, key).unwrap_or(default).to_string()
}

fn string_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn required<'a>(
    entry: &'a Map<String, Value>,
    package: &str,
    field: &'static str,
) -> Result<&'a Value> {
    entry.get(field).ok_or_else(|| ReportError::MissingField {
        package: package.to_string(),
        field,
    })
}

// ---------------------------------------------------------------------------
// Entries
// ---------------------------------------------------------------------------

fn parse_vulnerability(name: &str, value: &Value) -> Result<Vulnerability> {
    let entry = value.as_object().ok_or_else(|| ReportError::InvalidEntry {
        package: name.to_string(),
    })?;

    let severity = required(entry, name, "severity")?
        .as_str()
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SEVERITY)
        .to_string();

    let is_direct = required(entry, name, "isDirect")?
        .as_bool()
        .ok_or_else(|| ReportError::InvalidField {
            package: name.to_string(),
            field: "isDirect",
            expected: "a boolean",
        })?;

    let range = required(entry, name, "range")?
        .as_str()
        .unwrap_or("")
        .to_string();

    let via = required(entry, name, "via")?
        .as_array()
        .ok_or_else(|| ReportError::InvalidField {
            package: name.to_string(),
            field: "via",
            expected: "an array",
        })?;

    let mut advisories = Vec::new();
    for item in via {
        match ViaEntry::classify(item) {
            ViaEntry::Advisory(advisory) => advisories.push(parse_advisory(advisory)),
            ViaEntry::Package => {}
            ViaEntry::Unrecognized => {
                tracing::debug!(package = %name, "ignoring unrecognized via element");
            }
        }
    }

    Ok(Vulnerability {
        name: name.to_string(),
        severity,
        is_direct,
        advisories,
        effects: string_list(entry.get("effects")),
        range,
        fix_available: fix_availability(entry.get("fixAvailable")),
    })
}

fn parse_advisory(advisory: &Map<String, Value>) -> Advisory {
    let url = string_or(advisory, "url", "");
    let ghsa_id = non_empty_str(advisory, "github_advisory_id")
        .map(str::to_string)
        .unwrap_or_else(|| ghsa_from_url(&url));

    Advisory {
        ghsa_id,
        cve_ids: string_list(advisory.get("cves")),
        title: string_or(advisory, "title", ""),
        severity: string_or(advisory, "severity", DEFAULT_SEVERITY),
        range: string_or(advisory, "range", ""),
        url,
    }
}

/// Extract `GHSA-…` from `https://github.com/advisories/GHSA-…`.
fn ghsa_from_url(url: &str) -> String {
    url.rsplit_once('/')
        .map(|(_, segment)| segment)
        .filter(|segment| segment.starts_with(GHSA_PREFIX))
        .unwrap_or("")
        .to_string()
}

fn parse_metadata(root: &Map<String, Value>) -> ReportMetadata {
    let Some(counts) = root
        .get("metadata")
        .and_then(|m| m.get("vulnerabilities"))
        .and_then(Value::as_object)
    else {
        return ReportMetadata::default();
    };

    let mut severity_counts = BTreeMap::new();
    let mut declared_total = None;
    for (key, value) in counts {
        let Some(count) = value.as_u64() else {
            tracing::debug!(key = %key, "skipping non-integer metadata count");
            continue;
        };
        if key == TOTAL_KEY {
            declared_total = Some(count);
        } else {
            severity_counts.insert(key.clone(), count);
        }
    }

    let total_vulnerabilities = declared_total.unwrap_or_else(|| {
        severity_counts
            .values()
            .fold(0u64, |total, count| total.saturating_add(*count))
    });
    ReportMetadata {
        total_vulnerabilities,
        severity_counts,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(extra: Value) -> Value {
        let mut base = json!({
            "name": "pkg",
            "severity": "high",
            "isDirect": false,
            "via": [],
            "effects": [],
            "range": "<1.0.0",
        });
        if let (Some(base), Some(extra)) = (base.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                base.insert(k.clone(), v.clone());
            }
        }
        base
    }

    fn parse_entry(value: Value) -> Result<Vulnerability> {
        let doc = json!({ "vulnerabilities": { "pkg": value } });
        parse_report(&doc.to_string()).map(|r| r.vulnerabilities["pkg"].clone())
    }

    #[test]
    fn test_ghsa_from_url() {
        assert_eq!(
            ghsa_from_url("https://github.com/advisories/GHSA-35jh-r3h4-6jhm"),
            "GHSA-35jh-r3h4-6jhm"
        );
        assert_eq!(ghsa_from_url("https://npmjs.com/advisories/1523"), "");
        assert_eq!(ghsa_from_url("GHSA-no-slash"), "");
        assert_eq!(ghsa_from_url(""), "");
        assert_eq!(ghsa_from_url("https://example.com/ghsa-lower"), "");
    }

    #[test]
    fn test_explicit_ghsa_field_wins_over_url() {
        let v = parse_entry(entry(json!({
            "via": [{
                "github_advisory_id": "GHSA-aaaa-bbbb-cccc",
                "url": "https://github.com/advisories/GHSA-zzzz-zzzz-zzzz",
            }]
        })))
        .unwrap();
        assert_eq!(v.advisories[0].ghsa_id, "GHSA-aaaa-bbbb-cccc");
    }

    #[test]
    fn test_empty_ghsa_field_falls_back_to_url() {
        let v = parse_entry(entry(json!({
            "via": [{
                "github_advisory_id": "",
                "url": "https://github.com/advisories/GHSA-zzzz-zzzz-zzzz",
            }]
        })))
        .unwrap();
        assert_eq!(v.advisories[0].ghsa_id, "GHSA-zzzz-zzzz-zzzz");
    }

    #[test]
    fn test_via_strings_are_dropped_objects_kept_in_order() {
        let v = parse_entry(entry(json!({
            "via": [
                "minimist",
                { "title": "first", "cves": ["CVE-1"] },
                42,
                { "title": "second" },
            ]
        })))
        .unwrap();
        let titles: Vec<&str> = v.advisories.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, vec!["first", "second"]);
    }

    #[test]
    fn test_advisory_defaults() {
        let v = parse_entry(entry(json!({ "via": [{}] }))).unwrap();
        let a = &v.advisories[0];
        assert_eq!(a.title, "");
        assert_eq!(a.url, "");
        assert_eq!(a.severity, "info");
        assert_eq!(a.range, "");
        assert_eq!(a.ghsa_id, "");
        assert!(a.cve_ids.is_empty());
    }

    #[test]
    fn test_cves_skip_null_and_empty_keep_duplicates() {
        let v = parse_entry(entry(json!({
            "via": [{ "cves": ["CVE-2", null, "", "CVE-1", "CVE-2"] }]
        })))
        .unwrap();
        assert_eq!(v.advisories[0].cve_ids, vec!["CVE-2", "CVE-1", "CVE-2"]);
    }

    #[test]
    fn test_fix_available_shapes() {
        let cases = [
            (json!({ "fixAvailable": true }), FixAvailability::Available),
            (json!({ "fixAvailable": false }), FixAvailability::Unavailable),
            (
                json!({
                    "fixAvailable": { "name": "x", "version": "2.0.0", "isSemVerMajor": true }
                }),
                FixAvailability::Available,
            ),
            (json!({ "fixAvailable": null }), FixAvailability::Unknown),
            (json!({}), FixAvailability::Unknown),
        ];
        for (extra, expected) in cases {
            let v = parse_entry(entry(extra)).unwrap();
            assert_eq!(v.fix_available, expected);
        }
    }

    #[test]
    fn test_null_severity_defaults_to_info() {
        let v = parse_entry(entry(json!({ "severity": null }))).unwrap();
        assert_eq!(v.severity, "info");
        let v = parse_entry(entry(json!({ "severity": "" }))).unwrap();
        assert_eq!(v.severity, "info");
    }

    #[test]
    fn test_null_range_defaults_to_empty() {
        let v = parse_entry(entry(json!({ "range": null }))).unwrap();
        assert_eq!(v.range, "");
    }

    #[test]
    fn test_missing_required_fields() {
        for field in ["severity", "isDirect", "range", "via"] {
            let mut value = entry(json!({}));
            value.as_object_mut().unwrap().remove(field);
            match parse_entry(value) {
                Err(ReportError::MissingField { package, field: f }) => {
                    assert_eq!(package, "pkg");
                    assert_eq!(f, field);
                }
                other => panic!("expected MissingField for {field}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_wrong_shapes_for_required_fields() {
        let err = parse_entry(entry(json!({ "isDirect": "yes" }))).unwrap_err();
        assert!(matches!(err, ReportError::InvalidField { field: "isDirect", .. }));

        let err = parse_entry(entry(json!({ "via": "lodash" }))).unwrap_err();
        assert!(matches!(err, ReportError::InvalidField { field: "via", .. }));

        let err = parse_entry(json!("not an object")).unwrap_err();
        assert!(matches!(err, ReportError::InvalidEntry { .. }));
    }

    #[test]
    fn test_effects_default_and_filtering() {
        let v = parse_entry(entry(json!({ "effects": null }))).unwrap();
        assert!(v.effects.is_empty());
        let v = parse_entry(entry(json!({ "effects": ["a", 1, "b"] }))).unwrap();
        assert_eq!(v.effects, vec!["a", "b"]);
    }

    #[test]
    fn test_invalid_documents() {
        assert!(matches!(
            parse_report("not json"),
            Err(ReportError::InvalidJson(_))
        ));
        assert!(matches!(parse_report("[]"), Err(ReportError::NotAnObject)));
        assert!(matches!(
            parse_report(r#"{"vulnerabilities": []}"#),
            Err(ReportError::InvalidSection { .. })
        ));
    }

    #[test]
    fn test_tool_error_document() {
        let raw = r#"{"error": {"code": "ENOLOCK", "summary": "requires a lockfile", "detail": "run npm i"}}"#;
        match parse_report(raw) {
            Err(ReportError::ToolReported { code, summary }) => {
                assert_eq!(code, "ENOLOCK");
                assert_eq!(summary, "requires a lockfile");
            }
            other => panic!("expected ToolReported, got {other:?}"),
        }
    }

    #[test]
    fn test_metadata_declared_total_overrides_sum() {
        let raw = json!({
            "vulnerabilities": {},
            "metadata": { "vulnerabilities": { "low": 1, "high": 2, "total": 10 } }
        });
        let report = parse_report(&raw.to_string()).unwrap();
        assert_eq!(report.metadata.total_vulnerabilities, 10);
        assert!(!report.metadata.severity_counts.contains_key("total"));
        assert_eq!(report.metadata.severity_counts["high"], 2);
    }

    #[test]
    fn test_metadata_sum_without_total() {
        let raw = json!({
            "metadata": { "vulnerabilities": { "low": 1, "high": 2, "odd": "x" } }
        });
        let report = parse_report(&raw.to_string()).unwrap();
        assert_eq!(report.metadata.total_vulnerabilities, 3);
        assert_eq!(report.metadata.severity_counts.len(), 2);
    }

    #[test]
    fn test_metadata_huge_counts_do_not_overflow() {
        let raw = r#"{"metadata":{"vulnerabilities":{"low":18446744073709551615,"high":1,"total":5}}}"#;
        let report = parse_report(raw).unwrap();
        assert_eq!(report.metadata.total_vulnerabilities, 5);
        assert_eq!(report.metadata.severity_counts["low"], u64::MAX);

        let raw = r#"{"metadata":{"vulnerabilities":{"low":18446744073709551615,"high":1}}}"#;
        let report = parse_report(raw).unwrap();
        assert_eq!(report.metadata.total_vulnerabilities, u64::MAX);
    }

    #[test]
    fn test_absent_sections_yield_empty_report() {
        let report = parse_report("{}").unwrap();
        assert!(report.is_empty());
        assert_eq!(report.metadata, ReportMetadata::default());
    }
}
