//! Report parsing error taxonomy.

/// Raised when audit output cannot be turned into a [`crate::Report`].
///
/// Every variant except [`ReportError::ToolReported`] means the document is
/// malformed. None of them are retried: the input is fixed, so the outcome is too.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("malformed audit report: invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("malformed audit report: top-level value is not an object")]
    NotAnObject,

    #[error("malformed audit report: section `{section}` is not {expected}")]
    InvalidSection {
        section: &'static str,
        expected: &'static str,
    },

    #[error("malformed audit report: entry for `{package}` is not an object")]
    InvalidEntry { package: String },

    #[error("malformed audit report: `{package}` is missing required field `{field}`")]
    MissingField {
        package: String,
        field: &'static str,
    },

    #[error("malformed audit report: `{package}` field `{field}` is not {expected}")]
    InvalidField {
        package: String,
        field: &'static str,
        expected: &'static str,
    },

    #[error("audit tool reported an error ({code}): {summary}")]
    ToolReported { code: String, summary: String },
}

/// Result type for report parsing.
pub type Result<T> = std::result::Result<T, ReportError>;
