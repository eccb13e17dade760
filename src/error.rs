//! Error types for scamguard modules using thiserror.

use std::fmt;

use thiserror::Error;

/// Maximum number of characters of upstream text kept inside an error.
const DIAGNOSTIC_LIMIT: usize = 2000;

/// Errors from the remote completion call.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("Request to model endpoint failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Model endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Model endpoint returned an undecodable envelope: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("No candidates returned from model endpoint")]
    NoCandidates,

    #[error("First candidate carried no text part")]
    EmptyCompletion,
}

/// What went wrong with a single field during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    Missing,
    WrongType { expected: &'static str },
    OutOfRange { expected: &'static str },
    Empty,
    UnknownLiteral { allowed: &'static [&'static str] },
}

/// A validation failure pinned to the JSON path of the offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub path: String,
    pub kind: IssueKind,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, kind: IssueKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            IssueKind::Missing => write!(f, "`{}` is missing", self.path),
            IssueKind::WrongType { expected } => {
                write!(f, "`{}` has the wrong type (expected {})", self.path, expected)
            }
            IssueKind::OutOfRange { expected } => {
                write!(f, "`{}` is outside {}", self.path, expected)
            }
            IssueKind::Empty => write!(f, "`{}` is empty", self.path),
            IssueKind::UnknownLiteral { allowed } => {
                write!(f, "`{}` must be one of {}", self.path, allowed.join(", "))
            }
        }
    }
}

/// Errors from a single analysis request.
///
/// All four kinds are terminal for the request. The raw completion is kept
/// for logging and is never part of [`AnalysisError::user_message`].
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Analysis unavailable: {0}")]
    UpstreamCallFailed(#[source] UpstreamError),

    #[error("No JSON payload found in completion")]
    NoJsonPayloadFound { raw: String },

    #[error("Completion contained malformed JSON: {source}")]
    MalformedJson {
        #[source]
        source: serde_json::Error,
        raw: String,
    },

    #[error("Completion JSON is incomplete: {issue}")]
    IncompleteResult { issue: ValidationIssue, raw: String },
}

impl AnalysisError {
    pub(crate) fn no_payload(raw: &str) -> Self {
        AnalysisError::NoJsonPayloadFound {
            raw: truncate_for_diagnostics(raw),
        }
    }

    pub(crate) fn malformed(source: serde_json::Error, raw: &str) -> Self {
        AnalysisError::MalformedJson {
            source,
            raw: truncate_for_diagnostics(raw),
        }
    }

    pub(crate) fn incomplete(issue: ValidationIssue, raw: &str) -> Self {
        AnalysisError::IncompleteResult {
            issue,
            raw: truncate_for_diagnostics(raw),
        }
    }

    /// Short label for the failure kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::UpstreamCallFailed(_) => "upstream_call_failed",
            AnalysisError::NoJsonPayloadFound { .. } => "no_json_payload_found",
            AnalysisError::MalformedJson { .. } => "malformed_json",
            AnalysisError::IncompleteResult { .. } => "incomplete_result",
        }
    }

    /// Text that is safe to show an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalysisError::UpstreamCallFailed(_) => "Analysis unavailable. Please try again later.",
            AnalysisError::NoJsonPayloadFound { .. }
            | AnalysisError::MalformedJson { .. }
            | AnalysisError::IncompleteResult { .. } => {
                "Could not interpret the analysis. Please try again."
            }
        }
    }

    /// The completion text that failed to validate, if one was received.
    pub fn raw_completion(&self) -> Option<&str> {
        match self {
            AnalysisError::UpstreamCallFailed(_) => None,
            AnalysisError::NoJsonPayloadFound { raw }
            | AnalysisError::MalformedJson { raw, .. }
            | AnalysisError::IncompleteResult { raw, .. } => Some(raw),
        }
    }

    /// Only upstream failures are worth retrying; the rest are content problems.
    pub fn is_upstream(&self) -> bool {
        matches!(self, AnalysisError::UpstreamCallFailed(_))
    }
}

impl From<UpstreamError> for AnalysisError {
    fn from(err: UpstreamError) -> Self {
        AnalysisError::UpstreamCallFailed(err)
    }
}

/// Errors from configuration resolution.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error(
        "No API key configured. Set SCAMGUARD_API_KEY (or GEMINI_API_KEY), or point SCAMGUARD_API_URL at a proxy that holds the key"
    )]
    MissingApiKey,

    #[error("Invalid API URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Refusing to send the API key over plain http to '{url}'. Use https for non-local endpoints")]
    InsecureUrl { url: String },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Errors from caller-side input gating.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum InputError {
    #[error("Message too short. Please enter at least {min} characters.")]
    TooShort { min: usize },

    #[error("Message too long. Please limit to {max} characters.")]
    TooLong { max: usize },
}

/// Cut text to the diagnostic limit on a char boundary.
pub(crate) fn truncate_for_diagnostics(text: &str) -> String {
    match text.char_indices().nth(DIAGNOSTIC_LIMIT) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message_hides_raw_text() {
        let err = AnalysisError::no_payload("secret model chatter");
        assert!(!err.user_message().contains("secret"));
        assert_eq!(err.raw_completion(), Some("secret model chatter"));
    }

    #[test]
    fn test_upstream_error_is_retryable_kind() {
        let err = AnalysisError::from(UpstreamError::NoCandidates);
        assert!(err.is_upstream());
        assert_eq!(err.kind(), "upstream_call_failed");
        assert!(err.raw_completion().is_none());
    }

    #[test]
    fn test_validation_issue_display_names_path() {
        let issue = ValidationIssue::new(
            "linguisticAnalysis.urgencyLevel",
            IssueKind::OutOfRange { expected: "0..=100" },
        );
        assert_eq!(
            issue.to_string(),
            "`linguisticAnalysis.urgencyLevel` is outside 0..=100"
        );
    }

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate_for_diagnostics("abc"), "abc");
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let long = "é".repeat(DIAGNOSTIC_LIMIT + 10);
        let cut = truncate_for_diagnostics(&long);
        assert_eq!(cut.chars().count(), DIAGNOSTIC_LIMIT + 1);
        assert!(cut.ends_with('…'));
    }
}
