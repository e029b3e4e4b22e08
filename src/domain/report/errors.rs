//! Error types for report navigation.

use thiserror::Error;

use crate::domain::foundation::ErrorCode;

use super::PageKind;

/// Errors produced while resolving a report query.
///
/// Every variant is recoverable: the orchestrator hands it back to the model
/// as a structured tool error so the next query can be adjusted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Path not found: '{path}' (segment '{segment}' does not resolve)")]
    PathNotFound { path: String, segment: String },

    #[error("Invalid filter on field '{field}': {reason}")]
    InvalidFilter { field: String, reason: String },

    #[error("Invalid cursor: {0}")]
    InvalidCursor(String),

    #[error("Value at '{path}' is a {actual} and cannot be paged")]
    NotPageable { path: String, actual: &'static str },

    #[error("Requested a {requested} page but the value at '{path}' is a {actual}")]
    PageKindMismatch {
        path: String,
        requested: PageKind,
        actual: &'static str,
    },

    #[error("Result at '{path}' exceeds {max_chars} characters even for a single element")]
    TooLarge {
        path: String,
        max_chars: usize,
        suggested_sub_paths: Vec<String>,
    },
}

impl ReportError {
    /// Returns the error code reported to the model.
    pub fn code(&self) -> ErrorCode {
        match self {
            ReportError::PathNotFound { .. } => ErrorCode::PathNotFound,
            ReportError::InvalidFilter { .. } => ErrorCode::InvalidFilter,
            ReportError::TooLarge { .. } => ErrorCode::TooLarge,
            ReportError::InvalidPath { .. }
            | ReportError::InvalidCursor(_)
            | ReportError::NotPageable { .. }
            | ReportError::PageKindMismatch { .. } => ErrorCode::InvalidArgument,
        }
    }

    /// Returns the narrower paths a caller could query instead, if any.
    pub fn suggested_sub_paths(&self) -> Option<&[String]> {
        match self {
            ReportError::TooLarge {
                suggested_sub_paths,
                ..
            } => Some(suggested_sub_paths),
            _ => None,
        }
    }

    pub(crate) fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_filter(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ReportError::InvalidFilter {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_taxonomy() {
        let not_found = ReportError::PathNotFound {
            path: "a.b".into(),
            segment: "b".into(),
        };
        assert_eq!(not_found.code(), ErrorCode::PathNotFound);
        assert_eq!(
            ReportError::invalid_filter("state", "missing").code(),
            ErrorCode::InvalidFilter
        );
        assert_eq!(
            ReportError::InvalidCursor("garbled".into()).code(),
            ErrorCode::InvalidArgument
        );
    }

    #[test]
    fn only_too_large_carries_sub_paths() {
        let err = ReportError::TooLarge {
            path: "heap".into(),
            max_chars: 100,
            suggested_sub_paths: vec!["heap.segments".into()],
        };
        assert_eq!(err.suggested_sub_paths().unwrap(), ["heap.segments".to_string()]);
        assert!(ReportError::invalid_path("", "x").suggested_sub_paths().is_none());
    }

    #[test]
    fn path_not_found_names_segment() {
        let err = ReportError::PathNotFound {
            path: "analysis.threads.none".into(),
            segment: "none".into(),
        };
        assert!(err.to_string().contains("segment 'none'"));
    }
}
