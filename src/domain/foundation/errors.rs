//! Error types for the domain layer.

use std::fmt;

use serde::{Serialize, Serializer};
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Machine-readable error codes surfaced to the model in tool results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Report navigation
    PathNotFound,
    InvalidFilter,
    TooLarge,

    // Session registries
    LedgerFull,
    HypothesisNotFound,

    // Collaborators
    UnsupportedOperation,
    BackendExecutionFailed,

    // Model input
    SchemaValidationFailed,
    InvalidArgument,
    UnknownTool,
}

impl ErrorCode {
    /// Returns the wire representation of the code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::PathNotFound => "path_not_found",
            ErrorCode::InvalidFilter => "invalid_filter",
            ErrorCode::TooLarge => "too_large",
            ErrorCode::LedgerFull => "ledger_full",
            ErrorCode::HypothesisNotFound => "hypothesis_not_found",
            ErrorCode::UnsupportedOperation => "unsupported_operation",
            ErrorCode::BackendExecutionFailed => "backend_execution_failed",
            ErrorCode::SchemaValidationFailed => "schema_validation_failed",
            ErrorCode::InvalidArgument => "invalid_argument",
            ErrorCode::UnknownTool => "unknown_tool",
        }
    }

    /// Returns true if the error stems from the environment rather than the
    /// model's own input.
    pub fn is_environmental(&self) -> bool {
        matches!(
            self,
            ErrorCode::BackendExecutionFailed | ErrorCode::UnsupportedOperation
        )
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("finding");
        assert_eq!(format!("{}", err), "Field 'finding' cannot be empty");
    }

    #[test]
    fn validation_error_invalid_format_displays_correctly() {
        let err = ValidationError::invalid_format("path", "unclosed bracket");
        assert_eq!(
            format!("{}", err),
            "Field 'path' has invalid format: unclosed bracket"
        );
    }

    #[test]
    fn error_code_display_formats_snake_case() {
        assert_eq!(format!("{}", ErrorCode::PathNotFound), "path_not_found");
        assert_eq!(format!("{}", ErrorCode::TooLarge), "too_large");
        assert_eq!(
            format!("{}", ErrorCode::SchemaValidationFailed),
            "schema_validation_failed"
        );
    }

    #[test]
    fn error_code_serializes_as_string() {
        let json = serde_json::to_string(&ErrorCode::LedgerFull).unwrap();
        assert_eq!(json, "\"ledger_full\"");
    }

    #[test]
    fn only_collaborator_failures_are_environmental() {
        assert!(ErrorCode::BackendExecutionFailed.is_environmental());
        assert!(ErrorCode::UnsupportedOperation.is_environmental());
        assert!(!ErrorCode::SchemaValidationFailed.is_environmental());
        assert!(!ErrorCode::LedgerFull.is_environmental());
        assert!(!ErrorCode::HypothesisNotFound.is_environmental());
    }
}
