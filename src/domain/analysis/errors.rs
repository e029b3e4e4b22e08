//! Error types for the evidence ledger and hypothesis tracker.

use thiserror::Error;

use crate::domain::foundation::{ErrorCode, ValidationError};

/// Errors raised by session registries.
///
/// A failed batch leaves the registry untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("{registry} is full: {current} of {capacity} used, batch of {requested} rejected")]
    Full {
        registry: &'static str,
        capacity: usize,
        current: usize,
        requested: usize,
    },

    #[error("Batch must contain at least one entry")]
    EmptyBatch,

    #[error("Id '{0}' is already in use")]
    DuplicateId(String),

    #[error("Hypothesis '{0}' not found")]
    HypothesisNotFound(String),

    #[error("Evidence '{0}' not found in this session")]
    UnknownEvidence(String),

    #[error("Entry {index}: {source}")]
    InvalidEntry {
        index: usize,
        #[source]
        source: ValidationError,
    },
}

impl LedgerError {
    /// Returns the error code reported to the model.
    pub fn code(&self) -> ErrorCode {
        match self {
            LedgerError::Full { .. } => ErrorCode::LedgerFull,
            LedgerError::HypothesisNotFound(_) => ErrorCode::HypothesisNotFound,
            LedgerError::EmptyBatch
            | LedgerError::DuplicateId(_)
            | LedgerError::UnknownEvidence(_)
            | LedgerError::InvalidEntry { .. } => ErrorCode::InvalidArgument,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_maps_to_ledger_full() {
        let err = LedgerError::Full {
            registry: "evidence ledger",
            capacity: 2,
            current: 2,
            requested: 1,
        };
        assert_eq!(err.code(), ErrorCode::LedgerFull);
        assert!(err.to_string().contains("2 of 2"));
    }

    #[test]
    fn reference_errors_are_invalid_arguments() {
        assert_eq!(LedgerError::DuplicateId("E1".into()).code(), ErrorCode::InvalidArgument);
        assert_eq!(LedgerError::UnknownEvidence("E9".into()).code(), ErrorCode::InvalidArgument);
        assert_eq!(
            LedgerError::HypothesisNotFound("H4".into()).code(),
            ErrorCode::HypothesisNotFound
        );
    }

    #[test]
    fn invalid_entry_names_position() {
        let err = LedgerError::InvalidEntry {
            index: 1,
            source: ValidationError::empty_field("finding"),
        };
        assert_eq!(err.to_string(), "Entry 1: Field 'finding' cannot be empty");
    }
}
