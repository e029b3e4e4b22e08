//! Tool error taxonomy.

use thiserror::Error;

use crate::domain::analysis::LedgerError;
use crate::domain::foundation::{AnalysisMode, ErrorCode};
use crate::domain::report::ReportError;

use super::ToolFailure;

/// Any failure of a single tool call that the model can recover from.
///
/// Converted into a [`ToolFailure`] and returned as the call's result; the
/// analysis loop keeps going.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolError {
    #[error(transparent)]
    Report(#[from] ReportError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Debugger backend failed: {0}")]
    Backend(String),

    #[error("Arguments for '{tool}' failed validation: {message}")]
    SchemaValidation { tool: String, message: String },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Tool '{name}' is not available in {mode} mode")]
    UnknownTool { name: String, mode: AnalysisMode },
}

impl ToolError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ToolError::Report(err) => err.code(),
            ToolError::Ledger(err) => err.code(),
            ToolError::Backend(_) => ErrorCode::BackendExecutionFailed,
            ToolError::SchemaValidation { .. } => ErrorCode::SchemaValidationFailed,
            ToolError::InvalidArgument(_) => ErrorCode::InvalidArgument,
            ToolError::UnknownTool { .. } => ErrorCode::UnknownTool,
        }
    }

    /// Converts into the payload handed back to the model.
    pub fn to_failure(&self) -> ToolFailure {
        let failure = ToolFailure::new(self.code(), self.to_string());
        match self {
            ToolError::Report(err) => match err.suggested_sub_paths() {
                Some(paths) => failure.with_suggested_sub_paths(paths.to_vec()),
                None => failure,
            },
            _ => failure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_errors_keep_their_code_and_suggestions() {
        let err: ToolError = ReportError::TooLarge {
            path: "modules".into(),
            max_chars: 100,
            suggested_sub_paths: vec!["modules[0]".into()],
        }
        .into();

        let failure = err.to_failure();
        assert_eq!(failure.code, ErrorCode::TooLarge);
        assert_eq!(failure.suggested_sub_paths, Some(vec!["modules[0]".to_string()]));
    }

    #[test]
    fn ledger_full_maps_through() {
        let err: ToolError = LedgerError::Full {
            registry: "evidence ledger",
            capacity: 1,
            current: 1,
            requested: 1,
        }
        .into();
        assert_eq!(err.code(), ErrorCode::LedgerFull);
    }

    #[test]
    fn unknown_tool_names_mode() {
        let err = ToolError::UnknownTool {
            name: "analysis_evidence_add".into(),
            mode: AnalysisMode::SummaryRewrite,
        };
        assert_eq!(err.code(), ErrorCode::UnknownTool);
        assert!(err.to_string().contains("summary_rewrite"));
    }

    #[test]
    fn backend_failure_is_environmental() {
        assert!(ToolError::Backend("timeout".into()).code().is_environmental());
    }
}
