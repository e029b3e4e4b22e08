//! Tool result value objects.
//!
//! A result carries either the tool's content or a structured error the
//! model can react to.

use serde::Serialize;
use serde_json::Value;

use crate::domain::foundation::{ErrorCode, ToolCallId};

/// Structured error returned to the model in place of tool content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolFailure {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_sub_paths: Option<Vec<String>>,
}

impl ToolFailure {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            suggested_sub_paths: None,
        }
    }

    pub fn with_suggested_sub_paths(mut self, paths: Vec<String>) -> Self {
        self.suggested_sub_paths = Some(paths);
        self
    }
}

/// Outcome of executing one tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutcome {
    /// Tool executed; the value is handed to the model as-is.
    Content(Value),
    /// Tool failed; the model receives `{ "error": { ... } }`.
    Error(ToolFailure),
}

/// The result of one tool call, correlated by call id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    tool_call_id: ToolCallId,
    outcome: ToolOutcome,
}

impl ToolResult {
    /// Creates a successful result.
    pub fn success(tool_call_id: ToolCallId, content: Value) -> Self {
        Self {
            tool_call_id,
            outcome: ToolOutcome::Content(content),
        }
    }

    /// Creates a failed result.
    pub fn failure(tool_call_id: ToolCallId, failure: ToolFailure) -> Self {
        Self {
            tool_call_id,
            outcome: ToolOutcome::Error(failure),
        }
    }

    pub fn tool_call_id(&self) -> &ToolCallId {
        &self.tool_call_id
    }

    pub fn outcome(&self) -> &ToolOutcome {
        &self.outcome
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Error(_))
    }

    /// Returns the error code if the tool failed.
    pub fn error_code(&self) -> Option<ErrorCode> {
        match &self.outcome {
            ToolOutcome::Error(failure) => Some(failure.code),
            ToolOutcome::Content(_) => None,
        }
    }

    /// Returns the JSON payload the model sees.
    pub fn payload(&self) -> Value {
        match &self.outcome {
            ToolOutcome::Content(content) => content.clone(),
            ToolOutcome::Error(failure) => serde_json::json!({ "error": failure }),
        }
    }

    /// Renders the payload as text for the transcript.
    pub fn render(&self) -> String {
        match self.payload() {
            Value::String(text) => text,
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_payload_is_wrapped() {
        let result = ToolResult::failure(
            ToolCallId::sequential(1),
            ToolFailure::new(ErrorCode::TooLarge, "too big")
                .with_suggested_sub_paths(vec!["modules[0].name".into()]),
        );

        assert!(result.is_error());
        assert_eq!(
            result.payload(),
            serde_json::json!({
                "error": {
                    "code": "too_large",
                    "message": "too big",
                    "suggestedSubPaths": ["modules[0].name"]
                }
            })
        );
    }

    #[test]
    fn error_without_suggestions_omits_field() {
        let result = ToolResult::failure(
            ToolCallId::sequential(1),
            ToolFailure::new(ErrorCode::LedgerFull, "full"),
        );
        assert!(result.payload()["error"].get("suggestedSubPaths").is_none());
        assert_eq!(result.error_code(), Some(ErrorCode::LedgerFull));
    }

    #[test]
    fn string_content_renders_verbatim() {
        let result = ToolResult::success(ToolCallId::sequential(2), Value::String("ok\n".into()));
        assert_eq!(result.render(), "ok\n");
        assert!(!result.is_error());
    }

    #[test]
    fn structured_content_renders_as_json() {
        let result = ToolResult::success(ToolCallId::sequential(2), serde_json::json!({"a": 1}));
        assert_eq!(result.render(), r#"{"a":1}"#);
    }
}
