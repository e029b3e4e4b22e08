//! Tool invocation entity - audit record for every dispatched tool call.
//!
//! Every call the orchestrator dispatches is recorded so a finished session
//! can show which tools the model used, with what arguments, and how each
//! call ended.

use serde::Serialize;
use serde_json::Value;

use crate::domain::foundation::{ErrorCode, Timestamp, ToolCallId};

/// A recorded tool invocation.
///
/// # Invariants
///
/// - `invoked_at` is before or equal to `completed_at`
/// - `error_code` is present only when the call failed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    /// Identifier of the originating tool call
    tool_call_id: ToolCallId,

    /// Name of the tool that was invoked
    tool_name: String,

    /// Arguments passed to the tool
    arguments: Value,

    /// Loop iteration (1-based) the call arrived in
    iteration: u32,

    /// Failure code, if the call failed
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<ErrorCode>,

    /// True when the result came from the session's exec cache
    cached: bool,

    invoked_at: Timestamp,
    completed_at: Timestamp,
    duration_ms: u64,
}

impl ToolInvocation {
    /// Starts a record for a call about to be dispatched.
    ///
    /// Use [`ToolInvocation::complete`] to record the outcome.
    pub fn start(
        tool_call_id: ToolCallId,
        tool_name: impl Into<String>,
        arguments: Value,
        iteration: u32,
    ) -> Self {
        let now = Timestamp::now();
        Self {
            tool_call_id,
            tool_name: tool_name.into(),
            arguments,
            iteration,
            error_code: None,
            cached: false,
            invoked_at: now,
            completed_at: now,
            duration_ms: 0,
        }
    }

    /// Records completion of the call.
    pub fn complete(&mut self, error_code: Option<ErrorCode>) {
        let now = Timestamp::now();
        self.completed_at = now;
        self.duration_ms = now.millis_since(&self.invoked_at);
        self.error_code = error_code;
    }

    /// Marks the result as served from cache.
    pub fn mark_cached(&mut self) {
        self.cached = true;
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Getters
    // ═══════════════════════════════════════════════════════════════════════

    pub fn tool_call_id(&self) -> &ToolCallId {
        &self.tool_call_id
    }

    pub fn tool_name(&self) -> &str {
        &self.tool_name
    }

    pub fn arguments(&self) -> &Value {
        &self.arguments
    }

    pub fn iteration(&self) -> u32 {
        self.iteration
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error_code
    }

    pub fn is_success(&self) -> bool {
        self.error_code.is_none()
    }

    pub fn is_cached(&self) -> bool {
        self.cached
    }

    pub fn invoked_at(&self) -> Timestamp {
        self.invoked_at
    }

    pub fn completed_at(&self) -> Timestamp {
        self.completed_at
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }
}
