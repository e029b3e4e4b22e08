//! Debugger Tools - Commands and inspections run against the live dump.

use serde::{Deserialize, Serialize};

use crate::domain::tools::ToolDefinition;

use super::names;

/// Depth used by `inspect` when the caller gives none.
pub const DEFAULT_INSPECT_DEPTH: u32 = 3;

/// Deepest object graph `inspect` will walk.
pub const MAX_INSPECT_DEPTH: u32 = 5;

// ═══════════════════════════════════════════════════════════════════════════
// Tool Parameters
// ═══════════════════════════════════════════════════════════════════════════

/// Parameters for running a raw debugger command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecParams {
    /// Command text, e.g. `!clrstack -a`
    pub command: String,
}

/// Parameters for inspecting an object.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectParams {
    /// Object address, hex with or without `0x`
    pub address: String,
    #[serde(default)]
    pub max_depth: Option<u32>,
}

impl InspectParams {
    /// Returns the requested depth clamped to `1..=MAX_INSPECT_DEPTH`.
    pub fn depth(&self) -> u32 {
        self.max_depth
            .unwrap_or(DEFAULT_INSPECT_DEPTH)
            .clamp(1, MAX_INSPECT_DEPTH)
    }
}

/// Parameters for fetching one thread's stack.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadStackParams {
    /// Thread id as shown in the report (OS id or managed id)
    pub thread_id: String,
}

// ═══════════════════════════════════════════════════════════════════════════
// Tool Definitions
// ═══════════════════════════════════════════════════════════════════════════

pub fn exec_tool() -> ToolDefinition {
    ToolDefinition::new(
        names::EXEC,
        "Execute a debugger command against the open dump and return its text output. \
         Prefer report_get for data already in the crash report.",
        serde_json::json!({
            "type": "object",
            "required": ["command"],
            "properties": {
                "command": {
                    "type": "string",
                    "description": "Debugger command to run, e.g. \"!clrstack -a\" or \"bt all\""
                }
            }
        }),
    )
}

pub fn inspect_tool() -> ToolDefinition {
    ToolDefinition::new(
        names::INSPECT,
        "Inspect a managed object at an address and return a structured summary of its fields.",
        serde_json::json!({
            "type": "object",
            "required": ["address"],
            "properties": {
                "address": {
                    "type": "string",
                    "description": "Object address (hex, e.g. \"0x7f3a2c001020\")"
                },
                "maxDepth": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": MAX_INSPECT_DEPTH,
                    "default": DEFAULT_INSPECT_DEPTH,
                    "description": "How many levels of nested objects to expand"
                }
            }
        }),
    )
}

pub fn get_thread_stack_tool() -> ToolDefinition {
    ToolDefinition::new(
        names::GET_THREAD_STACK,
        "Get the full call stack of one thread.",
        serde_json::json!({
            "type": "object",
            "required": ["threadId"],
            "properties": {
                "threadId": {
                    "type": "string",
                    "description": "Thread identifier as listed under analysis.threads"
                }
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_depth_defaults_and_clamps() {
        let params = |d| InspectParams {
            address: "0x1".into(),
            max_depth: d,
        };
        assert_eq!(params(None).depth(), 3);
        assert_eq!(params(Some(9)).depth(), 5);
        assert_eq!(params(Some(0)).depth(), 1);
    }

    #[test]
    fn thread_stack_params_use_camel_case() {
        let params: ThreadStackParams =
            serde_json::from_value(serde_json::json!({ "threadId": "0x1a" })).unwrap();
        assert_eq!(params.thread_id, "0x1a");
    }

    #[test]
    fn definitions_require_their_arguments() {
        assert_eq!(exec_tool().required_fields(), vec!["command"]);
        assert_eq!(inspect_tool().required_fields(), vec!["address"]);
        assert_eq!(get_thread_stack_tool().required_fields(), vec!["threadId"]);
    }
}
