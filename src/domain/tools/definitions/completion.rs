//! Completion Tools - One per analysis mode; calling it ends the run.
//!
//! Payload types live in [`crate::domain::analysis`].

use crate::domain::tools::ToolDefinition;

use super::names;

pub fn analysis_complete_tool() -> ToolDefinition {
    ToolDefinition::new(
        names::ANALYSIS_COMPLETE,
        "Finish the root-cause analysis. Call once, when the evidence supports a conclusion.",
        serde_json::json!({
            "type": "object",
            "required": ["rootCause", "confidence", "reasoning", "evidence"],
            "properties": {
                "rootCause": { "type": "string", "description": "One-sentence root cause" },
                "confidence": { "type": "string", "enum": ["high", "medium", "low"] },
                "reasoning": { "type": "string" },
                "evidence": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Evidence ids or verbatim facts backing the conclusion"
                },
                "recommendations": { "type": "array", "items": { "type": "string" } },
                "additionalFindings": { "type": "array", "items": { "type": "string" } }
            }
        }),
    )
}

pub fn summary_rewrite_complete_tool() -> ToolDefinition {
    ToolDefinition::new(
        names::SUMMARY_REWRITE_COMPLETE,
        "Finish the summary rewrite with the new description and recommendations.",
        serde_json::json!({
            "type": "object",
            "required": ["description", "recommendations"],
            "properties": {
                "description": { "type": "string" },
                "recommendations": { "type": "array", "items": { "type": "string" } }
            }
        }),
    )
}

pub fn thread_narrative_complete_tool() -> ToolDefinition {
    ToolDefinition::new(
        names::THREAD_NARRATIVE_COMPLETE,
        "Finish the thread narrative.",
        serde_json::json!({
            "type": "object",
            "required": ["description", "confidence"],
            "properties": {
                "description": {
                    "type": "string",
                    "description": "What the thread was doing when the dump was taken"
                },
                "confidence": { "type": "string", "enum": ["high", "medium", "low"] }
            }
        }),
    )
}
