//! Report Tool - Paged, filtered navigation of the crash report.
//!
//! The arguments deserialize directly into [`ReportQuery`].

use crate::domain::tools::ToolDefinition;

pub use crate::domain::report::ReportQuery as ReportGetParams;

use super::names;

pub fn report_get_tool() -> ToolDefinition {
    ToolDefinition::new(
        names::REPORT_GET,
        "Fetch part of the structured crash report by dot-path (e.g. \"analysis.threads.all[0]\"). \
         Arrays and objects are paged; pass nextCursor back unchanged to continue. \
         Results larger than maxChars fail with suggestedSubPaths to query instead.",
        serde_json::json!({
            "type": "object",
            "required": ["path"],
            "properties": {
                "path": {
                    "type": "string",
                    "description": "Dot-path with optional [index] suffixes; empty for the root"
                },
                "limit": {
                    "type": "integer",
                    "minimum": 1,
                    "maximum": 200,
                    "description": "Elements per page (default 50)"
                },
                "cursor": {
                    "type": "string",
                    "description": "nextCursor from the previous page of the same query"
                },
                "pageKind": {
                    "type": "string",
                    "enum": ["array", "object", "auto"]
                },
                "select": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Fields to keep in each element"
                },
                "where": {
                    "type": "object",
                    "required": ["field", "equals"],
                    "properties": {
                        "field": { "type": "string" },
                        "equals": {
                            "description": "Value to match; strings ignore case by default"
                        },
                        "caseInsensitive": { "type": "boolean" }
                    }
                },
                "maxChars": {
                    "type": "integer",
                    "minimum": 1,
                    "description": "Response size budget in characters (default 20000)"
                }
            }
        }),
    )
}
