//! Tool definition - schema and metadata for a tool.
//!
//! Defines the interface for a tool that the model can invoke.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Definition of a tool the sampling peer may call.
///
/// Contains the schema and documentation needed for:
/// - the tool list sent with every sampling request
/// - argument validation before dispatch
///
/// # Examples
///
/// ```ignore
/// use dump_analyst::domain::tools::ToolDefinition;
///
/// let definition = ToolDefinition::new(
///     "get_thread_stack",
///     "Get the managed and native call stack of one thread",
///     serde_json::json!({
///         "type": "object",
///         "required": ["threadId"],
///         "properties": {
///             "threadId": { "type": "string" }
///         }
///     }),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Unique name of the tool within a mode (e.g., "report_get")
    name: String,

    /// Human-readable description shown to the model
    description: String,

    /// JSON Schema for the arguments; always object-typed
    input_schema: Value,
}

impl ToolDefinition {
    /// Creates a new tool definition.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        input_schema: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the description.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the input schema.
    pub fn input_schema(&self) -> &Value {
        &self.input_schema
    }

    /// Returns the property names the schema marks as required.
    pub fn required_fields(&self) -> Vec<&str> {
        self.input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Converts to the MCP `tools` entry shape used in sampling requests.
    pub fn to_mcp_format(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "description": self.description,
            "inputSchema": self.input_schema
        })
    }
}
