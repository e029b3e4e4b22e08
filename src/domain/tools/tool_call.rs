//! Tool call value object.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::ToolCallId;

/// A request from the model to invoke a tool.
///
/// Several calls may arrive in one turn; they are executed sequentially in
/// the order received. Arguments are kept as JSON until dispatch since each
/// tool has its own schema.
///
/// # Examples
///
/// ```ignore
/// use dump_analyst::domain::tools::ToolCall;
///
/// let call = ToolCall::new(
///     ToolCallId::sequential(1),
///     "report_get",
///     serde_json::json!({ "path": "analysis.threads.all", "limit": 2 }),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolCall {
    /// Identifier assigned by the peer, echoed back in the result
    id: ToolCallId,

    /// Name of the tool to invoke
    name: String,

    /// Arguments for the tool (JSON object)
    arguments: Value,
}

impl ToolCall {
    /// Creates a new tool call.
    pub fn new(id: ToolCallId, name: impl Into<String>, arguments: Value) -> Self {
        Self {
            id,
            name: name.into(),
            arguments,
        }
    }

    /// Returns the call identifier.
    pub fn id(&self) -> &ToolCallId {
        &self.id
    }

    /// Returns the tool name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the arguments.
    pub fn arguments(&self) -> &Value {
        &self.arguments
    }

    /// Deserializes the arguments into a typed parameter struct.
    pub fn parse_arguments<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.arguments.clone())
    }
}
