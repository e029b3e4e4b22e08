//! Tools - The callable surface offered to the model.
//!
//! ## Key Types
//!
//! - [`ToolDefinition`] - Name, description and input schema
//! - [`ToolRegistry`] - Per-mode catalog, validated at construction
//! - [`ToolCall`] - Request to invoke a tool
//! - [`ToolResult`] - Content or structured error for one call
//! - [`ToolInvocation`] - Audit record of a dispatched call
//! - [`ToolError`] - Recoverable per-call failure taxonomy

pub mod definitions;
mod errors;
mod tool_call;
mod tool_definition;
mod tool_invocation;
mod tool_registry;
mod tool_result;

pub use errors::ToolError;
pub use tool_call::ToolCall;
pub use tool_definition::ToolDefinition;
pub use tool_invocation::ToolInvocation;
pub use tool_registry::{RegistryError, ToolRegistry};
pub use tool_result::{ToolFailure, ToolOutcome, ToolResult};
