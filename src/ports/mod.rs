//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the analysis core and the outside world. Adapters implement these ports.
//!
//! ## Model Ports
//!
//! - `SamplingClient` - Request the model's next message
//! - `McpPeer` - The connected MCP client the sampling adapter talks to
//!
//! ## Debugger Ports
//!
//! - `DebuggerBackend` - Run commands and fetch thread stacks
//! - `ObjectInspector` - Structured summaries of objects by address
//!
//! ## Validation Ports
//!
//! - `ArgumentSchemaValidator` - Check tool arguments against input schemas

mod debugger_backend;
mod mcp_peer;
mod sampling_client;
mod schema_validator;

pub use debugger_backend::{BackendError, DebuggerBackend, ObjectInspector};
pub use mcp_peer::{McpPeer, PeerError};
pub use sampling_client::{
    ContentBlock, MessageRole, SamplingClient, SamplingError, SamplingRequest, SamplingResult,
    TokenUsage, ToolChoice, TranscriptMessage,
};
pub use schema_validator::{ArgumentSchemaValidator, SchemaValidationError};
