//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the analysis core to external systems:
//! - `sampling` - Model sampling through the MCP peer, or a scripted stand-in
//! - `debugger` - Scripted debugger backend and object inspector
//! - `validation` - Tool argument checks against input schemas
//! - `report` - Loading report documents from disk

pub mod debugger;
pub mod report;
pub mod sampling;
pub mod validation;

pub use debugger::ScriptedDebugger;
pub use report::{FileReportLoader, ReportLoadError};
pub use sampling::{PeerSamplingClient, ScriptedSamplingClient};
pub use validation::JsonSchemaValidator;
