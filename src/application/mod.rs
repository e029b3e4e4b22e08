//! Application layer - the analysis loop and the tool dispatch behind it.
//!
//! The orchestrator coordinates the sampling client, the debugger ports and
//! the session's ledger and tracker; the domain stays free of I/O.

mod dispatch;
mod executor;
mod orchestrator;
pub mod prompts;

use thiserror::Error;

use crate::domain::foundation::{AnalysisMode, ValidationError};

pub use dispatch::{DispatchTable, ToolHandler};
pub use executor::{ExecPolicy, ToolExecutor, ToolOutput};
pub use orchestrator::{
    estimate_tokens, AnalysisOrchestrator, AnalysisRequest, OrchestratorConfig,
};

/// Errors constructing or running the orchestrator.
///
/// Model mistakes never surface here; they become tool errors the model
/// sees. These indicate a misconfigured catalog or a broken lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrchestratorError {
    #[error("Tool '{name}' in {mode} catalog has no handler")]
    UnhandledTool { name: String, mode: AnalysisMode },

    #[error("Completion tool '{name}' does not belong to {mode} mode")]
    ForeignCompletionTool { name: String, mode: AnalysisMode },

    #[error("{mode} catalog has no completion tool")]
    MissingCompletionTool { mode: AnalysisMode },

    #[error("Invalid session transition: {0}")]
    Lifecycle(#[from] ValidationError),
}
