//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, error codes, analysis modes and the
//! state machine trait that form the vocabulary of the analysis domain.

mod analysis_mode;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use analysis_mode::AnalysisMode;
pub use errors::{ErrorCode, ValidationError};
pub use ids::{EvidenceId, HypothesisId, SessionId, ToolCallId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
