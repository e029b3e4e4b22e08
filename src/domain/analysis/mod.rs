//! Analysis module - Session state of a model-driven dump analysis.
//!
//! # Components
//!
//! - `EvidenceLedger` - Bounded, append-only evidence with `E<n>` ids
//! - `HypothesisTracker` - Bounded hypotheses with confidence and evidence links
//! - `AnalysisSession` - Aggregate owning both plus counters and audit trail
//! - `AnalysisOutcome` - Terminal result with completion payload or reason
//!
//! Everything here is synchronous and free of I/O; the orchestrator in the
//! application layer drives it.

mod errors;
mod evidence;
mod hypothesis;
mod outcome;
mod session;

pub use errors::LedgerError;
pub use evidence::{EvidenceDraft, EvidenceItem, EvidenceLedger};
pub use hypothesis::{
    Confidence, Hypothesis, HypothesisDraft, HypothesisTracker, HypothesisUpdate, ScoreFailure,
    ScoreReport,
};
pub use outcome::{
    AnalysisOutcome, AnalysisSnapshot, CompletionPayload, ExhaustionReason, RootCauseReport,
    StopReason, SummaryRewrite, ThreadNarrative,
};
pub use session::{AnalysisBudget, AnalysisSession, SessionLimits, SessionStatus};
