//! Analysis session aggregate.
//!
//! Owns everything one analysis run accumulates: the evidence ledger, the
//! hypothesis tracker, counters, the tool audit trail and the exec cache.
//! Created when a run starts and consumed into a snapshot when it ends.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::domain::foundation::{
    AnalysisMode, SessionId, StateMachine, Timestamp, ValidationError,
};
use crate::domain::report::ReportDocument;
use crate::domain::tools::ToolInvocation;

use super::{AnalysisSnapshot, EvidenceLedger, ExhaustionReason, HypothesisTracker};

/// Lifecycle of an analysis session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Idle,
    Running,
    Completed,
    Stopped,
    Exhausted,
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!(
            (self, target),
            (Idle, Running)
                | (Idle, Stopped)
                | (Running, Completed)
                | (Running, Stopped)
                | (Running, Exhausted)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionStatus::*;
        match self {
            Idle => vec![Running, Stopped],
            Running => vec![Completed, Stopped, Exhausted],
            Completed | Stopped | Exhausted => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::Idle => "Idle",
            SessionStatus::Running => "Running",
            SessionStatus::Completed => "Completed",
            SessionStatus::Stopped => "Stopped",
            SessionStatus::Exhausted => "Exhausted",
        };
        write!(f, "{}", s)
    }
}

/// Capacity of the per-session registries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionLimits {
    pub max_evidence_items: usize,
    pub max_hypotheses: usize,
}

impl Default for SessionLimits {
    fn default() -> Self {
        Self {
            max_evidence_items: 50,
            max_hypotheses: 8,
        }
    }
}

/// Iteration and token ceilings for one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisBudget {
    pub max_iterations: u32,
    pub max_tokens: u64,
}

impl Default for AnalysisBudget {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            max_tokens: 200_000,
        }
    }
}

/// State of one analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    id: SessionId,
    mode: AnalysisMode,
    status: SessionStatus,
    report: ReportDocument,
    ledger: EvidenceLedger,
    tracker: HypothesisTracker,
    iterations: u32,
    tokens_used: u64,
    invocations: Vec<ToolInvocation>,
    exec_cache: HashMap<String, String>,
    started_at: Timestamp,
}

impl AnalysisSession {
    /// Creates an idle session with empty registries and zeroed counters.
    pub fn new(mode: AnalysisMode, report: ReportDocument, limits: SessionLimits) -> Self {
        Self {
            id: SessionId::new(),
            mode,
            status: SessionStatus::Idle,
            report,
            ledger: EvidenceLedger::new(limits.max_evidence_items),
            tracker: HypothesisTracker::new(limits.max_hypotheses),
            iterations: 0,
            tokens_used: 0,
            invocations: Vec::new(),
            exec_cache: HashMap::new(),
            started_at: Timestamp::now(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Lifecycle
    // ═══════════════════════════════════════════════════════════════════════

    pub fn start(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SessionStatus::Running)?;
        self.started_at = Timestamp::now();
        Ok(())
    }

    pub fn complete(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SessionStatus::Completed)?;
        Ok(())
    }

    pub fn stop(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SessionStatus::Stopped)?;
        Ok(())
    }

    pub fn exhaust(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SessionStatus::Exhausted)?;
        Ok(())
    }

    /// Returns the budget that has run out, if any.
    ///
    /// Checked before each round; a round in progress is never interrupted.
    pub fn exhausted_budget(&self, budget: &AnalysisBudget) -> Option<ExhaustionReason> {
        if self.iterations >= budget.max_iterations {
            return Some(ExhaustionReason::Iterations {
                limit: budget.max_iterations,
            });
        }
        if self.tokens_used >= budget.max_tokens {
            return Some(ExhaustionReason::Tokens {
                limit: budget.max_tokens,
                used: self.tokens_used,
            });
        }
        None
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Counters and audit
    // ═══════════════════════════════════════════════════════════════════════

    /// Counts one completed round and the tokens it consumed.
    pub fn record_round(&mut self, tokens: u64) {
        self.iterations = self.iterations.saturating_add(1);
        self.tokens_used = self.tokens_used.saturating_add(tokens);
    }

    pub fn record_invocation(&mut self, invocation: ToolInvocation) {
        self.invocations.push(invocation);
    }

    pub fn cached_exec(&self, command: &str) -> Option<&str> {
        self.exec_cache.get(command.trim()).map(String::as_str)
    }

    pub fn cache_exec(&mut self, command: &str, output: impl Into<String>) {
        self.exec_cache.insert(command.trim().to_string(), output.into());
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn report(&self) -> &ReportDocument {
        &self.report
    }

    pub fn ledger(&self) -> &EvidenceLedger {
        &self.ledger
    }

    pub fn ledger_mut(&mut self) -> &mut EvidenceLedger {
        &mut self.ledger
    }

    pub fn tracker(&self) -> &HypothesisTracker {
        &self.tracker
    }

    /// Borrows the tracker mutably alongside the ledger it links against.
    pub fn tracker_and_ledger(&mut self) -> (&mut HypothesisTracker, &EvidenceLedger) {
        (&mut self.tracker, &self.ledger)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    pub fn tokens_used(&self) -> u64 {
        self.tokens_used
    }

    pub fn invocations(&self) -> &[ToolInvocation] {
        &self.invocations
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    /// Captures the session's accumulated state.
    pub fn snapshot(&self) -> AnalysisSnapshot {
        AnalysisSnapshot {
            session_id: self.id,
            mode: self.mode,
            status: self.status,
            iterations: self.iterations,
            tokens_used: self.tokens_used,
            evidence: self.ledger.items().to_vec(),
            hypotheses: self.tracker.hypotheses().to_vec(),
            invocations: self.invocations.clone(),
            started_at: self.started_at,
            finished_at: Timestamp::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::EvidenceDraft;
    use serde_json::json;

    fn session() -> AnalysisSession {
        AnalysisSession::new(
            AnalysisMode::RootCause,
            ReportDocument::new(json!({})),
            SessionLimits::default(),
        )
    }

    #[test]
    fn new_session_is_idle_and_empty() {
        let s = session();
        assert_eq!(s.status(), SessionStatus::Idle);
        assert_eq!(s.iterations(), 0);
        assert_eq!(s.tokens_used(), 0);
        assert!(s.ledger().is_empty());
        assert_eq!(s.ledger().capacity(), 50);
        assert_eq!(s.tracker().capacity(), 8);
    }

    #[test]
    fn lifecycle_follows_state_machine() {
        let mut s = session();
        assert!(s.complete().is_err());
        s.start().unwrap();
        s.complete().unwrap();
        assert!(s.status().is_terminal());
        assert!(s.stop().is_err());
    }

    #[test]
    fn idle_session_can_be_stopped() {
        let mut s = session();
        s.stop().unwrap();
        assert_eq!(s.status(), SessionStatus::Stopped);
    }

    #[test]
    fn iteration_budget_is_reached_at_limit() {
        let mut s = session();
        let budget = AnalysisBudget {
            max_iterations: 2,
            max_tokens: 1_000,
        };
        s.record_round(10);
        assert!(s.exhausted_budget(&budget).is_none());
        s.record_round(10);
        assert_eq!(
            s.exhausted_budget(&budget),
            Some(ExhaustionReason::Iterations { limit: 2 })
        );
    }

    #[test]
    fn token_budget_is_reached_at_limit() {
        let mut s = session();
        let budget = AnalysisBudget {
            max_iterations: 10,
            max_tokens: 100,
        };
        s.record_round(100);
        assert_eq!(
            s.exhausted_budget(&budget),
            Some(ExhaustionReason::Tokens { limit: 100, used: 100 })
        );
    }

    #[test]
    fn exec_cache_ignores_surrounding_whitespace() {
        let mut s = session();
        s.cache_exec("!threads ", "3 threads");
        assert_eq!(s.cached_exec(" !threads"), Some("3 threads"));
        assert!(s.cached_exec("!clrstack").is_none());
    }

    #[test]
    fn snapshot_carries_accumulated_state() {
        let mut s = session();
        s.start().unwrap();
        s.ledger_mut()
            .add(vec![EvidenceDraft::new("!pe", "NullReferenceException")])
            .unwrap();
        s.record_round(42);

        let snapshot = s.snapshot();
        assert_eq!(snapshot.status, SessionStatus::Running);
        assert_eq!(snapshot.iterations, 1);
        assert_eq!(snapshot.tokens_used, 42);
        assert_eq!(snapshot.evidence.len(), 1);
    }
}
