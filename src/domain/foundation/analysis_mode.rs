//! AnalysisMode enum naming the kinds of analysis runs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The analysis a session performs. Fixed when the session starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Find the root cause of the crash.
    RootCause,
    /// Rewrite the report's summary description and recommendations.
    SummaryRewrite,
    /// Narrate what a single thread was doing.
    ThreadNarrative,
}

impl AnalysisMode {
    /// Returns all modes in canonical order.
    pub fn all() -> &'static [AnalysisMode] {
        &[
            AnalysisMode::RootCause,
            AnalysisMode::SummaryRewrite,
            AnalysisMode::ThreadNarrative,
        ]
    }

    /// Name of the tool that ends a run in this mode.
    pub fn completion_tool_name(&self) -> &'static str {
        match self {
            AnalysisMode::RootCause => "analysis_complete",
            AnalysisMode::SummaryRewrite => "analysis_summary_rewrite_complete",
            AnalysisMode::ThreadNarrative => "analysis_thread_narrative_complete",
        }
    }

    /// True for modes that carry the evidence and hypothesis meta tools.
    pub fn tracks_reasoning(&self) -> bool {
        matches!(self, AnalysisMode::RootCause)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnalysisMode::RootCause => "root_cause",
            AnalysisMode::SummaryRewrite => "summary_rewrite",
            AnalysisMode::ThreadNarrative => "thread_narrative",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_tools_are_distinct() {
        let names: std::collections::HashSet<_> = AnalysisMode::all()
            .iter()
            .map(|m| m.completion_tool_name())
            .collect();
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn only_root_cause_tracks_reasoning() {
        assert!(AnalysisMode::RootCause.tracks_reasoning());
        assert!(!AnalysisMode::SummaryRewrite.tracks_reasoning());
        assert!(!AnalysisMode::ThreadNarrative.tracks_reasoning());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&AnalysisMode::ThreadNarrative).unwrap();
        assert_eq!(json, "\"thread_narrative\"");
        assert_eq!(AnalysisMode::SummaryRewrite.to_string(), "summary_rewrite");
    }
}
