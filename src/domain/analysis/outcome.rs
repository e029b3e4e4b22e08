//! Completion payloads and terminal outcomes of an analysis run.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{AnalysisMode, SessionId, Timestamp, ValidationError};
use crate::domain::tools::ToolInvocation;

use super::{Confidence, EvidenceItem, Hypothesis, SessionStatus};

/// Final answer of a root-cause run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RootCauseReport {
    pub root_cause: String,
    pub confidence: Confidence,
    pub reasoning: String,
    pub evidence: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
    #[serde(default)]
    pub additional_findings: Vec<String>,
}

/// Rewritten report summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRewrite {
    pub description: String,
    pub recommendations: Vec<String>,
}

/// Narrative of what one thread was doing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadNarrative {
    pub description: String,
    pub confidence: Confidence,
}

/// Structured payload of an accepted completion call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompletionPayload {
    RootCause(RootCauseReport),
    SummaryRewrite(SummaryRewrite),
    ThreadNarrative(ThreadNarrative),
}

impl CompletionPayload {
    /// Parses and checks the arguments of `mode`'s completion tool.
    pub fn parse(mode: AnalysisMode, arguments: &Value) -> Result<Self, ValidationError> {
        let payload = match mode {
            AnalysisMode::RootCause => Self::RootCause(decode(arguments)?),
            AnalysisMode::SummaryRewrite => Self::SummaryRewrite(decode(arguments)?),
            AnalysisMode::ThreadNarrative => Self::ThreadNarrative(decode(arguments)?),
        };
        payload.validate()?;
        Ok(payload)
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::RootCause(report) => {
                non_blank("rootCause", &report.root_cause)?;
                non_blank("reasoning", &report.reasoning)?;
                if report.confidence == Confidence::Unknown {
                    return Err(ValidationError::invalid_format(
                        "confidence",
                        "must be one of high, medium, low",
                    ));
                }
                Ok(())
            }
            Self::SummaryRewrite(rewrite) => non_blank("description", &rewrite.description),
            Self::ThreadNarrative(narrative) => non_blank("description", &narrative.description),
        }
    }

    pub fn mode(&self) -> AnalysisMode {
        match self {
            Self::RootCause(_) => AnalysisMode::RootCause,
            Self::SummaryRewrite(_) => AnalysisMode::SummaryRewrite,
            Self::ThreadNarrative(_) => AnalysisMode::ThreadNarrative,
        }
    }
}

fn decode<T: serde::de::DeserializeOwned>(arguments: &Value) -> Result<T, ValidationError> {
    serde_json::from_value(arguments.clone())
        .map_err(|e| ValidationError::invalid_format("arguments", e.to_string()))
}

fn non_blank(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(())
}

/// Why a run ended without completing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum StopReason {
    /// The caller cancelled the run.
    Cancelled,
    /// The peer cannot sample, or cannot use tools.
    UnsupportedOperation { message: String },
    /// Sampling failed in a way retrying in-session cannot fix.
    SamplingFailed { message: String },
}

/// Which budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "budget", rename_all = "snake_case")]
pub enum ExhaustionReason {
    Iterations { limit: u32 },
    Tokens { limit: u64, used: u64 },
}

/// Everything a session accumulated, returned with every outcome.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSnapshot {
    pub session_id: SessionId,
    pub mode: AnalysisMode,
    pub status: SessionStatus,
    pub iterations: u32,
    pub tokens_used: u64,
    pub evidence: Vec<EvidenceItem>,
    pub hypotheses: Vec<Hypothesis>,
    pub invocations: Vec<ToolInvocation>,
    pub started_at: Timestamp,
    pub finished_at: Timestamp,
}

/// Terminal result of an analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    Completed {
        payload: CompletionPayload,
        snapshot: AnalysisSnapshot,
    },
    /// The run did not complete; partial state is preserved.
    Exhausted {
        reason: ExhaustionReason,
        snapshot: AnalysisSnapshot,
    },
    Stopped {
        reason: StopReason,
        snapshot: AnalysisSnapshot,
    },
}

impl AnalysisOutcome {
    pub fn snapshot(&self) -> &AnalysisSnapshot {
        match self {
            Self::Completed { snapshot, .. }
            | Self::Exhausted { snapshot, .. }
            | Self::Stopped { snapshot, .. } => snapshot,
        }
    }

    pub fn status(&self) -> SessionStatus {
        self.snapshot().status
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed { .. })
    }

    pub fn payload(&self) -> Option<&CompletionPayload> {
        match self {
            Self::Completed { payload, .. } => Some(payload),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_root_cause_payload() {
        let payload = CompletionPayload::parse(
            AnalysisMode::RootCause,
            &json!({
                "rootCause": "Null dereference in OrderService.Submit",
                "confidence": "high",
                "reasoning": "Faulting frame dereferences a field never assigned",
                "evidence": ["E1", "E2"]
            }),
        )
        .unwrap();

        match payload {
            CompletionPayload::RootCause(report) => {
                assert_eq!(report.confidence, Confidence::High);
                assert!(report.recommendations.is_empty());
            }
            other => panic!("unexpected payload {other:?}"),
        }
    }

    #[test]
    fn missing_required_field_is_rejected() {
        let err = CompletionPayload::parse(
            AnalysisMode::RootCause,
            &json!({ "rootCause": "x", "confidence": "high", "evidence": [] }),
        )
        .unwrap_err();
        assert!(err.to_string().contains("reasoning"));
    }

    #[test]
    fn unknown_confidence_is_rejected_for_root_cause() {
        let err = CompletionPayload::parse(
            AnalysisMode::RootCause,
            &json!({
                "rootCause": "x",
                "confidence": "unknown",
                "reasoning": "y",
                "evidence": []
            }),
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn blank_description_is_rejected() {
        let err = CompletionPayload::parse(
            AnalysisMode::SummaryRewrite,
            &json!({ "description": "  ", "recommendations": [] }),
        )
        .unwrap_err();
        assert_eq!(err, ValidationError::empty_field("description"));
    }

    #[test]
    fn payload_reports_its_mode() {
        let payload = CompletionPayload::parse(
            AnalysisMode::ThreadNarrative,
            &json!({ "description": "Thread 0x1a waits on a monitor", "confidence": "medium" }),
        )
        .unwrap();
        assert_eq!(payload.mode(), AnalysisMode::ThreadNarrative);
    }
}
