//! Ledger Tools - Evidence and hypothesis bookkeeping.
//!
//! These tools only touch session state; they never reach the debugger.

use serde::{Deserialize, Serialize};

use crate::domain::analysis::{EvidenceDraft, HypothesisDraft, HypothesisUpdate};
use crate::domain::tools::ToolDefinition;

use super::names;

// ═══════════════════════════════════════════════════════════════════════════
// Tool Parameters
// ═══════════════════════════════════════════════════════════════════════════

/// Parameters for `analysis_evidence_add`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceAddParams {
    pub items: Vec<EvidenceDraft>,
}

/// Parameters for `analysis_hypothesis_register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HypothesisRegisterParams {
    pub hypotheses: Vec<HypothesisDraft>,
}

/// Parameters for `analysis_hypothesis_score`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HypothesisScoreParams {
    pub updates: Vec<HypothesisUpdate>,
}

fn string_list(description: &str) -> serde_json::Value {
    serde_json::json!({
        "type": "array",
        "items": { "type": "string" },
        "description": description
    })
}

// ═══════════════════════════════════════════════════════════════════════════
// Tool Definitions
// ═══════════════════════════════════════════════════════════════════════════

pub fn evidence_add_tool() -> ToolDefinition {
    ToolDefinition::new(
        names::EVIDENCE_ADD,
        "Record facts you have verified. Each item gets an id (E1, E2, ...) you can cite \
         in hypotheses and in the final answer.",
        serde_json::json!({
            "type": "object",
            "required": ["items"],
            "properties": {
                "items": {
                    "type": "array",
                    "minItems": 1,
                    "items": {
                        "type": "object",
                        "required": ["source", "finding"],
                        "properties": {
                            "id": { "type": "string", "description": "Optional explicit id" },
                            "source": {
                                "type": "string",
                                "description": "Command or report path the fact came from"
                            },
                            "finding": { "type": "string" },
                            "whyItMatters": { "type": "string" },
                            "tags": string_list("Free-form labels")
                        }
                    }
                }
            }
        }),
    )
}

pub fn hypothesis_register_tool() -> ToolDefinition {
    ToolDefinition::new(
        names::HYPOTHESIS_REGISTER,
        "Register competing explanations for the crash. Each gets an id (H1, H2, ...).",
        serde_json::json!({
            "type": "object",
            "required": ["hypotheses"],
            "properties": {
                "hypotheses": {
                    "type": "array",
                    "minItems": 1,
                    "items": {
                        "type": "object",
                        "required": ["hypothesis", "confidence"],
                        "properties": {
                            "id": { "type": "string", "description": "Optional explicit id" },
                            "hypothesis": { "type": "string" },
                            "confidence": {
                                "type": "string",
                                "enum": ["high", "medium", "low", "unknown"]
                            },
                            "unknowns": string_list("What is not yet known"),
                            "testsToRun": string_list("Checks that would confirm or refute it")
                        }
                    }
                }
            }
        }),
    )
}

pub fn hypothesis_score_tool() -> ToolDefinition {
    ToolDefinition::new(
        names::HYPOTHESIS_SCORE,
        "Update hypotheses: change confidence, link supporting or contradicting evidence ids, \
         replace notes. Updates are applied independently.",
        serde_json::json!({
            "type": "object",
            "required": ["updates"],
            "properties": {
                "updates": {
                    "type": "array",
                    "minItems": 1,
                    "items": {
                        "type": "object",
                        "required": ["id"],
                        "properties": {
                            "id": { "type": "string" },
                            "confidence": {
                                "type": "string",
                                "enum": ["high", "medium", "low", "unknown"]
                            },
                            "supportsEvidenceIds": string_list("Evidence ids that support it"),
                            "contradictsEvidenceIds": string_list("Evidence ids against it"),
                            "notes": { "type": "string" }
                        }
                    }
                }
            }
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::analysis::Confidence;

    #[test]
    fn register_params_deserialize() {
        let params: HypothesisRegisterParams = serde_json::from_value(serde_json::json!({
            "hypotheses": [
                { "hypothesis": "Deadlock on the config lock", "confidence": "medium",
                  "testsToRun": ["!syncblk"] }
            ]
        }))
        .unwrap();
        assert_eq!(params.hypotheses[0].confidence, Confidence::Medium);
        assert_eq!(
            params.hypotheses[0].tests_to_run.as_deref(),
            Some(&["!syncblk".to_string()][..])
        );
    }

    #[test]
    fn hypothesis_confidence_enum_includes_unknown() {
        let tool = hypothesis_register_tool();
        let confidence =
            &tool.input_schema()["properties"]["hypotheses"]["items"]["properties"]["confidence"];
        assert!(confidence["enum"].as_array().unwrap().contains(&serde_json::json!("unknown")));
    }
}
