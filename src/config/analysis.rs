//! Analysis loop configuration

use serde::Deserialize;

use crate::application::ExecPolicy;
use crate::domain::analysis::{AnalysisBudget, SessionLimits};

use super::error::ValidationError;

/// Budgets and registry ceilings for analysis runs
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Rounds before a run is exhausted
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Tokens (reported or estimated) before a run is exhausted
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u64,

    /// Cap on generated tokens per sampling request
    #[serde(default = "default_max_tokens_per_request")]
    pub max_tokens_per_request: u32,

    #[serde(default = "default_max_evidence_items")]
    pub max_evidence_items: usize,

    #[serde(default = "default_max_hypotheses")]
    pub max_hypotheses: usize,

    /// Debugger output longer than this is cut with a marker
    #[serde(default = "default_exec_output_max_chars")]
    pub exec_output_max_chars: usize,

    #[serde(default = "default_true")]
    pub cache_exec_results: bool,

    /// Refuse to start when the client cannot use tools in sampling
    #[serde(default = "default_true")]
    pub require_tool_use: bool,
}

impl AnalysisConfig {
    pub fn budget(&self) -> AnalysisBudget {
        AnalysisBudget {
            max_iterations: self.max_iterations,
            max_tokens: self.max_tokens,
        }
    }

    pub fn session_limits(&self) -> SessionLimits {
        SessionLimits {
            max_evidence_items: self.max_evidence_items,
            max_hypotheses: self.max_hypotheses,
        }
    }

    pub fn exec_policy(&self) -> ExecPolicy {
        ExecPolicy {
            max_output_chars: self.exec_output_max_chars,
            cache_results: self.cache_exec_results,
        }
    }

    /// Validate analysis configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::positive("analysis.max_iterations", self.max_iterations.into())?;
        ValidationError::positive("analysis.max_tokens", self.max_tokens)?;
        ValidationError::positive(
            "analysis.max_tokens_per_request",
            self.max_tokens_per_request.into(),
        )?;
        ValidationError::positive("analysis.max_evidence_items", self.max_evidence_items as u64)?;
        ValidationError::positive("analysis.max_hypotheses", self.max_hypotheses as u64)?;
        ValidationError::positive(
            "analysis.exec_output_max_chars",
            self.exec_output_max_chars as u64,
        )?;
        ValidationError::ordered(
            "analysis.max_tokens_per_request",
            self.max_tokens_per_request.into(),
            "analysis.max_tokens",
            self.max_tokens,
        )?;
        Ok(())
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            max_tokens: default_max_tokens(),
            max_tokens_per_request: default_max_tokens_per_request(),
            max_evidence_items: default_max_evidence_items(),
            max_hypotheses: default_max_hypotheses(),
            exec_output_max_chars: default_exec_output_max_chars(),
            cache_exec_results: true,
            require_tool_use: true,
        }
    }
}

fn default_max_iterations() -> u32 {
    100
}

fn default_max_tokens() -> u64 {
    200_000
}

fn default_max_tokens_per_request() -> u32 {
    4096
}

fn default_max_evidence_items() -> usize {
    50
}

fn default_max_hypotheses() -> usize {
    8
}

fn default_exec_output_max_chars() -> usize {
    20_000
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_defaults() {
        let config = AnalysisConfig::default();
        assert_eq!(config.max_iterations, 100);
        assert_eq!(config.max_tokens, 200_000);
        assert_eq!(config.max_evidence_items, 50);
        assert_eq!(config.max_hypotheses, 8);
        assert!(config.cache_exec_results);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let config = AnalysisConfig {
            max_iterations: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MustBePositive("analysis.max_iterations"))
        );
    }

    #[test]
    fn test_request_cap_above_session_budget_rejected() {
        let config = AnalysisConfig {
            max_tokens: 1000,
            max_tokens_per_request: 2000,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::Inverted { .. })));
    }

    #[test]
    fn test_conversions() {
        let config = AnalysisConfig {
            max_iterations: 7,
            exec_output_max_chars: 512,
            cache_exec_results: false,
            ..Default::default()
        };
        assert_eq!(config.budget().max_iterations, 7);
        assert_eq!(config.session_limits().max_hypotheses, 8);
        assert_eq!(config.exec_policy().max_output_chars, 512);
        assert!(!config.exec_policy().cache_results);
    }
}
