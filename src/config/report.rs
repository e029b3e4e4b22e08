//! Report query configuration

use serde::Deserialize;

use crate::domain::report::QueryLimits;

use super::error::ValidationError;

/// Paging and size limits for `report_get`
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ReportConfig {
    /// Elements per page when the query sets no limit
    #[serde(default = "default_limit")]
    pub default_limit: u32,

    #[serde(default = "default_max_limit")]
    pub max_limit: u32,

    /// Response budget when the query sets no maxChars
    #[serde(default = "default_max_chars")]
    pub default_max_chars: usize,

    /// Ceiling on any requested maxChars
    #[serde(default = "default_hard_max_chars")]
    pub hard_max_chars: usize,
}

impl ReportConfig {
    pub fn query_limits(&self) -> QueryLimits {
        QueryLimits {
            default_limit: self.default_limit,
            max_limit: self.max_limit,
            default_max_chars: self.default_max_chars,
            hard_max_chars: self.hard_max_chars,
        }
    }

    /// Validate report configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        ValidationError::positive("report.default_limit", self.default_limit.into())?;
        ValidationError::positive("report.default_max_chars", self.default_max_chars as u64)?;
        ValidationError::ordered(
            "report.default_limit",
            self.default_limit.into(),
            "report.max_limit",
            self.max_limit.into(),
        )?;
        ValidationError::ordered(
            "report.default_max_chars",
            self.default_max_chars as u64,
            "report.hard_max_chars",
            self.hard_max_chars as u64,
        )?;
        Ok(())
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
            default_max_chars: default_max_chars(),
            hard_max_chars: default_hard_max_chars(),
        }
    }
}

fn default_limit() -> u32 {
    50
}

fn default_max_limit() -> u32 {
    200
}

fn default_max_chars() -> usize {
    20_000
}

fn default_hard_max_chars() -> usize {
    100_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_query_limits() {
        assert_eq!(ReportConfig::default().query_limits(), QueryLimits::default());
    }

    #[test]
    fn test_default_limit_above_max_rejected() {
        let config = ReportConfig {
            default_limit: 300,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ValidationError::Inverted { .. })));
    }

    #[test]
    fn test_zero_budget_rejected() {
        let config = ReportConfig {
            default_max_chars: 0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ValidationError::MustBePositive("report.default_max_chars"))
        );
    }
}
