//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("Logging initialization failed: {0}")]
    Logging(String),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must be greater than zero")]
    MustBePositive(&'static str),

    #[error("{lower} ({lower_value}) exceeds {upper} ({upper_value})")]
    Inverted {
        lower: &'static str,
        lower_value: u64,
        upper: &'static str,
        upper_value: u64,
    },

    #[error("Invalid log filter '{filter}': {reason}")]
    InvalidLogFilter { filter: String, reason: String },
}

impl ValidationError {
    pub(super) fn positive(name: &'static str, value: u64) -> Result<(), Self> {
        if value == 0 {
            return Err(Self::MustBePositive(name));
        }
        Ok(())
    }

    pub(super) fn ordered(
        lower: &'static str,
        lower_value: u64,
        upper: &'static str,
        upper_value: u64,
    ) -> Result<(), Self> {
        if lower_value > upper_value {
            return Err(Self::Inverted {
                lower,
                lower_value,
                upper,
                upper_value,
            });
        }
        Ok(())
    }
}
