//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `DUMP_ANALYST` prefix and nested values use double underscores as separators.
//! Every setting has a default, so an empty environment yields a usable config.
//!
//! # Example
//!
//! ```no_run
//! use dump_analyst::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! config.logging.init_tracing().expect("Failed to initialize logging");
//!
//! println!("Iteration budget: {}", config.analysis.max_iterations);
//! ```

mod analysis;
mod error;
mod logging;
mod report;

pub use analysis::AnalysisConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use report::ReportConfig;

use serde::Deserialize;

use crate::application::OrchestratorConfig;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    /// Analysis loop budgets and registry ceilings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Report paging and size limits
    #[serde(default)]
    pub report: ReportConfig,

    /// Tracing subscriber settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `DUMP_ANALYST` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `DUMP_ANALYST__ANALYSIS__MAX_ITERATIONS=40` -> `analysis.max_iterations = 40`
    /// - `DUMP_ANALYST__REPORT__DEFAULT_MAX_CHARS=8000` -> `report.default_max_chars = 8000`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("DUMP_ANALYST")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.analysis.validate()?;
        self.report.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    /// Settings for [`crate::application::AnalysisOrchestrator`].
    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            budget: self.analysis.budget(),
            limits: self.analysis.session_limits(),
            query_limits: self.report.query_limits(),
            exec: self.analysis.exec_policy(),
            max_tokens_per_request: self.analysis.max_tokens_per_request,
            require_tool_use: self.analysis.require_tool_use,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "DUMP_ANALYST__ANALYSIS__MAX_ITERATIONS",
        "DUMP_ANALYST__ANALYSIS__CACHE_EXEC_RESULTS",
        "DUMP_ANALYST__REPORT__DEFAULT_MAX_CHARS",
        "DUMP_ANALYST__LOGGING__JSON",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_with_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.analysis, AnalysisConfig::default());
        assert_eq!(config.report, ReportConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("DUMP_ANALYST__ANALYSIS__MAX_ITERATIONS", "12");
        env::set_var("DUMP_ANALYST__ANALYSIS__CACHE_EXEC_RESULTS", "false");
        env::set_var("DUMP_ANALYST__REPORT__DEFAULT_MAX_CHARS", "8000");
        env::set_var("DUMP_ANALYST__LOGGING__JSON", "true");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.analysis.max_iterations, 12);
        assert!(!config.analysis.cache_exec_results);
        assert_eq!(config.report.default_max_chars, 8000);
        assert!(config.logging.json);
    }

    #[test]
    fn test_invalid_value_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("DUMP_ANALYST__ANALYSIS__MAX_ITERATIONS", "0");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_orchestrator_config_carries_sections() {
        let config = AppConfig {
            analysis: AnalysisConfig {
                max_iterations: 9,
                require_tool_use: false,
                ..Default::default()
            },
            ..Default::default()
        };
        let orchestrator = config.orchestrator_config();
        assert_eq!(orchestrator.budget.max_iterations, 9);
        assert!(!orchestrator.require_tool_use);
        assert_eq!(orchestrator.query_limits.default_max_chars, 20_000);
    }
}
