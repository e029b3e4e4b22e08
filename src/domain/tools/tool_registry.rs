//! Tool Registry - The fixed catalog of tools offered to the model per mode.
//!
//! The registry holds shared tools (offered in every mode) and mode-specific
//! tools. It is built once, validated at construction, and then shared
//! read-only behind an `Arc`.
//!
//! # Example
//!
//! ```
//! use dump_analyst::domain::foundation::AnalysisMode;
//! use dump_analyst::domain::tools::ToolRegistry;
//!
//! let registry = ToolRegistry::standard().unwrap();
//! let tools = registry.tools_for(AnalysisMode::SummaryRewrite);
//! assert_eq!(tools.len(), 5);
//! ```

use std::collections::HashMap;

use thiserror::Error;

use crate::domain::foundation::AnalysisMode;

use super::definitions::{
    analysis_complete_tool, evidence_add_tool, exec_tool, get_thread_stack_tool,
    hypothesis_register_tool, hypothesis_score_tool, inspect_tool, report_get_tool,
    summary_rewrite_complete_tool, thread_narrative_complete_tool,
};
use super::ToolDefinition;

/// Errors raised while building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Tool '{0}' is already registered")]
    DuplicateTool(String),

    #[error("Tool '{name}' must have an object-typed input schema")]
    InvalidSchema { name: String },
}

/// Catalog of tools, looked up by mode.
#[derive(Debug, Clone, Default)]
pub struct ToolRegistry {
    /// All registered tools by name
    tools: HashMap<String, ToolDefinition>,

    /// Tools offered in every mode, in registration order
    shared_tools: Vec<String>,

    /// Mode-specific tools, in registration order
    mode_tools: HashMap<AnalysisMode, Vec<String>>,
}

impl ToolRegistry {
    /// Creates a new empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the canonical catalog.
    ///
    /// Every mode gets `exec`, `report_get`, `inspect` and `get_thread_stack`
    /// followed by its own completion tool; root-cause additionally gets the
    /// evidence and hypothesis tools.
    pub fn standard() -> Result<Self, RegistryError> {
        let mut registry = Self::new();
        registry.register_shared(exec_tool())?;
        registry.register_shared(report_get_tool())?;
        registry.register_shared(inspect_tool())?;
        registry.register_shared(get_thread_stack_tool())?;

        registry.register_for_mode(analysis_complete_tool(), AnalysisMode::RootCause)?;
        registry.register_for_mode(evidence_add_tool(), AnalysisMode::RootCause)?;
        registry.register_for_mode(hypothesis_register_tool(), AnalysisMode::RootCause)?;
        registry.register_for_mode(hypothesis_score_tool(), AnalysisMode::RootCause)?;

        registry
            .register_for_mode(summary_rewrite_complete_tool(), AnalysisMode::SummaryRewrite)?;
        registry
            .register_for_mode(thread_narrative_complete_tool(), AnalysisMode::ThreadNarrative)?;
        Ok(registry)
    }

    /// Registers a tool offered in every mode.
    pub fn register_shared(&mut self, definition: ToolDefinition) -> Result<(), RegistryError> {
        let name = self.insert(definition)?;
        self.shared_tools.push(name);
        Ok(())
    }

    /// Registers a tool for a single mode.
    pub fn register_for_mode(
        &mut self,
        definition: ToolDefinition,
        mode: AnalysisMode,
    ) -> Result<(), RegistryError> {
        self.register_for_modes(definition, &[mode])
    }

    /// Registers a tool for several modes.
    pub fn register_for_modes(
        &mut self,
        definition: ToolDefinition,
        modes: &[AnalysisMode],
    ) -> Result<(), RegistryError> {
        let name = self.insert(definition)?;
        for mode in modes {
            self.mode_tools.entry(*mode).or_default().push(name.clone());
        }
        Ok(())
    }

    fn insert(&mut self, definition: ToolDefinition) -> Result<String, RegistryError> {
        let name = definition.name().to_string();
        if self.tools.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }
        if definition.input_schema().get("type").and_then(|t| t.as_str()) != Some("object") {
            return Err(RegistryError::InvalidSchema { name });
        }
        self.tools.insert(name.clone(), definition);
        Ok(name)
    }

    /// Gets all tools available in a mode: shared tools first, then the
    /// mode's own tools, each in registration order.
    pub fn tools_for(&self, mode: AnalysisMode) -> Vec<&ToolDefinition> {
        self.names_for(mode)
            .filter_map(|name| self.tools.get(name))
            .collect()
    }

    fn names_for(&self, mode: AnalysisMode) -> impl Iterator<Item = &String> {
        self.shared_tools
            .iter()
            .chain(self.mode_tools.get(&mode).into_iter().flatten())
    }

    /// Gets a tool definition if it is available in `mode`.
    pub fn get(&self, mode: AnalysisMode, name: &str) -> Option<&ToolDefinition> {
        if self.is_available(name, mode) {
            self.tools.get(name)
        } else {
            None
        }
    }

    /// Checks if a tool is available in a mode.
    pub fn is_available(&self, name: &str, mode: AnalysisMode) -> bool {
        self.names_for(mode).any(|n| n == name)
    }

    /// Returns the number of registered tools.
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Converts a mode's tools to MCP `tools` entries.
    pub fn to_mcp_tools(&self, mode: AnalysisMode) -> Vec<serde_json::Value> {
        self.tools_for(mode)
            .iter()
            .map(|tool| tool.to_mcp_format())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tool(name: &str) -> ToolDefinition {
        ToolDefinition::new(
            name,
            format!("Description for {}", name),
            serde_json::json!({ "type": "object" }),
        )
    }

    fn names(registry: &ToolRegistry, mode: AnalysisMode) -> Vec<String> {
        registry
            .tools_for(mode)
            .iter()
            .map(|t| t.name().to_string())
            .collect()
    }

    #[test]
    fn standard_root_cause_catalog_is_ordered() {
        let registry = ToolRegistry::standard().unwrap();
        assert_eq!(
            names(&registry, AnalysisMode::RootCause),
            vec![
                "exec",
                "report_get",
                "inspect",
                "get_thread_stack",
                "analysis_complete",
                "analysis_evidence_add",
                "analysis_hypothesis_register",
                "analysis_hypothesis_score",
            ]
        );
    }

    #[test]
    fn standard_secondary_modes_have_five_tools() {
        let registry = ToolRegistry::standard().unwrap();
        assert_eq!(
            names(&registry, AnalysisMode::SummaryRewrite),
            vec![
                "exec",
                "report_get",
                "inspect",
                "get_thread_stack",
                "analysis_summary_rewrite_complete"
            ]
        );
        assert_eq!(
            names(&registry, AnalysisMode::ThreadNarrative).last().unwrap(),
            "analysis_thread_narrative_complete"
        );
    }

    #[test]
    fn shared_tools_are_identical_across_modes() {
        let registry = ToolRegistry::standard().unwrap();
        let a = registry.get(AnalysisMode::RootCause, "report_get").unwrap();
        let b = registry.get(AnalysisMode::ThreadNarrative, "report_get").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn mode_tools_are_not_offered_elsewhere() {
        let registry = ToolRegistry::standard().unwrap();
        assert!(registry.get(AnalysisMode::SummaryRewrite, "analysis_evidence_add").is_none());
        assert!(!registry.is_available("analysis_complete", AnalysisMode::ThreadNarrative));
        assert!(registry.is_available("analysis_complete", AnalysisMode::RootCause));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut registry = ToolRegistry::new();
        registry.register_shared(sample_tool("exec")).unwrap();

        let err = registry
            .register_for_mode(sample_tool("exec"), AnalysisMode::RootCause)
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateTool("exec".into()));
        assert_eq!(registry.tool_count(), 1);
    }

    #[test]
    fn non_object_schema_is_rejected() {
        let mut registry = ToolRegistry::new();
        let tool = ToolDefinition::new("bad", "", serde_json::json!({ "type": "string" }));
        assert!(matches!(
            registry.register_shared(tool),
            Err(RegistryError::InvalidSchema { .. })
        ));
    }

    #[test]
    fn every_standard_schema_lists_required_properties() {
        let registry = ToolRegistry::standard().unwrap();
        for mode in AnalysisMode::all() {
            for tool in registry.tools_for(*mode) {
                let properties = tool.input_schema()["properties"].as_object().unwrap();
                for required in tool.required_fields() {
                    assert!(
                        properties.contains_key(required),
                        "{} lacks {}",
                        tool.name(),
                        required
                    );
                }
            }
        }
    }

    #[test]
    fn mcp_tools_use_input_schema_key() {
        let registry = ToolRegistry::standard().unwrap();
        let tools = registry.to_mcp_tools(AnalysisMode::RootCause);
        assert_eq!(tools.len(), 8);
        assert!(tools.iter().all(|t| t["inputSchema"]["type"] == "object"));
    }
}
