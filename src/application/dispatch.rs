//! Tool dispatch table.
//!
//! Each catalog entry maps to one [`ToolHandler`] variant. The table for a
//! mode is built from the registry when the orchestrator is constructed; a
//! catalog entry without a handler, or a mode without its completion tool,
//! fails construction instead of surfacing mid-run.

use std::collections::HashMap;

use crate::domain::foundation::AnalysisMode;
use crate::domain::tools::definitions::names;
use crate::domain::tools::ToolRegistry;

use super::OrchestratorError;

/// What executing a tool call means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolHandler {
    Exec,
    ReportGet,
    Inspect,
    ThreadStack,
    EvidenceAdd,
    HypothesisRegister,
    HypothesisScore,
    /// Ends the run when the payload validates.
    Complete,
}

impl ToolHandler {
    /// Returns the handler for a catalog name, if the name is known.
    pub fn for_name(name: &str) -> Option<Self> {
        let handler = match name {
            names::EXEC => ToolHandler::Exec,
            names::REPORT_GET => ToolHandler::ReportGet,
            names::INSPECT => ToolHandler::Inspect,
            names::GET_THREAD_STACK => ToolHandler::ThreadStack,
            names::EVIDENCE_ADD => ToolHandler::EvidenceAdd,
            names::HYPOTHESIS_REGISTER => ToolHandler::HypothesisRegister,
            names::HYPOTHESIS_SCORE => ToolHandler::HypothesisScore,
            names::ANALYSIS_COMPLETE
            | names::SUMMARY_REWRITE_COMPLETE
            | names::THREAD_NARRATIVE_COMPLETE => ToolHandler::Complete,
            _ => return None,
        };
        Some(handler)
    }
}

/// Handlers for every tool offered in one mode.
#[derive(Debug, Clone)]
pub struct DispatchTable {
    mode: AnalysisMode,
    handlers: HashMap<String, ToolHandler>,
}

impl DispatchTable {
    /// Builds the table for `mode`, checking it against the registry.
    pub fn for_mode(
        registry: &ToolRegistry,
        mode: AnalysisMode,
    ) -> Result<Self, OrchestratorError> {
        let mut handlers = HashMap::new();
        for tool in registry.tools_for(mode) {
            let handler =
                ToolHandler::for_name(tool.name()).ok_or_else(|| OrchestratorError::UnhandledTool {
                    name: tool.name().to_string(),
                    mode,
                })?;
            if handler == ToolHandler::Complete && tool.name() != mode.completion_tool_name() {
                return Err(OrchestratorError::ForeignCompletionTool {
                    name: tool.name().to_string(),
                    mode,
                });
            }
            handlers.insert(tool.name().to_string(), handler);
        }

        if !handlers.contains_key(mode.completion_tool_name()) {
            return Err(OrchestratorError::MissingCompletionTool { mode });
        }

        Ok(Self { mode, handlers })
    }

    /// Builds tables for every mode.
    pub fn for_all_modes(
        registry: &ToolRegistry,
    ) -> Result<HashMap<AnalysisMode, DispatchTable>, OrchestratorError> {
        AnalysisMode::all()
            .iter()
            .map(|mode| Ok((*mode, Self::for_mode(registry, *mode)?)))
            .collect()
    }

    pub fn mode(&self) -> AnalysisMode {
        self.mode
    }

    pub fn handler(&self, name: &str) -> Option<ToolHandler> {
        self.handlers.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tools::ToolDefinition;
    use serde_json::json;

    fn object_schema() -> serde_json::Value {
        json!({ "type": "object", "properties": {} })
    }

    #[test]
    fn standard_catalog_is_fully_handled() {
        let registry = ToolRegistry::standard().unwrap();
        let tables = DispatchTable::for_all_modes(&registry).unwrap();

        assert_eq!(tables[&AnalysisMode::RootCause].len(), 8);
        assert_eq!(tables[&AnalysisMode::SummaryRewrite].len(), 5);
        assert_eq!(tables[&AnalysisMode::ThreadNarrative].len(), 5);
    }

    #[test]
    fn completion_tool_is_scoped_to_its_mode() {
        let registry = ToolRegistry::standard().unwrap();
        let table = DispatchTable::for_mode(&registry, AnalysisMode::SummaryRewrite).unwrap();

        assert_eq!(
            table.handler("analysis_summary_rewrite_complete"),
            Some(ToolHandler::Complete)
        );
        assert_eq!(table.handler("analysis_complete"), None);
        assert_eq!(table.handler("analysis_evidence_add"), None);
    }

    #[test]
    fn unknown_catalog_entry_fails_construction() {
        let mut registry = ToolRegistry::standard().unwrap();
        registry
            .register_for_mode(
                ToolDefinition::new("dump_heap", "Dump the heap", object_schema()),
                AnalysisMode::RootCause,
            )
            .unwrap();

        let err = DispatchTable::for_mode(&registry, AnalysisMode::RootCause).unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::UnhandledTool { ref name, .. } if name == "dump_heap"
        ));
    }

    #[test]
    fn mode_without_completion_tool_fails_construction() {
        let mut registry = ToolRegistry::new();
        registry
            .register_shared(crate::domain::tools::definitions::exec_tool())
            .unwrap();

        let err = DispatchTable::for_mode(&registry, AnalysisMode::ThreadNarrative).unwrap_err();
        assert!(matches!(err, OrchestratorError::MissingCompletionTool { .. }));
    }
}
