//! Executes non-terminal tool calls against the session and the debugger.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::domain::analysis::AnalysisSession;
use crate::domain::report::{ReportQuery, ReportQueryEngine};
use crate::domain::tools::definitions::{
    EvidenceAddParams, ExecParams, HypothesisRegisterParams, HypothesisScoreParams,
    InspectParams, ThreadStackParams,
};
use crate::domain::tools::{ToolCall, ToolError};
use crate::ports::{BackendError, DebuggerBackend, ObjectInspector};

use super::ToolHandler;

/// Content produced by a successful tool call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolOutput {
    pub content: Value,
    /// True when an `exec` result was served from the session cache.
    pub cached: bool,
}

impl ToolOutput {
    fn fresh(content: Value) -> Self {
        Self {
            content,
            cached: false,
        }
    }
}

/// How debugger output is handled.
///
/// `max_output_chars` bounds every debugger-sourced result: `exec` output,
/// thread stacks and inspected objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecPolicy {
    pub max_output_chars: usize,
    pub cache_results: bool,
}

impl Default for ExecPolicy {
    fn default() -> Self {
        Self {
            max_output_chars: 20_000,
            cache_results: true,
        }
    }
}

/// Runs tool handlers other than completion.
pub struct ToolExecutor {
    debugger: Arc<dyn DebuggerBackend>,
    inspector: Arc<dyn ObjectInspector>,
    engine: ReportQueryEngine,
    exec: ExecPolicy,
}

impl From<BackendError> for ToolError {
    fn from(err: BackendError) -> Self {
        ToolError::Backend(err.to_string())
    }
}

fn parse<T: DeserializeOwned>(call: &ToolCall) -> Result<T, ToolError> {
    call.parse_arguments()
        .map_err(|e| ToolError::InvalidArgument(format!("{}: {}", call.name(), e)))
}

fn require_non_blank<'a>(field: &str, value: &'a str) -> Result<&'a str, ToolError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ToolError::InvalidArgument(format!("'{}' cannot be empty", field)));
    }
    Ok(trimmed)
}

/// Cuts `output` to `max_chars` characters, appending a marker when cut.
fn bound_output(output: &str, max_chars: usize) -> (String, bool) {
    let total = output.chars().count();
    if total <= max_chars {
        return (output.to_string(), false);
    }
    let kept: String = output.chars().take(max_chars).collect();
    (
        format!(
            "{}\n[output truncated: showing {} of {} characters]",
            kept, max_chars, total
        ),
        true,
    )
}

impl ToolExecutor {
    pub fn new(
        debugger: Arc<dyn DebuggerBackend>,
        inspector: Arc<dyn ObjectInspector>,
        engine: ReportQueryEngine,
        exec: ExecPolicy,
    ) -> Self {
        Self {
            debugger,
            inspector,
            engine,
            exec,
        }
    }

    /// Executes `call` with `handler`.
    ///
    /// Completion calls are handled by the orchestrator and rejected here.
    pub async fn execute(
        &self,
        handler: ToolHandler,
        call: &ToolCall,
        session: &mut AnalysisSession,
    ) -> Result<ToolOutput, ToolError> {
        match handler {
            ToolHandler::Exec => self.exec(parse(call)?, session).await,
            ToolHandler::ReportGet => {
                self.report_get(parse(call)?, session).map(ToolOutput::fresh)
            }
            ToolHandler::Inspect => self.inspect(parse(call)?).await.map(ToolOutput::fresh),
            ToolHandler::ThreadStack => {
                self.thread_stack(parse(call)?).await.map(ToolOutput::fresh)
            }
            ToolHandler::EvidenceAdd => {
                Self::evidence_add(parse(call)?, session).map(ToolOutput::fresh)
            }
            ToolHandler::HypothesisRegister => {
                Self::hypothesis_register(parse(call)?, session).map(ToolOutput::fresh)
            }
            ToolHandler::HypothesisScore => {
                Self::hypothesis_score(parse(call)?, session).map(ToolOutput::fresh)
            }
            ToolHandler::Complete => Err(ToolError::InvalidArgument(format!(
                "'{}' is a completion tool",
                call.name()
            ))),
        }
    }

    async fn exec(
        &self,
        params: ExecParams,
        session: &mut AnalysisSession,
    ) -> Result<ToolOutput, ToolError> {
        let command = require_non_blank("command", &params.command)?.to_string();

        let cached = if self.exec.cache_results {
            session.cached_exec(&command).map(str::to_string)
        } else {
            None
        };

        let (raw, from_cache) = match cached {
            Some(output) => (output, true),
            None => {
                let output = self.debugger.execute(&command).await?;
                if self.exec.cache_results {
                    session.cache_exec(&command, output.clone());
                }
                (output, false)
            }
        };

        let (output, truncated) = bound_output(&raw, self.exec.max_output_chars);
        Ok(ToolOutput {
            content: json!({
                "command": command,
                "output": output,
                "truncated": truncated,
            }),
            cached: from_cache,
        })
    }

    fn report_get(
        &self,
        query: ReportQuery,
        session: &AnalysisSession,
    ) -> Result<Value, ToolError> {
        let page = self.engine.resolve(session.report(), &query)?;
        serde_json::to_value(page).map_err(|e| ToolError::InvalidArgument(e.to_string()))
    }

    async fn inspect(&self, params: InspectParams) -> Result<Value, ToolError> {
        let address = require_non_blank("address", &params.address)?;
        let summary = self.inspector.inspect(address, params.depth()).await?;

        // An oversized graph is handed back as bounded JSON text.
        let rendered =
            serde_json::to_string(&summary).map_err(|e| ToolError::Backend(e.to_string()))?;
        let (object, truncated) = if rendered.chars().count() > self.exec.max_output_chars {
            let (text, _) = bound_output(&rendered, self.exec.max_output_chars);
            (Value::String(text), true)
        } else {
            (summary, false)
        };
        Ok(json!({
            "address": address,
            "maxDepth": params.depth(),
            "object": object,
            "truncated": truncated,
        }))
    }

    async fn thread_stack(&self, params: ThreadStackParams) -> Result<Value, ToolError> {
        let thread_id = require_non_blank("threadId", &params.thread_id)?;
        let stack = self.debugger.thread_stack(thread_id).await?;
        let (stack, truncated) = bound_output(&stack, self.exec.max_output_chars);
        Ok(json!({
            "threadId": thread_id,
            "stack": stack,
            "truncated": truncated,
        }))
    }

    fn evidence_add(
        params: EvidenceAddParams,
        session: &mut AnalysisSession,
    ) -> Result<Value, ToolError> {
        let ledger = session.ledger_mut();
        let ids = ledger.add(params.items)?;
        Ok(json!({
            "added": ids,
            "count": ledger.len(),
            "remaining": ledger.remaining(),
        }))
    }

    fn hypothesis_register(
        params: HypothesisRegisterParams,
        session: &mut AnalysisSession,
    ) -> Result<Value, ToolError> {
        let (tracker, _) = session.tracker_and_ledger();
        let ids = tracker.register(params.hypotheses)?;
        Ok(json!({
            "registered": ids,
            "count": tracker.len(),
            "remaining": tracker.remaining(),
        }))
    }

    fn hypothesis_score(
        params: HypothesisScoreParams,
        session: &mut AnalysisSession,
    ) -> Result<Value, ToolError> {
        let (tracker, ledger) = session.tracker_and_ledger();
        let report = tracker.score(params.updates, ledger);
        let hypotheses: Vec<_> = report
            .updated
            .iter()
            .filter_map(|id| tracker.get(id))
            .collect();
        Ok(json!({
            "updated": report.updated,
            "failures": report.failures,
            "hypotheses": hypotheses,
        }))
    }
}
