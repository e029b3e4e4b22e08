//! Analysis orchestrator - drives one model-led analysis run.
//!
//! Each round asks the model for its next message, runs the tool calls it
//! selected in order, and feeds the results back, until the mode's
//! completion tool is accepted, a budget runs out, or the run is stopped.
//!
//! The sampling request is the only suspension point that waits on the
//! model and the only place cancellation is observed mid-round.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::Instrument;

use crate::domain::analysis::{
    AnalysisBudget, AnalysisOutcome, AnalysisSession, CompletionPayload, SessionLimits,
    StopReason,
};
use crate::domain::foundation::{AnalysisMode, ToolCallId};
use crate::domain::report::{QueryLimits, ReportDocument, ReportQueryEngine};
use crate::domain::tools::{
    ToolCall, ToolDefinition, ToolError, ToolInvocation, ToolRegistry, ToolResult,
};
use crate::ports::{
    ArgumentSchemaValidator, ContentBlock, DebuggerBackend, ObjectInspector, SamplingClient,
    SamplingError, SamplingRequest, SamplingResult, ToolChoice, TranscriptMessage,
};

use super::dispatch::{DispatchTable, ToolHandler};
use super::executor::{ExecPolicy, ToolExecutor};
use super::{prompts, OrchestratorError};

/// Characters per token when the peer reports no usage.
const CHARS_PER_TOKEN: usize = 4;

/// Tunables for analysis runs.
#[derive(Debug, Clone, PartialEq)]
pub struct OrchestratorConfig {
    pub budget: AnalysisBudget,
    pub limits: SessionLimits,
    pub query_limits: QueryLimits,
    pub exec: ExecPolicy,
    /// Cap on generated tokens per sampling request.
    pub max_tokens_per_request: u32,
    /// Stop at start when the peer cannot use tools in sampling.
    pub require_tool_use: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            budget: AnalysisBudget::default(),
            limits: SessionLimits::default(),
            query_limits: QueryLimits::default(),
            exec: ExecPolicy::default(),
            max_tokens_per_request: 4096,
            require_tool_use: true,
        }
    }
}

/// Request to start an analysis run.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub mode: AnalysisMode,
    pub report: ReportDocument,
    /// Caller-supplied context, e.g. the summary to rewrite or the thread
    /// to narrate.
    pub context: Option<String>,
}

impl AnalysisRequest {
    pub fn new(mode: AnalysisMode, report: ReportDocument) -> Self {
        Self {
            mode,
            report,
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// Estimates tokens for `chars` characters, rounding up.
pub fn estimate_tokens(chars: usize) -> u64 {
    chars.div_ceil(CHARS_PER_TOKEN) as u64
}

/// Resolves once `cancel` carries `true`; never resolves if the sender is gone.
async fn cancelled(cancel: &mut watch::Receiver<bool>) {
    loop {
        if *cancel.borrow_and_update() {
            return;
        }
        if cancel.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Drives analysis sessions.
pub struct AnalysisOrchestrator {
    registry: Arc<ToolRegistry>,
    tables: HashMap<AnalysisMode, DispatchTable>,
    sampling: Arc<dyn SamplingClient>,
    validator: Arc<dyn ArgumentSchemaValidator>,
    executor: ToolExecutor,
    config: OrchestratorConfig,
}

impl AnalysisOrchestrator {
    /// Creates an orchestrator, checking every mode's catalog has handlers.
    pub fn new(
        registry: Arc<ToolRegistry>,
        sampling: Arc<dyn SamplingClient>,
        debugger: Arc<dyn DebuggerBackend>,
        inspector: Arc<dyn ObjectInspector>,
        validator: Arc<dyn ArgumentSchemaValidator>,
        config: OrchestratorConfig,
    ) -> Result<Self, OrchestratorError> {
        let tables = DispatchTable::for_all_modes(&registry)?;
        let executor = ToolExecutor::new(
            debugger,
            inspector,
            ReportQueryEngine::new(config.query_limits),
            config.exec,
        );
        Ok(Self {
            registry,
            tables,
            sampling,
            validator,
            executor,
            config,
        })
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// Runs one analysis to a terminal state.
    ///
    /// Sending `true` on the cancellation channel stops the run at the next
    /// check or while waiting on the model.
    pub async fn run(
        &self,
        request: AnalysisRequest,
        cancel: watch::Receiver<bool>,
    ) -> Result<AnalysisOutcome, OrchestratorError> {
        let session =
            AnalysisSession::new(request.mode, request.report.clone(), self.config.limits);
        let span = tracing::info_span!(
            "analysis",
            session_id = %session.id(),
            mode = %request.mode,
        );
        self.drive(session, request, cancel).instrument(span).await
    }

    async fn drive(
        &self,
        mut session: AnalysisSession,
        request: AnalysisRequest,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<AnalysisOutcome, OrchestratorError> {
        let mode = session.mode();
        let table = self
            .tables
            .get(&mode)
            .ok_or(OrchestratorError::MissingCompletionTool { mode })?;

        if *cancel.borrow() {
            return Self::stop(session, StopReason::Cancelled);
        }
        if let Some(message) = self.unsupported_reason() {
            tracing::warn!(%message, "Sampling unavailable, not starting analysis");
            return Self::stop(session, StopReason::UnsupportedOperation { message });
        }

        session.start()?;
        tracing::info!("Analysis started");

        let tools: Vec<ToolDefinition> =
            self.registry.tools_for(mode).into_iter().cloned().collect();
        let system_prompt = prompts::system_prompt(mode);
        let mut transcript = vec![TranscriptMessage::user(prompts::initial_message(
            mode,
            request.context.as_deref(),
        ))];
        let mut tool_choice = ToolChoice::Auto;

        loop {
            if *cancel.borrow() {
                return Self::stop(session, StopReason::Cancelled);
            }
            if let Some(reason) = session.exhausted_budget(&self.config.budget) {
                session.exhaust()?;
                tracing::info!(
                    iterations = session.iterations(),
                    tokens = session.tokens_used(),
                    "Analysis budget exhausted"
                );
                return Ok(AnalysisOutcome::Exhausted {
                    reason,
                    snapshot: session.snapshot(),
                });
            }

            let sampling_request = SamplingRequest {
                system_prompt: system_prompt.clone(),
                messages: transcript.clone(),
                tools: tools.clone(),
                tool_choice,
                max_tokens: self.config.max_tokens_per_request,
            };
            let prompt_chars = sampling_request.char_len();

            let reply = tokio::select! {
                biased;
                _ = cancelled(&mut cancel) => None,
                reply = self.sampling.request_completion(sampling_request) => Some(reply),
            };

            let reply = match reply {
                None => return Self::stop(session, StopReason::Cancelled),
                Some(Ok(reply)) => reply,
                Some(Err(err)) => return Self::sampling_failed(session, err),
            };

            let tokens = Self::tokens_for(&reply, prompt_chars);
            session.record_round(tokens);
            let iteration = session.iterations();

            let requests: Vec<ContentBlock> =
                reply.tool_requests().into_iter().cloned().collect();
            tracing::debug!(
                iteration,
                tokens,
                tool_calls = requests.len(),
                "Received model reply"
            );
            transcript.push(TranscriptMessage::assistant(reply.content));

            if requests.is_empty() {
                transcript.push(TranscriptMessage::user(prompts::TOOL_NUDGE));
                tool_choice = if self.sampling.is_tool_use_supported() {
                    ToolChoice::Required
                } else {
                    ToolChoice::Auto
                };
                continue;
            }
            tool_choice = ToolChoice::Auto;

            let mut results = Vec::with_capacity(requests.len());
            for request in &requests {
                let dispatched = match request {
                    ContentBlock::ToolUse(call) => {
                        self.dispatch(table, call, iteration, &mut session).await
                    }
                    ContentBlock::MalformedToolUse { id, reason, .. } => {
                        Self::reject_malformed(id, reason)
                    }
                    ContentBlock::Text(_) | ContentBlock::ToolResult(_) => continue,
                };
                match dispatched {
                    Dispatched::Result(result) => results.push(result),
                    Dispatched::Completed(payload) => {
                        session.complete()?;
                        tracing::info!(
                            iterations = session.iterations(),
                            tokens = session.tokens_used(),
                            "Analysis completed"
                        );
                        return Ok(AnalysisOutcome::Completed {
                            payload,
                            snapshot: session.snapshot(),
                        });
                    }
                }
            }
            transcript.push(TranscriptMessage::tool_results(results));
        }
    }

    /// Dispatches one call, recording it in the audit trail.
    async fn dispatch(
        &self,
        table: &DispatchTable,
        call: &ToolCall,
        iteration: u32,
        session: &mut AnalysisSession,
    ) -> Dispatched {
        let mut invocation = ToolInvocation::start(
            call.id().clone(),
            call.name(),
            call.arguments().clone(),
            iteration,
        );

        let outcome = self.execute(table, call, session).await;

        let dispatched = match outcome {
            Ok(Executed::Content(output, cached)) => {
                if cached {
                    invocation.mark_cached();
                }
                invocation.complete(None);
                Dispatched::Result(ToolResult::success(call.id().clone(), output))
            }
            Ok(Executed::Completion(payload)) => {
                invocation.complete(None);
                Dispatched::Completed(payload)
            }
            Err(err) => {
                let code = err.code();
                if code.is_environmental() {
                    tracing::warn!(
                        tool = call.name(),
                        %code,
                        environmental = true,
                        error = %err,
                        "Tool call failed"
                    );
                } else {
                    tracing::debug!(
                        tool = call.name(),
                        %code,
                        environmental = false,
                        error = %err,
                        "Tool call failed"
                    );
                }
                invocation.complete(Some(code));
                Dispatched::Result(ToolResult::failure(call.id().clone(), err.to_failure()))
            }
        };

        tracing::debug!(
            tool = call.name(),
            iteration,
            duration_ms = invocation.duration_ms(),
            "Tool call dispatched"
        );
        session.record_invocation(invocation);
        dispatched
    }

    /// Answers a tool request that named no tool.
    fn reject_malformed(id: &ToolCallId, reason: &str) -> Dispatched {
        let err = ToolError::SchemaValidation {
            tool: "<unnamed>".to_string(),
            message: reason.to_string(),
        };
        tracing::debug!(
            %id,
            code = %err.code(),
            environmental = false,
            "Malformed tool request rejected"
        );
        Dispatched::Result(ToolResult::failure(id.clone(), err.to_failure()))
    }

    async fn execute(
        &self,
        table: &DispatchTable,
        call: &ToolCall,
        session: &mut AnalysisSession,
    ) -> Result<Executed, ToolError> {
        let mode = table.mode();
        let handler = table.handler(call.name());
        let definition = self.registry.get(mode, call.name());
        let (handler, definition) = match (handler, definition) {
            (Some(handler), Some(definition)) => (handler, definition),
            _ => {
                return Err(ToolError::UnknownTool {
                    name: call.name().to_string(),
                    mode,
                })
            }
        };

        self.validator
            .validate(definition.input_schema(), call.arguments())
            .map_err(|e| ToolError::SchemaValidation {
                tool: call.name().to_string(),
                message: e.to_client_message(),
            })?;

        if handler == ToolHandler::Complete {
            return CompletionPayload::parse(mode, call.arguments())
                .map(Executed::Completion)
                .map_err(|e| ToolError::SchemaValidation {
                    tool: call.name().to_string(),
                    message: e.to_string(),
                });
        }

        let output = self.executor.execute(handler, call, session).await?;
        Ok(Executed::Content(output.content, output.cached))
    }

    fn unsupported_reason(&self) -> Option<String> {
        if !self.sampling.is_sampling_supported() {
            return Some("connected client does not support sampling".to_string());
        }
        if self.config.require_tool_use && !self.sampling.is_tool_use_supported() {
            return Some("connected client does not support tool use in sampling".to_string());
        }
        None
    }

    fn tokens_for(reply: &SamplingResult, prompt_chars: usize) -> u64 {
        match reply.usage {
            Some(usage) => usage.total(),
            None => estimate_tokens(prompt_chars + reply.char_len()),
        }
    }

    fn sampling_failed(
        session: AnalysisSession,
        err: SamplingError,
    ) -> Result<AnalysisOutcome, OrchestratorError> {
        let reason = if err.is_unsupported() {
            StopReason::UnsupportedOperation {
                message: err.to_string(),
            }
        } else {
            StopReason::SamplingFailed {
                message: err.to_string(),
            }
        };
        tracing::warn!(
            error = %err,
            unsupported = err.is_unsupported(),
            "Sampling failed, stopping analysis"
        );
        Self::stop(session, reason)
    }

    fn stop(
        mut session: AnalysisSession,
        reason: StopReason,
    ) -> Result<AnalysisOutcome, OrchestratorError> {
        session.stop()?;
        tracing::info!(?reason, iterations = session.iterations(), "Analysis stopped");
        Ok(AnalysisOutcome::Stopped {
            reason,
            snapshot: session.snapshot(),
        })
    }
}

enum Executed {
    Content(serde_json::Value, bool),
    Completion(CompletionPayload),
}

enum Dispatched {
    Result(ToolResult),
    Completed(CompletionPayload),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_estimate_rounds_up() {
        assert_eq!(estimate_tokens(0), 0);
        assert_eq!(estimate_tokens(4), 1);
        assert_eq!(estimate_tokens(5), 2);
    }

    #[test]
    fn default_config_matches_documented_budgets() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.budget.max_iterations, 100);
        assert_eq!(config.budget.max_tokens, 200_000);
        assert_eq!(config.max_tokens_per_request, 4096);
        assert!(config.require_tool_use);
    }

    #[test]
    fn request_builder_keeps_context() {
        let request = AnalysisRequest::new(
            AnalysisMode::ThreadNarrative,
            ReportDocument::new(serde_json::json!({})),
        )
        .with_context("12");
        assert_eq!(request.context.as_deref(), Some("12"));
    }
}
