//! Sampling Client Port - "Ask the connected model for its next message".
//!
//! This port abstracts the peer that hosts the model. The orchestrator sends
//! the transcript, the mode's tool catalog and a tool-choice policy; the peer
//! answers with text and/or tool calls.
//!
//! # Design
//!
//! - Capability checks are answered from the peer's current state on every
//!   call; implementations must not cache them
//! - Provider-agnostic transcript format with typed content blocks
//! - Token usage is optional; callers estimate when it is absent
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoClient;
//!
//! #[async_trait]
//! impl SamplingClient for EchoClient {
//!     fn is_sampling_supported(&self) -> bool { true }
//!     fn is_tool_use_supported(&self) -> bool { true }
//!     async fn request_completion(
//!         &self,
//!         request: SamplingRequest,
//!     ) -> Result<SamplingResult, SamplingError> {
//!         Ok(SamplingResult::text("done"))
//!     }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::ToolCallId;
use crate::domain::tools::{ToolCall, ToolDefinition, ToolResult};

/// Port for requesting model completions from the connected peer.
#[async_trait]
pub trait SamplingClient: Send + Sync {
    /// True if the peer currently advertises sampling.
    fn is_sampling_supported(&self) -> bool;

    /// True if the peer currently advertises tool use within sampling.
    fn is_tool_use_supported(&self) -> bool;

    /// Requests the model's next message.
    ///
    /// Fails with [`SamplingError::Unsupported`] when sampling is not
    /// available.
    async fn request_completion(
        &self,
        request: SamplingRequest,
    ) -> Result<SamplingResult, SamplingError>;
}

/// Whether the model may, must, or must not call a tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    #[default]
    Auto,
    Required,
    None,
}

/// Role of a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// One piece of a transcript message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Text(String),
    ToolUse(ToolCall),
    /// A tool request the model sent without a usable tool name.
    MalformedToolUse {
        id: ToolCallId,
        input: Value,
        reason: String,
    },
    ToolResult(ToolResult),
}

impl ContentBlock {
    /// Number of characters this block contributes to a request.
    pub fn char_len(&self) -> usize {
        match self {
            ContentBlock::Text(text) => text.chars().count(),
            ContentBlock::ToolUse(call) => {
                call.name().chars().count() + call.arguments().to_string().chars().count()
            }
            ContentBlock::MalformedToolUse { input, .. } => input.to_string().chars().count(),
            ContentBlock::ToolResult(result) => result.render().chars().count(),
        }
    }

    /// True for blocks that ask for a tool to run, well-formed or not.
    pub fn is_tool_request(&self) -> bool {
        matches!(
            self,
            ContentBlock::ToolUse(_) | ContentBlock::MalformedToolUse { .. }
        )
    }
}

/// A message in the sampling transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptMessage {
    pub role: MessageRole,
    pub content: Vec<ContentBlock>,
}

impl TranscriptMessage {
    /// Creates a user message with plain text.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: vec![ContentBlock::Text(text.into())],
        }
    }

    /// Creates a user message carrying tool results, in call order.
    pub fn tool_results(results: Vec<ToolResult>) -> Self {
        Self {
            role: MessageRole::User,
            content: results.into_iter().map(ContentBlock::ToolResult).collect(),
        }
    }

    /// Creates an assistant message from a sampling result.
    pub fn assistant(content: Vec<ContentBlock>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content,
        }
    }

    pub fn char_len(&self) -> usize {
        self.content.iter().map(ContentBlock::char_len).sum()
    }
}

/// Request for the model's next message.
#[derive(Debug, Clone)]
pub struct SamplingRequest {
    pub system_prompt: String,
    pub messages: Vec<TranscriptMessage>,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: ToolChoice,
    /// Per-request cap on generated tokens.
    pub max_tokens: u32,
}

impl SamplingRequest {
    /// Characters of prompt text, for token estimation.
    pub fn char_len(&self) -> usize {
        self.system_prompt.chars().count()
            + self.messages.iter().map(TranscriptMessage::char_len).sum::<usize>()
    }
}

/// Token usage reported by the peer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }

    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// The model's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplingResult {
    pub content: Vec<ContentBlock>,
    pub usage: Option<TokenUsage>,
    pub model: Option<String>,
    pub stop_reason: Option<String>,
}

impl SamplingResult {
    /// Creates a text-only reply.
    pub fn text(text: impl Into<String>) -> Self {
        Self::from_content(vec![ContentBlock::Text(text.into())])
    }

    /// Creates a reply made of tool calls.
    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self::from_content(calls.into_iter().map(ContentBlock::ToolUse).collect())
    }

    pub fn from_content(content: Vec<ContentBlock>) -> Self {
        Self {
            content,
            usage: None,
            model: None,
            stop_reason: None,
        }
    }

    pub fn with_usage(mut self, usage: TokenUsage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Returns the tool calls in the order the model emitted them.
    pub fn calls(&self) -> Vec<&ToolCall> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::ToolUse(call) => Some(call),
                _ => None,
            })
            .collect()
    }

    /// Returns every tool request, malformed ones included, in emission order.
    pub fn tool_requests(&self) -> Vec<&ContentBlock> {
        self.content
            .iter()
            .filter(|block| block.is_tool_request())
            .collect()
    }

    /// Returns the concatenated text blocks.
    pub fn joined_text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text(text) => Some(text.as_str()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn char_len(&self) -> usize {
        self.content.iter().map(ContentBlock::char_len).sum()
    }
}

/// Sampling errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SamplingError {
    /// The peer does not support sampling (or tool use within sampling).
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// The peer rejected or failed the request.
    #[error("peer request failed: {0}")]
    Request(String),

    /// The peer's reply could not be understood.
    #[error("parse error: {0}")]
    Parse(String),
}

impl SamplingError {
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    pub fn request(message: impl Into<String>) -> Self {
        Self::Request(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported(_))
    }
}
