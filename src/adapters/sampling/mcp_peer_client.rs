//! MCP Peer Sampling Client - SamplingClient over `sampling/createMessage`.
//!
//! Translates the provider-agnostic transcript into the MCP sampling wire
//! format and parses the peer's reply back into content blocks.
//!
//! Capabilities are read from the peer on every call, so a client that
//! drops sampling mid-session is noticed on the next round.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::domain::foundation::ToolCallId;
use crate::domain::tools::{ToolCall, ToolDefinition};
use crate::ports::{
    ContentBlock, McpPeer, MessageRole, PeerError, SamplingClient, SamplingError,
    SamplingRequest, SamplingResult, TokenUsage, ToolChoice, TranscriptMessage,
};

/// JSON-RPC "method not found"; peers answer it when sampling is absent.
const METHOD_NOT_FOUND: i64 = -32601;

// ════════════════════════════════════════════════════════════════════════════════
// Wire Types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateMessageParams<'a> {
    messages: Vec<WireMessage>,
    system_prompt: &'a str,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<WireToolChoice>,
}

#[derive(Debug, Serialize)]
struct WireToolChoice {
    mode: ToolChoice,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: MessageRole,
    content: Vec<WireContent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireContent {
    Text {
        text: String,
    },
    ToolUse {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        input: Option<Value>,
    },
    ToolResult {
        #[serde(rename = "toolUseId")]
        tool_use_id: String,
        content: Vec<WireContent>,
        #[serde(rename = "isError", default)]
        is_error: bool,
    },
    #[serde(other)]
    Unsupported,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireReplyContent {
    Many(Vec<WireContent>),
    One(WireContent),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateMessageReply {
    content: WireReplyContent,
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    stop_reason: Option<String>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Client
// ════════════════════════════════════════════════════════════════════════════════

/// Sampling client backed by the connected MCP peer.
#[derive(Clone)]
pub struct PeerSamplingClient<P: McpPeer> {
    peer: Arc<P>,
}

impl<P: McpPeer> PeerSamplingClient<P> {
    pub fn new(peer: Arc<P>) -> Self {
        Self { peer }
    }

    fn sampling_capability(&self) -> Option<Value> {
        self.peer
            .client_capabilities()
            .and_then(|caps| caps.get("sampling").cloned())
            .filter(|sampling| !sampling.is_null())
    }

    fn to_params<'a>(&self, request: &'a SamplingRequest) -> CreateMessageParams<'a> {
        let with_tools = !request.tools.is_empty();
        CreateMessageParams {
            messages: request.messages.iter().map(to_wire_message).collect(),
            system_prompt: &request.system_prompt,
            max_tokens: request.max_tokens,
            tools: request.tools.iter().map(ToolDefinition::to_mcp_format).collect(),
            tool_choice: with_tools.then_some(WireToolChoice {
                mode: request.tool_choice,
            }),
        }
    }
}

fn to_wire_message(message: &TranscriptMessage) -> WireMessage {
    WireMessage {
        role: message.role,
        content: message.content.iter().map(to_wire_content).collect(),
    }
}

fn to_wire_content(block: &ContentBlock) -> WireContent {
    match block {
        ContentBlock::Text(text) => WireContent::Text { text: text.clone() },
        ContentBlock::ToolUse(call) => WireContent::ToolUse {
            id: Some(call.id().as_str().to_string()),
            name: Some(call.name().to_string()),
            input: Some(call.arguments().clone()),
        },
        ContentBlock::MalformedToolUse { id, input, .. } => WireContent::ToolUse {
            id: Some(id.as_str().to_string()),
            name: None,
            input: Some(input.clone()),
        },
        ContentBlock::ToolResult(result) => WireContent::ToolResult {
            tool_use_id: result.tool_call_id().as_str().to_string(),
            content: vec![WireContent::Text {
                text: result.render(),
            }],
            is_error: result.is_error(),
        },
    }
}

/// Converts one reply block. A tool request without a name is kept as a
/// malformed request so the model can be told about it.
fn from_wire_content(index: usize, block: WireContent) -> Option<ContentBlock> {
    match block {
        WireContent::Text { text } => Some(ContentBlock::Text(text)),
        WireContent::ToolUse { id, name, input } => {
            let id = id
                .and_then(|raw| ToolCallId::new(raw).ok())
                .unwrap_or_else(|| ToolCallId::sequential(index as u32 + 1));
            let input = input.unwrap_or_else(|| Value::Object(Default::default()));
            match name.filter(|n| !n.trim().is_empty()) {
                Some(name) => Some(ContentBlock::ToolUse(ToolCall::new(id, name, input))),
                None => {
                    tracing::debug!(id = %id, "Reply carried a tool_use block without a name");
                    Some(ContentBlock::MalformedToolUse {
                        id,
                        input,
                        reason: "tool_use block without a name".to_string(),
                    })
                }
            }
        }
        // Peers do not send tool results back; images and audio are ignored.
        WireContent::ToolResult { .. } | WireContent::Unsupported => None,
    }
}

fn parse_reply(raw: Value) -> Result<SamplingResult, SamplingError> {
    let reply: CreateMessageReply = serde_json::from_value(raw)
        .map_err(|e| SamplingError::parse(format!("invalid createMessage result: {}", e)))?;

    let blocks = match reply.content {
        WireReplyContent::Many(blocks) => blocks,
        WireReplyContent::One(block) => vec![block],
    };

    let content = blocks
        .into_iter()
        .enumerate()
        .filter_map(|(index, block)| from_wire_content(index, block))
        .collect();

    Ok(SamplingResult {
        content,
        usage: reply.usage,
        model: reply.model,
        stop_reason: reply.stop_reason,
    })
}

fn map_peer_error(err: PeerError) -> SamplingError {
    match err {
        PeerError::Rejected { code, message } if code == METHOD_NOT_FOUND => {
            SamplingError::unsupported(message)
        }
        other => SamplingError::request(other.to_string()),
    }
}

#[async_trait]
impl<P: McpPeer + 'static> SamplingClient for PeerSamplingClient<P> {
    fn is_sampling_supported(&self) -> bool {
        self.sampling_capability().is_some()
    }

    fn is_tool_use_supported(&self) -> bool {
        self.sampling_capability()
            .and_then(|sampling| sampling.get("tools").cloned())
            .is_some_and(|tools| !tools.is_null())
    }

    async fn request_completion(
        &self,
        request: SamplingRequest,
    ) -> Result<SamplingResult, SamplingError> {
        if !self.is_sampling_supported() {
            return Err(SamplingError::unsupported(
                "connected client does not advertise sampling",
            ));
        }
        if !request.tools.is_empty() && !self.is_tool_use_supported() {
            return Err(SamplingError::unsupported(
                "connected client does not advertise tool use in sampling",
            ));
        }

        let params = serde_json::to_value(self.to_params(&request))
            .map_err(|e| SamplingError::request(format!("failed to encode request: {}", e)))?;

        tracing::debug!(
            messages = request.messages.len(),
            tools = request.tools.len(),
            max_tokens = request.max_tokens,
            "Sending sampling/createMessage"
        );

        let raw = self
            .peer
            .create_message(params)
            .await
            .map_err(map_peer_error)?;

        let result = parse_reply(raw)?;

        tracing::debug!(
            blocks = result.content.len(),
            tool_calls = result.calls().len(),
            model = result.model.as_deref().unwrap_or("unknown"),
            "Received sampling reply"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::tools::definitions::report_get_tool;
    use crate::domain::tools::ToolResult;
    use serde_json::json;
    use std::sync::Mutex;

    struct FakePeer {
        capabilities: Mutex<Option<Value>>,
        reply: Result<Value, PeerError>,
        sent: Mutex<Vec<Value>>,
    }

    impl FakePeer {
        fn new(capabilities: Option<Value>, reply: Result<Value, PeerError>) -> Arc<Self> {
            Arc::new(Self {
                capabilities: Mutex::new(capabilities),
                reply,
                sent: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl McpPeer for FakePeer {
        fn client_capabilities(&self) -> Option<Value> {
            self.capabilities.lock().unwrap().clone()
        }

        async fn create_message(&self, params: Value) -> Result<Value, PeerError> {
            self.sent.lock().unwrap().push(params);
            self.reply.clone()
        }
    }

    fn full_caps() -> Option<Value> {
        Some(json!({ "sampling": { "tools": {} } }))
    }

    fn request_with_history() -> SamplingRequest {
        let call = ToolCall::new(
            ToolCallId::new("toolu_1").unwrap(),
            "report_get",
            json!({ "path": "summary" }),
        );
        SamplingRequest {
            system_prompt: "You analyze crash dumps.".into(),
            messages: vec![
                TranscriptMessage::user("Analyze this dump."),
                TranscriptMessage::assistant(vec![ContentBlock::ToolUse(call)]),
                TranscriptMessage::tool_results(vec![ToolResult::success(
                    ToolCallId::new("toolu_1").unwrap(),
                    json!({ "crashType": "AccessViolation" }),
                )]),
            ],
            tools: vec![report_get_tool()],
            tool_choice: ToolChoice::Auto,
            max_tokens: 1024,
        }
    }

    #[test]
    fn capabilities_are_read_live() {
        let peer = FakePeer::new(None, Ok(json!({})));
        let client = PeerSamplingClient::new(peer.clone());
        assert!(!client.is_sampling_supported());

        *peer.capabilities.lock().unwrap() = Some(json!({ "sampling": {} }));
        assert!(client.is_sampling_supported());
        assert!(!client.is_tool_use_supported());

        *peer.capabilities.lock().unwrap() = full_caps();
        assert!(client.is_tool_use_supported());
    }

    #[tokio::test]
    async fn encodes_transcript_in_wire_format() {
        let peer = FakePeer::new(
            full_caps(),
            Ok(json!({ "role": "assistant", "content": { "type": "text", "text": "ok" } })),
        );
        let client = PeerSamplingClient::new(peer.clone());
        client.request_completion(request_with_history()).await.unwrap();

        let sent = peer.sent.lock().unwrap()[0].clone();
        assert_eq!(sent["systemPrompt"], "You analyze crash dumps.");
        assert_eq!(sent["maxTokens"], 1024);
        assert_eq!(sent["toolChoice"], json!({ "mode": "auto" }));
        assert_eq!(sent["tools"][0]["name"], "report_get");
        assert!(sent["tools"][0]["inputSchema"].is_object());
        assert_eq!(sent["messages"][1]["content"][0]["type"], "tool_use");
        assert_eq!(sent["messages"][1]["content"][0]["input"]["path"], "summary");
        let result = &sent["messages"][2]["content"][0];
        assert_eq!(result["type"], "tool_result");
        assert_eq!(result["toolUseId"], "toolu_1");
        assert_eq!(result["isError"], false);
    }

    #[tokio::test]
    async fn parses_tool_use_reply_with_usage() {
        let peer = FakePeer::new(
            full_caps(),
            Ok(json!({
                "role": "assistant",
                "model": "test-model",
                "stopReason": "toolUse",
                "usage": { "inputTokens": 1200, "outputTokens": 80 },
                "content": [
                    { "type": "text", "text": "Checking threads." },
                    { "type": "tool_use", "id": "toolu_9", "name": "report_get",
                      "input": { "path": "analysis.threads.all", "limit": 5 } },
                    { "type": "image", "data": "...", "mimeType": "image/png" }
                ]
            })),
        );
        let client = PeerSamplingClient::new(peer);
        let result = client.request_completion(request_with_history()).await.unwrap();

        assert_eq!(result.content.len(), 2);
        let calls = result.calls();
        assert_eq!(calls[0].id().as_str(), "toolu_9");
        assert_eq!(calls[0].arguments()["limit"], 5);
        assert_eq!(result.usage, Some(TokenUsage::new(1200, 80)));
        assert_eq!(result.model.as_deref(), Some("test-model"));
        assert_eq!(result.stop_reason.as_deref(), Some("toolUse"));
    }

    #[tokio::test]
    async fn missing_tool_use_capability_is_unsupported() {
        let peer = FakePeer::new(Some(json!({ "sampling": {} })), Ok(json!({})));
        let client = PeerSamplingClient::new(peer.clone());
        let err = client.request_completion(request_with_history()).await.unwrap_err();
        assert!(err.is_unsupported());
        assert!(peer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn method_not_found_maps_to_unsupported() {
        let peer = FakePeer::new(
            full_caps(),
            Err(PeerError::Rejected {
                code: METHOD_NOT_FOUND,
                message: "sampling/createMessage".into(),
            }),
        );
        let client = PeerSamplingClient::new(peer);
        let err = client.request_completion(request_with_history()).await.unwrap_err();
        assert!(err.is_unsupported());
    }

    #[tokio::test]
    async fn transport_failures_are_request_errors() {
        let peer = FakePeer::new(full_caps(), Err(PeerError::Timeout));
        let client = PeerSamplingClient::new(peer);
        let err = client.request_completion(request_with_history()).await.unwrap_err();
        assert_eq!(err, SamplingError::request("peer request timed out"));
    }

    #[tokio::test]
    async fn malformed_reply_is_parse_error() {
        let peer = FakePeer::new(full_caps(), Ok(json!({ "role": "assistant" })));
        let client = PeerSamplingClient::new(peer);
        let err = client.request_completion(request_with_history()).await.unwrap_err();
        assert!(matches!(err, SamplingError::Parse(_)));
    }

    #[tokio::test]
    async fn nameless_tool_use_is_kept_as_malformed_request() {
        let peer = FakePeer::new(
            full_caps(),
            Ok(json!({ "content": [
                { "type": "tool_use", "id": "x", "input": { "command": "k" } },
                { "type": "tool_use", "id": "  ", "name": "exec", "input": { "command": "lm" } }
            ] })),
        );
        let client = PeerSamplingClient::new(peer);
        let result = client.request_completion(request_with_history()).await.unwrap();

        assert!(matches!(
            &result.content[0],
            ContentBlock::MalformedToolUse { id, .. } if id.as_str() == "x"
        ));
        let calls = result.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id(), &ToolCallId::sequential(2));
    }
}
