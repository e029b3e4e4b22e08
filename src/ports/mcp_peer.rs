//! MCP Peer Port - The connected client that can sample on our behalf.
//!
//! Only the two operations the sampling adapter needs are exposed: reading
//! the peer's advertised capabilities and sending `sampling/createMessage`.

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Port for the MCP client connection.
#[async_trait]
pub trait McpPeer: Send + Sync {
    /// The peer's current client capabilities, or `None` before the
    /// handshake completes.
    fn client_capabilities(&self) -> Option<Value>;

    /// Sends a `sampling/createMessage` request and returns the raw result.
    async fn create_message(&self, params: Value) -> Result<Value, PeerError>;
}

/// Transport-level failures talking to the peer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeerError {
    #[error("peer rejected request ({code}): {message}")]
    Rejected { code: i64, message: String },

    #[error("peer disconnected")]
    Disconnected,

    #[error("peer request timed out")]
    Timeout,
}
