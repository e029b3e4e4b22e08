//! Sampling Adapters - Implementations of the SamplingClient port.
//!
//! - `PeerSamplingClient` - Samples through the connected MCP client
//! - `ScriptedSamplingClient` - Replays prepared replies (tests, offline runs)

mod mcp_peer_client;
mod scripted;

pub use mcp_peer_client::PeerSamplingClient;
pub use scripted::ScriptedSamplingClient;
