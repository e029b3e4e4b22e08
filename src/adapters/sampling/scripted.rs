//! Scripted sampling client for tests and offline runs.
//!
//! Replays a queue of prepared replies in order, records every request it
//! receives, and lets tests flip the advertised capabilities mid-run.
//!
//! # Example
//!
//! ```ignore
//! let client = ScriptedSamplingClient::new()
//!     .with_reply(SamplingResult::text("Looking at the report first."))
//!     .with_delay(Duration::from_millis(50));
//!
//! let reply = client.request_completion(request).await?;
//! assert_eq!(client.request_count(), 1);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{SamplingClient, SamplingError, SamplingRequest, SamplingResult};

/// Sampling client that answers from a prepared script.
#[derive(Debug, Clone)]
pub struct ScriptedSamplingClient {
    /// Replies consumed in order.
    replies: Arc<Mutex<VecDeque<Result<SamplingResult, SamplingError>>>>,
    /// Requests received, for verification.
    requests: Arc<Mutex<Vec<SamplingRequest>>>,
    sampling: Arc<AtomicBool>,
    tool_use: Arc<AtomicBool>,
    /// Simulated latency per request.
    delay: Duration,
}

impl Default for ScriptedSamplingClient {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ScriptedSamplingClient {
    /// Creates an empty script that advertises sampling with tool use.
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            sampling: Arc::new(AtomicBool::new(true)),
            tool_use: Arc::new(AtomicBool::new(true)),
            delay: Duration::ZERO,
        }
    }

    /// Queues a successful reply.
    pub fn with_reply(self, reply: SamplingResult) -> Self {
        lock(&self.replies).push_back(Ok(reply));
        self
    }

    /// Queues a failure.
    pub fn with_error(self, error: SamplingError) -> Self {
        lock(&self.replies).push_back(Err(error));
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn without_sampling(self) -> Self {
        self.set_sampling_supported(false);
        self
    }

    pub fn without_tool_use(self) -> Self {
        self.set_tool_use_supported(false);
        self
    }

    /// Changes the advertised sampling capability; takes effect on the next call.
    pub fn set_sampling_supported(&self, supported: bool) {
        self.sampling.store(supported, Ordering::SeqCst);
    }

    pub fn set_tool_use_supported(&self, supported: bool) {
        self.tool_use.store(supported, Ordering::SeqCst);
    }

    /// Appends a reply to a client that is already in use.
    pub fn push_reply(&self, reply: SamplingResult) {
        lock(&self.replies).push_back(Ok(reply));
    }

    /// Returns all requests received so far.
    pub fn requests(&self) -> Vec<SamplingRequest> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }

    /// Number of queued replies not yet consumed.
    pub fn remaining(&self) -> usize {
        lock(&self.replies).len()
    }
}

#[async_trait]
impl SamplingClient for ScriptedSamplingClient {
    fn is_sampling_supported(&self) -> bool {
        self.sampling.load(Ordering::SeqCst)
    }

    fn is_tool_use_supported(&self) -> bool {
        self.tool_use.load(Ordering::SeqCst)
    }

    async fn request_completion(
        &self,
        request: SamplingRequest,
    ) -> Result<SamplingResult, SamplingError> {
        if !self.is_sampling_supported() {
            return Err(SamplingError::unsupported("client does not support sampling"));
        }
        if !request.tools.is_empty() && !self.is_tool_use_supported() {
            return Err(SamplingError::unsupported(
                "client does not support tool use in sampling",
            ));
        }

        lock(&self.requests).push(request);

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| Err(SamplingError::request("sampling script exhausted")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{ToolChoice, TranscriptMessage};

    fn request() -> SamplingRequest {
        SamplingRequest {
            system_prompt: "system".into(),
            messages: vec![TranscriptMessage::user("go")],
            tools: vec![crate::domain::tools::definitions::report_get_tool()],
            tool_choice: ToolChoice::Auto,
            max_tokens: 512,
        }
    }

    #[tokio::test]
    async fn replays_replies_in_order() {
        let client = ScriptedSamplingClient::new()
            .with_reply(SamplingResult::text("first"))
            .with_reply(SamplingResult::text("second"));

        let a = client.request_completion(request()).await.unwrap();
        let b = client.request_completion(request()).await.unwrap();

        assert_eq!(a.joined_text(), "first");
        assert_eq!(b.joined_text(), "second");
        assert_eq!(client.request_count(), 2);
        assert_eq!(client.remaining(), 0);
    }

    #[tokio::test]
    async fn exhausted_script_fails() {
        let client = ScriptedSamplingClient::new();
        let err = client.request_completion(request()).await.unwrap_err();
        assert!(matches!(err, SamplingError::Request(_)));
    }

    #[tokio::test]
    async fn injected_errors_are_returned() {
        let client =
            ScriptedSamplingClient::new().with_error(SamplingError::request("peer went away"));
        let err = client.request_completion(request()).await.unwrap_err();
        assert_eq!(err, SamplingError::request("peer went away"));
    }

    #[tokio::test]
    async fn capability_changes_apply_to_next_call() {
        let client = ScriptedSamplingClient::new().with_reply(SamplingResult::text("ok"));
        client.set_tool_use_supported(false);

        let err = client.request_completion(request()).await.unwrap_err();
        assert!(err.is_unsupported());
        assert_eq!(client.request_count(), 0);

        client.set_tool_use_supported(true);
        assert!(client.request_completion(request()).await.is_ok());
    }

    #[tokio::test]
    async fn clones_share_script_and_history() {
        let client = ScriptedSamplingClient::new();
        let handle = client.clone();
        handle.push_reply(SamplingResult::text("shared"));

        client.request_completion(request()).await.unwrap();
        assert_eq!(handle.request_count(), 1);
        assert!(!client.without_sampling().is_sampling_supported());
        assert!(!handle.is_sampling_supported());
    }
}
