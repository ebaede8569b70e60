// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock language-model provider for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured replies,
//! enabling fast, CI-runnable tests without external API calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use concierge_core::{
    ConciergeError, HealthStatus, PluginAdapter, ProviderAdapter, ProviderRequest,
    ProviderResponse, TokenUsage,
};

/// Reply used once the queue is exhausted.
pub const DEFAULT_REPLY: &str = "mock response";

/// One scripted reaction to a `complete` call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockReply {
    /// Return this text as the completion.
    Text(String),
    /// Fail with `BackendUnavailable` carrying this message.
    Fail(String),
    /// Never answer; pair with a deadline to exercise timeouts.
    Hang,
}

impl From<&str> for MockReply {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for MockReply {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

/// A mock provider that returns scripted replies and records every request.
///
/// Replies are popped from a FIFO queue. When the queue is empty, the
/// [`DEFAULT_REPLY`] text is returned, or an error when built with
/// [`MockProvider::failing`].
pub struct MockProvider {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    calls: AtomicUsize,
    exhausted: MockReply,
}

impl MockProvider {
    /// Create a new mock provider with an empty reply queue.
    pub fn new() -> Self {
        Self::with_replies(Vec::<MockReply>::new())
    }

    /// Create a mock provider pre-loaded with the given text responses.
    pub fn with_responses<S: Into<String>>(responses: impl IntoIterator<Item = S>) -> Self {
        Self::with_replies(responses.into_iter().map(|r| MockReply::Text(r.into())))
    }

    /// Create a mock provider pre-loaded with scripted replies.
    pub fn with_replies<R: Into<MockReply>>(replies: impl IntoIterator<Item = R>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().map(Into::into).collect())),
            requests: Arc::new(Mutex::new(Vec::new())),
            calls: AtomicUsize::new(0),
            exhausted: MockReply::Text(DEFAULT_REPLY.to_string()),
        }
    }

    /// A provider whose every call fails as if the backend were down.
    pub fn failing() -> Self {
        Self {
            exhausted: MockReply::Fail("backend unreachable".to_string()),
            ..Self::new()
        }
    }

    /// Add a reply to the end of the queue.
    pub async fn add_reply(&self, reply: impl Into<MockReply>) {
        self.replies.lock().await.push_back(reply.into());
    }

    /// Add a text response to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.add_reply(MockReply::Text(text.into())).await;
    }

    /// Number of `complete` calls made so far, including failed ones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every request received, in call order.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    /// The most recent request, if any.
    pub async fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().await.last().cloned()
    }

    async fn next_reply(&self) -> MockReply {
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| self.exhausted.clone())
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, ConciergeError> {
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ConciergeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().await.push(request.clone());

        match self.next_reply().await {
            MockReply::Text(text) => Ok(ProviderResponse {
                id: format!("mock-resp-{}", uuid::Uuid::new_v4()),
                content: text,
                model: request.model,
                stop_reason: Some("end_turn".to_string()),
                usage: TokenUsage {
                    input_tokens: 10,
                    output_tokens: 20,
                },
            }),
            MockReply::Fail(message) => Err(ConciergeError::backend(message)),
            MockReply::Hang => std::future::pending().await,
        }
    }
}
