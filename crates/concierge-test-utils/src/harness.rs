// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end pipeline testing.
//!
//! `TestHarness` assembles a complete conversation engine over a
//! [`MockProvider`], with a business context and knowledge base. Provides
//! `send_message()` to drive the full pipeline in tests.

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use concierge_config::ConciergeConfig;
use concierge_core::{BusinessContext, HistoryTurn, InboundMessage, KnowledgeItem};
use concierge_engine::{ConversationEngine, ProcessedMessage};

use crate::mock_provider::{MockProvider, MockReply};

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    replies: Vec<MockReply>,
    config: ConciergeConfig,
    knowledge: Vec<KnowledgeItem>,
    business: BusinessContext,
    now: DateTime<Utc>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            replies: Vec::new(),
            config: ConciergeConfig::default(),
            knowledge: Vec::new(),
            business: BusinessContext::new("hair salon", "Test Salon"),
            // Fixed clock keeps relative-date prompts deterministic.
            now: Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).single().unwrap_or_default(),
        }
    }

    /// Set mock provider text responses, consumed in call order.
    pub fn with_mock_responses<S: Into<String>>(mut self, responses: impl IntoIterator<Item = S>) -> Self {
        self.replies
            .extend(responses.into_iter().map(|r| MockReply::Text(r.into())));
        self
    }

    /// Set scripted replies, including failures and hangs.
    pub fn with_replies(mut self, replies: impl IntoIterator<Item = MockReply>) -> Self {
        self.replies.extend(replies);
        self
    }

    /// Replace the default configuration.
    pub fn with_config(mut self, config: ConciergeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_knowledge(mut self, knowledge: Vec<KnowledgeItem>) -> Self {
        self.knowledge = knowledge;
        self
    }

    pub fn with_business(mut self, kind: &str, name: &str) -> Self {
        self.business = BusinessContext::new(kind, name);
        self
    }

    /// Build the test harness over a fresh mock provider.
    pub fn build(self) -> TestHarness {
        let mock_provider = Arc::new(MockProvider::with_replies(self.replies));
        let engine = ConversationEngine::new(mock_provider.clone(), &self.config);
        TestHarness {
            mock_provider,
            engine,
            knowledge: self.knowledge,
            business: self.business,
            now: self.now,
        }
    }
}

/// A complete test environment: an engine bound to a mock backend.
pub struct TestHarness {
    /// The mock backend, for scripting replies and inspecting requests.
    pub mock_provider: Arc<MockProvider>,
    pub engine: ConversationEngine,
    /// Knowledge base passed on every message.
    pub knowledge: Vec<KnowledgeItem>,
    pub business: BusinessContext,
    now: DateTime<Utc>,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// A message from the test customer, received at the harness clock.
    pub fn message(&self, text: &str) -> InboundMessage {
        InboundMessage::new(text, "+15550000000", self.business.clone()).received_at(self.now)
    }

    /// Send a message with no history through the full pipeline.
    pub async fn send_message(&self, text: &str) -> ProcessedMessage {
        self.send(&self.message(text)).await
    }

    /// Send a message preceded by `history`.
    pub async fn send_with_history(&self, text: &str, history: Vec<HistoryTurn>) -> ProcessedMessage {
        self.send(&self.message(text).with_history(history)).await
    }

    /// Send a fully built message.
    pub async fn send(&self, message: &InboundMessage) -> ProcessedMessage {
        self.engine.process(message, &self.knowledge).await
    }

    /// Add a response to the mock provider's queue.
    pub async fn add_provider_response(&self, text: &str) {
        self.mock_provider.add_response(text).await;
    }
}
