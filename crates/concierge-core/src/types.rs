// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the backend trait and the routing pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::intent::Tier;

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

// --- Backend request/response types ---

/// A single role/content turn sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderMessage {
    /// Role: "user" or "assistant".
    pub role: String,
    /// Plain text content.
    pub content: String,
}

impl ProviderMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// A request to a language-model backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderRequest {
    /// Model identifier.
    pub model: String,
    /// Optional system instruction.
    pub system_prompt: Option<String>,
    /// Ordered conversation turns.
    pub messages: Vec<ProviderMessage>,
    /// Sampling temperature. `None` leaves the backend default.
    pub temperature: Option<f32>,
    /// Maximum output tokens.
    pub max_tokens: u32,
}

impl ProviderRequest {
    /// Creates an empty request for `model`.
    pub fn new(model: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            system_prompt: None,
            messages: Vec::new(),
            temperature: None,
            max_tokens,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system_prompt = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_message(mut self, message: ProviderMessage) -> Self {
        self.messages.push(message);
        self
    }
}

/// Token counts reported by the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

/// A completion returned by a language-model backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub id: String,
    /// Concatenated text of the completion.
    pub content: String,
    /// Model that actually served the request.
    pub model: String,
    pub stop_reason: Option<String>,
    pub usage: TokenUsage,
}

// --- Inbound message types ---

/// Who authored a history turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Assistant,
}

impl Role {
    /// Role name as understood by chat-style backends.
    pub fn provider_role(self) -> &'static str {
        match self {
            Role::Customer => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One prior message in the conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: Role,
    pub text: String,
}

impl HistoryTurn {
    pub fn customer(text: impl Into<String>) -> Self {
        Self {
            role: Role::Customer,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            text: text.into(),
        }
    }
}

/// The business on whose behalf the engine answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessContext {
    /// Business category, e.g. "hair salon" or "dental clinic".
    #[serde(rename = "type")]
    pub kind: String,
    /// Display name used in replies.
    pub name: String,
}

impl BusinessContext {
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            name: name.into(),
        }
    }
}

/// A single inbound customer message plus the context needed to route it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Raw message text as received.
    pub text: String,
    /// Sender phone number or channel-specific id.
    pub sender_id: String,
    pub business: BusinessContext,
    /// Recent history, oldest first. Callers usually cap this.
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
    /// Name of the flow the conversation is currently inside, if any.
    #[serde(default)]
    pub active_flow: Option<String>,
    /// Flow-scoped data collected so far.
    #[serde(default)]
    pub flow_data: Option<serde_json::Value>,
    /// When the message was received; anchors relative dates.
    pub received_at: DateTime<Utc>,
    /// Total turns in the conversation when known (history may be capped).
    #[serde(default)]
    pub turn_count: Option<u32>,
    /// Tier used for the previous reply in this conversation.
    #[serde(default)]
    pub previous_tier: Option<Tier>,
}

impl InboundMessage {
    /// Creates a message with empty history, received now.
    pub fn new(
        text: impl Into<String>,
        sender_id: impl Into<String>,
        business: BusinessContext,
    ) -> Self {
        Self {
            text: text.into(),
            sender_id: sender_id.into(),
            business,
            history: Vec::new(),
            active_flow: None,
            flow_data: None,
            received_at: Utc::now(),
            turn_count: None,
            previous_tier: None,
        }
    }

    pub fn with_history(mut self, history: Vec<HistoryTurn>) -> Self {
        self.history = history;
        self
    }

    pub fn with_active_flow(
        mut self,
        flow: impl Into<String>,
        data: Option<serde_json::Value>,
    ) -> Self {
        self.active_flow = Some(flow.into());
        self.flow_data = data;
        self
    }

    pub fn received_at(mut self, at: DateTime<Utc>) -> Self {
        self.received_at = at;
        self
    }

    pub fn with_turn_count(mut self, turns: u32) -> Self {
        self.turn_count = Some(turns);
        self
    }

    pub fn with_previous_tier(mut self, tier: Tier) -> Self {
        self.previous_tier = Some(tier);
        self
    }

    /// The last `n` history turns, oldest first.
    pub fn recent_history(&self, n: usize) -> &[HistoryTurn] {
        let start = self.history.len().saturating_sub(n);
        &self.history[start..]
    }

    /// Conversation turn count, counting the current message.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
            .unwrap_or_else(|| u32::try_from(self.history.len()).unwrap_or(u32::MAX).saturating_add(1))
    }

    pub fn in_active_flow(&self) -> bool {
        self.active_flow.is_some()
    }
}
