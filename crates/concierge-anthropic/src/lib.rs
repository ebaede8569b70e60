// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Anthropic Claude backend for the Concierge engine.
//!
//! This crate implements [`ProviderAdapter`] for the Anthropic Messages API
//! with single-shot, non-streaming completions.

pub mod client;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use concierge_config::AnthropicConfig;
use concierge_core::{
    ConciergeError, HealthStatus, PluginAdapter, ProviderAdapter, ProviderRequest,
    ProviderResponse, TokenUsage,
};
use tracing::info;

use crate::client::AnthropicClient;
use crate::types::{ApiMessage, MessageRequest};

/// Environment variable consulted when the config carries no API key.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Anthropic Claude backend implementing [`ProviderAdapter`].
///
/// API key resolution order: config -> `ANTHROPIC_API_KEY` env var -> error.
pub struct AnthropicProvider {
    client: AnthropicClient,
}

impl AnthropicProvider {
    /// Creates a new provider from the `[anthropic]` configuration section.
    pub fn new(config: &AnthropicConfig) -> Result<Self, ConciergeError> {
        let api_key = resolve_api_key(config.api_key.as_deref(), std::env::var(API_KEY_ENV).ok())?;
        let client = AnthropicClient::new(
            &api_key,
            &config.api_version,
            &config.base_url,
            Duration::from_secs(config.timeout_secs),
        )?
        .with_max_retries(config.max_retries);

        info!(
            endpoint = client.endpoint(),
            max_retries = config.max_retries,
            "Anthropic provider initialized"
        );
        Ok(Self { client })
    }

    /// Converts a [`ProviderRequest`] to an Anthropic [`MessageRequest`].
    fn to_message_request(request: ProviderRequest) -> MessageRequest {
        MessageRequest {
            model: request.model,
            messages: request
                .messages
                .into_iter()
                .map(|m| ApiMessage {
                    role: m.role,
                    content: m.content,
                })
                .collect(),
            system: request.system_prompt.filter(|s| !s.is_empty()),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        }
    }
}

#[async_trait]
impl PluginAdapter for AnthropicProvider {
    fn name(&self) -> &str {
        "anthropic"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, ConciergeError> {
        // No API call: health checks must not consume tokens.
        Ok(HealthStatus::Healthy)
    }
}

#[async_trait]
impl ProviderAdapter for AnthropicProvider {
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ConciergeError> {
        let api_request = Self::to_message_request(request);
        let response = self.client.complete_message(&api_request).await?;

        Ok(ProviderResponse {
            content: response.text(),
            id: response.id,
            model: response.model,
            stop_reason: response.stop_reason,
            usage: TokenUsage {
                input_tokens: response.usage.input_tokens,
                output_tokens: response.usage.output_tokens,
            },
        })
    }
}

/// Resolves the API key from config, then from the environment value.
fn resolve_api_key(config_key: Option<&str>, env_key: Option<String>) -> Result<String, ConciergeError> {
    if let Some(key) = config_key.filter(|k| !k.is_empty()) {
        return Ok(key.to_string());
    }

    env_key.filter(|k| !k.is_empty()).ok_or_else(|| {
        ConciergeError::Config(format!(
            "Anthropic API key not found. Set anthropic.api_key in config or the {API_KEY_ENV} environment variable."
        ))
    })
}
