// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for language-model backends (Anthropic, mocks, etc.).

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ConciergeError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for language-model backends.
///
/// A single blocking round-trip: one request in, one text completion out.
/// Implementations must not retry on their own unless configured to.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ConciergeError>;
}

/// Deadline for one backend call when the caller configures none.
pub const DEFAULT_DEADLINE: Duration = Duration::from_secs(20);

/// Sends `request` and fails with [`ConciergeError::Timeout`] once `deadline` elapses.
///
/// No retry is attempted; the caller decides how to degrade.
pub async fn complete_within(
    provider: &dyn ProviderAdapter,
    request: ProviderRequest,
    deadline: Duration,
) -> Result<ProviderResponse, ConciergeError> {
    match tokio::time::timeout(deadline, provider.complete(request)).await {
        Ok(result) => result,
        Err(_) => Err(ConciergeError::Timeout { duration: deadline }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{HealthStatus, TokenUsage};

    struct SlowProvider;

    #[async_trait]
    impl PluginAdapter for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        fn version(&self) -> semver::Version {
            semver::Version::new(0, 1, 0)
        }

        async fn health_check(&self) -> Result<HealthStatus, ConciergeError> {
            Ok(HealthStatus::Healthy)
        }
    }

    #[async_trait]
    impl ProviderAdapter for SlowProvider {
        async fn complete(
            &self,
            request: ProviderRequest,
        ) -> Result<ProviderResponse, ConciergeError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(ProviderResponse {
                id: "late".into(),
                content: "too late".into(),
                model: request.model,
                stop_reason: None,
                usage: TokenUsage::default(),
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_elapses_into_timeout_error() {
        let request = ProviderRequest::new("test-model", 16);
        let err = complete_within(&SlowProvider, request, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, ConciergeError::Timeout { duration } if duration == Duration::from_secs(5)));
    }
}
