// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The per-message decision pipeline.

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Duration;

use concierge_anthropic::AnthropicProvider;
use concierge_config::ConciergeConfig;
use concierge_config::validation::validate_config;
use concierge_core::{
    ConciergeError, HealthStatus, InboundMessage, KnowledgeItem, MatchResult,
    Outcome, ProviderAdapter, ResponsePlan, RoutingDecision, Tier, TierContext,
};
use concierge_knowledge::KnowledgeMatcher;
use concierge_responder::Responder;
use concierge_router::{IntentRouter, SignalHeuristics, Signals, TierTable, select_tier_with_reason};
use serde::Serialize;
use strum::Display;
use tracing::{debug, info, warn};

/// Pipeline stage that can degrade to a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Stage {
    Matcher,
    Router,
    Responder,
}

/// A stage that returned its fallback value, and why.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageFallback {
    pub stage: Stage,
    pub cause: String,
}

/// Everything the engine decided about one inbound message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedMessage {
    /// Standalone matcher result, also given to the router as a hint.
    pub faq_match: Option<MatchResult>,
    pub decision: RoutingDecision,
    pub signals: Signals,
    /// Tier chosen by the selector; the decision keeps the classifier's suggestion.
    pub tier: Tier,
    /// Name of the selector rule that fired.
    pub tier_reason: &'static str,
    pub plan: ResponsePlan,
    /// Stages that degraded, in pipeline order. Empty on the happy path.
    pub fallbacks: Vec<StageFallback>,
}

impl ProcessedMessage {
    pub fn is_degraded(&self) -> bool {
        !self.fallbacks.is_empty()
    }
}

/// Wires matcher, router, signal heuristics, tier selector, and responder
/// over one shared backend.
///
/// Stateless between messages; safe to share behind an `Arc`.
pub struct ConversationEngine {
    provider: Arc<dyn ProviderAdapter>,
    matcher: KnowledgeMatcher,
    router: IntentRouter,
    signals: SignalHeuristics,
    tiers: TierTable,
    responder: Responder,
}

impl ConversationEngine {
    /// Builds an engine over `provider`. The configuration is used as is.
    pub fn new(provider: Arc<dyn ProviderAdapter>, config: &ConciergeConfig) -> Self {
        let deadline = Duration::from_secs(config.engine.backend_timeout_secs);
        let tiers = TierTable::new(config.tiers.clone());

        info!(
            backend = provider.name(),
            deadline_secs = config.engine.backend_timeout_secs,
            threshold = config.matcher.threshold,
            "conversation engine initialized"
        );

        Self {
            matcher: KnowledgeMatcher::new(provider.clone(), config.matcher.clone())
                .with_deadline(deadline),
            router: IntentRouter::new(provider.clone(), config.router.clone()).with_deadline(deadline),
            signals: SignalHeuristics::new(&config.signals),
            responder: Responder::new(provider.clone(), tiers.clone(), config.responder.clone())
                .with_deadline(deadline),
            tiers,
            provider,
        }
    }

    /// Validates `config` and builds an engine backed by the Anthropic API.
    pub fn from_config(config: &ConciergeConfig) -> Result<Self, ConciergeError> {
        validate_config(config).map_err(|errors| {
            let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
            ConciergeError::Config(messages.join("; "))
        })?;
        let provider = AnthropicProvider::new(&config.anthropic)?;
        Ok(Self::new(Arc::new(provider), config))
    }

    /// Runs the full pipeline for one message. Never fails: every stage
    /// degrades to its fallback, and the customer always gets a reply.
    pub async fn process(
        &self,
        message: &InboundMessage,
        knowledge: &[KnowledgeItem],
    ) -> ProcessedMessage {
        let mut fallbacks = Vec::new();

        let faq_match = record(
            Stage::Matcher,
            self.matcher.match_query(&message.text, knowledge).await,
            &mut fallbacks,
        );
        let decision = record(
            Stage::Router,
            self.router.route(message, knowledge, faq_match.as_ref()).await,
            &mut fallbacks,
        );

        let signals = self.signals.analyze(&message.text);
        let context = TierContext {
            intent: decision.intent,
            confidence: decision.confidence,
            turn_count: message.turn_count(),
            active_flow: message.in_active_flow(),
            previous_tier: message.previous_tier,
            sentiment: signals.sentiment,
            complex: signals.complex,
        };
        let (tier, tier_reason) = select_tier_with_reason(&context);
        debug!(
            intent = %decision.intent,
            tier = tier.level(),
            reason = tier_reason,
            sentiment = signals.sentiment,
            complex = signals.complex,
            "tier selected"
        );

        let plan = {
            // A degraded router names no FAQ; the matcher's own result still grounds the reply.
            let reply_decision = match (&decision.faq_match, &faq_match) {
                (None, Some(found)) => {
                    debug!(id = %found.item.id, "replying with the matcher's FAQ");
                    Cow::Owned(RoutingDecision {
                        faq_match: Some(found.clone()),
                        ..decision.clone()
                    })
                }
                _ => Cow::Borrowed(&decision),
            };
            let outcome = self.responder.respond(message, &reply_decision, tier, knowledge).await;
            record(Stage::Responder, outcome, &mut fallbacks)
        };

        info!(
            intent = %decision.intent,
            tier = tier.level(),
            faq = faq_match.as_ref().map(|m| m.item.id.as_str()),
            escalate = plan.escalate,
            degraded = !fallbacks.is_empty(),
            "message processed"
        );

        ProcessedMessage {
            faq_match,
            decision,
            signals,
            tier,
            tier_reason,
            plan,
            fallbacks,
        }
    }

    /// FAQ suggestions for a query, without any backend call.
    pub fn suggest_faqs(&self, query: &str, knowledge: &[KnowledgeItem]) -> Vec<MatchResult> {
        self.matcher.suggest(query, knowledge)
    }

    /// Runs only the matcher.
    pub async fn match_faq(
        &self,
        query: &str,
        knowledge: &[KnowledgeItem],
    ) -> Outcome<Option<MatchResult>> {
        self.matcher.match_query(query, knowledge).await
    }

    /// Approximate cost in USD of one reply at `tier`.
    pub fn estimated_cost(&self, tier: Tier) -> f64 {
        self.tiers.approx_cost_usd(tier)
    }

    pub fn tiers(&self) -> &TierTable {
        &self.tiers
    }

    /// Health of the bound backend. Errors are reported as unhealthy.
    pub async fn backend_health(&self) -> HealthStatus {
        match self.provider.health_check().await {
            Ok(status) => status,
            Err(e) => {
                warn!(backend = self.provider.name(), error = %e, "backend health check failed");
                HealthStatus::Unhealthy(e.to_string())
            }
        }
    }

    pub fn backend_name(&self) -> &str {
        self.provider.name()
    }
}

fn record<T>(stage: Stage, outcome: Outcome<T>, fallbacks: &mut Vec<StageFallback>) -> T {
    if let Some(cause) = outcome.cause() {
        fallbacks.push(StageFallback {
            stage,
            cause: cause.to_string(),
        });
    }
    outcome.into_value()
}

#[cfg(test)]
mod tests {
    use super::*;
    use concierge_core::FallbackCause;

    #[test]
    fn record_collects_fallback_causes() {
        let mut fallbacks = Vec::new();
        let v = record(Stage::Router, Outcome::Resolved(1), &mut fallbacks);
        assert_eq!(v, 1);
        assert!(fallbacks.is_empty());

        let v = record(
            Stage::Responder,
            Outcome::fallback(2, FallbackCause::Timeout(Duration::from_secs(20))),
            &mut fallbacks,
        );
        assert_eq!(v, 2);
        assert_eq!(fallbacks[0].stage, Stage::Responder);
        assert_eq!(fallbacks[0].cause, "timed out after 20s");
    }

    #[test]
    fn from_config_rejects_invalid_config() {
        let mut config = ConciergeConfig::default();
        config.matcher.threshold = 1.5;
        let err = ConversationEngine::from_config(&config).err().unwrap();
        assert!(matches!(err, ConciergeError::Config(_)));
        assert!(err.to_string().contains("threshold"), "got: {err}");
    }

    #[test]
    fn from_config_builds_anthropic_backend() {
        let mut config = ConciergeConfig::default();
        config.anthropic.api_key = Some("sk-test-123".into());
        let engine = ConversationEngine::from_config(&config).unwrap();
        assert_eq!(engine.backend_name(), "anthropic");
        assert_eq!(engine.estimated_cost(Tier::Premium), 0.015);
    }

    #[test]
    fn configured_timeout_defaults_to_the_shared_deadline() {
        let config = ConciergeConfig::default();
        assert_eq!(
            Duration::from_secs(config.engine.backend_timeout_secs),
            concierge_core::DEFAULT_DEADLINE
        );
    }

    #[test]
    fn stage_names_are_snake_case() {
        assert_eq!(Stage::Matcher.to_string(), "matcher");
        let fallback = StageFallback {
            stage: Stage::Responder,
            cause: "x".into(),
        };
        assert_eq!(serde_json::to_value(&fallback).unwrap()["stage"], "responder");
    }
}
