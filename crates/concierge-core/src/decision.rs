// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-message decisions produced by the pipeline stages.

use serde::{Deserialize, Serialize};

use crate::entities::ExtractedEntities;
use crate::intent::{FlowName, Intent, Tier};
use crate::knowledge::MatchResult;
use crate::types::TokenUsage;

/// `model_used` marker for replies that did not come from the backend.
pub const FALLBACK_MODEL: &str = "fallback";

/// The router's classification of one message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub intent: Intent,
    /// Classifier confidence in [0, 1].
    pub confidence: f64,
    /// Tier the classifier suggested.
    pub tier: Tier,
    #[serde(default)]
    pub entities: ExtractedEntities,
    #[serde(default)]
    pub faq_match: Option<MatchResult>,
    /// Whether the message continues the active flow.
    #[serde(default)]
    pub continue_flow: bool,
    #[serde(default)]
    pub suggested_flow: Option<FlowName>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

impl RoutingDecision {
    /// The fixed decision used whenever classification fails.
    pub fn fallback() -> Self {
        Self {
            intent: Intent::Unknown,
            confidence: 0.0,
            tier: Tier::Standard,
            entities: ExtractedEntities::default(),
            faq_match: None,
            continue_flow: false,
            suggested_flow: None,
            reasoning: None,
        }
    }
}

/// Inputs to tier selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TierContext {
    pub intent: Intent,
    pub confidence: f64,
    pub turn_count: u32,
    pub active_flow: bool,
    pub previous_tier: Option<Tier>,
    /// Sentiment in [0, 1]; 0.5 is neutral.
    pub sentiment: f64,
    pub complex: bool,
}

impl TierContext {
    /// A neutral context for `intent`: first turn, no flow, neutral sentiment.
    pub fn new(intent: Intent, confidence: f64) -> Self {
        Self {
            intent,
            confidence,
            turn_count: 1,
            active_flow: false,
            previous_tier: None,
            sentiment: 0.5,
            complex: false,
        }
    }
}

/// The outbound reply and its metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponsePlan {
    pub text: String,
    /// Backend model identifier, or [`FALLBACK_MODEL`].
    pub model_used: String,
    pub tier: Tier,
    /// Whether a human should follow up.
    pub escalate: bool,
    pub suggested_actions: Vec<String>,
    /// Backend usage when the reply was generated.
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl ResponsePlan {
    pub fn is_fallback(&self) -> bool {
        self.model_used == FALLBACK_MODEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn fallback_decision_is_fixed() {
        let d = RoutingDecision::fallback();
        assert_eq!(d.intent, Intent::Unknown);
        assert_eq!(d.confidence, 0.0);
        assert_eq!(d.tier, Tier::Standard);
        assert!(d.entities.is_empty());
        assert!(!d.continue_flow);
        assert!(d.suggested_flow.is_none());
        assert!(d.faq_match.is_none());
    }

    #[test]
    fn decision_serializes_tier_as_level() {
        let json = serde_json::to_value(RoutingDecision::fallback()).unwrap();
        assert_eq!(json["intent"], "UNKNOWN");
        assert_eq!(json["tier"], 2);
        assert_eq!(json["entities"], json!({}));
        assert_eq!(json["continue_flow"], false);
    }
}
