// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule-ordered tier selection and the tier lookup tables.

use concierge_config::{TierConfig, TiersConfig};
use concierge_core::{Intent, Tier, TierContext};

/// FAQ answers above this confidence go to the light tier.
pub const CONFIDENT_FAQ: f64 = 0.85;

/// Sentiment below this forces the premium tier.
pub const UNHAPPY_SENTIMENT: f64 = 0.3;

/// Conversations longer than this inside a flow go premium.
pub const LONG_FLOW_TURNS: u32 = 10;

/// Picks the tier for a message. First matching rule wins.
pub fn select_tier(ctx: &TierContext) -> Tier {
    select_tier_with_reason(ctx).0
}

/// Like [`select_tier`], also naming the rule that fired.
pub fn select_tier_with_reason(ctx: &TierContext) -> (Tier, &'static str) {
    match ctx.intent {
        Intent::Greeting | Intent::Thanks | Intent::OptOut => {
            return (Tier::Light, "courtesy or opt-out intent");
        }
        Intent::Faq if ctx.confidence > CONFIDENT_FAQ => {
            return (Tier::Light, "confident faq");
        }
        Intent::Escalate => return (Tier::Premium, "escalation"),
        _ => {}
    }

    if ctx.sentiment < UNHAPPY_SENTIMENT {
        (Tier::Premium, "negative sentiment")
    } else if ctx.intent == Intent::Support {
        (Tier::Premium, "support request")
    } else if ctx.turn_count > LONG_FLOW_TURNS && ctx.active_flow {
        (Tier::Premium, "long active flow")
    } else if ctx.complex {
        (Tier::Premium, "complex message")
    } else {
        (Tier::Standard, "default")
    }
}

/// Resolves tiers to their configured model, token budget, and cost.
#[derive(Debug, Clone)]
pub struct TierTable {
    tiers: TiersConfig,
}

impl TierTable {
    pub fn new(tiers: TiersConfig) -> Self {
        Self { tiers }
    }

    pub fn get(&self, tier: Tier) -> &TierConfig {
        match tier {
            Tier::Light => &self.tiers.light,
            Tier::Standard => &self.tiers.standard,
            Tier::Premium => &self.tiers.premium,
        }
    }

    pub fn model(&self, tier: Tier) -> &str {
        &self.get(tier).model
    }

    pub fn max_tokens(&self, tier: Tier) -> u32 {
        self.get(tier).max_tokens
    }

    pub fn approx_cost_usd(&self, tier: Tier) -> f64 {
        self.get(tier).approx_cost_usd
    }
}

impl Default for TierTable {
    fn default() -> Self {
        Self::new(TiersConfig::default())
    }
}
