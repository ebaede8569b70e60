// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Closed vocabularies: intents, cost tiers, and flow names.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Purpose of an inbound message.
///
/// Parsing is case-insensitive and total: anything outside the closed set
/// becomes [`Intent::Unknown`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", from = "String")]
pub enum Intent {
    Faq,
    Booking,
    LeadCapture,
    Support,
    Escalate,
    OptOut,
    Greeting,
    Thanks,
    Unknown,
}

impl Intent {
    /// Parses an externally supplied label, normalizing anything unrecognized.
    pub fn parse_lenient(label: &str) -> Self {
        Intent::from_str(label.trim()).unwrap_or(Intent::Unknown)
    }
}

impl From<String> for Intent {
    fn from(label: String) -> Self {
        Intent::parse_lenient(&label)
    }
}

/// Cost/quality band for the language-model backend.
///
/// Serialized as its integer level (1, 2 or 3). Out-of-range levels clamp.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(into = "u8", from = "u8")]
pub enum Tier {
    /// Cheapest model: greetings, confident FAQ answers, opt-outs.
    Light,
    /// Default model.
    #[default]
    Standard,
    /// Strongest model: escalations, unhappy customers, complex queries.
    Premium,
}

impl Tier {
    /// Integer level, 1 through 3.
    pub fn level(self) -> u8 {
        match self {
            Tier::Light => 1,
            Tier::Standard => 2,
            Tier::Premium => 3,
        }
    }

    /// Maps any integer onto the nearest tier.
    pub fn from_level(level: i64) -> Self {
        match level {
            i64::MIN..=1 => Tier::Light,
            2 => Tier::Standard,
            _ => Tier::Premium,
        }
    }
}

impl From<Tier> for u8 {
    fn from(tier: Tier) -> Self {
        tier.level()
    }
}

impl From<u8> for Tier {
    fn from(level: u8) -> Self {
        Tier::from_level(i64::from(level))
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Light => write!(f, "light"),
            Tier::Standard => write!(f, "standard"),
            Tier::Premium => write!(f, "premium"),
        }
    }
}

/// Structured multi-turn flows the router may suggest entering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FlowName {
    Booking,
    LeadCapture,
}

impl FlowName {
    /// Parses a flow label; anything but `booking`/`lead_capture` is `None`.
    pub fn parse(label: &str) -> Option<Self> {
        FlowName::from_str(label.trim()).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn intent_labels_round_trip() {
        for intent in Intent::iter() {
            assert_eq!(Intent::parse_lenient(&intent.to_string()), intent);
        }
        assert_eq!(Intent::Faq.to_string(), "FAQ");
        assert_eq!(Intent::LeadCapture.to_string(), "LEAD_CAPTURE");
        assert_eq!(Intent::OptOut.to_string(), "OPT_OUT");
    }

    #[test]
    fn intent_parse_is_case_insensitive_and_total() {
        assert_eq!(Intent::parse_lenient("booking"), Intent::Booking);
        assert_eq!(Intent::parse_lenient(" Opt_Out "), Intent::OptOut);
        assert_eq!(Intent::parse_lenient("COMPLAINT"), Intent::Unknown);
        assert_eq!(Intent::parse_lenient(""), Intent::Unknown);
    }

    #[test]
    fn intent_deserializes_unknown_values_to_unknown() {
        let parsed: Intent = serde_json::from_str("\"REFUND\"").unwrap();
        assert_eq!(parsed, Intent::Unknown);
        let parsed: Intent = serde_json::from_str("\"faq\"").unwrap();
        assert_eq!(parsed, Intent::Faq);
        assert_eq!(serde_json::to_string(&Intent::LeadCapture).unwrap(), "\"LEAD_CAPTURE\"");
    }

    #[test]
    fn tier_clamps_out_of_range_levels() {
        assert_eq!(Tier::from_level(-4), Tier::Light);
        assert_eq!(Tier::from_level(0), Tier::Light);
        assert_eq!(Tier::from_level(2), Tier::Standard);
        assert_eq!(Tier::from_level(9), Tier::Premium);
    }

    #[test]
    fn tier_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&Tier::Premium).unwrap(), "3");
        let tier: Tier = serde_json::from_str("1").unwrap();
        assert_eq!(tier, Tier::Light);
        assert_eq!(Tier::default(), Tier::Standard);
    }

    #[test]
    fn flow_name_is_constrained() {
        assert_eq!(FlowName::parse("booking"), Some(FlowName::Booking));
        assert_eq!(FlowName::parse("lead_capture"), Some(FlowName::LeadCapture));
        assert_eq!(FlowName::parse("checkout"), None);
        assert_eq!(FlowName::LeadCapture.to_string(), "lead_capture");
    }
}
