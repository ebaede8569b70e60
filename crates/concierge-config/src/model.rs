// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Concierge message-routing engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Concierge configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConciergeConfig {
    /// Engine-wide settings (logging, backend deadline).
    #[serde(default)]
    pub engine: EngineConfig,

    /// Anthropic API settings.
    #[serde(default)]
    pub anthropic: AnthropicConfig,

    /// Tier to model/token/cost tables.
    #[serde(default)]
    pub tiers: TiersConfig,

    /// Intent router settings.
    #[serde(default)]
    pub router: RouterConfig,

    /// Knowledge matcher settings.
    #[serde(default)]
    pub matcher: MatcherConfig,

    /// Responder settings.
    #[serde(default)]
    pub responder: ResponderConfig,

    /// Sentiment and complexity heuristics.
    #[serde(default)]
    pub signals: SignalsConfig,
}

/// Engine-wide configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Deadline applied to every backend call, in seconds.
    #[serde(default = "default_backend_timeout_secs")]
    pub backend_timeout_secs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            backend_timeout_secs: default_backend_timeout_secs(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_backend_timeout_secs() -> u64 {
    20
}

/// Anthropic API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnthropicConfig {
    /// Anthropic API key. `None` requires the `ANTHROPIC_API_KEY` environment variable.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Anthropic API version string.
    #[serde(default = "default_api_version")]
    pub api_version: String,

    /// Base URL of the Messages API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Retries on transient HTTP statuses. Zero disables retrying.
    #[serde(default)]
    pub max_retries: u32,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_http_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_version: default_api_version(),
            base_url: default_base_url(),
            max_retries: 0,
            timeout_secs: default_http_timeout_secs(),
        }
    }
}

fn default_api_version() -> String {
    "2023-06-01".to_string()
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_http_timeout_secs() -> u64 {
    60
}

/// Model, output budget, and approximate cost for a single tier.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TierConfig {
    /// Backend model identifier.
    pub model: String,

    /// Maximum output tokens for replies on this tier.
    pub max_tokens: u32,

    /// Approximate cost of one reply in USD.
    pub approx_cost_usd: f64,
}

/// Tier tables. The tier selector only picks a tier; these map it to a model.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TiersConfig {
    /// Tier 1: greetings, confident FAQ answers, opt-outs.
    #[serde(default = "default_light_tier")]
    pub light: TierConfig,

    /// Tier 2: everything not routed elsewhere.
    #[serde(default = "default_standard_tier")]
    pub standard: TierConfig,

    /// Tier 3: escalations, unhappy customers, complex questions.
    #[serde(default = "default_premium_tier")]
    pub premium: TierConfig,
}

impl Default for TiersConfig {
    fn default() -> Self {
        Self {
            light: default_light_tier(),
            standard: default_standard_tier(),
            premium: default_premium_tier(),
        }
    }
}

fn default_light_model() -> String {
    "claude-haiku-4-5-20250901".to_string()
}

fn default_light_tier() -> TierConfig {
    TierConfig {
        model: default_light_model(),
        max_tokens: 300,
        approx_cost_usd: 0.0005,
    }
}

fn default_standard_tier() -> TierConfig {
    TierConfig {
        model: "claude-sonnet-4-20250514".to_string(),
        max_tokens: 500,
        approx_cost_usd: 0.003,
    }
}

fn default_premium_tier() -> TierConfig {
    TierConfig {
        model: "claude-opus-4-20250514".to_string(),
        max_tokens: 800,
        approx_cost_usd: 0.015,
    }
}

/// Intent router configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    /// Model used for classification.
    #[serde(default = "default_light_model")]
    pub model: String,

    /// Maximum output tokens for the classification call.
    #[serde(default = "default_router_max_tokens")]
    pub max_tokens: u32,

    /// Knowledge items surfaced in the classification prompt.
    #[serde(default = "default_max_knowledge_items")]
    pub max_knowledge_items: usize,

    /// History turns surfaced in the classification prompt.
    #[serde(default = "default_router_history_turns")]
    pub history_turns: usize,

    /// Customer text is truncated to this many characters before prompting.
    #[serde(default = "default_max_message_chars")]
    pub max_message_chars: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            model: default_light_model(),
            max_tokens: default_router_max_tokens(),
            max_knowledge_items: default_max_knowledge_items(),
            history_turns: default_router_history_turns(),
            max_message_chars: default_max_message_chars(),
        }
    }
}

fn default_router_max_tokens() -> u32 {
    500
}

fn default_max_knowledge_items() -> usize {
    15
}

fn default_router_history_turns() -> usize {
    5
}

fn default_max_message_chars() -> usize {
    500
}

/// Knowledge matcher configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MatcherConfig {
    /// Minimum keyword or semantic score for a match to be accepted.
    #[serde(default = "default_match_threshold")]
    pub threshold: f64,

    /// The semantic stage only runs on knowledge bases at most this large.
    #[serde(default = "default_semantic_max_candidates")]
    pub semantic_max_candidates: usize,

    /// Model used for the semantic stage.
    #[serde(default = "default_light_model")]
    pub semantic_model: String,

    /// Maximum output tokens for the semantic verdict.
    #[serde(default = "default_semantic_max_tokens")]
    pub semantic_max_tokens: u32,

    /// Token-set Jaccard is only computed when both strings are shorter than this.
    #[serde(default = "default_jaccard_max_chars")]
    pub jaccard_max_chars: usize,

    /// Default number of suggestions returned by the suggestion entry point.
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            threshold: default_match_threshold(),
            semantic_max_candidates: default_semantic_max_candidates(),
            semantic_model: default_light_model(),
            semantic_max_tokens: default_semantic_max_tokens(),
            jaccard_max_chars: default_jaccard_max_chars(),
            suggestion_limit: default_suggestion_limit(),
        }
    }
}

fn default_match_threshold() -> f64 {
    0.6
}

fn default_semantic_max_candidates() -> usize {
    20
}

fn default_semantic_max_tokens() -> u32 {
    200
}

fn default_jaccard_max_chars() -> usize {
    50
}

fn default_suggestion_limit() -> usize {
    3
}

/// Responder configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ResponderConfig {
    /// History turns replayed to the backend before the current message.
    #[serde(default = "default_responder_history_turns")]
    pub history_turns: usize,

    /// Knowledge items shown when no FAQ matched.
    #[serde(default = "default_sample_items")]
    pub sample_items: usize,

    /// Sampling temperature for reply generation.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for ResponderConfig {
    fn default() -> Self {
        Self {
            history_turns: default_responder_history_turns(),
            sample_items: default_sample_items(),
            temperature: default_temperature(),
        }
    }
}

fn default_responder_history_turns() -> usize {
    4
}

fn default_sample_items() -> usize {
    5
}

fn default_temperature() -> f32 {
    0.7
}

/// Word lists and weights for the sentiment and complexity heuristics.
///
/// Entries are matched as whole words (or whole word sequences) against the
/// lowercased message. Defaults cover English and French.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SignalsConfig {
    /// Words that lower the sentiment score.
    #[serde(default = "default_negative_words")]
    pub negative_words: Vec<String>,

    /// Words that raise the sentiment score.
    #[serde(default = "default_positive_words")]
    pub positive_words: Vec<String>,

    /// Subtracted per negative-word hit.
    #[serde(default = "default_negative_penalty")]
    pub negative_penalty: f64,

    /// Added per positive-word hit.
    #[serde(default = "default_positive_bonus")]
    pub positive_bonus: f64,

    /// Subtracted when the message is mostly uppercase.
    #[serde(default = "default_caps_penalty")]
    pub caps_penalty: f64,

    /// Uppercase letter ratio above which the caps penalty applies.
    #[serde(default = "default_caps_ratio")]
    pub caps_ratio: f64,

    /// The caps penalty only applies to messages longer than this.
    #[serde(default = "default_caps_min_chars")]
    pub caps_min_chars: usize,

    /// Subtracted when there are more than `exclamation_limit` exclamation marks.
    #[serde(default = "default_exclamation_penalty")]
    pub exclamation_penalty: f64,

    #[serde(default = "default_exclamation_limit")]
    pub exclamation_limit: usize,

    /// Connectives that signal a conditional question on long messages.
    #[serde(default = "default_conditional_words")]
    pub conditional_words: Vec<String>,

    /// Words that signal a comparison at any length.
    #[serde(default = "default_comparison_words")]
    pub comparison_words: Vec<String>,

    /// Words that signal a request for explanation on longer messages.
    #[serde(default = "default_explanatory_words")]
    pub explanatory_words: Vec<String>,

    #[serde(default = "default_conditional_min_chars")]
    pub conditional_min_chars: usize,

    #[serde(default = "default_explanatory_min_chars")]
    pub explanatory_min_chars: usize,
}

impl Default for SignalsConfig {
    fn default() -> Self {
        Self {
            negative_words: default_negative_words(),
            positive_words: default_positive_words(),
            negative_penalty: default_negative_penalty(),
            positive_bonus: default_positive_bonus(),
            caps_penalty: default_caps_penalty(),
            caps_ratio: default_caps_ratio(),
            caps_min_chars: default_caps_min_chars(),
            exclamation_penalty: default_exclamation_penalty(),
            exclamation_limit: default_exclamation_limit(),
            conditional_words: default_conditional_words(),
            comparison_words: default_comparison_words(),
            explanatory_words: default_explanatory_words(),
            conditional_min_chars: default_conditional_min_chars(),
            explanatory_min_chars: default_explanatory_min_chars(),
        }
    }
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| (*w).to_string()).collect()
}

fn default_negative_words() -> Vec<String> {
    words(&[
        // English
        "angry", "annoyed", "awful", "bad", "complaint", "disappointed", "disgusting",
        "frustrated", "furious", "hate", "horrible", "never", "problem", "refund", "rude",
        "scam", "terrible", "unacceptable", "useless", "worst",
        // French
        "arnaque", "colère", "déçu", "déçue", "decu", "furieux", "honteux", "inacceptable",
        "inadmissible", "mauvais", "nul", "pire", "plainte", "problème", "remboursement",
    ])
}

fn default_positive_words() -> Vec<String> {
    words(&[
        // English
        "amazing", "awesome", "excellent", "fantastic", "glad", "great", "happy", "love",
        "perfect", "thank", "thanks", "wonderful",
        // French
        "bravo", "content", "contente", "génial", "merci", "parfait", "ravi", "ravie", "super",
    ])
}

fn default_negative_penalty() -> f64 {
    0.15
}

fn default_positive_bonus() -> f64 {
    0.1
}

fn default_caps_penalty() -> f64 {
    0.2
}

fn default_caps_ratio() -> f64 {
    0.5
}

fn default_caps_min_chars() -> usize {
    10
}

fn default_exclamation_penalty() -> f64 {
    0.1
}

fn default_exclamation_limit() -> usize {
    2
}

fn default_conditional_words() -> Vec<String> {
    words(&[
        "if", "but", "however", "except", "unless", "although",
        "si", "mais", "cependant", "sauf", "toutefois", "pourtant",
    ])
}

fn default_comparison_words() -> Vec<String> {
    words(&[
        "difference", "versus", "vs", "better", "compare", "comparison", "cheaper",
        "différence", "mieux", "comparer", "comparaison", "moins cher",
    ])
}

fn default_explanatory_words() -> Vec<String> {
    words(&[
        "how does it work", "explain", "why", "how come",
        "comment ça marche", "comment ca marche", "expliquer", "expliquez", "pourquoi",
    ])
}

fn default_conditional_min_chars() -> usize {
    100
}

fn default_explanatory_min_chars() -> usize {
    50
}
