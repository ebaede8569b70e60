// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexical sentiment and complexity heuristics.
//!
//! Zero-cost scoring used only as input to tier selection. No backend call,
//! no allocation beyond tokenizing the message once.

use concierge_config::SignalsConfig;
use concierge_core::knowledge::clamp_unit;
use serde::{Deserialize, Serialize};

/// Neutral sentiment, the starting point of every score.
pub const NEUTRAL_SENTIMENT: f64 = 0.5;

/// Heuristic signals for one message.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Signals {
    /// Positivity in [0, 1].
    pub sentiment: f64,
    pub complex: bool,
}

/// Word lists pre-split into token sequences, plus the weights that apply to them.
#[derive(Debug, Clone)]
pub struct SignalHeuristics {
    negative: Vec<Vec<String>>,
    positive: Vec<Vec<String>>,
    conditional: Vec<Vec<String>>,
    comparison: Vec<Vec<String>>,
    explanatory: Vec<Vec<String>>,
    config: SignalsConfig,
}

impl SignalHeuristics {
    pub fn new(config: &SignalsConfig) -> Self {
        Self {
            negative: phrases(&config.negative_words),
            positive: phrases(&config.positive_words),
            conditional: phrases(&config.conditional_words),
            comparison: phrases(&config.comparison_words),
            explanatory: phrases(&config.explanatory_words),
            config: config.clone(),
        }
    }

    /// Computes both signals for `text`.
    pub fn analyze(&self, text: &str) -> Signals {
        let tokens = tokenize(text);
        Signals {
            sentiment: self.sentiment_of(text, &tokens),
            complex: self.complexity_of(text, &tokens),
        }
    }

    /// Sentiment in [0, 1]; 0.5 is neutral.
    pub fn sentiment(&self, text: &str) -> f64 {
        self.sentiment_of(text, &tokenize(text))
    }

    /// Whether the message likely needs a stronger model.
    pub fn is_complex(&self, text: &str) -> bool {
        self.complexity_of(text, &tokenize(text))
    }

    fn sentiment_of(&self, text: &str, tokens: &[String]) -> f64 {
        let cfg = &self.config;
        let negative_hits = count_hits(tokens, &self.negative) as f64;
        let positive_hits = count_hits(tokens, &self.positive) as f64;

        let mut score = NEUTRAL_SENTIMENT - negative_hits * cfg.negative_penalty
            + positive_hits * cfg.positive_bonus;

        if text.chars().count() > cfg.caps_min_chars && uppercase_ratio(text) > cfg.caps_ratio {
            score -= cfg.caps_penalty;
        }
        if text.chars().filter(|c| *c == '!').count() > cfg.exclamation_limit {
            score -= cfg.exclamation_penalty;
        }

        clamp_unit(score)
    }

    fn complexity_of(&self, text: &str, tokens: &[String]) -> bool {
        let cfg = &self.config;
        let length = text.trim().chars().count();

        text.chars().filter(|c| *c == '?').count() > 1
            || (length > cfg.conditional_min_chars && count_hits(tokens, &self.conditional) > 0)
            || count_hits(tokens, &self.comparison) > 0
            || (length > cfg.explanatory_min_chars && count_hits(tokens, &self.explanatory) > 0)
    }
}

impl Default for SignalHeuristics {
    fn default() -> Self {
        Self::new(&SignalsConfig::default())
    }
}

/// Lowercased alphanumeric runs. Apostrophes and hyphens split words.
fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

fn phrases(words: &[String]) -> Vec<Vec<String>> {
    words
        .iter()
        .map(|w| tokenize(w))
        .filter(|p| !p.is_empty())
        .collect()
}

/// Total occurrences of every phrase as a contiguous token run.
fn count_hits(tokens: &[String], phrases: &[Vec<String>]) -> usize {
    phrases
        .iter()
        .map(|phrase| {
            tokens
                .windows(phrase.len())
                .filter(|window| *window == phrase.as_slice())
                .count()
        })
        .sum()
}

fn uppercase_ratio(text: &str) -> f64 {
    let (letters, upper) = text
        .chars()
        .filter(|c| c.is_alphabetic())
        .fold((0usize, 0usize), |(l, u), c| (l + 1, u + usize::from(c.is_uppercase())));
    if letters == 0 {
        0.0
    } else {
        upper as f64 / letters as f64
    }
}
