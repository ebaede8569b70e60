// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Knowledge base records and match results.

use serde::{Deserialize, Serialize};

/// A question/answer record used for FAQ matching.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeItem {
    pub id: String,
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: String,
    /// Keywords; duplicates are ignored and order carries no meaning.
    #[serde(default)]
    pub keywords: Vec<String>,
}

impl KnowledgeItem {
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            answer: answer.into(),
            category: String::new(),
            keywords: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Replaces the keyword list, dropping exact duplicates.
    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords.clear();
        for keyword in keywords {
            let keyword = keyword.into();
            if !self.keywords.contains(&keyword) {
                self.keywords.push(keyword);
            }
        }
        self
    }

    /// The slim reference carried by match results.
    pub fn reference(&self) -> KnowledgeRef {
        KnowledgeRef {
            id: self.id.clone(),
            question: self.question.clone(),
            answer: self.answer.clone(),
        }
    }
}

/// Reference to a knowledge item: id, question and answer only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeRef {
    pub id: String,
    pub question: String,
    pub answer: String,
}

/// Which matcher stage produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MatchStrategy {
    Exact,
    Keyword,
    Semantic,
}

/// A knowledge item matched against a query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub item: KnowledgeRef,
    /// Similarity in [0, 1].
    pub similarity: f64,
    pub strategy: MatchStrategy,
}

impl MatchResult {
    /// Builds a result, clamping `similarity` into [0, 1].
    pub fn new(item: &KnowledgeItem, similarity: f64, strategy: MatchStrategy) -> Self {
        Self {
            item: item.reference(),
            similarity: clamp_unit(similarity),
            strategy,
        }
    }
}

/// Clamps to [0, 1], mapping NaN to 0.
pub fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}
