// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure similarity scores for the exact and keyword stages.
//!
//! All inputs are expected to be normalized with [`crate::normalize::normalize`].

use std::collections::HashSet;

use crate::normalize::tokens;

pub const EQUAL: f64 = 1.0;
pub const QUESTION_CONTAINS_QUERY: f64 = 0.95;
pub const QUERY_CONTAINS_QUESTION: f64 = 0.90;

/// Jaccard scores at or below this are discarded.
pub const JACCARD_FLOOR: f64 = 0.7;

/// Partial overlaps only count between tokens at least this long.
const MIN_PARTIAL_LEN: usize = 3;

/// Exact-stage score of `question` against `query`.
///
/// Equality, then containment either way, then token-set Jaccard for short
/// strings. Returns 0 when nothing applies.
pub fn exact_score(query: &str, question: &str, jaccard_max_chars: usize) -> f64 {
    if query.is_empty() || question.is_empty() {
        return 0.0;
    }
    if query == question {
        return EQUAL;
    }
    if question.contains(query) {
        return QUESTION_CONTAINS_QUERY;
    }
    if query.contains(question) {
        return QUERY_CONTAINS_QUESTION;
    }
    if query.chars().count() < jaccard_max_chars && question.chars().count() < jaccard_max_chars {
        let similarity = jaccard(query, question);
        if similarity > JACCARD_FLOOR {
            return similarity;
        }
    }
    0.0
}

/// Token-set Jaccard similarity.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let a: HashSet<&str> = tokens(a).collect();
    let b: HashSet<&str> = tokens(b).collect();
    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(&b).count() as f64 / union as f64
}

/// Keyword-stage score of `keywords` against `query`, in [0, 1].
///
/// Exact token hits count 1, keywords contained in the query count 0.5, and
/// remaining token/keyword pairs where one contains the other count 0.3. The
/// sum is divided by `max(3, keywords * 0.3)`.
pub fn keyword_score(query: &str, keywords: &[String]) -> f64 {
    if query.is_empty() || keywords.is_empty() {
        return 0.0;
    }
    let query_tokens: Vec<&str> = tokens(query).collect();
    let keyword_set: HashSet<&str> = keywords.iter().map(String::as_str).collect();

    let exact = query_tokens
        .iter()
        .filter(|t| keyword_set.contains(**t))
        .count();
    let contained: Vec<&str> = keyword_set
        .iter()
        .copied()
        .filter(|k| query.contains(k))
        .collect();

    let mut partial = 0usize;
    for keyword in &keyword_set {
        if contained.contains(keyword) || keyword.chars().count() < MIN_PARTIAL_LEN {
            continue;
        }
        for token in &query_tokens {
            if *token == *keyword || token.chars().count() < MIN_PARTIAL_LEN {
                continue;
            }
            if token.contains(keyword) || keyword.contains(token) {
                partial += 1;
            }
        }
    }

    let raw = exact as f64 + 0.5 * contained.len() as f64 + 0.3 * partial as f64;
    let divisor = (keyword_set.len() as f64 * 0.3).max(3.0);
    (raw / divisor).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    fn kw(list: &[&str]) -> Vec<String> {
        list.iter().map(|k| normalize(k)).collect()
    }

    #[test]
    fn equality_scores_one() {
        assert_eq!(exact_score(&normalize("Café?"), &normalize("cafe"), 50), 1.0);
        assert_eq!(exact_score(&normalize("Your e-mail?"), &normalize("your email"), 50), 1.0);
    }

    #[test]
    fn containment_scores_by_direction() {
        let q = normalize("Quels sont vos horaires?");
        let question = normalize("Quels sont vos horaires d'ouverture ?");
        assert_eq!(exact_score(&q, &question, 50), 0.95);
        assert_eq!(exact_score(&question, &q, 50), 0.90);
    }

    #[test]
    fn jaccard_only_for_short_strings_above_floor() {
        // 4 shared tokens of 5 total.
        let a = "do you take credit cards";
        let b = "do you take cards";
        assert_eq!(exact_score(a, b, 50), 0.8);

        let a = "cards do you take credit";
        let b = "do you take cards";
        assert_eq!(exact_score(a, b, 50), 0.8);
        assert_eq!(exact_score(a, b, 10), 0.0);

        let a = "do you sell gift cards";
        let b = "do you do haircuts";
        assert_eq!(exact_score(a, b, 50), 0.0);
    }

    #[test]
    fn empty_inputs_score_zero() {
        assert_eq!(exact_score("", "anything", 50), 0.0);
        assert_eq!(keyword_score("", &kw(&["price"])), 0.0);
        assert_eq!(keyword_score("price", &[]), 0.0);
    }

    #[test]
    fn keyword_hits_accumulate() {
        // exact "price" (1) + contained "price" (0.5) over 3
        assert_eq!(keyword_score("what is the price", &kw(&["price", "cost"])), 0.5);
        // add exact + contained "cost": 3.0 / 3
        assert_eq!(keyword_score("price and cost", &kw(&["price", "cost"])), 1.0);
    }

    #[test]
    fn partial_overlaps_count_less() {
        // "parking" contains "park"; "park" is also contained in the query string.
        let contained = keyword_score("is there parking", &kw(&["park"]));
        assert!((contained - 0.5 / 3.0).abs() < 1e-9);
        // The keyword contains the query token.
        let partial = keyword_score("colou", &kw(&["colours"]));
        assert!((partial - 0.3 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn short_tokens_do_not_overlap() {
        assert_eq!(keyword_score("a to", &kw(&["tomato"])), 0.0);
    }

    #[test]
    fn large_keyword_lists_dilute() {
        let mut keywords: Vec<String> = (0..20).map(|i| format!("kw{i}")).collect();
        keywords.push("price".into());
        // 21 keywords -> divisor 6.3
        let score = keyword_score("price", &keywords);
        assert!((score - 1.5 / 6.3).abs() < 1e-9);
    }

    #[test]
    fn keyword_score_is_capped() {
        let score = keyword_score("price price price price", &kw(&["price"]));
        assert_eq!(score, 1.0);
    }
}
