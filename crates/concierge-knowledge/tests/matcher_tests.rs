// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the multi-stage FAQ matcher.

use std::sync::Arc;
use std::time::Duration;

use concierge_config::MatcherConfig;
use concierge_core::{FallbackCause, KnowledgeItem, MatchStrategy, Outcome};
use concierge_knowledge::KnowledgeMatcher;
use concierge_test_utils::{MockProvider, MockReply};

fn salon_kb() -> Vec<KnowledgeItem> {
    vec![
        KnowledgeItem::new("hours", "Quels sont vos horaires d'ouverture ?", "9h-19h du mardi au samedi.")
            .with_keywords(["horaires", "ouverture", "ouvert"]),
        KnowledgeItem::new("parking", "Is there parking nearby?", "Free parking behind the salon.")
            .with_keywords(["parking", "car", "garage"]),
        KnowledgeItem::new("price", "How much is a haircut?", "From 25 euros.")
            .with_keywords(["price", "haircut", "cost"]),
    ]
}

fn matcher(provider: &Arc<MockProvider>) -> KnowledgeMatcher {
    KnowledgeMatcher::new(provider.clone(), MatcherConfig::default())
}

#[tokio::test]
async fn accents_and_punctuation_do_not_prevent_exact_match() {
    let provider = Arc::new(MockProvider::new());
    let items = vec![KnowledgeItem::new("cafe", "cafe", "Espresso bar on site.")];

    let outcome = matcher(&provider).match_query("Café?", &items).await;
    let result = outcome.into_value().unwrap();
    assert_eq!(result.item.id, "cafe");
    assert_eq!(result.similarity, 1.0);
    assert_eq!(result.strategy, MatchStrategy::Exact);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn first_containment_match_short_circuits_before_later_equal_item() {
    let provider = Arc::new(MockProvider::new());
    let mut items = salon_kb();
    items.push(KnowledgeItem::new("hours-short", "Quels sont vos horaires", "Same answer."));

    let outcome = matcher(&provider)
        .match_query("Quels sont vos horaires?", &items)
        .await;
    assert!(!outcome.is_fallback());
    let result = outcome.into_value().unwrap();
    assert_eq!(result.item.id, "hours");
    assert_eq!(result.similarity, 0.95);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn empty_knowledge_base_never_matches_or_calls_backend() {
    let provider = Arc::new(MockProvider::new());
    let outcome = matcher(&provider).match_query("anything at all", &[]).await;
    assert!(matches!(outcome, Outcome::Resolved(None)));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn punctuation_only_query_is_no_match() {
    let provider = Arc::new(MockProvider::new());
    let outcome = matcher(&provider).match_query("?!...", &salon_kb()).await;
    assert!(matches!(outcome, Outcome::Resolved(None)));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn strong_keyword_overlap_matches_without_backend() {
    let provider = Arc::new(MockProvider::new());
    let result = matcher(&provider)
        .match_query("haircut price and cost?", &salon_kb())
        .await
        .into_value()
        .unwrap();
    assert_eq!(result.item.id, "price");
    assert_eq!(result.strategy, MatchStrategy::Keyword);
    assert_eq!(result.similarity, 1.0);
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn inconclusive_keywords_consult_semantic_stage() {
    let provider = Arc::new(MockProvider::with_responses([
        r#"{"matched_index": 2, "similarity": 0.82, "reasoning": "both ask where to park"}"#,
    ]));
    let outcome = matcher(&provider)
        .match_query("Where do I leave my car?", &salon_kb())
        .await;

    let result = outcome.into_value().unwrap();
    assert_eq!(result.item.id, "parking");
    assert_eq!(result.strategy, MatchStrategy::Semantic);
    assert_eq!(result.similarity, 0.82);

    let request = provider.last_request().await.unwrap();
    assert_eq!(request.temperature, Some(0.0));
    assert_eq!(request.model, MatcherConfig::default().semantic_model);
    assert!(request.messages[0].content.contains("2. Is there parking nearby?"));
}

#[tokio::test]
async fn low_semantic_similarity_falls_back_to_weak_keyword_match() {
    let provider = Arc::new(MockProvider::with_responses([
        r#"{"matched_index": 2, "similarity": 0.4, "reasoning": "loosely related"}"#,
    ]));
    let outcome = matcher(&provider)
        .match_query("Where do I leave my car?", &salon_kb())
        .await;

    // Keyword score 0.5 clears 0.7 * 0.6.
    assert!(!outcome.is_fallback());
    let result = outcome.into_value().unwrap();
    assert_eq!(result.item.id, "parking");
    assert_eq!(result.strategy, MatchStrategy::Keyword);
    assert_eq!(result.similarity, 0.5);
    assert_eq!(provider.call_count(), 1);
}

#[tokio::test]
async fn out_of_range_index_is_rejected() {
    let provider = Arc::new(MockProvider::with_responses([
        r#"{"matched_index": 9, "similarity": 0.95, "reasoning": "?"}"#,
    ]));
    let result = matcher(&provider)
        .match_query("Where do I leave my car?", &salon_kb())
        .await
        .into_value()
        .unwrap();
    assert_eq!(result.strategy, MatchStrategy::Keyword);
}

#[tokio::test]
async fn backend_failure_is_reported_and_skipped() {
    let provider = Arc::new(MockProvider::failing());
    let outcome = matcher(&provider)
        .match_query("Where do I leave my car?", &salon_kb())
        .await;

    assert!(matches!(
        outcome.cause(),
        Some(FallbackCause::BackendUnavailable(_))
    ));
    let result = outcome.value().as_ref().unwrap();
    assert_eq!(result.item.id, "parking");
    assert_eq!(result.strategy, MatchStrategy::Keyword);
}

#[tokio::test]
async fn prose_reply_is_malformed_output() {
    let provider = Arc::new(MockProvider::with_responses(["I think it is the second one."]));
    let outcome = matcher(&provider)
        .match_query("Where do I leave my car?", &salon_kb())
        .await;
    assert!(matches!(
        outcome.cause(),
        Some(FallbackCause::MalformedOutput(_))
    ));
}

#[tokio::test(start_paused = true)]
async fn hanging_backend_times_out() {
    let provider = Arc::new(MockProvider::with_replies([MockReply::Hang]));
    let outcome = matcher(&provider)
        .with_deadline(Duration::from_secs(2))
        .match_query("Where do I leave my car?", &salon_kb())
        .await;
    assert_eq!(
        outcome.cause(),
        Some(&FallbackCause::Timeout(Duration::from_secs(2)))
    );
    assert!(outcome.value().is_some());
}

#[tokio::test]
async fn large_knowledge_base_skips_semantic_stage() {
    let provider = Arc::new(MockProvider::new());
    let mut items = salon_kb();
    for i in 0..20 {
        items.push(KnowledgeItem::new(format!("filler-{i}"), format!("Filler question {i}"), "n/a"));
    }
    let outcome = matcher(&provider)
        .match_query("Where do I leave my car?", &items)
        .await;
    assert_eq!(provider.call_count(), 0);
    assert_eq!(outcome.into_value().unwrap().item.id, "parking");
}

#[tokio::test]
async fn unrelated_query_skips_semantic_stage() {
    let provider = Arc::new(MockProvider::new());
    let outcome = matcher(&provider)
        .match_query("Tell me a joke about penguins", &salon_kb())
        .await;
    assert!(matches!(outcome, Outcome::Resolved(None)));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn offline_matcher_uses_keyword_fallback() {
    let outcome = KnowledgeMatcher::offline(MatcherConfig::default())
        .match_query("Where do I leave my car?", &salon_kb())
        .await;
    assert!(!outcome.is_fallback());
    assert_eq!(outcome.into_value().unwrap().item.id, "parking");
}

#[tokio::test]
async fn weak_keyword_below_fallback_ratio_is_no_match() {
    let config = MatcherConfig {
        threshold: 0.9,
        ..MatcherConfig::default()
    };
    // 0.5 < 0.7 * 0.9
    let outcome = KnowledgeMatcher::offline(config)
        .match_query("Where do I leave my car?", &salon_kb())
        .await;
    assert!(matches!(outcome, Outcome::Resolved(None)));
}

#[test]
fn suggestions_rank_candidates_without_backend() {
    let provider = Arc::new(MockProvider::new());
    let suggestions = matcher(&provider).suggest("haircut price, is there parking?", &salon_kb());
    assert!(!suggestions.is_empty());
    assert!(suggestions.len() <= 3);
    assert_eq!(suggestions[0].item.id, "price");
    assert!(suggestions.iter().any(|s| s.item.id == "parking"));
    assert_eq!(provider.call_count(), 0);
}
