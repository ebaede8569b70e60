// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reply generation for a routed message.

use std::fmt::Write as _;
use std::sync::Arc;
use std::time::Duration;

use concierge_config::ResponderConfig;
use concierge_core::{
    BusinessContext, ConciergeError, DEFAULT_DEADLINE, ExtractedEntities, FALLBACK_MODEL, FallbackCause,
    InboundMessage, Intent, KnowledgeItem, Outcome, ProviderAdapter, ProviderMessage,
    ProviderRequest, ResponsePlan, Role, RoutingDecision, Tier, complete_within,
};
use concierge_router::TierTable;
use tracing::{debug, warn};

use crate::clean::clean_reply;
use crate::tables::{FALLBACK_ACTIONS, fallback_text, instruction, suggested_actions};

/// Generates the outbound reply with the model of the selected tier.
pub struct Responder {
    provider: Arc<dyn ProviderAdapter>,
    tiers: TierTable,
    config: ResponderConfig,
    deadline: Duration,
}

impl Responder {
    pub fn new(provider: Arc<dyn ProviderAdapter>, tiers: TierTable, config: ResponderConfig) -> Self {
        Self {
            provider,
            tiers,
            config,
            deadline: DEFAULT_DEADLINE,
        }
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = deadline;
        self
    }

    /// Produces the reply for `message`. Never fails: a backend error or an
    /// empty reply yields the canned fallback plan for the decision's intent.
    pub async fn respond(
        &self,
        message: &InboundMessage,
        decision: &RoutingDecision,
        tier: Tier,
        knowledge: &[KnowledgeItem],
    ) -> Outcome<ResponsePlan> {
        let request = self.build_request(message, decision, tier, knowledge);
        let response = match complete_within(self.provider.as_ref(), request, self.deadline).await {
            Ok(response) => response,
            Err(e) => return fallback(decision.intent, tier, &e),
        };

        let text = clean_reply(&response.content);
        if text.is_empty() {
            return fallback(decision.intent, tier, &ConciergeError::malformed("empty reply"));
        }

        debug!(
            intent = %decision.intent,
            tier = tier.level(),
            model = %response.model,
            output_tokens = response.usage.output_tokens,
            "reply generated"
        );
        Outcome::Resolved(ResponsePlan {
            text,
            model_used: response.model,
            tier,
            escalate: decision.intent == Intent::Escalate,
            suggested_actions: suggested_actions(decision.intent),
            usage: Some(response.usage),
        })
    }

    /// Builds the generation request: system template, recent history, then
    /// the current message with its intent instruction.
    pub fn build_request(
        &self,
        message: &InboundMessage,
        decision: &RoutingDecision,
        tier: Tier,
        knowledge: &[KnowledgeItem],
    ) -> ProviderRequest {
        let mut request = ProviderRequest::new(self.tiers.model(tier), self.tiers.max_tokens(tier))
            .with_system(self.system_prompt(&message.business, decision, knowledge))
            .with_temperature(self.config.temperature);

        // Conversations sent to the backend start with a customer turn.
        let history = message.recent_history(self.config.history_turns);
        let first_customer = history
            .iter()
            .position(|t| t.role == Role::Customer)
            .unwrap_or(history.len());
        for turn in &history[first_customer..] {
            request = request.with_message(match turn.role {
                Role::Customer => ProviderMessage::user(turn.text.clone()),
                Role::Assistant => ProviderMessage::assistant(turn.text.clone()),
            });
        }

        let mut current = message.text.trim().to_string();
        let _ = write!(current, "\n\n[Instruction: {}", instruction(decision.intent));
        if let Some(known) = describe_entities(&decision.entities) {
            let _ = write!(current, " Details already known: {known}.");
        }
        current.push(']');
        request.with_message(ProviderMessage::user(current))
    }

    fn system_prompt(
        &self,
        business: &BusinessContext,
        decision: &RoutingDecision,
        knowledge: &[KnowledgeItem],
    ) -> String {
        let mut prompt = format!(
            "You are the assistant of {name}, a {kind}. You reply to customers by text message: \
             short, friendly, and in the customer's language. Never invent prices, opening hours, \
             or availability that the business knowledge below does not state.\n\n",
            name = business.name,
            kind = business.kind,
        );

        if let Some(faq) = &decision.faq_match {
            let _ = write!(
                prompt,
                "The customer's question is answered by this entry. Use its answer as is:\nQ: {}\nA: {}",
                faq.item.question, faq.item.answer
            );
        } else if knowledge.is_empty() {
            prompt.push_str("No business knowledge is available.");
        } else {
            prompt.push_str("Business knowledge:");
            for item in knowledge.iter().take(self.config.sample_items) {
                let _ = write!(prompt, "\n- Q: {} A: {}", item.question, item.answer);
            }
        }
        prompt
    }
}

/// The canned plan used when no reply could be generated.
pub fn fallback_plan(intent: Intent, tier: Tier) -> ResponsePlan {
    ResponsePlan {
        text: fallback_text(intent).to_string(),
        model_used: FALLBACK_MODEL.to_string(),
        tier,
        escalate: true,
        suggested_actions: FALLBACK_ACTIONS.iter().map(|a| a.to_string()).collect(),
        usage: None,
    }
}

fn fallback(intent: Intent, tier: Tier, err: &ConciergeError) -> Outcome<ResponsePlan> {
    warn!(error = %err, intent = %intent, "reply generation failed, using canned reply");
    Outcome::fallback(fallback_plan(intent, tier), FallbackCause::from(err))
}

fn describe_entities(entities: &ExtractedEntities) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(service) = &entities.service {
        parts.push(format!("service {service}"));
    }
    if let Some(date) = entities.date {
        parts.push(format!("date {date}"));
    }
    if let Some(time) = &entities.time {
        parts.push(format!("time {time}"));
    }
    if let Some(name) = &entities.name {
        parts.push(format!("name {name}"));
    }
    if let Some(phone) = &entities.phone {
        parts.push(format!("phone {phone}"));
    }
    if let Some(email) = &entities.email {
        parts.push(format!("email {email}"));
    }
    if let Some(quantity) = entities.quantity {
        parts.push(format!("quantity {quantity}"));
    }
    (!parts.is_empty()).then(|| parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn fallback_plan_escalates() {
        let plan = fallback_plan(Intent::Greeting, Tier::Light);
        assert!(plan.escalate);
        assert!(plan.is_fallback());
        assert_eq!(plan.suggested_actions, ["review_error", "manual_response"]);
        assert_eq!(plan.tier, Tier::Light);
        assert!(plan.usage.is_none());
    }

    #[test]
    fn entities_are_described_in_order() {
        let entities = ExtractedEntities {
            service: Some("coloring".into()),
            date: NaiveDate::from_ymd_opt(2026, 3, 14),
            time: Some("15:00".into()),
            ..ExtractedEntities::default()
        };
        assert_eq!(
            describe_entities(&entities).unwrap(),
            "service coloring, date 2026-03-14, time 15:00"
        );
        assert!(describe_entities(&ExtractedEntities::default()).is_none());
    }
}
