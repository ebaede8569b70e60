// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Static per-intent tables: generation instructions, follow-up actions, and
//! canned replies used when generation fails.

use concierge_core::Intent;

/// Actions attached to every fallback reply.
pub const FALLBACK_ACTIONS: [&str; 2] = ["review_error", "manual_response"];

/// Instruction appended to the customer message for `intent`.
pub fn instruction(intent: Intent) -> &'static str {
    match intent {
        Intent::Faq => {
            "Answer the question from the business knowledge. If it is not covered, say you will check with the team."
        }
        Intent::Booking => {
            "Help the customer book. Confirm the service, date and time you know, and ask only for what is missing."
        }
        Intent::LeadCapture => {
            "Answer briefly, show interest in their project, and ask for their name and the best way to reach them."
        }
        Intent::Support => {
            "Acknowledge the problem, apologize briefly, and ask for the details needed to sort it out."
        }
        Intent::Escalate => {
            "Apologize sincerely and tell the customer a member of the team will get back to them personally."
        }
        Intent::OptOut => {
            "Confirm they will no longer receive messages. Do not try to change their mind."
        }
        Intent::Greeting => "Greet the customer warmly and ask how you can help.",
        Intent::Thanks => "Reply warmly in one sentence and offer further help.",
        Intent::Unknown => {
            "Answer if the business knowledge allows it, otherwise ask one short clarifying question."
        }
    }
}

/// Follow-up actions the caller should take for `intent`.
pub fn suggested_actions(intent: Intent) -> Vec<String> {
    let actions: &[&str] = match intent {
        Intent::Booking => &["show_calendar", "create_booking"],
        Intent::Escalate => &["notify_team", "create_ticket"],
        Intent::LeadCapture => &["capture_lead", "notify_sales"],
        Intent::Support => &["create_ticket"],
        Intent::OptOut => &["unsubscribe_contact"],
        Intent::Faq | Intent::Greeting | Intent::Thanks | Intent::Unknown => &[],
    };
    actions.iter().map(|a| a.to_string()).collect()
}

/// Canned reply sent when the backend cannot produce one.
pub fn fallback_text(intent: Intent) -> &'static str {
    match intent {
        Intent::Booking => {
            "Thanks for your booking request! A member of our team will confirm your appointment shortly."
        }
        Intent::Escalate => {
            "I'm sorry for the trouble. A member of our team will get back to you personally very soon."
        }
        Intent::LeadCapture => {
            "Thanks for your interest! A member of our team will contact you shortly with more details."
        }
        Intent::Support => {
            "Sorry about that. We have noted your request and a member of our team will follow up shortly."
        }
        Intent::OptOut => "Understood. You will no longer receive messages from us.",
        Intent::Greeting => "Hello! How can we help you today?",
        Intent::Thanks => "You're welcome! Let us know if there is anything else we can do.",
        Intent::Faq | Intent::Unknown => {
            "Thanks for your message! A member of our team will get back to you shortly."
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn action_table_matches_intents() {
        assert_eq!(suggested_actions(Intent::Booking), ["show_calendar", "create_booking"]);
        assert_eq!(suggested_actions(Intent::Escalate), ["notify_team", "create_ticket"]);
        assert_eq!(suggested_actions(Intent::OptOut), ["unsubscribe_contact"]);
        assert!(suggested_actions(Intent::Greeting).is_empty());
    }

    #[test]
    fn every_intent_has_instruction_and_fallback() {
        for intent in Intent::iter() {
            assert!(!instruction(intent).is_empty(), "{intent}");
            assert!(!fallback_text(intent).is_empty(), "{intent}");
        }
    }
}
