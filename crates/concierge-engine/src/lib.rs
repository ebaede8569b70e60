// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine for Concierge.
//!
//! [`ConversationEngine`] turns one inbound customer message into an intent,
//! a cost tier, an optional FAQ match, and an outbound reply. It performs at
//! most three backend calls per message and never fails: each stage degrades
//! to a documented fallback, recorded in [`ProcessedMessage::fallbacks`].

pub mod engine;
pub mod telemetry;

pub use engine::{ConversationEngine, ProcessedMessage, Stage, StageFallback};
pub use telemetry::init_tracing;
