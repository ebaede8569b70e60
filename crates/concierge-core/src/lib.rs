// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Concierge message-routing engine.
//!
//! This crate provides the backend trait, the error taxonomy, and the
//! request-scoped types that flow between the matcher, router, tier selector
//! and responder. Everything here is plain data or a pure helper; the only
//! async surface is [`ProviderAdapter`].

pub mod decision;
pub mod entities;
pub mod error;
pub mod intent;
pub mod json;
pub mod knowledge;
pub mod outcome;
pub mod prompt;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use decision::{FALLBACK_MODEL, ResponsePlan, RoutingDecision, TierContext};
pub use entities::ExtractedEntities;
pub use error::ConciergeError;
pub use intent::{FlowName, Intent, Tier};
pub use knowledge::{KnowledgeItem, KnowledgeRef, MatchResult, MatchStrategy};
pub use outcome::{FallbackCause, Outcome};
pub use types::{
    BusinessContext, HealthStatus, HistoryTurn, InboundMessage, ProviderMessage, ProviderRequest,
    ProviderResponse, Role, TokenUsage,
};

pub use traits::{DEFAULT_DEADLINE, PluginAdapter, ProviderAdapter, complete_within};
