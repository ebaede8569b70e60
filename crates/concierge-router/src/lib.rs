// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Intent routing and cost-tier selection for the Concierge engine.
//!
//! This crate provides:
//! - [`IntentRouter`]: one strict-JSON backend call that classifies intent and
//!   extracts entities, with a total fallback
//! - [`SignalHeuristics`]: zero-cost sentiment and complexity scoring
//! - [`select_tier`]: rule-ordered mapping from a [`TierContext`](concierge_core::TierContext)
//!   to a tier, and [`TierTable`] to resolve that tier to a model

pub mod intent;
pub mod signals;
pub mod tier;

pub use intent::{IntentRouter, parse_decision};
pub use signals::{SignalHeuristics, Signals};
pub use tier::{TierTable, select_tier, select_tier_with_reason};
