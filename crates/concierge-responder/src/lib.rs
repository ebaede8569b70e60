// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Outbound reply generation for the Concierge engine.
//!
//! The [`Responder`] makes the second backend call of a message: it turns a
//! [`RoutingDecision`](concierge_core::RoutingDecision) and the selected tier
//! into a [`ResponsePlan`](concierge_core::ResponsePlan). Failures never reach
//! the caller; they become a canned, escalated reply.

pub mod clean;
pub mod responder;
pub mod tables;

pub use clean::clean_reply;
pub use responder::{Responder, fallback_plan};
pub use tables::suggested_actions;
