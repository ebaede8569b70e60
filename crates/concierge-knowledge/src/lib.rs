// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! FAQ matching for Concierge.
//!
//! A query is compared against an ordered knowledge base in three stages of
//! increasing cost: normalized exact and containment checks, keyword overlap,
//! and, when the keyword stage is inconclusive and the base is small, a
//! semantic check delegated to the language-model backend.

pub mod matcher;
pub mod normalize;
pub mod scoring;

pub use matcher::KnowledgeMatcher;
pub use normalize::normalize;
