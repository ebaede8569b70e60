// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Concierge message-routing engine.

use thiserror::Error;

/// The primary error type used across the backend trait and engine internals.
///
/// Pipeline stages never return this to their callers: each stage converts it
/// into its documented fallback value (see [`crate::outcome::Outcome`]).
#[derive(Debug, Error)]
pub enum ConciergeError {
    /// Configuration errors (invalid values, missing credentials).
    #[error("configuration error: {0}")]
    Config(String),

    /// The language-model backend could not be reached or rejected the request.
    #[error("backend unavailable: {message}")]
    BackendUnavailable {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A completion was received but did not have the required shape.
    #[error("malformed backend output: {message}")]
    MalformedOutput { message: String },

    /// A backend call exceeded its deadline.
    #[error("backend call timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ConciergeError {
    /// Shorthand for a [`ConciergeError::BackendUnavailable`] without a source.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            message: message.into(),
            source: None,
        }
    }

    /// Shorthand for a [`ConciergeError::MalformedOutput`].
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedOutput {
            message: message.into(),
        }
    }
}
