// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tagged stage results: a resolved value or a documented fallback.

use std::time::Duration;

use crate::error::ConciergeError;

/// Why a stage returned its fallback value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackCause {
    /// The backend could not be reached or refused the call.
    BackendUnavailable(String),
    /// The completion could not be parsed into the required shape.
    MalformedOutput(String),
    /// The backend call exceeded its deadline.
    Timeout(Duration),
}

impl From<&ConciergeError> for FallbackCause {
    fn from(err: &ConciergeError) -> Self {
        match err {
            ConciergeError::MalformedOutput { message } => Self::MalformedOutput(message.clone()),
            ConciergeError::Timeout { duration } => Self::Timeout(*duration),
            other => Self::BackendUnavailable(other.to_string()),
        }
    }
}

impl std::fmt::Display for FallbackCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BackendUnavailable(msg) => write!(f, "backend unavailable: {msg}"),
            Self::MalformedOutput(msg) => write!(f, "malformed output: {msg}"),
            Self::Timeout(d) => write!(f, "timed out after {d:?}"),
        }
    }
}

/// Result of a pipeline stage. Both arms carry a usable value.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Resolved(T),
    Fallback { value: T, cause: FallbackCause },
}

impl<T> Outcome<T> {
    pub fn fallback(value: T, cause: FallbackCause) -> Self {
        Self::Fallback { value, cause }
    }

    pub fn value(&self) -> &T {
        match self {
            Self::Resolved(value) | Self::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> T {
        match self {
            Self::Resolved(value) | Self::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Self::Fallback { .. })
    }

    pub fn cause(&self) -> Option<&FallbackCause> {
        match self {
            Self::Resolved(_) => None,
            Self::Fallback { cause, .. } => Some(cause),
        }
    }
}
