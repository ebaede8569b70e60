// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction of JSON objects from free-form completions.
//!
//! Backends wrap JSON in prose or markdown fences. The scanner tries each
//! `{` in turn and returns the span up to its matching `}`, ignoring braces
//! inside string literals. A stray brace in the surrounding prose only costs
//! one failed attempt.

use serde_json::{Map, Value};

use crate::error::ConciergeError;

/// Returns the first balanced `{...}` span in `text`, if any.
///
/// When a `{` never closes, scanning restarts at the next `{`.
pub fn first_json_object(text: &str) -> Option<&str> {
    object_spans(text).next()
}

/// Every balanced span, in order of its opening brace.
fn object_spans(text: &str) -> impl Iterator<Item = &str> {
    text.match_indices('{')
        .filter_map(move |(start, _)| balanced_from(text, start))
}

/// The balanced span opening at byte `start`, which must hold a `{`.
fn balanced_from(text: &str, start: usize) -> Option<&str> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..start + offset + 1]);
                }
            }
            _ => {}
        }
    }

    None
}

/// Parses the first balanced span that holds a JSON object.
///
/// Spans that are not valid JSON are skipped; the error reports the first one.
pub fn parse_json_object(text: &str) -> Result<Map<String, Value>, ConciergeError> {
    if text.trim().is_empty() {
        return Err(ConciergeError::malformed("empty completion"));
    }

    let mut first_error = None;
    for span in object_spans(text) {
        match serde_json::from_str::<Value>(span) {
            Ok(Value::Object(map)) => return Ok(map),
            Ok(_) => {}
            Err(e) => {
                first_error.get_or_insert_with(|| format!("invalid JSON: {e}"));
            }
        }
    }
    Err(ConciergeError::malformed(
        first_error.unwrap_or_else(|| "no JSON object in completion".to_string()),
    ))
}
