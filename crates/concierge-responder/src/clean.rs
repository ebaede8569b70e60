// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-processing of generated replies.

use std::sync::LazyLock;

use regex::Regex;

/// A reply wrapped in one pair of quote characters.
static WRAPPING_QUOTES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)^["'“”«»]\s*(.*?)\s*["'“”«»]$"#).unwrap());

/// Three or more line breaks, possibly with blank-ish lines between them.
static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*(?:\r?\n[ \t]*){2,}").unwrap());

/// Trims the reply, strips one pair of wrapping quotes, and collapses runs of
/// three or more newlines to two.
pub fn clean_reply(raw: &str) -> String {
    let text = raw.trim().replace("\r\n", "\n");
    let text = match WRAPPING_QUOTES.captures(&text) {
        Some(caps) => caps.get(1).map_or("", |m| m.as_str()).to_string(),
        None => text,
    };
    EXCESS_NEWLINES.replace_all(&text, "\n\n").trim().to_string()
}
