// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Helpers for embedding untrusted text in prompts.

/// Truncates to at most `max_chars` characters (not bytes).
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Makes customer text safe to quote inside a prompt.
///
/// The raw text is truncated first so an escape sequence is never cut in
/// half. Backslashes and double quotes are escaped, line breaks become
/// spaces, and the result is trimmed.
pub fn sanitize_for_prompt(text: &str, max_chars: usize) -> String {
    let truncated = truncate_chars(text, max_chars);
    let mut out = String::with_capacity(truncated.len() + 8);
    for c in truncated.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\r' | '\n' => out.push(' '),
            other => out.push(other),
        }
    }
    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(
            sanitize_for_prompt(r#"say "hi" \ bye"#, 500),
            r#"say \"hi\" \\ bye"#
        );
    }

    #[test]
    fn newlines_become_spaces() {
        assert_eq!(
            sanitize_for_prompt("line one\nline two\r\nthree\n", 500),
            "line one line two  three"
        );
    }

    #[test]
    fn truncates_by_characters() {
        assert_eq!(truncate_chars("héllo wörld", 5), "héllo");
        assert_eq!(truncate_chars("short", 50), "short");
        assert_eq!(sanitize_for_prompt(&"a".repeat(800), 500).len(), 500);
    }

    #[test]
    fn truncation_never_splits_an_escape() {
        let text = format!("{}\"tail", "x".repeat(9));
        assert_eq!(sanitize_for_prompt(&text, 10), format!("{}\\\"", "x".repeat(9)));
    }

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn sanitized_text_is_single_line_and_bounded(text in "[a-z \"\\\\\r\n]{0,80}", max in 0usize..64) {
                let out = sanitize_for_prompt(&text, max);
                prop_assert!(!out.contains('\n') && !out.contains('\r'));
                prop_assert!(out.chars().count() <= max * 2);
            }
        }
    }
}
