// SPDX-FileCopyrightText: 2026 Concierge Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text normalization shared by every matching stage.

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Lowercases, strips diacritics, drops punctuation, and collapses
/// whitespace. Only whitespace separates tokens.
///
/// `"Café ?"` and `"cafe"` both normalize to `"cafe"`; `"e-mail"` becomes `"email"`.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Whitespace tokens of an already normalized string.
pub fn tokens(normalized: &str) -> impl Iterator<Item = &str> {
    normalized.split(' ').filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn strips_case_diacritics_and_punctuation() {
        assert_eq!(normalize("Café?"), "cafe");
        assert_eq!(normalize("cafe"), "cafe");
        assert_eq!(normalize("  Où   est-ce ?! "), "ou estce");
        assert_eq!(normalize("Quels sont vos horaires d'ouverture ?"), "quels sont vos horaires douverture");
    }

    #[test]
    fn punctuation_inside_words_is_dropped() {
        assert_eq!(normalize("e-mail?"), normalize("email"));
        assert_eq!(normalize("Check-in, please"), "checkin please");
        assert_eq!(normalize("tab\tand\nnewline"), "tab and newline");
    }

    #[test]
    fn punctuation_only_is_empty() {
        assert_eq!(normalize("?!... --"), "");
        assert_eq!(normalize(""), "");
    }

    #[test]
    fn precomposed_and_decomposed_forms_agree() {
        assert_eq!(normalize("Cre\u{0300}me bru\u{0302}le\u{0301}e"), normalize("Crème brûlée"));
    }

    #[test]
    fn tokens_skip_empties() {
        assert_eq!(tokens("a b  c").collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(tokens("").count(), 0);
    }

    proptest! {
        #[test]
        fn normalization_is_idempotent(text in "[a-zA-Z0-9À-ÿ ?!',.\\-]{0,80}") {
            let once = normalize(&text);
            prop_assert_eq!(normalize(&once), once.clone());
            prop_assert!(!once.starts_with(' ') && !once.ends_with(' '));
            prop_assert!(!once.contains("  "));
        }
    }
}
