// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Extraction of identifier-like codes (e.g. `APK36651065`) from free text.

use std::sync::LazyLock;

use regex::Regex;

static WORD_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());
static DECIMAL_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\d").unwrap());

/// Maximal word-character runs containing at least one letter and one digit,
/// in order of appearance.
pub fn extract_codes(text: &str) -> Vec<&str> {
    WORD_RUN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|token| is_code(token))
        .collect()
}

fn is_code(token: &str) -> bool {
    token.chars().any(char::is_alphabetic) && DECIMAL_DIGIT.is_match(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_embedded_code() {
        assert_eq!(extract_codes("see APK36651065 now"), vec!["APK36651065"]);
    }

    #[test]
    fn no_codes_in_plain_text() {
        assert!(extract_codes("no codes here").is_empty());
        assert!(extract_codes("call 88005553535").is_empty());
        assert!(extract_codes("").is_empty());
    }

    #[test]
    fn multiple_codes_in_order() {
        assert_eq!(extract_codes("A1 and B2"), vec!["A1", "B2"]);
    }

    #[test]
    fn runs_are_maximal() {
        assert_eq!(extract_codes("ERR_42-x9"), vec!["ERR_42", "x9"]);
        assert_eq!(extract_codes("Ошибка КОД123."), vec!["КОД123"]);
    }

    #[test]
    fn number_forms_are_not_digits() {
        assert!(extract_codes("глава Ⅻ").is_empty());
        assert!(extract_codes("x² and ½a").is_empty());
        assert_eq!(extract_codes("код A٣"), vec!["A٣"]);
    }
}
