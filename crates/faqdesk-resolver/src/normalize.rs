// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Text normalization for matching and display.

use std::sync::LazyLock;

use regex::Regex;

/// ASCII punctuation (including the symbols `$+<=>^`|~`) plus every
/// Unicode punctuation code point.
static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[[:punct:]\p{P}]").unwrap());

/// Search key for `text`: punctuation removed, lowercased, trimmed.
///
/// Used only for lookups; never shown to anyone.
pub fn search_key(text: &str) -> String {
    let stripped = PUNCTUATION.replace_all(text, "");
    stripped.to_lowercase().trim().to_string()
}

/// Display form of `text`: surrounding whitespace trimmed, nothing else.
pub fn display_text(text: &str) -> &str {
    text.trim()
}
