// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory snapshot of the FAQ store.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use faqdesk_core::{FaqEntry, FaqSource};
use tracing::warn;

use crate::normalize::{display_text, search_key};

/// One loaded view of the FAQ store, valid for a single resolution.
///
/// Questions are kept in display form (trimmed). When two questions share
/// a display form or a search key, the one loaded first keeps it.
#[derive(Debug, Default, Clone)]
pub struct FaqIndex {
    answers: HashMap<String, String>,
    key_to_question: HashMap<String, String>,
    keys: Vec<String>,
}

impl FaqIndex {
    /// Build an index from entries in store order.
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = FaqEntry>,
    {
        let mut index = Self::default();
        for entry in entries {
            let question = display_text(&entry.question).to_string();
            match index.answers.entry(question.clone()) {
                Entry::Occupied(_) => continue,
                Entry::Vacant(slot) => {
                    slot.insert(entry.answer);
                }
            }

            let key = search_key(&question);
            if let Entry::Vacant(slot) = index.key_to_question.entry(key.clone()) {
                slot.insert(question);
                index.keys.push(key);
            }
        }
        index
    }

    /// Load a fresh snapshot from `source`.
    ///
    /// A failing source yields an empty index; resolution then reports no match.
    pub async fn load(source: &dyn FaqSource) -> Self {
        match source.list_entries().await {
            Ok(entries) => Self::from_entries(entries),
            Err(e) => {
                warn!(error = %e, "FAQ store unavailable, using empty index");
                Self::default()
            }
        }
    }

    /// Answer for a question in display form.
    pub fn answer_for(&self, question: &str) -> Option<&str> {
        self.answers.get(question).map(String::as_str)
    }

    /// Original (display form) question owning a search key.
    pub fn original_for(&self, key: &str) -> Option<&str> {
        self.key_to_question.get(key).map(String::as_str)
    }

    /// Search keys in first-insertion order.
    pub fn normalized_keys(&self) -> &[String] {
        &self.keys
    }

    /// The `(question, answer)` pair owning `key`.
    pub fn entry_for_key(&self, key: &str) -> Option<(&str, &str)> {
        let question = self.original_for(key)?;
        let answer = self.answer_for(question)?;
        Some((question, answer))
    }

    /// Number of distinct search keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
