// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory [`FaqSource`] for resolver tests.

use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use faqdesk_core::{FaqEntry, FaqSource, FaqdeskError};

/// A FAQ source backed by a vector.
///
/// Counts how often it was listed, which shows whether callers reload.
#[derive(Debug, Default)]
pub struct StaticFaqSource {
    entries: RwLock<Vec<FaqEntry>>,
    failing: AtomicBool,
    loads: AtomicUsize,
}

impl StaticFaqSource {
    pub fn new<Q, A>(entries: impl IntoIterator<Item = (Q, A)>) -> Self
    where
        Q: Into<String>,
        A: Into<String>,
    {
        Self {
            entries: RwLock::new(
                entries
                    .into_iter()
                    .map(|(q, a)| FaqEntry::new(q, a))
                    .collect(),
            ),
            ..Self::default()
        }
    }

    /// Append an entry, visible on the next listing.
    pub fn push(&self, question: &str, answer: &str) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(FaqEntry::new(question, answer));
    }

    /// Make listings fail like an unreachable store.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FaqSource for StaticFaqSource {
    async fn list_entries(&self) -> Result<Vec<FaqEntry>, FaqdeskError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(FaqdeskError::Storage {
                source: Box::new(std::io::Error::other("database is locked")),
            });
        }
        Ok(self
            .entries
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }
}
