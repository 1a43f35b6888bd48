// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Storage traits for the FAQ data source.

use async_trait::async_trait;

use crate::error::FaqdeskError;
use crate::traits::adapter::PluginAdapter;
use crate::types::FaqEntry;

/// Read-only view of the FAQ table.
///
/// This is the only storage surface the resolution engine depends on.
/// An empty or freshly created store returns an empty list, not an error.
#[async_trait]
pub trait FaqSource: Send + Sync {
    /// Returns every entry in a stable order (oldest first).
    async fn list_entries(&self) -> Result<Vec<FaqEntry>, FaqdeskError>;
}

/// Adapter for the persistent FAQ store.
///
/// Adds lifecycle and the administrative write operations used by the CLI.
#[async_trait]
pub trait StorageAdapter: PluginAdapter + FaqSource {
    /// Initializes the storage backend (migrations, connection, etc.).
    async fn initialize(&self) -> Result<(), FaqdeskError>;

    /// Closes the storage backend, flushing pending writes.
    async fn close(&self) -> Result<(), FaqdeskError>;

    /// Inserts an entry, replacing the answer if the question already exists.
    async fn upsert_entry(&self, entry: &FaqEntry) -> Result<(), FaqdeskError>;

    /// Deletes the entry with this exact question. Returns whether a row was removed.
    async fn delete_entry(&self, question: &str) -> Result<bool, FaqdeskError>;
}
