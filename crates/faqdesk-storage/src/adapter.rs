// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of the StorageAdapter trait.

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use faqdesk_config::model::StorageConfig;
use faqdesk_core::{
    AdapterType, FaqEntry, FaqSource, FaqdeskError, HealthStatus, PluginAdapter, StorageAdapter,
};

use crate::database::{Database, storage_err};
use crate::queries;

/// SQLite-backed FAQ store.
///
/// Wraps a [`Database`] handle and delegates to [`queries::faq`]. The
/// database is lazily opened on the first call to
/// [`StorageAdapter::initialize`]; reads before that fail with
/// [`FaqdeskError::Storage`].
pub struct SqliteStorage {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStorage {
    /// Create a new SqliteStorage with the given configuration.
    ///
    /// The database connection is not opened until [`initialize`](StorageAdapter::initialize) is called.
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Returns a reference to the underlying Database, or an error if not initialized.
    fn db(&self) -> Result<&Database, FaqdeskError> {
        self.db.get().ok_or_else(|| FaqdeskError::Storage {
            source: "storage not initialized -- call initialize() first".into(),
        })
    }

    /// Number of stored entries.
    pub async fn count_entries(&self) -> Result<i64, FaqdeskError> {
        queries::faq::count_entries(self.db()?).await
    }
}

#[async_trait]
impl PluginAdapter for SqliteStorage {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Storage
    }

    async fn health_check(&self) -> Result<HealthStatus, FaqdeskError> {
        let db = self.db()?;
        db.connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("SELECT 1;")?;
                Ok(())
            })
            .await
            .map_err(storage_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FaqdeskError> {
        if let Some(db) = self.db.get() {
            db.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl FaqSource for SqliteStorage {
    async fn list_entries(&self) -> Result<Vec<FaqEntry>, FaqdeskError> {
        queries::faq::list_entries(self.db()?).await
    }
}

#[async_trait]
impl StorageAdapter for SqliteStorage {
    async fn initialize(&self) -> Result<(), FaqdeskError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db.set(db).map_err(|_| FaqdeskError::Storage {
            source: "storage already initialized".into(),
        })?;
        debug!(path = %self.config.database_path, "SQLite storage initialized");
        Ok(())
    }

    async fn close(&self) -> Result<(), FaqdeskError> {
        self.db()?.checkpoint().await?;
        debug!("WAL checkpoint complete");
        Ok(())
    }

    async fn upsert_entry(&self, entry: &FaqEntry) -> Result<(), FaqdeskError> {
        queries::faq::upsert_entry(self.db()?, entry).await
    }

    async fn delete_entry(&self, question: &str) -> Result<bool, FaqdeskError> {
        queries::faq::delete_entry(self.db()?, question).await
    }
}
