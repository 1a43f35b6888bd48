// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Database connection management with PRAGMA setup, WAL mode, and lifecycle.
//!
//! All writes are serialized through tokio-rusqlite's single background thread.
//! Do NOT create additional Connection instances for writes.

use std::path::Path;

use faqdesk_core::FaqdeskError;
use tracing::debug;

use crate::migrations;

/// Handle to the FAQ database.
///
/// Wraps one `tokio_rusqlite::Connection`; query modules take `&Database`
/// and go through [`Database::connection`].
pub struct Database {
    conn: tokio_rusqlite::Connection,
}

impl Database {
    /// Open (creating if needed) the database at `path`, apply PRAGMAs,
    /// and run pending migrations.
    pub async fn open(path: &str, wal_mode: bool) -> Result<Self, FaqdeskError> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| FaqdeskError::Storage {
                    source: Box::new(e),
                })?;
            }
        }

        let conn = tokio_rusqlite::Connection::open(path)
            .await
            .map_err(storage_err)?;
        let db = Self { conn };
        db.prepare(wal_mode).await?;
        debug!(path, wal_mode, "database opened");
        Ok(db)
    }

    /// Open a private in-memory database with the schema applied.
    pub async fn open_in_memory() -> Result<Self, FaqdeskError> {
        let conn = tokio_rusqlite::Connection::open_in_memory()
            .await
            .map_err(storage_err)?;
        let db = Self { conn };
        db.prepare(false).await?;
        Ok(db)
    }

    async fn prepare(&self, wal_mode: bool) -> Result<(), FaqdeskError> {
        self.conn
            .call(move |conn| -> Result<(), FaqdeskError> {
                let journal = if wal_mode { "WAL" } else { "DELETE" };
                conn.execute_batch(&format!(
                    "PRAGMA journal_mode = {journal};
                     PRAGMA busy_timeout = 5000;
                     PRAGMA foreign_keys = ON;"
                ))
                .map_err(|e| FaqdeskError::Storage {
                    source: Box::new(e),
                })?;
                migrations::run_migrations(conn)
            })
            .await
            .map_err(storage_err)
    }

    /// The single connection every query goes through.
    pub fn connection(&self) -> &tokio_rusqlite::Connection {
        &self.conn
    }

    /// Checkpoint the WAL so the main database file is self-contained.
    pub async fn checkpoint(&self) -> Result<(), FaqdeskError> {
        self.conn
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
                Ok(())
            })
            .await
            .map_err(storage_err)
    }
}

/// Wraps any tokio-rusqlite or rusqlite failure as [`FaqdeskError::Storage`].
pub fn storage_err<E>(e: E) -> FaqdeskError
where
    E: std::error::Error + Send + Sync + 'static,
{
    FaqdeskError::Storage {
        source: Box::new(e),
    }
}
