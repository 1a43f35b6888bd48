// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! FAQ entry CRUD operations.

use faqdesk_core::{FaqEntry, FaqdeskError};
use rusqlite::params;

use crate::database::{Database, storage_err};

/// List every entry in insertion (row id) order.
pub async fn list_entries(db: &Database) -> Result<Vec<FaqEntry>, FaqdeskError> {
    db.connection()
        .call(|conn| -> Result<Vec<FaqEntry>, rusqlite::Error> {
            let mut stmt = conn.prepare("SELECT question, answer FROM faq ORDER BY id")?;
            let rows = stmt.query_map([], |row| {
                Ok(FaqEntry {
                    question: row.get(0)?,
                    answer: row.get(1)?,
                })
            })?;
            let entries = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(entries)
        })
        .await
        .map_err(storage_err)
}

/// Insert an entry, or replace the answer if the question already exists.
///
/// Replacing keeps the original row id, so the entry's position is stable.
pub async fn upsert_entry(db: &Database, entry: &FaqEntry) -> Result<(), FaqdeskError> {
    let entry = entry.clone();
    db.connection()
        .call(move |conn| -> Result<(), rusqlite::Error> {
            conn.execute(
                "INSERT INTO faq (question, answer) VALUES (?1, ?2)
                 ON CONFLICT(question) DO UPDATE SET answer = excluded.answer",
                params![entry.question, entry.answer],
            )?;
            Ok(())
        })
        .await
        .map_err(storage_err)
}

/// Delete the entry with exactly this question. Returns whether a row was removed.
pub async fn delete_entry(db: &Database, question: &str) -> Result<bool, FaqdeskError> {
    let question = question.to_string();
    db.connection()
        .call(move |conn| -> Result<bool, rusqlite::Error> {
            let removed = conn.execute("DELETE FROM faq WHERE question = ?1", params![question])?;
            Ok(removed > 0)
        })
        .await
        .map_err(storage_err)
}

/// Number of stored entries.
pub async fn count_entries(db: &Database) -> Result<i64, FaqdeskError> {
    db.connection()
        .call(|conn| -> Result<i64, rusqlite::Error> {
            conn.query_row("SELECT COUNT(*) FROM faq", [], |row| row.get(0))
        })
        .await
        .map_err(storage_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let db = Database::open_in_memory().await.unwrap();
        assert!(list_entries(&db).await.unwrap().is_empty());
        assert_eq!(count_entries(&db).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn entries_come_back_in_insertion_order() {
        let db = Database::open_in_memory().await.unwrap();
        for q in ["zeta", "alpha", "mid"] {
            upsert_entry(&db, &FaqEntry::new(q, format!("answer {q}")))
                .await
                .unwrap();
        }
        let questions: Vec<String> = list_entries(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.question)
            .collect();
        assert_eq!(questions, vec!["zeta", "alpha", "mid"]);
    }

    #[tokio::test]
    async fn upsert_replaces_answer_in_place() {
        let db = Database::open_in_memory().await.unwrap();
        upsert_entry(&db, &FaqEntry::new("first", "1")).await.unwrap();
        upsert_entry(&db, &FaqEntry::new("second", "2")).await.unwrap();
        upsert_entry(&db, &FaqEntry::new("first", "one")).await.unwrap();

        let entries = list_entries(&db).await.unwrap();
        assert_eq!(
            entries,
            vec![FaqEntry::new("first", "one"), FaqEntry::new("second", "2")]
        );
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let db = Database::open_in_memory().await.unwrap();
        upsert_entry(&db, &FaqEntry::new("q", "a")).await.unwrap();

        assert!(delete_entry(&db, "q").await.unwrap());
        assert!(!delete_entry(&db, "q").await.unwrap());
        assert_eq!(count_entries(&db).await.unwrap(), 0);
    }
}
