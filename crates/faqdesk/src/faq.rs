// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `faqdesk faq` command implementation.
//!
//! Administrative edits to the FAQ store. A running bot sees them on the
//! next message because every query reloads the index.

use clap::Subcommand;
use faqdesk_config::FaqdeskConfig;
use faqdesk_core::{FaqEntry, FaqSource, FaqdeskError, StorageAdapter};
use faqdesk_storage::SqliteStorage;

#[derive(Subcommand, Debug)]
pub enum FaqAction {
    /// Print every entry, oldest first.
    List,
    /// Add an entry, or replace the answer of an existing question.
    Add { question: String, answer: String },
    /// Delete the entry with exactly this question.
    Remove { question: String },
}

pub async fn run_faq(config: &FaqdeskConfig, action: FaqAction) -> Result<(), FaqdeskError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let output = apply(&storage, action).await;
    storage.close().await?;
    println!("{}", output?);
    Ok(())
}

async fn apply(storage: &SqliteStorage, action: FaqAction) -> Result<String, FaqdeskError> {
    match action {
        FaqAction::List => {
            let entries = storage.list_entries().await?;
            if entries.is_empty() {
                return Ok("no entries".to_string());
            }
            Ok(entries
                .iter()
                .map(|e| format!("{}\n    {}", e.question, e.answer))
                .collect::<Vec<_>>()
                .join("\n"))
        }
        FaqAction::Add { question, answer } => {
            if question.trim().is_empty() {
                return Err(FaqdeskError::Config("question must not be empty".into()));
            }
            storage
                .upsert_entry(&FaqEntry::new(question.as_str(), answer))
                .await?;
            Ok(format!("saved: {question}"))
        }
        FaqAction::Remove { question } => {
            if storage.delete_entry(&question).await? {
                Ok(format!("removed: {question}"))
            } else {
                Ok(format!("not found: {question}"))
            }
        }
    }
}
