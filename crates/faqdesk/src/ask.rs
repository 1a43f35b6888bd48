// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `faqdesk ask` command implementation.

use std::sync::Arc;

use faqdesk_config::FaqdeskConfig;
use faqdesk_core::{FaqdeskError, StorageAdapter};
use faqdesk_resolver::{Matcher, Resolution, Resolver, video_url};
use faqdesk_storage::SqliteStorage;

/// Resolves `query` against the configured store and prints the result.
pub async fn run_ask(config: &FaqdeskConfig, query: &str) -> Result<(), FaqdeskError> {
    let storage = SqliteStorage::new(config.storage.clone());
    storage.initialize().await?;
    let storage = Arc::new(storage);

    let resolver = Resolver::new(storage.clone(), Matcher::new(config.matcher.fuzzy_threshold));
    let resolution = resolver.resolve(query).await;
    println!("{}", format_resolution(resolution.as_ref()));

    storage.close().await
}

pub(crate) fn format_resolution(resolution: Option<&Resolution>) -> String {
    let Some(r) = resolution else {
        return "no match".to_string();
    };
    let kind = if video_url(&r.answer).is_some() {
        " (video)"
    } else {
        ""
    };
    format!(
        "question: {}\nstage:    {}\nscore:    {:.1}\nanswer{kind}:   {}",
        r.question, r.stage, r.score, r.answer
    )
}
