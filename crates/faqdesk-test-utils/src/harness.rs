// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full engine with a [`MockChannel`] and a
//! temp SQLite FAQ store, and offers helpers that drive one event at a time
//! through the [`EventRouter`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use faqdesk_agent::{AgentLoop, EscalationTracker, EventRouter, Outcome};
use faqdesk_config::model::{StorageConfig, TextsConfig};
use faqdesk_core::types::{InboundEvent, MessageContent};
use faqdesk_core::{ChannelAdapter, FaqEntry, FaqdeskError, MessageId, StorageAdapter, UserId};
use faqdesk_resolver::{DEFAULT_FUZZY_THRESHOLD, Matcher, Resolver};
use faqdesk_storage::SqliteStorage;

use crate::mock_channel::MockChannel;

/// Builder for [`TestHarness`].
pub struct TestHarnessBuilder {
    entries: Vec<FaqEntry>,
    threshold: f64,
    texts: TextsConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            threshold: DEFAULT_FUZZY_THRESHOLD,
            texts: TextsConfig::default(),
        }
    }

    /// Seed the FAQ store with one entry.
    pub fn with_faq(mut self, question: &str, answer: &str) -> Self {
        self.entries.push(FaqEntry::new(question, answer));
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_texts(mut self, texts: TextsConfig) -> Self {
        self.texts = texts;
        self
    }

    pub async fn build(self) -> Result<TestHarness, FaqdeskError> {
        let temp_dir =
            tempfile::TempDir::new().map_err(|e| FaqdeskError::Storage { source: e.into() })?;
        let db_path = temp_dir.path().join("test.db");

        let storage_config = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };
        let storage = SqliteStorage::new(storage_config);
        storage.initialize().await?;
        for entry in &self.entries {
            storage.upsert_entry(entry).await?;
        }
        let storage = Arc::new(storage);

        let channel = Arc::new(MockChannel::new());
        let tracker = Arc::new(EscalationTracker::new());
        let resolver = Resolver::new(storage.clone(), Matcher::new(self.threshold));
        let router = Arc::new(EventRouter::new(
            channel.clone(),
            resolver.clone(),
            tracker.clone(),
            self.texts.clone(),
        ));

        Ok(TestHarness {
            channel,
            storage,
            tracker,
            resolver,
            router,
            texts: self.texts,
            next_message_id: AtomicU64::new(1),
            _temp_dir: temp_dir,
        })
    }
}

/// A complete engine wired to mock transport and temp storage.
pub struct TestHarness {
    pub channel: Arc<MockChannel>,
    pub storage: Arc<SqliteStorage>,
    pub tracker: Arc<EscalationTracker>,
    pub resolver: Resolver,
    pub router: Arc<EventRouter>,
    pub texts: TextsConfig,
    next_message_id: AtomicU64,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Route one event.
    pub async fn handle(&self, event: InboundEvent) -> Result<Outcome, FaqdeskError> {
        self.router.handle(event).await
    }

    pub async fn start(&self, user: &UserId) -> Result<Outcome, FaqdeskError> {
        self.handle(InboundEvent::Start {
            user_id: user.clone(),
        })
        .await
    }

    /// Send a private text message with a fresh message id.
    pub async fn ask(&self, user: &UserId, text: &str) -> Result<Outcome, FaqdeskError> {
        self.send_content(user, MessageContent::Text(text.to_string()))
            .await
    }

    /// Send a private message of any content with a fresh message id.
    pub async fn send_content(
        &self,
        user: &UserId,
        content: MessageContent,
    ) -> Result<Outcome, FaqdeskError> {
        let id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        self.handle(InboundEvent::UserMessage {
            user_id: user.clone(),
            message_id: MessageId(id.to_string()),
            content,
        })
        .await
    }

    /// Press the operator button, with a callback handle like Telegram's.
    pub async fn press_button(&self, user: &UserId) -> Result<Outcome, FaqdeskError> {
        self.handle(InboundEvent::OperatorButtonPressed {
            user_id: user.clone(),
            callback_id: Some(format!("cb-{user}")),
        })
        .await
    }

    /// Reply in the operator chat to a relayed message.
    pub async fn operator_reply(
        &self,
        relayed: &MessageId,
        content: MessageContent,
    ) -> Result<Outcome, FaqdeskError> {
        self.handle(InboundEvent::AdminReply {
            reply_to: relayed.clone(),
            content,
        })
        .await
    }

    /// Id of the latest copy relayed for `user`.
    pub async fn last_relayed(&self, user: &UserId) -> Option<MessageId> {
        self.channel
            .forwards()
            .await
            .into_iter()
            .rev()
            .find(|f| &f.user_id == user)
            .map(|f| f.relayed_id)
    }

    /// An event loop over the harness channel sharing its tracker and store.
    pub fn agent_loop(&self) -> AgentLoop {
        let channel: Arc<dyn ChannelAdapter> = self.channel.clone();
        let router = EventRouter::new(
            channel.clone(),
            self.resolver.clone(),
            self.tracker.clone(),
            self.texts.clone(),
        );
        AgentLoop::new(channel, router)
    }
}
