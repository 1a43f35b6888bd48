// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock channel adapter for deterministic testing.
//!
//! `MockChannel` implements `ChannelAdapter` with injectable inbound events
//! and captures every outbound call for assertion in tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use faqdesk_core::FaqdeskError;
use faqdesk_core::traits::adapter::PluginAdapter;
use faqdesk_core::traits::channel::ChannelAdapter;
use faqdesk_core::types::{
    AdapterType, ChannelCapabilities, HealthStatus, InboundEvent, MessageContent, MessageId,
    OutboundMessage, Recipient, UserId,
};

/// A video delivered through `send_video()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentVideo {
    pub user_id: UserId,
    pub url: String,
    pub caption: String,
}

/// A message relayed through `forward_to_operators()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forwarded {
    pub user_id: UserId,
    pub message_id: MessageId,
    /// Id of the relayed copy in the operator chat.
    pub relayed_id: MessageId,
}

/// A mock messaging channel for testing.
///
/// Provides two sides:
/// - **inbound**: events injected via `inject_event()` are returned by `receive()`
/// - **outbound**: sends, videos, forwards and button acknowledgements are recorded
///
/// Every outbound call gets a fresh numeric message id.
pub struct MockChannel {
    inbound: Arc<Mutex<VecDeque<InboundEvent>>>,
    notify: Arc<Notify>,
    closed: AtomicBool,
    next_id: AtomicU64,
    sent: Mutex<Vec<OutboundMessage>>,
    videos: Mutex<Vec<SentVideo>>,
    forwards: Mutex<Vec<Forwarded>>,
    acknowledgements: Mutex<Vec<(String, String)>>,
    fail_video: AtomicBool,
    fail_forward: AtomicBool,
}

impl MockChannel {
    /// Create a new mock channel with empty queues.
    pub fn new() -> Self {
        Self {
            inbound: Arc::new(Mutex::new(VecDeque::new())),
            notify: Arc::new(Notify::new()),
            closed: AtomicBool::new(false),
            next_id: AtomicU64::new(1000),
            sent: Mutex::new(Vec::new()),
            videos: Mutex::new(Vec::new()),
            forwards: Mutex::new(Vec::new()),
            acknowledgements: Mutex::new(Vec::new()),
            fail_video: AtomicBool::new(false),
            fail_forward: AtomicBool::new(false),
        }
    }

    /// Inject an inbound event into the receive queue.
    pub async fn inject_event(&self, event: InboundEvent) {
        self.inbound.lock().await.push_back(event);
        self.notify.notify_one();
    }

    /// Once the queue drains, `receive()` reports the channel as closed.
    pub fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
        self.notify.notify_one();
    }

    /// Make `send_video()` fail, as when the URL cannot be fetched.
    pub fn set_fail_video(&self, fail: bool) {
        self.fail_video.store(fail, Ordering::SeqCst);
    }

    /// Make `forward_to_operators()` fail.
    pub fn set_fail_forward(&self, fail: bool) {
        self.fail_forward.store(fail, Ordering::SeqCst);
    }

    /// Get all messages that were sent through `send()`.
    pub async fn sent_messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().await.clone()
    }

    /// Get the count of sent messages.
    pub async fn sent_count(&self) -> usize {
        self.sent.lock().await.len()
    }

    /// Messages sent to one user, in order.
    pub async fn sent_to(&self, user_id: &UserId) -> Vec<OutboundMessage> {
        let wanted = Recipient::User(user_id.clone());
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.recipient == wanted)
            .cloned()
            .collect()
    }

    /// Text bodies sent to one user, in order.
    pub async fn texts_to(&self, user_id: &UserId) -> Vec<String> {
        self.sent_to(user_id)
            .await
            .into_iter()
            .filter_map(|m| m.content.as_text().map(str::to_string))
            .collect()
    }

    /// Text bodies posted to the operator chat, in order.
    pub async fn operator_texts(&self) -> Vec<String> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|m| m.recipient == Recipient::Operators)
            .filter_map(|m| m.content.as_text().map(str::to_string))
            .collect()
    }

    pub async fn videos(&self) -> Vec<SentVideo> {
        self.videos.lock().await.clone()
    }

    pub async fn forwards(&self) -> Vec<Forwarded> {
        self.forwards.lock().await.clone()
    }

    /// `(callback_id, text)` pairs passed to `acknowledge_button()`.
    pub async fn acknowledgements(&self) -> Vec<(String, String)> {
        self.acknowledgements.lock().await.clone()
    }

    /// Clear all recorded outbound calls.
    pub async fn clear_sent(&self) {
        self.sent.lock().await.clear();
        self.videos.lock().await.clear();
        self.forwards.lock().await.clear();
        self.acknowledgements.lock().await.clear();
    }

    fn next_message_id(&self) -> MessageId {
        MessageId(self.next_id.fetch_add(1, Ordering::SeqCst).to_string())
    }
}

impl Default for MockChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockChannel {
    fn name(&self) -> &str {
        "mock-channel"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, FaqdeskError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), FaqdeskError> {
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for MockChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            supports_video: true,
            supports_photos: true,
            supports_buttons: true,
            max_message_length: None,
        }
    }

    async fn connect(&mut self) -> Result<(), FaqdeskError> {
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, FaqdeskError> {
        loop {
            {
                let mut queue = self.inbound.lock().await;
                if let Some(event) = queue.pop_front() {
                    return Ok(event);
                }
                if self.closed.load(Ordering::SeqCst) {
                    return Err(FaqdeskError::channel("mock inbound channel closed"));
                }
            }
            self.notify.notified().await;
        }
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, FaqdeskError> {
        if msg.content == MessageContent::Unsupported {
            return Err(FaqdeskError::channel("cannot send unsupported content"));
        }
        let id = self.next_message_id();
        self.sent.lock().await.push(msg);
        Ok(id)
    }

    async fn send_video(
        &self,
        user_id: &UserId,
        url: &str,
        caption: &str,
    ) -> Result<MessageId, FaqdeskError> {
        if self.fail_video.load(Ordering::SeqCst) {
            return Err(FaqdeskError::channel("failed to send video: wrong file identifier"));
        }
        self.videos.lock().await.push(SentVideo {
            user_id: user_id.clone(),
            url: url.to_string(),
            caption: caption.to_string(),
        });
        Ok(self.next_message_id())
    }

    async fn forward_to_operators(
        &self,
        user_id: &UserId,
        message_id: &MessageId,
    ) -> Result<MessageId, FaqdeskError> {
        if self.fail_forward.load(Ordering::SeqCst) {
            return Err(FaqdeskError::channel("failed to forward message"));
        }
        let relayed_id = self.next_message_id();
        self.forwards.lock().await.push(Forwarded {
            user_id: user_id.clone(),
            message_id: message_id.clone(),
            relayed_id: relayed_id.clone(),
        });
        Ok(relayed_id)
    }

    async fn acknowledge_button(&self, callback_id: &str, text: &str) -> Result<(), FaqdeskError> {
        self.acknowledgements
            .lock()
            .await
            .push((callback_id.to_string(), text.to_string()));
        Ok(())
    }
}
