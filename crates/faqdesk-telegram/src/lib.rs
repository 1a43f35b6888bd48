// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Telegram channel adapter for faqdesk.
//!
//! Implements [`ChannelAdapter`] for the Telegram Bot API via teloxide:
//! long polling for private messages, operator-chat replies and the
//! "call operator" button, plus text, photo and video delivery.

pub mod handler;

use async_trait::async_trait;
use dashmap::DashMap;
use faqdesk_config::model::TelegramConfig;
use faqdesk_core::error::FaqdeskError;
use faqdesk_core::traits::{ChannelAdapter, PluginAdapter};
use faqdesk_core::types::{
    AdapterType, ChannelCapabilities, HealthStatus, InboundEvent, MessageContent, MessageId,
    OutboundMessage, Recipient, UserId,
};
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// Telegram channel adapter implementing [`ChannelAdapter`].
pub struct TelegramChannel {
    bot: Bot,
    operator_chat: ChatId,
    button_label: String,
    /// Button presses awaiting an answer, keyed by the id handed to the engine.
    pending_callbacks: Arc<DashMap<String, CallbackQuery>>,
    inbound_rx: tokio::sync::Mutex<mpsc::Receiver<InboundEvent>>,
    inbound_tx: mpsc::Sender<InboundEvent>,
    polling_handle: Option<tokio::task::JoinHandle<()>>,
}

impl TelegramChannel {
    /// Creates a new Telegram channel adapter.
    ///
    /// Requires `config.bot_token` and `config.operator_chat_id` to be set.
    /// `button_label` is the text of the inline "call operator" button.
    pub fn new(config: TelegramConfig, button_label: impl Into<String>) -> Result<Self, FaqdeskError> {
        let token = config.bot_token.as_deref().ok_or_else(|| {
            FaqdeskError::Config("telegram.bot_token is required for Telegram adapter".into())
        })?;

        if token.is_empty() {
            return Err(FaqdeskError::Config(
                "telegram.bot_token cannot be empty".into(),
            ));
        }

        let operator_chat = config.operator_chat_id.map(ChatId).ok_or_else(|| {
            FaqdeskError::Config("telegram.operator_chat_id is required for Telegram adapter".into())
        })?;

        let bot = Bot::new(token);
        let (inbound_tx, inbound_rx) = mpsc::channel(100);

        Ok(Self {
            bot,
            operator_chat,
            button_label: button_label.into(),
            pending_callbacks: Arc::new(DashMap::new()),
            inbound_rx: tokio::sync::Mutex::new(inbound_rx),
            inbound_tx,
            polling_handle: None,
        })
    }

    /// Returns a reference to the underlying teloxide Bot.
    pub fn bot(&self) -> &Bot {
        &self.bot
    }

    fn chat_for(&self, recipient: &Recipient) -> Result<ChatId, FaqdeskError> {
        match recipient {
            Recipient::User(user_id) => parse_chat_id(user_id),
            Recipient::Operators => Ok(self.operator_chat),
        }
    }
}

#[async_trait]
impl PluginAdapter for TelegramChannel {
    fn name(&self) -> &str {
        "telegram"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    fn adapter_type(&self) -> AdapterType {
        AdapterType::Channel
    }

    async fn health_check(&self) -> Result<HealthStatus, FaqdeskError> {
        match self.bot.get_me().await {
            Ok(_) => Ok(HealthStatus::Healthy),
            Err(e) => Ok(HealthStatus::Unhealthy(format!(
                "Telegram bot unreachable: {e}"
            ))),
        }
    }

    async fn shutdown(&self) -> Result<(), FaqdeskError> {
        debug!("Telegram channel shutting down");
        if let Some(handle) = &self.polling_handle {
            handle.abort();
        }
        Ok(())
    }
}

#[async_trait]
impl ChannelAdapter for TelegramChannel {
    fn capabilities(&self) -> ChannelCapabilities {
        ChannelCapabilities {
            supports_video: true,
            supports_photos: true,
            supports_buttons: true,
            max_message_length: Some(4096),
        }
    }

    async fn connect(&mut self) -> Result<(), FaqdeskError> {
        if self.polling_handle.is_some() {
            return Ok(());
        }

        let bot = self.bot.clone();
        let operator_chat = self.operator_chat;
        let message_tx = self.inbound_tx.clone();
        let callback_tx = self.inbound_tx.clone();
        let pending = Arc::clone(&self.pending_callbacks);

        info!(operator_chat = operator_chat.0, "starting Telegram long polling");

        let handle = tokio::spawn(async move {
            let handler = dptree::entry()
                .branch(Update::filter_message().endpoint(move |msg: Message| {
                    let tx = message_tx.clone();
                    async move {
                        match handler::classify_message(&msg, operator_chat) {
                            Some(event) => {
                                if tx.send(event).await.is_err() {
                                    warn!("inbound channel closed, dropping message");
                                }
                            }
                            None => {
                                debug!(chat_id = msg.chat.id.0, msg_id = msg.id.0, "ignoring message");
                            }
                        }
                        respond(())
                    }
                }))
                .branch(Update::filter_callback_query().endpoint(move |query: CallbackQuery| {
                    let tx = callback_tx.clone();
                    let pending = Arc::clone(&pending);
                    async move {
                        let Some(user_id) = handler::operator_button_user(&query) else {
                            debug!(data = ?query.data, "ignoring unknown callback");
                            return respond(());
                        };
                        let callback_id = uuid::Uuid::new_v4().to_string();
                        pending.insert(callback_id.clone(), query);
                        let event = InboundEvent::OperatorButtonPressed {
                            user_id,
                            callback_id: Some(callback_id.clone()),
                        };
                        if tx.send(event).await.is_err() {
                            pending.remove(&callback_id);
                            warn!("inbound channel closed, dropping button press");
                        }
                        respond(())
                    }
                }));

            Dispatcher::builder(bot, handler)
                .default_handler(|_| async {})
                .build()
                .dispatch()
                .await;
        });

        self.polling_handle = Some(handle);
        Ok(())
    }

    async fn receive(&self) -> Result<InboundEvent, FaqdeskError> {
        let mut rx = self.inbound_rx.lock().await;
        rx.recv()
            .await
            .ok_or_else(|| FaqdeskError::channel("Telegram inbound channel closed"))
    }

    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, FaqdeskError> {
        let chat_id = self.chat_for(&msg.recipient)?;

        let sent = match msg.content {
            MessageContent::Text(text) => {
                let request = self.bot.send_message(chat_id, text);
                if msg.operator_button {
                    request
                        .reply_markup(handler::operator_keyboard(&self.button_label))
                        .await
                } else {
                    request.await
                }
            }
            MessageContent::Photo { file_id, caption } => {
                let request = self.bot.send_photo(chat_id, InputFile::file_id(FileId(file_id)));
                match caption {
                    Some(caption) => request.caption(caption).await,
                    None => request.await,
                }
            }
            MessageContent::Unsupported => {
                return Err(FaqdeskError::channel("cannot send unsupported content"));
            }
        }
        .map_err(|e| channel_err("failed to send message", e))?;

        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn send_video(
        &self,
        user_id: &UserId,
        url: &str,
        caption: &str,
    ) -> Result<MessageId, FaqdeskError> {
        let chat_id = parse_chat_id(user_id)?;
        let url = reqwest::Url::parse(url).map_err(|e| FaqdeskError::Channel {
            message: format!("invalid video url: {e}"),
            source: Some(Box::new(e)),
        })?;

        let sent = self
            .bot
            .send_video(chat_id, InputFile::url(url))
            .caption(caption)
            .await
            .map_err(|e| channel_err("failed to send video", e))?;

        Ok(MessageId(sent.id.0.to_string()))
    }

    async fn forward_to_operators(
        &self,
        user_id: &UserId,
        message_id: &MessageId,
    ) -> Result<MessageId, FaqdeskError> {
        let from_chat = parse_chat_id(user_id)?;
        let msg_id = message_id
            .0
            .parse::<i32>()
            .map(teloxide::types::MessageId)
            .map_err(|e| FaqdeskError::Channel {
                message: format!("invalid message_id: {e}"),
                source: None,
            })?;

        let forwarded = self
            .bot
            .forward_message(self.operator_chat, from_chat, msg_id)
            .await
            .map_err(|e| channel_err("failed to forward message", e))?;

        Ok(MessageId(forwarded.id.0.to_string()))
    }

    async fn acknowledge_button(&self, callback_id: &str, text: &str) -> Result<(), FaqdeskError> {
        let Some((_, query)) = self.pending_callbacks.remove(callback_id) else {
            debug!(callback_id, "button press already acknowledged");
            return Ok(());
        };

        self.bot
            .answer_callback_query(query.id)
            .text(text)
            .show_alert(true)
            .await
            .map_err(|e| channel_err("failed to answer callback query", e))?;
        Ok(())
    }
}

fn parse_chat_id(user_id: &UserId) -> Result<ChatId, FaqdeskError> {
    user_id
        .0
        .parse::<i64>()
        .map(ChatId)
        .map_err(|e| FaqdeskError::Channel {
            message: format!("invalid chat_id: {e}"),
            source: None,
        })
}

fn channel_err(context: &str, e: teloxide::RequestError) -> FaqdeskError {
    FaqdeskError::Channel {
        message: format!("{context}: {e}"),
        source: Some(Box::new(e)),
    }
}
