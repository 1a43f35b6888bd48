// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types used across adapter traits and the faqdesk engine.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Identifier of an end user (for Telegram, the private chat id).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier of a message as assigned by the transport.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Health status reported by adapter health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    /// Adapter is fully operational.
    Healthy,
    /// Adapter is operational but experiencing issues.
    Degraded(String),
    /// Adapter is not operational.
    Unhealthy(String),
}

/// Identifies the kind of adapter.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum AdapterType {
    Channel,
    Storage,
    Observability,
}

/// A pre-authored question with its answer, as held by the FAQ store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
        }
    }
}

/// Payload of a chat message, inbound or outbound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageContent {
    /// Plain text.
    Text(String),
    /// A photo referenced by its transport file id.
    Photo {
        file_id: String,
        caption: Option<String>,
    },
    /// Anything the engine cannot present (stickers, voice, documents...).
    /// Still relayable to operators by message id.
    Unsupported,
}

impl MessageContent {
    /// Returns the text body, if this is a text message.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(t) => Some(t),
            _ => None,
        }
    }
}

/// An event delivered by the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    /// The user opened the bot (`/start`).
    Start { user_id: UserId },
    /// A private message from an end user.
    UserMessage {
        user_id: UserId,
        message_id: MessageId,
        content: MessageContent,
    },
    /// The user pressed the "call operator" button.
    OperatorButtonPressed {
        user_id: UserId,
        /// Transport handle used to acknowledge the press, if any.
        callback_id: Option<String>,
    },
    /// An operator replied (in the operator chat) to a relayed message.
    AdminReply {
        reply_to: MessageId,
        content: MessageContent,
    },
}

impl InboundEvent {
    /// Short label used in logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::Start { .. } => "start",
            InboundEvent::UserMessage { .. } => "user_message",
            InboundEvent::OperatorButtonPressed { .. } => "operator_button",
            InboundEvent::AdminReply { .. } => "admin_reply",
        }
    }
}

/// Where an outbound message goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recipient {
    /// A single end user.
    User(UserId),
    /// The shared operator chat.
    Operators,
}

/// A message to be delivered through a channel adapter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub recipient: Recipient,
    pub content: MessageContent,
    /// Attach the inline "call operator" button.
    pub operator_button: bool,
}

impl OutboundMessage {
    /// Plain text message without buttons.
    pub fn text(recipient: Recipient, text: impl Into<String>) -> Self {
        Self {
            recipient,
            content: MessageContent::Text(text.into()),
            operator_button: false,
        }
    }

    /// Attach the "call operator" button.
    pub fn with_operator_button(mut self) -> Self {
        self.operator_button = true;
        self
    }
}

/// Capabilities reported by a channel adapter.
#[derive(Debug, Clone)]
pub struct ChannelCapabilities {
    pub supports_video: bool,
    pub supports_photos: bool,
    pub supports_buttons: bool,
    pub max_message_length: Option<usize>,
}
