// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Channel adapter trait for messaging transports (Telegram, etc.).

use async_trait::async_trait;

use crate::error::FaqdeskError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ChannelCapabilities, InboundEvent, MessageId, OutboundMessage, UserId};

/// Adapter for a bidirectional messaging transport.
///
/// A channel delivers end-user and operator events to the engine and
/// carries the engine's replies back. Every send is a fallible call with
/// no partial effect: it either returned the new message id or failed.
#[async_trait]
pub trait ChannelAdapter: PluginAdapter {
    /// Returns the capabilities supported by this channel.
    fn capabilities(&self) -> ChannelCapabilities;

    /// Establishes a connection to the messaging platform.
    async fn connect(&mut self) -> Result<(), FaqdeskError>;

    /// Receives the next inbound event.
    async fn receive(&self) -> Result<InboundEvent, FaqdeskError>;

    /// Sends a text or photo message.
    async fn send(&self, msg: OutboundMessage) -> Result<MessageId, FaqdeskError>;

    /// Sends a video by URL to a user.
    async fn send_video(
        &self,
        user_id: &UserId,
        url: &str,
        caption: &str,
    ) -> Result<MessageId, FaqdeskError>;

    /// Relays a user's message into the operator chat.
    ///
    /// Returns the id of the relayed copy, which operators reply to.
    async fn forward_to_operators(
        &self,
        user_id: &UserId,
        message_id: &MessageId,
    ) -> Result<MessageId, FaqdeskError>;

    /// Acknowledges a button press with a short alert.
    async fn acknowledge_button(&self, _callback_id: &str, _text: &str) -> Result<(), FaqdeskError> {
        Ok(())
    }
}
