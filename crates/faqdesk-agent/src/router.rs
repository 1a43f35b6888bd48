// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-event routing between the FAQ flow and the operator handoff flow.
//!
//! Tracker state is only changed after the corresponding channel call
//! succeeded: a follow-up is relayed before it is recorded, and an operator
//! reply is delivered before its session is closed.

use std::sync::Arc;

use faqdesk_config::model::TextsConfig;
use faqdesk_core::types::{InboundEvent, MessageContent, OutboundMessage, Recipient};
use faqdesk_core::{ChannelAdapter, FaqdeskError, MessageId, UserId};
use faqdesk_resolver::{Resolution, Resolver, video_url};
use tracing::{debug, info, warn};

use crate::escalation::{EscalationError, EscalationTracker, SessionState};

#[cfg(feature = "prometheus")]
use faqdesk_prometheus::recording;

#[cfg(not(feature = "prometheus"))]
mod recording {
    pub fn record_resolution(_stage: &str) {}
    pub fn record_escalation(_event: &'static str) {}
    pub fn set_pending_escalations(_count: usize) {}
}

/// Which escalation step a user was acknowledged for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscalationStage {
    /// The operator button opened a session.
    Requested,
    /// The follow-up message was relayed to operators.
    Forwarded,
}

/// What the router did with one event.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// `/start` was answered.
    Greeting,
    EscalationAck(EscalationStage),
    /// The user already has an open escalation (button pressed again, or
    /// wrote again while the relayed message awaits a reply).
    EscalationAlreadyPending,
    /// A text answer was sent, with the operator button.
    AnswerFound(Resolution),
    /// The answer was a video link. `as_video` is false when the text fallback was used.
    VideoAnswer { url: String, as_video: bool },
    /// Nothing matched; the operator button was offered.
    NoMatch,
    /// An operator reply was delivered and the session closed.
    DeliverToUser(UserId),
    /// Not for this engine (unknown reply target, media outside a handoff...).
    NotApplicable,
}

impl Outcome {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Greeting => "greeting",
            Outcome::EscalationAck(EscalationStage::Requested) => "escalation_requested",
            Outcome::EscalationAck(EscalationStage::Forwarded) => "escalation_forwarded",
            Outcome::EscalationAlreadyPending => "escalation_already_pending",
            Outcome::AnswerFound(_) => "answer_found",
            Outcome::VideoAnswer { .. } => "video_answer",
            Outcome::NoMatch => "no_match",
            Outcome::DeliverToUser(_) => "deliver_to_user",
            Outcome::NotApplicable => "not_applicable",
        }
    }
}

/// Routes inbound events and performs the resulting channel calls.
pub struct EventRouter {
    channel: Arc<dyn ChannelAdapter>,
    resolver: Resolver,
    tracker: Arc<EscalationTracker>,
    texts: TextsConfig,
}

impl EventRouter {
    pub fn new(
        channel: Arc<dyn ChannelAdapter>,
        resolver: Resolver,
        tracker: Arc<EscalationTracker>,
        texts: TextsConfig,
    ) -> Self {
        Self {
            channel,
            resolver,
            tracker,
            texts,
        }
    }

    pub fn tracker(&self) -> &Arc<EscalationTracker> {
        &self.tracker
    }

    /// Handle one event. Errors are channel failures; tracker state is
    /// unchanged by whichever step failed.
    pub async fn handle(&self, event: InboundEvent) -> Result<Outcome, FaqdeskError> {
        let outcome = match event {
            InboundEvent::Start { user_id } => {
                self.send_text(&user_id, self.texts.greeting.clone(), false)
                    .await?;
                Outcome::Greeting
            }
            InboundEvent::OperatorButtonPressed {
                user_id,
                callback_id,
            } => self.operator_button(&user_id, callback_id.as_deref()).await?,
            InboundEvent::UserMessage {
                user_id,
                message_id,
                content,
            } => self.user_message(&user_id, &message_id, content).await?,
            InboundEvent::AdminReply { reply_to, content } => {
                self.admin_reply(&reply_to, content).await?
            }
        };
        recording::set_pending_escalations(self.tracker.pending_count());
        Ok(outcome)
    }

    async fn operator_button(
        &self,
        user_id: &UserId,
        callback_id: Option<&str>,
    ) -> Result<Outcome, FaqdeskError> {
        match self.tracker.request_escalation(user_id) {
            Err(_) => {
                recording::record_escalation("already_pending");
                let notice = &self.texts.escalation_already_pending;
                match callback_id {
                    Some(id) => self.channel.acknowledge_button(id, notice).await?,
                    None => {
                        self.send_text(user_id, notice.clone(), false).await?;
                    }
                }
                Ok(Outcome::EscalationAlreadyPending)
            }
            Ok(()) => {
                recording::record_escalation("requested");
                info!(user_id = %user_id, "operator requested");
                let prompt = &self.texts.escalation_requested;
                if let Some(id) = callback_id {
                    if let Err(e) = self.channel.acknowledge_button(id, prompt).await {
                        warn!(error = %e, "failed to acknowledge operator button");
                    }
                }
                self.send_text(user_id, prompt.clone(), false).await?;
                Ok(Outcome::EscalationAck(EscalationStage::Requested))
            }
        }
    }

    async fn user_message(
        &self,
        user_id: &UserId,
        message_id: &MessageId,
        content: MessageContent,
    ) -> Result<Outcome, FaqdeskError> {
        match self.tracker.session_state(user_id) {
            Some(SessionState::Requested) => self.relay_follow_up(user_id, message_id).await,
            Some(SessionState::Forwarded(_)) => {
                self.send_text(user_id, self.texts.escalation_in_flight.clone(), false)
                    .await?;
                Ok(Outcome::EscalationAlreadyPending)
            }
            None => match content {
                MessageContent::Text(text) => self.answer(user_id, &text).await,
                _ => {
                    debug!(user_id = %user_id, "ignoring non-text message outside a handoff");
                    Ok(Outcome::NotApplicable)
                }
            },
        }
    }

    async fn relay_follow_up(
        &self,
        user_id: &UserId,
        message_id: &MessageId,
    ) -> Result<Outcome, FaqdeskError> {
        let relayed = self
            .channel
            .forward_to_operators(user_id, message_id)
            .await?;

        match self.tracker.record_forwarded(user_id, &relayed) {
            Ok(()) => {
                recording::record_escalation("forwarded");
                info!(user_id = %user_id, admin_message_id = %relayed, "follow-up relayed to operators");
                self.send_text(user_id, self.texts.escalation_forwarded.clone(), false)
                    .await?;
                Ok(Outcome::EscalationAck(EscalationStage::Forwarded))
            }
            Err(EscalationError::AlreadyForwarded) => {
                // A concurrent follow-up won the race; this copy has no back-reference.
                self.send_text(user_id, self.texts.escalation_in_flight.clone(), false)
                    .await?;
                Ok(Outcome::EscalationAlreadyPending)
            }
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "relayed follow-up has no open session");
                Ok(Outcome::NotApplicable)
            }
        }
    }

    async fn answer(&self, user_id: &UserId, query: &str) -> Result<Outcome, FaqdeskError> {
        let Some(resolution) = self.resolver.resolve(query).await else {
            recording::record_resolution("none");
            self.send_text(user_id, self.texts.no_match.clone(), true)
                .await?;
            return Ok(Outcome::NoMatch);
        };
        recording::record_resolution(resolution.stage.as_str());
        debug!(
            user_id = %user_id,
            stage = %resolution.stage,
            score = resolution.score,
            question = resolution.question.as_str(),
            "question resolved"
        );

        if let Some(url) = video_url(&resolution.answer) {
            let url = url.to_string();
            return self.send_video(user_id, url).await;
        }

        let text = self
            .texts
            .answer_found
            .replace("{answer}", &resolution.answer);
        self.send_text(user_id, text, true).await?;
        Ok(Outcome::AnswerFound(resolution))
    }

    async fn send_video(&self, user_id: &UserId, url: String) -> Result<Outcome, FaqdeskError> {
        match self
            .channel
            .send_video(user_id, &url, &self.texts.video_caption)
            .await
        {
            Ok(_) => Ok(Outcome::VideoAnswer { url, as_video: true }),
            Err(e) => {
                warn!(error = %e, url = url.as_str(), "video send failed, sending link instead");
                let text = self.texts.video_link.replace("{url}", &url);
                self.send_text(user_id, text, false).await?;
                Ok(Outcome::VideoAnswer {
                    url,
                    as_video: false,
                })
            }
        }
    }

    async fn admin_reply(
        &self,
        reply_to: &MessageId,
        content: MessageContent,
    ) -> Result<Outcome, FaqdeskError> {
        let Some(user_id) = self.tracker.user_for_admin_message(reply_to) else {
            return Ok(Outcome::NotApplicable);
        };

        let delivery = match content {
            MessageContent::Text(text) => OutboundMessage::text(
                Recipient::User(user_id.clone()),
                self.texts.operator_reply.replace("{reply}", &text),
            ),
            MessageContent::Photo { file_id, caption } => OutboundMessage {
                recipient: Recipient::User(user_id.clone()),
                content: MessageContent::Photo {
                    file_id,
                    caption: Some(
                        caption.unwrap_or_else(|| self.texts.operator_photo_caption.clone()),
                    ),
                },
                operator_button: false,
            },
            MessageContent::Unsupported => {
                debug!(user_id = %user_id, "operator reply has no text or photo");
                return Ok(Outcome::NotApplicable);
            }
        };
        self.channel.send(delivery).await?;

        match self.tracker.resolve_by_admin_message(reply_to) {
            Ok(closed) => {
                recording::record_escalation("resolved");
                info!(user_id = %closed, "operator reply delivered, dialog closed");
                let notice = self
                    .texts
                    .dialog_closed
                    .replace("{user_id}", &closed.to_string());
                self.channel
                    .send(OutboundMessage::text(Recipient::Operators, notice))
                    .await?;
                Ok(Outcome::DeliverToUser(closed))
            }
            // Another reply to the same message closed it first.
            Err(_) => Ok(Outcome::DeliverToUser(user_id)),
        }
    }

    async fn send_text(
        &self,
        user_id: &UserId,
        text: String,
        operator_button: bool,
    ) -> Result<MessageId, FaqdeskError> {
        let mut msg = OutboundMessage::text(Recipient::User(user_id.clone()), text);
        if operator_button {
            msg = msg.with_operator_button();
        }
        self.channel.send(msg).await
    }
}
