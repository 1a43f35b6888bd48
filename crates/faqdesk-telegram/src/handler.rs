// SPDX-FileCopyrightText: 2026 Faqdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of Telegram updates into [`InboundEvent`]s.
//!
//! Private chats carry end users. The operator chat only contributes
//! replies to relayed messages; everything else posted there is ignored.

use faqdesk_core::types::{InboundEvent, MessageContent};
use faqdesk_core::{MessageId, UserId};
use teloxide::prelude::*;
use teloxide::types::{ChatKind, InlineKeyboardButton, InlineKeyboardMarkup};

/// Callback payload of the "call operator" button.
pub const OPERATOR_CALLBACK: &str = "call_operator";

/// Checks whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// True for `/start`, `/start payload` and `/start@botname`.
pub fn is_start_command(text: &str) -> bool {
    text.split_whitespace()
        .next()
        .and_then(|cmd| cmd.split('@').next())
        .is_some_and(|cmd| cmd == "/start")
}

/// Extracts the payload the engine understands.
///
/// Photos reference the largest size by file id; nothing is downloaded.
pub fn extract_content(msg: &Message) -> MessageContent {
    if let Some(text) = msg.text() {
        return MessageContent::Text(text.to_string());
    }

    if let Some(largest) = msg.photo().and_then(|sizes| sizes.last()) {
        return MessageContent::Photo {
            file_id: largest.file.id.0.clone(),
            caption: msg.caption().map(str::to_string),
        };
    }

    MessageContent::Unsupported
}

/// Maps a message to an event, or `None` if the engine has no use for it.
pub fn classify_message(msg: &Message, operator_chat: ChatId) -> Option<InboundEvent> {
    if msg.chat.id == operator_chat {
        let replied = msg.reply_to_message()?;
        return Some(InboundEvent::AdminReply {
            reply_to: MessageId(replied.id.0.to_string()),
            content: extract_content(msg),
        });
    }

    if !is_dm(msg) {
        return None;
    }

    let user_id = UserId(msg.chat.id.0.to_string());
    if msg.text().is_some_and(is_start_command) {
        return Some(InboundEvent::Start { user_id });
    }

    Some(InboundEvent::UserMessage {
        user_id,
        message_id: MessageId(msg.id.0.to_string()),
        content: extract_content(msg),
    })
}

/// Returns the pressing user if this is the operator button.
pub fn operator_button_user(query: &CallbackQuery) -> Option<UserId> {
    (query.data.as_deref() == Some(OPERATOR_CALLBACK))
        .then(|| UserId(query.from.id.0.to_string()))
}

/// Inline keyboard holding the single "call operator" button.
pub fn operator_keyboard(label: &str) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        label.to_string(),
        OPERATOR_CALLBACK.to_string(),
    )]])
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPERATORS: ChatId = ChatId(-100123);

    fn user_json(user_id: u64) -> serde_json::Value {
        serde_json::json!({
            "id": user_id,
            "is_bot": false,
            "first_name": "Test",
        })
    }

    fn private_chat(user_id: u64) -> serde_json::Value {
        serde_json::json!({
            "id": user_id as i64,
            "type": "private",
            "first_name": "Test",
        })
    }

    fn operator_chat() -> serde_json::Value {
        serde_json::json!({
            "id": OPERATORS.0,
            "type": "supergroup",
            "title": "Operators",
        })
    }

    fn message(value: serde_json::Value) -> Message {
        serde_json::from_value(value).expect("failed to deserialize mock message")
    }

    fn private_text(user_id: u64, message_id: i32, text: &str) -> Message {
        message(serde_json::json!({
            "message_id": message_id,
            "date": 1700000000i64,
            "chat": private_chat(user_id),
            "from": user_json(user_id),
            "text": text,
        }))
    }

    fn private_photo(user_id: u64, caption: Option<&str>) -> Message {
        let mut value = serde_json::json!({
            "message_id": 3,
            "date": 1700000000i64,
            "chat": private_chat(user_id),
            "from": user_json(user_id),
            "photo": [
                {"file_id": "small", "file_unique_id": "u-small", "width": 90, "height": 90, "file_size": 1000},
                {"file_id": "large", "file_unique_id": "u-large", "width": 800, "height": 800, "file_size": 90000},
            ],
        });
        if let Some(caption) = caption {
            value["caption"] = serde_json::json!(caption);
        }
        message(value)
    }

    fn operator_message(text: &str, reply_to: Option<i32>) -> Message {
        let mut value = serde_json::json!({
            "message_id": 50,
            "date": 1700000100i64,
            "chat": operator_chat(),
            "from": user_json(777),
            "text": text,
        });
        if let Some(id) = reply_to {
            value["reply_to_message"] = serde_json::json!({
                "message_id": id,
                "date": 1700000000i64,
                "chat": operator_chat(),
                "text": "relayed question",
            });
        }
        message(value)
    }

    fn callback(data: Option<&str>) -> CallbackQuery {
        let mut value = serde_json::json!({
            "id": "4382bfdwdsb323b2d9",
            "from": user_json(12345),
            "chat_instance": "-5",
        });
        if let Some(data) = data {
            value["data"] = serde_json::json!(data);
        }
        serde_json::from_value(value).expect("failed to deserialize mock callback")
    }

    #[test]
    fn start_command_variants() {
        assert!(is_start_command("/start"));
        assert!(is_start_command("/start deep-link"));
        assert!(is_start_command("/start@faqdesk_bot"));
        assert!(!is_start_command("/stop"));
        assert!(!is_start_command("start"));
        assert!(!is_start_command(""));
    }

    #[test]
    fn private_start_becomes_start_event() {
        let event = classify_message(&private_text(12345, 1, "/start"), OPERATORS);
        assert_eq!(
            event,
            Some(InboundEvent::Start {
                user_id: UserId("12345".into())
            })
        );
    }

    #[test]
    fn private_text_becomes_user_message() {
        let event = classify_message(&private_text(12345, 9, "Ошибка APK36651065"), OPERATORS);
        assert_eq!(
            event,
            Some(InboundEvent::UserMessage {
                user_id: UserId("12345".into()),
                message_id: MessageId("9".into()),
                content: MessageContent::Text("Ошибка APK36651065".into()),
            })
        );
    }

    #[test]
    fn photo_uses_largest_size() {
        let content = extract_content(&private_photo(12345, Some("скриншот")));
        assert_eq!(
            content,
            MessageContent::Photo {
                file_id: "large".into(),
                caption: Some("скриншот".into()),
            }
        );

        let content = extract_content(&private_photo(12345, None));
        assert!(matches!(content, MessageContent::Photo { caption: None, .. }));
    }

    #[test]
    fn operator_reply_becomes_admin_reply() {
        let event = classify_message(&operator_message("Перезагрузите", Some(42)), OPERATORS);
        assert_eq!(
            event,
            Some(InboundEvent::AdminReply {
                reply_to: MessageId("42".into()),
                content: MessageContent::Text("Перезагрузите".into()),
            })
        );
    }

    #[test]
    fn operator_chatter_is_ignored() {
        assert_eq!(classify_message(&operator_message("hi all", None), OPERATORS), None);
    }

    #[test]
    fn other_groups_are_ignored() {
        let msg = operator_message("reply", Some(42));
        assert_eq!(classify_message(&msg, ChatId(-1)), None);
    }

    #[test]
    fn operator_button_is_recognized() {
        assert_eq!(
            operator_button_user(&callback(Some(OPERATOR_CALLBACK))),
            Some(UserId("12345".into()))
        );
        assert_eq!(operator_button_user(&callback(Some("other"))), None);
        assert_eq!(operator_button_user(&callback(None)), None);
    }

    #[test]
    fn keyboard_carries_callback_payload() {
        let keyboard = operator_keyboard("Вызвать оператора");
        assert_eq!(keyboard.inline_keyboard.len(), 1);
        let button = &keyboard.inline_keyboard[0][0];
        assert_eq!(button.text, "Вызвать оператора");
    }
}
