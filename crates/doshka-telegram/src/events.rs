// SPDX-FileCopyrightText: 2026 Doshka Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Update decoding: Telegram messages and callback queries into
//! transport-agnostic [`InboundEvent`]s.
//!
//! Only private-chat text messages and callback presses are meaningful to
//! the board; everything else decodes to `None` and is dropped at the
//! polling boundary.

use doshka_core::types::{ChatId, EventPayload, InboundEvent, MessageId, UserId};
use teloxide::types::{CallbackQuery, ChatKind, Message};

/// Whether the message is from a private (DM) chat.
///
/// Group, supergroup, and channel messages return `false`.
pub fn is_dm(msg: &Message) -> bool {
    matches!(msg.chat.kind, ChatKind::Private(_))
}

/// Decodes a text message from a private chat.
pub fn message_event(msg: &Message) -> Option<InboundEvent> {
    if !is_dm(msg) {
        return None;
    }
    let user = msg.from.as_ref()?;
    let text = msg.text()?;
    Some(InboundEvent {
        chat: ChatId(msg.chat.id.0),
        user: UserId(user.id.0 as i64),
        user_display: user.username.clone(),
        origin_message: None,
        payload: EventPayload::Text(text.to_string()),
    })
}

/// Decodes a callback press on an interface message.
///
/// The originating message is carried so the controller can discard a
/// stale screen; queries without an accessible message or data are
/// dropped.
pub fn callback_event(query: &CallbackQuery) -> Option<InboundEvent> {
    let data = query.data.as_ref()?;
    let message = query.regular_message()?;
    Some(InboundEvent {
        chat: ChatId(message.chat.id.0),
        user: UserId(query.from.id.0 as i64),
        user_display: query.from.username.clone(),
        origin_message: Some(MessageId(i64::from(message.id.0))),
        payload: EventPayload::Control(data.clone()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build a mock private chat message from JSON, matching the Telegram
    /// Bot API structure.
    fn make_private_message(user_id: u64, username: Option<&str>, text: &str) -> Message {
        let from = match username {
            Some(uname) => serde_json::json!({
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
                "username": uname,
            }),
            None => serde_json::json!({
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            }),
        };

        let json = serde_json::json!({
            "message_id": 10,
            "date": 1700000000i64,
            "chat": {
                "id": user_id as i64,
                "type": "private",
                "first_name": "Test",
            },
            "from": from,
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock message")
    }

    fn make_group_message(user_id: u64, text: &str) -> Message {
        let json = serde_json::json!({
            "message_id": 10,
            "date": 1700000000i64,
            "chat": {
                "id": -100123i64,
                "type": "supergroup",
                "title": "Test Group",
            },
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
            },
            "text": text,
        });

        serde_json::from_value(json).expect("failed to deserialize mock group message")
    }

    fn make_callback(user_id: u64, data: Option<&str>) -> CallbackQuery {
        let mut json = serde_json::json!({
            "id": "cb-1",
            "from": {
                "id": user_id,
                "is_bot": false,
                "first_name": "Test",
                "username": "tester",
            },
            "message": {
                "message_id": 55,
                "date": 1700000000i64,
                "chat": {
                    "id": user_id as i64,
                    "type": "private",
                    "first_name": "Test",
                },
                "text": "screen",
            },
            "chat_instance": "ci-1",
        });
        if let Some(data) = data {
            json["data"] = serde_json::json!(data);
        }
        serde_json::from_value(json).expect("failed to deserialize mock callback query")
    }

    #[test]
    fn dm_text_decodes_to_text_event() {
        let msg = make_private_message(12345, Some("tester"), "hello");
        let event = message_event(&msg).unwrap();
        assert_eq!(event.chat, ChatId(12345));
        assert_eq!(event.user, UserId(12345));
        assert_eq!(event.user_display.as_deref(), Some("tester"));
        assert!(event.origin_message.is_none());
        assert_eq!(event.payload, EventPayload::Text("hello".into()));
    }

    #[test]
    fn user_without_username_keeps_none_display() {
        let msg = make_private_message(12345, None, "hello");
        let event = message_event(&msg).unwrap();
        assert!(event.user_display.is_none());
    }

    #[test]
    fn group_message_is_dropped() {
        let msg = make_group_message(12345, "hello");
        assert!(!is_dm(&msg));
        assert!(message_event(&msg).is_none());
    }

    #[test]
    fn callback_decodes_with_origin_message() {
        let query = make_callback(12345, Some("page:5"));
        let event = callback_event(&query).unwrap();
        assert_eq!(event.chat, ChatId(12345));
        assert_eq!(event.user, UserId(12345));
        assert_eq!(event.origin_message, Some(MessageId(55)));
        assert_eq!(event.payload, EventPayload::Control("page:5".into()));
    }

    #[test]
    fn callback_without_data_is_dropped() {
        let query = make_callback(12345, None);
        assert!(callback_event(&query).is_none());
    }
}
