//! Chat message model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::core::ids::{MessageId, UserId};

/// Origin of a message.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    /// Written by a user.
    #[default]
    Text,
    /// Suggested or generated by the assistant.
    Ai,
}

/// An immutable chat message.
///
/// Messages are appended to a conversation in chronological order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier.
    pub id: MessageId,
    /// Author of the message.
    pub sender_id: UserId,
    /// Raw message text.
    pub content: String,
    /// When the message was sent.
    pub timestamp: DateTime<Utc>,
    /// Message origin.
    #[serde(rename = "type")]
    pub message_type: MessageType,
}

impl Message {
    /// Create a user-authored text message.
    #[must_use]
    pub fn new(sender_id: UserId, content: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            id: MessageId::new(),
            sender_id,
            content: content.into(),
            timestamp,
            message_type: MessageType::Text,
        }
    }

    /// Set the message origin.
    #[must_use]
    pub const fn with_type(mut self, message_type: MessageType) -> Self {
        self.message_type = message_type;
        self
    }

    /// Content length in Unicode scalar values.
    ///
    /// This is not the UTF-16 code-unit count a browser reports: an emoji
    /// outside the BMP counts 1 here and 2 in UTF-16. CJK text counts the
    /// same either way.
    #[must_use]
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }
}

/// Average content length, in characters, of the messages sent by `user_id`.
///
/// Returns `None` when the user sent nothing.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn average_length_for(messages: &[Message], user_id: UserId) -> Option<f64> {
    let (count, total) = messages
        .iter()
        .filter(|m| m.sender_id == user_id)
        .fold((0_usize, 0_usize), |(count, total), m| {
            (count + 1, total + m.char_len())
        });

    (count > 0).then(|| total as f64 / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_len_counts_characters_not_bytes() {
        let msg = Message::new(UserId::new(), "我喜欢考研", Utc::now());
        assert_eq!(msg.char_len(), 5);
        assert_eq!(msg.message_type, MessageType::Text);
    }

    #[test]
    fn test_char_len_counts_emoji_as_one_scalar() {
        let msg = Message::new(UserId::new(), "好😂", Utc::now());
        assert_eq!(msg.char_len(), 2);
        assert_eq!(msg.content.encode_utf16().count(), 3);
    }

    #[test]
    fn test_average_length_filters_by_sender() {
        let me = UserId::new();
        let other = UserId::new();
        let now = Utc::now();
        let messages = vec![
            Message::new(me, "ab", now),
            Message::new(other, "abcdefghij", now),
            Message::new(me, "abcd", now),
        ];
        let avg = average_length_for(&messages, me).unwrap();
        assert!((avg - 3.0).abs() < f64::EPSILON);
        assert!(average_length_for(&messages, UserId::new()).is_none());
    }

    #[test]
    fn test_serializes_type_field() {
        let msg = Message::new(UserId::new(), "hi", Utc::now()).with_type(MessageType::Ai);
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "ai");
    }
}
