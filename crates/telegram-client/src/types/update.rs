//! Update and message types received from the Bot API.

use serde::{Deserialize, Serialize};

/// An incoming update from `getUpdates`.
///
/// Only message updates are requested; every other update kind arrives
/// with `message` unset.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Update {
    /// Monotonically increasing update identifier.
    pub update_id: i64,

    /// New incoming message of any kind.
    #[serde(default)]
    pub message: Option<Message>,
}

/// A Telegram message.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Message {
    /// Unique message identifier inside the chat.
    pub message_id: i64,

    /// Sender. Empty for messages sent to channels.
    #[serde(default)]
    pub from: Option<User>,

    /// Conversation the message belongs to.
    pub chat: Chat,

    /// Date the message was sent (Unix time).
    #[serde(default)]
    pub date: i64,

    /// Text of a text message.
    #[serde(default)]
    pub text: Option<String>,
}

impl Message {
    /// Identifier of the sender as a string, falling back to the chat id.
    pub fn sender_id(&self) -> String {
        match &self.from {
            Some(user) => user.id.to_string(),
            None => self.chat.id.to_string(),
        }
    }

    /// Whether the message was sent by a bot account.
    pub fn is_from_bot(&self) -> bool {
        self.from.as_ref().map_or(false, |u| u.is_bot)
    }
}

/// A Telegram user or bot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier.
    pub id: i64,

    /// True if this user is a bot.
    #[serde(default)]
    pub is_bot: bool,

    /// First name.
    #[serde(default)]
    pub first_name: String,

    /// Username, without the leading `@`.
    #[serde(default)]
    pub username: Option<String>,
}

/// A chat.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Chat {
    /// Unique identifier. Negative for groups and channels.
    pub id: i64,

    /// Type of chat.
    #[serde(rename = "type", default)]
    pub kind: ChatKind,

    /// Title, for groups and channels.
    #[serde(default)]
    pub title: Option<String>,

    /// Username, for private chats and public groups.
    #[serde(default)]
    pub username: Option<String>,
}

impl Chat {
    /// Whether this is a one-to-one chat with a user.
    pub fn is_private(&self) -> bool {
        self.kind == ChatKind::Private
    }
}

/// Type of a chat.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    #[default]
    Private,
    Group,
    Supergroup,
    Channel,
    #[serde(other)]
    Unknown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_update_decodes() {
        let raw = r#"{
            "update_id": 10000,
            "message": {
                "message_id": 1365,
                "date": 1441645532,
                "chat": {"id": 1111111, "type": "private", "first_name": "Test", "username": "Test"},
                "from": {"id": 1111111, "is_bot": false, "first_name": "Test", "username": "Test"},
                "text": "/start"
            }
        }"#;

        let update: Update = serde_json::from_str(raw).unwrap();
        let message = update.message.unwrap();
        assert_eq!(update.update_id, 10000);
        assert_eq!(message.text.as_deref(), Some("/start"));
        assert_eq!(message.sender_id(), "1111111");
        assert!(message.chat.is_private());
        assert!(!message.is_from_bot());
    }

    #[test]
    fn test_sticker_message_has_no_text() {
        let raw = r#"{
            "update_id": 2,
            "message": {
                "message_id": 5,
                "date": 0,
                "chat": {"id": -100200, "type": "supergroup", "title": "Chat"},
                "from": {"id": 7, "is_bot": false, "first_name": "A"},
                "sticker": {"file_id": "abc"}
            }
        }"#;

        let update: Update = serde_json::from_str(raw).unwrap();
        let message = update.message.unwrap();
        assert!(message.text.is_none());
        assert_eq!(message.chat.kind, ChatKind::Supergroup);
    }

    #[test]
    fn test_unknown_chat_type_and_missing_sender() {
        let raw = r#"{"message_id": 1, "date": 0, "chat": {"id": -5, "type": "forum"}}"#;
        let message: Message = serde_json::from_str(raw).unwrap();
        assert_eq!(message.chat.kind, ChatKind::Unknown);
        assert_eq!(message.sender_id(), "-5");
    }
}
