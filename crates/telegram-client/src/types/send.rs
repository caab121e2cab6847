//! Request parameter types for Bot API methods.

use serde::Serialize;

/// Parameters for `sendMessage`.
#[derive(Debug, Clone, Serialize)]
pub struct SendMessageParams {
    /// Target chat.
    pub chat_id: i64,

    /// Message text.
    pub text: String,

    /// Send the message silently.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_notification: Option<bool>,
}

impl SendMessageParams {
    /// Create params for a plain text message.
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            disable_notification: None,
        }
    }
}

/// Chat actions shown to the user while the bot is working.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatAction {
    Typing,
}

/// Parameters for `sendChatAction`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatActionParams {
    /// Target chat.
    pub chat_id: i64,

    /// Action to broadcast.
    pub action: ChatAction,
}

/// Parameters for `getUpdates`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetUpdatesParams {
    /// Identifier of the first update to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    /// Long polling timeout in seconds.
    pub timeout: u64,

    /// Update kinds to receive.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_updates: Vec<String>,
}
