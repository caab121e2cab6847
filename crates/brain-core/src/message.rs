//! Message types passed to and returned from a brain.

/// A message received from a chat, ready for processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Opaque identifier of the sender (Telegram user id, or the chat id
    /// when the platform does not report a user).
    pub sender: String,

    /// Conversation the message arrived on. Replies go back here.
    pub chat_id: i64,

    /// Platform message id, used only for logging and tracing.
    pub message_id: i64,

    /// Message text. May be empty.
    pub text: String,

    /// Unix timestamp (seconds) reported by the platform.
    pub timestamp: i64,
}

impl InboundMessage {
    /// Create a new inbound message.
    pub fn new(
        sender: impl Into<String>,
        chat_id: i64,
        text: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            sender: sender.into(),
            chat_id,
            message_id: 0,
            text: text.into(),
            timestamp,
        }
    }

    /// Set the platform message id.
    pub fn with_message_id(mut self, message_id: i64) -> Self {
        self.message_id = message_id;
        self
    }
}

/// A response to be delivered to a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    /// Conversation to deliver the text to.
    pub chat_id: i64,

    /// Reply text.
    pub text: String,
}

impl OutboundMessage {
    /// Create a message addressed to a chat.
    pub fn new(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
        }
    }

    /// Create a reply addressed to the chat the inbound message arrived on.
    pub fn reply_to(message: &InboundMessage, text: impl Into<String>) -> Self {
        Self::new(message.chat_id, text)
    }
}
