//! Conversion from Telegram messages to brain input.

use brain_core::InboundMessage;
use telegram_client::Message;

/// Extension trait for turning a Telegram [`Message`] into an [`InboundMessage`].
pub trait MessageExt {
    /// Convert to an inbound message. Returns `None` for messages without
    /// text (stickers, photos, service messages).
    fn to_inbound_message(&self) -> Option<InboundMessage>;
}

impl MessageExt for Message {
    fn to_inbound_message(&self) -> Option<InboundMessage> {
        let text = self.text.as_ref()?;
        Some(
            InboundMessage::new(self.sender_id(), self.chat.id, text.as_str(), self.date)
                .with_message_id(self.message_id),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use telegram_client::{Chat, ChatKind, User};

    fn message(text: Option<&str>, from: Option<User>) -> Message {
        Message {
            message_id: 11,
            from,
            chat: Chat {
                id: -100200,
                kind: ChatKind::Supergroup,
                ..Default::default()
            },
            date: 1700000000,
            text: text.map(String::from),
        }
    }

    #[test]
    fn test_text_message_converts() {
        let user = User {
            id: 42,
            first_name: "Ann".to_string(),
            ..Default::default()
        };
        let inbound = message(Some("hi"), Some(user)).to_inbound_message().unwrap();

        assert_eq!(inbound.sender, "42");
        assert_eq!(inbound.chat_id, -100200);
        assert_eq!(inbound.message_id, 11);
        assert_eq!(inbound.text, "hi");
        assert_eq!(inbound.timestamp, 1700000000);
    }

    #[test]
    fn test_empty_text_is_kept() {
        let inbound = message(Some(""), None).to_inbound_message().unwrap();
        assert_eq!(inbound.text, "");
        // No sender reported, so the chat stands in for it
        assert_eq!(inbound.sender, "-100200");
    }

    #[test]
    fn test_non_text_message_is_none() {
        assert!(message(None, None).to_inbound_message().is_none());
    }
}
