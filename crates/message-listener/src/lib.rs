//! Message relay runtime for the Telegram relay bot.
//!
//! This crate provides a [`MessageProcessor`] that polls Telegram for
//! updates, relays each text message through a
//! [`Brain`](brain_core::Brain) on its own task and sends the reply back to
//! the chat it came from.
//!
//! # Example
//!
//! ```no_run
//! use message_listener::{MessageProcessor, ProcessorConfig};
//! use telegram_client::{TelegramClient, TelegramConfig};
//!
//! # async fn example<B: brain_core::Brain + 'static>(brain: B) -> Result<(), Box<dyn std::error::Error>> {
//! let client = TelegramClient::connect(TelegramConfig::new("123:abc")).await?;
//! let processor = MessageProcessor::new(client, brain, ProcessorConfig::default());
//!
//! processor
//!     .run_with_shutdown(async {
//!         // Resolve to stop polling and drain in-flight messages
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```

mod convert;
mod processor;

pub use convert::MessageExt;
pub use processor::{MessageProcessor, ProcessResult, ProcessorConfig, ProcessorError};

// Re-export transport types for users
pub use telegram_client::{Chat, ChatKind, Message, ReconnectConfig, Update, User};
