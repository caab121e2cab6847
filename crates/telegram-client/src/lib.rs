//! Telegram Bot API client library.
//!
//! This crate provides a small Rust client for the parts of the Telegram
//! Bot API a relay bot needs:
//!
//! - Verifying the bot token (`getMe`)
//! - Receiving messages via long polling (`getUpdates`)
//! - Sending text replies and typing indicators
//!
//! # Example
//!
//! ```no_run
//! use telegram_client::{TelegramClient, TelegramConfig};
//!
//! # async fn example() -> Result<(), telegram_client::TelegramError> {
//! let client = TelegramClient::connect(TelegramConfig::new("123:abc")).await?;
//!
//! use futures::StreamExt;
//! let mut updates = telegram_client::subscribe(&client);
//! while let Some(result) = updates.next().await {
//!     match result {
//!         Ok(update) => {
//!             if let Some(msg) = update.message {
//!                 if let Some(text) = msg.text {
//!                     client.send_message(msg.chat.id, &text).await?;
//!                 }
//!             }
//!         }
//!         Err(e) => eprintln!("Error: {}", e),
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod polling;
pub mod types;

pub use client::TelegramClient;
pub use config::TelegramConfig;
pub use error::TelegramError;
pub use polling::{subscribe, subscribe_with_reconnect, ReconnectConfig, UpdateStream};
pub use types::*;
