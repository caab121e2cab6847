//! Telegram Bot API types.

mod response;
mod send;
mod update;

pub use response::{ApiResponse, ResponseParameters};
pub use send::{ChatAction, ChatActionParams, GetUpdatesParams, SendMessageParams};
pub use update::{Chat, ChatKind, Message, Update, User};
