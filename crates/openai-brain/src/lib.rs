//! OpenAI-based brain implementation.
//!
//! This crate provides a brain that prepends a fixed prompt, loaded once from
//! a file, to every user message and asks the OpenAI chat completions API for
//! a reply.
//!
//! # Features
//!
//! - One stateless completion request per message (no history, no retries)
//! - Bounded request timeout
//! - Every failure (non-200, malformed body, transport error) is logged and
//!   mapped to [`FALLBACK_REPLY`], so the user always gets an answer
//! - Configurable via environment variables
//!
//! # Usage
//!
//! ```rust,no_run
//! use openai_brain::OpenAiBrain;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let brain = OpenAiBrain::from_env()?;
//!     // Use the brain...
//!     Ok(())
//! }
//! ```

pub mod api_types;
mod brain;
mod client;
mod config;

pub use brain::OpenAiBrain;
pub use client::{CompletionClient, FALLBACK_REPLY};
pub use config::{OpenAiBrainConfig, OpenAiBrainConfigBuilder};

// Re-export brain-core types for convenience
pub use brain_core::{async_trait, Brain, BrainError, InboundMessage, OutboundMessage};
