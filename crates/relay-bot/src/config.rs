//! Environment configuration for the relay bot.

use std::env;

use brain_core::BrainError;
use message_listener::ProcessorConfig;
use openai_brain::{OpenAiBrainConfig, FALLBACK_REPLY};
use telegram_client::{TelegramConfig, TelegramError};
use thiserror::Error;

/// Errors raised while reading configuration at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is unset or blank.
    #[error("{0} environment variable is required")]
    Missing(&'static str),

    /// The Telegram settings could not be built.
    #[error("invalid Telegram configuration: {0}")]
    Telegram(#[from] TelegramError),

    /// The OpenAI settings could not be built.
    #[error("invalid OpenAI configuration: {0}")]
    OpenAi(#[from] BrainError),
}

/// Everything the bot needs to start.
#[derive(Debug)]
pub struct RelayConfig {
    pub telegram: TelegramConfig,
    pub openai: OpenAiBrainConfig,
    pub processor: ProcessorConfig,
}

impl RelayConfig {
    /// Read configuration from environment variables.
    ///
    /// Required (checked in this order):
    /// - `TELEGRAM_TOKEN` - bot token
    /// - `OPENAI_API_KEY` - OpenAI API key
    ///
    /// Optional:
    /// - `RELAY_TYPING_INDICATOR` - show "typing..." while waiting (default: false)
    /// - everything `TelegramConfig::from_env` and `OpenAiBrainConfig::from_env` read
    pub fn from_env() -> Result<Self, ConfigError> {
        require("TELEGRAM_TOKEN")?;
        require("OPENAI_API_KEY")?;

        let telegram = TelegramConfig::from_env()?;
        let openai = OpenAiBrainConfig::from_env()?;

        // Brain timeouts and failures still get exactly one reply
        let processor = ProcessorConfig {
            send_typing_indicators: env_flag("RELAY_TYPING_INDICATOR"),
            ..ProcessorConfig::with_error_reply(FALLBACK_REPLY)
        };

        Ok(Self {
            telegram,
            openai,
            processor,
        })
    }
}

fn require(name: &'static str) -> Result<(), ConfigError> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(()),
        _ => Err(ConfigError::Missing(name)),
    }
}

fn env_flag(name: &str) -> bool {
    env::var(name)
        .map(|val| matches!(val.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}
