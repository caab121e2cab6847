//! Configuration types for telegram-client.

use std::env;
use std::fmt;
use std::time::Duration;

use crate::error::TelegramError;

/// Default Bot API base URL.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Configuration for connecting to the Telegram Bot API.
#[derive(Clone)]
pub struct TelegramConfig {
    /// Base URL of the Bot API (e.g., "https://api.telegram.org").
    pub api_url: String,
    /// Bot token issued by @BotFather.
    pub token: String,
    /// How long a single `getUpdates` call may wait for new updates.
    pub poll_timeout: Duration,
    /// Timeout for every other request.
    pub request_timeout: Duration,
}

impl TelegramConfig {
    /// Create a new configuration for the given token and the public API.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token: token.into(),
            poll_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(30),
        }
    }

    /// Use a different API base URL (local Bot API server, tests).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Set the long polling timeout.
    pub fn with_poll_timeout(mut self, poll_timeout: Duration) -> Self {
        self.poll_timeout = poll_timeout;
        self
    }

    /// Create configuration from environment variables.
    ///
    /// Required:
    /// - `TELEGRAM_TOKEN` - bot token
    ///
    /// Optional:
    /// - `TELEGRAM_API_URL` - API base URL (default: https://api.telegram.org)
    /// - `TELEGRAM_POLL_TIMEOUT_SECS` - long polling timeout (default: 30)
    pub fn from_env() -> Result<Self, TelegramError> {
        let token = env::var("TELEGRAM_TOKEN")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| TelegramError::Config("TELEGRAM_TOKEN not set".to_string()))?;

        let mut config = Self::new(token);

        if let Ok(url) = env::var("TELEGRAM_API_URL") {
            config.api_url = url;
        }

        if let Some(secs) = env::var("TELEGRAM_POLL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.poll_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Get the URL for a Bot API method.
    pub fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.api_url.trim_end_matches('/'),
            self.token,
            method
        )
    }
}

impl fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_url", &self.api_url)
            .field("token", &"<redacted>")
            .field("poll_timeout", &self.poll_timeout)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}
