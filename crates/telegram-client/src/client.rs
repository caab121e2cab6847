//! Telegram Bot API HTTP client.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::TelegramConfig;
use crate::error::TelegramError;
use crate::types::{
    ApiResponse, ChatAction, ChatActionParams, GetUpdatesParams, Message, SendMessageParams,
    Update, User,
};

/// Extra time granted to a long polling request on top of the poll window.
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Client for the Telegram Bot API.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct TelegramClient {
    http: Client,
    config: Arc<TelegramConfig>,
    bot_user: Option<Arc<User>>,
}

impl TelegramClient {
    /// Create a client without contacting the API.
    pub fn new(config: TelegramConfig) -> Result<Self, TelegramError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            config: Arc::new(config),
            bot_user: None,
        })
    }

    /// Create a client and verify the token with `getMe`.
    pub async fn connect(config: TelegramConfig) -> Result<Self, TelegramError> {
        let mut client = Self::new(config)?;
        let me = client.get_me().await?;
        info!(
            "Connected to Telegram as @{} (id={})",
            me.username.as_deref().unwrap_or(&me.first_name),
            me.id
        );
        client.bot_user = Some(Arc::new(me));
        Ok(client)
    }

    /// The bot account, known after [`TelegramClient::connect`].
    pub fn bot_user(&self) -> Option<&User> {
        self.bot_user.as_deref()
    }

    /// Get the configuration.
    pub fn config(&self) -> &TelegramConfig {
        &self.config
    }

    /// Fetch the bot account. Fails if the token is invalid.
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call::<(), _>("getMe", None, None).await
    }

    /// Long poll for updates starting at `offset`.
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdatesParams {
            offset,
            timeout: self.config.poll_timeout.as_secs(),
            allowed_updates: vec!["message".to_string()],
        };
        let timeout = self.config.poll_timeout + POLL_GRACE;
        self.call("getUpdates", Some(&params), Some(timeout)).await
    }

    /// Send a text message to a chat.
    pub async fn send_message(&self, chat_id: i64, text: &str) -> Result<Message, TelegramError> {
        let params = SendMessageParams::text(chat_id, text);
        self.call("sendMessage", Some(&params), None).await
    }

    /// Show the "typing..." indicator in a chat.
    pub async fn send_typing(&self, chat_id: i64) -> Result<(), TelegramError> {
        let params = ChatActionParams {
            chat_id,
            action: ChatAction::Typing,
        };
        // sendChatAction returns `true` on success
        let _: bool = self.call("sendChatAction", Some(&params), None).await?;
        Ok(())
    }

    /// Call a Bot API method.
    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<&P>,
        timeout: Option<Duration>,
    ) -> Result<R, TelegramError> {
        debug!("Bot API call: {}", method);

        let mut request = self.http.post(self.config.method_url(method));
        if let Some(params) = params {
            request = request.json(params);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<ApiResponse<R>>(&body) {
            Ok(envelope) => envelope.into_result(),
            Err(_) if !status.is_success() => Err(TelegramError::Connection(format!(
                "HTTP {}: {}",
                status, body
            ))),
            Err(e) => Err(TelegramError::Json(e)),
        }
    }
}

impl std::fmt::Debug for TelegramClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramClient")
            .field("config", &self.config)
            .field("bot_user", &self.bot_user)
            .finish()
    }
}
