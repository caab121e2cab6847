//! Long polling stream of incoming updates.

use std::collections::VecDeque;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use futures::stream::{self, BoxStream, Stream, StreamExt};
use tracing::{debug, error, info, warn};

use crate::client::TelegramClient;
use crate::error::TelegramError;
use crate::types::Update;

/// Configuration for backing off after failed polls.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Maximum number of consecutive failures (None = infinite).
    pub max_retries: Option<u32>,
    /// Initial delay before first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Backoff multiplier for each retry.
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_retries: None,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl ReconnectConfig {
    /// Calculate delay for a given attempt number.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay_ms = self.initial_delay.as_millis() as f64
            * self.backoff_multiplier.powi(attempt as i32);
        let delay = Duration::from_millis(delay_ms as u64);
        delay.min(self.max_delay)
    }

    /// Check if we should retry after the given number of attempts.
    pub fn should_retry(&self, attempts: u32) -> bool {
        self.max_retries.map_or(true, |max| attempts < max)
    }
}

struct PollState {
    client: TelegramClient,
    reconnect: ReconnectConfig,
    offset: Option<i64>,
    pending: VecDeque<Update>,
    failures: u32,
    retry_after: Option<Duration>,
    finished: bool,
}

impl PollState {
    async fn next(mut self) -> Option<(Result<Update, TelegramError>, Self)> {
        loop {
            if let Some(update) = self.pending.pop_front() {
                return Some((Ok(update), self));
            }

            if self.finished {
                return None;
            }

            if self.failures > 0 {
                if !self.reconnect.should_retry(self.failures) {
                    error!("Giving up polling after {} consecutive failures", self.failures);
                    return None;
                }
                let backoff = self.reconnect.delay_for_attempt(self.failures - 1);
                let delay = self.retry_after.take().map_or(backoff, |d| d.max(backoff));
                debug!("Retrying getUpdates in {:?}", delay);
                tokio::time::sleep(delay).await;
            }

            match self.client.get_updates(self.offset).await {
                Ok(updates) => {
                    if self.failures > 0 {
                        info!("Polling restored after {} failures", self.failures);
                    }
                    self.failures = 0;
                    if let Some(last) = updates.last() {
                        self.offset = Some(last.update_id + 1);
                    }
                    debug!("Received {} updates", updates.len());
                    self.pending.extend(updates);
                }
                Err(e) => {
                    self.failures += 1;
                    if e.is_unauthorized() {
                        error!("Bot token rejected, stopping polling: {}", e);
                        self.finished = true;
                    } else {
                        warn!("getUpdates failed (failures: {}): {}", self.failures, e);
                        self.retry_after = e.retry_after().map(Duration::from_secs);
                    }
                    return Some((Err(e), self));
                }
            }
        }
    }
}

/// A stream of incoming Telegram updates.
///
/// Updates are yielded in `update_id` order and acknowledged by advancing
/// the polling offset. Poll failures are yielded as errors and retried with
/// exponential backoff; the stream ends when the token is rejected or the
/// retry budget is exhausted.
pub struct UpdateStream {
    inner: BoxStream<'static, Result<Update, TelegramError>>,
}

impl UpdateStream {
    /// Create a new update stream from a client.
    pub fn new(client: &TelegramClient) -> Self {
        Self::with_reconnect(client, ReconnectConfig::default())
    }

    /// Create a new update stream with custom reconnection config.
    pub fn with_reconnect(client: &TelegramClient, reconnect: ReconnectConfig) -> Self {
        info!("Starting long polling for updates");

        let state = PollState {
            client: client.clone(),
            reconnect,
            offset: None,
            pending: VecDeque::new(),
            failures: 0,
            retry_after: None,
            finished: false,
        };

        Self {
            inner: stream::unfold(state, PollState::next).boxed(),
        }
    }
}

impl Stream for UpdateStream {
    type Item = Result<Update, TelegramError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

/// Create an update stream from a client.
pub fn subscribe(client: &TelegramClient) -> UpdateStream {
    UpdateStream::new(client)
}

/// Create an update stream with custom reconnection configuration.
pub fn subscribe_with_reconnect(
    client: &TelegramClient,
    reconnect_config: ReconnectConfig,
) -> UpdateStream {
    UpdateStream::with_reconnect(client, reconnect_config)
}
