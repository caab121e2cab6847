//! Message processor that connects telegram-client to a Brain implementation.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use brain_core::{Brain, BrainError, InboundMessage};
use futures::StreamExt;
use telegram_client::{ReconnectConfig, TelegramClient, TelegramError, Update};
use thiserror::Error;
use tokio::task::{JoinError, JoinSet};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::convert::MessageExt;

/// Default timeout for brain processing (60 seconds).
const DEFAULT_BRAIN_TIMEOUT: Duration = Duration::from_secs(60);

/// Default time to wait for in-flight messages on shutdown (10 seconds).
const DEFAULT_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for the message processor.
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Whether to process messages from private (one-to-one) chats.
    pub process_private: bool,

    /// Whether to process messages from groups, supergroups and channels.
    pub process_groups: bool,

    /// Whether to skip messages sent by other bots.
    pub ignore_bots: bool,

    /// Whether to send a typing indicator while the brain is working.
    pub send_typing_indicators: bool,

    /// Timeout for brain processing. If a brain takes longer than this to
    /// respond, the request is cancelled and an error returned.
    /// Default: 60 seconds.
    pub brain_timeout: Duration,

    /// Text sent to the chat when the brain fails or times out.
    /// `None` sends nothing.
    pub error_reply: Option<String>,

    /// How long to wait for in-flight messages after a shutdown signal
    /// before abandoning them. Default: 10 seconds.
    pub drain_timeout: Duration,

    /// Backoff settings for the update stream.
    pub reconnect: ReconnectConfig,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            process_private: true,
            process_groups: true,
            ignore_bots: false,
            send_typing_indicators: false,
            brain_timeout: DEFAULT_BRAIN_TIMEOUT,
            error_reply: None,
            drain_timeout: DEFAULT_DRAIN_TIMEOUT,
            reconnect: ReconnectConfig::default(),
        }
    }
}

impl ProcessorConfig {
    /// Create a config that answers brain failures with `reply`.
    pub fn with_error_reply(reply: impl Into<String>) -> Self {
        Self {
            error_reply: Some(reply.into()),
            ..Default::default()
        }
    }
}

/// Errors that can occur during message processing.
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// Error from the Bot API.
    #[error("telegram error: {0}")]
    Telegram(#[from] TelegramError),

    /// Error from the brain during processing.
    #[error("brain error: {0}")]
    Brain(#[from] BrainError),

    /// Brain processing timed out.
    #[error("brain processing timed out after {0:?}")]
    Timeout(Duration),

    /// The update stream ended unexpectedly.
    #[error("update stream ended")]
    StreamEnded,
}

/// Result of processing a single update.
#[derive(Debug)]
pub enum ProcessResult {
    /// Message was processed and the reply sent.
    Responded {
        sender: String,
        chat_id: i64,
        response: String,
        message_id: i64,
    },
    /// Update was skipped (e.g., not a text message, or filtered out).
    Skipped { reason: String },
    /// Error occurred during processing.
    Error(ProcessorError),
}

/// A message processor that receives Telegram updates and relays them
/// through a Brain.
///
/// Every update is handled on its own task, so a slow brain call for one
/// chat never holds up the others.
pub struct MessageProcessor<B: Brain> {
    client: TelegramClient,
    brain: Arc<B>,
    config: Arc<ProcessorConfig>,
}

impl<B: Brain> Clone for MessageProcessor<B> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            brain: Arc::clone(&self.brain),
            config: Arc::clone(&self.config),
        }
    }
}

impl<B: Brain + 'static> MessageProcessor<B> {
    /// Create a new message processor.
    pub fn new(client: TelegramClient, brain: B, config: ProcessorConfig) -> Self {
        Self {
            client,
            brain: Arc::new(brain),
            config: Arc::new(config),
        }
    }

    /// Create a processor with default configuration.
    pub fn with_defaults(client: TelegramClient, brain: B) -> Self {
        Self::new(client, brain, ProcessorConfig::default())
    }

    /// Get a reference to the brain.
    pub fn brain(&self) -> &B {
        &self.brain
    }

    /// Get a reference to the client.
    pub fn client(&self) -> &TelegramClient {
        &self.client
    }

    /// Get the processor configuration.
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Check if we should process this update, and convert it if so.
    fn should_process(&self, update: &Update) -> Result<InboundMessage, String> {
        let message = update
            .message
            .as_ref()
            .ok_or_else(|| "no message".to_string())?;

        if self.config.ignore_bots && message.is_from_bot() {
            return Err("message from a bot".to_string());
        }

        let is_private = message.chat.is_private();
        if is_private && !self.config.process_private {
            return Err("private messages disabled".to_string());
        }
        if !is_private && !self.config.process_groups {
            return Err("group messages disabled".to_string());
        }

        message
            .to_inbound_message()
            .ok_or_else(|| "no text content".to_string())
    }

    /// Process a single update and return the result.
    pub async fn process_update(&self, update: &Update) -> ProcessResult {
        let inbound = match self.should_process(update) {
            Ok(inbound) => inbound,
            Err(reason) => {
                debug!(update_id = update.update_id, "Skipping update: {}", reason);
                return ProcessResult::Skipped { reason };
            }
        };

        let sender = inbound.sender.clone();
        let chat_id = inbound.chat_id;
        info!(sender = %sender, chat_id, text = %inbound.text, "Received message");

        if self.config.send_typing_indicators {
            if let Err(e) = self.client.send_typing(chat_id).await {
                warn!(chat_id, "Failed to send typing indicator: {}", e);
            }
        }

        let response = match timeout(self.config.brain_timeout, self.brain.process(inbound)).await
        {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => {
                error!(sender = %sender, chat_id, "Brain error: {}", e);
                return self.report_failure(chat_id, ProcessorError::Brain(e)).await;
            }
            Err(_elapsed) => {
                error!(
                    sender = %sender,
                    chat_id,
                    "Brain processing timed out after {:?}",
                    self.config.brain_timeout
                );
                return self
                    .report_failure(chat_id, ProcessorError::Timeout(self.config.brain_timeout))
                    .await;
            }
        };

        match self
            .client
            .send_message(response.chat_id, &response.text)
            .await
        {
            Ok(sent) => {
                info!(
                    sender = %sender,
                    chat_id = response.chat_id,
                    message_id = sent.message_id,
                    "Sent reply"
                );
                ProcessResult::Responded {
                    sender,
                    chat_id: response.chat_id,
                    response: response.text,
                    message_id: sent.message_id,
                }
            }
            Err(e) => {
                error!(sender = %sender, chat_id = response.chat_id, "Failed to send reply: {}", e);
                ProcessResult::Error(ProcessorError::Telegram(e))
            }
        }
    }

    /// Send the configured error reply, if any, and wrap the failure.
    async fn report_failure(&self, chat_id: i64, err: ProcessorError) -> ProcessResult {
        if let Some(reply) = &self.config.error_reply {
            match self.client.send_message(chat_id, reply).await {
                Ok(_) => info!(chat_id, "Sent error reply"),
                Err(e) => error!(chat_id, "Failed to send error reply: {}", e),
            }
        }
        ProcessResult::Error(err)
    }

    /// Run the processor, handling messages until the update stream ends.
    ///
    /// This method consumes self and runs indefinitely.
    pub async fn run(self) -> Result<(), ProcessorError> {
        self.run_inner(std::future::pending(), log_result).await
    }

    /// Run the processor with a callback for each processed update.
    ///
    /// The callback receives each ProcessResult, allowing for custom handling.
    /// Results arrive in completion order, not update order.
    pub async fn run_with_callback<F>(self, callback: F) -> Result<(), ProcessorError>
    where
        F: FnMut(ProcessResult) + Send,
    {
        self.run_inner(std::future::pending(), callback).await
    }

    /// Run the processor with graceful shutdown support.
    ///
    /// This method runs until either:
    /// - The provided shutdown signal completes
    /// - The update stream ends
    ///
    /// In both cases in-flight messages get up to `drain_timeout` to finish
    /// before the brain is shut down.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use message_listener::{MessageProcessor, ProcessorConfig};
    /// use telegram_client::{TelegramClient, TelegramConfig};
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let client = TelegramClient::connect(TelegramConfig::from_env()?).await?;
    /// let brain = mock_brain::EchoBrain::default();
    /// let processor = MessageProcessor::with_defaults(client, brain);
    ///
    /// // Run until Ctrl+C (requires tokio "signal" feature)
    /// processor
    ///     .run_with_shutdown(async { tokio::signal::ctrl_c().await.ok(); })
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn run_with_shutdown<S>(self, shutdown_signal: S) -> Result<(), ProcessorError>
    where
        S: Future<Output = ()> + Send,
    {
        self.run_inner(shutdown_signal, log_result).await
    }

    async fn run_inner<S, F>(self, shutdown_signal: S, mut callback: F) -> Result<(), ProcessorError>
    where
        S: Future<Output = ()> + Send,
        F: FnMut(ProcessResult) + Send,
    {
        info!(brain = self.brain.name(), "Starting message processor");

        let mut stream =
            telegram_client::subscribe_with_reconnect(&self.client, self.config.reconnect.clone());
        let mut tasks: JoinSet<ProcessResult> = JoinSet::new();

        tokio::pin!(shutdown_signal);

        let outcome = loop {
            tokio::select! {
                biased;

                // Check for shutdown signal first
                () = &mut shutdown_signal => {
                    info!("Shutdown signal received, stopping message processor");
                    break Ok(());
                }

                // Collect finished messages
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    handle_joined(joined, &mut callback);
                }

                // Then dispatch new ones
                result = stream.next() => {
                    match result {
                        Some(Ok(update)) => {
                            let processor = self.clone();
                            tasks.spawn(async move { processor.process_update(&update).await });
                        }
                        Some(Err(e)) => {
                            error!("Update stream error: {}", e);
                            callback(ProcessResult::Error(ProcessorError::Telegram(e)));
                        }
                        None => {
                            warn!("Update stream ended");
                            break Err(ProcessorError::StreamEnded);
                        }
                    }
                }
            }
        };

        drop(stream);
        self.drain(&mut tasks, &mut callback).await;

        if let Err(e) = self.brain.shutdown().await {
            warn!("Error during brain shutdown: {}", e);
        }

        outcome
    }

    /// Wait for in-flight messages, aborting whatever is left after `drain_timeout`.
    async fn drain<F>(&self, tasks: &mut JoinSet<ProcessResult>, callback: &mut F)
    where
        F: FnMut(ProcessResult) + Send,
    {
        if tasks.is_empty() {
            return;
        }

        info!(in_flight = tasks.len(), "Waiting for in-flight messages");
        let drained = timeout(self.config.drain_timeout, async {
            while let Some(joined) = tasks.join_next().await {
                handle_joined(joined, &mut *callback);
            }
        })
        .await;

        if drained.is_err() {
            warn!(
                abandoned = tasks.len(),
                "Drain timed out after {:?}, aborting remaining messages",
                self.config.drain_timeout
            );
            tasks.shutdown().await;
        }
    }

    /// Run the processor until Ctrl+C is pressed.
    ///
    /// This is a convenience method that wraps [`run_with_shutdown`](Self::run_with_shutdown)
    /// with the default Ctrl+C signal handler.
    #[cfg(feature = "signal")]
    pub async fn run_until_stopped(self) -> Result<(), ProcessorError> {
        let shutdown = async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for Ctrl+C: {}", e);
                std::future::pending::<()>().await;
            }
        };
        self.run_with_shutdown(shutdown).await
    }
}

fn handle_joined<F>(joined: Result<ProcessResult, JoinError>, callback: &mut F)
where
    F: FnMut(ProcessResult),
{
    match joined {
        Ok(result) => callback(result),
        Err(e) => error!("Message task failed: {}", e),
    }
}

fn log_result(result: ProcessResult) {
    match result {
        ProcessResult::Responded { sender, response, .. } => {
            debug!("Responded to {}: {}", sender, response);
        }
        ProcessResult::Skipped { reason } => {
            debug!("Skipped: {}", reason);
        }
        ProcessResult::Error(e) => {
            // Log but continue processing
            warn!("Error processing message: {}", e);
        }
    }
}
