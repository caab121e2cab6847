//! Telegram relay bot.
//!
//! Forwards every text message to the OpenAI chat completions API with a
//! prompt prefix and replies with the completion.

mod config;

use std::process::ExitCode;

use brain_core::{Brain, BrainError};
use message_listener::{MessageProcessor, ProcessorError};
use openai_brain::OpenAiBrain;
use telegram_client::{TelegramClient, TelegramError};
use thiserror::Error;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigError, RelayConfig};

/// Errors that stop the bot.
#[derive(Debug, Error)]
enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("could not connect to Telegram: {0}")]
    Telegram(#[from] TelegramError),

    #[error("could not initialise brain: {0}")]
    Brain(#[from] BrainError),

    #[error("message processor stopped: {0}")]
    Processor(#[from] ProcessorError),
}

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), StartupError> {
    let config = RelayConfig::from_env()?;

    let client = TelegramClient::connect(config.telegram).await?;
    let brain = OpenAiBrain::new(config.openai)?;

    info!(
        brain = brain.name(),
        model = %brain.config().model,
        prompt_bytes = brain.prompt().len(),
        "Relay bot ready"
    );

    let processor = MessageProcessor::new(client, brain, config.processor);
    processor.run_until_stopped().await?;

    info!("Relay bot stopped");
    Ok(())
}
