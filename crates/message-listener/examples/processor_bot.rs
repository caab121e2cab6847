//! Echo bot example using MessageProcessor.
//!
//! This example demonstrates how to create a simple bot that echoes
//! all incoming messages using the MessageProcessor and EchoBrain.
//! It sends typing indicators while processing messages.
//!
//! Run with: cargo run -p message-listener --example processor_bot
//!
//! Configuration via .env file or environment variables:
//!   TELEGRAM_TOKEN   - Bot token (required)
//!   TELEGRAM_API_URL - Bot API base URL (default: https://api.telegram.org)

use message_listener::{MessageProcessor, ProcessorConfig};
use mock_brain::{Brain, EchoBrain};
use telegram_client::{TelegramClient, TelegramConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (searches current dir and parents)
    let _ = dotenvy::dotenv();

    // Initialize tracing for logging
    tracing_subscriber::fmt::init();

    let config = TelegramConfig::from_env()?;
    println!("Connecting to {}...", config.api_url);

    let client = TelegramClient::connect(config).await?;
    println!("Connected!");

    // Create the brain
    let brain = EchoBrain::with_prefix("Echo: ");
    println!("Using brain: {}", brain.name());

    let config = ProcessorConfig {
        send_typing_indicators: true,
        ..Default::default()
    };

    // Create and run the processor
    let processor = MessageProcessor::new(client, brain, config);

    println!("\nEcho bot is running!");
    println!("Send a message to the bot to test.");
    println!("Press Ctrl+C to stop.\n");

    processor
        .run_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    Ok(())
}
