//! Simple echo bot example.
//!
//! Run with: cargo run -p telegram-client --example echo_bot
//!
//! Configuration via .env file or environment variables:
//!   TELEGRAM_TOKEN   - Bot token (required)
//!   TELEGRAM_API_URL - Bot API base URL (default: https://api.telegram.org)

use futures::StreamExt;
use telegram_client::{subscribe, TelegramClient, TelegramConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present (from project root)
    let _ = dotenvy::from_path("../../.env");

    let config = TelegramConfig::from_env()?;
    println!("Connecting to {}...", config.api_url);

    let client = TelegramClient::connect(config).await?;
    if let Some(me) = client.bot_user() {
        println!("Connected as @{}", me.username.as_deref().unwrap_or("?"));
    }
    println!("Send a message to the bot to test.");
    println!("Press Ctrl+C to stop.\n");

    let mut stream = subscribe(&client);

    while let Some(result) = stream.next().await {
        match result {
            Ok(update) => {
                let Some(message) = update.message else {
                    continue;
                };
                let sender = message.sender_id();

                if let Some(text) = &message.text {
                    println!("[{}] Received: {}", sender, text);

                    // Echo back
                    let reply = format!("Echo: {}", text);
                    match client.send_message(message.chat.id, &reply).await {
                        Ok(sent) => {
                            println!("[{}] Sent reply (id={})", sender, sent.message_id);
                        }
                        Err(e) => {
                            eprintln!("[{}] Failed to send: {}", sender, e);
                        }
                    }
                }
            }
            Err(e) => {
                eprintln!("Stream error: {}", e);
            }
        }
    }

    Ok(())
}
