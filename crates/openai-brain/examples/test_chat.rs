//! Simple test for OpenAiBrain chat completion.
//!
//! Run with: cargo run -p openai-brain --example test_chat
//! Or with a custom message: cargo run -p openai-brain --example test_chat -- "Your message here"
//!
//! Make sure to set environment variables in .env:
//!   OPENAI_API_KEY - OpenAI API key for authentication
//!   PROMPT_FILE    - Prompt prefix file (default: prompt.txt)

use openai_brain::{Brain, InboundMessage, OpenAiBrain};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Get message from command line args or use default
    let args: Vec<String> = env::args().collect();
    let message_text = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        "Hello! Please respond with a short greeting.".to_string()
    };

    println!("Initializing OpenAiBrain...");
    let brain = OpenAiBrain::from_env()?;

    println!("Brain initialized: {}", brain.name());
    println!("API URL: {}", brain.config().api_url);
    println!("Model: {}", brain.config().model);
    if brain.prompt().is_empty() {
        println!("Prompt: (none)");
    } else {
        let preview: String = brain.prompt().chars().take(50).collect();
        let suffix = if brain.prompt().chars().count() > 50 { "..." } else { "" };
        println!("Prompt: \"{}{}\"", preview, suffix);
    }
    println!();

    let test_message = InboundMessage::new("1234567890", 1234567890, &message_text, 0);

    println!("Sending: \"{}\"", test_message.text);
    println!("Waiting for response...\n");

    let response = brain.process(test_message).await?;

    println!("=== Response ===");
    println!("{}", response.text);
    println!("================");

    Ok(())
}
