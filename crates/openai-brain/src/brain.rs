//! OpenAiBrain implementation using the OpenAI chat completions API.

use std::sync::Arc;

use brain_core::{
    async_trait, hash_prompt, load_prompt, wrap_input, Brain, BrainError, InboundMessage,
    OutboundMessage,
};
use tracing::{debug, info};

use crate::client::CompletionClient;
use crate::config::OpenAiBrainConfig;

/// A brain that prefixes every message with a fixed prompt and asks the
/// OpenAI API for a completion.
///
/// The prompt is read once at construction and never re-read. The brain keeps
/// no per-sender state, so concurrent `process` calls are independent.
pub struct OpenAiBrain {
    client: CompletionClient,
    prompt: Arc<str>,
}

impl OpenAiBrain {
    /// Create a new OpenAiBrain, loading the prompt from `config.prompt_file`.
    pub fn new(config: OpenAiBrainConfig) -> Result<Self, BrainError> {
        let prompt = load_prompt(&config.prompt_file);
        Self::with_prompt(config, prompt)
    }

    /// Create a new OpenAiBrain with an already loaded prompt.
    pub fn with_prompt(
        config: OpenAiBrainConfig,
        prompt: impl Into<Arc<str>>,
    ) -> Result<Self, BrainError> {
        let prompt = prompt.into();
        let client = CompletionClient::new(config)?;

        info!(
            "OpenAiBrain initialized with model: {}, prompt bytes: {}",
            client.config().model,
            prompt.len()
        );

        Ok(Self { client, prompt })
    }

    /// Create an OpenAiBrain from environment variables.
    ///
    /// See [`OpenAiBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        let config = OpenAiBrainConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiBrainConfig {
        self.client.config()
    }

    /// The loaded prompt prefix.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// SHA-256 fingerprint of the prompt, computed on demand.
    pub fn prompt_hash(&self) -> String {
        hash_prompt(&self.prompt)
    }

    /// Text that will be sent to the completion endpoint for `user_text`.
    pub fn combined_input(&self, user_text: &str) -> String {
        wrap_input(&self.prompt, user_text)
    }
}

#[async_trait]
impl Brain for OpenAiBrain {
    async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError> {
        debug!("Processing message from {}: {}", message.sender, message.text);

        let input = self.combined_input(&message.text);
        let reply = self.client.complete(&input).await;

        Ok(OutboundMessage::reply_to(&message, reply))
    }

    fn name(&self) -> &str {
        "OpenAiBrain"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> OpenAiBrainConfig {
        OpenAiBrainConfig::builder().api_key("sk-test").build()
    }

    #[test]
    fn test_brain_name() {
        let brain = OpenAiBrain::with_prompt(test_config(), "").unwrap();
        assert_eq!(brain.name(), "OpenAiBrain");
    }

    #[test]
    fn test_prompt_hash_matches_loaded_prompt() {
        let brain = OpenAiBrain::with_prompt(test_config(), "Answer like a pirate.").unwrap();
        assert_eq!(brain.prompt_hash(), hash_prompt("Answer like a pirate."));
    }

    #[test]
    fn test_combined_input() {
        let brain = OpenAiBrain::with_prompt(test_config(), "Answer like a pirate.").unwrap();
        assert_eq!(
            brain.combined_input("where is the treasure?"),
            "Answer like a pirate.\nwhere is the treasure?"
        );
    }

    #[test]
    fn test_missing_prompt_file_gives_empty_prefix() {
        let dir = tempfile::tempdir().unwrap();
        let config = OpenAiBrainConfig::builder()
            .api_key("sk-test")
            .prompt_file(dir.path().join("missing.txt"))
            .build();

        let brain = OpenAiBrain::new(config).unwrap();
        assert_eq!(brain.prompt(), "");
        assert_eq!(brain.combined_input("hi"), "\nhi");
    }
}
