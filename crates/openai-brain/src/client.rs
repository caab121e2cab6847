//! Completion client for the OpenAI chat completions endpoint.

use brain_core::BrainError;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, info, warn};

use crate::api_types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::config::OpenAiBrainConfig;

/// Reply shown to the user whenever a completion cannot be produced.
pub const FALLBACK_REPLY: &str = "Sorry, an error occurred while processing your request.";

/// Issues one chat completion request per call. Holds no per-request state,
/// so a single instance is shared by every message task.
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http: Client,
    config: OpenAiBrainConfig,
}

impl CompletionClient {
    /// Create a new client. The request timeout is taken from the config.
    pub fn new(config: OpenAiBrainConfig) -> Result<Self, BrainError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get the configuration.
    pub fn config(&self) -> &OpenAiBrainConfig {
        &self.config
    }

    fn build_request(&self, text: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(text)],
            max_tokens: self.config.max_tokens,
            n: self.config.n,
            stop: None,
            temperature: self.config.temperature,
        }
    }

    /// Request a completion for `text` and return the first choice's content.
    pub async fn try_complete(&self, text: &str) -> Result<String, BrainError> {
        let request = self.build_request(text);
        debug!(model = %request.model, input_len = text.len(), "Sending completion request");

        let response = self
            .http
            .post(self.config.completions_url())
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BrainError::Timeout
                } else {
                    BrainError::Network(format!("Failed to send request: {}", e))
                }
            })?;

        let status = response.status();
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let body = response.text().await.map_err(|e| {
            if e.is_timeout() {
                BrainError::Timeout
            } else {
                BrainError::Network(format!("Failed to read response body: {}", e))
            }
        })?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            warn!(retry_after = ?retry_after, "OpenAI API rate limit hit");
            return Err(BrainError::RateLimited { retry_after, body });
        }

        if status != StatusCode::OK {
            return Err(BrainError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&body).map_err(|e| {
            BrainError::InvalidResponse(format!("Failed to parse response: {}; body: {}", e, body))
        })?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                BrainError::InvalidResponse(format!("No message content in response: {}", body))
            })
    }

    /// Request a completion, mapping every failure to [`FALLBACK_REPLY`].
    ///
    /// Failures are logged at error level with the status code and raw body
    /// when the API returned one.
    pub async fn complete(&self, text: &str) -> String {
        match self.try_complete(text).await {
            Ok(content) => {
                info!(response_len = content.len(), "Received completion from OpenAI API");
                content
            }
            Err(BrainError::Api { status, body }) => {
                error!(status, body = %body, "OpenAI API request failed");
                FALLBACK_REPLY.to_string()
            }
            Err(BrainError::RateLimited { retry_after, body }) => {
                error!(status = 429u16, retry_after = ?retry_after, body = %body, "OpenAI API request failed");
                FALLBACK_REPLY.to_string()
            }
            Err(e) => {
                error!(error = %e, "OpenAI API request failed");
                FALLBACK_REPLY.to_string()
            }
        }
    }
}
