//! Bot API response envelope.

use serde::Deserialize;

use crate::error::TelegramError;

/// Every Bot API method answers with this envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded.
    pub ok: bool,

    /// Method result, present when `ok` is true.
    pub result: Option<T>,

    /// Human-readable error description.
    #[serde(default)]
    pub description: Option<String>,

    /// Error code, mirrors the HTTP status.
    #[serde(default)]
    pub error_code: Option<i32>,

    /// Extra information about a failed request.
    #[serde(default)]
    pub parameters: Option<ResponseParameters>,
}

/// Extra information about why a request failed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ResponseParameters {
    /// Seconds to wait before repeating a flood-limited request.
    #[serde(default)]
    pub retry_after: Option<u64>,

    /// The group was migrated to a supergroup with this id.
    #[serde(default)]
    pub migrate_to_chat_id: Option<i64>,
}

impl<T> ApiResponse<T> {
    /// Convert the envelope into the method result.
    pub fn into_result(self) -> Result<T, TelegramError> {
        if !self.ok {
            return Err(TelegramError::Api {
                code: self.error_code.unwrap_or(-1),
                description: self
                    .description
                    .unwrap_or_else(|| "unknown error".to_string()),
                retry_after: self.parameters.and_then(|p| p.retry_after),
            });
        }

        self.result.ok_or_else(|| TelegramError::Api {
            code: -1,
            description: "No result in response".to_string(),
            retry_after: None,
        })
    }
}
