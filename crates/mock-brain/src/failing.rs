//! Failing brain implementation - rejects every message.

use brain_core::{async_trait, Brain, BrainError, InboundMessage, OutboundMessage};

/// A brain that fails every message with a copy of the configured error.
///
/// Useful for testing the error reply path of a processor.
#[derive(Debug, Clone)]
pub struct FailingBrain {
    error: BrainError,
}

impl FailingBrain {
    /// Create a brain that fails with the given error.
    pub fn new(error: BrainError) -> Self {
        Self { error }
    }

    /// Create a brain that reports an upstream API failure.
    pub fn api_error(status: u16) -> Self {
        Self::new(BrainError::Api {
            status,
            body: "mock failure".to_string(),
        })
    }
}

impl Default for FailingBrain {
    fn default() -> Self {
        Self::new(BrainError::ProcessingFailed("mock failure".to_string()))
    }
}

#[async_trait]
impl Brain for FailingBrain {
    async fn process(&self, _message: InboundMessage) -> Result<OutboundMessage, BrainError> {
        Err(self.error.clone())
    }

    fn name(&self) -> &str {
        "FailingBrain"
    }
}
