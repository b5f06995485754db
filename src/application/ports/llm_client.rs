use std::pin::Pin;

use async_trait::async_trait;
use futures::stream::Stream;

pub type LlmTokenStream =
    Pin<Box<dyn Stream<Item = Result<String, LlmClientError>> + Send + 'static>>;

/// Result of a single inference call.
///
/// `Streaming` yields fragments that concatenate, in arrival order, to the
/// full answer. The stream is finite and cannot be restarted.
pub enum InferenceOutput {
    Complete(String),
    Streaming(LlmTokenStream),
}

impl std::fmt::Debug for InferenceOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Complete(text) => f.debug_tuple("Complete").field(text).finish(),
            Self::Streaming(_) => f.write_str("Streaming(..)"),
        }
    }
}

#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmClientError>;

    async fn complete_stream(&self, prompt: &str) -> Result<LlmTokenStream, LlmClientError>;

    async fn infer(
        &self,
        prompt: &str,
        streaming: bool,
    ) -> Result<InferenceOutput, LlmClientError> {
        if streaming {
            self.complete_stream(prompt)
                .await
                .map(InferenceOutput::Streaming)
        } else {
            self.complete(prompt).await.map(InferenceOutput::Complete)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmClientError {
    #[error("api request failed: {0}")]
    ApiRequestFailed(String),
    #[error("request timed out")]
    Timeout,
    #[error("rate limited")]
    RateLimited,
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("invalid configuration: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::InvalidResponse(e.to_string())
        } else {
            Self::ApiRequestFailed(e.to_string())
        }
    }
}
