//! External text generation capability

use async_trait::async_trait;

use crate::selection::JustificationRequest;

/// Writes a justification sentence for one agent
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait JustificationService: Send + Sync {
    /// Generate the justification text
    async fn generate(&self, request: &JustificationRequest) -> Result<String, GenerationError>;

    /// Short name for logs
    fn name(&self) -> &'static str;
}

/// Errors from text generation, always recovered by the template fallback
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Service returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("Empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationError::Timeout
        } else if err.is_decode() {
            GenerationError::Malformed(err.to_string())
        } else {
            GenerationError::Transport(err.to_string())
        }
    }
}
