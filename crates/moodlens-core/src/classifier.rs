//! Remote sentiment classification seam.

use crate::analysis::Prompt;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Failure of a single remote classification call.
///
/// Transient and permanent failures are reported with the same variants;
/// `is_retryable` is informational only and nothing retries on it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    /// The request never produced an HTTP response (DNS, connect, TLS...).
    #[error("request failed: {message}")]
    Request { message: String, is_retryable: bool },

    /// The service answered with a non-success status.
    #[error("HTTP {status_code}: {message}")]
    Http {
        status_code: u16,
        message: String,
        is_retryable: bool,
        retry_after: Option<Duration>,
    },

    /// The reply was well formed but carried no text.
    #[error("model returned no text")]
    EmptyResponse,

    /// The reply body could not be decoded.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// No reply arrived within the configured time limit.
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The classifier is not usable with the current configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ClassifierError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Request { is_retryable, .. } | Self::Http { is_retryable, .. } => *is_retryable,
            Self::Timeout(_) => true,
            Self::EmptyResponse | Self::MalformedResponse(_) | Self::Config(_) => false,
        }
    }
}

/// A remote model that turns a prompt into free text.
///
/// Authentication, transport and model selection are the implementor's
/// concern; callers only see the prompt going in and text coming out.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    /// Short human-readable name, used in logs.
    fn name(&self) -> &str;

    /// Sends the prompt and returns the model's raw reply.
    async fn classify(&self, prompt: &Prompt) -> Result<String, ClassifierError>;
}
