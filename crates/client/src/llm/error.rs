//! Chat-completions client error types.

use std::sync::Arc;

/// Errors from the language-model client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LlmError {
    /// Missing JOBSCOUT_LLM_API_KEY.
    #[error("missing API key: JOBSCOUT_LLM_API_KEY not set")]
    MissingApiKey,

    /// Authentication failed (invalid API key).
    #[error("authentication failed: invalid API key")]
    AuthError,

    /// Rate limited by the provider.
    #[error("rate limited: too many requests")]
    RateLimited,

    /// HTTP error response.
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Network error.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),

    /// Provider envelope could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Provider returned no message content.
    #[error("empty completion")]
    EmptyCompletion,
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { LlmError::Timeout } else { LlmError::Network(Arc::new(err)) }
    }
}
