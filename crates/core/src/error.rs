//! Unified error types for jobscout.
//!
//! Every variant carries a stable code prefix in its display string so log
//! lines and tool responses can be grepped by failure kind.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Unified error types for the extraction pipeline and its front ends.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty URL).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// URL could not be parsed or uses an unsupported scheme.
    #[error("INVALID_URL: {0}")]
    InvalidUrl(String),

    /// Host resolves to a private/internal address or does not resolve at all.
    #[error("INVALID_HOST: {0}")]
    InvalidHost(String),

    /// Both fetch tiers were exhausted without producing text.
    #[error("FETCH_FAILED: {url}: {reason}")]
    FetchFailed { url: String, reason: String },

    /// Headless navigation exceeded its bound.
    #[error("RENDER_TIMEOUT: {url} after {timeout_ms}ms")]
    RenderTimeout { url: String, timeout_ms: u64 },

    /// The language model call itself failed.
    #[error("ANALYSIS_FAILED: {0}")]
    AnalysisFailed(String),

    /// No language model is configured.
    #[error("ANALYZER_UNAVAILABLE: {0}")]
    AnalyzerUnavailable(String),

    /// Local setup failed before any request was made (e.g., bad header config).
    #[error("CLIENT_SETUP: {0}")]
    ClientSetup(String),
}

impl Error {
    /// HTTP-equivalent status for an endpoint layer.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::InvalidInput(_) | Error::InvalidUrl(_) | Error::InvalidHost(_) => 400,
            Error::FetchFailed { .. } | Error::RenderTimeout { .. } | Error::AnalysisFailed(_) => 502,
            Error::AnalyzerUnavailable(_) | Error::ClientSetup(_) => 500,
        }
    }

    /// Whether the failure came from an upstream collaborator (page host, browser, model).
    pub fn is_upstream(&self) -> bool {
        self.status_code() == 502
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let code = match &err {
            Error::InvalidInput(_) => -32602,
            Error::InvalidUrl(_) => -32003,
            Error::InvalidHost(_) => -32004,
            Error::FetchFailed { .. } => -32008,
            Error::RenderTimeout { .. } => -32012,
            Error::AnalysisFailed(_) => -32013,
            Error::AnalyzerUnavailable(_) => -32014,
            Error::ClientSetup(_) => -32603,
        };

        McpError { code: ErrorCode(code), message: err.to_string().into(), data: None }
    }
}
