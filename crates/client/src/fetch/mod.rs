//! Plain HTTP fetch (the fast path) with SSRF protection.
//!
//! ### URL Canonicalization
//! - Trim whitespace, ensure scheme (default: `https`)
//! - Lowercase host, remove fragments
//! - Preserve query string
//!
//! ### SSRF & Safety Gates
//! - Deny private ranges (RFC1918, link-local, localhost, etc.)
//! - Resolve DNS and validate all A/AAAA answers are public; fail closed.
//! - Redirects are followed by hand (max 5); a hop onto another host is
//!   resolved and guarded like the original URL.
//! - Max body bytes: 5MB (configurable)
//!
//! ### Browser-like Request Headers
//! - Desktop User-Agent and Accept-Language; ATS hosts often reject
//!   default client headers.

pub mod ssrf;
pub mod url;

use bytes::Bytes;
use reqwest::Url;
use reqwest::{Client, StatusCode, header};
use std::time::{Duration, Instant};

pub use ssrf::{SsrfError, check_url, is_private_host, validate_ip};
pub use self::url::{UrlError, canonicalize};

use jobscout_core::AppConfig;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: desktop Chrome)
    pub user_agent: String,

    /// Accept-Language header (default: "en-US,en;q=0.9")
    pub accept_language: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 15s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            accept_language: config.accept_language.clone(),
            max_bytes: config.max_bytes,
            timeout: config.fetch_timeout(),
            max_redirects: config.max_redirects,
        }
    }
}

/// Errors from the plain HTTP fetch.
///
/// These never reach callers of the pipeline directly: any of them
/// escalates to the render fallback.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// Failed to build the HTTP client.
    #[error("client setup failed: {0}")]
    Client(String),

    /// Request timed out.
    #[error("request timeout after {0:?}")]
    Timeout(Duration),

    /// Network or protocol error.
    #[error("network error: {0}")]
    Network(String),

    /// Redirect refused: bad target, private target, or too many hops.
    #[error("redirect refused: {0}")]
    Redirect(String),

    /// Non-success HTTP status.
    #[error("status {0}")]
    Status(u16),

    /// Response body too large.
    #[error("{size} bytes exceeds {limit}")]
    TooLarge { size: usize, limit: usize },
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header
    pub content_type: Option<String>,
    /// Response body bytes
    pub bytes: Bytes,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

impl FetchResponse {
    /// Response body as (lossily decoded) HTML.
    pub fn html(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}

/// Source of raw page HTML for the fast path.
#[async_trait::async_trait]
pub trait PageFetcher: Send + Sync {
    /// Issue a single GET for `url`.
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError>;
}

/// HTTP fetch client with browser-like headers and safety limits.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        default_headers.insert(
            header::ACCEPT_LANGUAGE,
            header::HeaderValue::from_str(&config.accept_language).map_err(|e| FetchError::Client(e.to_string()))?,
        );

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .default_headers(default_headers)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::none())
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| FetchError::Client(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Check one redirect hop before following it.
    ///
    /// Same-host hops were already covered by the caller's guard. A hop to
    /// another host must pass the SSRF check again.
    async fn guard_redirect(&self, from: &Url, to: &Url) -> Result<(), FetchError> {
        if !matches!(to.scheme(), "http" | "https") {
            return Err(FetchError::Redirect(format!("unsupported scheme in {to}")));
        }
        if to.host_str() == from.host_str() {
            return Ok(());
        }
        check_url(to)
            .await
            .map(|_| ())
            .map_err(|e| FetchError::Redirect(format!("{to}: {e}")))
    }

    fn map_reqwest(&self, err: reqwest::Error) -> FetchError {
        if err.is_timeout() { FetchError::Timeout(self.config.timeout) } else { FetchError::Network(err.to_string()) }
    }
}

#[async_trait::async_trait]
impl PageFetcher for FetchClient {
    /// Fetch a URL, returning raw bytes and metadata.
    ///
    /// The caller is responsible for running the SSRF guard first.
    async fn fetch(&self, url: &Url) -> Result<FetchResponse, FetchError> {
        let start = Instant::now();

        let mut current = url.clone();
        let mut hops = 0;
        let response = loop {
            let response = self
                .http
                .get(current.as_str())
                .send()
                .await
                .map_err(|e| self.map_reqwest(e))?;

            if !response.status().is_redirection() {
                break response;
            }
            let location = response
                .headers()
                .get(header::LOCATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned);
            let Some(location) = location else {
                break response;
            };

            let next = current
                .join(&location)
                .map_err(|e| FetchError::Redirect(format!("bad Location {location:?}: {e}")))?;

            hops += 1;
            if hops > self.config.max_redirects {
                return Err(FetchError::Redirect(format!("too many redirects (max {})", self.config.max_redirects)));
            }

            self.guard_redirect(&current, &next).await?;
            tracing::debug!("redirect {} -> {}", current, next);
            current = next;
        };

        let status = response.status();

        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(FetchError::TooLarge { size: len as usize, limit: self.config.max_bytes });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let bytes = response.bytes().await.map_err(|e| self.map_reqwest(e))?;

        if bytes.len() > self.config.max_bytes {
            return Err(FetchError::TooLarge { size: bytes.len(), limit: self.config.max_bytes });
        }

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!("fetched {} -> {} in {}ms ({} bytes)", url, final_url, fetch_ms, bytes.len());

        Ok(FetchResponse { url: url.clone(), final_url, status, content_type, bytes, fetch_ms })
    }
}
