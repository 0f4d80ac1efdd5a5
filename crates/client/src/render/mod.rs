//! Headless browser rendering for JS-heavy job boards.
//!
//! This module provides the renderer trait used by the fallback tier and,
//! behind the `render` feature, an implementation using chromiumoxide for
//! headless Chrome/Chromium browser control.

#[cfg(feature = "render")]
mod chromium;

#[cfg(feature = "render")]
pub use chromium::ChromiumRenderer;

use std::time::Duration;
use thiserror::Error;
use url::Url;

use jobscout_core::AppConfig;

/// Errors that can occur during page rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Failed to launch or connect to browser.
    #[error("browser launch failed: {0}")]
    BrowserLaunch(String),

    /// Failed to navigate to URL.
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// Failed to get page content.
    #[error("content retrieval failed: {0}")]
    ContentRetrieval(String),

    /// Timeout waiting for page to load.
    #[error("render timeout after {0}ms")]
    Timeout(u64),
}

/// Options for rendering a page.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Navigation timeout in milliseconds (default: 30000).
    pub timeout_ms: u64,

    /// Fixed wait after navigation for async content (default: 5000).
    pub settle_ms: u64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for RenderOptions {
    fn from(config: &AppConfig) -> Self {
        Self { timeout_ms: config.render_timeout_ms, settle_ms: config.render_settle_ms }
    }
}

impl RenderOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn settle(&self) -> Duration {
        Duration::from_millis(self.settle_ms)
    }
}

/// Result of rendering a page.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Rendered HTML content.
    pub html: String,

    /// Final URL after redirects.
    pub final_url: Url,

    /// Time taken to render in milliseconds.
    pub render_time_ms: u64,
}

/// Renderer trait for headless browser page rendering.
///
/// Implementations own the whole browser lifecycle of one call: nothing
/// may outlive `render`, whichever way it returns.
#[async_trait::async_trait]
pub trait Renderer: Send + Sync {
    /// Render a URL to HTML via headless browser.
    async fn render(&self, url: &Url, opts: &RenderOptions) -> Result<RenderedPage, RenderError>;
}
