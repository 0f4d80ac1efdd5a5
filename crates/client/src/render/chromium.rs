//! chromiumoxide-backed renderer.
//!
//! A fresh browser process is launched for every render and torn down on
//! every exit path, including failed or timed-out navigation.

use std::time::Instant;

use chromiumoxide::browser::{Browser, BrowserConfig};
use futures_util::StreamExt;
use url::Url;

use super::{RenderError, RenderOptions, RenderedPage, Renderer};

/// Headless Chrome/Chromium renderer using chromiumoxide.
#[derive(Debug, Clone, Default)]
pub struct ChromiumRenderer {
    /// Explicit browser binary; chromiumoxide searches the usual locations when unset.
    pub executable: Option<std::path::PathBuf>,
}

impl ChromiumRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn browser_config(&self) -> Result<BrowserConfig, RenderError> {
        let mut builder = BrowserConfig::builder();
        if let Some(path) = &self.executable {
            builder = builder.chrome_executable(path);
        }
        builder.build().map_err(RenderError::BrowserLaunch)
    }
}

/// Navigate, let the page settle, and capture the DOM.
async fn capture(browser: &Browser, url: &Url, opts: &RenderOptions) -> Result<RenderedPage, RenderError> {
    let start = Instant::now();

    let page = tokio::time::timeout(opts.timeout(), browser.new_page(url.as_str()))
        .await
        .map_err(|_| RenderError::Timeout(opts.timeout_ms))?
        .map_err(|e| RenderError::Navigation(e.to_string()))?;

    tokio::time::sleep(opts.settle()).await;

    let html = page
        .content()
        .await
        .map_err(|e| RenderError::ContentRetrieval(e.to_string()))?;

    let page_url = page
        .url()
        .await
        .map_err(|e| RenderError::ContentRetrieval(e.to_string()))?;

    let final_url = page_url
        .as_deref()
        .and_then(|u| Url::parse(u).ok())
        .unwrap_or_else(|| url.clone());

    page.close().await.ok();

    Ok(RenderedPage { html, final_url, render_time_ms: start.elapsed().as_millis() as u64 })
}

#[async_trait::async_trait]
impl Renderer for ChromiumRenderer {
    async fn render(&self, url: &Url, opts: &RenderOptions) -> Result<RenderedPage, RenderError> {
        let (mut browser, mut handler) = Browser::launch(self.browser_config()?)
            .await
            .map_err(|e| RenderError::BrowserLaunch(e.to_string()))?;

        let events = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("browser handler event error: {e}");
                    break;
                }
            }
        });

        let result = capture(&browser, url, opts).await;

        if let Err(e) = browser.close().await {
            tracing::debug!("browser close failed: {e}");
        }
        if let Err(e) = browser.wait().await {
            tracing::debug!("browser wait failed: {e}");
        }
        events.abort();

        match &result {
            Ok(page) => tracing::debug!("rendered {} in {}ms", url, page.render_time_ms),
            Err(e) => tracing::debug!("render of {} failed: {e}", url),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renderer_default_uses_discovered_browser() {
        let renderer = ChromiumRenderer::new();
        assert!(renderer.executable.is_none());
    }

    #[tokio::test]
    #[ignore = "requires network and Chrome/Chromium"]
    async fn test_render_simple_page() {
        let renderer = ChromiumRenderer::new();
        let url = Url::parse("https://example.com").unwrap();
        let opts = RenderOptions { timeout_ms: 30_000, settle_ms: 500 };

        let page = renderer.render(&url, &opts).await.unwrap();
        assert!(page.html.contains("Example Domain"));
        assert_eq!(page.final_url.as_str(), "https://example.com/");
    }
}
