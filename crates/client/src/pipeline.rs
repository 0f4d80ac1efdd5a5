//! Job-description extraction pipeline.
//!
//! Guard, fetch, select, sanitize, and optionally analyze. Tier 1 is a plain
//! GET; a failed or thin Tier-1 result escalates exactly once to a headless
//! render.

use serde::Serialize;
use url::Url;

use jobscout_core::{AppConfig, Error};

use crate::analyze::{Analysis, Analyzer};
use crate::extract::{extract_text, truncate_chars};
use crate::fetch::{FetchClient, FetchConfig, PageFetcher, canonicalize, check_url};
use crate::render::{RenderError, RenderOptions, Renderer};

/// Which fetch tier produced the text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Http,
    Rendered,
}

/// Cleaned job-description text for one URL.
#[derive(Debug, Clone, Serialize)]
pub struct Extraction {
    pub url: String,
    pub text: String,
    pub chars: usize,
    #[serde(skip)]
    pub tier: Tier,
}

/// Analysis of the text behind one URL.
#[derive(Debug, Clone, Serialize)]
pub struct UrlAnalysis {
    pub url: String,
    pub jd_chars: usize,
    #[serde(flatten)]
    pub analysis: Analysis,
}

/// Thresholds and budgets for the pipeline.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Tier-1 text must exceed this many characters to skip rendering.
    pub min_text_chars: usize,
    /// Cap on returned extraction text.
    pub max_extract_chars: usize,
    /// Cap on text handed to the analyzer.
    pub max_analysis_chars: usize,
    pub render: RenderOptions,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for PipelineConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            min_text_chars: config.min_text_chars,
            max_extract_chars: config.max_extract_chars,
            max_analysis_chars: config.max_analysis_chars,
            render: RenderOptions::from(config),
        }
    }
}

/// Two-tier extraction pipeline with an optional analyzer.
pub struct JdPipeline {
    fetcher: Box<dyn PageFetcher>,
    renderer: Option<Box<dyn Renderer>>,
    analyzer: Option<Analyzer>,
    config: PipelineConfig,
}

impl JdPipeline {
    /// Pipeline without an analyzer. `renderer = None` disables Tier 2.
    pub fn new(fetcher: Box<dyn PageFetcher>, renderer: Option<Box<dyn Renderer>>, config: PipelineConfig) -> Self {
        Self { fetcher, renderer, analyzer: None, config }
    }

    pub fn with_analyzer(mut self, analyzer: Analyzer) -> Self {
        self.analyzer = Some(analyzer);
        self
    }

    /// Build the production pipeline from application configuration.
    ///
    /// The analyzer is attached only when an API key is configured.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let fetcher = FetchClient::new(FetchConfig::from(config))
            .map_err(|e| Error::ClientSetup(e.to_string()))?;

        let pipeline = Self::new(Box::new(fetcher), default_renderer(config), PipelineConfig::from(config));

        match Analyzer::from_config(config) {
            Ok(analyzer) => Ok(pipeline.with_analyzer(analyzer)),
            Err(e) => {
                tracing::info!("analysis disabled: {}", e);
                Ok(pipeline)
            }
        }
    }

    pub fn has_analyzer(&self) -> bool {
        self.analyzer.is_some()
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Canonicalize and guard `url`, then extract its job-description text.
    pub async fn extract(&self, url: &str) -> Result<Extraction, Error> {
        let target = self.guard(url).await?;
        let (tier, text) = self.extract_jd_text(&target).await?;
        let text = truncate_chars(&text, self.config.max_extract_chars).to_string();
        let chars = text.chars().count();

        tracing::info!(url = %target, ?tier, chars, "extraction finished");
        Ok(Extraction { url: target.to_string(), text, chars, tier })
    }

    /// Extract, truncate to the analysis budget, and analyze.
    pub async fn analyze_url(&self, url: &str) -> Result<UrlAnalysis, Error> {
        let analyzer = self
            .analyzer
            .as_ref()
            .ok_or_else(|| Error::AnalyzerUnavailable("no language model configured".to_string()))?;

        let extraction = self.extract(url).await?;
        let text = truncate_chars(&extraction.text, self.config.max_analysis_chars);
        let jd_chars = text.chars().count();
        let analysis = analyzer.analyze(text).await?;

        if !analysis.is_complete() {
            tracing::warn!(url = %extraction.url, "analysis degraded to parse failure");
        }

        Ok(UrlAnalysis { url: extraction.url, jd_chars, analysis })
    }

    async fn guard(&self, url: &str) -> Result<Url, Error> {
        let target = canonicalize(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        check_url(&target).await.map_err(|e| {
            tracing::warn!(url = %target, error = %e, "refusing private or unresolvable host");
            Error::InvalidHost(format!("{target}: {e}"))
        })?;
        Ok(target)
    }

    /// Fetch orchestration for an already-guarded URL.
    ///
    /// Tier-1 failures are absorbed and escalate to Tier 2. Tier-2 failure
    /// is terminal.
    pub async fn extract_jd_text(&self, url: &Url) -> Result<(Tier, String), Error> {
        let fast = match self.fetcher.fetch(url).await {
            Ok(response) => {
                let text = extract_text(&response.html(), response.final_url.as_str());
                tracing::debug!(url = %url, status = %response.status, chars = text.chars().count(), "tier 1 fetched");
                text
            }
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "tier 1 failed");
                String::new()
            }
        };

        if fast.chars().count() > self.config.min_text_chars {
            return Ok((Tier::Http, fast));
        }

        let Some(renderer) = &self.renderer else {
            if fast.is_empty() {
                return Err(Error::FetchFailed { url: url.to_string(), reason: "no text and rendering is disabled".to_string() });
            }
            tracing::warn!(url = %url, chars = fast.chars().count(), "short tier 1 text returned, rendering disabled");
            return Ok((Tier::Http, fast));
        };

        tracing::info!(url = %url, "escalating to headless render");
        let page = renderer.render(url, &self.config.render).await.map_err(|e| match e {
            RenderError::Timeout(timeout_ms) => Error::RenderTimeout { url: url.to_string(), timeout_ms },
            other => Error::FetchFailed { url: url.to_string(), reason: other.to_string() },
        })?;

        let text = extract_text(&page.html, page.final_url.as_str());
        if text.is_empty() {
            return Err(Error::FetchFailed { url: url.to_string(), reason: "rendered page has no text".to_string() });
        }

        tracing::debug!(url = %url, render_ms = page.render_time_ms, "tier 2 rendered");
        Ok((Tier::Rendered, text))
    }
}

#[cfg(feature = "render")]
fn default_renderer(config: &AppConfig) -> Option<Box<dyn Renderer>> {
    config.render_enabled.then(|| Box::new(crate::render::ChromiumRenderer::new()) as Box<dyn Renderer>)
}

#[cfg(not(feature = "render"))]
fn default_renderer(config: &AppConfig) -> Option<Box<dyn Renderer>> {
    if config.render_enabled {
        tracing::warn!("render_enabled is set but this build has no renderer");
    }
    None
}
