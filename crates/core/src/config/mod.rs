//! Application configuration with layered loading.
//!
//! This module provides configuration management using figment for layered
//! configuration loading from multiple sources:
//!
//! 1. Environment variables (JOBSCOUT_*)
//! 2. TOML config file (if JOBSCOUT_CONFIG_FILE set)
//! 3. Built-in defaults

use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

mod validation;

pub use validation::ConfigError;

/// Desktop browser identity sent on the fast path; some ATS hosts reject bot-like agents.
pub const BROWSER_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Application configuration with layered loading.
///
/// Loading precedence (highest wins):
/// 1. Environment variables (JOBSCOUT_*)
/// 2. TOML config file (if JOBSCOUT_CONFIG_FILE set)
/// 3. Built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// User-Agent header for the plain HTTP fetch.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Accept-Language header for the plain HTTP fetch.
    #[serde(default = "default_accept_language")]
    pub accept_language: String,

    /// Plain HTTP fetch timeout in milliseconds.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,

    /// Maximum bytes to read from a page.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Maximum redirects followed on the plain HTTP fetch.
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,

    /// Extracted text must be longer than this for the plain fetch to count.
    #[serde(default = "default_min_text_chars")]
    pub min_text_chars: usize,

    /// Whether the headless browser fallback is available.
    #[serde(default = "default_true")]
    pub render_enabled: bool,

    /// Headless navigation timeout in milliseconds.
    #[serde(default = "default_render_timeout_ms")]
    pub render_timeout_ms: u64,

    /// Time to let client-side scripts populate the DOM after navigation.
    #[serde(default = "default_render_settle_ms")]
    pub render_settle_ms: u64,

    /// Upper bound on characters returned by extraction.
    #[serde(default = "default_max_extract_chars")]
    pub max_extract_chars: usize,

    /// Upper bound on characters sent to the language model.
    #[serde(default = "default_max_analysis_chars")]
    pub max_analysis_chars: usize,

    /// API key for the chat-completions provider.
    ///
    /// Set via JOBSCOUT_LLM_API_KEY. Required only for analysis.
    #[serde(default)]
    pub llm_api_key: Option<String>,

    /// Base URL of the chat-completions API.
    #[serde(default = "default_llm_base_url")]
    pub llm_base_url: String,

    /// Model name passed to the provider.
    #[serde(default = "default_llm_model")]
    pub llm_model: String,

    /// Model call timeout in milliseconds.
    #[serde(default = "default_llm_timeout_ms")]
    pub llm_timeout_ms: u64,

    /// Ask the provider for a JSON-object response.
    #[serde(default = "default_true")]
    pub llm_json_mode: bool,
}

fn default_user_agent() -> String {
    BROWSER_USER_AGENT.into()
}

fn default_accept_language() -> String {
    "en-US,en;q=0.9".into()
}

fn default_fetch_timeout_ms() -> u64 {
    15_000
}

fn default_max_bytes() -> usize {
    5_242_880 // 5MB
}

fn default_max_redirects() -> usize {
    5
}

fn default_min_text_chars() -> usize {
    200
}

fn default_render_timeout_ms() -> u64 {
    30_000
}

fn default_render_settle_ms() -> u64 {
    5_000
}

fn default_max_extract_chars() -> usize {
    80_000
}

fn default_max_analysis_chars() -> usize {
    10_000
}

fn default_llm_base_url() -> String {
    "https://api.openai.com/v1".into()
}

fn default_llm_model() -> String {
    "gpt-4o-mini".into()
}

fn default_llm_timeout_ms() -> u64 {
    60_000
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept_language: default_accept_language(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
            max_bytes: default_max_bytes(),
            max_redirects: default_max_redirects(),
            min_text_chars: default_min_text_chars(),
            render_enabled: true,
            render_timeout_ms: default_render_timeout_ms(),
            render_settle_ms: default_render_settle_ms(),
            max_extract_chars: default_max_extract_chars(),
            max_analysis_chars: default_max_analysis_chars(),
            llm_api_key: None,
            llm_base_url: default_llm_base_url(),
            llm_model: default_llm_model(),
            llm_timeout_ms: default_llm_timeout_ms(),
            llm_json_mode: true,
        }
    }
}

impl AppConfig {
    /// Plain fetch timeout as Duration for use with reqwest.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms)
    }

    /// Model call timeout as Duration for use with reqwest.
    pub fn llm_timeout(&self) -> Duration {
        Duration::from_millis(self.llm_timeout_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// Priority (highest wins):
    /// 1. Environment variables prefixed with `JOBSCOUT_`
    /// 2. TOML file from `JOBSCOUT_CONFIG_FILE` (if set)
    /// 3. Built-in defaults via `Default::default()`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("JOBSCOUT_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment = figment.merge(
            Env::prefixed("JOBSCOUT_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into())
                .split("__"),
        );

        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Check if the model API key is available (for deferred validation).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Missing` if the key is not set.
    pub fn require_llm_api_key(&self) -> Result<&str, ConfigError> {
        self.llm_api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| ConfigError::Missing {
                field: "llm_api_key".into(),
                hint: "Set JOBSCOUT_LLM_API_KEY environment variable".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.user_agent, BROWSER_USER_AGENT);
        assert_eq!(config.accept_language, "en-US,en;q=0.9");
        assert_eq!(config.fetch_timeout_ms, 15_000);
        assert_eq!(config.min_text_chars, 200);
        assert!(config.render_enabled);
        assert_eq!(config.render_timeout_ms, 30_000);
        assert_eq!(config.render_settle_ms, 5_000);
        assert_eq!(config.max_extract_chars, 80_000);
        assert_eq!(config.max_analysis_chars, 10_000);
        assert_eq!(config.llm_model, "gpt-4o-mini");
        assert!(config.llm_api_key.is_none());
    }

    #[test]
    fn test_timeout_durations() {
        let config = AppConfig::default();
        assert_eq!(config.fetch_timeout(), Duration::from_secs(15));
        assert_eq!(config.llm_timeout(), Duration::from_secs(60));
    }

    #[test]
    fn test_require_llm_api_key_missing() {
        let config = AppConfig::default();
        assert!(matches!(config.require_llm_api_key(), Err(ConfigError::Missing { .. })));

        let config = AppConfig { llm_api_key: Some(String::new()), ..Default::default() };
        assert!(matches!(config.require_llm_api_key(), Err(ConfigError::Missing { .. })));
    }

    #[test]
    fn test_require_llm_api_key_present() {
        let config = AppConfig { llm_api_key: Some("sk-test".into()), ..Default::default() };
        assert_eq!(config.require_llm_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn test_load_from_env() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("JOBSCOUT_MIN_TEXT_CHARS", "300");
            jail.set_env("JOBSCOUT_RENDER_ENABLED", "false");
            jail.set_env("JOBSCOUT_LLM_API_KEY", "sk-env");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.min_text_chars, 300);
            assert!(!config.render_enabled);
            assert_eq!(config.llm_api_key.as_deref(), Some("sk-env"));
            Ok(())
        });
    }

    #[test]
    fn test_load_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "jobscout.toml",
                r#"
                    llm_model = "from-file"
                    max_analysis_chars = 5000
                "#,
            )?;
            jail.set_env("JOBSCOUT_CONFIG_FILE", "jobscout.toml");
            jail.set_env("JOBSCOUT_LLM_MODEL", "from-env");

            let config = AppConfig::load().map_err(|e| e.to_string())?;
            assert_eq!(config.llm_model, "from-env");
            assert_eq!(config.max_analysis_chars, 5000);
            Ok(())
        });
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("JOBSCOUT_FETCH_TIMEOUT_MS", "10");
            assert!(matches!(AppConfig::load(), Err(ConfigError::Invalid { .. })));
            Ok(())
        });
    }
}
