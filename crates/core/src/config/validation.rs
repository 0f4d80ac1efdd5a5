//! Configuration validation rules.
//!
//! This module provides validation logic for `AppConfig` values
//! after they have been loaded from environment, files, or defaults.

use crate::config::AppConfig;
use thiserror::Error;

/// Configuration validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },

    #[error("missing required configuration: {field} ({hint})")]
    Missing { field: String, hint: String },
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

fn check_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if value < 100 {
        return Err(invalid(field, "must be at least 100ms"));
    }
    if value > 300_000 {
        return Err(invalid(field, "must not exceed 5 minutes (300000ms)"));
    }
    Ok(())
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - a fetch, render or model timeout is outside 100ms..=5min
    /// - `render_settle_ms` exceeds `render_timeout_ms`
    /// - `user_agent` or `llm_model` is empty
    /// - a character budget is 0
    /// - `llm_base_url` is not an http(s) URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        check_timeout("fetch_timeout_ms", self.fetch_timeout_ms)?;
        check_timeout("render_timeout_ms", self.render_timeout_ms)?;
        check_timeout("llm_timeout_ms", self.llm_timeout_ms)?;

        if self.render_settle_ms > self.render_timeout_ms {
            return Err(invalid("render_settle_ms", "must not exceed render_timeout_ms"));
        }

        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }
        if self.llm_model.is_empty() {
            return Err(invalid("llm_model", "must not be empty"));
        }

        if self.max_extract_chars == 0 {
            return Err(invalid("max_extract_chars", "must be greater than 0"));
        }
        if self.max_analysis_chars == 0 {
            return Err(invalid("max_analysis_chars", "must be greater than 0"));
        }

        match url::Url::parse(&self.llm_base_url) {
            Ok(base) if matches!(base.scheme(), "http" | "https") => {}
            _ => return Err(invalid("llm_base_url", "must be an http(s) URL")),
        }

        if self.max_analysis_chars > self.max_extract_chars {
            tracing::warn!(
                max_analysis_chars = self.max_analysis_chars,
                max_extract_chars = self.max_extract_chars,
                "analysis budget exceeds extraction cap; analyzer input is bounded by extraction"
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invalid_field(config: &AppConfig) -> Option<String> {
        match config.validate() {
            Err(ConfigError::Invalid { field, .. }) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_max_bytes_zero() {
        let config = AppConfig { max_bytes: 0, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("max_bytes"));
    }

    #[test]
    fn test_validate_max_bytes_exceeds_limit() {
        let config = AppConfig { max_bytes: 51 * 1024 * 1024, ..Default::default() }; // 51MB
        assert_eq!(invalid_field(&config).as_deref(), Some("max_bytes"));
    }

    #[test]
    fn test_validate_fetch_timeout_too_small() {
        let config = AppConfig { fetch_timeout_ms: 50, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("fetch_timeout_ms"));
    }

    #[test]
    fn test_validate_render_timeout_exceeds_limit() {
        let config = AppConfig { render_timeout_ms: 301_000, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("render_timeout_ms"));
    }

    #[test]
    fn test_validate_settle_longer_than_render_timeout() {
        let config = AppConfig { render_timeout_ms: 1_000, render_settle_ms: 2_000, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("render_settle_ms"));
    }

    #[test]
    fn test_validate_empty_user_agent() {
        let config = AppConfig { user_agent: String::new(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("user_agent"));
    }

    #[test]
    fn test_validate_zero_budgets() {
        let config = AppConfig { max_extract_chars: 0, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("max_extract_chars"));

        let config = AppConfig { max_analysis_chars: 0, ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("max_analysis_chars"));
    }

    #[test]
    fn test_validate_llm_base_url() {
        let config = AppConfig { llm_base_url: "ftp://models.internal".into(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("llm_base_url"));

        let config = AppConfig { llm_base_url: "not a url".into(), ..Default::default() };
        assert_eq!(invalid_field(&config).as_deref(), Some("llm_base_url"));
    }

    #[test]
    fn test_validate_edge_case_values() {
        let config = AppConfig {
            max_bytes: 1,
            fetch_timeout_ms: 100,
            render_timeout_ms: 100,
            render_settle_ms: 100,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
