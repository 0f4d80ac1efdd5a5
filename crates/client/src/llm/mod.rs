//! Chat-completions client for the job-description analyzer.
//!
//! Speaks the OpenAI-compatible `POST {base}/chat/completions` contract:
//!
//! - **Authentication**: `Authorization: Bearer <key>`.
//! - **Sampling**: temperature 0, single user message.
//! - **Output**: `response_format: {"type": "json_object"}` when enabled.
//! - **Retries**: none; a failed call is terminal for that analysis.

pub mod error;
pub mod request;
pub mod response;

pub use error::LlmError;
pub use request::{ChatMessage, ChatRequest, ResponseFormat};
pub use response::{ChatResponse, Usage};

use reqwest::header;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jobscout_core::AppConfig;

/// Language model used by the analyzer: prompt in, raw completion text out.
#[async_trait::async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;
}

/// Chat-completions client configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Provider API key.
    pub api_key: String,
    /// Base URL (default: https://api.openai.com/v1).
    pub base_url: String,
    /// Model name (default: gpt-4o-mini).
    pub model: String,
    /// Request timeout (default: 60s).
    pub timeout: Duration,
    /// Request a JSON-object response.
    pub json_mode: bool,
}

impl LlmConfig {
    /// Build from application configuration; `None` when no key is set.
    pub fn from_app(config: &AppConfig) -> Option<Self> {
        let api_key = config.require_llm_api_key().ok()?.to_string();
        Some(Self {
            api_key,
            base_url: config.llm_base_url.trim_end_matches('/').to_string(),
            model: config.llm_model.clone(),
            timeout: config.llm_timeout(),
            json_mode: config.llm_json_mode,
        })
    }
}

/// OpenAI-compatible chat-completions client.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    config: LlmConfig,
}

impl OpenAiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: LlmConfig) -> Result<Self, LlmError> {
        if config.api_key.is_empty() {
            return Err(LlmError::MissingApiKey);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| LlmError::Network(Arc::new(e)))?;

        Ok(Self { http, config })
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }
}

#[async_trait::async_trait]
impl LanguageModel for OpenAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        let start = Instant::now();
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = ChatRequest::deterministic(&self.config.model, prompt, self.config.json_mode);

        tracing::debug!(model = %self.config.model, prompt_chars = prompt.chars().count(), "requesting completion");

        let http_response = self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = http_response.status();
        tracing::debug!("completion response status: {}", status);

        if status == 401 || status == 403 {
            return Err(LlmError::AuthError);
        }

        if status == 429 {
            return Err(LlmError::RateLimited);
        }

        if status.is_client_error() || status.is_server_error() {
            return Err(LlmError::HttpError { status: status.as_u16() });
        }

        let bytes = http_response.bytes().await?;
        let envelope: ChatResponse = serde_json::from_slice(&bytes).map_err(|e| LlmError::Parse(e.to_string()))?;

        if let Some(usage) = envelope.usage {
            tracing::debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "completion finished in {:?}",
                start.elapsed()
            );
        }

        envelope.into_content().ok_or(LlmError::EmptyCompletion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header as header_eq, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer) -> LlmConfig {
        LlmConfig {
            api_key: "sk-test".into(),
            base_url: server.uri(),
            model: "gpt-4o-mini".into(),
            timeout: Duration::from_secs(5),
            json_mode: true,
        }
    }

    #[test]
    fn test_config_from_app_requires_key() {
        assert!(LlmConfig::from_app(&AppConfig::default()).is_none());

        let app = AppConfig {
            llm_api_key: Some("sk-app".into()),
            llm_base_url: "https://llm.example.com/v1/".into(),
            ..Default::default()
        };
        let config = LlmConfig::from_app(&app).unwrap();
        assert_eq!(config.api_key, "sk-app");
        assert_eq!(config.base_url, "https://llm.example.com/v1");
        assert!(config.json_mode);
    }

    #[test]
    fn test_client_new_missing_key() {
        let config = LlmConfig {
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".into(),
            model: "gpt-4o-mini".into(),
            timeout: Duration::from_secs(1),
            json_mode: true,
        };
        assert!(matches!(OpenAiClient::new(config), Err(LlmError::MissingApiKey)));
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header_eq("authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "gpt-4o-mini",
                "temperature": 0.0,
                "response_format": {"type": "json_object"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": [{"message": {"role": "assistant", "content": "{\"job_title\":\"SRE\"}"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = OpenAiClient::new(config_for(&server)).unwrap();
        let content = client.complete("analyze this").await.unwrap();
        assert_eq!(content, "{\"job_title\":\"SRE\"}");
    }

    #[tokio::test]
    async fn test_complete_maps_status_codes() {
        for status in [401u16, 429, 500] {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(status))
                .mount(&server)
                .await;

            let client = OpenAiClient::new(config_for(&server)).unwrap();
            let err = client.complete("x").await.unwrap_err();
            match status {
                401 => assert!(matches!(err, LlmError::AuthError), "{err:?}"),
                429 => assert!(matches!(err, LlmError::RateLimited), "{err:?}"),
                _ => assert!(matches!(err, LlmError::HttpError { status: 500 }), "{err:?}"),
            }
        }
    }

    #[tokio::test]
    async fn test_complete_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"choices": []})))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(config_for(&server)).unwrap();
        assert!(matches!(client.complete("x").await, Err(LlmError::EmptyCompletion)));
    }

    #[tokio::test]
    async fn test_complete_bad_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>gateway</html>"))
            .mount(&server)
            .await;

        let client = OpenAiClient::new(config_for(&server)).unwrap();
        assert!(matches!(client.complete("x").await, Err(LlmError::Parse(_))));
    }
}
