//! Skill and summary analysis of extracted job-description text.
//!
//! One prompt, one completion, one parse. A completion that is not a JSON
//! object degrades to [`Analysis::Failed`] instead of a partial result.

pub mod prompt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use jobscout_core::{AppConfig, Error};

use crate::extract::truncate_chars;
use crate::llm::{LanguageModel, LlmConfig, OpenAiClient};
use prompt::MAX_SKILLS_PER_CATEGORY;

/// Error marker returned when the completion cannot be parsed.
pub const PARSE_FAILURE_MESSAGE: &str = "LLM response parsing failed";

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// Skills grouped under one category name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillCategory {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub skills: Vec<String>,
}

/// Structured summary of a job description.
///
/// Missing or `null` fields in an otherwise valid completion default to empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisResult {
    #[serde(deserialize_with = "null_as_default")]
    pub job_title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(deserialize_with = "null_as_default")]
    pub location: String,
    #[serde(deserialize_with = "null_as_default")]
    pub responsibilities: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub requirements: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub categories: Vec<SkillCategory>,
    #[serde(deserialize_with = "null_as_default")]
    pub flat: Vec<String>,
}

impl AnalysisResult {
    /// Cap each category and derive `flat` when the model left it out.
    fn normalize(mut self) -> Self {
        for category in &mut self.categories {
            category.skills.truncate(MAX_SKILLS_PER_CATEGORY);
        }

        if self.flat.is_empty() {
            let mut flat: Vec<String> = Vec::new();
            for skill in self.categories.iter().flat_map(|c| c.skills.iter()) {
                if !flat.contains(skill) {
                    flat.push(skill.clone());
                }
            }
            self.flat = flat;
        }

        self
    }
}

/// Explicit failure marker; carries no partial fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisFailure {
    pub error: String,
}

/// Outcome of one analysis call, serialized without a tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Analysis {
    Complete(AnalysisResult),
    Failed(AnalysisFailure),
}

impl Analysis {
    fn parse_failure() -> Self {
        Analysis::Failed(AnalysisFailure { error: PARSE_FAILURE_MESSAGE.to_string() })
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Analysis::Complete(_))
    }
}

/// Strip a surrounding Markdown code fence, if any.
fn unfence(raw: &str) -> &str {
    raw.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

/// Parse raw completion text into an [`Analysis`].
pub fn parse_analysis(raw: &str) -> Analysis {
    let value: Value = match serde_json::from_str(unfence(raw)) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("completion is not JSON: {}", e);
            return Analysis::parse_failure();
        }
    };

    if !value.is_object() {
        tracing::warn!("completion is JSON but not an object");
        return Analysis::parse_failure();
    }

    match serde_json::from_value::<AnalysisResult>(value) {
        Ok(result) => Analysis::Complete(result.normalize()),
        Err(e) => {
            tracing::warn!("completion does not match analysis schema: {}", e);
            Analysis::parse_failure()
        }
    }
}

/// Job-description analyzer backed by a language model.
pub struct Analyzer {
    model: Box<dyn LanguageModel>,
    max_chars: usize,
}

impl Analyzer {
    pub fn new(model: Box<dyn LanguageModel>, max_chars: usize) -> Self {
        Self { model, max_chars }
    }

    /// Analyzer using the configured chat-completions provider.
    pub fn from_config(config: &AppConfig) -> Result<Self, Error> {
        let llm = LlmConfig::from_app(config)
            .ok_or_else(|| Error::AnalyzerUnavailable("JOBSCOUT_LLM_API_KEY is not set".to_string()))?;
        let client = OpenAiClient::new(llm).map_err(|e| Error::AnalyzerUnavailable(e.to_string()))?;
        Ok(Self::new(Box::new(client), config.max_analysis_chars))
    }

    /// Analyze `text`, truncated from the end to the input budget.
    ///
    /// Transport failures are errors; unparsable output is [`Analysis::Failed`].
    pub async fn analyze(&self, text: &str) -> Result<Analysis, Error> {
        let text = truncate_chars(text, self.max_chars);
        let prompt = prompt::build(text);

        let raw = self.model.complete(&prompt).await.map_err(|e| {
            tracing::error!("language model call failed: {}", e);
            Error::AnalysisFailed(e.to_string())
        })?;

        Ok(parse_analysis(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use std::sync::{Arc, Mutex};

    struct StubModel {
        reply: Result<String, LlmError>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl StubModel {
        fn replying(reply: &str) -> (Self, Arc<Mutex<Vec<String>>>) {
            let prompts = Arc::new(Mutex::new(Vec::new()));
            (Self { reply: Ok(reply.to_string()), prompts: prompts.clone() }, prompts)
        }
    }

    #[async_trait::async_trait]
    impl LanguageModel for StubModel {
        async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply.clone()
        }
    }

    #[test]
    fn test_parse_complete() {
        let raw = r#"{
            "job_title": "Backend Engineer",
            "company": "Acme",
            "location": "Remote",
            "responsibilities": ["Build APIs"],
            "requirements": ["3+ years Rust"],
            "categories": [{"name": "Languages", "skills": ["Rust", "Go"]}],
            "flat": ["Rust", "Go"]
        }"#;
        let Analysis::Complete(result) = parse_analysis(raw) else { panic!("expected complete analysis") };
        assert_eq!(result.job_title, "Backend Engineer");
        assert_eq!(result.categories[0].skills, vec!["Rust", "Go"]);
        assert_eq!(result.flat, vec!["Rust", "Go"]);
    }

    #[test]
    fn test_parse_not_json() {
        let analysis = parse_analysis("not json");
        assert_eq!(analysis, Analysis::parse_failure());
        assert_eq!(serde_json::to_value(&analysis).unwrap(), serde_json::json!({"error": "LLM response parsing failed"}));
    }

    #[test]
    fn test_parse_non_object_is_failure() {
        assert!(!parse_analysis("[1, 2, 3]").is_complete());
        assert!(!parse_analysis("\"text\"").is_complete());
    }

    #[test]
    fn test_parse_wrong_field_type_is_failure() {
        assert!(!parse_analysis(r#"{"responsibilities": "one string"}"#).is_complete());
    }

    #[test]
    fn test_parse_missing_fields_default() {
        let Analysis::Complete(result) = parse_analysis(r#"{"job_title": "SRE"}"#) else { panic!("expected complete analysis") };
        assert_eq!(result.job_title, "SRE");
        assert!(result.company.is_empty());
        assert!(result.categories.is_empty());
        assert!(result.flat.is_empty());
    }

    #[test]
    fn test_parse_null_fields_default() {
        let raw = r#"{
            "job_title": "SRE",
            "company": null,
            "location": null,
            "responsibilities": null,
            "requirements": ["Linux"],
            "categories": [{"name": "Cloud", "skills": null}],
            "flat": null
        }"#;
        let Analysis::Complete(result) = parse_analysis(raw) else { panic!("expected complete analysis") };
        assert_eq!(result.job_title, "SRE");
        assert!(result.location.is_empty());
        assert!(result.responsibilities.is_empty());
        assert_eq!(result.requirements, vec!["Linux"]);
        assert!(result.categories[0].skills.is_empty());
        assert!(result.flat.is_empty());
    }

    #[test]
    fn test_parse_fenced_completion() {
        let raw = "```json\n{\"job_title\": \"Data Engineer\"}\n```";
        let Analysis::Complete(result) = parse_analysis(raw) else { panic!("expected complete analysis") };
        assert_eq!(result.job_title, "Data Engineer");
    }

    #[test]
    fn test_normalize_caps_and_derives_flat() {
        let skills: Vec<String> = (0..12).map(|i| format!("skill{i}")).collect();
        let result = AnalysisResult {
            categories: vec![
                SkillCategory { name: "Tools".into(), skills },
                SkillCategory { name: "Cloud".into(), skills: vec!["AWS".into(), "skill0".into()] },
            ],
            ..Default::default()
        }
        .normalize();

        assert_eq!(result.categories[0].skills.len(), MAX_SKILLS_PER_CATEGORY);
        assert_eq!(result.flat.len(), MAX_SKILLS_PER_CATEGORY + 1);
        assert_eq!(result.flat.first().map(String::as_str), Some("skill0"));
        assert_eq!(result.flat.last().map(String::as_str), Some("AWS"));
    }

    #[test]
    fn test_normalize_keeps_model_flat() {
        let result = AnalysisResult {
            categories: vec![SkillCategory { name: "Languages".into(), skills: vec!["Rust".into()] }],
            flat: vec!["Rust".into(), "SQL".into()],
            ..Default::default()
        }
        .normalize();
        assert_eq!(result.flat, vec!["Rust", "SQL"]);
    }

    #[tokio::test]
    async fn test_analyze_truncates_input() {
        let (model, prompts) = StubModel::replying(r#"{"job_title": "QA"}"#);
        let analyzer = Analyzer::new(Box::new(model), 10);

        let analysis = analyzer.analyze("0123456789TAIL").await.unwrap();
        assert!(analysis.is_complete());

        let prompts = prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("0123456789"));
        assert!(!prompts[0].contains("TAIL"));
    }

    #[tokio::test]
    async fn test_analyze_unparsable_reply() {
        let (model, _) = StubModel::replying("not json");
        let analyzer = Analyzer::new(Box::new(model), 100);
        assert_eq!(analyzer.analyze("jd").await.unwrap(), Analysis::parse_failure());
    }

    #[tokio::test]
    async fn test_analyze_transport_failure() {
        let model = StubModel { reply: Err(LlmError::RateLimited), prompts: Arc::default() };
        let analyzer = Analyzer::new(Box::new(model), 100);
        let err = analyzer.analyze("jd").await.unwrap_err();
        assert!(matches!(err, Error::AnalysisFailed(_)));
        assert_eq!(err.status_code(), 502);
    }

    #[test]
    fn test_from_config_without_key() {
        let err = Analyzer::from_config(&AppConfig::default()).err().unwrap();
        assert!(matches!(err, Error::AnalyzerUnavailable(_)));
    }
}
