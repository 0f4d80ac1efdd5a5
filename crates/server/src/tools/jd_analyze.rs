//! jd_analyze tool implementation.
//!
//! Extracts the job description behind a URL and summarizes it with the
//! configured language model.

use jobscout_client::JdPipeline;
use jobscout_core::Error;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for jd_analyze tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JdAnalyzeParams {
    /// Absolute URL of the job posting. A missing scheme defaults to https.
    pub url: String,
}

/// Implementation of the jd_analyze tool.
///
/// An unparsable completion is still a successful call; its body carries
/// the `error` marker instead of analysis fields.
pub async fn analyze_impl(pipeline: &JdPipeline, params: JdAnalyzeParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let analysis = pipeline.analyze_url(&params.url).await.map_err(|e| {
        tracing::warn!(url = %params.url, status = e.status_code(), "jd_analyze failed: {}", e);
        McpError::from(e)
    })?;

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&analysis).unwrap_or_default(),
    )]))
}
