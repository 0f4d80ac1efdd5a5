//! jd_extract tool implementation.
//!
//! Guards the URL, fetches it (rendering when the plain fetch comes back
//! thin) and returns the cleaned job-description text.

use jobscout_client::JdPipeline;
use jobscout_core::Error;
use rmcp::{ErrorData as McpError, model::*};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Input parameters for jd_extract tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct JdExtractParams {
    /// Absolute URL of the job posting. A missing scheme defaults to https.
    pub url: String,
}

/// Implementation of the jd_extract tool.
pub async fn extract_impl(pipeline: &JdPipeline, params: JdExtractParams) -> Result<CallToolResult, McpError> {
    if params.url.trim().is_empty() {
        return Err(Error::InvalidInput("url cannot be empty".into()).into());
    }

    let extraction = pipeline.extract(&params.url).await.map_err(|e| {
        tracing::warn!(url = %params.url, status = e.status_code(), "jd_extract failed: {}", e);
        McpError::from(e)
    })?;

    Ok(CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(&extraction).unwrap_or_default(),
    )]))
}
