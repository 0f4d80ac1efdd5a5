//! MCP server handler implementation.
//!
//! This module defines the main server handler that
//! routes tool calls to the job-description pipeline.
use std::sync::Arc;

use crate::tools::jd_analyze::analyze_impl;
use crate::tools::jd_extract::extract_impl;
use crate::tools::{JdAnalyzeParams, JdExtractParams};

use jobscout_client::JdPipeline;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    handler::server::{
        tool::{ToolCallContext, ToolRouter},
        wrapper::Parameters,
    },
    model::{
        CallToolRequestParam, CallToolResult, Implementation, ListToolsResult, PaginatedRequestParam, ProtocolVersion,
        ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
};

/// The main MCP server handler for jobscout.
#[derive(Clone)]
pub struct JobScoutServer {
    tool_router: ToolRouter<Self>,
    pipeline: Arc<JdPipeline>,
}

/// Tool router implementation using the #[tool_router] macro.
#[tool_router]
impl JobScoutServer {
    /// Create a new server handler around a shared pipeline.
    pub fn new(pipeline: JdPipeline) -> Self {
        Self { tool_router: Self::tool_router(), pipeline: Arc::new(pipeline) }
    }

    /// Extract the job description behind a URL.
    #[tool(
        description = "Fetch a job posting URL and return its cleaned job-description text as {url, text, chars}. Private or unresolvable hosts are refused."
    )]
    async fn jd_extract(&self, params: Parameters<JdExtractParams>) -> Result<CallToolResult, McpError> {
        extract_impl(&self.pipeline, params.0).await
    }

    /// Summarize the job description behind a URL.
    #[tool(
        description = "Fetch a job posting URL and summarize it: title, company, location, responsibilities, requirements and categorized technical skills."
    )]
    async fn jd_analyze(&self, params: Parameters<JdAnalyzeParams>) -> Result<CallToolResult, McpError> {
        analyze_impl(&self.pipeline, params.0).await
    }
}

impl ServerHandler for JobScoutServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            server_info: Implementation {
                name: "jobscout-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            instructions: Some(
                "Use jd_extract for job-description text and jd_analyze for a structured summary.".into(),
            ),
            ..Default::default()
        }
    }

    async fn list_tools(
        &self, _request: Option<PaginatedRequestParam>, _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, rmcp::model::ErrorData> {
        Ok(ListToolsResult { meta: None, tools: self.tool_router.list_all(), next_cursor: None })
    }

    async fn call_tool(
        &self, request: CallToolRequestParam, context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, rmcp::model::ErrorData> {
        self.tool_router
            .call(ToolCallContext::new(self, request, context))
            .await
    }
}
