//! jobscout-mcp server entry point.
//!
//! Boots the MCP server on stdio transport.
//! Logging goes to stderr to avoid interfering with the JSON-RPC protocol on stdout.

use anyhow::Result;
use jobscout_client::JdPipeline;
use jobscout_core::AppConfig;
use rmcp::service::serve_server;
use rmcp::transport::io::stdio;
use tracing_subscriber::EnvFilter;

mod handler;
mod tools;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .init();

    let config = AppConfig::load()?;
    let pipeline = JdPipeline::from_config(&config)?;

    tracing::info!(
        render = config.render_enabled,
        analyzer = pipeline.has_analyzer(),
        "Starting jobscout-mcp server on stdio transport"
    );

    let handler = handler::JobScoutServer::new(pipeline);
    let transport = stdio();
    let server = serve_server(handler, transport).await?;

    server.waiting().await?;

    Ok(())
}
