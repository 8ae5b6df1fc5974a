//! MCP command implementation.

use crate::config::Settings;
use crate::mcp::McpServer;
use crate::service::NewsService;
use anyhow::Result;

/// Run the MCP server on stdio.
pub async fn run_mcp(settings: Settings) -> Result<()> {
    let service = NewsService::from_settings(&settings)?;
    let server = McpServer::new(service);
    server.run_stdio().await
}
