//! MCP server implementation.

use super::protocol::*;
use super::tools::{self, get_tools};
use crate::error::{NewslineError, Result};
use crate::service::{NewsService, SERVER_NAME, SERVER_VERSION};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

const PROTOCOL_VERSION: &str = "2024-11-05";

#[derive(Debug, Deserialize)]
struct GreetArgs {
    name: String,
}

/// MCP server exposing the news tools.
///
/// Stateless: every request is answered from its own snapshot, so one
/// server can serve stdio and concurrent HTTP requests alike.
#[derive(Clone)]
pub struct McpServer {
    service: NewsService,
}

impl McpServer {
    /// Create a new MCP server.
    pub fn new(service: NewsService) -> Self {
        Self { service }
    }

    /// Run the MCP server (reads from stdin, writes to stdout).
    pub async fn run_stdio(&self) -> anyhow::Result<()> {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        let mut stdout = tokio::io::stdout();

        info!("Newsline MCP server listening on stdio");

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }

            if let Some(response) = self.handle_message(&line).await {
                let mut encoded = serde_json::to_string(&response)?;
                encoded.push('\n');
                stdout.write_all(encoded.as_bytes()).await?;
                stdout.flush().await?;
            }
        }

        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Handle one raw JSON-RPC message. Returns `None` for notifications.
    pub async fn handle_message(&self, raw: &str) -> Option<JsonRpcResponse> {
        match serde_json::from_str::<JsonRpcRequest>(raw) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => {
                warn!("Failed to parse request: {}", e);
                Some(JsonRpcResponse::error(None, PARSE_ERROR, "Parse error"))
            }
        }
    }

    /// Handle a single JSON-RPC request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("Handling {}", request.method);

        if request.is_notification() {
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request.id, request.params),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request.id),
            "tools/call" => self.handle_tools_call(request.id, request.params).await,
            _ => JsonRpcResponse::error(
                request.id,
                METHOD_NOT_FOUND,
                &format!("Method not found: {}", request.method),
            ),
        };

        Some(response)
    }

    /// Handle initialize request.
    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        if let Some(params) = params.and_then(|p| serde_json::from_value::<InitializeParams>(p).ok()) {
            let client = params
                .client_info
                .map(|c| format!("{} {}", c.name, c.version))
                .unwrap_or_else(|| "unknown client".to_string());
            info!("Initialize from {} (protocol {})", client.trim(), params.protocol_version);
        }

        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: ToolsCapability { list_changed: false },
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
            },
        };

        JsonRpcResponse::from_result(id, result)
    }

    /// Handle tools/list request.
    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        JsonRpcResponse::from_result(id, ToolsListResult { tools: get_tools() })
    }

    /// Handle tools/call request.
    async fn handle_tools_call(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: ToolCallParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, &format!("Invalid params: {}", e))
                }
            },
            None => return JsonRpcResponse::error(id, INVALID_PARAMS, "Missing params"),
        };

        let result = self.call_tool(&params.name, params.arguments).await;
        JsonRpcResponse::from_result(id, result)
    }

    /// Run a tool by name. Failures become error results, never protocol errors.
    pub async fn call_tool(&self, name: &str, arguments: Option<Value>) -> ToolCallResult {
        let outcome = match name {
            tools::GREET => parse_args::<GreetArgs>(arguments)
                .map(|args| ToolCallResult::text(self.service.greet(&args.name))),
            tools::GET_SERVER_INFO => Ok(ToolCallResult::json(&self.service.server_info())),
            tools::LIST_RECENT_ARTICLES => match parse_args(arguments) {
                Ok(query) => self
                    .service
                    .list_recent_articles(&query)
                    .await
                    .map(|r| ToolCallResult::json(&r)),
                Err(e) => Err(e),
            },
            tools::LIST_RECENT_VIDEOS => match parse_args(arguments) {
                Ok(query) => self
                    .service
                    .list_recent_videos(&query)
                    .await
                    .map(|r| ToolCallResult::json(&r)),
                Err(e) => Err(e),
            },
            tools::KEYWORD_SEARCH => match parse_args(arguments) {
                Ok(query) => self
                    .service
                    .keyword_search(&query)
                    .await
                    .map(|r| ToolCallResult::json(&r)),
                Err(e) => Err(e),
            },
            tools::SOURCE_COUNTS => match parse_args(arguments) {
                Ok(query) => self
                    .service
                    .source_counts(&query)
                    .await
                    .map(|r| ToolCallResult::json(&r)),
                Err(e) => Err(e),
            },
            _ => return ToolCallResult::error(format!("Unknown tool: {}", name)),
        };

        outcome.unwrap_or_else(|e| {
            warn!("Tool {} failed: {}", name, e);
            ToolCallResult::error(e.to_string())
        })
    }
}

/// Decode tool arguments; absent or null arguments mean "all defaults".
fn parse_args<T: DeserializeOwned>(arguments: Option<Value>) -> Result<T> {
    let value = match arguments {
        None | Some(Value::Null) => json!({}),
        Some(v) => v,
    };
    serde_json::from_value(value).map_err(|e| NewslineError::Validation(e.to_string()))
}
