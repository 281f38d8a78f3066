//! Line-delimited JSON-RPC loop over stdio

use crate::protocol::*;
use crate::tools::{self, ToolContext};
use anyhow::Result;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};

pub struct McpServer<'a> {
    ctx: &'a ToolContext,
}

impl<'a> McpServer<'a> {
    pub fn new(ctx: &'a ToolContext) -> Self {
        Self { ctx }
    }

    /// Serve stdin/stdout until EOF
    pub async fn run(&self) -> Result<()> {
        let reader = BufReader::new(tokio::io::stdin());
        let writer = BufWriter::new(tokio::io::stdout());
        self.serve(reader, writer).await
    }

    /// Serve any reader/writer pair; one request per line, one response per line
    pub async fn serve<R, W>(&self, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                break;
            }

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let response = match serde_json::from_str::<JsonRpcRequest>(trimmed) {
                Ok(request) if request.is_notification() => {
                    tracing::debug!(method = %request.method, "notification");
                    continue;
                }
                Ok(request) => self.dispatch(&request).await,
                Err(e) => JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ),
            };

            let mut encoded = serde_json::to_vec(&response)?;
            encoded.push(b'\n');
            writer.write_all(&encoded).await?;
            writer.flush().await?;
        }

        tracing::debug!("input closed, stopping MCP server");
        Ok(())
    }

    pub async fn dispatch(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();
        match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(id, initialize_result()),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tools::definitions() })),
            "tools/call" => self.call_tool(request).await,
            "ping" => JsonRpcResponse::success(id, json!({})),
            other => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        }
    }

    async fn call_tool(&self, request: &JsonRpcRequest) -> JsonRpcResponse {
        let name = request.param_str("name").unwrap_or_default();
        let arguments = request
            .params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        tracing::info!(tool = name, "tool call");

        let result = match name {
            "discover_candidates" => tools::handle_discover(self.ctx, arguments).await,
            "extract_credentials" => tools::handle_extract(arguments).await,
            "quota_status" => tools::handle_quota(self.ctx, arguments).await,
            _ => Err(anyhow::anyhow!("Unknown tool: {}", name)),
        };

        let result = result.unwrap_or_else(|e| ToolResult::error(format!("Error: {}", e)));

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id.clone(), value),
            Err(e) => JsonRpcResponse::error(
                request.id.clone(),
                error_codes::INTERNAL_ERROR,
                format!("Failed to encode tool result: {}", e),
            ),
        }
    }
}

fn initialize_result() -> Value {
    json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": { "tools": {} },
        "serverInfo": {
            "name": "leadscout",
            "version": env!("CARGO_PKG_VERSION")
        }
    })
}

pub async fn start_server(ctx: &ToolContext) -> Result<()> {
    tracing::info!("MCP server listening on stdio");
    McpServer::new(ctx).run().await
}
