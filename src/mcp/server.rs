//! Servidor MCP do TestDino.
//!
//! Trata o ciclo de vida da conexão e encaminha `tools/call` para o
//! [`ToolHandler`]. As mensagens são processadas em ordem de chegada.

use serde_json::{json, Value};
use tokio::io::{AsyncRead, AsyncWrite};

use crate::types::config::Config;
use crate::TestDinoResult;

use super::protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult,
};
use super::tools::ToolHandler;
use super::transport::{Incoming, LineTransport, StdioTransport};

/// Servidor MCP.
pub struct McpServer {
    tools: ToolHandler,
    initialized: bool,
}

impl McpServer {
    pub fn new(config: Config) -> TestDinoResult<Self> {
        Ok(Self::with_handler(ToolHandler::new(config)?))
    }

    /// Usa um handler já montado (ex.: com executor falso).
    pub fn with_handler(tools: ToolHandler) -> Self {
        Self {
            tools,
            initialized: false,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Atende stdin/stdout até o cliente fechar a entrada.
    pub async fn run(&mut self) -> TestDinoResult<()> {
        let mut transport = StdioTransport::stdio();
        self.serve(&mut transport).await
    }

    /// Loop principal sobre um transporte qualquer.
    pub async fn serve<R, W>(&mut self, transport: &mut LineTransport<R, W>) -> TestDinoResult<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!("TestDino MCP server running on stdio");

        while let Some(incoming) = transport.read_message().await? {
            let response = match incoming {
                Incoming::Request(request) => self.handle_request(request).await,
                Incoming::Invalid { id, error } => Some(JsonRpcResponse::error(id, error)),
            };

            if let Some(response) = response {
                transport.write_response(&response).await?;
            }
        }

        tracing::info!("Client disconnected");
        Ok(())
    }

    /// Processa uma request. Notificações não geram resposta.
    pub async fn handle_request(&mut self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        tracing::debug!(method = %request.method, "Handling request");

        if request.is_notification() {
            self.handle_notification(&request);
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request),
            "ping" => JsonRpcResponse::success(request.id, json!({})),
            "shutdown" => self.handle_shutdown(request),

            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,

            _ => {
                JsonRpcResponse::error(request.id, JsonRpcError::method_not_found(&request.method))
            }
        };

        Some(response)
    }

    fn handle_notification(&mut self, request: &JsonRpcRequest) {
        match request.method.as_str() {
            "notifications/initialized" | "initialized" => {
                tracing::info!("Client initialization complete");
            }
            "notifications/cancelled" => {
                tracing::debug!("Cancellation ignored; calls run to completion");
            }
            other => tracing::debug!(method = other, "Ignoring notification"),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Lifecycle
    // ═══════════════════════════════════════════════════════════════════════

    fn handle_initialize(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let client = request
            .params
            .as_ref()
            .and_then(|p| p.pointer("/clientInfo/name"))
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        tracing::info!(client, "Client initializing connection");

        self.initialized = true;

        JsonRpcResponse::success(
            request.id,
            serde_json::to_value(InitializeResult::default()).unwrap_or(json!({})),
        )
    }

    fn handle_shutdown(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        tracing::info!("Client requested shutdown");
        self.initialized = false;
        JsonRpcResponse::success(request.id, Value::Null)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Tools
    // ═══════════════════════════════════════════════════════════════════════

    fn handle_tools_list(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let result = ListToolsResult {
            tools: ToolHandler::list_tools(),
        };

        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(request.id, value),
            Err(e) => JsonRpcResponse::error(
                request.id,
                JsonRpcError::internal_error(format!("Failed to serialize tools: {}", e)),
            ),
        }
    }

    async fn handle_tools_call(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let params: CallToolParams = match request.params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    return JsonRpcResponse::error(
                        request.id,
                        JsonRpcError::invalid_params(format!("Invalid params: {}", e)),
                    );
                }
            },
            None => {
                return JsonRpcResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing params"),
                );
            }
        };

        let result = self
            .tools
            .handle_tool_call(&params.name, params.arguments)
            .await;

        let result_value = serde_json::to_value(&result).unwrap_or_else(|_| {
            json!({
                "content": [{"type": "text", "text": "Internal error"}],
                "isError": true
            })
        });

        JsonRpcResponse::success(request.id, result_value)
    }
}
