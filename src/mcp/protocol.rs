//! Tipos do protocolo MCP (Model Context Protocol).
//!
//! O MCP usa JSON-RPC 2.0 sobre stdio; aqui ficam só os tipos que o servidor
//! TestDino troca com o cliente.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ═══════════════════════════════════════════════════════════════════════════
// Códigos de erro JSON-RPC padrão
// ═══════════════════════════════════════════════════════════════════════════

/// JSON inválido.
pub const PARSE_ERROR: i32 = -32700;

/// JSON válido, mas não é uma request JSON-RPC.
pub const INVALID_REQUEST: i32 = -32600;

/// Método desconhecido pelo servidor.
pub const METHOD_NOT_FOUND: i32 = -32601;

/// `params` ausentes ou com formato errado.
pub const INVALID_PARAMS: i32 = -32602;

/// Falha inesperada ao montar a resposta.
pub const INTERNAL_ERROR: i32 = -32603;

/// Versão do protocolo MCP anunciada no `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

// ═══════════════════════════════════════════════════════════════════════════
// Tipos básicos JSON-RPC
// ═══════════════════════════════════════════════════════════════════════════

/// ID de uma request JSON-RPC (número ou string).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum JsonRpcId {
    /// ID numérico, o mais comum entre clientes MCP.
    Number(i64),
    /// ID textual.
    String(String),
}

impl From<i64> for JsonRpcId {
    fn from(n: i64) -> Self {
        JsonRpcId::Number(n)
    }
}

impl From<String> for JsonRpcId {
    fn from(s: String) -> Self {
        JsonRpcId::String(s)
    }
}

impl From<&str> for JsonRpcId {
    fn from(s: &str) -> Self {
        JsonRpcId::String(s.to_string())
    }
}

/// Request JSON-RPC 2.0. Sem `id`, é uma notificação.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    /// Sempre "2.0".
    pub jsonrpc: String,

    /// Ausente em notificações.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<JsonRpcId>,

    /// Método chamado, ex.: `tools/call`.
    pub method: String,

    /// Parâmetros do método, quando houver.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    /// Monta uma request sem parâmetros.
    pub fn new(method: impl Into<String>, id: Option<JsonRpcId>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            method: method.into(),
            params: None,
        }
    }

    /// Define os parâmetros da request.
    pub fn with_params(mut self, params: Value) -> Self {
        self.params = Some(params);
        self
    }

    /// Notificações não recebem resposta.
    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }
}

/// Response JSON-RPC 2.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    /// Sempre "2.0".
    pub jsonrpc: String,

    /// `null` quando a request não pôde ser lida.
    pub id: Option<JsonRpcId>,

    /// Presente só em respostas de sucesso.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,

    /// Presente só em respostas de erro.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    /// Resposta de sucesso com o `result` dado.
    pub fn success(id: Option<JsonRpcId>, result: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Resposta de erro.
    pub fn error(id: Option<JsonRpcId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    /// `true` quando a resposta carrega um `error`.
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Erro JSON-RPC.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    /// Um dos códigos definidos acima.
    pub code: i32,

    /// Mensagem curta para o cliente.
    pub message: String,

    /// Detalhe opcional, ex.: o erro do serde.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    /// Erro com código e mensagem, sem dados.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Anexa dados ao erro.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Linha que não é JSON (ou não é UTF-8).
    pub fn parse_error() -> Self {
        Self::new(PARSE_ERROR, "Parse error")
    }

    /// JSON que não forma uma request.
    pub fn invalid_request() -> Self {
        Self::new(INVALID_REQUEST, "Invalid Request")
    }

    /// Método não suportado.
    pub fn method_not_found(method: &str) -> Self {
        Self::new(METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    /// Parâmetros inválidos.
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(INVALID_PARAMS, message)
    }

    /// Erro interno.
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new(INTERNAL_ERROR, message)
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tipos MCP específicos
// ═══════════════════════════════════════════════════════════════════════════

/// Nome e versão do servidor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerInfo {
    /// Nome do pacote (`testdino-mcp`).
    pub name: String,

    /// Versão do pacote.
    pub version: String,
}

impl Default for ServerInfo {
    fn default() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Capacidades anunciadas no `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ServerCapabilities {
    /// O servidor só expõe ferramentas.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<ToolsCapability>,
}

/// Capacidade de ferramentas.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ToolsCapability {
    /// A lista de ferramentas é fixa, então o campo fica ausente.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_changed: Option<bool>,
}

/// Resultado do `initialize`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    /// Sempre [`PROTOCOL_VERSION`].
    pub protocol_version: String,

    /// O que o servidor oferece.
    pub capabilities: ServerCapabilities,

    /// Nome e versão do servidor.
    pub server_info: ServerInfo,
}

impl Default for InitializeResult {
    fn default() -> Self {
        Self {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability::default()),
            },
            server_info: ServerInfo::default(),
        }
    }
}

/// Descrição de uma ferramenta MCP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescription {
    /// Nome usado em `tools/call`.
    pub name: String,

    /// Texto mostrado ao modelo para escolher a ferramenta.
    pub description: String,

    /// JSON Schema dos argumentos.
    pub input_schema: Value,
}

impl ToolDescription {
    /// Cria a descrição de uma ferramenta.
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Resultado de `tools/list`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListToolsResult {
    /// Catálogo completo, na ordem de registro.
    pub tools: Vec<ToolDescription>,
}

/// Parâmetros de `tools/call`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallToolParams {
    /// Nome da ferramenta chamada.
    pub name: String,

    /// Ausente vira `null`, que é tratado como objeto vazio.
    #[serde(default)]
    pub arguments: Value,
}

/// Conteúdo retornado por uma ferramenta.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    /// Bloco de texto simples.
    Text { text: String },
}

impl ToolContent {
    /// Bloco de texto.
    pub fn text(text: impl Into<String>) -> Self {
        ToolContent::Text { text: text.into() }
    }
}

/// Resultado de `tools/call`: sempre um único bloco de texto.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    /// Blocos de conteúdo; aqui sempre um só.
    pub content: Vec<ToolContent>,

    /// Serializado só quando `true`.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    /// Resultado de sucesso com um texto.
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(text)],
            is_error: false,
        }
    }

    /// JSON indentado com 2 espaços.
    pub fn success_json(value: &Value) -> Self {
        Self::success(serde_json::to_string_pretty(value).unwrap_or_default())
    }

    /// Resultado marcado com `isError`.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::text(message)],
            is_error: true,
        }
    }

    /// Texto do primeiro bloco.
    pub fn text(&self) -> &str {
        match self.content.first() {
            Some(ToolContent::Text { text }) => text,
            None => "",
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Testes
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_rpc_id_forms() {
        let id: JsonRpcId = 42.into();
        assert_eq!(id, JsonRpcId::Number(42));

        let id: JsonRpcId = "req-7".into();
        assert_eq!(id, JsonRpcId::String("req-7".to_string()));
    }

    #[test]
    fn test_json_rpc_request_deserialize() {
        let json = r#"{"jsonrpc":"2.0","id":"a1","method":"tools/call","params":{"name":"health"}}"#;
        let request: JsonRpcRequest = serde_json::from_str(json).unwrap();

        assert_eq!(request.method, "tools/call");
        assert_eq!(request.id, Some(JsonRpcId::String("a1".to_string())));
        assert!(!request.is_notification());
    }

    #[test]
    fn test_notification_has_no_id() {
        let json = r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#;
        let request: JsonRpcRequest = serde_json::from_str(json).unwrap();
        assert!(request.is_notification());
        assert!(request.params.is_none());
    }

    #[test]
    fn test_error_response_keeps_null_id() {
        let response = JsonRpcResponse::error(None, JsonRpcError::parse_error());
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["error"]["code"], PARSE_ERROR);
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(JsonRpcError::invalid_request().code, INVALID_REQUEST);
        assert_eq!(JsonRpcError::method_not_found("x").code, METHOD_NOT_FOUND);
        assert_eq!(JsonRpcError::invalid_params("x").code, INVALID_PARAMS);
        assert_eq!(JsonRpcError::internal_error("x").code, INTERNAL_ERROR);
    }

    #[test]
    fn test_tool_result_serialization() {
        let ok = serde_json::to_value(ToolResult::success("hi")).unwrap();
        assert_eq!(ok, json!({"content": [{"type": "text", "text": "hi"}]}));

        let err = serde_json::to_value(ToolResult::error("boom")).unwrap();
        assert_eq!(err["isError"], true);
    }

    #[test]
    fn test_success_json_is_pretty() {
        let result = ToolResult::success_json(&json!({"a": 1}));
        assert_eq!(result.text(), "{\n  \"a\": 1\n}");
    }

    #[test]
    fn test_initialize_result_default() {
        let value = serde_json::to_value(InitializeResult::default()).unwrap();
        assert_eq!(value["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(value["serverInfo"]["name"], "testdino-mcp");
        assert!(value["capabilities"]["tools"].is_object());
    }
}
