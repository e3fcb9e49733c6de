//! Servidor MCP do TestDino.
//!
//! Expõe as ferramentas do TestDino para clientes MCP (Cursor, Claude Desktop,
//! etc.) sobre stdio.
//!
//! ## Ferramentas Expostas
//!
//! - `health` - Verifica a conexão e a chave de API
//! - `list_testruns` - Lista execuções de teste
//! - `get_run_details` - Detalhes de execuções
//! - `list_testcase` - Lista casos de teste
//! - `get_testcase_details` - Detalhes de um caso de teste
//! - `upload_latest_local_test_runs` - Envia o relatório local do Playwright
//!
//! ## Exemplo de Uso
//!
//! ```ignore
//! use std::path::Path;
//! use testdino_mcp::mcp::McpServer;
//! use testdino_mcp::Config;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = Config::load_or_default(Path::new("testdino.toml")).with_environment();
//!     let mut server = McpServer::new(config).unwrap();
//!     server.run().await.unwrap();
//! }
//! ```

mod protocol;
mod server;
mod tools;
mod transport;

pub use protocol::{
    CallToolParams, InitializeResult, JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult, ServerCapabilities, ServerInfo, ToolContent, ToolDescription, ToolResult,
    ToolsCapability, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR, PROTOCOL_VERSION,
};

pub use server::McpServer;
pub use tools::{
    ToolHandler, GET_RUN_DETAILS, GET_TESTCASE_DETAILS, HEALTH, LIST_TESTCASE, LIST_TESTRUNS,
    UPLOAD_LATEST_LOCAL_TEST_RUNS,
};
pub use transport::{parse_line, Incoming, LineTransport, StdioTransport};
