//! Testes de integração para o protocolo MCP.

use serde_json::{json, Value};
use testdino_mcp::mcp::{LineTransport, McpServer, ToolHandler};
use testdino_mcp::Config;

/// Mensagem JSON-RPC em uma linha.
fn jsonrpc_request(id: u64, method: &str, params: Option<Value>) -> String {
    let mut req = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
    });
    if let Some(p) = params {
        req["params"] = p;
    }
    format!("{}\n", serde_json::to_string(&req).unwrap())
}

/// Roda uma sessão completa e devolve as respostas na ordem.
async fn session(server: &mut McpServer, input: &str) -> Vec<Value> {
    let mut transport = LineTransport::new(input.as_bytes(), Vec::new());
    server.serve(&mut transport).await.unwrap();

    let output = String::from_utf8(transport.into_writer()).unwrap();
    output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect()
}

fn server() -> McpServer {
    McpServer::new(Config::default()).unwrap()
}

#[tokio::test]
async fn test_full_lifecycle() {
    let mut input = String::new();
    input.push_str(&jsonrpc_request(
        1,
        "initialize",
        Some(json!({"protocolVersion": "2024-11-05", "capabilities": {}})),
    ));
    input.push_str("{\"jsonrpc\":\"2.0\",\"method\":\"notifications/initialized\"}\n");
    input.push_str(&jsonrpc_request(2, "tools/list", None));
    input.push_str(&jsonrpc_request(3, "ping", None));
    input.push_str(&jsonrpc_request(4, "shutdown", None));

    let mut server = server();
    let responses = session(&mut server, &input).await;

    let ids: Vec<&Value> = responses.iter().map(|r| &r["id"]).collect();
    assert_eq!(ids, vec![&json!(1), &json!(2), &json!(3), &json!(4)]);

    assert_eq!(responses[0]["result"]["protocolVersion"], "2024-11-05");
    assert!(responses[0]["result"]["capabilities"]["tools"].is_object());

    let tools = responses[1]["result"]["tools"].as_array().unwrap();
    let names: Vec<&str> = tools.iter().filter_map(|t| t["name"].as_str()).collect();
    assert_eq!(
        names,
        vec![
            "health",
            "list_testruns",
            "get_run_details",
            "list_testcase",
            "get_testcase_details",
            "upload_latest_local_test_runs",
        ]
    );

    assert_eq!(responses[2]["result"], json!({}));
    assert_eq!(responses[3]["result"], Value::Null);
    assert!(!server.is_initialized());
}

#[tokio::test]
async fn test_malformed_and_unknown_messages() {
    let mut input = String::from("{\"jsonrpc\": \"2.0\", \"id\": 1, \n");
    input.push_str("{\"jsonrpc\":\"2.0\",\"id\":7}\n");
    input.push_str(&jsonrpc_request(8, "prompts/list", None));

    let responses = session(&mut server(), &input).await;

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["error"]["code"], -32700);
    assert_eq!(responses[0]["id"], Value::Null);
    assert_eq!(responses[1]["error"]["code"], -32600);
    assert_eq!(responses[1]["id"], 7);
    assert_eq!(responses[2]["error"]["code"], -32601);
}

#[tokio::test]
async fn test_invalid_utf8_line_keeps_session_alive() {
    let mut input = jsonrpc_request(1, "ping", None).into_bytes();
    input.extend_from_slice(b"\xff\xfe garbage\n");
    input.extend_from_slice(jsonrpc_request(2, "ping", None).as_bytes());

    let mut transport = LineTransport::new(&input[..], Vec::new());
    server().serve(&mut transport).await.unwrap();

    let output = String::from_utf8(transport.into_writer()).unwrap();
    let responses: Vec<Value> = output
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(responses.len(), 3);
    assert_eq!(responses[0]["id"], 1);
    assert_eq!(responses[1]["error"]["code"], -32700);
    assert_eq!(responses[1]["id"], Value::Null);
    assert_eq!(responses[2]["id"], 2);
    assert_eq!(responses[2]["result"], json!({}));
}

#[tokio::test]
async fn test_tool_errors_are_results_not_protocol_errors() {
    let input = [
        jsonrpc_request(
            1,
            "tools/call",
            Some(json!({"name": "get_testcase_details", "arguments": {"testcase_name": "x"}})),
        ),
        jsonrpc_request(
            2,
            "tools/call",
            Some(json!({"name": "list_testruns", "arguments": {}})),
        ),
        jsonrpc_request(3, "tools/call", Some(json!({"name": "does_not_exist"}))),
    ]
    .concat();

    let responses = session(&mut server(), &input).await;

    for response in &responses {
        assert!(response.get("error").is_none());
        assert_eq!(response["result"]["isError"], true);
    }

    let text = |i: usize| responses[i]["result"]["content"][0]["text"].as_str().unwrap();
    assert!(text(0).starts_with("When using 'testcase_name'"));
    assert!(text(1).contains("TESTDINO_API_KEY"));
    assert_eq!(text(2), "Unknown tool: does_not_exist");
}

#[tokio::test]
async fn test_health_without_credential() {
    let input = jsonrpc_request(
        1,
        "tools/call",
        Some(json!({"name": "health", "arguments": {"name": "Dev"}})),
    );

    let handler = ToolHandler::new(Config::default())
        .unwrap()
        .with_working_dir(std::env::temp_dir());
    let responses = session(&mut McpServer::with_handler(handler), &input).await;

    let result = &responses[0]["result"];
    assert!(result.get("isError").is_none());
    assert_eq!(result["content"][0]["type"], "text");
    assert!(result["content"][0]["text"]
        .as_str()
        .unwrap()
        .starts_with("Hello, Dev! 👋\n\nThis is TestDino's MCP server responding."));
}

mod protocol_tests {
    use serde_json::json;
    use testdino_mcp::mcp::{
        JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse, ToolResult, INVALID_PARAMS,
        METHOD_NOT_FOUND, PARSE_ERROR,
    };

    #[test]
    fn test_json_rpc_id_serialization() {
        assert_eq!(serde_json::to_string(&JsonRpcId::Number(42)).unwrap(), "42");
        assert_eq!(
            serde_json::to_string(&JsonRpcId::String("a".to_string())).unwrap(),
            "\"a\""
        );
    }

    #[test]
    fn test_request_builder() {
        let request = JsonRpcRequest::new("tools/call", Some(5.into()))
            .with_params(json!({"name": "health"}));
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["jsonrpc"], "2.0");
        assert_eq!(value["params"]["name"], "health");
    }

    #[test]
    fn test_response_shapes() {
        let ok = JsonRpcResponse::success(Some(1.into()), json!({"x": 1}));
        assert!(!ok.is_error());

        let err = JsonRpcResponse::error(Some(1.into()), JsonRpcError::invalid_params("bad"));
        assert_eq!(err.error.unwrap().code, INVALID_PARAMS);
    }

    #[test]
    fn test_error_constructors() {
        assert_eq!(JsonRpcError::parse_error().code, PARSE_ERROR);
        let err = JsonRpcError::method_not_found("resources/list");
        assert_eq!(err.code, METHOD_NOT_FOUND);
        assert!(err.message.contains("resources/list"));
    }

    #[test]
    fn test_tool_result_text() {
        assert_eq!(ToolResult::success("hi").text(), "hi");
        assert!(ToolResult::error("no").is_error);
    }
}
