// MCP server: JSON-RPC 2.0 over newline-delimited stdio

use crate::executor::ToolCaller;
use crate::protocol::{
    CallToolParams, CallToolResult, InitializeParams, InitializeResult, JsonRpcError,
    JsonRpcRequest, JsonRpcResponse, ListToolsResult, ServerCapabilities, ServerInfo,
    ToolsCapability, DEFAULT_PROTOCOL_VERSION,
};
use crate::tools::ToolRegistry;
use anyhow::{Context, Result};
use futures_util::StreamExt;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio_util::codec::{AnyDelimiterCodec, AnyDelimiterCodecError, FramedRead};
use tracing::{debug, error, info, warn};

const SERVER_NAME: &str = "haven-mcp";

/// Longest accepted request line, in bytes
pub const DEFAULT_MAX_LINE_BYTES: usize = 8 * 1024 * 1024;

/// Serves the tool registry to one MCP client
#[derive(Clone)]
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    caller: Arc<dyn ToolCaller>,
    max_line_bytes: usize,
}

impl McpServer {
    pub fn new(registry: ToolRegistry, caller: Arc<dyn ToolCaller>) -> Self {
        Self {
            registry: Arc::new(registry),
            caller,
            max_line_bytes: DEFAULT_MAX_LINE_BYTES,
        }
    }

    /// Cap the length of a single request line. Longer lines are
    /// discarded and answered with a parse error.
    pub fn with_max_line_bytes(mut self, max_line_bytes: usize) -> Self {
        self.max_line_bytes = max_line_bytes;
        self
    }

    /// Serve on stdin/stdout until stdin closes
    pub async fn start(&self) -> Result<()> {
        info!(tools = self.registry.len(), "MCP server listening on stdio");
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serve requests read from `reader`, writing responses to `writer`.
    ///
    /// Each request runs in its own task, so responses can leave in a
    /// different order than requests arrived. Returns once the input is
    /// exhausted and every in-flight response has been written.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let codec =
            AnyDelimiterCodec::new_with_max_length(b"\n".to_vec(), Vec::new(), self.max_line_bytes);
        let mut lines = FramedRead::new(reader, codec);
        let (response_tx, mut response_rx) = mpsc::channel::<JsonRpcResponse>(64);

        let writer_task = tokio::spawn(async move {
            let mut writer = writer;
            while let Some(response) = response_rx.recv().await {
                let mut line = match serde_json::to_string(&response) {
                    Ok(line) => line,
                    Err(e) => {
                        error!(error = %e, "Failed to serialize response");
                        continue;
                    }
                };
                line.push('\n');
                writer.write_all(line.as_bytes()).await?;
                writer.flush().await?;
            }
            Ok::<(), std::io::Error>(())
        });

        // After a decode error FramedRead yields `None` once, then resumes
        let mut resume_after_error = false;

        loop {
            let frame = match lines.next().await {
                Some(frame) => frame,
                None if resume_after_error => {
                    resume_after_error = false;
                    continue;
                }
                None => break,
            };

            let line = match frame {
                Ok(line) => {
                    resume_after_error = false;
                    line
                }
                Err(AnyDelimiterCodecError::MaxChunkLengthExceeded) => {
                    warn!(max_bytes = self.max_line_bytes, "Request line too long, discarding");
                    resume_after_error = true;
                    let response = JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error());
                    if response_tx.send(response).await.is_err() {
                        break;
                    }
                    continue;
                }
                Err(AnyDelimiterCodecError::Io(e)) => {
                    error!(error = %e, "Failed to read request line, closing session");
                    break;
                }
            };

            let request = match std::str::from_utf8(&line) {
                Ok(text) if text.trim().is_empty() => continue,
                Ok(text) => parse_request(text.trim()),
                Err(e) => {
                    warn!(error = %e, "Received request line that is not UTF-8");
                    Err(JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error()))
                }
            };

            let request = match request {
                Ok(request) => request,
                Err(response) => {
                    if response_tx.send(response).await.is_err() {
                        break;
                    }
                    continue;
                }
            };

            let server = self.clone();
            let response_tx = response_tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_request(request).await {
                    if response_tx.send(response).await.is_err() {
                        debug!("Response channel closed before reply was sent");
                    }
                }
            });
        }

        drop(response_tx);
        writer_task
            .await
            .context("Response writer task panicked")?
            .context("Failed to write response")?;

        info!("MCP session ended");
        Ok(())
    }

    /// Handle one request. Notifications yield no response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            debug!(method = %request.method, "Received notification");
            return None;
        }

        let JsonRpcRequest { id, method, params, .. } = request;
        let id = id.unwrap_or(Value::Null);

        let outcome = match method.as_str() {
            "initialize" => self.initialize(params),
            "ping" => Ok(Value::Object(Map::new())),
            "tools/list" => self.list_tools(),
            "tools/call" => self.call_tool(params).await,
            other => Err(JsonRpcError::method_not_found(other)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => JsonRpcResponse::error(id, err),
        })
    }

    fn initialize(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: InitializeParams = match params {
            Some(value) => serde_json::from_value(value)
                .map_err(|e| JsonRpcError::invalid_params(format!("Invalid initialize params: {}", e)))?,
            None => InitializeParams::default(),
        };

        if let Some(client) = &params.client_info {
            info!(client = %client.name, version = %client.version, "Client connected");
        }

        to_result(InitializeResult {
            protocol_version: params
                .protocol_version
                .unwrap_or_else(|| DEFAULT_PROTOCOL_VERSION.to_string()),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: false,
                }),
            },
            server_info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        })
    }

    fn list_tools(&self) -> Result<Value, JsonRpcError> {
        to_result(ListToolsResult {
            tools: self.registry.list_schemas(),
        })
    }

    async fn call_tool(&self, params: Option<Value>) -> Result<Value, JsonRpcError> {
        let params: CallToolParams = params
            .ok_or_else(|| JsonRpcError::invalid_params("Missing tools/call params"))
            .and_then(|value| {
                serde_json::from_value(value)
                    .map_err(|e| JsonRpcError::invalid_params(format!("Invalid tools/call params: {}", e)))
            })?;

        let tool = self
            .registry
            .get(&params.name)
            .ok_or_else(|| JsonRpcError::invalid_params(format!("Unknown tool: {}", params.name)))?;

        let input = match params.arguments {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(JsonRpcError::invalid_params(
                    "Tool arguments must be a JSON object",
                ))
            }
        };

        let result = match self.caller.call(tool, &input).await {
            Ok(call) => {
                let text = serde_json::to_string_pretty(&call)
                    .map_err(|e| JsonRpcError::internal_error(e.to_string()))?;
                CallToolResult::text(text, !call.ok)
            }
            Err(e) => {
                warn!(tool = %tool.name, error = %e, "Tool call rejected before sending");
                CallToolResult::error(e.to_string())
            }
        };

        to_result(result)
    }
}

/// Parse one input line, or build the error response for it
fn parse_request(raw: &str) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_str(raw).map_err(|e| {
        warn!(error = %e, "Received malformed JSON");
        JsonRpcResponse::error(Value::Null, JsonRpcError::parse_error())
    })?;

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| {
        warn!(error = %e, "Received invalid JSON-RPC request");
        JsonRpcResponse::error(id, JsonRpcError::invalid_request(format!("Invalid Request: {}", e)))
    })
}

fn to_result(result: impl Serialize) -> Result<Value, JsonRpcError> {
    serde_json::to_value(result).map_err(|e| JsonRpcError::internal_error(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExecutorConfig;
    use crate::executor::{CallResult, ToolExecutor};
    use haven_core::{resolve, ResolveError, ToolDefinition};
    use serde_json::json;
    use tokio::io::AsyncReadExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Resolves for real and echoes the resolved request back without I/O
    struct EchoCaller;

    #[async_trait::async_trait]
    impl ToolCaller for EchoCaller {
        async fn call(
            &self,
            tool: &ToolDefinition,
            input: &Map<String, Value>,
        ) -> Result<CallResult, ResolveError> {
            let resolved = resolve(tool, input)?;
            Ok(CallResult {
                ok: !resolved.path.contains("fail"),
                status: 200,
                data: serde_json::to_value(&resolved).unwrap(),
            })
        }
    }

    fn echo_server() -> McpServer {
        McpServer::new(ToolRegistry::with_catalog(), Arc::new(EchoCaller))
    }

    async fn run_session(server: &McpServer, lines: &[String]) -> Vec<Value> {
        let mut input = Vec::new();
        for line in lines {
            input.extend_from_slice(line.as_bytes());
            input.push(b'\n');
        }
        run_raw_session(server, &input).await
    }

    async fn run_raw_session(server: &McpServer, input: &[u8]) -> Vec<Value> {
        let (mut client_in, server_in) = tokio::io::duplex(1 << 20);
        let (server_out, mut client_out) = tokio::io::duplex(1 << 20);

        client_in.write_all(input).await.unwrap();
        drop(client_in);

        server.serve(server_in, server_out).await.unwrap();

        let mut output = String::new();
        client_out.read_to_string(&mut output).await.unwrap();
        output
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    fn request(id: i64, method: &str, params: Value) -> String {
        json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}).to_string()
    }

    fn by_id(responses: &[Value], id: i64) -> &Value {
        responses
            .iter()
            .find(|r| r["id"] == id)
            .unwrap_or_else(|| panic!("no response with id {}", id))
    }

    fn call_result(response: &Value) -> CallResult {
        let text = response["result"]["content"][0]["text"].as_str().unwrap();
        serde_json::from_str(text).unwrap()
    }

    #[tokio::test]
    async fn test_initialize_and_list() {
        let responses = run_session(
            &echo_server(),
            &[
                request(1, "initialize", json!({
                    "protocolVersion": "2025-03-26",
                    "capabilities": {},
                    "clientInfo": {"name": "test-client", "version": "1.0"}
                })),
                json!({"jsonrpc": "2.0", "method": "notifications/initialized"}).to_string(),
                request(2, "tools/list", json!({})),
                request(3, "ping", json!({})),
            ],
        )
        .await;

        // The notification gets no reply
        assert_eq!(responses.len(), 3);

        let init = by_id(&responses, 1);
        assert_eq!(init["result"]["protocolVersion"], "2025-03-26");
        assert_eq!(init["result"]["serverInfo"]["name"], "haven-mcp");
        assert_eq!(init["result"]["capabilities"]["tools"]["listChanged"], false);

        let tools = by_id(&responses, 2)["result"]["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 21);
        let get_child = tools.iter().find(|t| t["name"] == "get_child").unwrap();
        assert_eq!(get_child["inputSchema"]["required"], json!(["childId"]));

        assert_eq!(by_id(&responses, 3)["result"], json!({}));
    }

    #[tokio::test]
    async fn test_initialize_default_version() {
        let responses = run_session(&echo_server(), &[request(1, "initialize", json!({}))]).await;
        assert_eq!(responses[0]["result"]["protocolVersion"], DEFAULT_PROTOCOL_VERSION);
    }

    #[tokio::test]
    async fn test_non_utf8_line_does_not_end_session() {
        let mut input = b"\xff\xfe{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\"}\n".to_vec();
        input.extend_from_slice(request(2, "ping", json!({})).as_bytes());
        input.push(b'\n');

        let responses = run_raw_session(&echo_server(), &input).await;

        assert_eq!(responses.len(), 2);
        let parse_error = responses.iter().find(|r| r["id"].is_null()).unwrap();
        assert_eq!(parse_error["error"]["code"], JsonRpcError::PARSE_ERROR);
        assert_eq!(by_id(&responses, 2)["result"], json!({}));
    }

    #[tokio::test]
    async fn test_overlong_line_is_discarded() {
        let server = echo_server().with_max_line_bytes(64);
        let long_line = format!(
            "{{\"jsonrpc\":\"2.0\",\"id\":1,\"method\":\"ping\",\"params\":{{\"pad\":\"{}\"}}}}",
            "x".repeat(200)
        );

        let responses = run_session(&server, &[long_line, request(2, "ping", json!({}))]).await;

        assert_eq!(responses.len(), 2);
        let parse_error = responses.iter().find(|r| r["id"].is_null()).unwrap();
        assert_eq!(parse_error["error"]["code"], JsonRpcError::PARSE_ERROR);
        assert_eq!(by_id(&responses, 2)["result"], json!({}));
    }

    #[tokio::test]
    async fn test_tools_call_routes_input() {
        let responses = run_session(
            &echo_server(),
            &[
                request(1, "tools/call", json!({
                    "name": "create_child",
                    "arguments": {"familyId": "f_1", "name": "Emma", "birth_date": "2016-05-01"}
                })),
                request(2, "tools/call", json!({
                    "name": "list_platforms_by_category",
                    "arguments": {"category": "streaming"}
                })),
                request(3, "tools/call", json!({"name": "list_families"})),
            ],
        )
        .await;

        let created = call_result(by_id(&responses, 1));
        assert!(created.ok);
        assert_eq!(created.data["path"], "/families/f_1/children");
        assert_eq!(created.data["body"], json!({"name": "Emma", "birth_date": "2016-05-01"}));
        assert!(by_id(&responses, 1)["result"].get("isError").is_none());

        let listed = call_result(by_id(&responses, 2));
        assert_eq!(listed.data["query"], json!({"category": "streaming"}));
        assert!(listed.data.get("body").is_none());

        let families = call_result(by_id(&responses, 3));
        assert_eq!(families.data["path"], "/families");
    }

    #[tokio::test]
    async fn test_failed_call_sets_is_error() {
        let responses = run_session(
            &echo_server(),
            &[request(1, "tools/call", json!({
                "name": "get_device",
                "arguments": {"deviceId": "fail"}
            }))],
        )
        .await;

        assert_eq!(responses[0]["result"]["isError"], true);
        assert!(!call_result(&responses[0]).ok);
    }

    #[tokio::test]
    async fn test_missing_path_param_is_tool_error() {
        let responses = run_session(
            &echo_server(),
            &[request(1, "tools/call", json!({"name": "get_device", "arguments": {}}))],
        )
        .await;

        let result = &responses[0]["result"];
        assert_eq!(result["isError"], true);
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Error: "));
        assert!(text.contains("deviceId"));
    }

    #[tokio::test]
    async fn test_protocol_errors() {
        let responses = run_session(
            &echo_server(),
            &[
                request(1, "tools/call", json!({"name": "no_such_tool", "arguments": {}})),
                request(2, "tools/call", json!({"name": "get_child", "arguments": ["c_1"]})),
                request(3, "resources/list", json!({})),
                request(4, "tools/call", json!({"arguments": {}})),
                "{not json".to_string(),
                json!({"jsonrpc": "2.0", "id": 6}).to_string(),
            ],
        )
        .await;

        assert_eq!(responses.len(), 6);
        assert_eq!(by_id(&responses, 1)["error"]["code"], JsonRpcError::INVALID_PARAMS);
        assert_eq!(by_id(&responses, 2)["error"]["code"], JsonRpcError::INVALID_PARAMS);
        assert_eq!(by_id(&responses, 3)["error"]["code"], JsonRpcError::METHOD_NOT_FOUND);
        assert_eq!(by_id(&responses, 4)["error"]["code"], JsonRpcError::INVALID_PARAMS);
        assert_eq!(by_id(&responses, 6)["error"]["code"], JsonRpcError::INVALID_REQUEST);

        let parse_error = responses.iter().find(|r| r["id"].is_null()).unwrap();
        assert_eq!(parse_error["error"]["code"], JsonRpcError::PARSE_ERROR);
    }

    #[tokio::test]
    async fn test_blank_lines_ignored() {
        let responses = run_session(
            &echo_server(),
            &[String::new(), "   ".to_string(), request(1, "ping", json!({}))],
        )
        .await;

        assert_eq!(responses.len(), 1);
    }

    #[tokio::test]
    async fn test_many_concurrent_calls_all_answered() {
        let lines: Vec<String> = (0..50)
            .map(|i| {
                request(i, "tools/call", json!({
                    "name": "get_child",
                    "arguments": {"childId": format!("c_{}", i)}
                }))
            })
            .collect();

        let responses = run_session(&echo_server(), &lines).await;

        assert_eq!(responses.len(), 50);
        for i in 0..50 {
            let result = call_result(by_id(&responses, i));
            assert_eq!(result.data["path"], format!("/children/c_{}", i));
        }
    }

    #[tokio::test]
    async fn test_end_to_end_with_executor() {
        let api = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/children/c_123"))
            .respond_with(ResponseTemplate::new(429).set_body_json(json!({
                "error": "rate_limited",
                "retry_after": 30
            })))
            .mount(&api)
            .await;

        let executor = ToolExecutor::new(ExecutorConfig::new(api.uri(), "sk-test")).unwrap();
        let server = McpServer::new(ToolRegistry::with_catalog(), Arc::new(executor));

        let responses = run_session(
            &server,
            &[request(1, "tools/call", json!({
                "name": "get_child",
                "arguments": {"childId": "c_123"}
            }))],
        )
        .await;

        let response = &responses[0];
        assert_eq!(response["result"]["isError"], true);
        assert_eq!(
            call_result(response),
            CallResult {
                ok: false,
                status: 429,
                data: json!({"error": "rate_limited", "retry_after": 30}),
            }
        );
    }
}
