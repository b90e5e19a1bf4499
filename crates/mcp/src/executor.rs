// Tool call execution against the Haven REST API

use crate::config::ExecutorConfig;
use haven_core::{resolve, HttpMethod, ResolveError, ResolvedRequest, ToolDefinition};
use reqwest::{header, Client, Method};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Uniform outcome of a tool call. Produced for every call, including
/// failed ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallResult {
    /// True only when a response arrived with a 2xx status
    pub ok: bool,
    /// HTTP status, or 0 when no response was received at all
    pub status: u16,
    /// Parsed JSON body, raw body text, or a failure descriptor
    pub data: Value,
}

impl CallResult {
    /// Build a result from a received response body
    pub fn from_response(status: u16, body: String) -> Self {
        let data = match serde_json::from_str::<Value>(&body) {
            Ok(parsed) => parsed,
            Err(_) => Value::String(body),
        };

        Self {
            ok: (200..300).contains(&status),
            status,
            data,
        }
    }

    /// No HTTP response was received (DNS, connect, TLS, reset, ...)
    pub fn transport_failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: 0,
            data: json!({
                "error": "request_failed",
                "message": message.into(),
            }),
        }
    }

    /// Headers arrived but the body could not be read
    fn body_read_failure(status: u16, message: impl Into<String>) -> Self {
        Self {
            ok: false,
            status,
            data: json!({
                "error": "response_read_failed",
                "message": message.into(),
            }),
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status == 0
    }
}

/// Errors constructing an executor
#[derive(Debug, thiserror::Error)]
pub enum ExecutorError {
    #[error("API key contains characters not allowed in an HTTP header")]
    InvalidApiKey,

    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Something that can run a tool call to completion
#[async_trait::async_trait]
pub trait ToolCaller: Send + Sync {
    /// Resolve and run a call. The only error is a resolution error, which
    /// is raised before any I/O; every other outcome is a `CallResult`.
    async fn call(
        &self,
        tool: &ToolDefinition,
        input: &Map<String, Value>,
    ) -> Result<CallResult, ResolveError>;
}

/// Issues one HTTP request per tool call
#[derive(Debug, Clone)]
pub struct ToolExecutor {
    client: Client,
    config: ExecutorConfig,
}

impl ToolExecutor {
    pub fn new(config: ExecutorConfig) -> Result<Self, ExecutorError> {
        let mut headers = header::HeaderMap::new();

        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|_| ExecutorError::InvalidApiKey)?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .user_agent(concat!("haven-mcp/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Resolve `input` against `tool` and execute the request
    pub async fn execute(
        &self,
        tool: &ToolDefinition,
        input: &Map<String, Value>,
    ) -> Result<CallResult, ResolveError> {
        let resolved = resolve(tool, input)?;
        debug!(
            tool = %tool.name,
            method = %tool.method(),
            path = %resolved.path,
            "Executing tool call"
        );

        Ok(self.execute_resolved(tool.method(), &resolved).await)
    }

    /// Execute an already resolved request. Never fails; failures are
    /// reported through the returned `CallResult`.
    pub async fn execute_resolved(&self, method: HttpMethod, request: &ResolvedRequest) -> CallResult {
        let url = self.build_url(request);

        let mut builder = self.client.request(reqwest_method(method), url.as_str());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                let message = describe_error(&e);
                warn!(method = %method, path = %request.path, error = %message, "Tool request failed before a response arrived");
                return CallResult::transport_failure(message);
            }
        };

        let status = response.status().as_u16();
        match response.text().await {
            Ok(body) => {
                debug!(status = status, "Tool request completed");
                CallResult::from_response(status, body)
            }
            Err(e) => {
                let message = describe_error(&e);
                warn!(status = status, error = %message, "Failed to read tool response body");
                CallResult::body_read_failure(status, message)
            }
        }
    }

    /// `base_url + path`, plus a query string when there is one
    fn build_url(&self, request: &ResolvedRequest) -> String {
        let mut url = format!("{}{}", self.config.base_url, request.path);
        let query = encode_query(&request.query);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        url
    }
}

#[async_trait::async_trait]
impl ToolCaller for ToolExecutor {
    async fn call(
        &self,
        tool: &ToolDefinition,
        input: &Map<String, Value>,
    ) -> Result<CallResult, ResolveError> {
        self.execute(tool, input).await
    }
}

fn reqwest_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Delete => Method::DELETE,
        HttpMethod::Patch => Method::PATCH,
    }
}

/// Form-urlencode query fields. Arrays repeat the key per element,
/// objects are sent as compact JSON and nulls are left out.
fn encode_query(query: &BTreeMap<String, Value>) -> String {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (key, value) in query {
        match value {
            Value::Array(items) => {
                for item in items {
                    if let Some(text) = query_text(item) {
                        serializer.append_pair(key, &text);
                    }
                }
            }
            other => {
                if let Some(text) = query_text(other) {
                    serializer.append_pair(key, &text);
                }
            }
        }
    }
    serializer.finish()
}

fn query_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Error text including its source chain; reqwest's top-level message
/// alone rarely names the underlying cause.
fn describe_error(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn executor(base_url: &str) -> ToolExecutor {
        ToolExecutor::new(ExecutorConfig::new(base_url, "sk-test-key")).unwrap()
    }

    fn tool(method: HttpMethod, path: &str) -> ToolDefinition {
        ToolDefinition::new("test_tool", "", method, path, json!({"type": "object"}))
    }

    fn input(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test input must be an object"),
        }
    }

    #[tokio::test]
    async fn test_get_with_path_param() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/children/c_123"))
            .and(header("Authorization", "Bearer sk-test-key"))
            .and(header("Content-Type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "c_123",
                "name": "Emma"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let result = executor(&server.uri())
            .execute(
                &tool(HttpMethod::Get, "/children/{childId}"),
                &input(json!({"childId": "c_123"})),
            )
            .await
            .unwrap();

        assert!(result.ok);
        assert_eq!(result.status, 200);
        assert_eq!(result.data["name"], "Emma");
    }

    #[tokio::test]
    async fn test_post_sends_json_body() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/families/f_1/children"))
            .and(body_json(json!({"name": "Emma", "birth_date": "2016-05-01"})))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "c_new"})))
            .expect(1)
            .mount(&server)
            .await;

        let result = executor(&server.uri())
            .execute(
                &tool(HttpMethod::Post, "/families/{familyId}/children"),
                &input(json!({"familyId": "f_1", "name": "Emma", "birth_date": "2016-05-01"})),
            )
            .await
            .unwrap();

        assert!(result.ok);
        assert_eq!(result.status, 201);
        assert_eq!(result.data, json!({"id": "c_new"}));
    }

    #[tokio::test]
    async fn test_get_sends_query_and_no_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/platforms/by-category"))
            .and(query_param("category", "streaming"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let result = executor(&server.uri())
            .execute(
                &tool(HttpMethod::Get, "/platforms/by-category"),
                &input(json!({"category": "streaming"})),
            )
            .await
            .unwrap();

        assert!(result.ok);
        assert_eq!(result.data, json!([]));

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_rate_limited_passes_through() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/families"))
            .respond_with(
                ResponseTemplate::new(429)
                    .set_body_json(json!({"error": "rate_limited", "retry_after": 30})),
            )
            .mount(&server)
            .await;

        let result = executor(&server.uri())
            .execute(&tool(HttpMethod::Get, "/families"), &Map::new())
            .await
            .unwrap();

        assert_eq!(
            result,
            CallResult {
                ok: false,
                status: 429,
                data: json!({"error": "rate_limited", "retry_after": 30}),
            }
        );
        assert!(!result.is_transport_failure());
    }

    #[tokio::test]
    async fn test_plain_text_body_kept_raw() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string("all good"))
            .mount(&server)
            .await;

        let result = executor(&server.uri())
            .execute(&tool(HttpMethod::Get, "/health"), &Map::new())
            .await
            .unwrap();

        assert!(result.ok);
        assert_eq!(result.data, Value::String("all good".to_string()));
    }

    #[tokio::test]
    async fn test_server_error_with_text_body() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/devices/d_1"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal failure"))
            .mount(&server)
            .await;

        let result = executor(&server.uri())
            .execute(
                &tool(HttpMethod::Delete, "/devices/{deviceId}"),
                &input(json!({"deviceId": "d_1"})),
            )
            .await
            .unwrap();

        assert!(!result.ok);
        assert_eq!(result.status, 500);
        assert_eq!(result.data, "internal failure");
    }

    #[tokio::test]
    async fn test_empty_body_becomes_empty_string() {
        let server = MockServer::start().await;

        Mock::given(method("DELETE"))
            .and(path("/families/f_9"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let result = executor(&server.uri())
            .execute(
                &tool(HttpMethod::Delete, "/families/{familyId}"),
                &input(json!({"familyId": "f_9"})),
            )
            .await
            .unwrap();

        assert!(result.ok);
        assert_eq!(result.status, 204);
        assert_eq!(result.data, "");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_status_zero() {
        // Reserve a port, then release it so nothing is listening there
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let result = executor(&format!("http://127.0.0.1:{}", port))
            .execute(&tool(HttpMethod::Get, "/families"), &Map::new())
            .await
            .unwrap();

        assert!(!result.ok);
        assert_eq!(result.status, 0);
        assert!(result.is_transport_failure());
        assert_eq!(result.data["error"], "request_failed");
        assert!(!result.data["message"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_truncated_body_keeps_status() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        // Promise 100 bytes, send 3, then hang up
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    return;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\nabc")
                .await
                .unwrap();
            socket.shutdown().await.unwrap();
        });

        let result = executor(&format!("http://{}", addr))
            .execute(&tool(HttpMethod::Get, "/families"), &Map::new())
            .await
            .unwrap();

        assert!(!result.ok);
        assert_eq!(result.status, 200);
        assert!(!result.is_transport_failure());
        assert_eq!(result.data["error"], "response_read_failed");
    }

    #[tokio::test]
    async fn test_malformed_base_url_is_transport_failure() {
        let result = executor("not a url")
            .execute(&tool(HttpMethod::Get, "/families"), &Map::new())
            .await
            .unwrap();

        assert_eq!(result.status, 0);
        assert_eq!(result.data["error"], "request_failed");
    }

    #[tokio::test]
    async fn test_missing_path_param_sends_nothing() {
        let server = MockServer::start().await;

        let err = executor(&server.uri())
            .execute(&tool(HttpMethod::Get, "/devices/{deviceId}"), &Map::new())
            .await
            .unwrap_err();

        assert!(matches!(err, ResolveError::MissingPathParam { ref name, .. } if name == "deviceId"));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_build_url_encodes_query() {
        let exec = executor("https://api.example.com/v1");
        let mut query = BTreeMap::new();
        query.insert("q".to_string(), json!("family time"));
        query.insert("limit".to_string(), json!(10));
        query.insert("ids".to_string(), json!(["a", "b"]));
        query.insert("skip".to_string(), Value::Null);

        let url = exec.build_url(&ResolvedRequest {
            path: "/platforms".to_string(),
            query,
            body: None,
        });

        assert_eq!(
            url,
            "https://api.example.com/v1/platforms?ids=a&ids=b&limit=10&q=family+time"
        );
    }

    #[tokio::test]
    async fn test_build_url_without_query() {
        let exec = executor("https://api.example.com");
        let url = exec.build_url(&ResolvedRequest {
            path: "/families".to_string(),
            query: BTreeMap::new(),
            body: None,
        });

        assert_eq!(url, "https://api.example.com/families");
    }

    #[test]
    fn test_from_response_parses_json() {
        let result = CallResult::from_response(422, r#"{"error":"invalid","field":"name"}"#.to_string());

        assert!(!result.ok);
        assert_eq!(result.status, 422);
        assert_eq!(result.data["field"], "name");
    }

    #[test]
    fn test_invalid_api_key_rejected() {
        let err = ToolExecutor::new(ExecutorConfig::new("https://api.example.com", "bad\nkey"));
        assert!(matches!(err, Err(ExecutorError::InvalidApiKey)));
    }

    #[test]
    fn test_executor_debug_hides_key() {
        let exec = executor("https://api.example.com");
        assert!(!format!("{:?}", exec).contains("sk-test-key"));
    }
}
