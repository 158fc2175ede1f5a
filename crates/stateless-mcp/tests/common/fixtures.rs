//! Test fixtures: in-process routers, request builders, SSE decoding.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use stateless_mcp::config::ServerConfig;
use stateless_mcp::registry::{RequestContext, ToolDescriptor, ToolHandler};
use stateless_mcp::session::TransportSession;
use stateless_mcp::types::{
    JsonRpcMessage, JsonRpcRequest, McpResult, RequestId, ToolCallResult, ToolDefinition,
};
use stateless_mcp::{HttpTransport, ProtocolHandler, Registry};

pub const TEST_TOKEN: &str = "test-secret";

pub const ACCEPT_BOTH: &str = "application/json, text/event-stream";
pub const ACCEPT_JSON: &str = "application/json";

/// Config with the given secret and everything else default.
pub fn config(token: Option<&str>) -> ServerConfig {
    ServerConfig {
        auth_token: token.map(str::to_string),
        ..ServerConfig::default()
    }
}

pub fn handler_with(registry: Registry) -> Arc<ProtocolHandler> {
    Arc::new(ProtocolHandler::new(Arc::new(registry)))
}

pub fn builtin_handler() -> Arc<ProtocolHandler> {
    handler_with(Registry::with_builtins().expect("builtins register"))
}

pub fn router_with(registry: Registry, config: &ServerConfig) -> Router {
    let handler = ProtocolHandler::new(Arc::new(registry));
    HttpTransport::new(handler, config).router()
}

pub fn builtin_router(token: Option<&str>) -> Router {
    router_with(
        Registry::with_builtins().expect("builtins register"),
        &config(token),
    )
}

/// A JSON-RPC request body.
pub fn request_body(id: i64, method: &str, params: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params})
}

pub fn tool_call_body(id: i64, name: &str, arguments: Value) -> Value {
    request_body(id, "tools/call", json!({"name": name, "arguments": arguments}))
}

pub fn tool_call(id: i64, name: &str, arguments: Value) -> JsonRpcRequest {
    JsonRpcRequest::new(
        RequestId::Number(id),
        "tools/call",
        Some(json!({"name": name, "arguments": arguments})),
    )
}

/// POST raw bytes to `/mcp`.
pub async fn post_raw(
    router: &Router,
    body: impl Into<Body>,
    token: Option<&str>,
    accept: &str,
) -> Response {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::ACCEPT, accept);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(body.into()).expect("valid request");
    router.clone().oneshot(request).await.expect("router is infallible")
}

/// POST a JSON body accepting an event stream.
pub async fn post_sse(router: &Router, body: &Value, token: Option<&str>) -> Response {
    post_raw(router, body.to_string(), token, ACCEPT_BOTH).await
}

/// POST a JSON body accepting only JSON.
pub async fn post_json(router: &Router, body: &Value, token: Option<&str>) -> Response {
    post_raw(router, body.to_string(), token, ACCEPT_JSON).await
}

pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body readable")
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).expect("body is JSON")
}

/// Decode every `data:` payload of an event-stream body, in order.
pub async fn sse_frames(response: Response) -> Vec<Value> {
    let text = String::from_utf8(body_bytes(response).await).expect("body is UTF-8");
    text.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim_start()).expect("frame is JSON"))
        .collect()
}

/// The `data` strings of `notifications/message` frames.
pub fn log_messages(frames: &[Value]) -> Vec<String> {
    frames
        .iter()
        .filter(|f| f["method"] == "notifications/message")
        .filter_map(|f| f["params"]["data"].as_str().map(str::to_string))
        .collect()
}

/// Run one request through a fresh session and collect every frame.
pub async fn invoke(handler: &Arc<ProtocolHandler>, request: JsonRpcRequest) -> Vec<JsonRpcMessage> {
    let (session, mut frames) = TransportSession::open(request, 16);
    tokio::spawn(session.run(handler.clone()));

    let mut out = Vec::new();
    while let Some(frame) = frames.next().await {
        out.push(frame);
    }
    out
}

/// The final frame as JSON.
pub async fn invoke_final(handler: &Arc<ProtocolHandler>, request: JsonRpcRequest) -> Value {
    let frames = invoke(handler, request).await;
    let last = frames.last().expect("session produced a reply");
    serde_json::to_value(last).expect("frame serializes")
}

pub fn first_text(reply: &Value) -> &str {
    reply["result"]["content"][0]["text"]
        .as_str()
        .expect("text content")
}

/// Tool that counts its invocations.
#[derive(Clone, Default)]
pub struct CountingTool {
    pub calls: Arc<AtomicUsize>,
}

impl CountingTool {
    pub const NAME: &'static str = "count-calls";

    pub fn descriptor(&self) -> ToolDescriptor {
        ToolDescriptor::new(
            ToolDefinition {
                name: Self::NAME.to_string(),
                description: Some("Counts invocations".to_string()),
                input_schema: json!({"type": "object", "properties": {}}),
            },
            self.clone(),
        )
    }

    pub fn count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ToolHandler for CountingTool {
    async fn call(&self, _arguments: Value, _ctx: &RequestContext) -> McpResult<ToolCallResult> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(ToolCallResult::text(format!("call #{n}")))
    }
}

/// Builtins plus a counting tool.
pub fn counting_registry() -> (Registry, CountingTool) {
    let tool = CountingTool::default();
    let mut registry = Registry::with_builtins().expect("builtins register");
    registry
        .register(tool.descriptor())
        .expect("counting tool registers");
    (registry, tool)
}
