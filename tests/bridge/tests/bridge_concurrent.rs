//! Concurrent access: many clients talking to one server over real sockets.
//!
//! Tests verify that simultaneous sessions never see each other's frames,
//! that authentication holds per request under load, and that a client
//! hanging up stops the work it started.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use stateless_mcp::config::ServerConfig;
use stateless_mcp::registry::{RequestContext, ToolDescriptor, ToolHandler};
use stateless_mcp::types::{LogLevel, McpResult, ToolCallResult, ToolDefinition};
use stateless_mcp::{HttpTransport, ProtocolHandler, Registry};

const TOKEN: &str = "bridge-secret";

// ─── Helpers ───────────────────────────────────────────────────────────────

async fn spawn_server(registry: Registry, token: Option<&str>) -> SocketAddr {
    let config = ServerConfig {
        auth_token: token.map(str::to_string),
        ..ServerConfig::default()
    };
    let handler = ProtocolHandler::new(Arc::new(registry));
    let router = HttpTransport::new(handler, &config).router();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    addr
}

async fn post(
    client: &reqwest::Client,
    addr: SocketAddr,
    body: &Value,
    token: Option<&str>,
) -> reqwest::Response {
    let mut request = client
        .post(format!("http://{addr}/mcp"))
        .header("accept", "application/json, text/event-stream")
        .json(body);
    if let Some(token) = token {
        request = request.bearer_auth(token);
    }
    request.send().await.unwrap()
}

fn decode_sse(text: &str) -> Vec<Value> {
    text.lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim_start()).unwrap())
        .collect()
}

fn stream_call(id: i64, count: i64) -> Value {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": {
            "name": "start-notification-stream",
            "arguments": {"interval": 5, "count": count}
        }
    })
}

/// Emits until its session closes, then records that it stopped.
#[derive(Clone, Default)]
struct UntilClosed {
    sent: Arc<AtomicUsize>,
    stopped: Arc<AtomicBool>,
}

#[async_trait]
impl ToolHandler for UntilClosed {
    async fn call(&self, _arguments: Value, ctx: &RequestContext) -> McpResult<ToolCallResult> {
        while !ctx.is_cancelled() {
            let n = self.sent.fetch_add(1, Ordering::SeqCst);
            let _ = ctx.notifications.log(LogLevel::Info, json!(format!("tick {n}"))).await;
            tokio::select! {
                _ = ctx.notifications.closed() => break,
                _ = tokio::time::sleep(Duration::from_millis(5)) => {}
            }
        }
        self.stopped.store(true, Ordering::SeqCst);
        Ok(ToolCallResult::text("stopped"))
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_sessions_stay_isolated() {
    let addr = spawn_server(Registry::with_builtins().unwrap(), Some(TOKEN)).await;
    let client = reqwest::Client::new();

    let tasks: Vec<_> = (1..=16)
        .map(|id| {
            let client = client.clone();
            tokio::spawn(async move {
                let response = post(&client, addr, &stream_call(id, id % 5 + 1), Some(TOKEN)).await;
                assert_eq!(response.status(), 200);
                (id, decode_sse(&response.text().await.unwrap()))
            })
        })
        .collect();

    for task in tasks {
        let (id, frames) = task.await.unwrap();
        let expected = (id % 5 + 1) as usize;
        assert_eq!(frames.len(), expected + 1, "session {id}");

        for (i, frame) in frames[..expected].iter().enumerate() {
            assert_eq!(frame["method"], "notifications/message");
            let data = frame["params"]["data"].as_str().unwrap();
            assert!(data.starts_with(&format!("Periodic notification #{} ", i + 1)));
        }
        assert_eq!(frames[expected]["id"], id);
    }
}

#[tokio::test]
async fn auth_holds_per_request_under_load() {
    let addr = spawn_server(Registry::with_builtins().unwrap(), Some(TOKEN)).await;
    let client = reqwest::Client::new();

    let tasks: Vec<_> = (0..20)
        .map(|i| {
            let client = client.clone();
            tokio::spawn(async move {
                let token = if i % 2 == 0 { Some(TOKEN) } else { Some("wrong") };
                let body = json!({"jsonrpc": "2.0", "id": i, "method": "tools/list"});
                (i, post(&client, addr, &body, token).await.status())
            })
        })
        .collect();

    for task in tasks {
        let (i, status) = task.await.unwrap();
        if i % 2 == 0 {
            assert_eq!(status, 200, "request {i}");
        } else {
            assert_eq!(status, 401, "request {i}");
        }
    }
}

#[tokio::test]
async fn client_disconnect_stops_the_invocation() {
    let tool = UntilClosed::default();
    let mut registry = Registry::new();
    registry
        .register(ToolDescriptor::new(
            ToolDefinition {
                name: "until-closed".to_string(),
                description: None,
                input_schema: json!({"type": "object"}),
            },
            tool.clone(),
        ))
        .unwrap();
    let addr = spawn_server(registry, None).await;
    let client = reqwest::Client::new();

    let body = json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "tools/call",
        "params": {"name": "until-closed", "arguments": {}}
    });
    let mut response = post(&client, addr, &body, None).await;
    let first = response.chunk().await.unwrap();
    assert!(first.is_some());
    drop(response);

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    while !tool.stopped.load(Ordering::SeqCst) {
        assert!(
            tokio::time::Instant::now() < deadline,
            "tool kept running after the client left"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    let sent = tool.sent.load(Ordering::SeqCst);
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(tool.sent.load(Ordering::SeqCst), sent);
}

#[tokio::test]
async fn get_is_rejected_over_the_wire() {
    let addr = spawn_server(Registry::with_builtins().unwrap(), Some(TOKEN)).await;
    let response = reqwest::get(format!("http://{addr}/mcp")).await.unwrap();
    assert_eq!(response.status(), 405);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"]["code"], -32000);
}
