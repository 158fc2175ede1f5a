//! Stress tests: long streams, many sessions, sustained request volume.
//!
//! Tests verify that ordering survives thousands of frames, that the
//! registry serves heavy read traffic, and that the ping toggle stays exact
//! under concurrency.

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use stateless_mcp::config::ServerConfig;
use stateless_mcp::registry::ToolDescriptor;
use stateless_mcp::session::TransportSession;
use stateless_mcp::tools::{ping, PingTool, PingToggle};
use stateless_mcp::types::{JsonRpcRequest, RequestId};
use stateless_mcp::{HttpTransport, ProtocolHandler, Registry};

// ─── Helpers ───────────────────────────────────────────────────────────────

fn create_handler(registry: Registry) -> Arc<ProtocolHandler> {
    Arc::new(ProtocolHandler::new(Arc::new(registry)))
}

fn create_router() -> Router {
    let handler = ProtocolHandler::new(Arc::new(Registry::with_builtins().unwrap()));
    HttpTransport::new(handler, &ServerConfig::default()).router()
}

async fn call(handler: &Arc<ProtocolHandler>, id: i64, method: &str, params: Value) -> Value {
    let request = JsonRpcRequest::new(RequestId::Number(id), method, Some(params));
    let (session, mut frames) = TransportSession::open(request, 64);
    tokio::spawn(session.run(handler.clone()));

    let mut last = None;
    while let Some(frame) = frames.next().await {
        last = Some(frame);
    }
    serde_json::to_value(last.expect("session replied")).unwrap()
}

async fn post_sse(router: &Router, body: Value) -> Vec<Value> {
    let request = Request::builder()
        .method("POST")
        .uri("/mcp")
        .header("content-type", "application/json")
        .header("accept", "application/json, text/event-stream")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = router.clone().oneshot(request).await.unwrap();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec())
        .unwrap()
        .lines()
        .filter_map(|line| line.strip_prefix("data:"))
        .map(|data| serde_json::from_str(data.trim_start()).unwrap())
        .collect()
}

// ─── Tests ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn long_stream_keeps_order() {
    let router = create_router();
    let count = 2_000;

    let start = Instant::now();
    let frames = post_sse(
        &router,
        json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "tools/call",
            "params": {
                "name": "start-notification-stream",
                "arguments": {"interval": 0, "count": count}
            }
        }),
    )
    .await;
    let elapsed = start.elapsed();

    assert_eq!(frames.len(), count + 1);
    for (i, frame) in frames[..count].iter().enumerate() {
        let data = frame["params"]["data"].as_str().unwrap();
        assert!(
            data.starts_with(&format!("Periodic notification #{} ", i + 1)),
            "frame {i}: {data}"
        );
    }
    assert_eq!(frames[count]["id"], 1);
    assert!(elapsed < Duration::from_secs(10), "took {elapsed:?}");
}

#[tokio::test]
async fn sustained_registry_reads() {
    let handler = create_handler(Registry::with_builtins().unwrap());

    let start = Instant::now();
    for id in 0..1_000 {
        let reply = match id % 3 {
            0 => call(&handler, id, "tools/list", json!({})).await,
            1 => {
                call(
                    &handler,
                    id,
                    "resources/read",
                    json!({"uri": "https://example.com/greetings/default"}),
                )
                .await
            }
            _ => {
                call(
                    &handler,
                    id,
                    "prompts/get",
                    json!({"name": "greeting-template", "arguments": {"name": format!("user{id}")}}),
                )
                .await
            }
        };
        assert_eq!(reply["id"], id);
        assert!(reply.get("result").is_some(), "request {id}: {reply}");
    }
    let elapsed = start.elapsed();
    assert!(elapsed < Duration::from_secs(10), "1000 reads took {elapsed:?}");
}

#[tokio::test]
async fn many_parallel_sessions() {
    let router = create_router();

    let tasks: Vec<_> = (0..100)
        .map(|id| {
            let router = router.clone();
            tokio::spawn(async move {
                let frames = post_sse(
                    &router,
                    json!({
                        "jsonrpc": "2.0",
                        "id": id,
                        "method": "tools/call",
                        "params": {
                            "name": "start-notification-stream",
                            "arguments": {"interval": 1, "count": 5}
                        }
                    }),
                )
                .await;
                (id, frames)
            })
        })
        .collect();

    for task in tasks {
        let (id, frames) = task.await.unwrap();
        assert_eq!(frames.len(), 6);
        assert_eq!(frames[5]["id"], id);
    }
}

#[tokio::test(start_paused = true)]
async fn ping_toggle_is_exact_under_concurrency() {
    let mut registry = Registry::new();
    registry
        .register(ToolDescriptor::new(
            ping::definition(),
            PingTool::with_toggle(Arc::new(PingToggle::new())),
        ))
        .unwrap();
    let handler = create_handler(registry);

    let tasks: Vec<_> = (0..200)
        .map(|id| {
            let handler = handler.clone();
            tokio::spawn(async move {
                call(&handler, id, "tools/call", json!({"name": "ping", "arguments": {}})).await
            })
        })
        .collect();

    let long_ms = ping::LONG_DELAY.as_millis() as u64;
    let mut short = 0;
    for task in tasks {
        let reply = task.await.unwrap();
        let text = reply["result"]["content"][0]["text"].as_str().unwrap();
        let ms: u64 = text
            .trim_start_matches("Ping response time: ")
            .trim_end_matches("ms")
            .parse()
            .unwrap();
        if ms < long_ms {
            short += 1;
        }
    }
    assert_eq!(short, 100);
}
