//! Example: Custom MCP client in Rust.
//!
//! Demonstrates how to talk to a running stateless-mcp server over
//! streamable HTTP: each call is one POST, and the reply arrives as a short
//! event stream of notifications followed by the result.
//!
//! Usage:
//!   MCP_AUTH_TOKEN=secret cargo run --bin stateless-mcp
//!   MCP_AUTH_TOKEN=secret cargo run --example custom_client -- http://127.0.0.1:3000/mcp

use serde_json::{json, Value};

/// Simple MCP client: no session, no handshake state.
struct SimpleClient {
    http: reqwest::Client,
    url: String,
    token: Option<String>,
    next_id: i64,
}

impl SimpleClient {
    /// Send a JSON-RPC request and print every frame of the reply.
    async fn request(&mut self, method: &str, params: Value) -> Result<Value, reqwest::Error> {
        self.next_id += 1;
        let request = json!({
            "jsonrpc": "2.0",
            "id": self.next_id,
            "method": method,
            "params": params
        });

        let mut builder = self
            .http
            .post(&self.url)
            .header("accept", "application/json, text/event-stream")
            .json(&request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        let frames: Vec<Value> = body
            .lines()
            .filter_map(|line| line.strip_prefix("data:"))
            .filter_map(|data| serde_json::from_str(data.trim_start()).ok())
            .collect();

        if frames.is_empty() {
            // Not an event stream: auth failure or plain JSON reply.
            println!("  [{status}] {body}");
            return Ok(serde_json::from_str(&body).unwrap_or(Value::Null));
        }

        for frame in &frames[..frames.len() - 1] {
            println!("  <- {} {}", frame["method"], frame["params"]["data"]);
        }
        Ok(frames[frames.len() - 1].clone())
    }
}

#[tokio::main]
async fn main() -> Result<(), reqwest::Error> {
    let url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://127.0.0.1:3000/mcp".to_string());

    let mut client = SimpleClient {
        http: reqwest::Client::new(),
        url,
        token: std::env::var("MCP_AUTH_TOKEN").ok(),
        next_id: 0,
    };

    println!("=== Initialize ===");
    let result = client
        .request(
            "initialize",
            json!({
                "protocolVersion": "2025-03-26",
                "capabilities": {},
                "clientInfo": {"name": "custom-client", "version": "0.1.0"}
            }),
        )
        .await?;
    println!("Server: {}", result["result"]["serverInfo"]["name"]);

    println!("\n=== List tools ===");
    let result = client.request("tools/list", json!({})).await?;
    if let Some(tools) = result["result"]["tools"].as_array() {
        for tool in tools {
            println!("  - {}", tool["name"]);
        }
    }

    println!("\n=== Greeting prompt ===");
    let result = client
        .request(
            "prompts/get",
            json!({"name": "greeting-template", "arguments": {"name": "Ada"}}),
        )
        .await?;
    println!("{}", result["result"]["messages"][0]["content"]["text"]);

    println!("\n=== Notification stream ===");
    let result = client
        .request(
            "tools/call",
            json!({
                "name": "start-notification-stream",
                "arguments": {"interval": 200, "count": 5}
            }),
        )
        .await?;
    println!("{}", result["result"]["content"][0]["text"]);

    println!("\n=== Ping x2 ===");
    for _ in 0..2 {
        let result = client
            .request("tools/call", json!({"name": "ping", "arguments": {}}))
            .await?;
        println!("{}", result["result"]["content"][0]["text"]);
    }

    Ok(())
}
