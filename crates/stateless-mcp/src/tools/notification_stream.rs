//! The `start-notification-stream` tool: push periodic log notifications while the call is open.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::registry::{RequestContext, ToolDescriptor, ToolHandler};
use crate::types::{LogLevel, McpError, McpResult, ToolCallResult, ToolDefinition};

/// Tool name.
pub const NAME: &str = "start-notification-stream";

const DEFAULT_INTERVAL_MS: f64 = 100.0;
const DEFAULT_COUNT: f64 = 10.0;

#[derive(Debug, Deserialize)]
struct StreamParams {
    #[serde(default = "default_interval")]
    interval: f64,
    #[serde(default = "default_count")]
    count: f64,
}

fn default_interval() -> f64 {
    DEFAULT_INTERVAL_MS
}

fn default_count() -> f64 {
    DEFAULT_COUNT
}

/// Return the tool definition for start-notification-stream.
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some(
            "Starts sending periodic notifications for testing resumability".to_string(),
        ),
        input_schema: json!({
            "type": "object",
            "properties": {
                "interval": {
                    "type": "number",
                    "minimum": 0,
                    "default": DEFAULT_INTERVAL_MS,
                    "description": "Interval in milliseconds between notifications"
                },
                "count": {
                    "type": "number",
                    "minimum": 0,
                    "default": DEFAULT_COUNT,
                    "description": "Number of notifications to send (0 for unbounded)"
                }
            }
        }),
    }
}

pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(definition(), NotificationStreamTool)
}

/// Emits `notifications/message` entries every `interval` ms, `count` times
/// (forever when `count` is 0), stopping early once the session closes.
#[derive(Debug, Default)]
pub struct NotificationStreamTool;

#[async_trait]
impl ToolHandler for NotificationStreamTool {
    async fn call(&self, arguments: Value, ctx: &RequestContext) -> McpResult<ToolCallResult> {
        let params: StreamParams =
            serde_json::from_value(arguments).map_err(|e| McpError::InvalidParams(e.to_string()))?;
        if !params.interval.is_finite() || params.interval < 0.0 {
            return Err(McpError::InvalidParams(
                "'interval' must be a non-negative number".to_string(),
            ));
        }
        if !params.count.is_finite() || params.count < 0.0 {
            return Err(McpError::InvalidParams(
                "'count' must be a non-negative number".to_string(),
            ));
        }

        // A fractional count behaves like the next whole number of emissions.
        let limit = params.count.ceil() as u64;
        let interval = Duration::try_from_secs_f64(params.interval / 1000.0)
            .map_err(|e| McpError::InvalidParams(format!("'interval' out of range: {e}")))?;
        let mut counter: u64 = 0;

        while limit == 0 || counter < limit {
            if ctx.is_cancelled() {
                break;
            }
            counter += 1;

            let data = format!(
                "Periodic notification #{counter} at {}",
                Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
            );
            if let Err(e) = ctx.notifications.log(LogLevel::Info, Value::String(data)).await {
                tracing::warn!(counter, "Error sending notification: {e}");
            }

            if let (Some(progress), true) = (&ctx.progress, limit > 0) {
                if let Err(e) = progress.report(counter as f64, Some(limit as f64)).await {
                    tracing::debug!(counter, "Error sending progress: {e}");
                }
            }

            tokio::select! {
                _ = ctx.notifications.closed() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }

        if ctx.is_cancelled() {
            tracing::info!(sent = counter, "Notification stream stopped: session closed");
        }

        Ok(ToolCallResult::text(format!(
            "Started sending periodic notifications every {}ms",
            params.interval
        )))
    }
}
