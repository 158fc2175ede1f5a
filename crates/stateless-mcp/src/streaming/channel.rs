//! Per-session conduit for notifications pushed while a request is in flight.

use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::types::{
    JsonRpcMessage, JsonRpcNotification, LogLevel, LogMessageParams, McpError, McpResult,
    LOG_MESSAGE_METHOD,
};

/// Sender half of a session's outbound frame queue.
///
/// Notifications and the final response share one FIFO queue, so frames reach
/// the client in the order they were sent. Once the session is closed every
/// send fails with [`McpError::ChannelClosed`]; nothing is buffered for later.
#[derive(Debug, Clone)]
pub struct NotificationChannel {
    tx: mpsc::Sender<JsonRpcMessage>,
    closed: CancellationToken,
}

impl NotificationChannel {
    /// Bind a channel to a session's outbound queue and its closed signal.
    pub fn new(tx: mpsc::Sender<JsonRpcMessage>, closed: CancellationToken) -> Self {
        Self { tx, closed }
    }

    /// Queue a notification behind everything sent before it.
    pub async fn send(&self, notification: JsonRpcNotification) -> McpResult<()> {
        self.push(notification.into()).await
    }

    /// Send a `notifications/message` log entry.
    pub async fn log(&self, level: LogLevel, data: Value) -> McpResult<()> {
        let params = LogMessageParams {
            level,
            logger: None,
            data,
        };
        self.send(JsonRpcNotification::new(
            LOG_MESSAGE_METHOD,
            Some(serde_json::to_value(params)?),
        ))
        .await
    }

    /// Whether the owning session has begun teardown.
    pub fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    /// Resolves once the owning session is closed.
    pub async fn closed(&self) {
        self.closed.cancelled().await
    }

    pub(crate) async fn push(&self, message: JsonRpcMessage) -> McpResult<()> {
        if self.closed.is_cancelled() {
            return Err(McpError::ChannelClosed);
        }
        // A full queue must not outlive the session: give up on close.
        tokio::select! {
            biased;
            _ = self.closed.cancelled() => Err(McpError::ChannelClosed),
            sent = self.tx.send(message) => sent.map_err(|_| McpError::ChannelClosed),
        }
    }
}
