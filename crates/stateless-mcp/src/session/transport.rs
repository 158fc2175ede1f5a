//! Binds one inbound request to one invocation and one outbound response.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::protocol::ProtocolHandler;
use crate::streaming::NotificationChannel;
use crate::types::{JsonRpcMessage, JsonRpcRequest, McpError};

use super::guard::SessionFrames;

/// Shared between the running invocation and the response body.
#[derive(Debug, Default)]
pub(crate) struct SessionState {
    pub(crate) closed: CancellationToken,
}

/// A single request's lifecycle. Never shared between requests and never
/// given an identifier: nothing ties two sessions together.
#[derive(Debug)]
pub struct TransportSession {
    request: JsonRpcRequest,
    channel: NotificationChannel,
}

impl TransportSession {
    /// Open a session for `request`. Up to `buffer` frames may queue ahead of
    /// a slow reader before handlers are made to wait.
    pub fn open(request: JsonRpcRequest, buffer: usize) -> (Self, SessionFrames) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let state = Arc::new(SessionState::default());
        let channel = NotificationChannel::new(tx, state.closed.clone());
        (Self { request, channel }, SessionFrames::new(rx, state))
    }

    /// Invoke the handler and queue its reply behind any notifications.
    ///
    /// The invocation runs on its own task so a panicking handler becomes an
    /// InternalError reply instead of tearing down the connection.
    pub async fn run(self, handler: Arc<ProtocolHandler>) {
        let Self { request, channel } = self;
        let id = request.id.clone();
        let method = request.method.clone();

        let invocation = tokio::spawn({
            let channel = channel.clone();
            async move { handler.handle_request(&request, channel).await }
        });

        let reply: JsonRpcMessage = match invocation.await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(%method, "Handler task failed: {e}");
                McpError::InternalError(e.to_string())
                    .to_json_rpc_error(id)
                    .into()
            }
        };

        match channel.push(reply).await {
            Ok(()) => tracing::trace!(%method, "Reply queued"),
            Err(_) => tracing::debug!(%method, "Reply discarded: session already closed"),
        }
    }
}
