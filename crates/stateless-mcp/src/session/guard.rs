//! Receiving half of a session, owned by the HTTP response body.

use std::sync::Arc;

use futures::Stream;
use tokio::sync::mpsc;

use crate::types::JsonRpcMessage;

use super::transport::SessionState;

/// Outbound frames of one session.
///
/// Dropping this value (response fully written, or client disconnected)
/// closes the session: the notification channel starts rejecting writes and
/// any handler waiting on the closed signal stops.
#[derive(Debug)]
pub struct SessionFrames {
    rx: mpsc::Receiver<JsonRpcMessage>,
    state: Arc<SessionState>,
    finished: bool,
}

impl SessionFrames {
    pub(crate) fn new(rx: mpsc::Receiver<JsonRpcMessage>, state: Arc<SessionState>) -> Self {
        Self {
            rx,
            state,
            finished: false,
        }
    }

    /// Next frame in send order. Returns `None` after the final response.
    pub async fn next(&mut self) -> Option<JsonRpcMessage> {
        if self.finished {
            return None;
        }
        let frame = self.rx.recv().await?;
        if frame.is_final() {
            self.finished = true;
        }
        Some(frame)
    }

    /// Adapt into a stream that ends after the final response.
    pub fn into_stream(self) -> impl Stream<Item = JsonRpcMessage> + Send + 'static {
        futures::stream::unfold(self, |mut frames| async move {
            let frame = frames.next().await?;
            Some((frame, frames))
        })
    }

    /// Whether the final response has been read.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Close the session now.
    pub fn close(self) {}
}

impl Drop for SessionFrames {
    fn drop(&mut self) {
        self.state.closed.cancel();
        if self.is_finished() {
            tracing::debug!("Request closed");
        } else {
            tracing::info!("Request closed before completion; abandoning invocation");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JsonRpcNotification, JsonRpcResponse, RequestId};
    use serde_json::json;

    #[tokio::test]
    async fn reading_the_reply_finishes_the_session() {
        let (tx, rx) = mpsc::channel(4);
        let state = Arc::new(SessionState::default());
        let mut frames = SessionFrames::new(rx, state.clone());

        tx.send(JsonRpcNotification::new("notifications/message", None).into())
            .await
            .unwrap();
        tx.send(JsonRpcResponse::new(RequestId::Number(1), json!({})).into())
            .await
            .unwrap();

        assert!(!frames.next().await.unwrap().is_final());
        assert!(!frames.is_finished());
        assert!(frames.next().await.unwrap().is_final());
        assert!(frames.is_finished());
        assert!(frames.next().await.is_none());

        // The sender is still alive: completion is known from the read alone.
        assert!(!state.closed.is_cancelled());
        drop(frames);
        assert!(state.closed.is_cancelled());
    }
}
