//! Progress notifications for requests that carry a progress token.

use crate::types::{JsonRpcNotification, McpResult, ProgressParams, ProgressToken, PROGRESS_METHOD};

use super::channel::NotificationChannel;

/// Emits `notifications/progress` for one request on its session's channel.
#[derive(Debug, Clone)]
pub struct ProgressReporter {
    token: ProgressToken,
    channel: NotificationChannel,
}

impl ProgressReporter {
    pub fn new(token: ProgressToken, channel: NotificationChannel) -> Self {
        Self { token, channel }
    }

    /// The token the client supplied in `_meta.progressToken`.
    pub fn token(&self) -> &ProgressToken {
        &self.token
    }

    /// Report the current progress value.
    pub async fn report(&self, progress: f64, total: Option<f64>) -> McpResult<()> {
        let params = ProgressParams {
            progress_token: self.token.clone(),
            progress,
            total,
        };
        self.channel
            .send(JsonRpcNotification::new(
                PROGRESS_METHOD,
                Some(serde_json::to_value(params)?),
            ))
            .await
    }
}
