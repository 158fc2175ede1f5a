//! The `ping` tool: time an artificial delay that alternates between short and long.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::time::Instant;

use crate::registry::{RequestContext, ToolDescriptor, ToolHandler};
use crate::types::{McpResult, ToolCallResult, ToolDefinition};

/// Tool name.
pub const NAME: &str = "ping";

/// Delay used on odd-numbered invocations.
pub const SHORT_DELAY: Duration = Duration::from_millis(100);

/// Delay used on even-numbered invocations.
pub const LONG_DELAY: Duration = Duration::from_millis(1000);

/// Short/long oscillator.
///
/// The registry holds one for the whole process, so the alternation is
/// observed across requests and clients, not per session.
#[derive(Debug, Default)]
pub struct PingToggle {
    short: AtomicBool,
}

impl PingToggle {
    pub const fn new() -> Self {
        Self {
            short: AtomicBool::new(false),
        }
    }

    /// Flip the toggle and return the delay for this invocation.
    /// The first call is short.
    pub fn next_delay(&self) -> Duration {
        let was_short = self.short.fetch_xor(true, Ordering::AcqRel);
        if was_short {
            LONG_DELAY
        } else {
            SHORT_DELAY
        }
    }
}

fn process_toggle() -> Arc<PingToggle> {
    static TOGGLE: OnceLock<Arc<PingToggle>> = OnceLock::new();
    TOGGLE.get_or_init(|| Arc::new(PingToggle::new())).clone()
}

/// Return the tool definition for ping.
pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: NAME.to_string(),
        description: Some("Measure response time across an alternating artificial delay".to_string()),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

/// Descriptor bound to the process-wide toggle.
pub fn descriptor() -> ToolDescriptor {
    ToolDescriptor::new(definition(), PingTool::process_wide())
}

#[derive(Debug, Clone)]
pub struct PingTool {
    toggle: Arc<PingToggle>,
}

impl PingTool {
    /// A ping tool sharing the process-wide toggle.
    pub fn process_wide() -> Self {
        Self::with_toggle(process_toggle())
    }

    /// A ping tool with its own toggle.
    pub fn with_toggle(toggle: Arc<PingToggle>) -> Self {
        Self { toggle }
    }
}

#[async_trait]
impl ToolHandler for PingTool {
    async fn call(&self, _arguments: Value, ctx: &RequestContext) -> McpResult<ToolCallResult> {
        let start = Instant::now();
        let delay = self.toggle.next_delay();

        tokio::select! {
            _ = ctx.notifications.closed() => {
                tracing::debug!("ping abandoned: session closed");
            }
            _ = tokio::time::sleep(delay) => {}
        }

        let elapsed = start.elapsed().as_millis();
        Ok(ToolCallResult::text(format!("Ping response time: {elapsed}ms")))
    }
}
