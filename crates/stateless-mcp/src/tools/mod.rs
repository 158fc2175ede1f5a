//! Built-in tools.

pub mod notification_stream;
pub mod ping;

use crate::registry::Registry;
use crate::types::McpResult;

pub use notification_stream::NotificationStreamTool;
pub use ping::{PingTool, PingToggle};

/// Register every built-in tool.
pub fn register(registry: &mut Registry) -> McpResult<()> {
    registry.register(notification_stream::descriptor())?;
    registry.register(ping::descriptor())?;
    Ok(())
}
