//! Built-in prompt templates.

pub mod greeting;

use crate::registry::Registry;
use crate::types::McpResult;

pub use greeting::GreetingPrompt;

/// Register every built-in prompt.
pub fn register(registry: &mut Registry) -> McpResult<()> {
    registry.register(greeting::descriptor())
}
