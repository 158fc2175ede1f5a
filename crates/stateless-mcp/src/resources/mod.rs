//! Built-in read-only resources.

pub mod greeting;

use crate::registry::Registry;
use crate::types::{McpResult, ResourceTemplateDefinition};

pub use greeting::GreetingResource;

/// Register every built-in resource.
pub fn register(registry: &mut Registry) -> McpResult<()> {
    registry.register(greeting::descriptor())
}

/// URI templates served by this process. Every resource has a fixed URI.
pub fn list_templates() -> Vec<ResourceTemplateDefinition> {
    Vec::new()
}
