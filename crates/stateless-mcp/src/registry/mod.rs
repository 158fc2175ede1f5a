//! Name-keyed registry of tools, resources, and prompts.
//!
//! Populated once at start-up and shared read-only (behind an `Arc`) by every
//! request afterwards, so no locking is needed.

pub mod handler;

use std::collections::BTreeMap;

use crate::types::{McpError, McpResult, PromptDefinition, ResourceDefinition, ToolDefinition};

pub use handler::{
    PromptDescriptor, PromptHandler, RequestContext, ResourceDescriptor, ResourceHandler,
    ToolDescriptor, ToolHandler,
};

/// Capability kind. Names are unique within a kind, not across kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Kind {
    Tool,
    Resource,
    Prompt,
}

impl Kind {
    pub fn label(self) -> &'static str {
        match self {
            Kind::Tool => "Tool",
            Kind::Resource => "Resource",
            Kind::Prompt => "Prompt",
        }
    }
}

/// One registry entry, tagged by capability.
#[derive(Debug, Clone)]
pub enum Descriptor {
    Tool(ToolDescriptor),
    Resource(ResourceDescriptor),
    Prompt(PromptDescriptor),
}

impl Descriptor {
    pub fn kind(&self) -> Kind {
        match self {
            Descriptor::Tool(_) => Kind::Tool,
            Descriptor::Resource(_) => Kind::Resource,
            Descriptor::Prompt(_) => Kind::Prompt,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Descriptor::Tool(d) => &d.definition.name,
            Descriptor::Resource(d) => &d.definition.name,
            Descriptor::Prompt(d) => &d.definition.name,
        }
    }
}

impl From<ToolDescriptor> for Descriptor {
    fn from(value: ToolDescriptor) -> Self {
        Descriptor::Tool(value)
    }
}

impl From<ResourceDescriptor> for Descriptor {
    fn from(value: ResourceDescriptor) -> Self {
        Descriptor::Resource(value)
    }
}

impl From<PromptDescriptor> for Descriptor {
    fn from(value: PromptDescriptor) -> Self {
        Descriptor::Prompt(value)
    }
}

/// The capability registry.
#[derive(Debug, Default)]
pub struct Registry {
    entries: BTreeMap<(Kind, String), Descriptor>,
}

impl Registry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry preloaded with the built-in prompt, tools, and resource.
    pub fn with_builtins() -> McpResult<Self> {
        let mut registry = Self::new();
        crate::prompts::register(&mut registry)?;
        crate::tools::register(&mut registry)?;
        crate::resources::register(&mut registry)?;
        Ok(registry)
    }

    /// Add an entry. Fails if the name is already taken within its kind.
    pub fn register(&mut self, descriptor: impl Into<Descriptor>) -> McpResult<()> {
        let descriptor = descriptor.into();
        let kind = descriptor.kind();
        let key = (kind, descriptor.name().to_string());
        if self.entries.contains_key(&key) {
            return Err(McpError::DuplicateRegistration {
                kind: kind.label(),
                name: key.1,
            });
        }
        if let Descriptor::Resource(resource) = &descriptor {
            if self.resource_by_uri(&resource.definition.uri).is_ok() {
                return Err(McpError::DuplicateRegistration {
                    kind: kind.label(),
                    name: resource.definition.uri.clone(),
                });
            }
        }
        tracing::debug!(kind = kind.label(), name = %key.1, "registered");
        self.entries.insert(key, descriptor);
        Ok(())
    }

    /// Find an entry by kind and name.
    pub fn lookup(&self, kind: Kind, name: &str) -> McpResult<&Descriptor> {
        self.entries
            .get(&(kind, name.to_string()))
            .ok_or_else(|| McpError::NotFound {
                kind: kind.label(),
                name: name.to_string(),
            })
    }

    pub fn tool(&self, name: &str) -> McpResult<&ToolDescriptor> {
        match self.lookup(Kind::Tool, name)? {
            Descriptor::Tool(tool) => Ok(tool),
            _ => Err(McpError::tool_not_found(name)),
        }
    }

    pub fn prompt(&self, name: &str) -> McpResult<&PromptDescriptor> {
        match self.lookup(Kind::Prompt, name)? {
            Descriptor::Prompt(prompt) => Ok(prompt),
            _ => Err(McpError::prompt_not_found(name)),
        }
    }

    pub fn resource(&self, name: &str) -> McpResult<&ResourceDescriptor> {
        match self.lookup(Kind::Resource, name)? {
            Descriptor::Resource(resource) => Ok(resource),
            _ => Err(McpError::resource_not_found(name)),
        }
    }

    /// Resources are read by URI on the wire.
    pub fn resource_by_uri(&self, uri: &str) -> McpResult<&ResourceDescriptor> {
        self.resources()
            .find(|r| r.definition.uri == uri)
            .ok_or_else(|| McpError::resource_not_found(uri))
    }

    pub fn tools(&self) -> impl Iterator<Item = &ToolDescriptor> {
        self.entries.values().filter_map(|d| match d {
            Descriptor::Tool(tool) => Some(tool),
            _ => None,
        })
    }

    pub fn resources(&self) -> impl Iterator<Item = &ResourceDescriptor> {
        self.entries.values().filter_map(|d| match d {
            Descriptor::Resource(resource) => Some(resource),
            _ => None,
        })
    }

    pub fn prompts(&self) -> impl Iterator<Item = &PromptDescriptor> {
        self.entries.values().filter_map(|d| match d {
            Descriptor::Prompt(prompt) => Some(prompt),
            _ => None,
        })
    }

    /// Definitions for tools/list, ordered by name.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools().map(|t| t.definition.clone()).collect()
    }

    /// Definitions for resources/list, ordered by name.
    pub fn list_resources(&self) -> Vec<ResourceDefinition> {
        self.resources().map(|r| r.definition.clone()).collect()
    }

    /// Definitions for prompts/list, ordered by name.
    pub fn list_prompts(&self) -> Vec<PromptDefinition> {
        self.prompts().map(|p| p.definition.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
