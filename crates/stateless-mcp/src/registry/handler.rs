//! Handler seams for the three capability kinds.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::streaming::{NotificationChannel, ProgressReporter};
use crate::types::{
    McpResult, PromptDefinition, PromptGetResult, ReadResourceResult, ResourceDefinition,
    ToolCallResult, ToolDefinition,
};

/// What a tool invocation gets besides its arguments.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Notification sink bound to the caller's response stream.
    pub notifications: NotificationChannel,
    /// Present when the request carried `_meta.progressToken`.
    pub progress: Option<ProgressReporter>,
}

impl RequestContext {
    pub fn new(notifications: NotificationChannel, progress: Option<ProgressReporter>) -> Self {
        Self {
            notifications,
            progress,
        }
    }

    /// Whether the caller has gone away.
    pub fn is_cancelled(&self) -> bool {
        self.notifications.is_closed()
    }
}

/// An invocable tool. Arguments have already passed the input schema.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn call(&self, arguments: Value, ctx: &RequestContext) -> McpResult<ToolCallResult>;
}

/// Produces the content behind one resource URI.
#[async_trait]
pub trait ResourceHandler: Send + Sync {
    async fn read(&self, uri: &str) -> McpResult<ReadResourceResult>;
}

/// Renders a prompt template. Required arguments are present and are strings.
#[async_trait]
pub trait PromptHandler: Send + Sync {
    async fn render(&self, arguments: Value) -> McpResult<PromptGetResult>;
}

/// A registered tool.
#[derive(Clone)]
pub struct ToolDescriptor {
    pub definition: ToolDefinition,
    pub handler: Arc<dyn ToolHandler>,
}

/// A registered resource.
#[derive(Clone)]
pub struct ResourceDescriptor {
    pub definition: ResourceDefinition,
    pub handler: Arc<dyn ResourceHandler>,
}

/// A registered prompt. Its argument list doubles as the argument schema.
#[derive(Clone)]
pub struct PromptDescriptor {
    pub definition: PromptDefinition,
    pub handler: Arc<dyn PromptHandler>,
}

impl ToolDescriptor {
    pub fn new(definition: ToolDefinition, handler: impl ToolHandler + 'static) -> Self {
        Self {
            definition,
            handler: Arc::new(handler),
        }
    }
}

impl ResourceDescriptor {
    pub fn new(definition: ResourceDefinition, handler: impl ResourceHandler + 'static) -> Self {
        Self {
            definition,
            handler: Arc::new(handler),
        }
    }
}

impl PromptDescriptor {
    pub fn new(definition: PromptDefinition, handler: impl PromptHandler + 'static) -> Self {
        Self {
            definition,
            handler: Arc::new(handler),
        }
    }
}

impl std::fmt::Debug for ToolDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolDescriptor")
            .field("name", &self.definition.name)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("name", &self.definition.name)
            .field("uri", &self.definition.uri)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for PromptDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptDescriptor")
            .field("name", &self.definition.name)
            .finish_non_exhaustive()
    }
}
