//! Resource `greeting-resource`: a static plain-text greeting.

use async_trait::async_trait;

use crate::registry::{ResourceDescriptor, ResourceHandler};
use crate::types::{McpResult, ReadResourceResult, ResourceContent, ResourceDefinition};

/// Resource name.
pub const NAME: &str = "greeting-resource";

/// Stable URI the greeting is served under.
pub const URI: &str = "https://example.com/greetings/default";

pub const MIME_TYPE: &str = "text/plain";

const BODY: &str = "Hello, world!";

pub fn definition() -> ResourceDefinition {
    ResourceDefinition {
        uri: URI.to_string(),
        name: NAME.to_string(),
        description: None,
        mime_type: Some(MIME_TYPE.to_string()),
    }
}

pub fn descriptor() -> ResourceDescriptor {
    ResourceDescriptor::new(definition(), GreetingResource)
}

#[derive(Debug, Default)]
pub struct GreetingResource;

#[async_trait]
impl ResourceHandler for GreetingResource {
    async fn read(&self, _uri: &str) -> McpResult<ReadResourceResult> {
        Ok(ReadResourceResult {
            contents: vec![ResourceContent {
                uri: URI.to_string(),
                mime_type: Some(MIME_TYPE.to_string()),
                text: Some(BODY.to_string()),
                blob: None,
            }],
        })
    }
}
