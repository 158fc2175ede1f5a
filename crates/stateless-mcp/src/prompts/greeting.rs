//! Prompt template: "Please greet NAME in a friendly manner."

use async_trait::async_trait;
use serde_json::Value;

use crate::registry::{PromptDescriptor, PromptHandler};
use crate::types::{
    McpError, McpResult, PromptArgument, PromptDefinition, PromptGetResult, PromptMessage,
};

/// Prompt name.
pub const NAME: &str = "greeting-template";

pub fn definition() -> PromptDefinition {
    PromptDefinition {
        name: NAME.to_string(),
        description: Some("A simple greeting prompt template".to_string()),
        arguments: Some(vec![PromptArgument {
            name: "name".to_string(),
            description: Some("Name to include in greeting".to_string()),
            required: true,
        }]),
    }
}

pub fn descriptor() -> PromptDescriptor {
    PromptDescriptor::new(definition(), GreetingPrompt)
}

#[derive(Debug, Default)]
pub struct GreetingPrompt;

#[async_trait]
impl PromptHandler for GreetingPrompt {
    async fn render(&self, arguments: Value) -> McpResult<PromptGetResult> {
        let name = arguments
            .get("name")
            .and_then(|v| v.as_str())
            .ok_or_else(|| McpError::InvalidParams("'name' argument is required".to_string()))?;

        Ok(PromptGetResult {
            description: None,
            messages: vec![PromptMessage::user_text(format!(
                "Please greet {name} in a friendly manner."
            ))],
        })
    }
}
