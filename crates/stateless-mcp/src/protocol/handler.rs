//! Method dispatch for one inbound request.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use crate::registry::{Registry, RequestContext};
use crate::streaming::{NotificationChannel, ProgressReporter};
use crate::types::{
    InitializeParams, JsonRpcMessage, JsonRpcRequest, JsonRpcResponse, McpError, McpResult,
    PromptGetParams, PromptListResult, ProgressToken, ResourceListResult, ResourceReadParams,
    ResourceTemplateListResult, SetLevelParams, ToolCallParams, ToolListResult,
};

use super::{negotiation, validator};

/// Resolves request methods against the registry and invokes handlers.
///
/// Holds no per-request state; one instance serves every session.
pub struct ProtocolHandler {
    registry: Arc<Registry>,
}

impl ProtocolHandler {
    pub fn new(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Produce the response (or error response) for `request`. Notifications
    /// emitted by the invoked handler go to `channel`.
    pub async fn handle_request(
        &self,
        request: &JsonRpcRequest,
        channel: NotificationChannel,
    ) -> JsonRpcMessage {
        let id = request.id.clone();
        match self.dispatch(request, channel).await {
            Ok(result) => JsonRpcResponse::new(id, result).into(),
            Err(e) => {
                if e.is_protocol_error() {
                    tracing::debug!(method = %request.method, "Request rejected: {e}");
                } else {
                    tracing::error!(method = %request.method, "Request failed: {e}");
                }
                e.to_json_rpc_error(id).into()
            }
        }
    }

    async fn dispatch(
        &self,
        request: &JsonRpcRequest,
        channel: NotificationChannel,
    ) -> McpResult<Value> {
        let params = request.params.clone().unwrap_or_else(|| json!({}));

        match request.method.as_str() {
            "initialize" => {
                let params: InitializeParams = parse_params(params)?;
                to_result(negotiation::initialize(params))
            }
            "ping" => Ok(json!({})),

            "tools/list" => to_result(ToolListResult {
                tools: self.registry.list_tools(),
                next_cursor: None,
            }),
            "tools/call" => {
                let params: ToolCallParams = parse_params(params)?;
                self.call_tool(params, request.progress_token(), channel)
                    .await
            }

            "resources/list" => to_result(ResourceListResult {
                resources: self.registry.list_resources(),
                next_cursor: None,
            }),
            "resources/templates/list" => to_result(ResourceTemplateListResult {
                resource_templates: crate::resources::list_templates(),
                next_cursor: None,
            }),
            "resources/read" => {
                let params: ResourceReadParams = parse_params(params)?;
                let resource = self.registry.resource_by_uri(&params.uri)?;
                to_result(resource.handler.read(&params.uri).await?)
            }

            "prompts/list" => to_result(PromptListResult {
                prompts: self.registry.list_prompts(),
                next_cursor: None,
            }),
            "prompts/get" => {
                let params: PromptGetParams = parse_params(params)?;
                let prompt = self.registry.prompt(&params.name)?;
                let arguments = params.arguments;
                validator::validate_prompt_arguments(&prompt.definition, &arguments)?;
                to_result(prompt.handler.render(arguments).await?)
            }

            "logging/setLevel" => {
                // Nothing outlives the request, so the level is acknowledged only.
                let params: SetLevelParams = parse_params(params)?;
                tracing::debug!(level = ?params.level, "logging/setLevel");
                Ok(json!({}))
            }

            other => Err(McpError::MethodNotFound(other.to_string())),
        }
    }

    async fn call_tool(
        &self,
        params: ToolCallParams,
        progress_token: Option<ProgressToken>,
        channel: NotificationChannel,
    ) -> McpResult<Value> {
        let tool = self.registry.tool(&params.name)?;
        let arguments = params.arguments;
        validator::validate_arguments(&tool.definition.input_schema, &arguments)?;

        let progress = progress_token.map(|token| ProgressReporter::new(token, channel.clone()));
        let ctx = RequestContext::new(channel, progress);

        tracing::debug!(tool = %params.name, "Invoking tool");
        to_result(tool.handler.call(arguments, &ctx).await?)
    }
}

fn parse_params<T: DeserializeOwned>(params: Value) -> McpResult<T> {
    serde_json::from_value(params).map_err(|e| McpError::InvalidParams(e.to_string()))
}

fn to_result(value: impl Serialize) -> McpResult<Value> {
    Ok(serde_json::to_value(value)?)
}
