//! Error taxonomy and JSON-RPC error codes.

use thiserror::Error;

use super::message::{JsonRpcError, RequestId};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// Server-defined codes in the implementation range (-32000..-32099).
pub mod mcp_error_codes {
    /// GET/DELETE on the protocol path.
    pub const METHOD_NOT_ALLOWED: i32 = -32000;
    /// Missing or invalid bearer credential.
    pub const UNAUTHORIZED: i32 = -32001;
    /// Unknown tool, resource, or prompt.
    pub const NOT_FOUND: i32 = -32002;
}

/// Message shown to clients for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Result alias used across the crate.
pub type McpResult<T> = Result<T, McpError>;

/// Every failure the server can surface.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Internal error: {0}")]
    InternalError(String),

    #[error("Method not allowed.")]
    MethodNotAllowed,

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("{kind} not found: {name}")]
    NotFound {
        /// "Tool", "Resource" or "Prompt".
        kind: &'static str,
        name: String,
    },

    #[error("{kind} '{name}' is already registered")]
    DuplicateRegistration { kind: &'static str, name: String },

    /// The owning session's response stream is gone.
    #[error("Notification channel closed")]
    ChannelClosed,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    /// The JSON-RPC error code for this error.
    pub fn code(&self) -> i32 {
        use error_codes::*;
        use mcp_error_codes::*;
        match self {
            McpError::ParseError(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams(_) => INVALID_PARAMS,
            McpError::MethodNotAllowed => METHOD_NOT_ALLOWED,
            McpError::Unauthorized(_) => UNAUTHORIZED,
            McpError::NotFound { .. } => NOT_FOUND,
            McpError::InternalError(_)
            | McpError::DuplicateRegistration { .. }
            | McpError::ChannelClosed
            | McpError::Config(_)
            | McpError::Transport(_)
            | McpError::Io(_)
            | McpError::Json(_) => INTERNAL_ERROR,
        }
    }

    /// True for failures a client caused and may see in detail.
    pub fn is_protocol_error(&self) -> bool {
        self.code() != error_codes::INTERNAL_ERROR
    }

    /// The message sent to the client. Internal detail never leaves the server.
    pub fn client_message(&self) -> String {
        if self.is_protocol_error() {
            self.to_string()
        } else {
            INTERNAL_ERROR_MESSAGE.to_string()
        }
    }

    /// Convert into a JSON-RPC error response.
    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError::new(id, self.code(), self.client_message())
    }

    /// Shorthand for an unknown tool.
    pub fn tool_not_found(name: impl Into<String>) -> Self {
        McpError::NotFound {
            kind: "Tool",
            name: name.into(),
        }
    }

    /// Shorthand for an unknown resource.
    pub fn resource_not_found(name: impl Into<String>) -> Self {
        McpError::NotFound {
            kind: "Resource",
            name: name.into(),
        }
    }

    /// Shorthand for an unknown prompt.
    pub fn prompt_not_found(name: impl Into<String>) -> Self {
        McpError::NotFound {
            kind: "Prompt",
            name: name.into(),
        }
    }
}
