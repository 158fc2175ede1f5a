//! Server configuration: TOML file, then environment, then CLI flags.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::{McpError, McpResult};

/// Environment variable holding the expected bearer token.
pub const AUTH_TOKEN_ENV: &str = "MCP_AUTH_TOKEN";

/// Default listen address.
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

/// Default number of frames a session may queue ahead of a slow reader.
pub const DEFAULT_NOTIFICATION_BUFFER: usize = 64;

/// Runtime configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address.
    pub addr: String,
    /// Expected bearer token. `None` disables authentication.
    pub auth_token: Option<String>,
    /// Answer with a single JSON body even when the client accepts SSE.
    pub json_response: bool,
    /// Per-session outbound frame queue size.
    pub notification_buffer: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            auth_token: None,
            json_response: false,
            notification_buffer: DEFAULT_NOTIFICATION_BUFFER,
        }
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("addr", &self.addr)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("json_response", &self.json_response)
            .field("notification_buffer", &self.notification_buffer)
            .finish()
    }
}

impl ServerConfig {
    /// Parse a TOML document.
    pub fn from_toml(text: &str) -> McpResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| McpError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides using `lookup` (normally `std::env::var`).
    /// An empty token counts as unset.
    pub fn with_env_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(token) = lookup(AUTH_TOKEN_ENV) {
            self.auth_token = Some(token);
        }
        if self.auth_token.as_deref() == Some("") {
            self.auth_token = None;
        }
        self
    }

    fn validate(&self) -> McpResult<()> {
        if self.notification_buffer == 0 {
            return Err(McpError::Config(
                "notification_buffer must be at least 1".to_string(),
            ));
        }
        if self.addr.trim().is_empty() {
            return Err(McpError::Config("addr must not be empty".to_string()));
        }
        Ok(())
    }
}

/// Load configuration from an optional TOML file, then the process environment.
pub fn load_config(path: Option<&Path>) -> McpResult<ServerConfig> {
    let config = match path {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            let text = std::fs::read_to_string(path)?;
            ServerConfig::from_toml(&text)?
        }
        None => ServerConfig::default(),
    };
    Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
}
