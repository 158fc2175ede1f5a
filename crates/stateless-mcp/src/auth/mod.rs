//! Bearer-token gate checked before any protocol work.

use std::sync::Once;

use subtle::ConstantTimeEq;

use crate::types::McpError;

const BEARER_PREFIX: &str = "Bearer ";

static AUTH_DISABLED_WARNING: Once = Once::new();

/// Why a request was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// No `Authorization` header, or not of the form `Bearer <token>`.
    MissingCredential,
    /// A bearer token that does not match the configured secret.
    InvalidCredential,
}

impl DenyReason {
    pub fn message(self) -> &'static str {
        match self {
            DenyReason::MissingCredential => "Bearer token required",
            DenyReason::InvalidCredential => "Invalid token",
        }
    }
}

impl From<DenyReason> for McpError {
    fn from(reason: DenyReason) -> Self {
        McpError::Unauthorized(reason.message().to_string())
    }
}

/// Outcome of an authentication check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthDecision {
    Allow,
    Deny(DenyReason),
}

/// Compares the presented bearer token with a single shared secret.
#[derive(Clone)]
pub struct AuthGate {
    expected: Option<String>,
}

impl AuthGate {
    /// A gate for `expected`. `None` or an empty secret disables enforcement.
    pub fn new(expected: Option<String>) -> Self {
        Self {
            expected: expected.filter(|token| !token.is_empty()),
        }
    }

    /// Whether a secret is configured.
    pub fn is_enforced(&self) -> bool {
        self.expected.is_some()
    }

    /// Decide on a raw `Authorization` header value.
    pub fn check(&self, authorization: Option<&str>) -> AuthDecision {
        let Some(expected) = &self.expected else {
            AUTH_DISABLED_WARNING.call_once(|| {
                tracing::warn!(
                    "MCP_AUTH_TOKEN environment variable not set, authentication disabled"
                );
            });
            return AuthDecision::Allow;
        };

        let Some(token) = authorization.and_then(|h| h.strip_prefix(BEARER_PREFIX)) else {
            return AuthDecision::Deny(DenyReason::MissingCredential);
        };

        if bool::from(token.as_bytes().ct_eq(expected.as_bytes())) {
            AuthDecision::Allow
        } else {
            AuthDecision::Deny(DenyReason::InvalidCredential)
        }
    }
}

impl std::fmt::Debug for AuthGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthGate")
            .field("enforced", &self.is_enforced())
            .finish()
    }
}
