//! Protocol version negotiation for `initialize`.
//!
//! Stateless mode keeps nothing from the handshake: every POST is served
//! without requiring a prior `initialize` on the same connection.

use crate::types::{InitializeParams, InitializeResult, LATEST_PROTOCOL_VERSION, SUPPORTED_PROTOCOL_VERSIONS};

/// Pick the protocol version to answer with.
pub fn negotiate_version(requested: &str) -> &'static str {
    match SUPPORTED_PROTOCOL_VERSIONS
        .iter()
        .copied()
        .find(|v| *v == requested)
    {
        Some(version) => version,
        None => {
            tracing::warn!(
                "Client requested protocol version {requested}, server supports {:?}. Proceeding with {LATEST_PROTOCOL_VERSION}.",
                SUPPORTED_PROTOCOL_VERSIONS
            );
            LATEST_PROTOCOL_VERSION
        }
    }
}

/// Answer an initialize request.
pub fn initialize(params: InitializeParams) -> InitializeResult {
    tracing::info!(
        "Initialize from client: {} v{}",
        params.client_info.name,
        params.client_info.version
    );
    InitializeResult::for_version(negotiate_version(&params.protocol_version))
}
