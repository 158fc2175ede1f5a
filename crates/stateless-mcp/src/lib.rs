//! Stateless MCP server over streamable HTTP.
//!
//! Every POST to `/mcp` is an independent session: one JSON-RPC request is
//! authenticated, dispatched to a registered tool, resource, or prompt, and
//! answered on a response stream that can carry notifications ahead of the
//! final result. Nothing survives between requests except the read-only
//! registry and the ping tool's process-wide toggle.

pub mod auth;
pub mod config;
pub mod prompts;
pub mod protocol;
pub mod registry;
pub mod resources;
pub mod session;
pub mod streaming;
pub mod tools;
pub mod transport;
pub mod types;

pub use auth::{AuthDecision, AuthGate};
pub use config::ServerConfig;
pub use protocol::ProtocolHandler;
pub use registry::Registry;
pub use session::TransportSession;
pub use transport::HttpTransport;
