//! Transport layer: the streamable HTTP endpoint.

pub mod http;

pub use http::{router, AppState, HttpTransport, MCP_PATH};
