//! Per-request sessions: one inbound message, one invocation, one response stream.

pub mod guard;
pub mod transport;

pub use guard::SessionFrames;
pub use transport::TransportSession;
