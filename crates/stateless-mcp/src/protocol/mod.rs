//! Protocol layer: method dispatch, argument validation, and version negotiation.

pub mod handler;
pub mod negotiation;
pub mod validator;

pub use handler::ProtocolHandler;
