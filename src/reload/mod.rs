//! Live reload: wire protocol and WebSocket acceptor.

pub mod message;
pub mod server;
