//! Connection Adapters
//!
//! Implementations of the domain `Connection` traits:
//! - `websocket`: production transport over axum WebSockets
//! - `memory`: in-process pair used to drive sessions without sockets

pub mod memory;
pub mod websocket;

pub use memory::{MemoryConnection, MemoryPeer};
pub use websocket::WebSocketConnection;
