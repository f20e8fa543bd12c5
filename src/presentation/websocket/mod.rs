//! WebSocket Endpoint
//!
//! Upgrades browser connections and admits them into rooms.

pub mod handler;

pub use handler::ws_handler;
