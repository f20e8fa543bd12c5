//! Presentation Layer
//!
//! Chat pages, the WebSocket endpoint and HTTP middleware.

pub mod http;
pub mod middleware;
pub mod websocket;
