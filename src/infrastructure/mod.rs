//! Infrastructure Layer
//!
//! Contains implementations for external concerns:
//! - Connection Adapters (WebSocket, in-memory)
//! - Prometheus metrics

pub mod metrics;
pub mod transport;
