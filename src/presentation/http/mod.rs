//! HTTP Layer
//!
//! Page, health and metrics routes.

pub mod handlers;
pub mod routes;

pub use routes::create_router;
