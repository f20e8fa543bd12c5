//! Route Configuration
//!
//! Configures all HTTP routes for the application.

use axum::{
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use super::handlers::{health, pages};
use crate::infrastructure::metrics;
use crate::presentation::middleware::{track_metrics, SecurityHeadersLayer};
use crate::presentation::websocket::ws_handler;
use crate::startup::AppState;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.settings.assets.static_dir);

    Router::new()
        // Chat pages
        .route("/", get(pages::index))
        .route("/start-chat", post(pages::start_chat))
        .route("/join", get(pages::join))
        .route("/join-chat", post(pages::join_chat))
        .route("/room", get(pages::room))
        // WebSocket endpoint
        .route("/ws", get(ws_handler))
        // Health check endpoints
        .route("/health", get(health::health_check))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        // Prometheus metrics endpoint
        .route("/metrics", get(metrics_handler))
        .route_layer(middleware::from_fn(track_metrics))
        .nest_service("/static", static_dir)
        .layer(SecurityHeadersLayer::new())
        .with_state(state)
}

/// Prometheus metrics endpoint handler
async fn metrics_handler() -> impl IntoResponse {
    let metrics = metrics::gather_metrics();
    (
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        metrics,
    )
}
