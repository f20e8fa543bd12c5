//! Health Check Handlers
//!
//! Provides health check endpoints for Kubernetes-style liveness and readiness probes.
//!
//! # Endpoints
//! - `GET /health` - Basic health check
//! - `GET /health/live` - Liveness probe (is the server running?)
//! - `GET /health/ready` - Readiness probe (is the hub loop answering?)

use std::time::{Duration, Instant};

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use serde::Serialize;

use crate::startup::AppState;

/// How long readiness waits for the hub to answer a snapshot.
const HUB_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

/// Hub answers slower than this are reported as degraded.
const HUB_DEGRADED_AFTER_MS: u64 = 100;

/// Server start time for uptime calculation
static SERVER_START: Lazy<Instant> = Lazy::new(Instant::now);
static SERVER_START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// Initialize the server start time (call during startup)
pub fn init_server_start() {
    Lazy::force(&SERVER_START);
    Lazy::force(&SERVER_START_TIME);
}

/// Basic health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Detailed health check response
#[derive(Debug, Serialize)]
pub struct DetailedHealthResponse {
    pub status: HealthStatus,
    pub version: &'static str,
    pub uptime_seconds: u64,
    pub started_at: String,
    pub checks: HealthChecks,
}

/// Individual component health checks
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub hub: HubHealth,
}

/// Broadcast hub health
#[derive(Debug, Serialize)]
pub struct HubHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    pub active_sessions: usize,
    pub active_rooms: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Overall health status
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Simple liveness response
#[derive(Debug, Serialize)]
pub struct LivenessResponse {
    pub status: &'static str,
}

/// Basic health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Liveness probe - checks if the server is running
pub async fn liveness() -> Json<LivenessResponse> {
    Json(LivenessResponse { status: "alive" })
}

/// Readiness probe - returns 503 if the hub loop does not answer
pub async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    let hub = check_hub(&state).await;
    let status = hub.status;

    let response = DetailedHealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: SERVER_START.elapsed().as_secs(),
        started_at: SERVER_START_TIME.to_rfc3339(),
        checks: HealthChecks { hub },
    };

    let status_code = match status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Round-trip a snapshot through the hub loop
async fn check_hub(state: &AppState) -> HubHealth {
    let start = Instant::now();
    match tokio::time::timeout(HUB_PROBE_TIMEOUT, state.hub.snapshot()).await {
        Ok(Some(snapshot)) => {
            let latency = start.elapsed().as_millis() as u64;
            HubHealth {
                status: classify_latency(latency),
                latency_ms: Some(latency),
                active_sessions: snapshot.session_count(),
                active_rooms: snapshot.room_count(),
                message: None,
            }
        }
        Ok(None) => unhealthy("Hub is not running"),
        Err(_) => unhealthy("Hub did not answer in time"),
    }
}

fn unhealthy(message: &str) -> HubHealth {
    HubHealth {
        status: HealthStatus::Unhealthy,
        latency_ms: None,
        active_sessions: 0,
        active_rooms: 0,
        message: Some(message.to_string()),
    }
}

fn classify_latency(latency_ms: u64) -> HealthStatus {
    if latency_ms < HUB_DEGRADED_AFTER_MS {
        HealthStatus::Healthy
    } else {
        HealthStatus::Degraded
    }
}
