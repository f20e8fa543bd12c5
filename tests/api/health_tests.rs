//! Health Check API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common::TestApp;

#[tokio::test]
async fn test_health_check_returns_ok() {
    let app = TestApp::new().await;

    let response = app.get("/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = crate::common::body_json(response).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_liveness_probe() {
    let app = TestApp::new().await;

    let response = app.get("/health/live").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = crate::common::body_json(response).await;
    assert_eq!(json["status"], "alive");
}

#[tokio::test]
async fn test_readiness_reports_registry_size() {
    let app = TestApp::new().await;
    let _a = crate::common::connect(&app.hub, "r1").await;
    let _b = crate::common::connect(&app.hub, "r2").await;

    let response = app.get("/health/ready").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = crate::common::body_json(response).await;
    assert_eq!(json["checks"]["hub"]["active_sessions"], 2);
    assert_eq!(json["checks"]["hub"]["active_rooms"], 2);
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_hub_gauges() {
    let app = TestApp::new().await;

    let response = app.get("/metrics").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = crate::common::body_text(response).await;
    assert!(body.contains("room_chat_sessions_active"));
}
