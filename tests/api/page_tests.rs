//! Page Flow Tests

use axum::http::{header, StatusCode};
use pretty_assertions::assert_eq;
use test_case::test_case;

use crate::common::{body_json, body_text, TestApp};

fn location(response: &axum::response::Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned()
}

#[tokio::test]
async fn test_index_renders_start_form() {
    let app = TestApp::new().await;

    let response = app.get("/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("/start-chat"));
}

#[tokio::test]
async fn test_start_chat_redirects_into_new_room() {
    let app = TestApp::new().await;

    let response = app.post_form("/start-chat", "uname=ada").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let target = location(&response);
    assert!(target.starts_with("/room?rid="));
    assert!(target.ends_with("&uname=ada"));
}

#[tokio::test]
async fn test_start_chat_rooms_are_distinct() {
    let app = TestApp::new().await;

    let first = location(&app.post_form("/start-chat", "uname=ada").await);
    let second = location(&app.post_form("/start-chat", "uname=ada").await);

    assert_ne!(first, second);
}

#[test_case("/start-chat", "uname=" ; "start without username")]
#[test_case("/start-chat", "" ; "start with empty form")]
#[test_case("/join-chat", "uname=&rid=r1" ; "join without username")]
#[tokio::test]
async fn test_empty_username_rejected(uri: &str, form: &str) {
    let app = TestApp::new().await;

    let response = app.post_form(uri, form).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "Username can't be empty");
    assert_eq!(json["errors"][0]["field"], "uname");
}

#[tokio::test]
async fn test_join_chat_redirects_into_named_room() {
    let app = TestApp::new().await;

    let response = app.post_form("/join-chat", "uname=bob&rid=r1").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/room?rid=r1&uname=bob");
}

#[tokio::test]
async fn test_join_page_carries_room_id() {
    let app = TestApp::new().await;

    let response = app.get("/join?rid=r1").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("r1"));
}

#[tokio::test]
async fn test_room_without_username_redirects_to_join() {
    let app = TestApp::new().await;

    let response = app.get("/room?rid=r1").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/join?rid=r1");
}

#[tokio::test]
async fn test_room_without_room_id_is_bad_request() {
    let app = TestApp::new().await;

    let response = app.get("/room?uname=bob").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "No Room");
}

#[tokio::test]
async fn test_room_page_links_back_to_room() {
    let app = TestApp::new().await;

    let response = app.get("/room?rid=r1&uname=bob").await;

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_text(response).await;
    assert!(html.contains("chat.test/room?rid=r1"));
    assert!(html.contains("bob"));
}

#[tokio::test]
async fn test_security_headers_on_pages() {
    let app = TestApp::new().await;

    let response = app.get("/").await;

    assert_eq!(
        response.headers().get(header::X_CONTENT_TYPE_OPTIONS).unwrap(),
        "nosniff"
    );
}

#[test_case("/ws" ; "missing room id")]
#[test_case("/ws?roomID=" ; "empty room id")]
#[test_case("/ws?roomID=%20%20" ; "blank room id")]
#[tokio::test]
async fn test_ws_rejects_invalid_room_before_upgrade(uri: &str) {
    let app = TestApp::new().await;

    let response = app.get(uri).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let snapshot = app.hub.snapshot().await.unwrap();
    assert_eq!(snapshot.session_count(), 0);
}

#[tokio::test]
async fn test_ws_without_upgrade_headers_is_rejected() {
    let app = TestApp::new().await;

    let response = app.get("/ws?roomID=r1").await;

    assert!(response.status().is_client_error());
    let snapshot = app.hub.snapshot().await.unwrap();
    assert_eq!(snapshot.session_count(), 0);
}
