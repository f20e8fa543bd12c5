//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, response::Response, Router};
use tower::ServiceExt;

use room_chat::application::{Hub, HubConfig, HubHandle, RegistrySnapshot, SessionConfig, SessionTasks};
use room_chat::application::ClientSession;
use room_chat::config::{
    AssetSettings, CorsSettings, HubSettings, ServerSettings, Settings, WebSocketSettings,
};
use room_chat::domain::RoomId;
use room_chat::infrastructure::transport::{memory, MemoryPeer};
use room_chat::presentation::http::create_router;
use room_chat::startup::AppState;

/// How long a test waits for something that should happen promptly.
pub const PATIENCE: Duration = Duration::from_secs(2);

pub fn test_settings() -> Settings {
    Settings {
        server: ServerSettings {
            host: "127.0.0.1".into(),
            port: 0,
        },
        hub: HubSettings {
            outbound_capacity: 256,
            command_buffer: 1024,
            echo_to_sender: false,
        },
        websocket: WebSocketSettings {
            max_message_size: 65536,
            max_frame_size: 16384,
            read_timeout_secs: 60,
            write_timeout_secs: 10,
        },
        cors: CorsSettings {
            allowed_origins: vec![],
        },
        assets: AssetSettings {
            static_dir: "static".into(),
        },
        environment: "test".into(),
    }
}

/// Test application builder
pub struct TestApp {
    pub router: Router,
    pub hub: HubHandle,
}

impl TestApp {
    /// Router and hub built the way startup does, without binding a socket
    pub async fn new() -> Self {
        let settings = test_settings();
        let (hub, _task) = Hub::spawn(HubConfig::from(&settings));
        let state = AppState {
            hub: hub.clone(),
            settings: Arc::new(settings),
        };

        Self {
            router: create_router(state),
            hub,
        }
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .header("Host", "chat.test")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make a POST request with a URL-encoded form body
    pub async fn post_form(&self, uri: &str, body: &str) -> Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }
}

/// Read a whole response body as text
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read a whole response body as JSON
pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// A started session plus the client end of its connection
pub struct TestClient {
    pub tasks: SessionTasks,
    pub peer: MemoryPeer,
}

impl TestClient {
    /// Next frame delivered to this client; panics if none arrives in time
    pub async fn recv(&mut self) -> String {
        match tokio::time::timeout(PATIENCE, self.peer.recv()).await {
            Ok(Some(payload)) => payload.as_str().to_owned(),
            Ok(None) => panic!("connection closed while waiting for a frame"),
            Err(_) => panic!("no frame within {:?}", PATIENCE),
        }
    }

    /// Wait until the server side has released the connection
    pub async fn wait_closed(&self) {
        tokio::time::timeout(PATIENCE, self.tasks.closed())
            .await
            .expect("session did not close in time");
    }
}

pub fn room(id: &str) -> RoomId {
    RoomId::parse(id).unwrap()
}

pub fn spawn_hub(echo_to_sender: bool) -> HubHandle {
    let (hub, _task) = Hub::spawn(HubConfig {
        echo_to_sender,
        ..HubConfig::default()
    });
    hub
}

/// Connect a client with default session settings
pub async fn connect(hub: &HubHandle, room_id: &str) -> TestClient {
    connect_with(hub, room_id, SessionConfig::default(), 64).await
}

/// Connect a client with explicit queue sizes
pub async fn connect_with(
    hub: &HubHandle,
    room_id: &str,
    config: SessionConfig,
    peer_buffer: usize,
) -> TestClient {
    let (connection, peer) = memory::pair(peer_buffer);
    let tasks = ClientSession::new(room(room_id), connection, config)
        .start(hub)
        .await;
    TestClient { tasks, peer }
}

/// Poll the hub until `check` accepts a snapshot
pub async fn eventually<F>(hub: &HubHandle, check: F) -> RegistrySnapshot
where
    F: Fn(&RegistrySnapshot) -> bool,
{
    let deadline = tokio::time::Instant::now() + PATIENCE;
    loop {
        let snapshot = hub.snapshot().await.expect("hub stopped");
        if check(&snapshot) {
            return snapshot;
        }
        if tokio::time::Instant::now() >= deadline {
            panic!("registry never reached the expected state: {:?}", snapshot);
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
}
