//! WebSocket Connection Handler
//!
//! Admits a browser into a room: validates the room id, upgrades the
//! connection, and hands it to a new client session that registers with
//! the hub.

use axum::{
    extract::{
        ws::{rejection::WebSocketUpgradeRejection, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::{IntoResponse, Response},
};

use crate::application::dto::ConnectQuery;
use crate::application::{ClientSession, HubHandle, SessionConfig};
use crate::domain::RoomId;
use crate::infrastructure::transport::WebSocketConnection;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// WebSocket upgrade handler
///
/// The room id is checked before the upgrade, so a rejected join never
/// constructs a session.
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(query): Query<ConnectQuery>,
    upgrade: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let room = match RoomId::parse(&query.room_id) {
        Ok(room) => room,
        Err(e) => {
            tracing::debug!(error = %e, "Join rejected");
            return AppError::from(e).into_response();
        }
    };
    let upgrade = match upgrade {
        Ok(upgrade) => upgrade,
        Err(rejection) => return rejection.into_response(),
    };

    let limits = &state.settings.websocket;
    let config = SessionConfig::from(state.settings.as_ref());
    let hub = state.hub.clone();

    upgrade
        .max_message_size(limits.max_message_size)
        .max_frame_size(limits.max_frame_size)
        .on_failed_upgrade(|e| tracing::warn!(error = %e, "Error upgrading connection"))
        .on_upgrade(move |socket| handle_socket(socket, room, hub, config))
}

/// Run one session until both of its pumps have finished
async fn handle_socket(socket: WebSocket, room: RoomId, hub: HubHandle, config: SessionConfig) {
    let session = ClientSession::new(room, WebSocketConnection::new(socket), config);
    let tasks = session.start(&hub).await;
    tasks.join().await;
}
