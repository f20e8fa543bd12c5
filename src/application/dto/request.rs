//! Request DTOs
//!
//! Form bodies and query strings accepted by the page and WebSocket
//! endpoints. Missing fields default to empty so the validation messages,
//! not the extractor, decide the response.

use serde::Deserialize;
use validator::Validate;

/// Start-chat form
#[derive(Debug, Deserialize, Validate)]
pub struct StartChatForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username can't be empty"))]
    pub uname: String,
}

/// Join-chat form
#[derive(Debug, Deserialize, Validate)]
pub struct JoinChatForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username can't be empty"))]
    pub uname: String,

    #[serde(default)]
    pub rid: String,
}

/// Query of the join page
#[derive(Debug, Default, Deserialize)]
pub struct JoinQuery {
    #[serde(default)]
    pub rid: String,
}

/// Query of the room page
#[derive(Debug, Default, Deserialize)]
pub struct RoomQuery {
    #[serde(default)]
    pub rid: String,

    #[serde(default)]
    pub uname: String,
}

/// Query of the WebSocket endpoint
#[derive(Debug, Default, Deserialize)]
pub struct ConnectQuery {
    #[serde(rename = "roomID", default)]
    pub room_id: String,
}
