//! Data Transfer Objects
//!
//! Forms and query strings accepted by the HTTP layer.

pub mod request;

pub use request::{ConnectQuery, JoinChatForm, JoinQuery, RoomQuery, StartChatForm};
