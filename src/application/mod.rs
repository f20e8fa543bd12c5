//! Application Layer
//!
//! The room-scoped broadcast hub and the client sessions it serves, plus
//! the request DTOs used by the HTTP layer to admit new sessions.

pub mod dto;
pub mod hub;
pub mod session;

pub use hub::{Hub, HubConfig, HubHandle, RegistrySnapshot};
pub use session::{ClientSession, CloseReason, SessionConfig, SessionState, SessionTasks};
