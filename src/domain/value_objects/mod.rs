//! # Domain Value Objects
//!
//! Immutable value types that represent domain concepts without identity.
//!
//! ## Value Objects
//!
//! - **RoomId**: Validated room identifier
//! - **SessionId**: Opaque identity of one connected client
//! - **Payload**: Text frame relayed between room members

mod payload;
mod room_id;
mod session_id;

pub use payload::*;
pub use room_id::*;
pub use session_id::*;
