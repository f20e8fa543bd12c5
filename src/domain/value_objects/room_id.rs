//! Room identifier value object.
//!
//! Room ids are free-form string tokens chosen by clients (or generated by
//! the start-chat flow). They are validated once, at the HTTP boundary, so
//! the hub only ever handles well-formed ids.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Maximum length of a room id in bytes.
pub const MAX_ROOM_ID_LEN: usize = 128;

/// Reasons a raw string is not a usable room id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoomIdError {
    #[error("Room ID is required")]
    Empty,

    #[error("Room ID must be at most {MAX_ROOM_ID_LEN} bytes")]
    TooLong,

    #[error("Room ID must not contain control characters")]
    ControlCharacter,
}

/// Identifier of a chat room.
///
/// Cheap to clone: every broadcast carries one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoomId(Arc<str>);

impl RoomId {
    /// Parse and validate a raw room id.
    ///
    /// Surrounding whitespace is trimmed before validation.
    pub fn parse(raw: &str) -> Result<Self, RoomIdError> {
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(RoomIdError::Empty);
        }
        if trimmed.len() > MAX_ROOM_ID_LEN {
            return Err(RoomIdError::TooLong);
        }
        if trimmed.chars().any(char::is_control) {
            return Err(RoomIdError::ControlCharacter);
        }

        Ok(Self(Arc::from(trimmed)))
    }

    /// Get the room id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RoomId {
    type Err = RoomIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for RoomId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
