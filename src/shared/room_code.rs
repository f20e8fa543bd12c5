//! Room Code Generator
//!
//! Random, unguessable room ids for the start-chat flow.

/// Number of random bytes in a generated room code (128 bits).
pub const ROOM_CODE_BYTES: usize = 16;

/// Generate a fresh room code: 16 random bytes, lowercase hex encoded.
pub fn generate_room_code() -> String {
    let bytes: [u8; ROOM_CODE_BYTES] = rand::random();
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
