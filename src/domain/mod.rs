//! # Domain Layer
//!
//! Core types of the room chat server, independent of any transport or
//! HTTP framework.
//!
//! ## Structure
//!
//! - **value_objects**: Room ids, session ids, payloads
//! - **connection**: The Connection Adapter traits every transport implements
//!
//! ## Design Principles
//!
//! - No dependencies on infrastructure or presentation layers
//! - Transports are described by traits, implemented in infrastructure

pub mod connection;
pub mod value_objects;

// Re-export commonly used types
pub use connection::{Connection, FrameReader, FrameWriter};
pub use value_objects::*;
