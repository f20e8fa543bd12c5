//! Shared Utilities
//!
//! Common utilities used across all layers.

pub mod error;
pub mod room_code;
pub mod validation;
