//! # Room Chat Library
//!
//! A room-scoped chat relay:
//! - HTML pages for creating and joining rooms
//! - A WebSocket endpoint that admits each connection into one room
//! - A single hub task that fans each message out to the other members
//!   of the sender's room
//!
//! ## Architecture
//!
//! - **Domain Layer**: Room, session and payload value objects plus the
//!   connection traits the hub is written against
//! - **Application Layer**: The hub loop, its registry, client sessions
//!   and request DTOs
//! - **Infrastructure Layer**: WebSocket and in-memory transports, metrics
//! - **Presentation Layer**: HTTP pages, health checks and the WebSocket
//!   endpoint
//!
//! ## Module Structure
//!
//! ```text
//! room_chat/
//! +-- config/         Configuration management
//! +-- domain/         Value objects and connection traits
//! +-- application/    Hub, sessions and DTOs
//! +-- infrastructure/ Transports and metrics
//! +-- presentation/   HTTP routes and WebSocket endpoint
//! +-- shared/         Errors, validation and room codes
//! ```

// Configuration module
pub mod config;

// Domain layer
pub mod domain;

// Application layer - hub and sessions
pub mod application;

// Infrastructure layer - transports and metrics
pub mod infrastructure;

// Presentation layer - HTTP and WebSocket handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup and state management
pub mod startup;

// Telemetry and observability
pub mod telemetry;
