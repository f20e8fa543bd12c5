//! Connection Adapter contract.
//!
//! A duplex connection is split once, when its session starts, into a
//! reader half owned by the inbound pump and a writer half owned by the
//! outbound pump. Sessions only ever talk to these traits, so hub and
//! session logic run unchanged over a real WebSocket or an in-memory pair.

use async_trait::async_trait;

use super::Payload;
use crate::shared::error::ConnectionError;

/// Receiving half of a connection.
#[async_trait]
pub trait FrameReader: Send + 'static {
    /// Wait for the next frame from the remote end.
    ///
    /// Any error is permanent: the caller must stop reading.
    async fn receive(&mut self) -> Result<Payload, ConnectionError>;
}

/// Sending half of a connection.
#[async_trait]
pub trait FrameWriter: Send + 'static {
    /// Write one frame to the remote end.
    ///
    /// Any error is permanent: the caller must stop writing.
    async fn send(&mut self, payload: Payload) -> Result<(), ConnectionError>;

    /// Close the connection.
    ///
    /// Idempotent: closing an already closed connection is a no-op.
    async fn close(&mut self);
}

/// A physical duplex connection that can be split into its two halves.
pub trait Connection: Send + 'static {
    type Reader: FrameReader;
    type Writer: FrameWriter;

    /// Split into independently owned reader and writer halves.
    fn split(self) -> (Self::Reader, Self::Writer);
}
