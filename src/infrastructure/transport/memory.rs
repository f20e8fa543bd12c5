//! In-memory Connection Adapter
//!
//! A connected pair: [`MemoryConnection`] is handed to a session, while
//! [`MemoryPeer`] plays the remote client. The server-to-client direction is
//! bounded, so a peer that stops reading stalls the session's writes exactly
//! like a slow network consumer would.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::{Connection, FrameReader, FrameWriter, Payload};
use crate::shared::error::ConnectionError;

/// Create a connected pair. `peer_buffer` is how many frames may sit unread
/// on the client side before writes block.
pub fn pair(peer_buffer: usize) -> (MemoryConnection, MemoryPeer) {
    let (to_server, from_client) = mpsc::unbounded_channel();
    let (to_client, from_server) = mpsc::channel(peer_buffer.max(1));

    let connection = MemoryConnection {
        reader: MemoryReader { inbound: from_client },
        writer: MemoryWriter {
            outbound: Some(to_client),
        },
    };
    let peer = MemoryPeer {
        to_server: Some(to_server),
        from_server,
    };
    (connection, peer)
}

/// Server side of an in-memory pair.
pub struct MemoryConnection {
    reader: MemoryReader,
    writer: MemoryWriter,
}

impl Connection for MemoryConnection {
    type Reader = MemoryReader;
    type Writer = MemoryWriter;

    fn split(self) -> (Self::Reader, Self::Writer) {
        (self.reader, self.writer)
    }
}

type Inbound = Result<Payload, ConnectionError>;

pub struct MemoryReader {
    inbound: mpsc::UnboundedReceiver<Inbound>,
}

#[async_trait]
impl FrameReader for MemoryReader {
    async fn receive(&mut self) -> Result<Payload, ConnectionError> {
        self.inbound.recv().await.unwrap_or(Err(ConnectionError::Closed))
    }
}

pub struct MemoryWriter {
    outbound: Option<mpsc::Sender<Payload>>,
}

#[async_trait]
impl FrameWriter for MemoryWriter {
    async fn send(&mut self, payload: Payload) -> Result<(), ConnectionError> {
        let outbound = self.outbound.as_ref().ok_or(ConnectionError::Closed)?;
        outbound
            .send(payload)
            .await
            .map_err(|_| ConnectionError::Closed)
    }

    async fn close(&mut self) {
        self.outbound.take();
    }
}

/// Client side of an in-memory pair.
pub struct MemoryPeer {
    to_server: Option<mpsc::UnboundedSender<Inbound>>,
    from_server: mpsc::Receiver<Payload>,
}

impl MemoryPeer {
    /// Send a text frame to the server. Returns `false` once the server has
    /// stopped reading.
    pub fn send(&self, text: impl Into<Payload>) -> bool {
        self.to_server
            .as_ref()
            .is_some_and(|tx| tx.send(Ok(text.into())).is_ok())
    }

    /// Make the server's next read fail, as if the transport broke.
    pub fn fail(&mut self, reason: &str) {
        if let Some(tx) = self.to_server.take() {
            let _ = tx.send(Err(ConnectionError::Protocol(reason.to_string())));
        }
    }

    /// Close the client side; the server reads `Closed` after any frames
    /// already sent.
    pub fn disconnect(&mut self) {
        self.to_server.take();
    }

    /// Next frame from the server, or `None` once the server closed the
    /// connection and every queued frame has been read.
    pub async fn recv(&mut self) -> Option<Payload> {
        self.from_server.recv().await
    }

    /// Next frame if one is already waiting.
    pub fn try_recv(&mut self) -> Option<Payload> {
        self.from_server.try_recv().ok()
    }
}
