//! Client Session
//!
//! A session pairs one connection with a bounded outbound queue and a room.
//! Once started it runs two independent tasks:
//!
//! - the **inbound pump** reads frames and submits them to the hub as
//!   broadcasts; on read failure it unregisters the session exactly once;
//! - the **outbound pump** drains the outbound queue onto the connection and
//!   releases the writer when the queue closes or a write fails.
//!
//! The hub keeps only a [`SessionHandle`]: the queue's sending side plus the
//! shared [`Lifecycle`]. Dropping the handle closes the queue.

mod lifecycle;

pub use lifecycle::{CloseReason, Lifecycle, SessionState};

use std::time::Duration;

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use super::hub::HubHandle;
use crate::config::Settings;
use crate::domain::{Connection, FrameReader, FrameWriter, Payload, RoomId, SessionId};
use crate::shared::error::ConnectionError;

/// Reference outbound queue capacity.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 256;

/// Per-session tuning.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Outbound queue capacity (messages)
    pub outbound_capacity: usize,
    /// Maximum silence before a read counts as failed
    pub read_timeout: Duration,
    /// Maximum time a single write may block
    pub write_timeout: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
            read_timeout: Duration::from_secs(60),
            write_timeout: Duration::from_secs(10),
        }
    }
}

impl From<&Settings> for SessionConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            outbound_capacity: settings.hub.outbound_capacity,
            read_timeout: settings.websocket.read_timeout(),
            write_timeout: settings.websocket.write_timeout(),
        }
    }
}

/// Why the hub could not enqueue a payload for a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryFailure {
    /// Queue at capacity: the consumer is not keeping up.
    Full,
    /// The outbound pump is gone.
    Closed,
}

/// The hub's view of a registered session.
#[derive(Debug)]
pub struct SessionHandle {
    id: SessionId,
    room: RoomId,
    outbound: mpsc::Sender<Payload>,
    lifecycle: Lifecycle,
}

impl SessionHandle {
    pub(crate) fn new(
        id: SessionId,
        room: RoomId,
        outbound: mpsc::Sender<Payload>,
        lifecycle: Lifecycle,
    ) -> Self {
        Self {
            id,
            room,
            outbound,
            lifecycle,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    /// Non-blocking enqueue onto the outbound queue.
    pub(crate) fn try_deliver(&self, payload: Payload) -> Result<(), DeliveryFailure> {
        self.outbound.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryFailure::Full,
            TrySendError::Closed(_) => DeliveryFailure::Closed,
        })
    }

    /// Mark the session closing and close its outbound queue.
    ///
    /// Consumes the handle: the queue's only sender is dropped here, so no
    /// enqueue can follow.
    pub(crate) fn close(self, reason: CloseReason) {
        self.lifecycle.begin_close(reason);
    }
}

/// A session that has been accepted but not yet started.
pub struct ClientSession<C: Connection> {
    id: SessionId,
    room: RoomId,
    connection: C,
    config: SessionConfig,
}

impl<C: Connection> ClientSession<C> {
    pub fn new(room: RoomId, connection: C, config: SessionConfig) -> Self {
        Self {
            id: SessionId::new(),
            room,
            connection,
            config,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    /// Register with the hub, then spawn both pumps.
    ///
    /// Registration is submitted before the inbound pump exists, so the hub
    /// always sees `register` ahead of this session's first broadcast.
    pub async fn start(self, hub: &HubHandle) -> SessionTasks {
        let Self {
            id,
            room,
            connection,
            config,
        } = self;

        let (reader, writer) = connection.split();
        let (outbound_tx, outbound_rx) = mpsc::channel(config.outbound_capacity.max(1));
        let lifecycle = Lifecycle::new();

        hub.register(SessionHandle::new(
            id,
            room.clone(),
            outbound_tx,
            lifecycle.clone(),
        ))
        .await;

        tracing::info!(session_id = %id, room = %room, "Session started");

        let inbound = tokio::spawn(run_inbound(
            reader,
            hub.clone(),
            id,
            room.clone(),
            lifecycle.clone(),
            config.read_timeout,
        ));
        let outbound = tokio::spawn(run_outbound(
            writer,
            outbound_rx,
            id,
            lifecycle.clone(),
            config.write_timeout,
        ));

        SessionTasks {
            id,
            room,
            lifecycle,
            inbound,
            outbound,
        }
    }
}

/// Running pumps of a started session.
pub struct SessionTasks {
    id: SessionId,
    room: RoomId,
    lifecycle: Lifecycle,
    inbound: JoinHandle<()>,
    outbound: JoinHandle<()>,
}

impl SessionTasks {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn room(&self) -> &RoomId {
        &self.room
    }

    pub fn state(&self) -> SessionState {
        self.lifecycle.state()
    }

    /// Resolves once the connection has been released.
    pub async fn closed(&self) {
        self.lifecycle.closed().await;
    }

    /// Wait for both pumps to finish.
    pub async fn join(self) {
        for (pump, handle) in [("inbound", self.inbound), ("outbound", self.outbound)] {
            if let Err(e) = handle.await {
                tracing::error!(session_id = %self.id, pump, error = %e, "Session pump panicked");
            }
        }
    }
}

/// Read frames and submit them to the hub until the connection fails or the
/// session starts closing for another reason.
async fn run_inbound<R: FrameReader>(
    mut reader: R,
    hub: HubHandle,
    id: SessionId,
    room: RoomId,
    lifecycle: Lifecycle,
    read_timeout: Duration,
) {
    loop {
        let frame = tokio::select! {
            _ = lifecycle.closing() => break,
            frame = timeout(read_timeout, reader.receive()) => {
                frame.unwrap_or(Err(ConnectionError::ReadTimeout(read_timeout)))
            }
        };

        match frame {
            Ok(payload) => {
                tracing::trace!(session_id = %id, room = %room, bytes = payload.len(), "Frame received");
                hub.broadcast(room.clone(), Some(id), payload).await;
            }
            Err(e) => {
                tracing::debug!(session_id = %id, room = %room, error = %e, "Read failed");
                lifecycle.begin_close(CloseReason::ReadFailed);
                break;
            }
        }
    }

    // Sole unregistration point for this session; a no-op in the hub if an
    // eviction already removed it.
    hub.unregister(id, room).await;
    drop(reader);
}

/// Drain the outbound queue onto the connection.
///
/// Ends when the queue is closed and empty or when a write fails. Closing
/// the queue (unregister or eviction) never discards what was already
/// enqueued; a stalled peer is cut off by the write deadline instead.
async fn run_outbound<W: FrameWriter>(
    mut writer: W,
    mut queue: mpsc::Receiver<Payload>,
    id: SessionId,
    lifecycle: Lifecycle,
    write_timeout: Duration,
) {
    while let Some(payload) = queue.recv().await {
        let written = timeout(write_timeout, writer.send(payload))
            .await
            .unwrap_or(Err(ConnectionError::WriteTimeout(write_timeout)));

        if let Err(e) = written {
            tracing::debug!(session_id = %id, error = %e, "Write failed");
            lifecycle.begin_close(CloseReason::WriteFailed);
            break;
        }
    }

    drop(queue);
    if timeout(write_timeout, writer.close()).await.is_err() {
        tracing::debug!(session_id = %id, "Close handshake timed out");
    }

    let reason = match lifecycle.state() {
        SessionState::Closing(reason) => Some(reason),
        _ => None,
    };
    lifecycle.finish_close();

    tracing::info!(session_id = %id, reason = ?reason, "Session closed");
}

#[cfg(test)]
pub(crate) fn detached_handle(
    room: &str,
    capacity: usize,
) -> (SessionHandle, mpsc::Receiver<Payload>, Lifecycle) {
    let (tx, rx) = mpsc::channel(capacity);
    let lifecycle = Lifecycle::new();
    let room = RoomId::parse(room).expect("valid room id");
    (
        SessionHandle::new(SessionId::new(), room, tx, lifecycle.clone()),
        rx,
        lifecycle,
    )
}
