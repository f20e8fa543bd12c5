//! Broadcast Hub
//!
//! The single serialization point for room membership. Every operation is a
//! [`HubCommand`] sent to one task that owns the [`RoomRegistry`]; commands
//! are applied one at a time in arrival order, so the registry needs no
//! locking and the three operations are mutually exclusive by construction.
//!
//! - `register` adds a session to its room.
//! - `unregister` removes it (no-op if absent), closes its outbound queue and
//!   marks it closing.
//! - `broadcast` enqueues a payload onto every member's queue without
//!   blocking; a member whose queue is full is evicted on the spot.

mod registry;

pub use registry::{RegistrySnapshot, RoomRegistry};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use super::session::{CloseReason, DeliveryFailure, SessionHandle};
use crate::config::Settings;
use crate::domain::{Payload, RoomId, SessionId};
use crate::infrastructure::metrics;

/// Hub tuning.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Capacity of the command queue feeding the hub loop
    pub command_buffer: usize,
    /// Deliver broadcasts back to the session that sent them
    pub echo_to_sender: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            command_buffer: 1024,
            echo_to_sender: false,
        }
    }
}

impl From<&Settings> for HubConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            command_buffer: settings.hub.command_buffer,
            echo_to_sender: settings.hub.echo_to_sender,
        }
    }
}

/// Operations processed by the hub loop.
#[derive(Debug)]
pub enum HubCommand {
    Register(SessionHandle),
    Unregister {
        session: SessionId,
        room: RoomId,
    },
    Broadcast {
        room: RoomId,
        sender: Option<SessionId>,
        payload: Payload,
    },
    Snapshot(oneshot::Sender<RegistrySnapshot>),
}

/// Cloneable entry point into the hub loop.
///
/// None of the operations report failure: if the hub has stopped, the
/// command is logged and dropped.
#[derive(Debug, Clone)]
pub struct HubHandle {
    commands: mpsc::Sender<HubCommand>,
}

impl HubHandle {
    pub async fn register(&self, session: SessionHandle) {
        self.submit(HubCommand::Register(session)).await;
    }

    pub async fn unregister(&self, session: SessionId, room: RoomId) {
        self.submit(HubCommand::Unregister { session, room }).await;
    }

    /// Fan `payload` out to the members of `room`. `sender` identifies the
    /// originating session for the echo policy; `None` reaches every member.
    pub async fn broadcast(&self, room: RoomId, sender: Option<SessionId>, payload: Payload) {
        self.submit(HubCommand::Broadcast {
            room,
            sender,
            payload,
        })
        .await;
    }

    /// Read the current membership. `None` if the hub has stopped.
    pub async fn snapshot(&self) -> Option<RegistrySnapshot> {
        let (reply, response) = oneshot::channel();
        self.submit(HubCommand::Snapshot(reply)).await;
        response.await.ok()
    }

    async fn submit(&self, command: HubCommand) {
        if let Err(e) = self.commands.send(command).await {
            tracing::warn!(command = ?e.0, "Hub is not running; command dropped");
        }
    }
}

/// The hub loop state.
pub struct Hub {
    registry: RoomRegistry,
    commands: mpsc::Receiver<HubCommand>,
    echo_to_sender: bool,
}

impl Hub {
    /// Spawn the hub loop.
    ///
    /// The loop runs until every [`HubHandle`] has been dropped.
    pub fn spawn(config: HubConfig) -> (HubHandle, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(config.command_buffer.max(1));
        let hub = Self {
            registry: RoomRegistry::new(),
            commands: rx,
            echo_to_sender: config.echo_to_sender,
        };
        let task = tokio::spawn(hub.run());

        (HubHandle { commands: tx }, task)
    }

    async fn run(mut self) {
        tracing::info!(echo_to_sender = self.echo_to_sender, "Hub started");

        while let Some(command) = self.commands.recv().await {
            self.handle(command);
        }

        tracing::info!(
            sessions = self.registry.session_count(),
            rooms = self.registry.room_count(),
            "Hub stopped"
        );
    }

    fn handle(&mut self, command: HubCommand) {
        match command {
            HubCommand::Register(session) => self.register(session),
            HubCommand::Unregister { session, room } => {
                self.unregister(&room, session, CloseReason::Unregistered);
            }
            HubCommand::Broadcast {
                room,
                sender,
                payload,
            } => self.broadcast(&room, sender, payload),
            HubCommand::Snapshot(reply) => {
                let _ = reply.send(self.registry.snapshot());
            }
        }
    }

    fn register(&mut self, session: SessionHandle) {
        let (id, room) = (session.id(), session.room().clone());

        match self.registry.insert(session) {
            Ok(()) => {
                tracing::debug!(session_id = %id, room = %room, "Session registered");
                self.publish_size();
            }
            Err(_) => {
                // The duplicate handle is dropped; the registered one stays.
                tracing::warn!(session_id = %id, room = %room, "Session already registered");
            }
        }
    }

    fn unregister(&mut self, room: &RoomId, id: SessionId, reason: CloseReason) -> bool {
        let Some(session) = self.registry.remove(room, id) else {
            tracing::trace!(session_id = %id, room = %room, "Unregister for absent session");
            return false;
        };

        session.close(reason);
        tracing::debug!(session_id = %id, room = %room, reason = %reason, "Session unregistered");
        self.publish_size();
        true
    }

    fn broadcast(&mut self, room: &RoomId, sender: Option<SessionId>, payload: Payload) {
        let Some(members) = self.registry.members(room) else {
            tracing::trace!(room = %room, "Broadcast to empty room");
            return;
        };

        let mut delivered = 0;
        let mut stalled = Vec::new();
        for member in members {
            if !self.echo_to_sender && Some(member.id()) == sender {
                continue;
            }
            match member.try_deliver(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(failure) => stalled.push((member.id(), failure)),
            }
        }

        let evicted = stalled.len();
        for (id, failure) in stalled {
            let cause = match failure {
                DeliveryFailure::Full => "outbound_full",
                DeliveryFailure::Closed => "outbound_closed",
            };
            if self.unregister(room, id, CloseReason::Evicted) {
                tracing::warn!(session_id = %id, room = %room, cause, "Session evicted");
            }
        }

        tracing::debug!(room = %room, delivered, evicted, "Broadcast processed");
        metrics::record_broadcast(delivered, evicted);
    }

    fn publish_size(&self) {
        metrics::set_registry_size(self.registry.session_count(), self.registry.room_count());
    }
}
