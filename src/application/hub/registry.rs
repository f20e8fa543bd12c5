//! Room Registry: room id → sessions currently in that room.
//!
//! Owned exclusively by the hub loop. A room entry exists if and only if it
//! has at least one member, and a session id belongs to at most one room.

use std::collections::{BTreeMap, HashMap};

use crate::application::session::SessionHandle;
use crate::domain::{RoomId, SessionId};

#[derive(Debug, Default)]
pub struct RoomRegistry {
    rooms: HashMap<RoomId, HashMap<SessionId, SessionHandle>>,
    /// Which room each registered session is in.
    index: HashMap<SessionId, RoomId>,
}

impl RoomRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a session into its room, creating the room entry if absent.
    ///
    /// A session id already present in any room is left untouched and the
    /// new handle is handed back.
    pub fn insert(&mut self, session: SessionHandle) -> Result<(), SessionHandle> {
        if self.index.contains_key(&session.id()) {
            return Err(session);
        }
        self.index.insert(session.id(), session.room().clone());
        self.rooms
            .entry(session.room().clone())
            .or_default()
            .insert(session.id(), session);
        Ok(())
    }

    /// Remove a session from a room, dropping the room entry once empty.
    pub fn remove(&mut self, room: &RoomId, id: SessionId) -> Option<SessionHandle> {
        let members = self.rooms.get_mut(room)?;
        let session = members.remove(&id)?;
        if members.is_empty() {
            self.rooms.remove(room);
        }
        self.index.remove(&id);
        Some(session)
    }

    /// Members of a room, if the room has any.
    pub fn members(&self, room: &RoomId) -> Option<impl Iterator<Item = &SessionHandle>> {
        self.rooms.get(room).map(|members| members.values())
    }

    pub fn contains(&self, room: &RoomId, id: SessionId) -> bool {
        self.rooms
            .get(room)
            .is_some_and(|members| members.contains_key(&id))
    }

    pub fn session_count(&self) -> usize {
        self.index.len()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Copy of the membership, sorted for stable comparison.
    pub fn snapshot(&self) -> RegistrySnapshot {
        let rooms = self
            .rooms
            .iter()
            .map(|(room, members)| {
                let mut ids: Vec<SessionId> = members.keys().copied().collect();
                ids.sort();
                (room.clone(), ids)
            })
            .collect();
        RegistrySnapshot { rooms }
    }
}

/// Point-in-time view of the registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrySnapshot {
    pub rooms: BTreeMap<RoomId, Vec<SessionId>>,
}

impl RegistrySnapshot {
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    pub fn session_count(&self) -> usize {
        self.rooms.values().map(Vec::len).sum()
    }

    pub fn members(&self, room: &RoomId) -> Option<&[SessionId]> {
        self.rooms.get(room).map(Vec::as_slice)
    }

    pub fn contains(&self, id: SessionId) -> bool {
        self.rooms.values().any(|members| members.contains(&id))
    }
}
