//! Room registry
//!
//! Tracks the rooms a session has joined or peeked. A [`Room`] is created
//! when the client joins and dropped, with its history, when the client
//! leaves. Rooms must be added explicitly; ingesting into an unknown room is
//! a caller error rather than an implicit join.

use std::collections::HashMap;

use parlor_proto::Batch;

use crate::{Direction, RoomObserver, error::RegistryError, room::Room};

/// Rooms of one session, keyed by room id.
#[derive(Debug, Clone, Default)]
pub struct RoomRegistry {
    rooms: HashMap<String, Room>,
}

impl RoomRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a room with empty state and history.
    ///
    /// # Errors
    ///
    /// - `RegistryError::RoomAlreadyExists` if the room is already tracked
    pub fn join(&mut self, room_id: impl Into<String>) -> Result<&mut Room, RegistryError> {
        let room_id = room_id.into();
        match self.rooms.entry(room_id) {
            std::collections::hash_map::Entry::Occupied(entry) => {
                Err(RegistryError::RoomAlreadyExists(entry.key().clone()))
            },
            std::collections::hash_map::Entry::Vacant(entry) => {
                tracing::info!(room_id = %entry.key(), "tracking room");
                let room = Room::new(entry.key().clone());
                Ok(entry.insert(room))
            },
        }
    }

    /// Stop tracking a room and return it.
    ///
    /// # Errors
    ///
    /// - `RegistryError::RoomNotFound` if the room is not tracked
    pub fn leave(&mut self, room_id: &str) -> Result<Room, RegistryError> {
        let room = self
            .rooms
            .remove(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.to_owned()))?;
        tracing::info!(room_id, batches = room.batch_count(), "dropped room");
        Ok(room)
    }

    /// Ingest a batch into a tracked room.
    ///
    /// # Errors
    ///
    /// - `RegistryError::RoomNotFound` if the room is not tracked
    pub fn ingest<O: RoomObserver + ?Sized>(
        &mut self,
        room_id: &str,
        batch: Batch,
        direction: Direction,
        observer: &mut O,
    ) -> Result<(), RegistryError> {
        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.to_owned()))?;
        room.ingest_batch(batch, direction, observer);
        Ok(())
    }

    /// Look up a tracked room.
    pub fn get(&self, room_id: &str) -> Option<&Room> {
        self.rooms.get(room_id)
    }

    /// Look up a tracked room mutably.
    pub fn get_mut(&mut self, room_id: &str) -> Option<&mut Room> {
        self.rooms.get_mut(room_id)
    }

    /// True if the room is tracked.
    pub fn contains(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Ids of all tracked rooms, in unspecified order.
    pub fn room_ids(&self) -> impl Iterator<Item = &str> {
        self.rooms.keys().map(String::as_str)
    }

    /// Number of tracked rooms.
    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    /// True if no rooms are tracked.
    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
