//! Rooms and their views.

use std::collections::BTreeMap;

use parlor_app::RoomView;
use parlor_core::{Direction, RegistryError, Room, RoomRegistry, Transport, TxnId};

use crate::{CliError, Dump};

/// Every open room together with the view that follows it.
#[derive(Debug, Default)]
pub struct Session {
    registry: RoomRegistry,
    views: BTreeMap<String, RoomView>,
}

impl Session {
    /// Create an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a room and attach a view to it.
    ///
    /// # Errors
    ///
    /// - `CliError::Registry` if the room is already open
    pub fn open(&mut self, room_id: &str) -> Result<&RoomView, CliError> {
        let room = self.registry.join(room_id)?;
        let view = RoomView::new(room);
        Ok(self.views.entry(room_id.to_owned()).or_insert(view))
    }

    /// Stop tracking a room, returning it.
    ///
    /// # Errors
    ///
    /// - `CliError::Registry` if the room is not open
    pub fn close(&mut self, room_id: &str) -> Result<Room, CliError> {
        self.views.remove(room_id);
        Ok(self.registry.leave(room_id)?)
    }

    /// Feed a dump into an open room: live batches forward, then backfill
    /// backward. The view's timeline is rebuilt afterwards so backfilled
    /// history shows.
    ///
    /// # Errors
    ///
    /// - `CliError::Registry` if the room is not open
    /// - `CliError::View` as soon as the view desyncs
    pub fn replay(&mut self, room_id: &str, dump: Dump) -> Result<&RoomView, CliError> {
        let view = self
            .views
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.to_owned()))?;

        tracing::info!(
            room_id,
            live = dump.live.len(),
            backfill = dump.backfill.len(),
            events = dump.event_count(),
            "replaying dump"
        );

        let batches = dump
            .live
            .into_iter()
            .map(|batch| (batch, Direction::Forward))
            .chain(dump.backfill.into_iter().map(|batch| (batch, Direction::Backward)));

        for (batch, direction) in batches {
            self.registry.ingest(room_id, batch, direction, view)?;
            if let Some(error) = view.error() {
                return Err(error.clone().into());
            }
        }

        let room = self
            .registry
            .get(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.to_owned()))?;
        view.refresh_timeline(room);
        Ok(view)
    }

    /// Send a text message into an open room.
    ///
    /// # Errors
    ///
    /// - `CliError::Registry` if the room is not open
    /// - `CliError::Transport` if the transport rejects the message
    pub fn send<T: Transport>(&mut self, room_id: &str, body: &str, transport: &mut T) -> Result<TxnId, CliError> {
        let room = self
            .registry
            .get_mut(room_id)
            .ok_or_else(|| RegistryError::RoomNotFound(room_id.to_owned()))?;
        room.send_message(body, transport).map_err(|error| CliError::Transport(Box::new(error)))
    }

    /// View of an open room.
    pub fn view(&self, room_id: &str) -> Option<&RoomView> {
        self.views.get(room_id)
    }

    /// An open room.
    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.registry.get(room_id)
    }

    /// Ids of all open rooms.
    pub fn room_ids(&self) -> impl Iterator<Item = &str> {
        self.views.keys().map(String::as_str)
    }
}
