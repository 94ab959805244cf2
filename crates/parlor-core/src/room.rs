//! Room: live state plus buffered history.
//!
//! A [`Room`] owns the authoritative [`RoomState`] and the ordered history of
//! every [`Batch`] it has been given. Live batches are appended to the newest
//! end and folded into the live state; backfill batches are prepended to the
//! oldest end and only serve historical replay.
//!
//! # Invariants
//!
//! - The live state equals the fold of every event of every forward batch,
//!   in delivery order, starting from [`Room::initial_state`].
//! - Backfill never mutates the live state.
//! - History only grows: forward batches at the back, backfill at the front.

use std::collections::VecDeque;

use parlor_proto::{Batch, Event, MessageContent, OutgoingMessage, TxnId};

use crate::{Change, Notification, RoomObserver, RoomState, Transport};

/// Which end of the history a batch extends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Live traffic, newer than anything known. Folded into the live state.
    Forward,
    /// Backfill, older than anything known. History only.
    Backward,
}

/// One step of a historical replay.
#[derive(Debug)]
pub enum ReplayStep<'a> {
    /// Start of a batch.
    Batch(&'a Batch),
    /// An event, with the change it made to the replayed state.
    Event {
        /// The replayed event.
        event: &'a Event,
        /// What applying it changed.
        change: Change,
    },
}

/// One joined or peeked room.
#[derive(Debug, Clone)]
pub struct Room {
    room_id: String,
    live_state: RoomState,
    history: VecDeque<Batch>,
    next_txn: u64,
}

impl Room {
    /// Create an empty room.
    pub fn new(room_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            live_state: RoomState::new(),
            history: VecDeque::new(),
            next_txn: 0,
        }
    }

    /// Room id.
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Current live state.
    pub fn state(&self) -> &RoomState {
        &self.live_state
    }

    /// Starting point for replaying the buffered history.
    ///
    /// Always empty and independent of the live state.
    pub fn initial_state(&self) -> RoomState {
        RoomState::new()
    }

    /// Buffered batches, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &Batch> {
        self.history.iter()
    }

    /// Number of buffered batches.
    pub fn batch_count(&self) -> usize {
        self.history.len()
    }

    /// Number of buffered events across all batches.
    pub fn event_count(&self) -> usize {
        self.history.iter().map(Batch::len).sum()
    }

    /// Token to request the history preceding everything buffered.
    ///
    /// `None` when nothing is buffered or the oldest batch starts the room.
    pub fn oldest_token(&self) -> Option<&str> {
        self.history.front().and_then(|batch| batch.prev_batch.as_deref())
    }

    /// Add a batch to the history and notify `observer`.
    ///
    /// Forward batches are folded into the live state. The observer first
    /// receives [`Notification::PrevBatch`] with the batch's token, if any,
    /// then, per event in order, the notifications for its change. Each
    /// non-empty change yields one primary notification (membership, else
    /// name, else avatar, or the room-level change), followed by a
    /// [`Notification::MemberNameChanged`] per collateral collision rename.
    /// Message events yield [`Notification::Message`].
    ///
    /// Backward batches are only buffered; the observer receives only
    /// [`Notification::PrevBatch`].
    ///
    /// All notifications are delivered before this returns.
    pub fn ingest_batch<O: RoomObserver + ?Sized>(
        &mut self,
        batch: Batch,
        direction: Direction,
        observer: &mut O,
    ) {
        tracing::info!(
            room_id = %self.room_id,
            ?direction,
            events = batch.len(),
            prev_batch = ?batch.prev_batch,
            "ingesting batch"
        );

        match direction {
            Direction::Forward => {
                observer.notify(&self.live_state, &Notification::PrevBatch {
                    token: batch.prev_batch.clone(),
                    direction,
                });

                for event in &batch.events {
                    tracing::trace!(
                        room_id = %self.room_id,
                        event_id = ?event.event_id,
                        event_type = event.event_type(),
                        "applying event"
                    );

                    let change = self.live_state.apply(event);
                    for notification in Notification::from_change(&self.live_state, event, change) {
                        observer.notify(&self.live_state, &notification);
                    }
                }

                self.history.push_back(batch);
            },
            Direction::Backward => {
                let token = batch.prev_batch.clone();
                self.history.push_front(batch);

                observer.notify(&self.live_state, &Notification::PrevBatch { token, direction });
            },
        }
    }

    /// Replay the whole history from [`Room::initial_state`].
    ///
    /// `f` is called at the start of each batch and after each event, with
    /// the replayed state as of that point. Past messages can thereby be
    /// rendered with the names and memberships valid when they were sent.
    pub fn replay<F>(&self, mut f: F)
    where
        F: FnMut(&RoomState, ReplayStep<'_>),
    {
        let mut state = self.initial_state();
        for batch in &self.history {
            f(&state, ReplayStep::Batch(batch));
            for event in &batch.events {
                let change = state.apply(event);
                f(&state, ReplayStep::Event { event, change });
            }
        }
    }

    /// State after the first `index + 1` buffered events, oldest first.
    ///
    /// `None` if `index` is past the end of the history.
    pub fn state_at(&self, index: usize) -> Option<RoomState> {
        if index >= self.event_count() {
            return None;
        }

        let mut state = self.initial_state();
        for event in self.history.iter().flat_map(|batch| batch.events.iter()).take(index + 1) {
            state.apply(event);
        }
        Some(state)
    }

    /// Send a text message through `transport`.
    ///
    /// The live state is not touched: the message shows up only once the
    /// server echoes it back in a forward batch.
    ///
    /// # Errors
    ///
    /// Returns the transport's error if the hand-off fails. The transaction
    /// id is consumed either way.
    pub fn send_message<T: Transport + ?Sized>(
        &mut self,
        body: impl Into<String>,
        transport: &mut T,
    ) -> Result<TxnId, T::Error> {
        let txn_id = TxnId(self.next_txn);
        self.next_txn += 1;

        let message = OutgoingMessage {
            room_id: self.room_id.clone(),
            txn_id,
            content: MessageContent::text(body),
        };

        tracing::debug!(room_id = %self.room_id, %txn_id, "sending message");
        transport.send(message)?;
        Ok(txn_id)
    }
}
