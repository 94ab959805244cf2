//! Room state engine
//!
//! Ingests batches of protocol events and maintains the current view of a
//! room: who is in it, under which display name, and with which name and
//! topic. Every mutation reports exactly what it changed, so observers can
//! update incrementally instead of diffing snapshots.
//!
//! # Architecture
//!
//! The engine is pure data with no I/O and no internal synchronization. The
//! caller feeds [`Batch`]es into a [`Room`], which folds live traffic into
//! its [`RoomState`] and delivers [`Notification`]s to a [`RoomObserver`]
//! before returning. Outgoing messages go through the [`Transport`] seam.
//!
//! # Components
//!
//! - [`Member`]: One participant's identity and membership
//! - [`RoomState`]: Reconciliation engine (apply event, resolve names)
//! - [`Change`]: Old-value delta produced by applying one event
//! - [`Room`]: Live state plus the buffered history of batches
//! - [`RoomRegistry`]: Rooms the session has joined or peeked

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod change;
mod error;
mod member;
mod notification;
mod registry;
mod room;
mod state;
pub mod transport;

pub use change::{Change, MemberChange};
pub use error::{MemberError, RegistryError};
pub use member::Member;
pub use notification::{Notification, RoomObserver};
pub use parlor_proto::{Batch, Event, EventKind, Membership, OutgoingMessage, TxnId};
pub use registry::RoomRegistry;
pub use room::{Direction, ReplayStep, Room};
pub use state::RoomState;
pub use transport::{MemoryTransport, Transport};
