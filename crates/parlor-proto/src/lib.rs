//! Protocol types for Parlor
//!
//! Typed representation of the federated chat protocol as the room state
//! engine consumes it. Raw events arrive as JSON objects; this crate decodes
//! them into [`Event`] values and groups them into [`Batch`]es.
//!
//! # Decoding policy
//!
//! Decoding never rejects an individual event. Unknown event types and events
//! missing required fields decode as [`EventKind::Other`], which every
//! consumer treats as a no-op. Only input that is not JSON at all fails.
//!
//! # Components
//!
//! - [`Event`] / [`EventKind`]: Tagged protocol event
//! - [`Membership`]: Membership token (invite, join, leave, ban)
//! - [`Batch`]: Ordered events plus the pagination token preceding them
//! - [`OutgoingMessage`]: Message payload handed to the transport

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod batch;
pub mod errors;
mod event;
mod membership;
mod outgoing;

pub use batch::Batch;
pub use errors::{ProtoError, Result};
pub use event::{Event, EventKind, MemberContent, MessageContent};
pub use membership::Membership;
pub use outgoing::{OutgoingMessage, TxnId};
