//! Error types for the room state engine.
//!
//! Event application itself never fails: malformed fields degrade to absent
//! values and unknown event types are no-ops. What remains are construction
//! errors and caller mistakes in room lifecycle management.

use thiserror::Error;

/// Errors from constructing a [`crate::Member`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemberError {
    /// Member ids are the natural key and cannot be empty
    #[error("member id must not be empty")]
    EmptyId,
}

/// Errors from [`crate::RoomRegistry`] operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Room is not tracked by this registry
    #[error("room not found: {0}")]
    RoomNotFound(String),

    /// Room is already tracked by this registry
    #[error("room already exists: {0}")]
    RoomAlreadyExists(String),
}
