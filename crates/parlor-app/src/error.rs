//! View consistency errors.
//!
//! A view model only reaches these states when it has desynchronized from the
//! room it follows, e.g. because it was fed notifications from another room
//! or skipped some. Continuing would silently corrupt what is displayed, so
//! callers treat every variant as fatal.

use thiserror::Error;

/// The view and the room state disagree.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// A rename or departure referenced a name the view never listed
    #[error("member {member_id} changed from unknown name {old_name:?} to {new_name:?}")]
    UnknownName {
        /// Member the notification was about
        member_id: String,
        /// Name the notification claimed the member had
        old_name: String,
        /// Name the member resolves to now
        new_name: String,
    },

    /// A notification referenced a member the room state does not know
    #[error("member {member_id} is out of sync with the room state")]
    Desync {
        /// Member the notification was about
        member_id: String,
    },

    /// Inserting a member would displace an active member that still
    /// resolves to the same name
    #[error("name {name:?} for {member_id} is already listed for {holder}")]
    NameTaken {
        /// Name being inserted
        name: String,
        /// Member being inserted
        member_id: String,
        /// Member currently listed under that name
        holder: String,
    },
}
