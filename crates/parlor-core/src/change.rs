//! Change records.
//!
//! Applying an event returns the old values of whatever it changed. An empty
//! record ([`Change::None`]) means the event had no observable effect, which
//! is what makes replayed events safe.

use parlor_proto::Membership;

/// Old-value delta produced by [`crate::RoomState::apply`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Change {
    /// Nothing changed.
    #[default]
    None,

    /// A member's membership, resolved name or avatar changed.
    Member(MemberChange),

    /// Room name changed.
    RoomName {
        /// Name before the event. `None` if unset.
        old: Option<String>,
    },

    /// Room topic changed.
    Topic {
        /// Topic before the event. `None` if unset.
        old: Option<String>,
    },
}

impl Change {
    /// True if the event had no observable effect.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Delta for one membership event.
///
/// Each `old_*` field is `Some` only when that attribute changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberChange {
    /// Member the event applied to.
    pub member_id: String,
    /// Membership before the event, if it changed.
    pub old_membership: Option<Membership>,
    /// Resolved name before the event, if it changed.
    pub old_name: Option<String>,
    /// Avatar before the event, if it changed. The inner `None` means the
    /// member had no avatar.
    pub old_avatar: Option<Option<String>>,
    /// Other active members whose resolved name changed as a side effect of
    /// display-name collision, as `(member_id, old_name)` sorted by id.
    pub renamed: Vec<(String, String)>,
}
