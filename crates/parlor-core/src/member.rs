//! Room members.

use parlor_proto::Membership;

use crate::error::MemberError;

/// One participant as seen by a room.
///
/// The id is fixed at construction. Display name, avatar and membership are
/// mutated only by [`crate::RoomState::apply`]. A member holds no reference
/// to its room: anything that depends on the rest of the room, such as the
/// collision-aware display name, is computed by [`crate::RoomState`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    id: String,
    display_name: Option<String>,
    avatar_url: Option<String>,
    membership: Membership,
}

impl Member {
    /// Create a member that has not joined (membership [`Membership::Leave`]).
    ///
    /// # Errors
    ///
    /// - `MemberError::EmptyId` if `id` is empty
    pub fn new(id: impl Into<String>) -> Result<Self, MemberError> {
        let id = id.into();
        if id.is_empty() {
            return Err(MemberError::EmptyId);
        }
        Ok(Self { id, display_name: None, avatar_url: None, membership: Membership::default() })
    }

    /// Stable member id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Raw display name. `None` if never set or cleared.
    ///
    /// Use [`crate::RoomState::member_name`] for the label to show.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Avatar URL. `None` if the member has no avatar.
    pub fn avatar_url(&self) -> Option<&str> {
        self.avatar_url.as_deref()
    }

    /// Current membership.
    pub fn membership(&self) -> Membership {
        self.membership
    }

    /// True if the member is joined or invited.
    pub fn is_active(&self) -> bool {
        self.membership.is_active()
    }

    pub(crate) fn set_membership(&mut self, membership: Membership) {
        self.membership = membership;
    }

    pub(crate) fn set_display_name(&mut self, display_name: Option<String>) {
        self.display_name = display_name;
    }

    pub(crate) fn set_avatar_url(&mut self, avatar_url: Option<String>) {
        self.avatar_url = avatar_url;
    }
}
