//! Membership tokens.

use std::fmt;

/// A participant's relationship to a room.
///
/// The default is [`Membership::Leave`]: an id that was never referenced by a
/// membership event is implicitly not present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Membership {
    /// Invited, not yet joined.
    Invite,
    /// Active participant.
    Join,
    /// Not present.
    #[default]
    Leave,
    /// Forcibly excluded.
    Ban,
}

impl Membership {
    /// All membership values, in declaration order.
    pub const ALL: [Self; 4] = [Self::Invite, Self::Join, Self::Leave, Self::Ban];

    /// Parse a wire token.
    ///
    /// Exactly `"invite"`, `"join"`, `"leave"` and `"ban"` are recognized.
    /// Matching is case-sensitive. Anything else returns `None` and the caller
    /// ignores the membership effect of that event.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "invite" => Some(Self::Invite),
            "join" => Some(Self::Join),
            "leave" => Some(Self::Leave),
            "ban" => Some(Self::Ban),
            _ => None,
        }
    }

    /// Wire token for this membership.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Invite => "invite",
            Self::Join => "join",
            Self::Leave => "leave",
            Self::Ban => "ban",
        }
    }

    /// True for memberships that count as present in the room (join, invite).
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Invite | Self::Join)
    }
}

impl fmt::Display for Membership {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
