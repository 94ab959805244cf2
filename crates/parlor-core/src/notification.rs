//! Change notifications.
//!
//! [`crate::Room`] turns each [`crate::Change`] into typed notifications and
//! hands them to a [`RoomObserver`] synchronously, in event order.

use parlor_proto::{Event, EventKind, Membership};

use crate::{Change, Direction, RoomState};

/// A change to a room that an observer should reflect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// A member's membership changed.
    MembershipChanged {
        /// Member whose membership changed.
        member_id: String,
        /// Membership before the event.
        old: Membership,
        /// Resolved name before the event.
        old_name: String,
    },

    /// A member's resolved name changed, either from their own event or
    /// because another member's display name started or stopped colliding.
    MemberNameChanged {
        /// Member whose name changed.
        member_id: String,
        /// Resolved name before the event.
        old_name: String,
    },

    /// A member's avatar changed.
    AvatarChanged {
        /// Member whose avatar changed.
        member_id: String,
        /// Avatar before the event.
        old: Option<String>,
    },

    /// The room topic changed.
    TopicChanged {
        /// Topic before the event.
        old: Option<String>,
    },

    /// The room name changed.
    RoomNameChanged {
        /// Name before the event.
        old: Option<String>,
    },

    /// A message arrived.
    Message(Event),

    /// A batch boundary. Sent for every batch, with or without a token.
    PrevBatch {
        /// Token to paginate backwards from this point. `None` if the batch
        /// carried none.
        token: Option<String>,
        /// End of the history the batch was added to.
        direction: Direction,
    },
}

impl Notification {
    /// Notifications for `change`, the result of applying `event` to `state`.
    ///
    /// `state` must already include the change. A non-empty change yields one
    /// primary notification: membership if it changed, else resolved name,
    /// else avatar, or the room-level change. Collateral collision renames
    /// follow as [`Notification::MemberNameChanged`], ordered by member id.
    /// Message events yield [`Notification::Message`]; everything else
    /// yields nothing.
    pub fn from_change(state: &RoomState, event: &Event, change: Change) -> Vec<Self> {
        match change {
            Change::None => match &event.kind {
                EventKind::Message(_) => vec![Self::Message(event.clone())],
                _ => vec![],
            },
            Change::RoomName { old } => vec![Self::RoomNameChanged { old }],
            Change::Topic { old } => vec![Self::TopicChanged { old }],
            Change::Member(change) => {
                let primary = if let Some(old) = change.old_membership {
                    // Unchanged name: the current one is also the old one
                    let old_name = change.old_name.unwrap_or_else(|| {
                        state.member_name_by_id(&change.member_id).unwrap_or_default()
                    });
                    Some(Self::MembershipChanged { member_id: change.member_id.clone(), old, old_name })
                } else if let Some(old_name) = change.old_name {
                    Some(Self::MemberNameChanged { member_id: change.member_id.clone(), old_name })
                } else {
                    change
                        .old_avatar
                        .map(|old| Self::AvatarChanged { member_id: change.member_id.clone(), old })
                };

                primary
                    .into_iter()
                    .chain(
                        change
                            .renamed
                            .into_iter()
                            .map(|(member_id, old_name)| Self::MemberNameChanged { member_id, old_name }),
                    )
                    .collect()
            },
        }
    }

    /// Member this notification is about, if any.
    pub fn member_id(&self) -> Option<&str> {
        match self {
            Self::MembershipChanged { member_id, .. }
            | Self::MemberNameChanged { member_id, .. }
            | Self::AvatarChanged { member_id, .. } => Some(member_id.as_str()),
            Self::TopicChanged { .. }
            | Self::RoomNameChanged { .. }
            | Self::Message(_)
            | Self::PrevBatch { .. } => None,
        }
    }
}

/// Receives notifications from [`crate::Room::ingest_batch`].
///
/// `state` is the live state as of the notification: for change
/// notifications it already includes the change. Observers cannot reach the
/// room mutably while being notified, so re-entrant ingestion is ruled out.
pub trait RoomObserver {
    /// Handle one notification.
    fn notify(&mut self, state: &RoomState, notification: &Notification);
}

/// Collects notifications for later inspection.
impl RoomObserver for Vec<Notification> {
    fn notify(&mut self, _state: &RoomState, notification: &Notification) {
        self.push(notification.clone());
    }
}

/// Discards notifications.
impl RoomObserver for () {
    fn notify(&mut self, _state: &RoomState, _notification: &Notification) {}
}
