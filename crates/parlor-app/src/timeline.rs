//! Rendered room timeline.
//!
//! A [`Timeline`] is built by replaying a room's buffered history, so each
//! message is attributed with the sender's name as it was when the message
//! was sent, and is then extended with live notifications.

use std::fmt;

use parlor_core::{
    Direction, Event, EventKind, Membership, Notification, ReplayStep, Room, RoomState,
};

/// One rendered line of the timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimelineItem {
    /// Start of a batch. The token paginates backwards from here.
    BatchBoundary {
        /// Backward pagination token, if the batch carried one.
        token: Option<String>,
        /// True for the oldest batch the timeline holds. Without a token it
        /// marks the start of the room.
        oldest: bool,
    },

    /// A chat message.
    Message {
        /// Server-assigned event id, if known.
        event_id: Option<String>,
        /// Member id of the sender.
        sender_id: String,
        /// Sender's resolved name when the message was sent.
        sender_name: String,
        /// Message body.
        body: String,
    },

    /// A state change rendered as text.
    Notice {
        /// Human-readable description.
        text: String,
    },
}

impl fmt::Display for TimelineItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BatchBoundary { token: Some(token), .. } => write!(f, "--- {token} ---"),
            Self::BatchBoundary { token: None, oldest: true } => f.write_str("--- start of room ---"),
            Self::BatchBoundary { token: None, oldest: false } => f.write_str("---"),
            Self::Message { sender_name, body, .. } => write!(f, "<{sender_name}> {body}"),
            Self::Notice { text } => write!(f, "* {text}"),
        }
    }
}

/// Ordered timeline of one room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Timeline {
    items: Vec<TimelineItem>,
}

impl Timeline {
    /// Create an empty timeline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Render the whole buffered history of `room`, backfill included.
    pub fn from_room(room: &Room) -> Self {
        let mut timeline = Self::new();
        room.replay(|state, step| match step {
            ReplayStep::Batch(batch) => timeline.push_boundary(batch.prev_batch.clone()),
            ReplayStep::Event { event, change } => {
                for notification in Notification::from_change(state, event, change) {
                    timeline.push_notification(state, &notification);
                }
            },
        });
        timeline
    }

    /// Extend with a live notification. `state` must already include its
    /// change.
    ///
    /// Backfill boundaries are skipped: older batches only show up after
    /// rebuilding with [`Timeline::from_room`].
    pub fn apply(&mut self, state: &RoomState, notification: &Notification) {
        match notification {
            Notification::PrevBatch { token, direction: Direction::Forward } => {
                self.push_boundary(token.clone());
            },
            Notification::PrevBatch { direction: Direction::Backward, .. } => {},
            _ => self.push_notification(state, notification),
        }
    }

    /// All items, oldest first.
    pub fn items(&self) -> &[TimelineItem] {
        &self.items
    }

    /// Message items only, oldest first.
    pub fn messages(&self) -> impl Iterator<Item = &TimelineItem> {
        self.items.iter().filter(|item| matches!(item, TimelineItem::Message { .. }))
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True if there are no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn push_boundary(&mut self, token: Option<String>) {
        let oldest = self.items.is_empty();
        self.items.push(TimelineItem::BatchBoundary { token, oldest });
    }

    fn push_notification(&mut self, state: &RoomState, notification: &Notification) {
        let item = match notification {
            Notification::Message(event) => Self::message_item(state, event),
            Notification::MembershipChanged { member_id, old, .. } => {
                let Some(member) = state.member(member_id) else {
                    return;
                };
                let name = state.member_name(member);
                let text = match (*old, member.membership()) {
                    (Membership::Invite, Membership::Leave) => {
                        format!("{name} declined the invitation")
                    },
                    (_, Membership::Join) => format!("{name} joined"),
                    (_, Membership::Invite) => format!("{name} was invited"),
                    (_, Membership::Leave) => format!("{name} left"),
                    (_, Membership::Ban) => format!("{name} was banned"),
                };
                Some(TimelineItem::Notice { text })
            },
            Notification::TopicChanged { .. } => Some(TimelineItem::Notice {
                text: state
                    .topic()
                    .map_or_else(|| "topic cleared".to_owned(), |topic| format!("topic is now {topic:?}")),
            }),
            Notification::RoomNameChanged { .. } => Some(TimelineItem::Notice {
                text: state
                    .name()
                    .map_or_else(|| "room name cleared".to_owned(), |name| format!("room is now called {name:?}")),
            }),
            // Display names are shown on each message; collision renames are
            // not worth a line
            Notification::MemberNameChanged { .. }
            | Notification::AvatarChanged { .. }
            | Notification::PrevBatch { .. } => None,
        };

        if let Some(item) = item {
            self.items.push(item);
        }
    }

    fn message_item(state: &RoomState, event: &Event) -> Option<TimelineItem> {
        let EventKind::Message(content) = &event.kind else {
            return None;
        };
        Some(TimelineItem::Message {
            event_id: event.event_id.clone(),
            sender_id: event.sender.clone(),
            sender_name: state.member_name_by_id(&event.sender).unwrap_or_else(|| event.sender.clone()),
            body: content.body.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use parlor_core::{Batch, RoomObserver};

    use super::*;

    fn join(id: &str, name: &str) -> Event {
        Event::member(id, "join").with_display_name(name)
    }

    fn rendered(timeline: &Timeline) -> Vec<String> {
        timeline.items().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn replay_attributes_with_historical_names() {
        let mut room = Room::new("!r");
        room.ingest_batch(
            Batch::new(Some("t2".into()), vec![
                join("@a", "Sam"),
                Event::message("@a", "hello"),
                join("@a", "Samuel"),
                Event::message("@a", "renamed"),
                Event::message("@stranger", "who?"),
            ]),
            Direction::Forward,
            &mut (),
        );

        let timeline = Timeline::from_room(&room);
        assert_eq!(rendered(&timeline), vec![
            "--- t2 ---",
            "* Sam joined",
            "<Sam> hello",
            "<Samuel> renamed",
            "<@stranger> who?",
        ]);
        assert_eq!(timeline.messages().count(), 3);
    }

    #[test]
    fn backfill_renders_first() {
        let mut room = Room::new("!r");
        room.ingest_batch(
            Batch::new(Some("t2".into()), vec![Event::message("@a", "live")]),
            Direction::Forward,
            &mut (),
        );
        room.ingest_batch(
            Batch::new(None, vec![join("@a", "Sam"), Event::topic("@a", "old")]),
            Direction::Backward,
            &mut (),
        );

        let timeline = Timeline::from_room(&room);
        assert_eq!(rendered(&timeline), vec![
            "--- start of room ---",
            "* Sam joined",
            "* topic is now \"old\"",
            "--- t2 ---",
            "<Sam> live",
        ]);
    }

    struct Follow<'a>(&'a mut Timeline);

    impl RoomObserver for Follow<'_> {
        fn notify(&mut self, state: &RoomState, notification: &Notification) {
            self.0.apply(state, notification);
        }
    }

    #[test]
    fn only_the_oldest_tokenless_batch_starts_the_room() {
        let mut room = Room::new("!r");
        let mut live = Timeline::new();
        for body in ["one", "two"] {
            room.ingest_batch(
                Batch::new(None, vec![Event::message("@a", body)]),
                Direction::Forward,
                &mut Follow(&mut live),
            );
        }

        let fresh = Timeline::from_room(&room);
        assert_eq!(rendered(&fresh), vec!["--- start of room ---", "<@a> one", "---", "<@a> two"]);
        assert_eq!(live, fresh);
    }

    #[test]
    fn backfill_demotes_previous_start() {
        let mut room = Room::new("!r");
        room.ingest_batch(Batch::new(None, vec![Event::message("@a", "live")]), Direction::Forward, &mut ());
        room.ingest_batch(
            Batch::new(Some("t0".into()), vec![Event::message("@a", "old")]),
            Direction::Backward,
            &mut (),
        );

        assert_eq!(rendered(&Timeline::from_room(&room)), vec![
            "--- t0 ---",
            "<@a> old",
            "---",
            "<@a> live",
        ]);
    }

    #[test]
    fn live_notifications_extend_timeline() {
        let mut room = Room::new("!r");
        let mut timeline = Timeline::new();
        room.ingest_batch(
            Batch::new(Some("t9".into()), vec![
                Event::member("@a", "invite"),
                Event::member("@a", "leave"),
                Event::member("@b", "join"),
                Event::member("@b", "ban"),
                Event::room_name("@b", "Lobby"),
                Event::room_name("@b", ""),
                Event::topic("@b", ""),
            ]),
            Direction::Forward,
            &mut Follow(&mut timeline),
        );

        assert_eq!(rendered(&timeline), vec![
            "--- t9 ---",
            "* @a was invited",
            "* @a declined the invitation",
            "* @b joined",
            "* @b was banned",
            "* room is now called \"Lobby\"",
            "* room name cleared",
        ]);
    }
}
