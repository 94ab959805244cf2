//! Room view model.
//!
//! [`RoomView`] is what a frontend renders for one room: the member list, the
//! timeline, the title and the topic. It follows the room as a
//! [`RoomObserver`], so the room drives it synchronously from
//! [`Room::ingest_batch`](parlor_core::Room::ingest_batch).
//!
//! Once the member list reports a [`ViewError`] the view stops following
//! member changes. The error stays in [`RoomView::error`] for the caller to
//! act on.

use parlor_core::{Notification, Room, RoomObserver, RoomState};

use crate::{MemberList, Timeline, ViewError};

/// Render-ready picture of one room.
#[derive(Debug, Clone)]
pub struct RoomView {
    room_id: String,
    members: MemberList,
    timeline: Timeline,
    name: Option<String>,
    topic: Option<String>,
    error: Option<ViewError>,
}

impl RoomView {
    /// Build a view of everything `room` currently holds.
    pub fn new(room: &Room) -> Self {
        let state = room.state();
        Self {
            room_id: room.room_id().to_owned(),
            members: MemberList::from_state(state),
            timeline: Timeline::from_room(room),
            name: state.name().map(str::to_owned),
            topic: state.topic().map(str::to_owned),
            error: None,
        }
    }

    /// Room this view follows.
    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Active members in display order.
    pub fn members(&self) -> &MemberList {
        &self.members
    }

    /// Rendered timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Room name if set, otherwise the room id.
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.room_id)
    }

    /// Current topic.
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// First consistency error, if any. The member list is frozen after it.
    pub fn error(&self) -> Option<&ViewError> {
        self.error.as_ref()
    }

    /// Re-render the timeline from the room's history.
    ///
    /// Backfill only announces a new pagination token, so call this after
    /// ingesting older batches to show their contents.
    pub fn refresh_timeline(&mut self, room: &Room) {
        self.timeline = Timeline::from_room(room);
    }
}

impl RoomObserver for RoomView {
    fn notify(&mut self, state: &RoomState, notification: &Notification) {
        match notification {
            Notification::TopicChanged { .. } => self.topic = state.topic().map(str::to_owned),
            Notification::RoomNameChanged { .. } => self.name = state.name().map(str::to_owned),
            _ => {},
        }

        if self.error.is_none()
            && let Err(error) = self.members.apply(state, notification)
        {
            tracing::error!(room_id = %self.room_id, %error, "member list out of sync");
            self.error = Some(error);
        }

        self.timeline.apply(state, notification);
    }
}

#[cfg(test)]
mod tests {
    use parlor_core::{Batch, Direction, Event};

    use super::*;

    fn join(id: &str, name: &str) -> Event {
        Event::member(id, "join").with_display_name(name)
    }

    #[test]
    fn title_falls_back_to_room_id() {
        let mut room = Room::new("!lobby:parlor");
        let mut view = RoomView::new(&room);
        assert_eq!(view.title(), "!lobby:parlor");

        room.ingest_batch(
            Batch::new(None, vec![Event::room_name("@a", "Lobby"), Event::topic("@a", "hi")]),
            Direction::Forward,
            &mut view,
        );
        assert_eq!(view.title(), "Lobby");
        assert_eq!(view.topic(), Some("hi"));

        room.ingest_batch(
            Batch::new(None, vec![Event::room_name("@a", ""), Event::topic("@a", "")]),
            Direction::Forward,
            &mut view,
        );
        assert_eq!(view.title(), "!lobby:parlor");
        assert_eq!(view.topic(), None);
    }

    #[test]
    fn live_view_matches_fresh_view() {
        let mut room = Room::new("!r");
        let mut view = RoomView::new(&room);

        room.ingest_batch(
            Batch::new(Some("t1".into()), vec![
                join("@a", "Sam"),
                join("@b", "Sam"),
                Event::message("@b", "hi"),
                Event::member("@c", "invite"),
                Event::member("@a", "leave"),
            ]),
            Direction::Forward,
            &mut view,
        );

        assert!(view.error().is_none());
        let fresh = RoomView::new(&room);
        assert_eq!(view.members(), fresh.members());
        assert_eq!(view.timeline(), fresh.timeline());
        assert_eq!(view.members().names().collect::<Vec<_>>(), vec!["@c", "Sam"]);
    }

    #[test]
    fn display_name_equal_to_id_does_not_desync() {
        let mut room = Room::new("!r");
        let mut view = RoomView::new(&room);

        room.ingest_batch(
            Batch::new(None, vec![
                Event::member("@a", "join"),
                join("@b", "@a"),
                join("@c", "@a (@b)"),
                Event::member("@a", "leave"),
                Event::member("@a", "join"),
                Event::message("@b", "which one?"),
            ]),
            Direction::Forward,
            &mut view,
        );

        assert_eq!(view.error(), None);
        assert_eq!(view.members(), RoomView::new(&room).members());
        assert_eq!(view.members().len(), 3);
        let last = view.timeline().messages().last().map(ToString::to_string);
        assert_eq!(last.as_deref(), Some("<@a (@b)> which one?"));
    }

    #[test]
    fn refresh_shows_backfill() {
        let mut room = Room::new("!r");
        room.ingest_batch(
            Batch::new(Some("t2".into()), vec![Event::message("@a", "now")]),
            Direction::Forward,
            &mut (),
        );
        let mut view = RoomView::new(&room);
        let before = view.timeline().len();

        room.ingest_batch(
            Batch::new(Some("t1".into()), vec![Event::message("@a", "earlier")]),
            Direction::Backward,
            &mut view,
        );
        assert_eq!(view.timeline().len(), before);

        view.refresh_timeline(&room);
        assert_eq!(view.timeline().messages().count(), 2);
    }

    #[test]
    fn desync_is_latched() {
        let mut room = Room::new("!r");
        room.ingest_batch(Batch::new(None, vec![join("@a", "Sam")]), Direction::Forward, &mut ());
        let mut view = RoomView::new(&room);

        // Notification from a room the view never saw
        let other = RoomState::new();
        view.notify(&other, &Notification::MemberNameChanged {
            member_id: "@ghost".into(),
            old_name: "Ghost".into(),
        });
        assert_eq!(view.error(), Some(&ViewError::Desync { member_id: "@ghost".into() }));

        room.ingest_batch(Batch::new(None, vec![join("@b", "Bo")]), Direction::Forward, &mut view);
        assert_eq!(view.members().len(), 1);
        assert_eq!(view.error(), Some(&ViewError::Desync { member_id: "@ghost".into() }));
    }
}
