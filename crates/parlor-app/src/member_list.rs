//! Member roster.
//!
//! [`MemberList`] holds the active (joined or invited) members of a room
//! keyed by their resolved name, in display order. It is maintained
//! incrementally from notifications: each entry is removed under the old
//! name carried by the notification and re-inserted under the name the
//! member resolves to now.
//!
//! One event can rename several members, and their notifications arrive one
//! at a time. A member may therefore briefly be listed under a name that now
//! belongs to someone else. Inserting that name displaces the stale entry,
//! and the displaced member's own rename notification completes the move.
//!
//! # Ordering
//!
//! Names sort case-insensitively with leading `@` characters ignored, so bare
//! ids sort among display names. The exact name breaks ties.

use std::collections::{BTreeMap, HashMap};

use parlor_core::{Notification, RoomState};

use crate::ViewError;

/// Display-order key for a resolved name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct SortKey {
    folded: String,
    name: String,
}

impl SortKey {
    fn new(name: &str) -> Self {
        let stripped = name.trim_start_matches('@');
        let base = if stripped.is_empty() { name } else { stripped };
        Self { folded: base.to_lowercase(), name: name.to_owned() }
    }
}

/// Active members in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberList {
    entries: BTreeMap<SortKey, String>,
    /// Name each member was last listed under, even if since displaced.
    listed: HashMap<String, String>,
}

impl MemberList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the list from the active members of `state`.
    pub fn from_state(state: &RoomState) -> Self {
        let listed: HashMap<String, String> = state
            .active_members()
            .map(|member| (member.id().to_owned(), state.member_name(member)))
            .collect();
        let entries = listed.iter().map(|(id, name)| (SortKey::new(name), id.clone())).collect();
        Self { entries, listed }
    }

    /// Reflect one notification. `state` must already include its change.
    ///
    /// # Errors
    ///
    /// - `ViewError::Desync` if the member is unknown to `state`
    /// - `ViewError::UnknownName` if the member was not listed under the old
    ///   name
    /// - `ViewError::NameTaken` if the new name is listed for another active
    ///   member that still resolves to it
    pub fn apply(&mut self, state: &RoomState, notification: &Notification) -> Result<(), ViewError> {
        match notification {
            Notification::MembershipChanged { member_id, old, old_name } => {
                let member = state
                    .member(member_id)
                    .ok_or_else(|| ViewError::Desync { member_id: member_id.clone() })?;
                let new_name = state.member_name(member);

                if old.is_active() {
                    self.remove(member_id, old_name, &new_name)?;
                }
                if member.is_active() {
                    self.insert(state, member_id, new_name)?;
                }
                Ok(())
            },
            Notification::MemberNameChanged { member_id, old_name } => {
                let member = state
                    .member(member_id)
                    .ok_or_else(|| ViewError::Desync { member_id: member_id.clone() })?;
                if !member.is_active() {
                    return Ok(());
                }

                let new_name = state.member_name(member);
                self.remove(member_id, old_name, &new_name)?;
                self.insert(state, member_id, new_name)
            },
            Notification::AvatarChanged { .. }
            | Notification::TopicChanged { .. }
            | Notification::RoomNameChanged { .. }
            | Notification::Message(_)
            | Notification::PrevBatch { .. } => Ok(()),
        }
    }

    /// `(resolved_name, member_id)` pairs in display order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(key, id)| (key.name.as_str(), id.as_str()))
    }

    /// Resolved names in display order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|key| key.name.as_str())
    }

    /// Member listed under `name`, if any.
    pub fn member_id(&self, name: &str) -> Option<&str> {
        self.entries.get(&SortKey::new(name)).map(String::as_str)
    }

    /// Number of listed members.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no members are listed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn remove(&mut self, member_id: &str, old_name: &str, new_name: &str) -> Result<(), ViewError> {
        if self.listed.get(member_id).map(String::as_str) != Some(old_name) {
            return Err(ViewError::UnknownName {
                member_id: member_id.to_owned(),
                old_name: old_name.to_owned(),
                new_name: new_name.to_owned(),
            });
        }
        self.listed.remove(member_id);

        // Already gone if another member took the name over
        let key = SortKey::new(old_name);
        if self.entries.get(&key).is_some_and(|holder| holder == member_id) {
            self.entries.remove(&key);
        }
        Ok(())
    }

    fn insert(&mut self, state: &RoomState, member_id: &str, name: String) -> Result<(), ViewError> {
        let key = SortKey::new(&name);
        if let Some(holder) = self.entries.get(&key)
            && holder != member_id
            && state
                .member(holder)
                .is_some_and(|member| member.is_active() && state.member_name(member) == name)
        {
            return Err(ViewError::NameTaken { name, member_id: member_id.to_owned(), holder: holder.clone() });
        }

        self.entries.insert(key, member_id.to_owned());
        self.listed.insert(member_id.to_owned(), name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use parlor_core::{Batch, Direction, Event, Membership, Room, RoomObserver};

    use super::*;

    fn join(id: &str, name: &str) -> Event {
        Event::member(id, "join").with_display_name(name)
    }

    /// Applies notifications to a list as they are delivered.
    struct Follow<'a> {
        list: &'a mut MemberList,
        result: Result<(), ViewError>,
    }

    impl RoomObserver for Follow<'_> {
        fn notify(&mut self, state: &RoomState, notification: &Notification) {
            if self.result.is_ok() {
                self.result = self.list.apply(state, notification);
            }
        }
    }

    fn ingest(room: &mut Room, list: &mut MemberList, events: Vec<Event>) -> Result<(), ViewError> {
        let mut follow = Follow { list, result: Ok(()) };
        room.ingest_batch(Batch::new(None, events), Direction::Forward, &mut follow);
        follow.result
    }

    #[test]
    fn sort_ignores_leading_at_and_case() {
        let mut room = Room::new("!r");
        let mut list = MemberList::new();
        ingest(&mut room, &mut list, vec![join("@z", "bob")]).unwrap();
        ingest(&mut room, &mut list, vec![Event::member("@carol", "join")]).unwrap();
        ingest(&mut room, &mut list, vec![join("@y", "Alice")]).unwrap();

        let names: Vec<_> = list.names().collect();
        assert_eq!(names, vec!["Alice", "bob", "@carol"]);
    }

    #[test]
    fn all_at_name_sorts_by_whole_name() {
        assert_eq!(SortKey::new("@@").folded, "@@");
        assert_eq!(SortKey::new("@Bo").folded, "bo");
    }

    #[test]
    fn collision_and_departure_keep_list_in_sync() {
        let mut room = Room::new("!r");
        let mut list = MemberList::new();

        ingest(&mut room, &mut list, vec![join("@a", "Sam")]).unwrap();
        ingest(&mut room, &mut list, vec![join("@b", "Sam")]).unwrap();
        assert_eq!(list.names().collect::<Vec<_>>(), vec!["Sam (@a)", "Sam (@b)"]);

        ingest(&mut room, &mut list, vec![Event::member("@b", "leave")]).unwrap();
        assert_eq!(list.entries().collect::<Vec<_>>(), vec![("Sam", "@a")]);
        assert_eq!(list, MemberList::from_state(room.state()));
    }

    #[test]
    fn invite_lists_and_ban_unlists() {
        let mut room = Room::new("!r");
        let mut list = MemberList::new();

        ingest(&mut room, &mut list, vec![Event::member("@a", "invite")]).unwrap();
        assert_eq!(list.member_id("@a"), Some("@a"));

        ingest(&mut room, &mut list, vec![Event::member("@a", "ban")]).unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn inactive_rename_is_ignored() {
        let mut room = Room::new("!r");
        let mut list = MemberList::new();

        ingest(&mut room, &mut list, vec![Event::member("@a", "leave").with_display_name("A")])
            .unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn unknown_old_name_is_an_error() {
        let mut state = RoomState::new();
        state.apply(&join("@a", "Sam"));
        let mut list = MemberList::from_state(&state);

        let result = list.apply(&state, &Notification::MemberNameChanged {
            member_id: "@a".into(),
            old_name: "Samantha".into(),
        });

        assert_eq!(
            result,
            Err(ViewError::UnknownName {
                member_id: "@a".into(),
                old_name: "Samantha".into(),
                new_name: "Sam".into(),
            })
        );
    }

    #[test]
    fn name_freed_later_in_the_same_event_is_taken_over() {
        let mut room = Room::new("!r");
        let mut list = MemberList::new();

        ingest(&mut room, &mut list, vec![join("@b", "@a")]).unwrap();
        assert_eq!(list.member_id("@a"), Some("@b"));

        // "@a" joins without a display name and claims its id, pushing "@b" aside
        ingest(&mut room, &mut list, vec![Event::member("@a", "join")]).unwrap();
        assert_eq!(list.entries().collect::<Vec<_>>(), vec![("@a", "@a"), ("@a (@b)", "@b")]);
        assert_eq!(list, MemberList::from_state(room.state()));
    }

    #[test]
    fn qualified_display_name_keeps_list_in_sync() {
        let mut room = Room::new("!r");
        let mut list = MemberList::new();

        ingest(&mut room, &mut list, vec![join("@c", "Sam (@a)")]).unwrap();
        ingest(&mut room, &mut list, vec![join("@a", "Sam"), join("@b", "Sam")]).unwrap();
        assert_eq!(list.names().collect::<Vec<_>>(), vec!["Sam (@a)", "Sam (@a) (@c)", "Sam (@b)"]);

        ingest(&mut room, &mut list, vec![Event::member("@b", "leave")]).unwrap();
        assert_eq!(list, MemberList::from_state(room.state()));
        assert_eq!(list.member_id("Sam (@a)"), Some("@c"));
    }

    #[test]
    fn genuine_conflict_is_name_taken() {
        let mut state = RoomState::new();
        state.apply(&join("@a", "Sam"));
        state.apply(&join("@b", "Bo"));
        let mut list = MemberList::from_state(&state);

        // "@a" still resolves to "Sam", so it is not a stale entry
        let result = list.insert(&state, "@b", "Sam".into());
        assert_eq!(
            result,
            Err(ViewError::NameTaken { name: "Sam".into(), member_id: "@b".into(), holder: "@a".into() })
        );
    }

    #[test]
    fn unknown_member_is_desync() {
        let state = RoomState::new();
        let mut list = MemberList::new();

        let result = list.apply(&state, &Notification::MembershipChanged {
            member_id: "@ghost".into(),
            old: Membership::Join,
            old_name: "Ghost".into(),
        });

        assert_eq!(result, Err(ViewError::Desync { member_id: "@ghost".into() }));
    }
}
