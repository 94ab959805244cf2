//! Room state reconciliation.
//!
//! [`RoomState`] is the fold target for protocol events. It maps member ids to
//! [`Member`]s and holds the room-level name and topic.
//!
//! # Invariants
//!
//! - Every member id referenced by an applied membership event has exactly
//!   one entry. Entries are created on first reference and never removed;
//!   leaving or being banned only changes the membership.
//! - Applying the same event twice in succession leaves the state as after
//!   the first application, and the second application returns
//!   [`Change::None`].
//! - [`RoomState::member_name`] is a pure function of the current state.

use std::collections::{HashMap, hash_map::Entry};

use parlor_proto::{Event, EventKind, MemberContent, Membership};

use crate::{
    Member,
    change::{Change, MemberChange},
};

/// Current state of one room.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomState {
    members: HashMap<String, Member>,
    name: Option<String>,
    topic: Option<String>,
}

impl RoomState {
    /// Create an empty room state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one event and return what it changed.
    ///
    /// Never fails. Message events and unknown event types leave the state
    /// untouched and return [`Change::None`].
    pub fn apply(&mut self, event: &Event) -> Change {
        let change = match &event.kind {
            EventKind::Member(content) => self.apply_member(content),
            EventKind::Name { name } => {
                Self::replace(&mut self.name, name).map_or(Change::None, |old| Change::RoomName { old })
            },
            EventKind::Topic { topic } => {
                Self::replace(&mut self.topic, topic).map_or(Change::None, |old| Change::Topic { old })
            },
            EventKind::Message(_) | EventKind::Other { .. } => Change::None,
        };

        if !change.is_none() {
            tracing::debug!(event_type = event.event_type(), ?change, "applied state change");
        }
        change
    }

    /// All members, in unspecified order.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    /// Members that are joined or invited, in unspecified order.
    pub fn active_members(&self) -> impl Iterator<Item = &Member> {
        self.members.values().filter(|member| member.is_active())
    }

    /// Look up a member by id.
    pub fn member(&self, id: &str) -> Option<&Member> {
        self.members.get(id)
    }

    /// Number of members ever referenced, active or not.
    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// Room name. `None` if unset or cleared.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Room topic. `None` if unset or cleared.
    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }

    /// Label to show for `member`.
    ///
    /// Labels of active members are unique. Without a display name the label
    /// is the id. With one, it is the display name verbatim unless that
    /// equals another active member's label, in which case it becomes
    /// `"{display_name} ({id})"`. Clashes are resolved in rounds: in each
    /// group of equal labels the least qualified members step up, until no
    /// two labels are equal. Inactive members never cause a clash, but an
    /// inactive member queried directly resolves by the same rule.
    pub fn member_name(&self, member: &Member) -> String {
        self.label(member.id(), member.display_name())
    }

    /// Label to show for the member with `id`. `None` if never referenced.
    pub fn member_name_by_id(&self, id: &str) -> Option<String> {
        self.members.get(id).map(|member| self.member_name(member))
    }

    /// Label `id` would have with `display_name`, against the active members.
    fn label(&self, id: &str, display_name: Option<&str>) -> String {
        if display_name.is_none() {
            return id.to_owned();
        }

        let mut candidates = vec![(id, display_name)];
        candidates.extend(
            self.active_members()
                .filter(|other| other.id() != id)
                .map(|other| (other.id(), other.display_name())),
        );
        resolve_labels(&candidates).into_iter().next().unwrap_or_else(|| id.to_owned())
    }

    /// Labels of all active members, keyed by id.
    fn active_labels(&self) -> HashMap<String, String> {
        let candidates: Vec<(&str, Option<&str>)> =
            self.active_members().map(|member| (member.id(), member.display_name())).collect();
        let labels = resolve_labels(&candidates);
        candidates.iter().map(|(id, _)| (*id).to_owned()).zip(labels).collect()
    }

    fn apply_member(&mut self, content: &MemberContent) -> Change {
        let membership = Membership::parse(&content.membership);
        if membership.is_none() {
            tracing::warn!(
                target_id = %content.target,
                token = %content.membership,
                "unrecognized membership token, ignoring membership effect"
            );
        }

        let mut bystanders = self.active_labels();
        bystanders.remove(&content.target);

        let member = match self.members.entry(content.target.clone()) {
            Entry::Occupied(slot) => slot.into_mut(),
            Entry::Vacant(slot) => match Member::new(content.target.clone()) {
                Ok(member) => slot.insert(member),
                Err(error) => {
                    tracing::warn!(%error, "membership event without target, ignoring");
                    return Change::None;
                },
            },
        };

        let old_membership = member.membership();
        let old_avatar = member.avatar_url().map(str::to_owned);
        let old_display_name = member.display_name().map(str::to_owned);

        let new_display_name = match &content.display_name {
            Some(name) if name.is_empty() => None,
            Some(name) => Some(name.clone()),
            None => old_display_name.clone(),
        };
        let new_avatar = content.avatar_url.clone().or_else(|| old_avatar.clone());

        if let Some(membership) = membership {
            member.set_membership(membership);
        }
        member.set_display_name(new_display_name.clone());
        member.set_avatar_url(new_avatar.clone());
        let new_membership = member.membership();

        // The target's own label does not depend on its membership, so its
        // old label can be resolved against the updated roster
        let old_name = self.label(&content.target, old_display_name.as_deref());
        let new_name = self.label(&content.target, new_display_name.as_deref());

        let after = self.active_labels();
        let mut renamed: Vec<(String, String)> = bystanders
            .into_iter()
            .filter(|(id, before)| after.get(id).is_some_and(|label| label != before))
            .collect();
        renamed.sort();

        let change = MemberChange {
            member_id: content.target.clone(),
            old_membership: (new_membership != old_membership).then_some(old_membership),
            old_name: (new_name != old_name).then_some(old_name),
            old_avatar: (new_avatar != old_avatar).then_some(old_avatar),
            renamed,
        };

        if change.old_membership.is_none()
            && change.old_name.is_none()
            && change.old_avatar.is_none()
            && change.renamed.is_empty()
        {
            Change::None
        } else {
            Change::Member(change)
        }
    }

    /// Overwrite a room-level attribute. Empty means cleared.
    ///
    /// Returns the old value if the attribute changed.
    fn replace(slot: &mut Option<String>, value: &str) -> Option<Option<String>> {
        let new = (!value.is_empty()).then(|| value.to_owned());
        if *slot == new { None } else { Some(std::mem::replace(slot, new)) }
    }
}

/// How much of a member's identity a label spells out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Qualifier {
    Name,
    NameAndId,
    Id,
}

impl Qualifier {
    fn next(self) -> Self {
        match self {
            Self::Name => Self::NameAndId,
            Self::NameAndId | Self::Id => Self::Id,
        }
    }

    fn render(self, id: &str, display_name: Option<&str>) -> String {
        match (self, display_name) {
            (Self::Name, Some(name)) => name.to_owned(),
            (Self::NameAndId, Some(name)) => format!("{name} ({id})"),
            _ => id.to_owned(),
        }
    }
}

/// Unique labels for `(id, display_name)` pairs with distinct ids, in input
/// order.
///
/// Bare ids never clash with each other, so escalating every clashing member
/// towards [`Qualifier::Id`] always terminates with unique labels.
fn resolve_labels(candidates: &[(&str, Option<&str>)]) -> Vec<String> {
    let mut qualifiers: Vec<Qualifier> = candidates
        .iter()
        .map(|(_, name)| if name.is_some() { Qualifier::Name } else { Qualifier::Id })
        .collect();

    loop {
        let labels: Vec<String> = candidates
            .iter()
            .zip(&qualifiers)
            .map(|((id, name), qualifier)| qualifier.render(id, *name))
            .collect();

        let escalate: Vec<usize> = {
            let mut groups: HashMap<&str, Vec<usize>> = HashMap::new();
            for (index, label) in labels.iter().enumerate() {
                groups.entry(label.as_str()).or_default().push(index);
            }

            let mut escalate = Vec::new();
            for group in groups.values().filter(|group| group.len() > 1) {
                let Some(lowest) = group.iter().map(|&index| qualifiers[index]).min() else {
                    continue;
                };
                escalate.extend(
                    group
                        .iter()
                        .copied()
                        .filter(|&index| qualifiers[index] == lowest && lowest != Qualifier::Id),
                );
            }
            escalate
        };

        if escalate.is_empty() {
            return labels;
        }
        for index in escalate {
            qualifiers[index] = qualifiers[index].next();
        }
    }
}
