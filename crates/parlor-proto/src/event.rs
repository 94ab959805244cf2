//! Protocol events.
//!
//! An [`Event`] is an envelope (id, sender, timestamp) around an
//! [`EventKind`], the tagged per-type payload. The set of kinds is closed on
//! the Rust side: every wire type the engine does not understand becomes
//! [`EventKind::Other`], so adding protocol types upstream degrades to a no-op
//! instead of a decode failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{ProtoError, Result};

/// Wire type of membership events.
pub const TYPE_MEMBER: &str = "m.room.member";
/// Wire type of room name events.
pub const TYPE_NAME: &str = "m.room.name";
/// Wire type of room topic events.
pub const TYPE_TOPIC: &str = "m.room.topic";
/// Wire type of message events.
pub const TYPE_MESSAGE: &str = "m.room.message";

/// A protocol event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Server-assigned event id. `None` for locally constructed events.
    pub event_id: Option<String>,
    /// Member id of the sender.
    pub sender: String,
    /// Origin server timestamp in Unix milliseconds.
    pub origin_server_ts: Option<u64>,
    /// Type-specific payload.
    pub kind: EventKind,
}

/// Type-specific event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    /// Membership change of one member.
    Member(MemberContent),

    /// Room name change. Empty means cleared.
    Name {
        /// New room name.
        name: String,
    },

    /// Room topic change. Empty means cleared.
    Topic {
        /// New room topic.
        topic: String,
    },

    /// Chat message.
    Message(MessageContent),

    /// Any event type the engine does not interpret.
    Other {
        /// Wire type of the event, or empty if it was malformed.
        event_type: String,
    },
}

/// Payload of a membership event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberContent {
    /// Member id the event applies to (`state_key` on the wire).
    pub target: String,
    /// Raw membership token. Parsed with [`crate::Membership::parse`].
    pub membership: String,
    /// New display name. `None` leaves the current name unchanged.
    pub display_name: Option<String>,
    /// New avatar URL. `None` leaves the current avatar unchanged.
    pub avatar_url: Option<String>,
}

/// Payload of a message event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageContent {
    /// Message type, e.g. `m.text`.
    pub msgtype: String,
    /// Plain text body.
    pub body: String,
}

impl MessageContent {
    /// Plain text message.
    pub fn text(body: impl Into<String>) -> Self {
        Self { msgtype: "m.text".to_owned(), body: body.into() }
    }
}

impl Event {
    /// Create an event with the given sender and payload.
    pub fn new(sender: impl Into<String>, kind: EventKind) -> Self {
        Self { event_id: None, sender: sender.into(), origin_server_ts: None, kind }
    }

    /// Membership event sent by the target itself.
    pub fn member(target: impl Into<String>, membership: impl Into<String>) -> Self {
        let target = target.into();
        Self::new(
            target.clone(),
            EventKind::Member(MemberContent {
                target,
                membership: membership.into(),
                display_name: None,
                avatar_url: None,
            }),
        )
    }

    /// Room name event.
    pub fn room_name(sender: impl Into<String>, name: impl Into<String>) -> Self {
        Self::new(sender, EventKind::Name { name: name.into() })
    }

    /// Room topic event.
    pub fn topic(sender: impl Into<String>, topic: impl Into<String>) -> Self {
        Self::new(sender, EventKind::Topic { topic: topic.into() })
    }

    /// Plain text message event.
    pub fn message(sender: impl Into<String>, body: impl Into<String>) -> Self {
        Self::new(sender, EventKind::Message(MessageContent::text(body)))
    }

    /// Event of a type the engine does not interpret.
    pub fn other(sender: impl Into<String>, event_type: impl Into<String>) -> Self {
        Self::new(sender, EventKind::Other { event_type: event_type.into() })
    }

    /// Set the display name carried by a membership event.
    ///
    /// No effect on other kinds.
    #[must_use]
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        if let EventKind::Member(content) = &mut self.kind {
            content.display_name = Some(display_name.into());
        }
        self
    }

    /// Set the avatar URL carried by a membership event.
    ///
    /// No effect on other kinds.
    #[must_use]
    pub fn with_avatar_url(mut self, avatar_url: impl Into<String>) -> Self {
        if let EventKind::Member(content) = &mut self.kind {
            content.avatar_url = Some(avatar_url.into());
        }
        self
    }

    /// Override the sender.
    #[must_use]
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = sender.into();
        self
    }

    /// Set the server-assigned event id.
    #[must_use]
    pub fn with_event_id(mut self, event_id: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self
    }

    /// Wire type string of this event.
    pub fn event_type(&self) -> &str {
        match &self.kind {
            EventKind::Member(_) => TYPE_MEMBER,
            EventKind::Name { .. } => TYPE_NAME,
            EventKind::Topic { .. } => TYPE_TOPIC,
            EventKind::Message(_) => TYPE_MESSAGE,
            EventKind::Other { event_type } => event_type,
        }
    }

    /// Decode an event from a JSON value.
    ///
    /// Never fails. Unknown types and events missing required fields decode
    /// as [`EventKind::Other`].
    pub fn from_json(value: &Value) -> Self {
        match RawEvent::deserialize(value) {
            Ok(raw) => raw.into_event(),
            Err(error) => {
                tracing::debug!(%error, "malformed event envelope, treating as unknown");
                Self::other("", "")
            },
        }
    }

    /// Decode an event from JSON text.
    ///
    /// # Errors
    ///
    /// - `ProtoError::Json` if the text is not JSON
    /// - `ProtoError::NotAnObject` if the top-level value is not an object
    pub fn decode(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(ProtoError::not_an_object(&value));
        }
        Ok(Self::from_json(&value))
    }
}

/// Envelope as it appears on the wire.
#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    event_id: Option<String>,
    #[serde(default)]
    sender: String,
    #[serde(default)]
    origin_server_ts: Option<u64>,
    #[serde(default)]
    state_key: Option<String>,
    #[serde(default)]
    content: Value,
}

#[derive(Deserialize)]
struct RawNameContent {
    #[serde(default)]
    name: String,
}

#[derive(Deserialize)]
struct RawTopicContent {
    #[serde(default)]
    topic: String,
}

impl RawEvent {
    fn into_event(self) -> Event {
        let kind = self.decode_kind().unwrap_or_else(|reason| {
            tracing::debug!(
                event_type = %self.event_type,
                event_id = ?self.event_id,
                reason,
                "undecodable event content, treating as unknown"
            );
            EventKind::Other { event_type: self.event_type.clone() }
        });

        Event {
            event_id: self.event_id,
            sender: self.sender,
            origin_server_ts: self.origin_server_ts,
            kind,
        }
    }

    fn decode_kind(&self) -> std::result::Result<EventKind, &'static str> {
        let kind = match self.event_type.as_str() {
            TYPE_MEMBER => {
                let target = self.state_key.clone().ok_or("membership event without state_key")?;
                if target.is_empty() {
                    return Err("membership event with empty state_key");
                }
                if !self.content.is_object() {
                    return Err("membership content is not an object");
                }
                EventKind::Member(MemberContent {
                    target,
                    // Missing token parses as nothing; the name/avatar still apply
                    membership: self.content_str("membership").unwrap_or_default(),
                    display_name: self.content_str("displayname"),
                    avatar_url: self.content_str("avatar_url"),
                })
            },
            TYPE_NAME => {
                let content = RawNameContent::deserialize(&self.content)
                    .map_err(|_| "name content is malformed")?;
                EventKind::Name { name: content.name }
            },
            TYPE_TOPIC => {
                let content = RawTopicContent::deserialize(&self.content)
                    .map_err(|_| "topic content is malformed")?;
                EventKind::Topic { topic: content.topic }
            },
            TYPE_MESSAGE => {
                let body = self
                    .content
                    .get("body")
                    .and_then(Value::as_str)
                    .ok_or("message content has no body")?;
                EventKind::Message(MessageContent {
                    msgtype: self.content_str("msgtype").unwrap_or_default(),
                    body: body.to_owned(),
                })
            },
            _ => EventKind::Other { event_type: self.event_type.clone() },
        };
        Ok(kind)
    }

    /// String field of the content. Absent, null and wrong-typed fields all
    /// read as `None`, so one bad field does not void the others.
    fn content_str(&self, field: &str) -> Option<String> {
        match self.content.get(field)? {
            Value::String(value) => Some(value.clone()),
            Value::Null => None,
            other => {
                tracing::debug!(
                    event_type = %self.event_type,
                    event_id = ?self.event_id,
                    field,
                    %other,
                    "ignoring content field of the wrong type"
                );
                None
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_membership_event() {
        let event = Event::from_json(&json!({
            "type": "m.room.member",
            "event_id": "$1",
            "sender": "@sam:example.org",
            "state_key": "@sam:example.org",
            "origin_server_ts": 1_700_000_000_000u64,
            "content": {
                "membership": "join",
                "displayname": "Sam",
                "avatar_url": "mxc://example.org/abc"
            }
        }));

        assert_eq!(event.event_id.as_deref(), Some("$1"));
        assert_eq!(event.origin_server_ts, Some(1_700_000_000_000));
        assert_eq!(
            event.kind,
            EventKind::Member(MemberContent {
                target: "@sam:example.org".into(),
                membership: "join".into(),
                display_name: Some("Sam".into()),
                avatar_url: Some("mxc://example.org/abc".into()),
            })
        );
    }

    #[test]
    fn membership_event_keeps_garbled_token() {
        let event = Event::from_json(&json!({
            "type": "m.room.member",
            "sender": "@a",
            "state_key": "@a",
            "content": { "membership": "JOINED", "displayname": "Alice" }
        }));

        let EventKind::Member(content) = event.kind else {
            panic!("expected membership event");
        };
        assert_eq!(content.membership, "JOINED");
        assert_eq!(content.display_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn membership_event_without_state_key_is_other() {
        let event = Event::from_json(&json!({
            "type": "m.room.member",
            "sender": "@a",
            "content": { "membership": "join" }
        }));

        assert_eq!(event.kind, EventKind::Other { event_type: "m.room.member".into() });
    }

    #[test]
    fn null_display_name_is_absent() {
        let event = Event::from_json(&json!({
            "type": "m.room.member",
            "sender": "@a",
            "state_key": "@a",
            "content": { "membership": "join", "displayname": null }
        }));

        assert!(matches!(event.kind, EventKind::Member(MemberContent { display_name: None, .. })));
    }

    #[test]
    fn wrong_typed_membership_keeps_display_name() {
        let event = Event::from_json(&json!({
            "type": "m.room.member",
            "sender": "@a",
            "state_key": "@a",
            "content": { "membership": 5, "displayname": "Sam" }
        }));

        assert_eq!(
            event.kind,
            EventKind::Member(MemberContent {
                target: "@a".into(),
                membership: String::new(),
                display_name: Some("Sam".into()),
                avatar_url: None,
            })
        );
    }

    #[test]
    fn wrong_typed_display_name_keeps_membership() {
        let event = Event::from_json(&json!({
            "type": "m.room.member",
            "sender": "@a",
            "state_key": "@a",
            "content": { "membership": "join", "displayname": 7, "avatar_url": ["mxc://a"] }
        }));

        assert_eq!(
            event.kind,
            EventKind::Member(MemberContent {
                target: "@a".into(),
                membership: "join".into(),
                display_name: None,
                avatar_url: None,
            })
        );
    }

    #[test]
    fn membership_content_must_be_an_object() {
        let event = Event::from_json(&json!({
            "type": "m.room.member", "sender": "@a", "state_key": "@a", "content": "join"
        }));

        assert_eq!(event.kind, EventKind::Other { event_type: "m.room.member".into() });
    }

    #[test]
    fn message_with_odd_msgtype_keeps_body() {
        let event = Event::from_json(&json!({
            "type": "m.room.message", "sender": "@a", "content": { "msgtype": 1, "body": "hi" }
        }));

        assert_eq!(
            event.kind,
            EventKind::Message(MessageContent { msgtype: String::new(), body: "hi".into() })
        );
    }

    #[test]
    fn decodes_name_topic_and_message() {
        let name = Event::from_json(&json!({
            "type": "m.room.name", "sender": "@a", "state_key": "", "content": { "name": "Lobby" }
        }));
        let topic = Event::from_json(&json!({
            "type": "m.room.topic", "sender": "@a", "state_key": "", "content": { "topic": "" }
        }));
        let message = Event::from_json(&json!({
            "type": "m.room.message", "sender": "@a",
            "content": { "msgtype": "m.text", "body": "hi" }
        }));

        assert_eq!(name.kind, EventKind::Name { name: "Lobby".into() });
        assert_eq!(topic.kind, EventKind::Topic { topic: String::new() });
        assert_eq!(message.kind, EventKind::Message(MessageContent::text("hi")));
    }

    #[test]
    fn unknown_type_is_other() {
        let event = Event::from_json(&json!({
            "type": "m.room.power_levels", "sender": "@a", "state_key": "", "content": {}
        }));

        assert_eq!(event.kind, EventKind::Other { event_type: "m.room.power_levels".into() });
        assert_eq!(event.event_type(), "m.room.power_levels");
    }

    #[test]
    fn message_without_body_is_other() {
        let event = Event::from_json(&json!({
            "type": "m.room.message", "sender": "@a", "content": { "msgtype": "m.text" }
        }));

        assert_eq!(event.kind, EventKind::Other { event_type: "m.room.message".into() });
    }

    #[test]
    fn missing_type_is_other() {
        let event = Event::from_json(&json!({ "sender": "@a", "content": {} }));
        assert_eq!(event.kind, EventKind::Other { event_type: String::new() });
    }

    #[test]
    fn decode_rejects_non_objects() {
        assert!(matches!(Event::decode("[1, 2]"), Err(ProtoError::NotAnObject { found: "array" })));
        assert!(matches!(Event::decode("{"), Err(ProtoError::Json(_))));
    }

    #[test]
    fn builders_only_touch_membership_events() {
        let message = Event::message("@a", "hi").with_display_name("ignored");
        assert_eq!(message.kind, EventKind::Message(MessageContent::text("hi")));

        let member = Event::member("@a", "join").with_display_name("A").with_avatar_url("mxc://a");
        assert!(matches!(
            member.kind,
            EventKind::Member(MemberContent { display_name: Some(_), avatar_url: Some(_), .. })
        ));
        assert_eq!(member.sender, "@a");
    }
}
