//! Event batches.

use serde_json::Value;

use crate::{
    Event,
    errors::{ProtoError, Result},
};

/// A contiguous, ordered group of events delivered together.
///
/// `prev_batch` is the pagination token marking the boundary to the next
/// older batch. Passing it back to the server retrieves the history that
/// precedes `events`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    /// Token for paginating backwards from this batch. `None` at the start
    /// of the room's history.
    pub prev_batch: Option<String>,
    /// Events in delivery order.
    pub events: Vec<Event>,
}

impl Batch {
    /// Create a batch.
    pub fn new(prev_batch: Option<String>, events: Vec<Event>) -> Self {
        Self { prev_batch, events }
    }

    /// Number of events in the batch.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True if the batch carries no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Decode a sync timeline object: `{"prev_batch": "...", "events": [...]}`.
    ///
    /// Both fields are optional. Each element of `events` is decoded with
    /// [`Event::from_json`], so a malformed element becomes an unknown event
    /// rather than failing the batch.
    ///
    /// # Errors
    ///
    /// - `ProtoError::NotAnObject` if `value` is not an object
    pub fn from_json(value: &Value) -> Result<Self> {
        let Some(object) = value.as_object() else {
            return Err(ProtoError::not_an_object(value));
        };

        let prev_batch = object.get("prev_batch").and_then(Value::as_str).map(str::to_owned);
        let events = object
            .get("events")
            .and_then(Value::as_array)
            .map(|events| events.iter().map(Event::from_json).collect())
            .unwrap_or_default();

        Ok(Self { prev_batch, events })
    }

    /// Decode a sync timeline object from JSON text.
    ///
    /// # Errors
    ///
    /// - `ProtoError::Json` if the text is not JSON
    /// - `ProtoError::NotAnObject` if the top-level value is not an object
    pub fn decode(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_json(&value)
    }
}
