//! Outgoing message payloads.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{MessageContent, errors::Result};

/// Client-generated transaction id for an outgoing event.
///
/// Unique per room for the lifetime of a session. The server uses it to
/// deduplicate retried sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxnId(pub u64);

impl fmt::Display for TxnId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "txn{}", self.0)
    }
}

/// A message event the client wants the server to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    /// Target room.
    pub room_id: String,
    /// Transaction id for deduplication.
    pub txn_id: TxnId,
    /// Message content.
    pub content: MessageContent,
}

impl OutgoingMessage {
    /// JSON request body for the content.
    ///
    /// # Errors
    ///
    /// - `ProtoError::Json` if serialization fails
    pub fn body_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.content)?)
    }
}
