//! Outgoing transport seam.
//!
//! The engine never performs I/O. [`crate::Room::send_message`] builds an
//! [`OutgoingMessage`] and hands it to a [`Transport`] supplied by the caller.
//! A sent message becomes visible in the room only when the server echoes it
//! back through [`crate::Room::ingest_batch`].

use std::convert::Infallible;

use parlor_proto::OutgoingMessage;

/// Delivers outgoing messages to the server.
pub trait Transport {
    /// Transport-specific error type.
    type Error: std::error::Error + Send + 'static;

    /// Queue or send `message`.
    ///
    /// # Errors
    ///
    /// Returns an error if the message could not be handed off.
    fn send(&mut self, message: OutgoingMessage) -> Result<(), Self::Error>;
}

/// In-memory transport that records every message.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    sent: Vec<OutgoingMessage>,
}

impl MemoryTransport {
    /// Create an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Messages sent so far, oldest first.
    pub fn sent(&self) -> &[OutgoingMessage] {
        &self.sent
    }

    /// Take the messages sent so far.
    pub fn take_sent(&mut self) -> Vec<OutgoingMessage> {
        std::mem::take(&mut self.sent)
    }
}

impl Transport for MemoryTransport {
    type Error = Infallible;

    fn send(&mut self, message: OutgoingMessage) -> Result<(), Self::Error> {
        self.sent.push(message);
        Ok(())
    }
}
