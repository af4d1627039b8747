//! The authoritative in-memory record of the current chat session.

use super::ChatMessage;

/// Current user identity, room and message counter.
///
/// `connected == true` implies `user` and `room` are both present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    user: Option<String>,
    room: Option<String>,
    connected: bool,
    message_count: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn room(&self) -> Option<&str> {
        self.room.as_deref()
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn message_count(&self) -> u64 {
        self.message_count
    }

    /// Enter a room. Clears the message counter.
    pub fn join(&mut self, user: String, room: String) {
        self.user = Some(user);
        self.room = Some(room);
        self.connected = true;
        self.message_count = 0;
    }

    /// Record an appended message and return the running count.
    ///
    /// This is the only path that increments the counter.
    pub fn append(&mut self, _message: &ChatMessage) -> u64 {
        self.message_count += 1;
        self.message_count
    }

    /// Return to the initial, disconnected value.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_initial(&self) -> bool {
        *self == Self::default()
    }
}
