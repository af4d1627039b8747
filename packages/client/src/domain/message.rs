//! Chat messages as rendered by the UI.

/// Sender name the backend uses for its own notices.
pub const SYSTEM_SENDER: &str = "system";

/// Unix timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn new(millis: i64) -> Self {
        Self(millis)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

/// A single chat message, immutable once received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: String,
    pub text: String,
    pub timestamp: Option<Timestamp>,
}

impl ChatMessage {
    pub fn new(
        sender: impl Into<String>,
        text: impl Into<String>,
        timestamp: Option<Timestamp>,
    ) -> Self {
        Self {
            sender: sender.into(),
            text: text.into(),
            timestamp,
        }
    }

    /// Whether this is a backend notice (rendered without sender/time header).
    pub fn is_system(&self) -> bool {
        self.sender == SYSTEM_SENDER
    }
}
