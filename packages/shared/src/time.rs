//! Time-related utilities with clock abstraction for testability.
//!
//! Timestamps are Unix epoch milliseconds, the unit the chat backend uses on
//! the wire.

use chrono::{DateTime, FixedOffset, Local, TimeZone, Utc};

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Get current Unix timestamp (milliseconds)
    fn now_millis(&self) -> i64;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_millis(&self) -> i64 {
        now_millis()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: i64,
}

impl FixedClock {
    /// Create a new fixed clock with the given timestamp
    pub fn new(fixed_time_millis: i64) -> Self {
        Self {
            fixed_time: fixed_time_millis,
        }
    }
}

impl Clock for FixedClock {
    fn now_millis(&self) -> i64 {
        self.fixed_time
    }
}

/// Get current Unix timestamp (milliseconds)
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// UTC offset of the local timezone at the current instant.
pub fn local_offset() -> FixedOffset {
    *Local::now().offset()
}

/// Parse an RFC 3339 string into Unix milliseconds.
pub fn parse_rfc3339_millis(text: &str) -> Option<i64> {
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.timestamp_millis())
}

/// Format a message timestamp relative to `now_millis`.
///
/// * less than a day old: `HH:MM`
/// * less than two days old: `Yesterday HH:MM`
/// * older: `DD/MM HH:MM`
///
/// An unrepresentable timestamp formats as an empty string.
pub fn format_message_time(timestamp_millis: i64, now_millis: i64, offset: FixedOffset) -> String {
    let Some(dt) = offset.timestamp_millis_opt(timestamp_millis).single() else {
        return String::new();
    };

    let age = now_millis.saturating_sub(timestamp_millis);
    if age < DAY_MILLIS {
        dt.format("%H:%M").to_string()
    } else if age < 2 * DAY_MILLIS {
        format!("Yesterday {}", dt.format("%H:%M"))
    } else {
        dt.format("%d/%m %H:%M").to_string()
    }
}
