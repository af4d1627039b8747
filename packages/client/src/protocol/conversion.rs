//! Conversion logic between wire DTOs and domain values.

use minichat_shared::time::parse_rfc3339_millis;

use crate::domain::{ChatMessage, Timestamp};

use super::dto::{MessageRecord, WireTimestamp};

// ========================================
// DTO → Domain
// ========================================

impl WireTimestamp {
    /// Domain timestamp, or `None` for zero and unparsable values.
    pub fn to_timestamp(&self) -> Option<Timestamp> {
        let millis = match self {
            WireTimestamp::Millis(millis) => Some(*millis),
            WireTimestamp::Fractional(value) if value.is_finite() => Some(value.round() as i64),
            WireTimestamp::Fractional(_) => None,
            WireTimestamp::Text(text) => parse_rfc3339_millis(text)
                .or_else(|| text.trim().parse::<i64>().ok()),
        }?;

        (millis != 0).then(|| Timestamp::new(millis))
    }
}

impl From<MessageRecord> for ChatMessage {
    fn from(dto: MessageRecord) -> Self {
        let timestamp = dto.timestamp.as_ref().and_then(WireTimestamp::to_timestamp);
        ChatMessage::new(dto.sender, dto.text, timestamp)
    }
}
