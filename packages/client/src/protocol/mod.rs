//! Protocol codec: JSON text frames exchanged with the backend.

pub mod conversion;
pub mod dto;

use serde_json::Value;

use crate::error::ProtocolError;

pub use dto::{InboundFrame, MessageRecord, OutboundFrame, WireTimestamp};

/// Serialize an outbound frame to its wire text.
pub fn encode(frame: &OutboundFrame) -> Result<String, ProtocolError> {
    serde_json::to_string(frame).map_err(|e| ProtocolError::Encode(e.to_string()))
}

/// Parse an inbound wire text into a frame.
///
/// Unknown `type` values decode to [`InboundFrame::Unrecognized`]. The payload
/// must be a JSON object with a string `type`; anything else, or a known kind
/// whose fields have the wrong shape, is a `MalformedFrame`.
pub fn decode(text: &str) -> Result<InboundFrame, ProtocolError> {
    let value: Value =
        serde_json::from_str(text).map_err(|e| ProtocolError::MalformedFrame(e.to_string()))?;

    let kind = match value.get("type") {
        Some(Value::String(kind)) => kind.clone(),
        Some(_) => {
            return Err(ProtocolError::MalformedFrame(
                "`type` must be a string".to_string(),
            ));
        }
        None => {
            return Err(ProtocolError::MalformedFrame(
                "missing `type` discriminator".to_string(),
            ));
        }
    };

    let frame = serde_json::from_value::<InboundFrame>(value)
        .map_err(|e| ProtocolError::MalformedFrame(format!("invalid `{}` frame: {}", kind, e)))?;

    if frame == InboundFrame::Unrecognized {
        tracing::debug!("Ignoring frame of unknown type '{}'", kind);
    }

    Ok(frame)
}
