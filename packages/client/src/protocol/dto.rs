//! Wire DTOs for the WebSocket protocol.
//!
//! Every frame is a JSON object whose `type` field names the kind.

use serde::{Deserialize, Serialize};

/// Frames the client sends to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutboundFrame {
    /// Sent once, right after the connection opens
    Init {
        user: String,
        room: String,
        host: String,
        port: u16,
    },
    /// A chat line typed by the user
    Message { text: String },
    /// Liveness signal
    Ping,
}

/// Frames the backend sends to the client.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InboundFrame {
    /// The join handshake succeeded
    Joined {
        #[serde(default)]
        user: Option<String>,
        #[serde(default)]
        room: Option<String>,
    },
    /// Prior messages of the room, oldest first
    History {
        #[serde(default)]
        messages: Vec<MessageRecord>,
    },
    /// A single live message
    Message(MessageRecord),
    /// Backend-reported failure
    Error {
        #[serde(default)]
        message: String,
    },
    /// Reply to `ping`
    Pong,
    /// Any kind this client does not know about
    #[serde(other)]
    Unrecognized,
}

/// A chat message as carried by `history` and `message` frames.
///
/// The bridge also sends a `room` field which is ignored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MessageRecord {
    #[serde(default)]
    pub sender: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<WireTimestamp>,
}

/// A serialized instant: epoch milliseconds or an RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireTimestamp {
    Millis(i64),
    Fractional(f64),
    Text(String),
}
