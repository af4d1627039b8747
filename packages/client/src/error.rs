//! Error types for the chat client.

use thiserror::Error;

/// Failures of the underlying transport.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The transport could not be established
    #[error("failed to open connection: {0}")]
    Open(String),

    /// A frame could not be written
    #[error("failed to send frame: {0}")]
    Send(String),

    /// The inbound side reported an error
    #[error("connection error: {0}")]
    Receive(String),

    /// A send was attempted on a transport that is not open
    #[error("connection is not open")]
    NotOpen,
}

/// Failures of the wire protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The inbound payload is not JSON or lacks a usable `type` discriminator
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// An outbound frame could not be serialized
    #[error("failed to encode frame: {0}")]
    Encode(String),

    /// The backend answered with an `error` frame
    #[error("{0}")]
    Backend(String),
}

/// Client-specific errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    /// Connect parameters were rejected before any connection was attempted
    #[error("{0}")]
    Validation(String),

    /// Transport error
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Protocol error
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A connection is already being established or is active
    #[error("a connection is already in progress")]
    AlreadyConnecting,

    /// The connection closed while an operation was pending
    #[error("connection closed before the operation completed")]
    ConnectionAborted,

    /// The client event loop is no longer running
    #[error("chat client has stopped")]
    ClientStopped,
}
