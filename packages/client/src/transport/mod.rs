//! Transport seam between the connection manager and the network.
//!
//! A [`Connector`] opens one [`Transport`] per connect. The transport does its
//! I/O elsewhere and reports back through [`TransportEvent`]s tagged with the
//! [`ConnectionId`] it was opened with, so events from an earlier connection
//! can be told apart and dropped.

pub mod websocket;

#[cfg(test)]
pub(crate) mod fake;

use std::fmt;

use tokio::sync::mpsc;

use crate::error::TransportError;

pub use websocket::WebSocketConnector;

/// Generation number of an opened transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What happened on a transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEventKind {
    /// The connection is established and frames can be sent
    Opened,
    /// One inbound text frame
    Frame(String),
    /// The transport failed; a `Closed` follows
    Error(String),
    /// The transport is gone; no further events for this id
    Closed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportEvent {
    pub connection: ConnectionId,
    pub kind: TransportEventKind,
}

impl TransportEvent {
    pub fn new(connection: ConnectionId, kind: TransportEventKind) -> Self {
        Self { connection, kind }
    }
}

pub type TransportEventSender = mpsc::UnboundedSender<TransportEvent>;

/// A single duplex connection, exclusively owned by the connection manager.
pub trait Transport: Send {
    /// Queue one text frame for sending.
    fn send(&mut self, frame: String) -> Result<(), TransportError>;

    /// Whether frames can be sent right now.
    fn is_open(&self) -> bool;

    /// Close the connection. Safe to call more than once.
    fn close(&mut self);
}

/// Opens transports.
pub trait Connector: Send {
    /// Start opening a transport to `url`.
    ///
    /// Returns immediately; progress is reported on `events` tagged with `id`.
    fn open(
        &self,
        url: &str,
        id: ConnectionId,
        events: TransportEventSender,
    ) -> Box<dyn Transport>;
}
