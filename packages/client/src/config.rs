//! Client configuration.

use std::time::Duration;

/// WebSocket endpoint of the chat bridge.
pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:8000/ws";

/// How often a `ping` is sent while a transport is open.
pub const DEFAULT_PING_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// WebSocket URL the transport connects to
    pub url: String,
    /// Liveness timer period
    pub ping_interval: Duration,
}

impl ClientConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_ping_interval(mut self, ping_interval: Duration) -> Self {
        self.ping_interval = ping_interval;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            ping_interval: DEFAULT_PING_INTERVAL,
        }
    }
}
