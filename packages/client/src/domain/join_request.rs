//! Connect parameters and their validated form.

use crate::error::ClientError;

/// Backend host sent in `init` when none is given.
pub const DEFAULT_BACKEND_HOST: &str = "localhost";

/// Backend port sent in `init` when none (or an invalid one) is given.
pub const DEFAULT_BACKEND_PORT: u16 = 50051;

/// Raw connect parameters as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectParams {
    pub user: String,
    pub room: String,
    pub host: String,
    pub port: String,
}

impl ConnectParams {
    pub fn new(user: impl Into<String>, room: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            room: room.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        self.port = port.into();
        self
    }
}

/// Validated join parameters carried by the `init` frame.
///
/// `host` and `port` are routing hints for the backend; the client never
/// dials them itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinRequest {
    pub user: String,
    pub room: String,
    pub host: String,
    pub port: u16,
}

impl TryFrom<ConnectParams> for JoinRequest {
    type Error = ClientError;

    fn try_from(params: ConnectParams) -> Result<Self, Self::Error> {
        let user = params.user.trim();
        let room = params.room.trim();
        if user.is_empty() || room.is_empty() {
            return Err(ClientError::Validation(
                "Username and room are required".to_string(),
            ));
        }

        let host = match params.host.trim() {
            "" => DEFAULT_BACKEND_HOST,
            host => host,
        };
        let port = params
            .port
            .trim()
            .parse::<u16>()
            .ok()
            .filter(|port| *port != 0)
            .unwrap_or(DEFAULT_BACKEND_PORT);

        Ok(Self {
            user: user.to_string(),
            room: room.to_string(),
            host: host.to_string(),
            port,
        })
    }
}
