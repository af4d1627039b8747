//! Minichat client core.
//!
//! This library connects to the chat backend over WebSocket, performs the
//! `init`/`joined` handshake, keeps the local session record and projects
//! backend frames onto a [`view::ChatView`].

pub mod client;
pub mod config;
pub mod dispatcher;
pub mod domain;
pub mod error;
pub mod manager;
pub mod protocol;
pub mod transport;
pub mod view;

pub use client::ChatClient;
pub use config::ClientConfig;
pub use domain::{ChatMessage, ConnectParams, Session};
pub use error::ClientError;
pub use manager::ConnectionState;
pub use transport::WebSocketConnector;
pub use view::{ChatView, ConsoleView, ViewEvent};
