//! Domain model of the chat client.
//!
//! Plain data with the transitions the dispatcher is allowed to apply. No I/O.

mod join_request;
mod message;
mod session;

pub use join_request::{ConnectParams, DEFAULT_BACKEND_HOST, DEFAULT_BACKEND_PORT, JoinRequest};
pub use message::{ChatMessage, SYSTEM_SENDER, Timestamp};
pub use session::Session;
