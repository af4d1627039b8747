//! UI projection boundary.
//!
//! The connection manager drives a [`ChatView`]; how the calls are rendered is
//! up to the implementation. Calls arrive in frame-arrival order.

mod console;
mod formatter;

use tokio::sync::mpsc;

use crate::domain::ChatMessage;

pub use console::ConsoleView;
pub use formatter::MessageFormatter;

/// Receiver of session projection events.
#[cfg_attr(test, mockall::automock)]
pub trait ChatView: Send {
    /// The join handshake completed
    fn on_enter_chat(&mut self, user: &str, room: &str);

    /// A message was appended; `count` is the running message counter
    fn on_message_appended(&mut self, message: &ChatMessage, count: u64);

    /// A user-visible error banner
    fn on_error(&mut self, text: &str);

    fn on_connection_status_changed(&mut self, connected: bool);

    /// Go back to the pre-login view
    fn on_return_to_login(&mut self);
}

/// The [`ChatView`] calls as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    EnterChat { user: String, room: String },
    MessageAppended { message: ChatMessage, count: u64 },
    Error(String),
    ConnectionStatusChanged(bool),
    ReturnToLogin,
}

impl ViewEvent {
    /// Replay this event onto a view.
    pub fn apply_to<V: ChatView + ?Sized>(&self, view: &mut V) {
        match self {
            ViewEvent::EnterChat { user, room } => view.on_enter_chat(user, room),
            ViewEvent::MessageAppended { message, count } => {
                view.on_message_appended(message, *count)
            }
            ViewEvent::Error(text) => view.on_error(text),
            ViewEvent::ConnectionStatusChanged(connected) => {
                view.on_connection_status_changed(*connected)
            }
            ViewEvent::ReturnToLogin => view.on_return_to_login(),
        }
    }
}

/// Forwards every call as a [`ViewEvent`] so a shell can render asynchronously.
///
/// A closed receiver is not an error for the core; the event is dropped.
impl ChatView for mpsc::UnboundedSender<ViewEvent> {
    fn on_enter_chat(&mut self, user: &str, room: &str) {
        forward(
            self,
            ViewEvent::EnterChat {
                user: user.to_string(),
                room: room.to_string(),
            },
        );
    }

    fn on_message_appended(&mut self, message: &ChatMessage, count: u64) {
        forward(
            self,
            ViewEvent::MessageAppended {
                message: message.clone(),
                count,
            },
        );
    }

    fn on_error(&mut self, text: &str) {
        forward(self, ViewEvent::Error(text.to_string()));
    }

    fn on_connection_status_changed(&mut self, connected: bool) {
        forward(self, ViewEvent::ConnectionStatusChanged(connected));
    }

    fn on_return_to_login(&mut self) {
        forward(self, ViewEvent::ReturnToLogin);
    }
}

fn forward(sender: &mpsc::UnboundedSender<ViewEvent>, event: ViewEvent) {
    if sender.send(event).is_err() {
        tracing::debug!("View receiver dropped, discarding event");
    }
}
