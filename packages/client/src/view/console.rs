//! Terminal rendering of session projection events.

use std::io::{self, Stdout, Write};

use chrono::FixedOffset;
use minichat_shared::time::{Clock, SystemClock, local_offset};

use crate::domain::ChatMessage;

use super::{ChatView, MessageFormatter};

/// Renders [`ChatView`] calls as text lines followed by a prompt.
pub struct ConsoleView<W: Write + Send = Stdout> {
    out: W,
    clock: Box<dyn Clock>,
    offset: FixedOffset,
    user: Option<String>,
    room: Option<String>,
    count: u64,
    connected: bool,
}

impl ConsoleView<Stdout> {
    /// Console view on stdout, local timezone, system clock
    pub fn stdout() -> Self {
        Self::new(io::stdout(), Box::new(SystemClock), local_offset())
    }
}

impl<W: Write + Send> ConsoleView<W> {
    pub fn new(out: W, clock: Box<dyn Clock>, offset: FixedOffset) -> Self {
        Self {
            out,
            clock,
            offset,
            user: None,
            room: None,
            count: 0,
            connected: false,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// The input prompt for the current room, if inside one.
    pub fn prompt(&self) -> Option<String> {
        match (&self.user, &self.room) {
            (Some(user), Some(room)) => {
                Some(MessageFormatter::format_prompt(user, room, self.count))
            }
            _ => None,
        }
    }

    /// Print the prompt again after output, if inside a room.
    pub fn redisplay_prompt(&mut self) {
        if let Some(prompt) = self.prompt() {
            self.write(&prompt);
        }
    }

    fn write(&mut self, text: &str) {
        if let Err(e) = self.out.write_all(text.as_bytes()).and_then(|_| self.out.flush()) {
            tracing::warn!("Failed to write to console: {}", e);
        }
    }
}

impl<W: Write + Send> ChatView for ConsoleView<W> {
    fn on_enter_chat(&mut self, user: &str, room: &str) {
        self.user = Some(user.to_string());
        self.room = Some(room.to_string());
        self.count = 0;
        self.write(&MessageFormatter::format_enter_chat(user, room));
    }

    fn on_message_appended(&mut self, message: &ChatMessage, count: u64) {
        self.count = count;
        let line = MessageFormatter::format_chat_message(
            message,
            self.user.as_deref(),
            self.clock.now_millis(),
            self.offset,
        );
        self.write(&line);
        self.redisplay_prompt();
    }

    fn on_error(&mut self, text: &str) {
        self.write(&MessageFormatter::format_error(text));
        self.redisplay_prompt();
    }

    fn on_connection_status_changed(&mut self, connected: bool) {
        if self.connected == connected {
            return;
        }
        self.connected = connected;
        let status = MessageFormatter::format_connection_status(connected);
        self.write(&format!("{}\n", status));
        if connected {
            self.redisplay_prompt();
        }
    }

    fn on_return_to_login(&mut self) {
        let had_room = self.room.is_some();
        self.user = None;
        self.room = None;
        self.count = 0;
        if had_room {
            self.write(&MessageFormatter::format_return_to_login());
        }
    }
}
