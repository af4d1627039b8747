//! Message formatting utilities for console display.

use chrono::FixedOffset;
use minichat_shared::time::format_message_time;

use crate::domain::ChatMessage;

const RULE: &str = "============================================================";

/// Message formatter for console display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format the banner shown when entering a room
    pub fn format_enter_chat(user: &str, room: &str) -> String {
        format!(
            "\n{RULE}\n# {room}\nYou are '{user}'. Type messages and press Enter to send. \
             Type /quit to leave.\n{RULE}\n"
        )
    }

    /// Format a chat message
    ///
    /// # Arguments
    ///
    /// * `message` - The message to render
    /// * `current_user` - The local user, whose own messages are marked "(me)"
    /// * `now_millis` - Current time, for relative timestamps
    /// * `offset` - Display timezone
    ///
    /// # Returns
    ///
    /// System notices render as `* text`; other messages as
    /// `[time] sender: text`, with the time bracket omitted when the message
    /// carries no timestamp.
    pub fn format_chat_message(
        message: &ChatMessage,
        current_user: Option<&str>,
        now_millis: i64,
        offset: FixedOffset,
    ) -> String {
        if message.is_system() {
            return format!("\n* {}\n", message.text);
        }

        let time = Self::format_timestamp(message, now_millis, offset);
        let me_suffix = if current_user == Some(message.sender.as_str()) {
            " (me)"
        } else {
            ""
        };

        if time.is_empty() {
            format!("\n{}{}: {}\n", message.sender, me_suffix, message.text)
        } else {
            format!(
                "\n[{}] {}{}: {}\n",
                time, message.sender, me_suffix, message.text
            )
        }
    }

    /// Format the timestamp of a message; empty when it has none
    pub fn format_timestamp(
        message: &ChatMessage,
        now_millis: i64,
        offset: FixedOffset,
    ) -> String {
        message
            .timestamp
            .map(|timestamp| format_message_time(timestamp.value(), now_millis, offset))
            .unwrap_or_default()
    }

    /// Format an error banner
    pub fn format_error(text: &str) -> String {
        format!("\n! {}\n", text)
    }

    /// Format the connection status indicator
    pub fn format_connection_status(connected: bool) -> String {
        if connected {
            "● Connected".to_string()
        } else {
            "○ Disconnected".to_string()
        }
    }

    /// Format the notice shown when the session ends
    pub fn format_return_to_login() -> String {
        "\nLeft the room.\n".to_string()
    }

    /// Format the input prompt
    pub fn format_prompt(user: &str, room: &str, count: u64) -> String {
        format!("{}@{} [{}]> ", user, room, count)
    }
}
