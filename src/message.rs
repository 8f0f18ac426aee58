//! Message protocol definitions
//!
//! JSON envelope carried in each WebSocket text frame: a `kind` plus a
//! string `payload`. The payload is empty except for `MESSAGE` (chat
//! text) and `CREATE_ROOM`/`SWITCH_ROOM` (room name). The username
//! handshake is a bare text frame, not wrapped in the envelope.

use serde::{Deserialize, Serialize};

/// Message kind carried on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MessageKind {
    /// Chat text, broadcast to the sender's current room
    Message,
    /// Request the member listing of the current room
    WhoIsIn,
    /// End the session
    Logout,
    /// Create a new room named by the payload
    CreateRoom,
    /// Move to the room named by the payload
    SwitchRoom,
    /// Request the listing of all rooms
    AvailableRooms,
    /// Request the command summary
    Help,
}

/// Client → Server wire envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub kind: MessageKind,
    #[serde(default)]
    pub payload: String,
}

impl ChatMessage {
    pub fn new(kind: MessageKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    /// Map a line of terminal input to a message
    ///
    /// Commands are case-insensitive: `LOGOUT`, `WHOISIN`, `HELP`,
    /// `AVAILABLE`, `CREATE <name>`, `SWITCH <name>`. Anything else
    /// (including a bare `CREATE`/`SWITCH` with no argument) is chat
    /// text.
    pub fn from_input(line: &str) -> Self {
        let trimmed = line.trim();
        let (first, rest) = match trimmed.split_once(char::is_whitespace) {
            Some((first, rest)) => (first, rest.trim()),
            None => (trimmed, ""),
        };

        match first.to_ascii_uppercase().as_str() {
            "LOGOUT" if rest.is_empty() => Self::new(MessageKind::Logout, ""),
            "WHOISIN" if rest.is_empty() => Self::new(MessageKind::WhoIsIn, ""),
            "HELP" if rest.is_empty() => Self::new(MessageKind::Help, ""),
            "AVAILABLE" if rest.is_empty() => Self::new(MessageKind::AvailableRooms, ""),
            "CREATE" if !rest.is_empty() => Self::new(MessageKind::CreateRoom, rest),
            "SWITCH" if !rest.is_empty() => Self::new(MessageKind::SwitchRoom, rest),
            _ => Self::new(MessageKind::Message, trimmed),
        }
    }
}

/// Static command summary sent in reply to `HELP`
pub const HELP_TEXT: &str = "Available commands:\n\
    1.) LOGOUT to leave the server\n\
    2.) WHOISIN to see who is in your room\n\
    3.) AVAILABLE to list all chat-rooms\n\
    4.) CREATE <name> to create a new chat-room\n\
    5.) SWITCH <name> to move to another chat-room\n\
    Anything else is sent to your room as a chat message.";
