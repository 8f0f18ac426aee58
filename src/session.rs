//! Client session lifecycle
//!
//! One session per connection, running as its own task. The lifecycle
//! is Connecting (username handshake) → Active (receive loop and
//! dispatch) → Leaving (room cleanup) → Closed (connection closed).
//! A dedicated write pump drains the session's outbound channel onto
//! the connection, so broadcasts to this client never run on another
//! client's task.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::connection::{Connection, ConnectionRx, ConnectionTx};
use crate::error::AppError;
use crate::member::{Member, Outbound};
use crate::message::{ChatMessage, MessageKind, HELP_TEXT};
use crate::registry::RoomRegistry;
use crate::room::Room;
use crate::types::ClientId;

/// Drive one client connection from handshake to close
///
/// Returns after the client logs out, the connection fails, or the
/// server closes the session. The error is local to this session and
/// never reaches room or registry state beyond removing the member.
pub async fn run<C: Connection>(
    conn: C,
    id: ClientId,
    registry: Arc<RoomRegistry>,
    config: ServerConfig,
) -> Result<(), AppError> {
    let (tx, mut rx) = conn.split();
    let (out_tx, out_rx) = mpsc::channel(config.outbound_capacity);
    tokio::spawn(write_pump(tx, out_rx));

    // Connecting: exactly one bare username line precedes all envelopes.
    let username = match rx.receive().await {
        Ok(line) => {
            let username = line.trim().to_string();
            if username.is_empty() {
                return Err(AppError::HandshakeFailed);
            }
            username
        }
        Err(_) => return Err(AppError::HandshakeFailed),
    };

    let member = Member::new(id, username, out_tx);
    info!("Client {} connected as '{}'", id, member.username);

    let current = registry.default_room();
    current.enter(member.clone()).await;

    let mut session = Session {
        member,
        current,
        registry,
        delivery_timeout: config.delivery_timeout,
    };

    // Active: block on the connection, dispatch one message at a time.
    loop {
        let text = match rx.receive().await {
            Ok(text) => text,
            Err(e) => {
                debug!("Client {} read failed: {}", id, e);
                break;
            }
        };
        let msg: ChatMessage = match serde_json::from_str(&text) {
            Ok(msg) => msg,
            Err(e) => {
                warn!("Invalid envelope from client {}: {}", id, e);
                continue;
            }
        };
        if session.dispatch(msg).await == Flow::Logout {
            break;
        }
    }

    // Leaving: idempotent against shutdown having cleared the room.
    session.current.leave(id).await;
    info!("Client {} ('{}') left", id, session.member.username);

    // Closed: dropping the session drops the last outbound sender once
    // the rooms no longer hold a clone, which ends the write pump and
    // closes the connection.
    Ok(())
}

/// Forwards outbound lines to the connection until the channel ends,
/// a send fails, or a close is requested; then closes the connection.
async fn write_pump<T: ConnectionTx>(mut tx: T, mut rx: mpsc::Receiver<Outbound>) {
    while let Some(out) = rx.recv().await {
        match out {
            Outbound::Line(line) => {
                if tx.send(&line).await.is_err() {
                    debug!("Send failed, ending write pump");
                    break;
                }
            }
            Outbound::Close => break,
        }
    }
    tx.close().await;
}

/// Whether the receive loop keeps going after a dispatch
#[derive(Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Logout,
}

/// Dispatch state of an active session
struct Session {
    member: Member,
    current: Arc<Room>,
    registry: Arc<RoomRegistry>,
    delivery_timeout: Duration,
}

impl Session {
    async fn dispatch(&mut self, msg: ChatMessage) -> Flow {
        match msg.kind {
            MessageKind::Message => {
                self.current
                    .broadcast(&format!("{}: {}", self.member.username, msg.payload))
                    .await;
            }
            MessageKind::WhoIsIn => self.send_who_is_in().await,
            MessageKind::AvailableRooms => self.send_available_rooms().await,
            MessageKind::CreateRoom => self.create_room(&msg.payload).await,
            MessageKind::SwitchRoom => self.switch_room(&msg.payload).await,
            MessageKind::Help => self.reply(HELP_TEXT).await,
            MessageKind::Logout => return Flow::Logout,
        }
        Flow::Continue
    }

    async fn send_who_is_in(&self) {
        let listing = self.current.member_listing().await;
        self.reply(&format!(
            "List of the users connected at {}",
            Local::now().format("%H:%M:%S")
        ))
        .await;
        for (i, info) in listing.iter().enumerate() {
            self.reply(&format!(
                "{}.) {} since {}",
                i + 1,
                info.username,
                info.joined_at.format("%Y-%m-%d %H:%M:%S")
            ))
            .await;
        }
    }

    async fn send_available_rooms(&self) {
        let mut rooms = self.registry.list_rooms().await;
        if rooms.is_empty() {
            self.reply("Currently are no chat-rooms available. You can create one with CREATE <NAME>")
                .await;
            return;
        }
        rooms.sort_by(|a, b| a.name().cmp(b.name()));
        self.reply("List of all chat-rooms:").await;
        for (i, room) in rooms.iter().enumerate() {
            self.reply(&format!("{}.) {}", i + 1, room.name())).await;
        }
    }

    async fn create_room(&self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.reply("Room name must not be empty.").await;
            return;
        }
        self.registry.create_room(name).await;
        self.reply(&format!("Created Room {}", name)).await;
    }

    /// Move to another room
    ///
    /// Lookup happens first so a failed switch never touches the
    /// current membership. On success the leave and enter run back to
    /// back; other sessions may briefly see the member in neither
    /// room, never in two.
    async fn switch_room(&mut self, name: &str) {
        match self.registry.find_room(name).await {
            Ok(target) => {
                self.current.leave(self.member.id).await;
                target.enter(self.member.clone()).await;
                self.current = target;
                info!("'{}' switched to room {}", self.member.username, name);
            }
            Err(_) => {
                self.reply(&format!("Sorry, couldn't find room {}", name)).await;
                self.send_available_rooms().await;
            }
        }
    }

    /// Deliver a direct reply to this session's own client
    async fn reply(&self, text: &str) {
        if let Err(e) = self.member.deliver(text, self.delivery_timeout).await {
            debug!("Reply to {} failed: {}", self.member.username, e);
        }
    }
}
