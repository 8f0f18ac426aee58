//! Multi-Room WebSocket Chat Server Library
//!
//! A chat server where clients authenticate with a username, land in
//! the "Waiting-Hall" room, and exchange line-based messages broadcast
//! to everyone sharing their room. Rooms are created and switched by
//! text commands.
//!
//! # Architecture
//! One task per connected client runs the session receive loop; a
//! dedicated write pump per client drains its outbound channel onto
//! the WebSocket. Shared state is limited to the [`RoomRegistry`]'s
//! room map and each [`Room`]'s member set, each guarded by its own
//! lock, so broadcasts and membership changes on one room form a
//! strict FIFO while different rooms proceed independently.
//!
//! # Example
//! ```ignore
//! use std::sync::Arc;
//! use chat_rooms::{ChatServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let server = Arc::new(ChatServer::new(ServerConfig::default()));
//!     server.run().await.unwrap();
//! }
//! ```

pub mod config;
pub mod connection;
pub mod error;
pub mod member;
pub mod message;
pub mod registry;
pub mod room;
pub mod server;
pub mod session;
pub mod types;

// Re-export main types for convenience
pub use config::ServerConfig;
pub use connection::{Connection, ConnectionRx, ConnectionTx, WsConnection};
pub use error::{AppError, DeliveryError};
pub use member::{Member, Outbound};
pub use message::{ChatMessage, MessageKind, HELP_TEXT};
pub use registry::{RoomRegistry, DEFAULT_ROOM};
pub use room::{MemberInfo, Room};
pub use server::ChatServer;
pub use types::{ClientId, IdSequence};
