//! Error types for the chat server
//!
//! Defines application-level errors and per-member delivery errors.
//! Uses thiserror for ergonomic error definitions.

use thiserror::Error;

/// Application-level errors
///
/// Covers fatal errors (connection termination, bind failure) and
/// recoverable business errors (unknown room, failed handshake).
#[derive(Debug, Error)]
pub enum AppError {
    /// WebSocket protocol error (fatal to the session)
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// JSON serialization/deserialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// IO error (fatal)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Peer closed the connection or the read side failed
    #[error("Connection closed")]
    ConnectionClosed,

    /// No (or garbled) username received on a new connection
    #[error("Handshake failed: no username received")]
    HandshakeFailed,

    /// Room not found with the given name
    #[error("Room not found: {0}")]
    RoomNotFound(String),
}

/// Per-member delivery errors
///
/// A failed delivery means the member is dropped from its room; it is
/// never surfaced to the sender.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeliveryError {
    /// The member's outbound channel has been closed (disconnected)
    #[error("Member channel closed")]
    Closed,

    /// The member's outbound channel stayed full past the delivery timeout
    #[error("Delivery timed out")]
    TimedOut,
}
