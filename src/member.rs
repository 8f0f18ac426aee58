//! Room member handle
//!
//! Represents one connected, authenticated client from a room's point
//! of view: identity plus the outbound channel its write pump drains.
//! Delivery is bounded; a member whose channel is closed or stays full
//! past the timeout is treated as disconnected by the caller.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::mpsc;
use tokio::time;

use crate::error::DeliveryError;
use crate::types::ClientId;

/// One message handed to a member's write pump
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A text line to put on the wire
    Line(String),
    /// Close the connection and end the pump
    Close,
}

/// Handle to a connected client held by rooms
#[derive(Debug, Clone)]
pub struct Member {
    /// Unique identifier for this client
    pub id: ClientId,
    /// Username fixed at handshake
    pub username: String,
    /// Connection time, shown in presence listings
    pub joined_at: DateTime<Local>,
    /// Session → write pump channel
    outbound: mpsc::Sender<Outbound>,
}

impl Member {
    pub fn new(id: ClientId, username: String, outbound: mpsc::Sender<Outbound>) -> Self {
        Self {
            id,
            username,
            joined_at: Local::now(),
            outbound,
        }
    }

    /// Deliver one text line to this member, bounded by `timeout`
    pub async fn deliver(&self, text: &str, timeout: Duration) -> Result<(), DeliveryError> {
        let send = self.outbound.send(Outbound::Line(text.to_string()));
        match time::timeout(timeout, send).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(_)) => Err(DeliveryError::Closed),
            Err(_) => Err(DeliveryError::TimedOut),
        }
    }

    /// Ask the member's write pump to close the connection
    ///
    /// Best-effort: a full or closed channel is ignored, the session is
    /// on its way down either way.
    pub fn request_close(&self) {
        let _ = self.outbound.try_send(Outbound::Close);
    }
}
