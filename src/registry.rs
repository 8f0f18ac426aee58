//! Room registry
//!
//! Process-wide mapping from room name to room, including the
//! distinguished default room every new connection joins first. Rooms
//! are created on demand and never destroyed while the process runs.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::error::AppError;
use crate::room::Room;

/// Name of the room every new connection joins first
pub const DEFAULT_ROOM: &str = "Waiting-Hall";

/// Lookup table of all rooms
///
/// Keys are lower-cased for case-insensitive lookup; the room keeps its
/// display casing. The map always holds at least the default room.
#[derive(Debug)]
pub struct RoomRegistry {
    rooms: RwLock<HashMap<String, Arc<Room>>>,
    default_room: Arc<Room>,
    delivery_timeout: Duration,
}

impl RoomRegistry {
    /// Create a registry holding only the default room
    pub fn new(delivery_timeout: Duration) -> Self {
        let default_room = Arc::new(Room::new(DEFAULT_ROOM, delivery_timeout));
        let mut rooms = HashMap::new();
        rooms.insert(DEFAULT_ROOM.to_lowercase(), Arc::clone(&default_room));
        Self {
            rooms: RwLock::new(rooms),
            default_room,
            delivery_timeout,
        }
    }

    /// The always-present entry room
    pub fn default_room(&self) -> Arc<Room> {
        Arc::clone(&self.default_room)
    }

    /// Insert a new empty room under `name`
    ///
    /// Duplicate creation (any casing) is a silent no-op; the existing
    /// room is left untouched.
    pub async fn create_room(&self, name: &str) {
        let mut rooms = self.rooms.write().await;
        let key = name.to_lowercase();
        if rooms.contains_key(&key) {
            debug!("Room {} already exists, ignoring create", name);
            return;
        }
        info!("Created room {}", name);
        rooms.insert(key, Arc::new(Room::new(name, self.delivery_timeout)));
    }

    /// Case-insensitive lookup
    pub async fn find_room(&self, name: &str) -> Result<Arc<Room>, AppError> {
        let rooms = self.rooms.read().await;
        rooms
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| AppError::RoomNotFound(name.to_string()))
    }

    /// Snapshot of all rooms at call time
    pub async fn list_rooms(&self) -> Vec<Arc<Room>> {
        let rooms = self.rooms.read().await;
        rooms.values().cloned().collect()
    }

    /// Close every session reachable through every room
    ///
    /// Used on server shutdown; safe to run concurrently with active
    /// broadcasts, which surface the closed connections as failed
    /// deliveries.
    pub async fn close_all(&self) {
        info!("Closing all connections");
        let rooms = self.list_rooms().await;
        for room in rooms {
            room.close_all().await;
        }
    }
}
