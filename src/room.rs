//! Room: a named broadcast group
//!
//! Holds the member set and owns broadcast and membership mutation.
//! All mutating operations on one room share the room's mutex, so
//! broadcasts and membership changes form a strict FIFO per room;
//! operations on different rooms proceed independently.

use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::sync::Mutex;
use tracing::debug;

use crate::member::Member;
use crate::types::ClientId;

/// Snapshot of one member for presence listings
#[derive(Debug, Clone)]
pub struct MemberInfo {
    pub username: String,
    pub joined_at: DateTime<Local>,
}

/// A named broadcast group
///
/// The display name keeps its original casing; the registry handles
/// case-insensitive lookup. Members are kept in insertion order so
/// listings are stable.
#[derive(Debug)]
pub struct Room {
    name: String,
    delivery_timeout: Duration,
    members: Mutex<Vec<Member>>,
}

impl Room {
    pub fn new(name: impl Into<String>, delivery_timeout: Duration) -> Self {
        Self {
            name: name.into(),
            delivery_timeout,
            members: Mutex::new(Vec::new()),
        }
    }

    /// Display name of the room
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add a member, welcome it, and announce it to the room
    ///
    /// The caller updates the session's own room pointer; the room only
    /// holds the member set.
    pub async fn enter(&self, member: Member) {
        let mut members = self.members.lock().await;
        debug!("{} enters room {}", member.username, self.name);

        let _ = member
            .deliver(&format!("Welcome in Room {}", self.name), self.delivery_timeout)
            .await;
        let announcement = format!("{} has entered.", member.username);
        members.push(member);
        Self::broadcast_locked(&mut members, &announcement, self.delivery_timeout).await;
    }

    /// Remove the member with the given id; no-op if absent
    pub async fn leave(&self, id: ClientId) {
        let mut members = self.members.lock().await;
        members.retain(|m| m.id != id);
    }

    /// Fan one text line out to every current member
    ///
    /// The line is prefixed with a wall-clock `HH:MM:SS` timestamp and
    /// terminated with a newline. A member whose delivery fails is
    /// removed from the room as part of the same pass; the failure is
    /// not surfaced to the caller.
    pub async fn broadcast(&self, text: &str) {
        let mut members = self.members.lock().await;
        Self::broadcast_locked(&mut members, text, self.delivery_timeout).await;
    }

    async fn broadcast_locked(members: &mut Vec<Member>, text: &str, timeout: Duration) {
        let line = format!("{} {}\n", Local::now().format("%H:%M:%S"), text);
        debug!("Room <<< {}", line.trim_end());

        let mut failed: Vec<ClientId> = Vec::new();
        for member in members.iter() {
            if let Err(e) = member.deliver(&line, timeout).await {
                debug!("Dropping {} after failed delivery: {}", member.username, e);
                failed.push(member.id);
            }
        }
        if !failed.is_empty() {
            members.retain(|m| !failed.contains(&m.id));
        }
    }

    /// Snapshot of the current members for WHOISIN-style queries
    pub async fn member_listing(&self) -> Vec<MemberInfo> {
        let members = self.members.lock().await;
        members
            .iter()
            .map(|m| MemberInfo {
                username: m.username.clone(),
                joined_at: m.joined_at,
            })
            .collect()
    }

    /// Ask every member's session to close, then clear the member set
    ///
    /// Used on server shutdown; the sessions' own cleanup paths stay
    /// idempotent against the cleared set.
    pub async fn close_all(&self) {
        let mut members = self.members.lock().await;
        for member in members.iter() {
            member.request_close();
        }
        members.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::member::Outbound;
    use tokio::sync::mpsc;

    const TIMEOUT: Duration = Duration::from_secs(1);

    fn member(id: u64, name: &str) -> (Member, mpsc::Receiver<Outbound>) {
        let (tx, rx) = mpsc::channel(16);
        (Member::new(ClientId(id), name.to_string(), tx), rx)
    }

    async fn next_line(rx: &mut mpsc::Receiver<Outbound>) -> String {
        match rx.recv().await {
            Some(Outbound::Line(line)) => line,
            other => panic!("expected line, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_enter_welcomes_and_announces() {
        let room = Room::new("Waiting-Hall", TIMEOUT);
        let (alice, mut alice_rx) = member(1, "alice");

        room.enter(alice).await;

        assert_eq!(next_line(&mut alice_rx).await, "Welcome in Room Waiting-Hall");
        let announcement = next_line(&mut alice_rx).await;
        assert!(announcement.contains("alice has entered."));
        assert!(announcement.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_membership_net_effect() {
        let room = Room::new("math", TIMEOUT);
        let (alice, _alice_rx) = member(1, "alice");
        let (bob, _bob_rx) = member(2, "bob");

        room.enter(alice).await;
        room.enter(bob).await;
        room.leave(ClientId(1)).await;

        let listing = room.member_listing().await;
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].username, "bob");
    }

    #[tokio::test]
    async fn test_leave_is_idempotent() {
        let room = Room::new("math", TIMEOUT);
        let (alice, _alice_rx) = member(1, "alice");
        room.enter(alice).await;

        room.leave(ClientId(1)).await;
        room.leave(ClientId(1)).await;
        room.leave(ClientId(99)).await;

        assert!(room.member_listing().await.is_empty());
    }

    #[tokio::test]
    async fn test_broadcast_reaches_all_members() {
        let room = Room::new("math", TIMEOUT);
        let (alice, mut alice_rx) = member(1, "alice");
        let (bob, mut bob_rx) = member(2, "bob");
        room.enter(alice).await;
        room.enter(bob).await;

        // Drain the entry traffic.
        while !next_line(&mut alice_rx).await.contains("bob has entered.") {}
        while !next_line(&mut bob_rx).await.contains("bob has entered.") {}

        room.broadcast("alice: hi").await;

        let to_alice = next_line(&mut alice_rx).await;
        let to_bob = next_line(&mut bob_rx).await;
        assert_eq!(to_alice, to_bob);
        assert!(to_alice.contains("alice: hi"));
        assert!(to_alice.ends_with('\n'));
    }

    #[tokio::test]
    async fn test_failed_delivery_drops_member() {
        let room = Room::new("math", TIMEOUT);
        let (alice, _alice_rx) = member(1, "alice");
        let (bob, bob_rx) = member(2, "bob");
        room.enter(alice).await;
        room.enter(bob).await;

        // Bob's pump is gone.
        drop(bob_rx);
        room.broadcast("alice: anyone here?").await;

        let listing = room.member_listing().await;
        assert_eq!(listing.len(), 1);
        assert_eq!(listing[0].username, "alice");
    }

    #[tokio::test]
    async fn test_close_all_empties_room() {
        let room = Room::new("math", TIMEOUT);
        let (alice, mut alice_rx) = member(1, "alice");
        room.enter(alice).await;

        room.close_all().await;

        assert!(room.member_listing().await.is_empty());
        // The close request reaches the pump behind the entry traffic.
        loop {
            match alice_rx.recv().await {
                Some(Outbound::Close) => break,
                Some(Outbound::Line(_)) => continue,
                None => panic!("channel closed before Close arrived"),
            }
        }
    }
}
