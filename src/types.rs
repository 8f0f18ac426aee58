//! Basic type definitions for the chat server
//!
//! Provides the `ClientId` newtype and the process-wide monotonic
//! sequence that hands ids out at connection time.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique client identifier (newtype pattern)
///
/// Process-unique, assigned monotonically at connection time and never
/// reused while the process runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub u64);

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic allocator for [`ClientId`]s
///
/// One instance lives in the server; ids start at 1.
#[derive(Debug, Default)]
pub struct IdSequence(AtomicU64);

impl IdSequence {
    /// Create a sequence starting at 1
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    /// Hand out the next id
    pub fn next_id(&self) -> ClientId {
        ClientId(self.0.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_monotonic() {
        let seq = IdSequence::new();
        let a = seq.next_id();
        let b = seq.next_id();
        let c = seq.next_id();
        assert_eq!(a, ClientId(1));
        assert_eq!(b, ClientId(2));
        assert_eq!(c, ClientId(3));
    }

    #[test]
    fn test_ids_unique_across_threads() {
        use std::collections::HashSet;
        use std::sync::Arc;

        let seq = Arc::new(IdSequence::new());
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let seq = Arc::clone(&seq);
                std::thread::spawn(move || (0..100).map(|_| seq.next_id()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for h in handles {
            for id in h.join().unwrap() {
                assert!(seen.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(seen.len(), 400);
    }
}
