//! Relay traffic counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters updated from both event loops.
#[derive(Debug, Default)]
pub struct RelayStats {
    forwarded: AtomicU64,
    returned: AtomicU64,
    dropped: AtomicU64,
    overwritten: AtomicU64,
    undeliverable: AtomicU64,
}

/// Point-in-time copy of [`RelayStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RelayStatsSnapshot {
    /// Client requests forwarded to the node.
    pub forwarded: u64,
    /// Responses handed back to their client.
    pub returned: u64,
    /// Responses with no pending entry.
    pub dropped: u64,
    /// Requests that replaced a pending entry for the same hash.
    pub overwritten: u64,
    /// Responses whose client had already disconnected.
    pub undeliverable: u64,
}

impl RelayStats {
    pub(crate) fn forwarded(&self) {
        self.forwarded.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn returned(&self) {
        self.returned.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn dropped(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn overwritten(&self) {
        self.overwritten.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn undeliverable(&self) {
        self.undeliverable.fetch_add(1, Ordering::Relaxed);
    }

    #[must_use]
    pub fn snapshot(&self) -> RelayStatsSnapshot {
        RelayStatsSnapshot {
            forwarded: self.forwarded.load(Ordering::Relaxed),
            returned: self.returned.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            overwritten: self.overwritten.load(Ordering::Relaxed),
            undeliverable: self.undeliverable.load(Ordering::Relaxed),
        }
    }
}
