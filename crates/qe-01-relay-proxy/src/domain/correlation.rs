//! # Correlation Table
//!
//! Maps an in-flight command hash to the client that must receive its
//! finality. The client-side loop records, the node-side loop resolves;
//! they run on different threads.
//!
//! An entry lives from "request forwarded" until "response relayed". A
//! response that never arrives leaves its entry behind.

use parking_lot::Mutex;
use shared_types::CommandHash;
use std::collections::HashMap;
use std::net::SocketAddr;

/// Thread-safe `CommandHash -> client address` map. Every operation takes the
/// lock exactly once, so each one is atomic.
#[derive(Debug, Default)]
pub struct CorrelationTable {
    entries: Mutex<HashMap<CommandHash, SocketAddr>>,
}

impl CorrelationTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `client` as the destination for `hash`.
    ///
    /// Last writer wins: if `hash` is already pending, the previous address
    /// is replaced and returned.
    pub fn record(&self, hash: CommandHash, client: SocketAddr) -> Option<SocketAddr> {
        self.entries.lock().insert(hash, client)
    }

    /// Remove and return the destination for `hash`.
    pub fn resolve(&self, hash: &CommandHash) -> Option<SocketAddr> {
        self.entries.lock().remove(hash)
    }

    /// Destination for `hash` without removing it.
    #[must_use]
    pub fn peek(&self, hash: &CommandHash) -> Option<SocketAddr> {
        self.entries.lock().get(hash).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::Command;
    use std::sync::Arc;

    fn addr(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    #[test]
    fn test_resolve_removes_entry() {
        let table = CorrelationTable::new();
        let hash = Command::new(1, 1).hash();
        assert_eq!(table.record(hash, addr(1000)), None);
        assert_eq!(table.peek(&hash), Some(addr(1000)));
        assert_eq!(table.resolve(&hash), Some(addr(1000)));
        assert_eq!(table.resolve(&hash), None);
        assert!(table.is_empty());
    }

    #[test]
    fn test_last_writer_wins() {
        let table = CorrelationTable::new();
        let hash = Command::new(1, 1).hash();
        table.record(hash, addr(1000));
        assert_eq!(table.record(hash, addr(2000)), Some(addr(1000)));
        assert_eq!(table.len(), 1);
        assert_eq!(table.resolve(&hash), Some(addr(2000)));
    }

    #[test]
    fn test_record_and_resolve_from_two_threads() {
        let table = Arc::new(CorrelationTable::new());
        let hashes: Vec<_> = (0..2_000).map(|seq| Command::new(7, seq).hash()).collect();

        let writer = {
            let table = Arc::clone(&table);
            let hashes = hashes.clone();
            std::thread::spawn(move || {
                for (i, hash) in hashes.into_iter().enumerate() {
                    table.record(hash, addr(10_000 + (i % 50) as u16));
                }
            })
        };

        let reader = {
            let table = Arc::clone(&table);
            std::thread::spawn(move || {
                let mut resolved = 0;
                let mut pending: Vec<_> = hashes.into_iter().enumerate().collect();
                while !pending.is_empty() {
                    pending.retain(|(i, hash)| match table.resolve(hash) {
                        Some(client) => {
                            assert_eq!(client, addr(10_000 + (*i % 50) as u16));
                            resolved += 1;
                            false
                        }
                        None => true,
                    });
                    std::thread::yield_now();
                }
                resolved
            })
        };

        writer.join().unwrap();
        assert_eq!(reader.join().unwrap(), 2_000);
        assert!(table.is_empty());
    }
}
