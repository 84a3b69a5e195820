//! Driven Ports (SPI - Outbound Dependencies)

use shared_types::Command;

use crate::domain::Path;

/// Per-path broadcast to every replica connection.
pub trait ReplicaFanout {
    /// Replicas configured for `path`.
    fn replica_count(&self, path: Path) -> usize;

    /// Send `cmd` to every replica of `path`. Returns how many sends were
    /// accepted; individual failures are the adapter's to log.
    fn broadcast(&mut self, path: Path, cmd: &Command) -> usize;
}
