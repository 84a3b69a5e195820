//! Per-path replica connections for the benchmark driver.

use qe_02_bench_driver::{Path, ReplicaFanout};
use shared_net::{ConnId, Connection, NetError, NetHandle};
use shared_types::{Command, ReqCmd};
use std::collections::HashMap;
use std::net::SocketAddr;
use tracing::{info, warn};

/// Connections to every replica of both paths, fixed for the whole run.
pub struct ConnectionSets {
    weak: Vec<Connection>,
    strong: Vec<Connection>,
    /// Connection id to (path, replica index).
    responders: HashMap<ConnId, (Path, usize)>,
}

impl ConnectionSets {
    /// Connect to every replica, weak path first. Any failure is fatal.
    pub async fn connect(
        net: &NetHandle,
        weak: &[SocketAddr],
        strong: &[SocketAddr],
    ) -> Result<Self, NetError> {
        let mut weak_conns = Vec::with_capacity(weak.len());
        for addr in weak {
            weak_conns.push(net.connect(*addr).await?);
        }
        let mut strong_conns = Vec::with_capacity(strong.len());
        for addr in strong {
            strong_conns.push(net.connect(*addr).await?);
        }
        info!(
            weak = weak_conns.len(),
            strong = strong_conns.len(),
            "Connected to all replicas"
        );
        Ok(Self::from_connections(weak_conns, strong_conns))
    }

    #[must_use]
    pub fn from_connections(weak: Vec<Connection>, strong: Vec<Connection>) -> Self {
        let responders = weak
            .iter()
            .enumerate()
            .map(|(i, c)| (c.id(), (Path::Weak, i)))
            .chain(
                strong
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (c.id(), (Path::Strong, i))),
            )
            .collect();
        Self {
            weak,
            strong,
            responders,
        }
    }

    /// Path and replica index behind a connection.
    #[must_use]
    pub fn replica_of(&self, conn: ConnId) -> Option<(Path, usize)> {
        self.responders.get(&conn).copied()
    }

    fn conns(&self, path: Path) -> &[Connection] {
        match path {
            Path::Weak => &self.weak,
            Path::Strong => &self.strong,
        }
    }
}

impl ReplicaFanout for ConnectionSets {
    fn replica_count(&self, path: Path) -> usize {
        self.conns(path).len()
    }

    fn broadcast(&mut self, path: Path, cmd: &Command) -> usize {
        let msg = ReqCmd::new(*cmd);
        let mut sent = 0;
        for (replica, conn) in self.conns(path).iter().enumerate() {
            match conn.send_msg(&msg) {
                Ok(()) => sent += 1,
                Err(e) => warn!(%path, replica, peer = %conn.peer_addr(), error = %e, "Send failed"),
            }
        }
        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detached(id: ConnId) -> (Connection, tokio::sync::mpsc::UnboundedReceiver<Vec<u8>>) {
        let port = 20_000 + u16::try_from(id).unwrap();
        Connection::detached(id, SocketAddr::from(([127, 0, 0, 1], port)), 1024)
    }

    #[test]
    fn test_broadcast_reaches_only_its_path() {
        let (w0, mut w0_rx) = detached(0);
        let (w1, mut w1_rx) = detached(1);
        let (s0, mut s0_rx) = detached(2);
        let mut sets = ConnectionSets::from_connections(vec![w0, w1], vec![s0]);

        assert_eq!(sets.broadcast(Path::Weak, &Command::new(1, 0)), 2);
        assert!(w0_rx.try_recv().is_ok());
        assert!(w1_rx.try_recv().is_ok());
        assert!(s0_rx.try_recv().is_err());
    }

    #[test]
    fn test_broadcast_counts_live_connections() {
        let (w0, _w0_rx) = detached(0);
        let (w1, w1_rx) = detached(1);
        let (s0, _s0_rx) = detached(2);
        drop(w1_rx);
        let mut sets = ConnectionSets::from_connections(vec![w0, w1], vec![s0]);
        assert_eq!(sets.broadcast(Path::Weak, &Command::new(1, 0)), 1);
    }

    #[test]
    fn test_replica_lookup() {
        let (w0, _a) = detached(10);
        let (s0, _b) = detached(11);
        let (s1, _c) = detached(12);
        let sets = ConnectionSets::from_connections(vec![w0], vec![s0, s1]);
        assert_eq!(sets.replica_count(Path::Strong), 2);
        assert_eq!(sets.replica_of(12), Some((Path::Strong, 1)));
        assert_eq!(sets.replica_of(10), Some((Path::Weak, 0)));
        assert_eq!(sets.replica_of(99), None);
    }
}
