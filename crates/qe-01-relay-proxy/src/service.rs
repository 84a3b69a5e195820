//! # Relay Service
//!
//! Store-and-forward between clients and one consensus node.
//!
//! ```text
//!  client ──ReqCmd──→ handle_client_request ──record(hash, client)──┐
//!                              │                                     │
//!                              └──forward──→ NodeLink ──→ node       ▼
//!                                                          CorrelationTable
//!  client ←──RespCmd── ClientLink ←── handle_node_response ←resolve(hash)
//! ```
//!
//! The service is shared by both event loops through an `Arc`. The
//! correlation table is the only state they both mutate.

use shared_types::{Command, Finality};
use std::net::SocketAddr;
use tracing::{debug, trace, warn};

use crate::domain::{CorrelationTable, RelayStats, RelayStatsSnapshot};
use crate::error::RelayResult;
use crate::ports::{ClientLink, NodeLink, RelayApi, RequestOutcome, ResponseOutcome};

/// Relay service wired to its node and client links.
pub struct RelayService<N, C> {
    table: CorrelationTable,
    stats: RelayStats,
    node: N,
    clients: C,
}

impl<N: NodeLink, C: ClientLink> RelayService<N, C> {
    pub fn new(node: N, clients: C) -> Self {
        Self {
            table: CorrelationTable::new(),
            stats: RelayStats::default(),
            node,
            clients,
        }
    }

    /// Commands forwarded but not yet answered.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.table.len()
    }

    #[must_use]
    pub fn stats(&self) -> RelayStatsSnapshot {
        self.stats.snapshot()
    }

    #[must_use]
    pub fn node_link(&self) -> &N {
        &self.node
    }

    #[must_use]
    pub fn client_link(&self) -> &C {
        &self.clients
    }
}

impl<N: NodeLink, C: ClientLink> RelayApi for RelayService<N, C> {
    fn handle_client_request(&self, cmd: Command, from: SocketAddr) -> RelayResult<RequestOutcome> {
        let hash = cmd.hash();
        // Record before forwarding: the node may answer before `forward`
        // returns to us.
        let previous = self.table.record(hash, from);
        if let Err(e) = self.node.forward(&cmd) {
            // Put the table back the way it was so `pending()` stays exact.
            match previous {
                Some(previous) => {
                    self.table.record(hash, previous);
                }
                None => {
                    self.table.resolve(&hash);
                }
            }
            return Err(e);
        }
        self.stats.forwarded();

        match previous {
            Some(previous) if previous != from => {
                self.stats.overwritten();
                warn!(
                    cmd_hash = %hash.short(),
                    %previous,
                    client = %from,
                    "Command already pending for another client, response will go to the newer one"
                );
                Ok(RequestOutcome::ForwardedReplacing { previous })
            }
            _ => {
                trace!(cmd_hash = %hash.short(), client = %from, "Forwarded to node");
                Ok(RequestOutcome::Forwarded)
            }
        }
    }

    fn handle_node_response(&self, fin: Finality) -> ResponseOutcome {
        let Some(client) = self.table.resolve(&fin.cmd_hash) else {
            self.stats.dropped();
            debug!(cmd_hash = %fin.cmd_hash.short(), "No pending request for response, dropping");
            return ResponseOutcome::Dropped;
        };

        let hash = fin.cmd_hash;
        match self.clients.deliver(client, fin) {
            Ok(()) => {
                self.stats.returned();
                trace!(cmd_hash = %hash.short(), %client, "Returned to client");
                ResponseOutcome::Delivered { client }
            }
            Err(e) => {
                self.stats.undeliverable();
                debug!(cmd_hash = %hash.short(), error = %e, "Client gone, response discarded");
                ResponseOutcome::Undeliverable { client }
            }
        }
    }
}
