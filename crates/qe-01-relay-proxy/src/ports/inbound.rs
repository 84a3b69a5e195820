//! Driving Ports (API - Inbound)
//!
//! Invoked by the two event loops: client requests from the client side,
//! finality notices from the node side.

use shared_types::{Command, Finality};
use std::net::SocketAddr;

use crate::error::RelayResult;

/// What happened to a client request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestOutcome {
    /// Recorded and forwarded.
    Forwarded,
    /// Forwarded, replacing a pending entry for the same hash whose response
    /// will now go to the new client.
    ForwardedReplacing { previous: SocketAddr },
}

/// What happened to a node response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseOutcome {
    /// Relayed to the client that submitted the command.
    Delivered { client: SocketAddr },
    /// No pending entry for this hash; nothing was sent.
    Dropped,
    /// The entry was consumed but the client is gone.
    Undeliverable { client: SocketAddr },
}

/// Primary relay API.
pub trait RelayApi: Send + Sync {
    /// Record `from` as the destination of `cmd` and forward it upstream.
    ///
    /// Fails only if the node link is down, which the caller treats as fatal.
    fn handle_client_request(&self, cmd: Command, from: SocketAddr) -> RelayResult<RequestOutcome>;

    /// Route a finality notice back to whoever submitted its command.
    fn handle_node_response(&self, fin: Finality) -> ResponseOutcome;
}
