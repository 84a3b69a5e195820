//! Relay links over `shared-net`.

use qe_01_relay_proxy::{ClientLink, DeliveryError, NodeLink, RelayError, RelayResult};
use shared_net::{Connection, NetHandle};
use shared_types::{Command, Finality, ReqCmd, RespCmd};
use std::net::SocketAddr;

/// Forwards requests over the single connection to the node.
pub struct NodeConnectionLink {
    conn: Connection,
}

impl NodeConnectionLink {
    #[must_use]
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    #[must_use]
    pub fn node_addr(&self) -> SocketAddr {
        self.conn.peer_addr()
    }
}

impl NodeLink for NodeConnectionLink {
    fn forward(&self, cmd: &Command) -> RelayResult<()> {
        self.conn
            .send_msg(&ReqCmd::new(*cmd))
            .map_err(|e| RelayError::NodeLinkDown {
                reason: e.to_string(),
            })
    }
}

/// Returns responses to clients by the address their connection came from.
pub struct ClientNetworkLink {
    net: NetHandle,
}

impl ClientNetworkLink {
    #[must_use]
    pub fn new(net: NetHandle) -> Self {
        Self { net }
    }
}

impl ClientLink for ClientNetworkLink {
    fn deliver(&self, client: SocketAddr, fin: Finality) -> Result<(), DeliveryError> {
        self.net
            .send_to(&client, &RespCmd::new(fin))
            .map_err(|e| DeliveryError {
                client,
                reason: e.to_string(),
            })
    }
}
