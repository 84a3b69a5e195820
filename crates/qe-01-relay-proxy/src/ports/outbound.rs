//! Driven Ports (SPI - Outbound Dependencies)

use shared_types::{Command, Finality};
use std::net::SocketAddr;
use thiserror::Error;

use crate::error::RelayResult;

/// The single persistent connection to the upstream node.
pub trait NodeLink: Send + Sync {
    /// Hand `cmd` to the node. Must not block.
    fn forward(&self, cmd: &Command) -> RelayResult<()>;
}

/// Client could not be reached.
#[derive(Debug, Error)]
#[error("Cannot deliver to {client}: {reason}")]
pub struct DeliveryError {
    pub client: SocketAddr,
    pub reason: String,
}

/// Client-facing side of the relay, addressing clients by the address
/// their connection came from.
pub trait ClientLink: Send + Sync {
    /// Send `fin` to `client`. Must not block.
    fn deliver(&self, client: SocketAddr, fin: Finality) -> Result<(), DeliveryError>;
}
