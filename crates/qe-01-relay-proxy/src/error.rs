//! Error types for the relay subsystem.

use std::net::SocketAddr;
use thiserror::Error;

/// Relay errors.
///
/// Only the node side can fail the relay: there is a single upstream
/// connection and no fallback. Client-side delivery failures are outcomes,
/// not errors.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The upstream node connection refused the request.
    #[error("Node link down: {reason}")]
    NodeLinkDown { reason: String },

    /// The upstream node could not be reached at startup.
    #[error("Cannot reach node at {addr}: {reason}")]
    NodeUnreachable { addr: SocketAddr, reason: String },
}

/// Result type for relay operations
pub type RelayResult<T> = Result<T, RelayError>;
