//! Error types for the network substrate.

use shared_types::{CodecError, Opcode};
use std::net::SocketAddr;
use thiserror::Error;

/// Errors raised by connections, framing and the handler registry.
#[derive(Debug, Error)]
pub enum NetError {
    /// Socket-level I/O failure.
    #[error("Transport error: {0}")]
    Io(#[from] std::io::Error),

    /// Payload could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    /// Frame payload exceeds the configured maximum.
    #[error("Message too large: {size} bytes (max {max})")]
    MessageTooLarge { size: usize, max: usize },

    /// Outbound connection could not be established.
    #[error("Connection failed to {addr}: {source}")]
    ConnectFailed {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    /// No live connection to this address.
    #[error("Unknown peer: {0}")]
    UnknownPeer(SocketAddr),

    /// The connection's writer has shut down.
    #[error("Connection to {0} closed")]
    ConnectionClosed(SocketAddr),

    /// A handler for this opcode already exists on this endpoint.
    #[error("Handler already registered for opcode {opcode:#04x} ({name})")]
    DuplicateHandler { opcode: Opcode, name: &'static str },
}
