//! # Error Types
//!
//! Errors shared by every crate that touches the wire or the configuration.

use thiserror::Error;

/// Errors from encoding or decoding a wire message.
#[derive(Debug, Error)]
pub enum CodecError {
    /// bincode could not (de)serialize the payload.
    #[error("Serialization error: {0}")]
    Serialization(#[from] bincode::Error),

    /// A frame was handed to the decoder of a different message type.
    #[error("Opcode mismatch: expected {expected:#04x}, got {actual:#04x}")]
    OpcodeMismatch { expected: u8, actual: u8 },
}

/// Fatal configuration errors, reported before any network activity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A replica entry did not match `host:port;client_port`.
    #[error("Invalid replica spec '{entry}': {reason}")]
    InvalidReplicaSpec { entry: String, reason: String },

    /// No replica entries were configured.
    #[error("Replica list is empty")]
    EmptyReplicaList,

    /// The instance index does not select an entry.
    #[error("Index {idx} out of range for {len} replicas")]
    IndexOutOfRange { idx: i64, len: usize },

    /// The selected entry has no client port and none was given explicitly.
    #[error("Client port not specified for replica {idx}")]
    MissingClientPort { idx: usize },

    /// A numeric option is outside its valid range.
    #[error("Invalid value for '{option}': {reason}")]
    InvalidOption { option: String, reason: String },

    /// The configuration file could not be read.
    #[error("Cannot read config file {path}: {reason}")]
    Unreadable { path: String, reason: String },

    /// The configuration file is not valid TOML for its schema.
    #[error("Cannot parse config file {path}: {reason}")]
    Malformed { path: String, reason: String },
}
