//! # Core Entities
//!
//! - **Command**: the content-addressed unit of work a client submits
//! - **Finality**: the commit notice a consensus node returns for a command

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// A 32-byte block hash as reported by the consensus engine.
pub type BlockHash = [u8; 32];

/// SHA-256 digest identifying a [`Command`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub struct CommandHash(pub [u8; 32]);

impl CommandHash {
    /// First 8 hex characters, for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for CommandHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for CommandHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommandHash({})", self.short())
    }
}

/// A benchmark command.
///
/// Carries no payload beyond its identity: the issuing client and a
/// per-client sequence number. Two commands hash equal iff both fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Command {
    /// Issuing client identifier.
    pub client_id: u32,
    /// Monotonically increasing per-client sequence number.
    pub seq: u32,
}

impl Command {
    #[must_use]
    pub fn new(client_id: u32, seq: u32) -> Self {
        Self { client_id, seq }
    }

    /// Content hash: `SHA-256(client_id_le || seq_le)`.
    #[must_use]
    pub fn hash(&self) -> CommandHash {
        let mut hasher = Sha256::new();
        hasher.update(self.client_id.to_le_bytes());
        hasher.update(self.seq.to_le_bytes());
        CommandHash(hasher.finalize().into())
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<cmd cid={} seq={} hash={}>", self.client_id, self.seq, self.hash().short())
    }
}

/// Commit notice for a single command.
///
/// `cmd_height` is the ordering witness used for fairness scoring;
/// `cmd_idx` is the command's position inside the committed block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finality {
    /// Replica that produced this notice.
    pub replica_id: u16,
    /// 1 = committed, 0 = undecided, -1 = rejected.
    pub decision: i8,
    /// Index of the command within its block.
    pub cmd_idx: u32,
    /// Height of the block that committed the command.
    pub cmd_height: u32,
    /// Hash of the command this notice is about.
    pub cmd_hash: CommandHash,
    /// Hash of the committing block.
    pub blk_hash: BlockHash,
}

impl Finality {
    /// A committed notice for `cmd_hash` at `(height, idx)`.
    #[must_use]
    pub fn committed(replica_id: u16, cmd_hash: CommandHash, cmd_height: u32, cmd_idx: u32) -> Self {
        Self {
            replica_id,
            decision: 1,
            cmd_idx,
            cmd_height,
            cmd_hash,
            blk_hash: [0u8; 32],
        }
    }

    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.decision == 1
    }
}

impl fmt::Display for Finality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<fin rid={} decision={} cmd_idx={} cmd_height={} cmd={}>",
            self.replica_id,
            self.decision,
            self.cmd_idx,
            self.cmd_height,
            self.cmd_hash.short()
        )
    }
}
