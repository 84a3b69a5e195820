//! # Quorum Threshold
//!
//! With `n` replicas a BFT cluster tolerates `f = (n - 1) / 3` faulty ones.
//! `f + 1` matching acknowledgements guarantee at least one came from an
//! honest replica, so that is when a command counts as confirmed.

use serde::Serialize;

/// Fault threshold of one replica set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuorumThreshold {
    replicas: usize,
    nfaulty: usize,
}

impl QuorumThreshold {
    #[must_use]
    pub fn for_replicas(replicas: usize) -> Self {
        Self {
            replicas,
            nfaulty: replicas.saturating_sub(1) / 3,
        }
    }

    #[must_use]
    pub fn replicas(&self) -> usize {
        self.replicas
    }

    /// Faulty replicas tolerated.
    #[must_use]
    pub fn nfaulty(&self) -> usize {
        self.nfaulty
    }

    /// Acknowledgements needed to confirm, `nfaulty + 1`.
    #[must_use]
    pub fn required(&self) -> usize {
        self.nfaulty + 1
    }

    /// Whether `acks` distinct acknowledgements confirm a command.
    #[must_use]
    pub fn is_met(&self, acks: usize) -> bool {
        acks > self.nfaulty
    }
}
