//! # Request Lifecycle
//!
//! ```text
//! ISSUED ──ack (count ≤ nfaulty)──→ ISSUED
//!    │
//!    └──ack (count > nfaulty)──→ RESOLVED(height, index) ──score──→ SCORED
//! ```
//!
//! A [`Request`] is live in the driver's waiting map; resolving consumes it
//! and yields an immutable [`ResolvedRequest`].

use serde::Serialize;
use shared_types::{Command, Finality};
use std::collections::HashSet;
use std::fmt;
use std::time::{Duration, Instant};

/// Index shared by the weak and strong command of one iteration.
pub type PairIndex = u32;

/// Identifies who sent an acknowledgement (a connection id).
pub type ResponderId = u64;

/// Which replica set a command was sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Path {
    Weak,
    Strong,
}

impl Path {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Path::Weak => "weak",
            Path::Strong => "strong",
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outstanding command awaiting quorum.
#[derive(Debug, Clone)]
pub struct Request {
    pub pair: PairIndex,
    pub path: Path,
    pub cmd: Command,
    acks: HashSet<ResponderId>,
    issued_at: Instant,
}

impl Request {
    #[must_use]
    pub fn new(pair: PairIndex, path: Path, cmd: Command) -> Self {
        Self {
            pair,
            path,
            cmd,
            acks: HashSet::new(),
            issued_at: Instant::now(),
        }
    }

    /// Count an acknowledgement. Returns `false` if `responder` already
    /// acknowledged this command.
    pub fn acknowledge(&mut self, responder: ResponderId) -> bool {
        self.acks.insert(responder)
    }

    #[must_use]
    pub fn ack_count(&self) -> usize {
        self.acks.len()
    }

    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.issued_at.elapsed()
    }

    /// Stop the stopwatch and take the ordering witness from `fin`.
    #[must_use]
    pub fn resolve(self, fin: &Finality) -> ResolvedRequest {
        ResolvedRequest {
            pair: self.pair,
            path: self.path,
            seq: self.cmd.seq,
            height: fin.cmd_height,
            index: fin.cmd_idx,
            acks: self.acks.len(),
            latency: self.issued_at.elapsed(),
        }
    }
}

/// A confirmed command. Never mutated after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRequest {
    pub pair: PairIndex,
    pub path: Path,
    pub seq: u32,
    /// Block height the quorum-crossing acknowledgement reported.
    pub height: u32,
    /// Position inside that block.
    pub index: u32,
    /// Distinct acknowledgements at resolution.
    pub acks: usize,
    pub latency: Duration,
}
