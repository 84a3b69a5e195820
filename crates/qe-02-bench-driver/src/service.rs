//! # Benchmark Driver
//!
//! Closed-loop pipelining of paired commands over two replica sets.
//!
//! ```text
//!            try_send (open pairs < W, budget left)
//!  ┌──────────────┐ weak cmd  ──→ every weak replica
//!  │ pair p       │
//!  └──────────────┘ strong cmd ──→ every strong replica
//!         │
//!  acks ──┴─→ on_response ── distinct acks > nfaulty(path) ──→ finished[path]
//!                                                   │
//!                                                   └─→ fill_window
//! ```
//!
//! The driver is single-threaded: the event loop owns it and hands it to
//! each handler by `&mut`. A pair holds its window slot until both siblings
//! are confirmed, so at most `2 * W` commands are ever waiting.

use serde::Serialize;
use shared_types::{Command, CommandHash, Finality};
use std::collections::HashMap;
use tracing::{debug, trace};

use crate::domain::{
    score, FairnessReport, IterationBudget, LatencySummary, PairIndex, Path, QuorumThreshold,
    Request, ResolvedRequest, ResponderId,
};
use crate::error::{BenchError, BenchResult};
use crate::ports::{AckOutcome, BenchDriverApi, ReplicaFanout};

/// Driver parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Client id stamped on every command.
    pub client_id: u32,
    /// Maximum pairs with an unconfirmed sibling.
    pub window: usize,
    pub budget: IterationBudget,
}

impl DriverConfig {
    /// Fails on a zero window, which could never issue a pair.
    pub fn new(client_id: u32, window: usize, budget: IterationBudget) -> BenchResult<Self> {
        if window == 0 {
            return Err(BenchError::ZeroWindow);
        }
        Ok(Self {
            client_id,
            window,
            budget,
        })
    }
}

/// Acknowledgement and issuance counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DriverCounters {
    pub pairs_issued: u64,
    pub acks_received: u64,
    pub acks_unknown: u64,
    pub acks_duplicate: u64,
    pub weak_confirmed: u64,
    pub strong_confirmed: u64,
}

impl DriverCounters {
    /// Commands confirmed on either path.
    #[must_use]
    pub fn confirmed(&self) -> u64 {
        self.weak_confirmed + self.strong_confirmed
    }
}

/// Everything a finished run produced.
#[derive(Debug, Clone, Serialize)]
pub struct BenchResults {
    pub client_id: u32,
    pub weak_quorum: QuorumThreshold,
    pub strong_quorum: QuorumThreshold,
    pub counters: DriverCounters,
    /// Commands still waiting when the run ended; not scored.
    pub unresolved: usize,
    pub fairness: FairnessReport,
    pub weak_latency: LatencySummary,
    pub strong_latency: LatencySummary,
}

/// The dual-path benchmark driver.
pub struct BenchDriver<F> {
    config: DriverConfig,
    budget: IterationBudget,
    fanout: F,
    weak_quorum: QuorumThreshold,
    strong_quorum: QuorumThreshold,
    next_seq: Option<u32>,
    waiting: HashMap<CommandHash, Request>,
    /// Unconfirmed siblings per open pair.
    open_pairs: HashMap<PairIndex, u8>,
    weak_finished: Vec<ResolvedRequest>,
    strong_finished: Vec<ResolvedRequest>,
    counters: DriverCounters,
}

impl<F: ReplicaFanout> BenchDriver<F> {
    /// Build a driver. Quorum thresholds come from each path's replica count.
    pub fn new(config: DriverConfig, fanout: F) -> BenchResult<Self> {
        let weak_replicas = fanout.replica_count(Path::Weak);
        let strong_replicas = fanout.replica_count(Path::Strong);
        if weak_replicas == 0 {
            return Err(BenchError::NoReplicas { path: Path::Weak });
        }
        if strong_replicas == 0 {
            return Err(BenchError::NoReplicas { path: Path::Strong });
        }

        let weak_quorum = QuorumThreshold::for_replicas(weak_replicas);
        let strong_quorum = QuorumThreshold::for_replicas(strong_replicas);
        debug!(
            weak_replicas,
            weak_nfaulty = weak_quorum.nfaulty(),
            strong_replicas,
            strong_nfaulty = strong_quorum.nfaulty(),
            window = config.window,
            "Benchmark driver ready"
        );

        Ok(Self {
            config,
            budget: config.budget,
            fanout,
            weak_quorum,
            strong_quorum,
            next_seq: Some(0),
            waiting: HashMap::new(),
            open_pairs: HashMap::new(),
            weak_finished: Vec::new(),
            strong_finished: Vec::new(),
            counters: DriverCounters::default(),
        })
    }

    #[must_use]
    pub fn quorum(&self, path: Path) -> QuorumThreshold {
        match path {
            Path::Weak => self.weak_quorum,
            Path::Strong => self.strong_quorum,
        }
    }

    /// Commands awaiting quorum.
    #[must_use]
    pub fn waiting_len(&self) -> usize {
        self.waiting.len()
    }

    /// Pairs holding a window slot.
    #[must_use]
    pub fn open_pairs(&self) -> usize {
        self.open_pairs.len()
    }

    #[must_use]
    pub fn counters(&self) -> DriverCounters {
        self.counters
    }

    #[must_use]
    pub fn budget(&self) -> IterationBudget {
        self.budget
    }

    #[must_use]
    pub fn finished(&self, path: Path) -> &[ResolvedRequest] {
        match path {
            Path::Weak => &self.weak_finished,
            Path::Strong => &self.strong_finished,
        }
    }

    #[must_use]
    pub fn fanout(&self) -> &F {
        &self.fanout
    }

    pub fn fanout_mut(&mut self) -> &mut F {
        &mut self.fanout
    }

    /// Stop the run: score what was confirmed, count what was not.
    #[must_use]
    pub fn finish(self) -> BenchResults {
        let weak_latency = LatencySummary::from_durations(self.weak_finished.iter().map(|r| r.latency));
        let strong_latency =
            LatencySummary::from_durations(self.strong_finished.iter().map(|r| r.latency));
        BenchResults {
            client_id: self.config.client_id,
            weak_quorum: self.weak_quorum,
            strong_quorum: self.strong_quorum,
            counters: self.counters,
            unresolved: self.waiting.len(),
            fairness: score(self.weak_finished, self.strong_finished),
            weak_latency,
            strong_latency,
        }
    }

    fn broadcast(&mut self, path: Path, cmd: &Command) -> BenchResult<()> {
        if self.fanout.broadcast(path, cmd) == 0 {
            return Err(BenchError::PathUnreachable { path, seq: cmd.seq });
        }
        Ok(())
    }

    fn close_sibling(&mut self, pair: PairIndex) {
        if let Some(open) = self.open_pairs.get_mut(&pair) {
            *open = open.saturating_sub(1);
            if *open == 0 {
                self.open_pairs.remove(&pair);
            }
        }
    }
}

impl<F: ReplicaFanout> BenchDriverApi for BenchDriver<F> {
    fn try_send(&mut self) -> BenchResult<bool> {
        if self.open_pairs.len() >= self.config.window || self.budget.is_exhausted() {
            return Ok(false);
        }
        let issued = self.counters.pairs_issued;
        let (weak_seq, strong_seq) = self
            .next_seq
            .and_then(|seq| Some((seq, seq.checked_add(1)?)))
            .ok_or(BenchError::SequenceExhausted { issued })?;

        let pair = weak_seq / 2;
        let weak = Command::new(self.config.client_id, weak_seq);
        let strong = Command::new(self.config.client_id, strong_seq);
        // Track the pair only once both paths accepted it.
        self.broadcast(Path::Weak, &weak)?;
        self.broadcast(Path::Strong, &strong)?;
        self.waiting.insert(weak.hash(), Request::new(pair, Path::Weak, weak));
        self.waiting.insert(strong.hash(), Request::new(pair, Path::Strong, strong));

        self.open_pairs.insert(pair, 2);
        self.next_seq = strong_seq.checked_add(1);
        self.budget.take();
        self.counters.pairs_issued += 1;
        trace!(
            pair,
            weak = %weak.hash().short(),
            strong = %strong.hash().short(),
            "Issued pair"
        );
        Ok(true)
    }

    fn fill_window(&mut self) -> BenchResult<usize> {
        let mut issued = 0;
        while self.try_send()? {
            issued += 1;
        }
        Ok(issued)
    }

    fn on_response(&mut self, responder: ResponderId, fin: &Finality) -> BenchResult<AckOutcome> {
        self.counters.acks_received += 1;
        let Some(req) = self.waiting.get_mut(&fin.cmd_hash) else {
            self.counters.acks_unknown += 1;
            trace!(cmd_hash = %fin.cmd_hash.short(), responder, "Ack for nothing waiting");
            return Ok(AckOutcome::Unknown);
        };
        if !req.acknowledge(responder) {
            self.counters.acks_duplicate += 1;
            return Ok(AckOutcome::Duplicate);
        }

        let quorum = match req.path {
            Path::Weak => self.weak_quorum,
            Path::Strong => self.strong_quorum,
        };
        let acks = req.ack_count();
        if !quorum.is_met(acks) {
            return Ok(AckOutcome::Pending {
                acks,
                required: quorum.required(),
            });
        }

        let Some(req) = self.waiting.remove(&fin.cmd_hash) else {
            return Ok(AckOutcome::Unknown);
        };
        let resolved = req.resolve(fin);
        match resolved.path {
            Path::Weak => {
                self.counters.weak_confirmed += 1;
                self.weak_finished.push(resolved.clone());
            }
            Path::Strong => {
                self.counters.strong_confirmed += 1;
                self.strong_finished.push(resolved.clone());
            }
        }
        self.close_sibling(resolved.pair);
        self.fill_window()?;
        Ok(AckOutcome::Confirmed(resolved))
    }

    fn is_complete(&self) -> bool {
        self.budget.is_exhausted() && self.waiting.is_empty()
    }
}
