//! Driving Ports (API - Inbound)
//!
//! Called from the benchmark's event loop: once at startup to fill the
//! window, then once per acknowledgement received.

use shared_types::Finality;

use crate::domain::{ResolvedRequest, ResponderId};
use crate::error::BenchResult;

/// Effect of one acknowledgement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckOutcome {
    /// Hash not waiting: never sent, or already confirmed.
    Unknown,
    /// This responder already acknowledged the command.
    Duplicate,
    /// Counted; quorum not reached yet.
    Pending { acks: usize, required: usize },
    /// This acknowledgement crossed the quorum threshold.
    Confirmed(ResolvedRequest),
}

/// Primary benchmark driver API.
pub trait BenchDriverApi {
    /// Issue one pair if the window and the budget allow. Returns whether a
    /// pair was issued.
    fn try_send(&mut self) -> BenchResult<bool>;

    /// Issue pairs until the window is full or the budget runs out. Returns
    /// the number of pairs issued.
    fn fill_window(&mut self) -> BenchResult<usize>;

    /// Count an acknowledgement and refill the window on confirmation.
    fn on_response(&mut self, responder: ResponderId, fin: &Finality) -> BenchResult<AckOutcome>;

    /// Budget spent and nothing left waiting.
    fn is_complete(&self) -> bool;
}
