//! Benchmark domain: quorum arithmetic, the request lifecycle, the iteration
//! budget, fairness scoring and latency summaries.
//!
//! Nothing here touches the network.

pub mod budget;
pub mod fairness;
pub mod latency;
pub mod quorum;
pub mod request;

pub use budget::IterationBudget;
pub use fairness::{score, FairnessReport, PairResult};
pub use latency::LatencySummary;
pub use quorum::QuorumThreshold;
pub use request::{PairIndex, Path, Request, ResolvedRequest, ResponderId};
