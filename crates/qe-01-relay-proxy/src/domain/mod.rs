//! Relay domain: the correlation table shared by both event loops and the
//! relay's traffic counters.

pub mod correlation;
pub mod stats;

pub use correlation::CorrelationTable;
pub use stats::{RelayStats, RelayStatsSnapshot};
