//! Ports for the benchmark driver.

pub mod inbound;
pub mod outbound;

pub use inbound::{AckOutcome, BenchDriverApi};
pub use outbound::ReplicaFanout;
