//! Loopback integration flows.

pub mod fake_replica;

mod bench_flow;
mod relay_flow;
