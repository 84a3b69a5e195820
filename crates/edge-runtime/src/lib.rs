//! # Edge Runtime
//!
//! Wiring between the subsystems and the network substrate, shared by the
//! `speedbump` and `dual-bench` executables.
//!
//! ## Modular Structure
//!
//! - `config/` - TOML files plus command-line overrides, validated up front
//! - `adapters/` - outbound port implementations over `shared-net`
//! - `relay` - the relay's two event loops and their lifecycle
//! - `bench` - the benchmark's event loop
//! - `report` - text and JSON rendering of benchmark results
//! - `signal` - termination signal handling
//!
//! ## Topology
//!
//! ```text
//!  dual-bench ──weak──→ speedbump[0..n] ──→ node[0..n]
//!       │
//!       └──────strong─────────────────────→ node[0..n]
//! ```
//!
//! The weak path goes through one relay per node; the strong path reaches the
//! nodes directly. Both carry the same commands, paired by sequence number.

#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

pub mod adapters;
pub mod bench;
pub mod config;
pub mod relay;
pub mod report;
pub mod signal;

pub use bench::{run_benchmark, BenchRun};
pub use relay::{Relay, Speedbump};
