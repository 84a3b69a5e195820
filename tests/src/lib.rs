//! # Quorum-Edge Test Suite
//!
//! Unified test crate for flows that span several crates over real sockets.
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── fake_replica.rs   # Scripted consensus replica on loopback
//! │   ├── relay_flow.rs     # Client → speedbump → node → client
//! │   └── bench_flow.rs     # dual-bench against weak and strong sets
//! │
//! └── benches/
//!     └── edge_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p qe-tests
//!
//! # By flow
//! cargo test -p qe-tests integration::relay_flow
//! cargo test -p qe-tests integration::bench_flow
//!
//! # Benchmarks
//! cargo bench -p qe-tests
//! ```

#![allow(dead_code)]

pub mod integration;
