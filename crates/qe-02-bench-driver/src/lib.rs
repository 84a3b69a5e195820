//! # qe-02-bench-driver
//!
//! Dual-path order-fairness benchmark.
//!
//! ## Overview
//!
//! Each iteration issues a *pair*: one command to every replica of the weak
//! path and one to every replica of the strong path, sharing a pair index.
//! A command is confirmed once `nfaulty + 1` distinct replicas of its path
//! acknowledged it. When the run ends, pairs confirmed on both paths are
//! compared by the block height each path reported: the lower height wins.
//!
//! ## Window
//!
//! At most `W` pairs may have an unconfirmed sibling. Every confirmation
//! immediately tops the window back up (closed-loop pipelining).
//!
//! ## Example
//!
//! ```rust,ignore
//! use qe_02_bench_driver::{BenchDriver, BenchDriverApi, DriverConfig, IterationBudget};
//!
//! let config = DriverConfig::new(cid, max_async, IterationBudget::from_iter_count(iter))?;
//! let mut driver = BenchDriver::new(config, fanout)?;
//! driver.fill_window()?;
//!
//! // for every RespCmd received on connection `conn_id`
//! driver.on_response(conn_id, &fin)?;
//!
//! let results = driver.finish();
//! println!("strong={} weak={}", results.fairness.strong_score, results.fairness.weak_score);
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use domain::{
    score, FairnessReport, IterationBudget, LatencySummary, PairIndex, PairResult, Path,
    QuorumThreshold, ResolvedRequest, ResponderId,
};
pub use error::{BenchError, BenchResult};
pub use ports::{AckOutcome, BenchDriverApi, ReplicaFanout};
pub use service::{BenchDriver, BenchResults, DriverConfig, DriverCounters};
