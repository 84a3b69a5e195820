//! Prometheus counters for the relay and the benchmark driver.
//!
//! All metrics follow the naming convention: `edge_<component>_<metric>_total`
//! and live in a private registry. Nothing is exported over HTTP; binaries
//! render [`gather_text`] into their shutdown log.

use lazy_static::lazy_static;
use prometheus::{Encoder, IntCounter, IntCounterVec, Opts, Registry, TextEncoder};

use crate::TelemetryError;

lazy_static! {
    /// Registry holding every edge metric
    pub static ref REGISTRY: Registry = Registry::new();

    // =========================================================================
    // RELAY METRICS
    // =========================================================================

    /// Client requests forwarded to the node
    pub static ref RELAY_FORWARDED: IntCounter = IntCounter::new(
        "edge_relay_forwarded_total",
        "Client requests forwarded to the upstream node"
    ).expect("metric creation failed");

    /// Node responses delivered back to a client
    pub static ref RELAY_RETURNED: IntCounter = IntCounter::new(
        "edge_relay_returned_total",
        "Node responses relayed back to the originating client"
    ).expect("metric creation failed");

    /// Node responses with no live correlation entry
    pub static ref RELAY_DROPPED: IntCounter = IntCounter::new(
        "edge_relay_dropped_total",
        "Node responses dropped for lack of a correlation entry"
    ).expect("metric creation failed");

    // =========================================================================
    // BENCHMARK METRICS
    // =========================================================================

    /// Command pairs issued
    pub static ref BENCH_PAIRS_ISSUED: IntCounter = IntCounter::new(
        "edge_bench_pairs_issued_total",
        "Paired commands issued on both paths"
    ).expect("metric creation failed");

    /// Commands that reached quorum, by path
    pub static ref BENCH_CONFIRMED: IntCounterVec = IntCounterVec::new(
        Opts::new("edge_bench_confirmed_total", "Commands confirmed by a quorum"),
        &["path"]  // path: weak/strong
    ).expect("metric creation failed");

    /// Acknowledgements that changed nothing
    pub static ref BENCH_ACKS_IGNORED: IntCounterVec = IntCounterVec::new(
        Opts::new("edge_bench_acks_ignored_total", "Acknowledgements that did not advance any command"),
        &["reason"]  // reason: unknown/duplicate
    ).expect("metric creation failed");
}

/// Register all metrics with [`REGISTRY`]. Calling it again is a no-op.
pub fn register_metrics() -> Result<(), TelemetryError> {
    let metrics: Vec<Box<dyn prometheus::core::Collector>> = vec![
        // Relay
        Box::new(RELAY_FORWARDED.clone()),
        Box::new(RELAY_RETURNED.clone()),
        Box::new(RELAY_DROPPED.clone()),
        // Benchmark
        Box::new(BENCH_PAIRS_ISSUED.clone()),
        Box::new(BENCH_CONFIRMED.clone()),
        Box::new(BENCH_ACKS_IGNORED.clone()),
    ];

    for metric in metrics {
        match REGISTRY.register(metric) {
            Ok(()) | Err(prometheus::Error::AlreadyReg) => {}
            Err(e) => return Err(TelemetryError::MetricsInit(e.to_string())),
        }
    }
    Ok(())
}

/// Encode all registered metrics in the Prometheus text format.
pub fn gather_text() -> Result<String, TelemetryError> {
    let encoder = TextEncoder::new();
    let mut buffer = Vec::new();
    encoder
        .encode(&REGISTRY.gather(), &mut buffer)
        .map_err(|e| TelemetryError::MetricsInit(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| TelemetryError::MetricsInit(e.to_string()))
}
