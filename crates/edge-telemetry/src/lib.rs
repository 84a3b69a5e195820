//! # Edge Telemetry
//!
//! Logging and metrics shared by the `speedbump` relay and the `dual-bench`
//! driver.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use edge_telemetry::{init_logging, register_metrics, TelemetryConfig};
//!
//! fn main() -> anyhow::Result<()> {
//!     init_logging(&TelemetryConfig::for_service("speedbump"))?;
//!     register_metrics()?;
//!     // ...
//!     Ok(())
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `EDGE_LOG_LEVEL` | `info` | Log filter (falls back to `RUST_LOG`) |
//! | `EDGE_JSON_LOGS` | `false` | Emit one JSON object per line |
//! | `EDGE_SERVICE_NAME` | `quorum-edge` | Service name in the startup log |

#![cfg_attr(test, allow(clippy::unwrap_used))]

mod config;
mod logging;
pub mod metrics;

pub use config::TelemetryConfig;
pub use logging::init_logging;
pub use metrics::{
    gather_text, register_metrics, BENCH_ACKS_IGNORED, BENCH_CONFIRMED, BENCH_PAIRS_ISSUED,
    RELAY_DROPPED, RELAY_FORWARDED, RELAY_RETURNED,
};

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to initialize logging: {0}")]
    LoggingInit(String),

    #[error("Failed to initialize Prometheus metrics: {0}")]
    MetricsInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Convenience macro for recording a metric increment.
#[macro_export]
macro_rules! metric_inc {
    ($metric:expr) => {
        $metric.inc()
    };
    ($metric:expr, $labels:expr) => {
        $metric.with_label_values($labels).inc()
    };
}
