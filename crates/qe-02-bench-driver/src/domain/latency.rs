//! Latency summary over confirmed requests.

use serde::Serialize;
use std::time::Duration;

/// Confirmation latency statistics in microseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LatencySummary {
    pub count: usize,
    pub mean_us: f64,
    pub p50_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

impl LatencySummary {
    #[must_use]
    pub fn from_durations<I>(samples: I) -> Self
    where
        I: IntoIterator<Item = Duration>,
    {
        let mut micros: Vec<u64> = samples
            .into_iter()
            .map(|d| u64::try_from(d.as_micros()).unwrap_or(u64::MAX))
            .collect();
        if micros.is_empty() {
            return Self::default();
        }
        micros.sort_unstable();

        let count = micros.len();
        let sum: f64 = micros.iter().map(|&us| us as f64).sum();
        Self {
            count,
            mean_us: sum / count as f64,
            p50_us: percentile(&micros, 50),
            p99_us: percentile(&micros, 99),
            max_us: micros[count - 1],
        }
    }
}

// Nearest-rank percentile over sorted samples.
fn percentile(sorted: &[u64], pct: usize) -> u64 {
    let rank = (pct * sorted.len()).div_ceil(100).max(1);
    sorted[rank - 1]
}
