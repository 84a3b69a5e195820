//! Benchmark result rendering.
//!
//! The text form keeps the line prefixes downstream scripts grep for:
//!
//! ```text
//! [DEBUG] client0 receives 200 consensus responses, 100 weak + 100 strong
//! [RESULT] idx=0, strong=3, weak=4
//! [RESULT] strong score=71, weak score=20, factor=3.550, total=100
//! ```

use anyhow::{Context, Result};
use qe_02_bench_driver::{BenchResults, LatencySummary, Path as BenchPath};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

/// Compared pairs printed individually.
const SHOWN_PAIRS: usize = 5;

/// Render the human-readable report.
#[must_use]
pub fn render_text(results: &BenchResults) -> String {
    let mut out = String::new();
    let c = &results.counters;
    let f = &results.fairness;

    let _ = writeln!(
        out,
        "[DEBUG] client{} receives {} consensus responses, {} weak + {} strong",
        results.client_id,
        c.confirmed(),
        c.weak_confirmed,
        c.strong_confirmed
    );
    for pair in f.pairs.iter().take(SHOWN_PAIRS) {
        let _ = writeln!(
            out,
            "[RESULT] idx={}, strong={}, weak={}",
            pair.pair, pair.strong_height, pair.weak_height
        );
    }
    let factor = f
        .ratio()
        .map_or_else(|| "n/a".to_string(), |r| format!("{r:.3}"));
    let _ = writeln!(
        out,
        "[RESULT] strong score={}, weak score={}, factor={}, total={}, ties={}",
        f.strong_score,
        f.weak_score,
        factor,
        f.total(),
        f.ties
    );
    let _ = writeln!(
        out,
        "[RESULT] unresolved={}, weak only={}, strong only={}",
        results.unresolved, f.weak_only, f.strong_only
    );
    for (path, latency) in [
        (BenchPath::Weak, &results.weak_latency),
        (BenchPath::Strong, &results.strong_latency),
    ] {
        render_latency(&mut out, path, latency);
    }
    out
}

fn render_latency(out: &mut String, path: BenchPath, l: &LatencySummary) {
    let _ = writeln!(
        out,
        "[LATENCY] {path}: n={}, mean={:.1}us, p50={}us, p99={}us, max={}us",
        l.count, l.mean_us, l.p50_us, l.p99_us, l.max_us
    );
}

#[derive(Serialize)]
struct JsonReport<'a> {
    #[serde(flatten)]
    results: &'a BenchResults,
    /// `null` when the weak path never won a pair.
    ratio: Option<f64>,
}

/// Write the results as pretty-printed JSON.
pub fn write_json(results: &BenchResults, path: &Path) -> Result<()> {
    let report = JsonReport {
        results,
        ratio: results.fairness.ratio(),
    };
    let json = serde_json::to_string_pretty(&report).context("serializing results")?;
    std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))
}
