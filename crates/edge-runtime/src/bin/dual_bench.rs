//! Dual-path fairness benchmark executable.
//!
//! ```text
//! dual-bench weak.toml strong.toml --iter 1000 --max-async 10
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use edge_runtime::config::{BenchArgs, BenchConfig};
use edge_runtime::report::{render_text, write_json};
use edge_runtime::run_benchmark;
use edge_runtime::signal::interrupted;
use edge_telemetry::{gather_text, init_logging, register_metrics, TelemetryConfig};
use tracing::{debug, info};

fn main() -> Result<()> {
    let args = BenchArgs::parse();
    init_logging(&TelemetryConfig::for_service("dual-bench"))?;
    register_metrics()?;

    let config = BenchConfig::resolve(&args).context("loading benchmark configuration")?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building runtime")?;
    let run = rt.block_on(run_benchmark(&config, interrupted()))?;
    let results = &run.results;

    print!("{}", render_text(results));
    if let Some(path) = &config.results_json {
        write_json(results, path)?;
        info!(path = %path.display(), "Results written");
    }
    if let Ok(metrics) = gather_text() {
        debug!(%metrics, "Final metrics");
    }
    match run.aborted {
        Some(e) => Err(anyhow::Error::new(e).context("benchmark aborted")),
        None => Ok(()),
    }
}
