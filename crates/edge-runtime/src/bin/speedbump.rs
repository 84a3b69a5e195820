//! Speedbump relay executable.
//!
//! ```text
//! speedbump relay.toml node.toml --idx 0
//! ```

use anyhow::{bail, Context, Result};
use clap::Parser;
use edge_runtime::config::{RelayArgs, RelayConfig};
use edge_runtime::signal::interrupted;
use edge_runtime::Speedbump;
use edge_telemetry::{gather_text, init_logging, register_metrics, TelemetryConfig};
use tracing::{debug, error, info};

fn main() -> Result<()> {
    let args = RelayArgs::parse();
    init_logging(&TelemetryConfig::for_service("speedbump"))?;
    register_metrics()?;

    let config = RelayConfig::resolve(&args).context("loading relay configuration")?;
    let mut relay = Speedbump::start(&config)?;

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("building signal runtime")?;
    let failed = rt.block_on(async {
        tokio::select! {
            () = interrupted() => false,
            () = relay.failed() => true,
        }
    });

    let stats = relay.stop();
    if let Ok(metrics) = gather_text() {
        debug!(%metrics, "Final metrics");
    }
    if failed {
        error!(pending = relay.pending(), "Speedbump lost an event loop");
        bail!("relay stopped after losing its node connection");
    }
    info!(forwarded = stats.forwarded, returned = stats.returned, "Exiting");
    Ok(())
}
