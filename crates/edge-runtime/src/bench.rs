//! # Dual-Bench Runtime
//!
//! One event loop on the caller's runtime drives the [`BenchDriver`]:
//!
//! 1. Connect to every replica of both paths (fatal on failure)
//! 2. Fill the window
//! 3. Count acknowledgements until the budget is spent and nothing waits,
//!    or until `shutdown` resolves
//! 4. Score what was confirmed
//!
//! Acknowledgements are attributed to the connection they arrived on, so one
//! replica counts at most once per command.

use anyhow::{Context, Result};
use edge_telemetry::{
    log_cmd_event, log_peer_event, metric_inc, BENCH_ACKS_IGNORED, BENCH_CONFIRMED,
    BENCH_PAIRS_ISSUED,
};
use qe_02_bench_driver::{AckOutcome, BenchDriver, BenchDriverApi, BenchError, BenchResults, Path};
use shared_net::{Connection, LoopExit, MsgNetwork, NetConfig};
use shared_types::RespCmd;
use std::future::Future;
use std::ops::ControlFlow;
use tracing::{debug, error, info};

use crate::adapters::ConnectionSets;
use crate::config::BenchConfig;

/// State owned by the benchmark's event loop.
struct BenchState {
    driver: BenchDriver<ConnectionSets>,
    error: Option<BenchError>,
}

fn on_resp_cmd(state: &mut BenchState, msg: RespCmd, conn: &Connection) -> ControlFlow<()> {
    match state.driver.on_response(conn.id(), &msg.fin) {
        Ok(AckOutcome::Confirmed(resolved)) => {
            metric_inc!(BENCH_CONFIRMED, &[resolved.path.as_str()]);
            log_cmd_event!(
                debug,
                "bench",
                "Command confirmed",
                msg.fin.cmd_hash.short(),
                pair = resolved.pair,
                path = %resolved.path,
                height = resolved.height,
                acks = resolved.acks
            );
        }
        Ok(AckOutcome::Unknown) => metric_inc!(BENCH_ACKS_IGNORED, &["unknown"]),
        Ok(AckOutcome::Duplicate) => metric_inc!(BENCH_ACKS_IGNORED, &["duplicate"]),
        Ok(AckOutcome::Pending { .. }) => {}
        Err(e) => {
            error!(error = %e, "Benchmark aborted");
            state.error = Some(e);
            return ControlFlow::Break(());
        }
    }
    if state.driver.is_complete() {
        ControlFlow::Break(())
    } else {
        ControlFlow::Continue(())
    }
}

/// How a benchmark run ended.
#[derive(Debug)]
pub struct BenchRun {
    /// Scores over everything confirmed before the run ended.
    pub results: BenchResults,
    /// Set when the driver gave up early, e.g. a path became unreachable.
    pub aborted: Option<BenchError>,
}

impl BenchState {
    fn into_run(self) -> BenchRun {
        let results = self.driver.finish();
        info!(
            confirmed = results.counters.confirmed(),
            unresolved = results.unresolved,
            strong_score = results.fairness.strong_score,
            weak_score = results.fairness.weak_score,
            aborted = self.error.is_some(),
            "Benchmark finished"
        );
        BenchRun {
            results,
            aborted: self.error,
        }
    }
}

/// Run one benchmark to completion or until `shutdown` resolves.
///
/// Commands still waiting when the run ends are reported as unresolved and
/// left out of the fairness score. A driver error after the connections are
/// up ends the run early but still returns what was confirmed so far.
pub async fn run_benchmark<F>(config: &BenchConfig, shutdown: F) -> Result<BenchRun>
where
    F: Future<Output = ()>,
{
    let mut net: MsgNetwork<BenchState> =
        MsgNetwork::new(NetConfig::default().with_max_msg_size(config.max_msg_size));
    net.reg_handler::<RespCmd, _>(on_resp_cmd)?;
    net.on_disconnect(|state, conn| {
        log_peer_event!(
            warn,
            "bench",
            "Replica disconnected",
            conn.peer_addr(),
            replica = ?state.driver.fanout().replica_of(conn.id())
        );
        ControlFlow::Continue(())
    });

    let sets = ConnectionSets::connect(&net.handle(), &config.weak, &config.strong)
        .await
        .context("connecting to replicas")?;
    let driver = BenchDriver::new(config.driver_config()?, sets)?;
    let mut state = BenchState {
        driver,
        error: None,
    };

    info!(
        client_id = config.client_id,
        window = config.max_async,
        iter = config.iter,
        weak_quorum = state.driver.quorum(Path::Weak).required(),
        strong_quorum = state.driver.quorum(Path::Strong).required(),
        "Benchmark starting"
    );

    match state.driver.fill_window() {
        Ok(issued) => debug!(issued, "Window filled"),
        Err(e) => {
            error!(error = %e, "Benchmark aborted");
            state.error = Some(e);
        }
    }

    if state.error.is_none() && !state.driver.is_complete() {
        match net.run(&mut state, shutdown).await {
            LoopExit::Shutdown => {
                info!(waiting = state.driver.waiting_len(), "Benchmark interrupted")
            }
            LoopExit::Stopped => debug!("Benchmark loop stopped"),
        }
    }

    BENCH_PAIRS_ISSUED.inc_by(state.driver.counters().pairs_issued);
    Ok(state.into_run())
}
