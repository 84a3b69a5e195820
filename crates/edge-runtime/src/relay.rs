//! # Speedbump Runtime
//!
//! Two event loops, two threads:
//!
//! ```text
//!            thread "relay-client"                    thread "relay-node"
//!  clients ─→ client MsgNetwork ──ReqCmd──→ node ─→ node MsgNetwork
//!     ↑       (I/O on clinworker threads)            (current_thread runtime)
//!     │                 │                                   │
//!     │                 └──────── Arc<RelayService> ────────┘
//!     │                         (CorrelationTable)          │
//!     └──────────────────────────RespCmd────────────────────┘
//! ```
//!
//! ## Startup
//!
//! 1. Connect to the node (fatal on failure, no fallback)
//! 2. Register one handler per message type on each side
//! 3. Listen for clients
//! 4. Start both loops
//!
//! ## Shutdown
//!
//! [`Speedbump::stop`] signals both loops and joins both threads before
//! returning. Losing the node connection stops the node loop and resolves
//! [`Speedbump::failed`]; the process is expected to stop and exit.

use anyhow::{Context, Result};
use edge_telemetry::{
    log_peer_event, metric_inc, RELAY_DROPPED, RELAY_FORWARDED, RELAY_RETURNED,
};
use qe_01_relay_proxy::{RelayApi, RelayError, RelayService, RelayStatsSnapshot, ResponseOutcome};
use shared_net::{LoopExit, MsgNetwork};
use shared_types::{ReqCmd, RespCmd};
use std::net::SocketAddr;
use std::ops::ControlFlow;
use std::sync::Arc;
use std::thread::JoinHandle;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::adapters::{ClientNetworkLink, NodeConnectionLink};
use crate::config::RelayConfig;

/// The relay service as wired by this runtime.
pub type Relay = RelayService<NodeConnectionLink, ClientNetworkLink>;

/// A running relay.
pub struct Speedbump {
    relay: Arc<Relay>,
    listen_addr: SocketAddr,
    stop_tx: watch::Sender<bool>,
    failed_rx: watch::Receiver<bool>,
    node_thread: Option<JoinHandle<LoopExit>>,
    client_thread: Option<JoinHandle<LoopExit>>,
}

impl Speedbump {
    /// Connect to the node, start listening, spawn both loops.
    pub fn start(config: &RelayConfig) -> Result<Self> {
        let node_rt = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("building node runtime")?;
        let client_rt = Builder::new_multi_thread()
            .worker_threads(config.client_net.worker_threads)
            .thread_name("relay-client-io")
            .enable_all()
            .build()
            .context("building client runtime")?;

        let mut node_net: MsgNetwork<Arc<Relay>> = MsgNetwork::new(config.node_net.clone());
        let node_conn = node_rt
            .block_on(node_net.handle().connect(config.node))
            .map_err(|e| RelayError::NodeUnreachable {
                addr: config.node,
                reason: e.to_string(),
            })?;

        let mut client_net: MsgNetwork<Arc<Relay>> = MsgNetwork::new(config.client_net.clone());
        let client_handle = client_net.handle();
        let relay = Arc::new(RelayService::new(
            NodeConnectionLink::new(node_conn),
            ClientNetworkLink::new(client_handle.clone()),
        ));

        node_net.reg_handler::<RespCmd, _>(|relay, msg, _| {
            match relay.handle_node_response(msg.fin) {
                ResponseOutcome::Delivered { .. } => metric_inc!(RELAY_RETURNED),
                ResponseOutcome::Dropped | ResponseOutcome::Undeliverable { .. } => {
                    metric_inc!(RELAY_DROPPED)
                }
            }
            ControlFlow::Continue(())
        })?;
        node_net.on_disconnect(|relay, conn| {
            log_peer_event!(
                error,
                "relay",
                "Lost connection to node",
                conn.peer_addr(),
                pending = relay.pending()
            );
            ControlFlow::Break(())
        });

        client_net.reg_handler::<ReqCmd, _>(|relay, msg, conn| {
            match relay.handle_client_request(msg.cmd, conn.peer_addr()) {
                Ok(_) => {
                    metric_inc!(RELAY_FORWARDED);
                    ControlFlow::Continue(())
                }
                Err(e) => {
                    error!(error = %e, "Cannot forward to node");
                    ControlFlow::Break(())
                }
            }
        })?;
        client_net.on_disconnect(|_, conn| {
            log_peer_event!(debug, "relay", "Client disconnected", conn.peer_addr());
            ControlFlow::Continue(())
        });

        let listen_addr = client_rt
            .block_on(client_handle.listen(config.listen))
            .with_context(|| format!("listening for clients on {}", config.listen))?;

        let (stop_tx, stop_rx) = watch::channel(false);
        let (failed_tx, failed_rx) = watch::channel(false);
        let failed_tx = Arc::new(failed_tx);

        let node_thread = spawn_loop(
            "relay-node",
            node_rt,
            node_net,
            Arc::clone(&relay),
            stop_rx.clone(),
            Arc::clone(&failed_tx),
        )?;
        let client_thread = spawn_loop(
            "relay-client",
            client_rt,
            client_net,
            Arc::clone(&relay),
            stop_rx,
            failed_tx,
        )?;

        info!(idx = config.idx, %listen_addr, node = %config.node, "Speedbump running");
        Ok(Self {
            relay,
            listen_addr,
            stop_tx,
            failed_rx,
            node_thread: Some(node_thread),
            client_thread: Some(client_thread),
        })
    }

    /// Address clients connect to.
    #[must_use]
    pub fn listen_addr(&self) -> SocketAddr {
        self.listen_addr
    }

    #[must_use]
    pub fn stats(&self) -> RelayStatsSnapshot {
        self.relay.stats()
    }

    /// Requests forwarded and not yet answered.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.relay.pending()
    }

    /// Resolves once either loop has stopped on its own.
    pub async fn failed(&self) {
        let mut rx = self.failed_rx.clone();
        // An error means every sender is gone, i.e. both loops have ended.
        let _ = rx.wait_for(|failed| *failed).await;
    }

    /// Stop both loops and wait for their threads.
    pub fn stop(&mut self) -> RelayStatsSnapshot {
        self.stop_tx.send_replace(true);
        for handle in [self.node_thread.take(), self.client_thread.take()]
            .into_iter()
            .flatten()
        {
            let name = handle.thread().name().unwrap_or("relay").to_string();
            match handle.join() {
                Ok(exit) => debug!(thread = %name, ?exit, "Event loop joined"),
                Err(_) => error!(thread = %name, "Event loop panicked"),
            }
        }

        let stats = self.relay.stats();
        info!(
            forwarded = stats.forwarded,
            returned = stats.returned,
            dropped = stats.dropped,
            overwritten = stats.overwritten,
            undeliverable = stats.undeliverable,
            pending = self.relay.pending(),
            "Speedbump stopped"
        );
        stats
    }
}

impl Drop for Speedbump {
    fn drop(&mut self) {
        if self.node_thread.is_some() || self.client_thread.is_some() {
            self.stop();
        }
    }
}

fn spawn_loop(
    name: &str,
    rt: Runtime,
    net: MsgNetwork<Arc<Relay>>,
    mut relay: Arc<Relay>,
    mut stop_rx: watch::Receiver<bool>,
    failed_tx: Arc<watch::Sender<bool>>,
) -> Result<JoinHandle<LoopExit>> {
    let thread_name = name.to_string();
    std::thread::Builder::new()
        .name(thread_name.clone())
        .spawn(move || {
            let stop = async move {
                let _ = stop_rx.wait_for(|stop| *stop).await;
            };
            let exit = rt.block_on(net.run(&mut relay, stop));
            if exit == LoopExit::Stopped {
                warn!(thread = %thread_name, "Event loop stopped on its own");
                failed_tx.send_replace(true);
            }
            exit
        })
        .with_context(|| format!("spawning {name} thread"))
}
