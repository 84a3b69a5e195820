//! # Fake Consensus Replica
//!
//! Accepts client connections and answers every `ReqCmd` on the connection
//! it arrived on. Heights are handed out in arrival order starting at a
//! configurable base, so tests can decide which path lands first.

use shared_net::{MsgNetwork, NetConfig};
use shared_types::{Finality, ReqCmd, RespCmd};
use std::net::SocketAddr;
use std::ops::ControlFlow;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// How a fake replica treats requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Behavior {
    /// Commit every command, one per block, starting at `base_height`.
    Commit { base_height: u32 },
    /// Accept commands and never answer.
    Silent,
}

struct ReplicaState {
    replica_id: u16,
    behavior: Behavior,
    committed: u32,
    received: u64,
}

/// A running fake replica.
pub struct FakeReplica {
    addr: SocketAddr,
    stop: watch::Sender<bool>,
    task: JoinHandle<u64>,
}

impl FakeReplica {
    /// Listen on an ephemeral loopback port on the current runtime.
    pub async fn spawn(replica_id: u16, behavior: Behavior) -> Self {
        let mut net: MsgNetwork<ReplicaState> = MsgNetwork::new(NetConfig::default());
        net.reg_handler::<ReqCmd, _>(|state, msg, conn| {
            state.received += 1;
            if let Behavior::Commit { base_height } = state.behavior {
                let fin = Finality::committed(
                    state.replica_id,
                    msg.cmd.hash(),
                    base_height + state.committed,
                    0,
                );
                state.committed += 1;
                // The peer may already be gone at the end of a run.
                let _ = conn.send_msg(&RespCmd::new(fin));
            }
            ControlFlow::Continue(())
        })
        .expect("fresh registry");

        let addr = net
            .handle()
            .listen("127.0.0.1:0".parse().expect("literal address"))
            .await
            .expect("loopback listen");

        let (stop, mut stop_rx) = watch::channel(false);
        let task = tokio::spawn(async move {
            let mut state = ReplicaState {
                replica_id,
                behavior,
                committed: 0,
                received: 0,
            };
            net.run(&mut state, async move {
                let _ = stop_rx.wait_for(|stop| *stop).await;
            })
            .await;
            state.received
        });

        Self { addr, stop, task }
    }

    /// Spawn `count` replicas with ids `0..count`.
    pub async fn spawn_set(count: u16, behavior: Behavior) -> Vec<Self> {
        let mut set = Vec::with_capacity(usize::from(count));
        for id in 0..count {
            set.push(Self::spawn(id, behavior).await);
        }
        set
    }

    #[must_use]
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Stop the loop and return how many requests reached it.
    pub async fn shutdown(self) -> u64 {
        self.stop.send_replace(true);
        self.task.await.expect("replica task panicked")
    }
}

/// Client addresses of a replica set.
#[must_use]
pub fn addrs(set: &[FakeReplica]) -> Vec<SocketAddr> {
    set.iter().map(FakeReplica::addr).collect()
}
