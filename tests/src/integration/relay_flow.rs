//! # Relay Flow
//!
//! Clients talk to a real `Speedbump` that forwards to a fake node:
//!
//! 1. Each client gets back exactly the responses for its own commands
//! 2. Losing the node connection surfaces through `failed()`
//! 3. An unreachable node fails startup

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::ops::ControlFlow;
    use std::time::Duration;
    use tokio::runtime::Runtime;
    use tokio::time::timeout;

    use edge_runtime::config::RelayConfig;
    use edge_runtime::Speedbump;
    use qe_01_relay_proxy::RelayError;
    use shared_net::{LoopExit, MsgNetwork, NetConfig};
    use shared_types::{Command, Finality, ReqCmd, RespCmd};

    use crate::integration::fake_replica::{Behavior, FakeReplica};

    const WAIT: Duration = Duration::from_secs(10);

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn runtime() -> Runtime {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap()
    }

    fn relay_config(node: SocketAddr) -> RelayConfig {
        RelayConfig {
            idx: 0,
            listen: "127.0.0.1:0".parse().unwrap(),
            node,
            client_net: NetConfig::default().with_worker_threads(2),
            node_net: NetConfig::default(),
        }
    }

    /// Send `count` commands as `client_id` and wait for as many responses.
    async fn submit(relay: SocketAddr, client_id: u32, count: u32) -> Vec<Finality> {
        let mut net: MsgNetwork<Vec<Finality>> = MsgNetwork::new(NetConfig::default());
        net.reg_handler::<RespCmd, _>(move |got, msg, _| {
            got.push(msg.fin);
            if got.len() >= count as usize {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        })
        .unwrap();

        let conn = net.handle().connect(relay).await.unwrap();
        for seq in 0..count {
            conn.send_msg(&ReqCmd::new(Command::new(client_id, seq)))
                .unwrap();
        }

        let mut got = Vec::new();
        let exit = timeout(WAIT, net.run(&mut got, std::future::pending()))
            .await
            .expect("timeout waiting for responses");
        assert_eq!(exit, LoopExit::Stopped);
        got
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    #[test]
    fn test_each_client_receives_its_own_responses() {
        let rt = runtime();
        let node = rt.block_on(FakeReplica::spawn(0, Behavior::Commit { base_height: 1 }));

        let mut relay = Speedbump::start(&relay_config(node.addr())).unwrap();
        let listen = relay.listen_addr();

        let (alice, bob) = rt.block_on(async {
            tokio::join!(submit(listen, 1, 25), submit(listen, 2, 25))
        });

        for (client_id, got) in [(1, &alice), (2, &bob)] {
            let mut expected: Vec<_> = (0..25).map(|seq| Command::new(client_id, seq).hash()).collect();
            let mut hashes: Vec<_> = got.iter().map(|fin| fin.cmd_hash).collect();
            expected.sort();
            hashes.sort();
            assert_eq!(hashes, expected, "client {client_id} got foreign responses");
            assert!(got.iter().all(Finality::is_committed));
        }

        let stats = relay.stop();
        assert_eq!(stats.forwarded, 50);
        assert_eq!(stats.returned, 50);
        assert_eq!(stats.dropped, 0);
        assert_eq!(relay.pending(), 0);
        assert_eq!(rt.block_on(node.shutdown()), 50);
    }

    #[test]
    fn test_node_disconnect_is_reported() {
        let rt = runtime();
        let listener = rt
            .block_on(tokio::net::TcpListener::bind("127.0.0.1:0"))
            .unwrap();
        let node_addr = listener.local_addr().unwrap();

        let mut relay = Speedbump::start(&relay_config(node_addr)).unwrap();
        rt.block_on(async {
            let (stream, _) = listener.accept().await.unwrap();
            drop(stream);
            timeout(WAIT, relay.failed())
                .await
                .expect("node loss not reported");
        });

        // Both loops are already down or stop promptly.
        relay.stop();
    }

    #[test]
    fn test_unreachable_node_fails_startup() {
        let rt = runtime();
        let node_addr = rt.block_on(async {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        });

        let err = Speedbump::start(&relay_config(node_addr))
            .err()
            .expect("nothing listens on the node address");
        assert!(matches!(
            err.downcast_ref::<RelayError>(),
            Some(RelayError::NodeUnreachable { addr, .. }) if *addr == node_addr
        ));
    }
}
