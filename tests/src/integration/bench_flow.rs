//! # Benchmark Flow
//!
//! `run_benchmark` against fake weak and strong replica sets over loopback,
//! and once through real speedbumps on the weak path.

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use edge_runtime::config::{BenchConfig, RelayConfig};
    use edge_runtime::{run_benchmark, Speedbump};
    use qe_02_bench_driver::Path;
    use shared_net::NetConfig;

    use crate::integration::fake_replica::{addrs, Behavior, FakeReplica};

    const WEAK_BASE: u32 = 1_000_000;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn bench_config(weak: Vec<SocketAddr>, strong: Vec<SocketAddr>, iter: i64) -> BenchConfig {
        BenchConfig {
            idx: 0,
            client_id: 7,
            iter,
            max_async: 4,
            max_msg_size: 65_536,
            weak,
            strong,
            results_json: None,
        }
    }

    async fn silent_plus_committing(committing: u16, base_height: u32) -> Vec<FakeReplica> {
        let mut set = FakeReplica::spawn_set(committing, Behavior::Commit { base_height }).await;
        set.push(FakeReplica::spawn(committing, Behavior::Silent).await);
        set
    }

    // =============================================================================
    // INTEGRATION TESTS
    // =============================================================================

    /// Strong replicas always report lower heights, so strong wins every pair.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_strong_path_wins_every_pair() {
        let weak = FakeReplica::spawn_set(4, Behavior::Commit { base_height: WEAK_BASE }).await;
        let strong = FakeReplica::spawn_set(4, Behavior::Commit { base_height: 0 }).await;

        let config = bench_config(addrs(&weak), addrs(&strong), 20);
        let run = run_benchmark(&config, std::future::pending()).await.unwrap();
        assert!(run.aborted.is_none());
        let results = run.results;

        assert_eq!(results.client_id, 7);
        assert_eq!(results.counters.pairs_issued, 20);
        assert_eq!(results.counters.weak_confirmed, 20);
        assert_eq!(results.counters.strong_confirmed, 20);
        assert_eq!(results.unresolved, 0);
        assert_eq!(results.fairness.total(), 20);
        assert_eq!(results.fairness.strong_score, 20);
        assert_eq!(results.fairness.weak_score, 0);
        assert_eq!(results.fairness.ratio(), None);
        assert!(results
            .fairness
            .pairs
            .iter()
            .all(|p| p.winner == Some(Path::Strong)));
        assert_eq!(results.weak_latency.count, 20);

        for replica in weak.into_iter().chain(strong) {
            assert!(replica.shutdown().await <= 20);
        }
    }

    /// With four replicas one may stay silent; two acknowledgements confirm.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_one_silent_replica_per_path_tolerated() {
        let weak = silent_plus_committing(3, WEAK_BASE).await;
        let strong = silent_plus_committing(3, 0).await;

        let config = bench_config(addrs(&weak), addrs(&strong), 12);
        let run = run_benchmark(&config, std::future::pending()).await.unwrap();
        assert!(run.aborted.is_none());
        let results = run.results;

        assert_eq!(results.weak_quorum.required(), 2);
        assert_eq!(results.counters.confirmed(), 24);
        assert_eq!(results.unresolved, 0);
        assert_eq!(results.fairness.strong_score, 12);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_interrupted_run_reports_unresolved() {
        let weak = FakeReplica::spawn_set(4, Behavior::Silent).await;
        let strong = FakeReplica::spawn_set(4, Behavior::Silent).await;

        let config = bench_config(addrs(&weak), addrs(&strong), -1);
        let results = run_benchmark(&config, tokio::time::sleep(Duration::from_millis(200)))
            .await
            .unwrap()
            .results;

        assert_eq!(results.counters.pairs_issued, 4);
        assert_eq!(results.unresolved, 8);
        assert_eq!(results.fairness.total(), 0);
        assert_eq!(results.fairness.ratio(), None);
    }

    #[tokio::test]
    async fn test_unreachable_replica_is_fatal() {
        let strong = FakeReplica::spawn_set(1, Behavior::Commit { base_height: 0 }).await;
        let dead = {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };

        let config = bench_config(vec![dead], addrs(&strong), 1);
        assert!(run_benchmark(&config, std::future::pending()).await.is_err());
    }

    /// Full topology: weak commands pass through one speedbump per node, strong
    /// commands reach the same nodes directly.
    #[test]
    fn test_weak_path_through_speedbumps() {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .unwrap();
        let nodes = rt.block_on(FakeReplica::spawn_set(4, Behavior::Commit { base_height: 1 }));

        let mut relays: Vec<Speedbump> = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| {
                Speedbump::start(&RelayConfig {
                    idx,
                    listen: "127.0.0.1:0".parse().unwrap(),
                    node: node.addr(),
                    client_net: NetConfig::default().with_worker_threads(1),
                    node_net: NetConfig::default(),
                })
                .unwrap()
            })
            .collect();
        let weak = relays.iter().map(Speedbump::listen_addr).collect();

        let iter = 30;
        let config = bench_config(weak, addrs(&nodes), iter);
        let results = rt
            .block_on(run_benchmark(&config, std::future::pending()))
            .unwrap()
            .results;

        let f = &results.fairness;
        assert_eq!(f.total(), 30);
        assert_eq!(f.strong_score + f.weak_score + f.ties, 30);
        assert_eq!(results.unresolved, 0);

        for relay in &mut relays {
            let stats = relay.stop();
            assert!(stats.returned <= stats.forwarded);
            assert_eq!(stats.dropped, 0);
        }
    }
}
