//! # Quorum-Edge Benchmarks
//!
//! | Component | Operation | Target |
//! |-----------|-----------|--------|
//! | qe-01 Relay | record + resolve one hash | < 1us |
//! | qe-01 Relay | contended record/resolve, 4 threads | scales |
//! | qe-02 Bench | fairness scoring of 10k pairs | < 10ms |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use qe_01_relay_proxy::CorrelationTable;
use qe_02_bench_driver::{score, Path, ResolvedRequest};
use rand::seq::SliceRandom;
use rand::Rng;
use shared_types::Command;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

// ============================================================================
// QE-01: Correlation Table
// ============================================================================

fn bench_correlation_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("qe-01-correlation");
    let client: SocketAddr = "127.0.0.1:40000".parse().unwrap();
    let hashes: Vec<_> = (0..10_000).map(|seq| Command::new(1, seq).hash()).collect();

    group.throughput(Throughput::Elements(hashes.len() as u64));
    group.bench_function("record_resolve_10k", |b| {
        let table = CorrelationTable::new();
        b.iter(|| {
            for hash in &hashes {
                table.record(*hash, client);
            }
            for hash in &hashes {
                black_box(table.resolve(hash));
            }
        })
    });

    group.bench_function("contended_4_threads", |b| {
        let table = Arc::new(CorrelationTable::new());
        b.iter(|| {
            let workers: Vec<_> = (0..4u32)
                .map(|t| {
                    let table = Arc::clone(&table);
                    std::thread::spawn(move || {
                        for seq in 0..1_000 {
                            let hash = Command::new(t, seq).hash();
                            table.record(hash, client);
                            black_box(table.resolve(&hash));
                        }
                    })
                })
                .collect();
            for w in workers {
                w.join().unwrap();
            }
        })
    });

    group.finish();
}

// ============================================================================
// QE-02: Fairness Scoring
// ============================================================================

fn resolved(pairs: u32, path: Path) -> Vec<ResolvedRequest> {
    let mut rng = rand::thread_rng();
    let mut out: Vec<_> = (0..pairs)
        .map(|pair| ResolvedRequest {
            pair,
            path,
            seq: pair * 2,
            height: rng.gen_range(0..pairs),
            index: 0,
            acks: 2,
            latency: Duration::from_micros(rng.gen_range(100..5_000)),
        })
        .collect();
    out.shuffle(&mut rng);
    out
}

fn bench_fairness_scoring(c: &mut Criterion) {
    let mut group = c.benchmark_group("qe-02-scoring");

    for pairs in [100u32, 1_000, 10_000] {
        let weak = resolved(pairs, Path::Weak);
        let strong = resolved(pairs, Path::Strong);
        group.throughput(Throughput::Elements(u64::from(pairs)));
        group.bench_with_input(
            BenchmarkId::new("score", pairs),
            &(weak, strong),
            |b, (weak, strong)| b.iter(|| black_box(score(weak.clone(), strong.clone()))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_correlation_table, bench_fairness_scoring);
criterion_main!(benches);
