//! # QC-01 Kademlia Routing Benchmarks
//!
//! Route tree operations on 160-bit identifiers:
//! - Touch: bucket lookup plus least-recently-seen reordering
//! - Closest-node lookup over a populated tree
//! - Stale handling with cache promotion
//!
//! Adversarial conditions:
//! - Identifiers clustered around the local id (deep buckets)
//! - Full buckets and caches (every touch is a no-op or refresh)

use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use qc_01_kademlia_routing::{Id, Node, RouteTree, RoutingConfig, Timestamp};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;

const ID_BITS: usize = 160;

fn random_id(rng: &mut StdRng) -> Id {
    let bytes: [u8; 20] = rng.gen();
    Id::from_bytes(&bytes, ID_BITS).expect("20 bytes hold 160 bits")
}

fn random_node(rng: &mut StdRng, index: usize) -> Node {
    Node::new(random_id(rng), format!("node-{index}"))
}

/// Identifiers sharing the first `shared_bytes` bytes with `local`.
fn clustered_nodes(
    local: &[u8; 20],
    shared_bytes: usize,
    count: usize,
    rng: &mut StdRng,
) -> Vec<Node> {
    (0..count)
        .map(|index| {
            let mut bytes = *local;
            for byte in bytes.iter_mut().skip(shared_bytes) {
                *byte = rng.gen();
            }
            Node::new(
                Id::from_bytes(&bytes, ID_BITS).expect("20 bytes hold 160 bits"),
                format!("clustered-{index}"),
            )
        })
        .collect()
}

fn populated_tree(rng: &mut StdRng, peers: usize) -> RouteTree {
    let mut tree = RouteTree::new(random_id(rng), &RoutingConfig::default())
        .expect("default config is valid for 160-bit ids");
    for index in 0..peers {
        let _ = tree.touch(Timestamp::new(index as u64), random_node(rng, index));
    }
    tree
}

pub fn bench_touch(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-01/route_tree/touch");
    group.measurement_time(Duration::from_secs(10));

    let mut rng = StdRng::seed_from_u64(1);
    let nodes: Vec<Node> = (0..1000).map(|i| random_node(&mut rng, i)).collect();

    group.throughput(Throughput::Elements(nodes.len() as u64));
    group.bench_function("touch_1000_into_empty_tree", |b| {
        b.iter(|| {
            let local_id = Id::from_bytes(&[0u8; 20], ID_BITS).expect("valid");
            let mut tree =
                RouteTree::new(local_id, &RoutingConfig::default()).expect("valid config");
            for (time, node) in nodes.iter().enumerate() {
                let _ = black_box(tree.touch(Timestamp::new(time as u64), node.clone()));
            }
            black_box(tree.stats())
        })
    });

    let mut full = populated_tree(&mut rng, 5000);
    let known: Vec<Node> = full
        .dump()
        .into_iter()
        .flat_map(|d| d.bucket.into_iter().map(|e| e.node))
        .collect();
    let mut time = 10_000u64;
    group.throughput(Throughput::Elements(1));
    group.bench_function("refresh_known_peer", |b| {
        b.iter(|| {
            time += 1;
            let node = known[(time as usize) % known.len()].clone();
            black_box(full.touch(Timestamp::new(time), node))
        })
    });

    group.finish();
}

pub fn bench_get_closest(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-01/route_tree/get_closest");
    group.measurement_time(Duration::from_secs(10));

    let mut rng = StdRng::seed_from_u64(2);
    for peers in [100usize, 1000, 5000] {
        let tree = populated_tree(&mut rng, peers);
        let targets: Vec<Id> = (0..64).map(|_| random_id(&mut rng)).collect();

        group.bench_with_input(BenchmarkId::new("k20", peers), &tree, |b, tree| {
            let mut i = 0usize;
            b.iter(|| {
                i = (i + 1) % targets.len();
                black_box(tree.get_closest(&targets[i], 20))
            })
        });
    }

    // Adversarial: peers clustered near the local id fill deep buckets
    let local: [u8; 20] = rng.gen();
    let mut clustered = RouteTree::new(
        Id::from_bytes(&local, ID_BITS).expect("valid"),
        &RoutingConfig::default(),
    )
    .expect("valid config");
    let nodes = clustered_nodes(&local, 2, 2000, &mut rng);
    for (time, node) in nodes.into_iter().enumerate() {
        let _ = clustered.touch(Timestamp::new(time as u64), node);
    }
    group.bench_function("k20_clustered_adversarial", |b| {
        let target = random_id(&mut rng);
        b.iter(|| black_box(clustered.get_closest(&target, 20)))
    });

    group.finish();
}

pub fn bench_stale(c: &mut Criterion) {
    let mut group = c.benchmark_group("qc-01/route_tree/stale");

    let mut rng = StdRng::seed_from_u64(3);
    let tree = populated_tree(&mut rng, 5000);
    let members: Vec<Node> = tree
        .dump()
        .into_iter()
        .filter(|d| !d.cache.is_empty())
        .flat_map(|d| d.bucket.into_iter().map(|e| e.node))
        .collect();

    group.bench_function("stale_with_cache_promotion", |b| {
        b.iter_batched(
            || tree.clone(),
            |mut tree| {
                for node in &members {
                    let _ = black_box(tree.stale(node));
                }
            },
            criterion::BatchSize::LargeInput,
        )
    });

    group.finish();
}

/// Register all routing benchmarks.
pub fn register_benchmarks(c: &mut Criterion) {
    bench_touch(c);
    bench_get_closest(c);
    bench_stale(c);
}
