//! # Route Tree Benchmarks
//!
//! | Operation | Conditions |
//! |-----------|------------|
//! | `touch` | 1000 fresh peers; refresh of a known peer in a 5000-peer tree |
//! | `get_closest` | k = 20 over 100 / 1000 / 5000 observed peers; clustered ids |
//! | `stale` | cache promotion across every populated bucket |

use criterion::{criterion_group, criterion_main};
use qc_tests::benchmarks::qc_01_kademlia_routing::{bench_get_closest, bench_stale, bench_touch};

criterion_group!(benches, bench_touch, bench_get_closest, bench_stale);
criterion_main!(benches);
