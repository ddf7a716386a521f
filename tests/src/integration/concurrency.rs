//! # Shared Access
//!
//! The routing core is single-threaded by contract. Hosts that observe peers
//! from several tasks share one `RoutingService` behind a single lock; these
//! tests check the table stays consistent under that arrangement.

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use parking_lot::Mutex;
    use qc_01_kademlia_routing::test_utils::ControllableTimeSource;
    use qc_01_kademlia_routing::{Id, Node, RoutingApi, RoutingConfig, RoutingService};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    const ID_BITS: usize = 160;
    const THREADS: u64 = 8;
    const TOUCHES_PER_THREAD: usize = 250;

    fn random_node(rng: &mut StdRng, thread: u64, index: usize) -> Node {
        let bytes: [u8; 20] = rng.gen();
        Node::new(
            Id::from_bytes(&bytes, ID_BITS).unwrap(),
            format!("10.{thread}.{}.{}:4000", index / 256, index % 256),
        )
    }

    fn shared_service() -> Arc<Mutex<RoutingService>> {
        let local_id = Id::from_bytes(&[0x5A; 20], ID_BITS).unwrap();
        let service = RoutingService::new(
            local_id,
            &RoutingConfig::default(),
            Box::new(ControllableTimeSource::with_step(0, 1)),
        )
        .unwrap();
        Arc::new(Mutex::new(service))
    }

    #[test]
    fn test_concurrent_touches_keep_table_consistent() {
        let service = shared_service();

        let handles: Vec<_> = (0..THREADS)
            .map(|thread_id| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    let mut rng = StdRng::seed_from_u64(thread_id);
                    let mut admitted = 0usize;
                    for index in 0..TOUCHES_PER_THREAD {
                        let node = random_node(&mut rng, thread_id, index);
                        let changes = service.lock().touch_node(node).unwrap();
                        admitted += changes.bucket().added().len();
                    }
                    admitted
                })
            })
            .collect();

        let admitted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();

        let service = service.lock();
        let stats = service.stats();
        assert_eq!(stats.total_peers, admitted);

        let mut seen = std::collections::HashSet::new();
        for bucket in service.dump() {
            assert!(bucket.bucket.len() <= 20);
            assert!(bucket.cache.len() <= 20);
            for entry in bucket.bucket.iter().chain(bucket.cache.iter()) {
                assert!(seen.insert(entry.node.id.clone()), "duplicate {}", entry.node.id);
            }
        }
    }

    #[test]
    fn test_concurrent_lookups_while_mutating() {
        let service = shared_service();
        {
            let mut rng = StdRng::seed_from_u64(99);
            let mut guard = service.lock();
            for index in 0..500 {
                guard.touch_node(random_node(&mut rng, 0, index)).unwrap();
            }
        }

        let writer = {
            let service = Arc::clone(&service);
            thread::spawn(move || {
                let mut rng = StdRng::seed_from_u64(100);
                for index in 0..500 {
                    service
                        .lock()
                        .touch_node(random_node(&mut rng, 1, index))
                        .unwrap();
                }
            })
        };

        let readers: Vec<_> = (0..4u64)
            .map(|seed| {
                let service = Arc::clone(&service);
                thread::spawn(move || {
                    let mut rng = StdRng::seed_from_u64(200 + seed);
                    for _ in 0..200 {
                        let bytes: [u8; 20] = rng.gen();
                        let target = Id::from_bytes(&bytes, ID_BITS).unwrap();
                        let closest = service.lock().find_closest_nodes(&target, 20).unwrap();
                        assert_eq!(closest.len(), 20);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
