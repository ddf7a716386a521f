//! # Route Tree Flows
//!
//! End-to-end scenarios driving `RoutingService` the way the lookup and
//! maintenance layers do:
//!
//! 1. **Discovery**: peers are observed, buckets fill, overflow goes to caches
//! 2. **Maintenance**: unresponsive peers are staled and replaced
//! 3. **Lookup**: closest-node queries stay exact as the table churns
//! 4. **Configuration**: TOML-configured services behave like static ones

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::io::Write;

    use qc_01_kademlia_routing::test_utils::{make_node, ControllableTimeSource};
    use qc_01_kademlia_routing::{
        find_k_closest, ConfigProvider, Id, Node, RoutingApi, RoutingConfig, RoutingError,
        RoutingService, StaticConfigProvider, TomlConfigProvider,
    };
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::integration::init_test_logging;

    const ID_BITS: usize = 160;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn random_id(rng: &mut StdRng) -> Id {
        let bytes: [u8; 20] = rng.gen();
        Id::from_bytes(&bytes, ID_BITS).unwrap()
    }

    fn random_node(rng: &mut StdRng, index: usize) -> Node {
        Node::new(random_id(rng), format!("10.0.{}.{}:4000", index / 256, index % 256))
    }

    fn make_service(local_id: Id, config: RoutingConfig) -> RoutingService {
        RoutingService::new(
            local_id,
            &config,
            Box::new(ControllableTimeSource::with_step(1, 1)),
        )
        .unwrap()
    }

    fn active_nodes(service: &RoutingService) -> Vec<Node> {
        service
            .dump()
            .into_iter()
            .flat_map(|bucket| bucket.bucket.into_iter().map(|entry| entry.node))
            .collect()
    }

    // =============================================================================
    // DISCOVERY
    // =============================================================================

    #[test]
    fn test_discovery_respects_capacities() {
        init_test_logging();
        let mut rng = StdRng::seed_from_u64(7);
        let config = RoutingConfig {
            bucket_size: 4,
            cache_size: 2,
            max_depth: None,
        };
        let mut service = make_service(random_id(&mut rng), config);

        for index in 0..500 {
            service.touch_node(random_node(&mut rng, index)).unwrap();
        }

        for bucket in service.dump() {
            assert!(bucket.bucket.len() <= 4, "bucket {} over capacity", bucket.prefix);
            assert!(bucket.cache.len() <= 2, "cache {} over capacity", bucket.prefix);

            let bucket_ids: HashSet<_> = bucket.bucket.iter().map(|e| &e.node.id).collect();
            for entry in bucket.bucket.iter().chain(bucket.cache.iter()) {
                assert!(entry.node.id.bits().starts_with(&bucket.prefix));
            }
            for entry in &bucket.cache {
                assert!(!bucket_ids.contains(&entry.node.id), "node in bucket and cache");
            }
        }

        let stats = service.stats();
        // Half of all random ids land in bucket 0, a quarter in bucket 1, ...
        assert!(stats.total_peers >= 4 * 4);
        assert!(stats.buckets_used >= 4);
    }

    #[test]
    fn test_touch_is_idempotent_for_known_nodes() {
        let local_id = Id::from_unsigned(0, 8).unwrap();
        let mut service = make_service(local_id, RoutingConfig::for_testing());
        let node = make_node(0b1010_1010, 8);

        let first = service.touch_node(node.clone()).unwrap();
        let second = service.touch_node(node.clone()).unwrap();

        assert_eq!(first.bucket().added().len(), 1);
        assert_eq!(second.bucket().updated().len(), 1);
        assert_eq!(service.stats().total_peers, 1);
    }

    #[test]
    fn test_identity_conflict_does_not_mutate() {
        let local_id = Id::from_unsigned(0, 8).unwrap();
        let mut service = make_service(local_id, RoutingConfig::for_testing());
        let node = make_node(0b1000_0001, 8);
        service.touch_node(node.clone()).unwrap();
        let before = service.dump();

        let impostor = Node::new(node.id.clone(), "203.0.113.9:4000");
        let err = service.touch_node(impostor).unwrap_err();

        assert!(err.is_conflict());
        assert_eq!(err.conflicting_node(), Some(&node));
        assert_eq!(service.dump(), before);
    }

    // =============================================================================
    // MAINTENANCE
    // =============================================================================

    #[test]
    fn test_stale_cycle_keeps_bucket_full() {
        let local_id = Id::from_unsigned(0, 8).unwrap();
        let mut service = make_service(local_id, RoutingConfig::for_testing());

        // Bucket "1": two active, two cached.
        let nodes: Vec<Node> = (0..4).map(|i| make_node(0b1000_0000 | i, 8)).collect();
        for node in &nodes {
            service.touch_node(node.clone()).unwrap();
        }

        for stale in &nodes[..2] {
            let res = service.stale_node(stale).unwrap();
            assert_eq!(res.bucket().removed()[0].node, *stale);
            assert_eq!(res.bucket().added().len(), 1);
            assert_eq!(res.cache().removed().len(), 1);
        }

        let remaining: Vec<Node> = active_nodes(&service);
        assert_eq!(remaining, vec![nodes[2].clone(), nodes[3].clone()]);
        assert_eq!(service.stats().cached_peers, 0);

        // Nothing left to promote: the next stale report only marks.
        assert!(service.stale_node(&nodes[2]).unwrap().is_empty());
        assert_eq!(service.stats().stale_peers, 1);

        // A newcomer takes the marked slot.
        let newcomer = make_node(0b1111_0000, 8);
        let res = service.touch_node(newcomer.clone()).unwrap();
        assert_eq!(res.bucket().removed()[0].node, nodes[2]);
        assert_eq!(res.bucket().added()[0].node, newcomer);
        assert_eq!(service.stats().stale_peers, 0);
    }

    #[test]
    fn test_shrinking_evicts_oldest_everywhere() {
        let mut rng = StdRng::seed_from_u64(11);
        let config = RoutingConfig {
            bucket_size: 8,
            cache_size: 8,
            max_depth: None,
        };
        let mut service = make_service(random_id(&mut rng), config);
        for index in 0..200 {
            service.touch_node(random_node(&mut rng, index)).unwrap();
        }

        let changes = service.resize(2, 1);

        assert!(!changes.is_empty());
        for bucket in service.dump() {
            assert!(bucket.bucket.len() <= 2);
            assert!(bucket.cache.len() <= 1);
        }
        for change in &changes {
            let removed = change.to_change_set();
            assert!(removed.added().is_empty());
            assert!(removed.updated().is_empty());
        }
    }

    // =============================================================================
    // LOOKUP
    // =============================================================================

    #[test]
    fn test_lookup_matches_brute_force_under_churn() {
        let mut rng = StdRng::seed_from_u64(42);
        let config = RoutingConfig {
            bucket_size: 6,
            cache_size: 3,
            max_depth: None,
        };
        let mut service = make_service(random_id(&mut rng), config);
        let mut known = Vec::new();

        for index in 0..400 {
            let node = random_node(&mut rng, index);
            service.touch_node(node.clone()).unwrap();
            known.push(node);

            if index % 7 == 0 {
                let victim = known[rng.gen_range(0..known.len())].clone();
                service.stale_node(&victim).unwrap();
            }
            if index % 11 == 0 {
                let victim = known[rng.gen_range(0..known.len())].clone();
                service.remove_node(&victim).unwrap();
            }
        }

        let active = active_nodes(&service);
        for _ in 0..50 {
            let target = random_id(&mut rng);
            let count = rng.gen_range(1..30);

            let closest = service.find_closest_nodes(&target, count).unwrap();
            let expected = find_k_closest(&active, &target, count).unwrap();

            assert_eq!(closest, expected);
        }
    }

    #[test]
    fn test_lookup_rejects_local_id() {
        let mut rng = StdRng::seed_from_u64(3);
        let local_id = random_id(&mut rng);
        let service = make_service(local_id.clone(), RoutingConfig::default());

        assert_eq!(
            service.find_closest_nodes(&local_id, 20).unwrap_err(),
            RoutingError::BaseIdMatch { base_id: local_id }
        );
    }

    // =============================================================================
    // CONFIGURATION
    // =============================================================================

    #[test]
    fn test_toml_configured_service() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[routing]\nbucket_size = 3\ncache_size = 1\nmax_depth = 8").unwrap();

        let provider = TomlConfigProvider::load(file.path(), ID_BITS).unwrap();
        let static_provider = StaticConfigProvider::new().with_config(provider.routing_config());
        assert_eq!(provider.routing_config(), static_provider.routing_config());

        let mut rng = StdRng::seed_from_u64(5);
        let mut service = RoutingService::from_provider(
            random_id(&mut rng),
            &provider,
            Box::new(ControllableTimeSource::with_step(0, 1)),
        )
        .unwrap();

        assert_eq!(service.route_tree().max_depth(), 8);
        assert_eq!(service.dump().len(), 9);

        for index in 0..300 {
            service.touch_node(random_node(&mut rng, index)).unwrap();
        }
        for bucket in service.dump() {
            assert!(bucket.bucket.len() <= 3);
            assert!(bucket.cache.len() <= 1);
        }
    }
}
