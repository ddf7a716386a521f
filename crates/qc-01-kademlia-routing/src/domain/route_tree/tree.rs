//! Main RouteTree implementation.

use tracing::{debug, trace, warn};

use crate::domain::{
    bucket_index, bucket_prefix, BitString, ChangeSet, Id, KBucket, KBucketChangeSet,
    KBucketDump, NearSet, Node, RoutingConfig, RoutingError, Timestamp,
};

/// Bucket changes tagged with the prefix of the bucket that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTreeChangeSet {
    prefix: BitString,
    changes: KBucketChangeSet,
}

impl RouteTreeChangeSet {
    pub fn new(prefix: BitString, changes: KBucketChangeSet) -> Self {
        Self { prefix, changes }
    }

    /// Prefix of the bucket that was touched.
    pub fn prefix(&self) -> &BitString {
        &self.prefix
    }

    pub fn changes(&self) -> &KBucketChangeSet {
        &self.changes
    }

    /// Changes to the active peers.
    pub fn bucket(&self) -> &ChangeSet {
        self.changes.bucket()
    }

    /// Changes to the replacement cache.
    pub fn cache(&self) -> &ChangeSet {
        self.changes.cache()
    }

    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Flatten into a single change set, bucket changes first.
    pub fn to_change_set(&self) -> ChangeSet {
        self.changes.to_change_set()
    }
}

/// Route tree statistics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RouteTreeStats {
    /// Active peers across all buckets
    pub total_peers: usize,
    /// Replacement candidates across all caches
    pub cached_peers: usize,
    /// Active peers marked stale and awaiting replacement
    pub stale_peers: usize,
    /// Buckets holding at least one active peer
    pub buckets_used: usize,
}

/// The routing table of the local node.
///
/// # Placement
/// A peer goes to bucket `min(shared_prefix_length(base_id, id), max_depth)`.
/// The local identifier itself is never stored.
///
/// # Lookup
/// `get_closest` visits the target's own bucket, then every deeper bucket,
/// then shallower buckets from deepest to shallowest. Each group is strictly
/// farther from the target than the one before, so collection stops as soon
/// as enough candidates are held.
#[derive(Debug, Clone)]
pub struct RouteTree {
    /// Our own node ID (immutable after creation)
    base_id: Id,
    /// Index of the deepest bucket
    max_depth: usize,
    /// Buckets indexed by depth, `0..=max_depth`
    buckets: Vec<KBucket>,
}

impl RouteTree {
    /// Create an empty tree around `base_id`.
    ///
    /// Fails when the configured depth is not below the id's bit length or
    /// the bucket size is zero.
    pub fn new(base_id: Id, config: &RoutingConfig) -> Result<Self, RoutingError> {
        config.validate(base_id.bit_len())?;
        let max_depth = config.resolve_max_depth(base_id.bit_len())?;

        let buckets = (0..=max_depth)
            .map(|depth| {
                let prefix = bucket_prefix(&base_id, depth, max_depth)?;
                KBucket::new(base_id.clone(), prefix, config.bucket_size, config.cache_size)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            base_id = %base_id,
            max_depth = max_depth,
            bucket_size = config.bucket_size,
            cache_size = config.cache_size,
            "Route tree created"
        );

        Ok(Self {
            base_id,
            max_depth,
            buckets,
        })
    }

    /// Get our local node ID
    pub fn base_id(&self) -> &Id {
        &self.base_id
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Index of the bucket responsible for `id`.
    pub fn bucket_index(&self, id: &Id) -> usize {
        bucket_index(&self.base_id, id, self.max_depth)
    }

    /// Buckets ordered by depth.
    pub fn buckets(&self) -> &[KBucket] {
        &self.buckets
    }

    /// Record that `node` was seen at `time`.
    pub fn touch(
        &mut self,
        time: Timestamp,
        node: Node,
    ) -> Result<RouteTreeChangeSet, RoutingError> {
        self.validate(&node.id)?;
        let index = self.bucket_index(&node.id);
        let bucket = &mut self.buckets[index];

        let changes = bucket
            .touch(time, node)
            .inspect_err(|err| log_conflict("touch", err))?;
        log_changes("touch", bucket.prefix(), &changes);
        Ok(RouteTreeChangeSet::new(bucket.prefix().clone(), changes))
    }

    /// Report that `node` failed to respond.
    pub fn stale(&mut self, node: &Node) -> Result<RouteTreeChangeSet, RoutingError> {
        self.validate(&node.id)?;
        let index = self.bucket_index(&node.id);
        let bucket = &mut self.buckets[index];

        let changes = bucket
            .stale(node)
            .inspect_err(|err| log_conflict("stale", err))?;
        log_changes("stale", bucket.prefix(), &changes);
        Ok(RouteTreeChangeSet::new(bucket.prefix().clone(), changes))
    }

    /// Forget `node` entirely.
    pub fn remove(&mut self, node: &Node) -> Result<RouteTreeChangeSet, RoutingError> {
        self.validate(&node.id)?;
        let index = self.bucket_index(&node.id);
        let bucket = &mut self.buckets[index];

        let changes = bucket
            .remove(node)
            .inspect_err(|err| log_conflict("remove", err))?;
        log_changes("remove", bucket.prefix(), &changes);
        Ok(RouteTreeChangeSet::new(bucket.prefix().clone(), changes))
    }

    /// Change every bucket's capacities. Returns one change set per bucket
    /// that evicted entries.
    pub fn resize(&mut self, bucket_size: usize, cache_size: usize) -> Vec<RouteTreeChangeSet> {
        let mut results = Vec::new();
        for bucket in &mut self.buckets {
            let changes = bucket.resize(bucket_size, cache_size);
            if !changes.is_empty() {
                log_changes("resize", bucket.prefix(), &changes);
                results.push(RouteTreeChangeSet::new(bucket.prefix().clone(), changes));
            }
        }
        debug!(
            bucket_size = bucket_size,
            cache_size = cache_size,
            buckets_changed = results.len(),
            "Route tree resized"
        );
        results
    }

    /// Up to `max` active peers, strictly ascending by XOR distance to
    /// `target`.
    pub fn get_closest(&self, target: &Id, max: usize) -> Result<Vec<Node>, RoutingError> {
        self.validate(target)?;
        if max == 0 {
            return Ok(Vec::new());
        }

        let start = self.bucket_index(target);
        let mut near = NearSet::new(target.clone(), max);

        let groups = std::iter::once(start..start + 1)
            .chain(std::iter::once(start + 1..self.max_depth + 1))
            .chain((0..start).rev().map(|depth| depth..depth + 1));

        for group in groups {
            for bucket in &self.buckets[group] {
                for entry in bucket.bucket().iter() {
                    near.insert(entry.node.clone())?;
                }
            }
            if near.is_full() {
                break;
            }
        }

        trace!(target_id = %target, max = max, found = near.len(), "Closest nodes collected");
        Ok(near.dump())
    }

    /// Snapshot of every bucket, ordered by depth.
    pub fn dump(&self) -> Vec<KBucketDump> {
        self.buckets.iter().map(KBucket::dump).collect()
    }

    /// Get route tree statistics
    pub fn stats(&self) -> RouteTreeStats {
        self.buckets
            .iter()
            .fold(RouteTreeStats::default(), |mut stats, bucket| {
                stats.total_peers += bucket.len();
                stats.cached_peers += bucket.cache().len();
                stats.stale_peers += bucket.stale_members().len();
                if !bucket.is_empty() {
                    stats.buckets_used += 1;
                }
                stats
            })
    }

    fn validate(&self, id: &Id) -> Result<(), RoutingError> {
        self.base_id.ensure_same_len(id)?;
        if id == &self.base_id {
            return Err(RoutingError::BaseIdMatch {
                base_id: self.base_id.clone(),
            });
        }
        Ok(())
    }
}

fn log_changes(operation: &'static str, prefix: &BitString, changes: &KBucketChangeSet) {
    if changes.is_empty() {
        trace!(operation = operation, prefix = %prefix, "No change");
        return;
    }
    let (bucket_added, bucket_removed, bucket_updated) = changes.bucket().counts();
    let (cache_added, cache_removed, cache_updated) = changes.cache().counts();
    debug!(
        operation = operation,
        prefix = %prefix,
        added = bucket_added + cache_added,
        removed = bucket_removed + cache_removed,
        updated = bucket_updated + cache_updated,
        "Bucket changed"
    );
}

fn log_conflict(operation: &'static str, err: &RoutingError) {
    if let Some(existing) = err.conflicting_node() {
        warn!(
            operation = operation,
            id = %existing.id,
            address = %existing.address,
            "Identity conflict: id already known under another address"
        );
    }
}
