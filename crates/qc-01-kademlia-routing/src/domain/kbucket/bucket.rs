//! KBucket implementation.

use tracing::{debug, trace};

use crate::domain::{
    BitString, ChangeSet, Entry, Id, LeastRecentlySeenSet, Node, RoutingError, Timestamp,
};

/// Changes to the active bucket and to the replacement cache, reported
/// separately.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KBucketChangeSet {
    bucket: ChangeSet,
    cache: ChangeSet,
}

impl KBucketChangeSet {
    pub fn new(bucket: ChangeSet, cache: ChangeSet) -> Self {
        Self { bucket, cache }
    }

    /// Changes to the active peers.
    pub fn bucket(&self) -> &ChangeSet {
        &self.bucket
    }

    /// Changes to the replacement cache.
    pub fn cache(&self) -> &ChangeSet {
        &self.cache
    }

    pub fn is_empty(&self) -> bool {
        self.bucket.is_empty() && self.cache.is_empty()
    }

    /// Bucket changes followed by cache changes.
    pub fn to_change_set(&self) -> ChangeSet {
        self.bucket.clone().merge(self.cache.clone())
    }
}

/// Point-in-time copy of a bucket's contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KBucketDump {
    pub prefix: BitString,
    /// Active peers, oldest first
    pub bucket: Vec<Entry>,
    /// Replacement candidates, oldest first
    pub cache: Vec<Entry>,
}

/// A k-bucket: active peers plus a replacement cache for one prefix range.
///
/// # Invariants
/// - every member of either set starts with `prefix`;
/// - an id is never in both the bucket and the cache;
/// - stale marks only ever name current bucket members.
#[derive(Debug, Clone)]
pub struct KBucket {
    base_id: Id,
    prefix: BitString,
    /// Active peers (max size = bucket capacity)
    bucket: LeastRecentlySeenSet,
    /// Replacement candidates (max size = cache capacity)
    cache: LeastRecentlySeenSet,
    /// Members reported stale with no replacement available, earliest first
    stale: Vec<Id>,
}

impl KBucket {
    /// Create an empty bucket. `prefix` must not be longer than the base id.
    pub fn new(
        base_id: Id,
        prefix: BitString,
        bucket_capacity: usize,
        cache_capacity: usize,
    ) -> Result<Self, RoutingError> {
        if prefix.len() > base_id.bit_len() {
            return Err(RoutingError::InvalidConfig(format!(
                "bucket prefix of {} bits exceeds identifier length {}",
                prefix.len(),
                base_id.bit_len()
            )));
        }

        Ok(Self {
            bucket: LeastRecentlySeenSet::new(base_id.clone(), bucket_capacity),
            cache: LeastRecentlySeenSet::new(base_id.clone(), cache_capacity),
            base_id,
            prefix,
            stale: Vec::new(),
        })
    }

    /// Record that `node` was seen at `time`.
    ///
    /// Members are refreshed. Newcomers take the slot of the earliest stale
    /// member when the bucket is full, enter the bucket when it has room, and
    /// otherwise go to the replacement cache.
    pub fn touch(&mut self, time: Timestamp, node: Node) -> Result<KBucketChangeSet, RoutingError> {
        self.validate(&node.id)?;
        self.bucket.conflict_with(&node)?;
        self.cache.conflict_with(&node)?;

        if self.bucket.contains(&node.id) {
            let changes = self.bucket.touch(time, node.clone())?;
            self.clear_stale(&node.id);
            return Ok(KBucketChangeSet::new(changes, ChangeSet::NO_CHANGE));
        }

        if self.bucket.is_full() {
            if let Some(stale) = self.take_stale_member() {
                debug!(
                    prefix = %self.prefix,
                    stale = %stale.id,
                    replacement = %node.id,
                    "Replacing stale bucket member"
                );
                let removed = self.bucket.remove(&stale)?;
                let added = self.bucket.touch(time, node.clone())?;
                let cache_changes = self.cache.remove(&node)?;
                return Ok(KBucketChangeSet::new(removed.merge(added), cache_changes));
            }
        }

        let bucket_changes = self.bucket.touch(time, node.clone())?;
        if !bucket_changes.is_empty() {
            for displaced in bucket_changes.removed() {
                self.clear_stale(&displaced.node.id);
            }
            let cache_changes = self.cache.remove(&node)?;
            return Ok(KBucketChangeSet::new(bucket_changes, cache_changes));
        }

        let cache_changes = self.cache.touch(time, node)?;
        Ok(KBucketChangeSet::new(ChangeSet::NO_CHANGE, cache_changes))
    }

    /// Report that bucket member `node` failed to respond.
    ///
    /// With a non-empty cache the oldest cache entry replaces `node` in one
    /// step. With an empty cache `node` stays and is marked stale, so the next
    /// newcomer replaces it instead of waiting in the cache.
    pub fn stale(&mut self, node: &Node) -> Result<KBucketChangeSet, RoutingError> {
        self.validate(&node.id)?;
        self.bucket.conflict_with(node)?;
        self.cache.conflict_with(node)?;

        if !self.bucket.contains(&node.id) {
            trace!(prefix = %self.prefix, id = %node.id, "Stale report for non-member ignored");
            return Ok(KBucketChangeSet::default());
        }

        let Some(promoted) = self.cache.oldest().cloned() else {
            if !self.stale.contains(&node.id) {
                self.stale.push(node.id.clone());
            }
            debug!(prefix = %self.prefix, id = %node.id, "Marked bucket member stale");
            return Ok(KBucketChangeSet::default());
        };

        let cache_changes = self.cache.remove(&promoted.node)?;
        let removed = self.bucket.remove(node)?;
        let added = self.bucket.touch(promoted.last_seen, promoted.node)?;
        self.clear_stale(&node.id);

        Ok(KBucketChangeSet::new(removed.merge(added), cache_changes))
    }

    /// Remove `node` from whichever set holds it. No promotion takes place.
    pub fn remove(&mut self, node: &Node) -> Result<KBucketChangeSet, RoutingError> {
        self.validate(&node.id)?;
        self.bucket.conflict_with(node)?;
        self.cache.conflict_with(node)?;

        if self.bucket.contains(&node.id) {
            let changes = self.bucket.remove(node)?;
            self.clear_stale(&node.id);
            Ok(KBucketChangeSet::new(changes, ChangeSet::NO_CHANGE))
        } else {
            let changes = self.cache.remove(node)?;
            Ok(KBucketChangeSet::new(ChangeSet::NO_CHANGE, changes))
        }
    }

    /// Change both capacities, evicting the oldest entries of each set.
    pub fn resize(&mut self, bucket_capacity: usize, cache_capacity: usize) -> KBucketChangeSet {
        let bucket_changes = self.bucket.resize(bucket_capacity);
        for evicted in bucket_changes.removed() {
            self.clear_stale(&evicted.node.id);
        }
        let cache_changes = self.cache.resize(cache_capacity);
        KBucketChangeSet::new(bucket_changes, cache_changes)
    }

    pub fn dump(&self) -> KBucketDump {
        KBucketDump {
            prefix: self.prefix.clone(),
            bucket: self.bucket.dump(),
            cache: self.cache.dump(),
        }
    }

    pub fn prefix(&self) -> &BitString {
        &self.prefix
    }

    /// Active peers.
    pub fn bucket(&self) -> &LeastRecentlySeenSet {
        &self.bucket
    }

    /// Replacement candidates.
    pub fn cache(&self) -> &LeastRecentlySeenSet {
        &self.cache
    }

    /// Number of active peers.
    pub fn len(&self) -> usize {
        self.bucket.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bucket.is_empty()
    }

    /// Members currently marked stale, earliest first.
    pub fn stale_members(&self) -> &[Id] {
        &self.stale
    }

    pub fn is_stale(&self, id: &Id) -> bool {
        self.stale.contains(id)
    }

    fn take_stale_member(&mut self) -> Option<Node> {
        while !self.stale.is_empty() {
            let id = self.stale.remove(0);
            if let Some(entry) = self.bucket.get(&id) {
                return Some(entry.node.clone());
            }
        }
        None
    }

    fn clear_stale(&mut self, id: &Id) {
        self.stale.retain(|stale| stale != id);
    }

    fn validate(&self, id: &Id) -> Result<(), RoutingError> {
        self.base_id.ensure_same_len(id)?;
        if id == &self.base_id {
            return Err(RoutingError::BaseIdMatch {
                base_id: self.base_id.clone(),
            });
        }
        if !id.bits().starts_with(&self.prefix) {
            return Err(RoutingError::PrefixMismatch {
                id: id.clone(),
                prefix: self.prefix.clone(),
            });
        }
        Ok(())
    }
}
