//! LeastRecentlySeenSet implementation.

use crate::domain::{ChangeSet, Entry, Id, Node, RoutingError, Timestamp, UpdatedEntry};

/// Bounded set of entries ordered by ascending `last_seen` time.
///
/// The front holds the oldest entry, the back the most recently seen one.
/// Ties in time keep insertion order (earlier entries stay ahead).
///
/// # Eviction
/// The two ways of overflowing the set evict from opposite ends:
/// - `touch` on a full set drops the entry at the **back** (latest time), so a
///   brand-new arrival with the newest time is simply not admitted;
/// - `resize` to a smaller capacity drops entries from the **front** (oldest).
#[derive(Debug, Clone)]
pub struct LeastRecentlySeenSet {
    /// Local node ID; never admitted
    base_id: Id,
    /// Capacity
    max_size: usize,
    /// Entries, oldest first
    entries: Vec<Entry>,
}

impl LeastRecentlySeenSet {
    /// Create an empty set for ids of `base_id`'s bit length.
    pub fn new(base_id: Id, max_size: usize) -> Self {
        Self {
            base_id,
            max_size,
            entries: Vec::new(),
        }
    }

    /// Insert `node` seen at `time`, or refresh its time if already present.
    ///
    /// Returns `updated` when the id was present, otherwise `added`. On a full
    /// set the entry with the latest time is evicted and reported as
    /// `removed`; when that is the new entry itself nothing changes.
    pub fn touch(&mut self, time: Timestamp, node: Node) -> Result<ChangeSet, RoutingError> {
        self.validate(&node.id)?;

        let existing = self.position(&node.id);
        if let Some(pos) = existing {
            self.check_conflict(pos, &node)?;
        }

        let previous = existing.map(|pos| self.entries.remove(pos));
        let insert_at = self
            .entries
            .iter()
            .position(|e| e.last_seen > time)
            .unwrap_or(self.entries.len());
        self.entries
            .insert(insert_at, Entry::new(node.clone(), time));

        let evicted = if self.entries.len() > self.max_size {
            self.entries.pop()
        } else {
            None
        };

        match (previous, evicted) {
            (_, Some(evicted)) if evicted.node.id == node.id => Ok(ChangeSet::NO_CHANGE),
            (Some(previous), _) => Ok(ChangeSet::with_updated(UpdatedEntry::new(
                node,
                previous.last_seen,
                time,
            ))),
            (None, evicted) => Ok(ChangeSet::new(
                vec![Entry::new(node, time)],
                evicted.into_iter().collect(),
                Vec::new(),
            )),
        }
    }

    /// Remove `node` if present. An id on record under another address is a
    /// conflict.
    pub fn remove(&mut self, node: &Node) -> Result<ChangeSet, RoutingError> {
        self.validate(&node.id)?;

        match self.position(&node.id) {
            Some(pos) => {
                self.check_conflict(pos, node)?;
                let entry = self.entries.remove(pos);
                Ok(ChangeSet::with_removed(vec![entry]))
            }
            None => Ok(ChangeSet::NO_CHANGE),
        }
    }

    /// Change capacity, evicting the oldest entries until the set fits.
    pub fn resize(&mut self, max_size: usize) -> ChangeSet {
        self.max_size = max_size;
        if self.entries.len() <= max_size {
            return ChangeSet::NO_CHANGE;
        }
        let excess = self.entries.len() - max_size;
        ChangeSet::with_removed(self.entries.drain(..excess).collect())
    }

    /// Snapshot of the entries, oldest first.
    pub fn dump(&self) -> Vec<Entry> {
        self.entries.clone()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn get(&self, id: &Id) -> Option<&Entry> {
        self.entries.iter().find(|e| &e.node.id == id)
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.get(id).is_some()
    }

    /// Least recently seen entry.
    pub fn oldest(&self) -> Option<&Entry> {
        self.entries.first()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.max_size
    }

    pub fn capacity(&self) -> usize {
        self.max_size
    }

    pub fn base_id(&self) -> &Id {
        &self.base_id
    }

    /// Conflict against the entry on record for `node.id`, if any.
    pub(crate) fn conflict_with(&self, node: &Node) -> Result<(), RoutingError> {
        match self.position(&node.id) {
            Some(pos) => self.check_conflict(pos, node),
            None => Ok(()),
        }
    }

    fn position(&self, id: &Id) -> Option<usize> {
        self.entries.iter().position(|e| &e.node.id == id)
    }

    fn check_conflict(&self, pos: usize, node: &Node) -> Result<(), RoutingError> {
        let existing = &self.entries[pos];
        if existing.node.address == node.address {
            Ok(())
        } else {
            Err(RoutingError::EntryConflict {
                existing: existing.clone(),
            })
        }
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
