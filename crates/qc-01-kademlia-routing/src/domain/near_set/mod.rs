//! Near-Set: a bounded collection of the nodes closest to a target.
//!
//! Used to collect lookup results. Entries are keyed by XOR distance to the
//! target, which is unique per identifier, so ordering and lookup share one
//! map.

use std::collections::BTreeMap;

use crate::domain::{ClosenessComparator, Distance, Id, Node, RoutingError};

/// Nodes added to and removed from a near-set by one operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeChangeSet {
    added: Vec<Node>,
    removed: Vec<Node>,
}

impl NodeChangeSet {
    pub fn new(added: Vec<Node>, removed: Vec<Node>) -> Self {
        Self { added, removed }
    }

    pub fn added(&self) -> &[Node] {
        &self.added
    }

    pub fn removed(&self) -> &[Node] {
        &self.removed
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Keeps at most `max_size` nodes, always the closest ones seen so far.
#[derive(Debug, Clone)]
pub struct NearSet {
    comparator: ClosenessComparator,
    max_size: usize,
    entries: BTreeMap<Distance, Node>,
}

impl NearSet {
    pub fn new(target: Id, max_size: usize) -> Self {
        Self {
            comparator: ClosenessComparator::new(target),
            max_size,
            entries: BTreeMap::new(),
        }
    }

    /// Insert `node`, evicting the farthest node when over capacity.
    ///
    /// Returns no change when `node` is already present or is itself the
    /// farthest once inserted.
    pub fn insert(&mut self, node: Node) -> Result<NodeChangeSet, RoutingError> {
        let distance = self.comparator.distance_to(&node.id)?;

        if let Some(existing) = self.entries.get(&distance) {
            return if existing.address == node.address {
                Ok(NodeChangeSet::default())
            } else {
                Err(RoutingError::NodeConflict {
                    existing: existing.clone(),
                })
            };
        }

        self.entries.insert(distance, node.clone());
        if self.entries.len() <= self.max_size {
            return Ok(NodeChangeSet::new(vec![node], Vec::new()));
        }

        match self.entries.pop_last() {
            Some((_, evicted)) if evicted.id == node.id => Ok(NodeChangeSet::default()),
            Some((_, evicted)) => Ok(NodeChangeSet::new(vec![node], vec![evicted])),
            None => Ok(NodeChangeSet::default()),
        }
    }

    /// Remove `node` if present; a different address on record is a conflict.
    pub fn remove(&mut self, node: &Node) -> Result<NodeChangeSet, RoutingError> {
        let distance = self.comparator.distance_to(&node.id)?;

        match self.entries.get(&distance) {
            None => Ok(NodeChangeSet::default()),
            Some(existing) if existing.address != node.address => Err(RoutingError::NodeConflict {
                existing: existing.clone(),
            }),
            Some(_) => {
                let removed = self.entries.remove(&distance).into_iter().collect();
                Ok(NodeChangeSet::new(Vec::new(), removed))
            }
        }
    }

    /// Change capacity, evicting the farthest nodes until the set fits.
    pub fn resize(&mut self, max_size: usize) -> NodeChangeSet {
        self.max_size = max_size;
        let mut removed = Vec::new();
        while self.entries.len() > max_size {
            match self.entries.pop_last() {
                Some((_, node)) => removed.push(node),
                None => break,
            }
        }
        NodeChangeSet::new(Vec::new(), removed)
    }

    /// Nodes, closest first.
    pub fn dump(&self) -> Vec<Node> {
        self.entries.values().cloned().collect()
    }

    pub fn target(&self) -> &Id {
        self.comparator.target()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.comparator
            .distance_to(id)
            .map(|distance| self.entries.contains_key(&distance))
            .unwrap_or(false)
    }

    pub fn closest(&self) -> Option<&Node> {
        self.entries.values().next()
    }

    pub fn farthest(&self) -> Option<&Node> {
        self.entries.values().next_back()
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
}
