//! Structured diffs returned by every mutation.
//!
//! A change set lists the entries a call added, removed and updated. Higher
//! layers build theirs by concatenating their children's, so composition is
//! associative and `NO_CHANGE` is its identity.

use crate::domain::{Entry, Node, Timestamp};

/// An existing entry whose last-seen time was refreshed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatedEntry {
    pub node: Node,
    pub old_time: Timestamp,
    pub new_time: Timestamp,
}

impl UpdatedEntry {
    pub fn new(node: Node, old_time: Timestamp, new_time: Timestamp) -> Self {
        Self {
            node,
            old_time,
            new_time,
        }
    }
}

/// Added / removed / updated entries produced by one operation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ChangeSet {
    added: Vec<Entry>,
    removed: Vec<Entry>,
    updated: Vec<UpdatedEntry>,
}

impl ChangeSet {
    /// The empty change set: a legal call that changed nothing.
    pub const NO_CHANGE: ChangeSet = ChangeSet {
        added: Vec::new(),
        removed: Vec::new(),
        updated: Vec::new(),
    };

    pub fn new(added: Vec<Entry>, removed: Vec<Entry>, updated: Vec<UpdatedEntry>) -> Self {
        Self {
            added,
            removed,
            updated,
        }
    }

    pub fn with_added(entry: Entry) -> Self {
        Self::new(vec![entry], Vec::new(), Vec::new())
    }

    pub fn with_removed(entries: Vec<Entry>) -> Self {
        Self::new(Vec::new(), entries, Vec::new())
    }

    pub fn with_updated(update: UpdatedEntry) -> Self {
        Self::new(Vec::new(), Vec::new(), vec![update])
    }

    pub fn added(&self) -> &[Entry] {
        &self.added
    }

    pub fn removed(&self) -> &[Entry] {
        &self.removed
    }

    pub fn updated(&self) -> &[UpdatedEntry] {
        &self.updated
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty() && self.updated.is_empty()
    }

    /// `(added, removed, updated)` counts, handy for logging and assertions.
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.added.len(), self.removed.len(), self.updated.len())
    }

    /// Append `other`'s changes after this set's.
    pub fn merge(mut self, other: ChangeSet) -> Self {
        self.added.extend(other.added);
        self.removed.extend(other.removed);
        self.updated.extend(other.updated);
        self
    }

    /// Concatenate change sets in order.
    pub fn concat(sets: impl IntoIterator<Item = ChangeSet>) -> Self {
        sets.into_iter().fold(Self::NO_CHANGE, Self::merge)
    }
}
