//! Kademlia distance calculations.

use std::cmp::Ordering;

use crate::domain::{BitString, Distance, Id, RoutingError};

/// Calculate the XOR distance between two identifiers.
///
/// # Properties
/// - Symmetric: `xor_distance(a, b) == xor_distance(b, a)`
/// - Zero only for identical identifiers
/// - Fails with `BitLengthMismatch` for identifiers of different lengths
pub fn xor_distance(a: &Id, b: &Id) -> Result<Distance, RoutingError> {
    a.distance(b)
}

/// Bucket index of `id` in a route tree rooted at `base`.
///
/// Equals the number of leading bits `id` shares with `base`, clamped to
/// `max_depth`: the deepest bucket takes every id at least that close.
pub fn bucket_index(base: &Id, id: &Id, max_depth: usize) -> usize {
    base.shared_prefix_length(id).min(max_depth)
}

/// Prefix shared by every identifier stored in bucket `depth`.
///
/// Bucket `k` covers ids agreeing with `base` on exactly `k` leading bits, so
/// its prefix is `base[0..k]` followed by the complement of `base[k]`. A
/// clamped deepest bucket (`depth == max_depth < bit_len - 1`) covers every
/// id agreeing on at least `max_depth` bits and its prefix is
/// `base[0..max_depth]`.
pub fn bucket_prefix(base: &Id, depth: usize, max_depth: usize) -> Result<BitString, RoutingError> {
    let bits = base.bits();
    if depth == max_depth && depth + 1 < bits.len() {
        bits.slice(0, depth)
    } else {
        bits.slice(0, depth + 1)?.flip_bit(depth)
    }
}

/// Orders identifiers by XOR distance to a fixed target, closest first.
///
/// Two identifiers tie only when they are equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClosenessComparator {
    target: Id,
}

impl ClosenessComparator {
    pub fn new(target: Id) -> Self {
        Self { target }
    }

    pub fn target(&self) -> &Id {
        &self.target
    }

    /// Distance from the target to `id`.
    pub fn distance_to(&self, id: &Id) -> Result<Distance, RoutingError> {
        xor_distance(&self.target, id)
    }

    /// `Less` when `a` is closer to the target than `b`.
    pub fn compare(&self, a: &Id, b: &Id) -> Result<Ordering, RoutingError> {
        Ok(self.distance_to(a)?.cmp(&self.distance_to(b)?))
    }
}
