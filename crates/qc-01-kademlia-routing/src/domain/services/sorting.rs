//! Node sorting and selection.

use super::distance::ClosenessComparator;
use crate::domain::{Id, Node, RoutingError};

/// Sort nodes by XOR distance from a target (closest first).
///
/// Fails if any node's id differs in bit length from `target`.
pub fn sort_by_closeness(nodes: &[Node], target: &Id) -> Result<Vec<Node>, RoutingError> {
    let comparator = ClosenessComparator::new(target.clone());
    let mut keyed = nodes
        .iter()
        .map(|node| Ok((comparator.distance_to(&node.id)?, node.clone())))
        .collect::<Result<Vec<_>, RoutingError>>()?;
    keyed.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(keyed.into_iter().map(|(_, node)| node).collect())
}

/// Find the k closest nodes to a target from a list
///
/// # Returns
/// Up to k nodes sorted by distance (closest first)
pub fn find_k_closest(nodes: &[Node], target: &Id, k: usize) -> Result<Vec<Node>, RoutingError> {
    let mut sorted = sort_by_closeness(nodes, target)?;
    sorted.truncate(k);
    Ok(sorted)
}
