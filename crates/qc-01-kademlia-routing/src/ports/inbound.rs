//! # Driving Ports (Inbound API)
//!
//! The API the lookup and maintenance layers drive the routing table through.

use crate::domain::{Id, KBucketDump, Node, RouteTreeChangeSet, RouteTreeStats, RoutingError};

/// Primary API for interacting with the routing table.
///
/// Every mutation returns the change it caused; an empty change set means
/// the call was legal but changed nothing. Identity conflicts and invalid
/// input are errors and leave the table untouched.
///
/// # Example
///
/// ```rust,ignore
/// use qc_01_kademlia_routing::ports::RoutingApi;
///
/// fn lookup<T: RoutingApi>(api: &T, target: &Id) {
///     let closest = api.find_closest_nodes(target, 20)?;
///     println!("Found {} nodes", closest.len());
/// }
/// ```
pub trait RoutingApi {
    /// Record that `node` responded or contacted us just now.
    fn touch_node(&mut self, node: Node) -> Result<RouteTreeChangeSet, RoutingError>;

    /// Report that `node` failed a liveness probe.
    ///
    /// Promotes a replacement from the bucket's cache when one is waiting.
    fn stale_node(&mut self, node: &Node) -> Result<RouteTreeChangeSet, RoutingError>;

    /// Forget `node` without promoting a replacement.
    fn remove_node(&mut self, node: &Node) -> Result<RouteTreeChangeSet, RoutingError>;

    /// Up to `count` active nodes, closest to `target` first.
    ///
    /// Used for iterative node lookups in the Kademlia DHT.
    fn find_closest_nodes(&self, target: &Id, count: usize) -> Result<Vec<Node>, RoutingError>;

    /// Change bucket and cache capacities of every bucket.
    fn resize(&mut self, bucket_size: usize, cache_size: usize) -> Vec<RouteTreeChangeSet>;

    /// Snapshot of every bucket.
    fn dump(&self) -> Vec<KBucketDump>;

    /// Get current routing table statistics.
    fn stats(&self) -> RouteTreeStats;
}
