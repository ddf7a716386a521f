use crate::domain::{Id, KBucketDump, Node, RouteTreeChangeSet, RouteTreeStats, RoutingError};
use crate::ports::RoutingApi;
use crate::service::RoutingService;

impl RoutingApi for RoutingService {
    fn touch_node(&mut self, node: Node) -> Result<RouteTreeChangeSet, RoutingError> {
        let now = self.now();
        self.route_tree.touch(now, node)
    }

    fn stale_node(&mut self, node: &Node) -> Result<RouteTreeChangeSet, RoutingError> {
        self.route_tree.stale(node)
    }

    fn remove_node(&mut self, node: &Node) -> Result<RouteTreeChangeSet, RoutingError> {
        self.route_tree.remove(node)
    }

    fn find_closest_nodes(&self, target: &Id, count: usize) -> Result<Vec<Node>, RoutingError> {
        self.route_tree.get_closest(target, count)
    }

    fn resize(&mut self, bucket_size: usize, cache_size: usize) -> Vec<RouteTreeChangeSet> {
        self.route_tree.resize(bucket_size, cache_size)
    }

    fn dump(&self) -> Vec<KBucketDump> {
        self.route_tree.dump()
    }

    fn stats(&self) -> RouteTreeStats {
        self.route_tree.stats()
    }
}
