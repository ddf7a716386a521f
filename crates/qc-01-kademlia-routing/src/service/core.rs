use crate::domain::{Id, RouteTree, RoutingConfig, RoutingError, Timestamp};
use crate::ports::{ConfigProvider, TimeSource};

/// Routing Service implementing the driving port.
///
/// Wraps a `RouteTree` and a `TimeSource` to provide time-aware operations.
/// Not internally synchronized: share it across threads behind one lock.
///
/// # Example
///
/// ```rust,ignore
/// use qc_01_kademlia_routing::service::RoutingService;
/// use qc_01_kademlia_routing::ports::RoutingApi;
///
/// let local_id = Id::from_bytes(&[0u8; 20], 160)?;
/// let mut service = RoutingService::new(
///     local_id,
///     &RoutingConfig::default(),
///     Box::new(SystemTimeSource::new()),
/// )?;
///
/// // Use via the trait
/// let stats = service.stats();
/// ```
pub struct RoutingService {
    /// The underlying route tree (domain layer)
    pub(crate) route_tree: RouteTree,
    /// Time source stamping every touch
    pub(crate) time_source: Box<dyn TimeSource>,
}

impl RoutingService {
    /// Create a new routing service.
    ///
    /// # Arguments
    ///
    /// * `base_id` - Our own node ID
    /// * `config` - Bucket, cache and depth parameters
    /// * `time_source` - Provider for current time
    pub fn new(
        base_id: Id,
        config: &RoutingConfig,
        time_source: Box<dyn TimeSource>,
    ) -> Result<Self, RoutingError> {
        Ok(Self {
            route_tree: RouteTree::new(base_id, config)?,
            time_source,
        })
    }

    /// Create a service using the configuration supplied by `provider`.
    pub fn from_provider(
        base_id: Id,
        provider: &dyn ConfigProvider,
        time_source: Box<dyn TimeSource>,
    ) -> Result<Self, RoutingError> {
        Self::new(base_id, &provider.routing_config(), time_source)
    }

    /// Get the current timestamp from the time source.
    pub(crate) fn now(&self) -> Timestamp {
        self.time_source.now()
    }

    /// Get the underlying route tree (for advanced operations).
    pub fn route_tree(&self) -> &RouteTree {
        &self.route_tree
    }

    /// Get mutable access to the route tree.
    pub fn route_tree_mut(&mut self) -> &mut RouteTree {
        &mut self.route_tree
    }
}
