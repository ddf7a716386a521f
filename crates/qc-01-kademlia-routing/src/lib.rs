//! # Kademlia Routing Core
//!
//! This crate implements the routing table of a Kademlia Distributed Hash
//! Table (DHT): which known peers are closest to a given identifier, and how
//! the bounded set of known peers is maintained as peers are seen, go stale,
//! or are evicted.
//!
//! The core performs no I/O. It is driven by two events ("node observed at
//! time T", "node failed to respond") and answers every mutation with a
//! change set describing exactly what changed.
//!
//! ## Features
//!
//! - `config` - TOML configuration provider (serde, toml)
//! - `test-utils` - deterministic time sources and id helpers
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture with:
//! - **Domain Layer:** Bit strings, XOR distance, k-buckets, route tree
//! - **Ports Layer:** Trait definitions for external dependencies
//! - **Service Layer:** Wires domain to ports
//! - **Adapters Layer:** Concrete implementations
//!
//! ## Example
//!
//! ```rust
//! use qc_01_kademlia_routing::{Id, Node, RouteTree, RoutingConfig, Timestamp};
//!
//! // 4-bit identifier space around local id 0000
//! let local_id = Id::from_unsigned(0b0000, 4).unwrap();
//! let mut tree = RouteTree::new(local_id, &RoutingConfig::for_testing()).unwrap();
//!
//! let peer = Node::new(Id::from_unsigned(0b0011, 4).unwrap(), "10.0.0.3:4000");
//! let changes = tree.touch(Timestamp::new(1), peer.clone()).unwrap();
//! assert_eq!(changes.prefix().to_string(), "001");
//!
//! let target = Id::from_unsigned(0b0010, 4).unwrap();
//! assert_eq!(tree.get_closest(&target, 1).unwrap(), vec![peer]);
//! ```

// =============================================================================
// CORE MODULES
// =============================================================================

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

/// Test utilities (FixedTimeSource, etc.)
/// Requires feature: `test-utils`
#[cfg(feature = "test-utils")]
pub mod test_utils;

// =============================================================================
// CORE RE-EXPORTS (Always Available)
// =============================================================================

// Domain entities
pub use domain::{
    BitOrder, BitString, ChangeSet, Distance, Entry, Id, KBucket, KBucketChangeSet, KBucketDump,
    LeastRecentlySeenSet, NearSet, Node, NodeChangeSet, RouteTree, RouteTreeChangeSet,
    RouteTreeStats, RoutingConfig, RoutingError, Timestamp, UpdatedEntry,
};

// Domain services
pub use domain::{
    bucket_index, bucket_prefix, find_k_closest, sort_by_closeness, xor_distance,
    ClosenessComparator,
};

// Port traits
pub use ports::{ConfigProvider, RoutingApi, TimeSource};

// Service
pub use service::RoutingService;

// =============================================================================
// ADAPTER RE-EXPORTS
// =============================================================================

pub use adapters::{StaticConfigProvider, SystemTimeSource};

#[cfg(feature = "config")]
pub use adapters::{ConfigError, TomlConfigProvider};

// =============================================================================
// TEST UTILITIES (Requires `test-utils` feature)
// =============================================================================

#[cfg(feature = "test-utils")]
pub use test_utils::{ControllableTimeSource, FixedTimeSource};
