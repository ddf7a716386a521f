//! Routing Tree Implementation
//!
//! A flat, depth-indexed array of k-buckets around the local identifier.
//! Bucket `k` holds peers sharing exactly `k` leading bits with the local id
//! (the deepest bucket also takes everything closer).

mod tree;

pub use tree::{RouteTree, RouteTreeChangeSet, RouteTreeStats};
