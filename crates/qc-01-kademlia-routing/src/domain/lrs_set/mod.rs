//! Least-Recently-Seen Set
//!
//! Bounded collection of entries kept in ascending `last_seen` order. Used
//! both as the active part of a k-bucket and as its replacement cache.

mod set;

pub use set::LeastRecentlySeenSet;
