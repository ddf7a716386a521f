//! K-Bucket with replacement cache.
//!
//! A bucket owns every identifier starting with its prefix. Active peers live
//! in a bounded least-recently-seen set; candidates that arrive while the
//! bucket is full wait in a second, independently bounded set (the
//! replacement cache) until an active peer goes stale.

mod bucket;

pub use bucket::{KBucket, KBucketChangeSet, KBucketDump};
