//! Test utilities for the routing core.
//!
//! This module provides deterministic `TimeSource` implementations and small
//! helpers for building identifiers and nodes. Enable with the `test-utils`
//! feature flag.
//!
//! # Example
//!
//! ```rust
//! use qc_01_kademlia_routing::test_utils::FixedTimeSource;
//! use qc_01_kademlia_routing::TimeSource;
//!
//! let time_source = FixedTimeSource::new(1000);
//! assert_eq!(time_source.now().as_millis(), 1000);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crate::domain::{Id, Node, Timestamp};
use crate::ports::outbound::TimeSource;

/// A time source that returns a fixed timestamp.
#[derive(Debug, Clone)]
pub struct FixedTimeSource {
    timestamp: u64,
}

impl FixedTimeSource {
    /// Create a new fixed time source with the given timestamp (in milliseconds).
    pub fn new(timestamp: u64) -> Self {
        Self { timestamp }
    }

    /// Get the configured timestamp value.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

impl TimeSource for FixedTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.timestamp)
    }
}

/// Thread-safe time source whose clock only moves when told to.
///
/// Every `now()` call returns the current value and then advances it by
/// `step` milliseconds, so consecutive touches get strictly increasing times
/// when `step > 0`.
#[derive(Debug)]
pub struct ControllableTimeSource {
    time: AtomicU64,
    step: u64,
}

impl ControllableTimeSource {
    /// Clock starting at `initial` that never advances on its own.
    pub fn new(initial: u64) -> Self {
        Self::with_step(initial, 0)
    }

    /// Clock starting at `initial` that advances by `step` after each read.
    pub fn with_step(initial: u64, step: u64) -> Self {
        Self {
            time: AtomicU64::new(initial),
            step,
        }
    }

    /// Advances the internal clock by the specified milliseconds.
    pub fn advance(&self, millis: u64) {
        self.time.fetch_add(millis, Ordering::SeqCst);
    }

    /// Peek at the clock without advancing it.
    pub fn current(&self) -> u64 {
        self.time.load(Ordering::SeqCst)
    }
}

impl TimeSource for ControllableTimeSource {
    fn now(&self) -> Timestamp {
        Timestamp::new(self.time.fetch_add(self.step, Ordering::SeqCst))
    }
}

/// Identifier of `bit_len` bits holding `value` in its low bits.
///
/// # Panics
///
/// Panics if `bit_len > 64`.
pub fn make_id(value: u64, bit_len: usize) -> Id {
    Id::from_unsigned(value, bit_len).expect("bit_len must be at most 64")
}

/// Node with id `make_id(value, bit_len)` and address `node-<value>`.
pub fn make_node(value: u64, bit_len: usize) -> Node {
    Node::new(make_id(value, bit_len), format!("node-{value}"))
}
