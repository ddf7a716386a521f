use std::time::Instant;

use crate::domain::Timestamp;
use crate::ports::TimeSource;

// ============================================================================
// SystemTimeSource - Production Time Source
// ============================================================================

/// Production time source using the monotonic system clock.
///
/// Reports milliseconds elapsed since the source was created, so readings
/// never go backwards even if the wall clock is adjusted. For testing, use
/// `FixedTimeSource` or `ControllableTimeSource` from the test utilities.
///
/// # Example
///
/// ```rust
/// use qc_01_kademlia_routing::adapters::SystemTimeSource;
/// use qc_01_kademlia_routing::ports::TimeSource;
///
/// let time_source = SystemTimeSource::new();
/// let first = time_source.now();
/// assert!(time_source.now() >= first);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct SystemTimeSource {
    anchor: Instant,
}

impl SystemTimeSource {
    /// Create a new system time source anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        let millis = u64::try_from(self.anchor.elapsed().as_millis()).unwrap_or(u64::MAX);
        Timestamp::new(millis)
    }
}
