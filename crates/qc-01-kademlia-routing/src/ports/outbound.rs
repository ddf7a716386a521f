//! # Driven Ports (Outbound SPI)
//!
//! These are the interfaces this crate **requires** the host application to implement.

use crate::domain::{RoutingConfig, Timestamp};

/// Abstract interface for time-related operations.
///
/// Enables deterministic testing by injecting controllable time sources.
/// Timestamps must never go backwards for a single source.
///
/// # Example Implementation
///
/// ```rust,ignore
/// struct Ticks(AtomicU64);
///
/// impl TimeSource for Ticks {
///     fn now(&self) -> Timestamp {
///         Timestamp::new(self.0.fetch_add(1, Ordering::SeqCst))
///     }
/// }
/// ```
pub trait TimeSource: Send + Sync {
    /// Get the current timestamp.
    fn now(&self) -> Timestamp;
}

/// Abstract interface for configuration loading.
///
/// Allows different configuration sources (file, environment, etc.)
pub trait ConfigProvider: Send + Sync {
    /// Get routing table configuration parameters.
    fn routing_config(&self) -> RoutingConfig;
}
