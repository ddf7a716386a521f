//! # Adapters
//!
//! Concrete implementations of the driven ports.
//!
//! - `time` - monotonic `TimeSource` backed by `std::time::Instant`
//! - `config` - static and TOML-based `ConfigProvider`s (TOML requires the
//!   `config` feature)

pub mod config;
pub mod time;

pub use config::StaticConfigProvider;
#[cfg(feature = "config")]
pub use config::{ConfigError, TomlConfigProvider};
pub use time::SystemTimeSource;
