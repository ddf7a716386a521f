use crate::domain::RoutingConfig;
use crate::ports::ConfigProvider;

// ============================================================================
// StaticConfigProvider - Hardcoded config for testing/development
// ============================================================================

/// Static configuration provider with hardcoded values.
///
/// Useful for testing and development. For file-based configuration, use
/// `TomlConfigProvider`.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    config: RoutingConfig,
}

impl StaticConfigProvider {
    /// Create with default config.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with specified routing config.
    #[must_use]
    pub fn with_config(mut self, config: RoutingConfig) -> Self {
        self.config = config;
        self
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn routing_config(&self) -> RoutingConfig {
        self.config.clone()
    }
}

// ============================================================================
// TomlConfigProvider - Config file loading (requires "config" feature)
// ============================================================================

#[cfg(feature = "config")]
mod toml_config {
    use super::*;
    use crate::domain::RoutingError;
    use serde::Deserialize;
    use std::fs;
    use std::path::Path;
    use thiserror::Error;

    /// Configuration file structure.
    #[derive(Debug, Deserialize, Default)]
    struct ConfigFile {
        #[serde(default)]
        routing: RoutingConfigFile,
    }

    #[derive(Debug, Deserialize, Default)]
    struct RoutingConfigFile {
        bucket_size: Option<usize>,
        cache_size: Option<usize>,
        max_depth: Option<usize>,
    }

    /// TOML-based configuration provider.
    ///
    /// Loads routing table configuration from a TOML file. Missing keys fall
    /// back to `RoutingConfig::default()`.
    ///
    /// # Config File Format
    ///
    /// ```toml
    /// [routing]
    /// bucket_size = 20
    /// cache_size = 20
    /// max_depth = 159
    /// ```
    #[derive(Debug, Clone)]
    pub struct TomlConfigProvider {
        config: RoutingConfig,
    }

    impl TomlConfigProvider {
        /// Load configuration from a TOML file, validated for identifiers of
        /// `id_bits` bits.
        ///
        /// # Errors
        ///
        /// Returns error if the file cannot be read, parsed or validated.
        pub fn load<P: AsRef<Path>>(path: P, id_bits: usize) -> Result<Self, ConfigError> {
            let content = fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::Io {
                path: path.as_ref().display().to_string(),
                error: e.to_string(),
            })?;

            Self::parse(&content, id_bits)
        }

        /// Parse configuration from a TOML string.
        pub fn parse(content: &str, id_bits: usize) -> Result<Self, ConfigError> {
            let file: ConfigFile =
                toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;

            let defaults = RoutingConfig::default();
            let rc = file.routing;
            let config = RoutingConfig {
                bucket_size: rc.bucket_size.unwrap_or(defaults.bucket_size),
                cache_size: rc.cache_size.unwrap_or(defaults.cache_size),
                max_depth: rc.max_depth.or(defaults.max_depth),
            };
            config.validate(id_bits)?;

            Ok(Self { config })
        }
    }

    impl ConfigProvider for TomlConfigProvider {
        fn routing_config(&self) -> RoutingConfig {
            self.config.clone()
        }
    }

    /// Errors that can occur during config loading.
    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    pub enum ConfigError {
        /// File I/O error.
        #[error("failed to read config file {path}: {error}")]
        Io {
            /// Path of the file that failed to load.
            path: String,
            /// Error message from the I/O operation.
            error: String,
        },
        /// TOML syntax or type error.
        #[error("failed to parse config: {0}")]
        Parse(String),
        /// Values parsed but rejected.
        #[error(transparent)]
        Invalid(#[from] RoutingError),
    }

}

#[cfg(feature = "config")]
pub use toml_config::{ConfigError, TomlConfigProvider};
