//! Value Objects for the Routing Core

use crate::domain::{BitString, RoutingError};

/// XOR distance between two identifiers of equal bit length.
///
/// Ordered as the unsigned integer the XOR bits spell out: a smaller
/// `Distance` means closer. Zero only between identical identifiers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Distance(BitString);

impl Distance {
    pub fn new(bits: BitString) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> &BitString {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|bit| !bit)
    }

    /// Index of the most significant set bit, i.e. the first bit at which
    /// the two identifiers differ. `None` for zero distance.
    pub fn first_differing_bit(&self) -> Option<usize> {
        self.0.iter().position(|bit| bit)
    }
}

/// Structural parameters of a route tree.
///
/// - `bucket_size`: active peers per k-bucket (Kademlia `k`).
/// - `cache_size`: standby candidates per k-bucket replacement cache.
/// - `max_depth`: deepest bucket index. `None` means one bucket per bit
///   position short of the full identifier (`bit_len - 1`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingConfig {
    /// Bucket size (default: 20)
    pub bucket_size: usize,
    /// Replacement cache size (default: 20)
    pub cache_size: usize,
    /// Deepest bucket index (default: full depth)
    pub max_depth: Option<usize>,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            bucket_size: 20,
            cache_size: 20,
            max_depth: None,
        }
    }
}

impl RoutingConfig {
    /// Create a config suitable for testing (smaller values)
    pub fn for_testing() -> Self {
        Self {
            bucket_size: 2,
            cache_size: 2,
            max_depth: None,
        }
    }

    /// Effective max depth for identifiers of `bit_len` bits.
    ///
    /// A bucket at depth `bit_len` would only ever hold the local identifier,
    /// so depth must stay strictly below the identifier length.
    pub fn resolve_max_depth(&self, bit_len: usize) -> Result<usize, RoutingError> {
        if bit_len == 0 {
            return Err(RoutingError::InvalidConfig(
                "base identifier must have at least one bit".into(),
            ));
        }
        match self.max_depth {
            None => Ok(bit_len - 1),
            Some(depth) if depth < bit_len => Ok(depth),
            Some(depth) => Err(RoutingError::InvalidConfig(format!(
                "max depth {depth} must be below identifier bit length {bit_len}"
            ))),
        }
    }

    /// Check the config against identifiers of `bit_len` bits.
    ///
    /// A zero bucket size would make the table unable to hold any peer.
    pub fn validate(&self, bit_len: usize) -> Result<(), RoutingError> {
        if self.bucket_size == 0 {
            return Err(RoutingError::InvalidConfig(
                "bucket size must be at least 1".into(),
            ));
        }
        self.resolve_max_depth(bit_len).map(|_| ())
    }
}
