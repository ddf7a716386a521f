//! Core Domain Entities for the Routing Core
//!
//! Identifiers, peers and the timestamped entries stored in
//! least-recently-seen sets.

use std::fmt;
use std::str::FromStr;

use crate::domain::{BitString, Distance, RoutingError};

/// DHT address: a bit string of fixed length.
///
/// All identifiers combined or compared with each other must share the same
/// bit length; operations that mix lengths fail with
/// [`RoutingError::BitLengthMismatch`] rather than truncating.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(BitString);

impl Id {
    /// Wrap an existing bit string.
    pub fn new(bits: BitString) -> Self {
        Self(bits)
    }

    /// Identifier from the low `bit_len` bits of `value`, MSB first.
    pub fn from_unsigned(value: u64, bit_len: usize) -> Result<Self, RoutingError> {
        BitString::from_unsigned(value, bit_len).map(Self)
    }

    /// Identifier from the first `bit_len` bits of a byte buffer (MSB first).
    pub fn from_bytes(bytes: &[u8], bit_len: usize) -> Result<Self, RoutingError> {
        BitString::from_bytes(bytes, 0, bit_len, crate::domain::BitOrder::Logical).map(Self)
    }

    pub fn bit_len(&self) -> usize {
        self.0.len()
    }

    /// Underlying bits.
    pub fn bits(&self) -> &BitString {
        &self.0
    }

    /// XOR distance to `other`. Bit lengths must match.
    pub fn distance(&self, other: &Id) -> Result<Distance, RoutingError> {
        self.ensure_same_len(other)?;
        self.0.xor(&other.0).map(Distance::new)
    }

    /// Number of leading bits shared with `other`.
    pub fn shared_prefix_length(&self, other: &Id) -> usize {
        self.0.shared_prefix_length(&other.0)
    }

    /// Fails with `BitLengthMismatch` unless `other` has this id's bit length.
    pub fn ensure_same_len(&self, other: &Id) -> Result<(), RoutingError> {
        if self.bit_len() == other.bit_len() {
            Ok(())
        } else {
            Err(RoutingError::BitLengthMismatch {
                expected: self.bit_len(),
                found: other.bit_len(),
            })
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.0)
    }
}

impl FromStr for Id {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BitString::from_text(s).map(Self)
    }
}

impl From<BitString> for Id {
    fn from(bits: BitString) -> Self {
        Self(bits)
    }
}

/// A peer: identifier plus an opaque network address.
///
/// Two records with the same id but different addresses are a conflict.
/// Conflicts are surfaced to the caller, never resolved silently.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    /// DHT identifier.
    pub id: Id,
    /// Opaque transport address (e.g. "10.0.0.1:4000").
    pub address: String,
}

impl Node {
    pub fn new(id: Id, address: impl Into<String>) -> Self {
        Self {
            id,
            address: address.into(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.id, self.address)
    }
}

/// Caller-supplied monotonic timestamp.
///
/// The core never reads a clock; every `touch` carries its own time. The unit
/// is opaque to the core (milliseconds by convention, see `TimeSource`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp(u64);

impl Timestamp {
    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Add milliseconds (saturating).
    pub fn add_millis(&self, millis: u64) -> Self {
        Self(self.0.saturating_add(millis))
    }
}

/// A node together with the last time it was seen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entry {
    pub node: Node,
    pub last_seen: Timestamp,
}

impl Entry {
    pub fn new(node: Node, last_seen: Timestamp) -> Self {
        Self { node, last_seen }
    }
}
