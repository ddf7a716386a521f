//! Domain Errors for the Routing Core
//!
//! Two failure classes exist:
//! - **Validation failures**: the request itself is malformed (bad bit text,
//!   out-of-range offsets, mismatched bit lengths, the local id used where it
//!   is disallowed).
//! - **Identity conflicts**: a known identifier was presented with a
//!   different address than the one on record.
//!
//! A legal request that changes nothing is NOT an error; it is reported as an
//! empty change set. No operation mutates state before returning an error.

use thiserror::Error;

use crate::domain::{BitString, Entry, Id, Node};

/// Errors that can occur during routing table operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    /// Bit string text contained something other than '0' or '1'
    #[error("invalid bit string text: unexpected {found:?} at position {position}")]
    InvalidBitText { position: usize, found: char },

    /// Requested bit range does not fit inside the source
    #[error("bit range out of bounds: offset {offset} + length {length} exceeds {available} bits")]
    BitRangeOutOfBounds {
        offset: usize,
        length: usize,
        available: usize,
    },

    /// Single bit index past the end of the bit string
    #[error("bit index {index} out of bounds for bit string of length {length}")]
    BitIndexOutOfBounds { index: usize, length: usize },

    /// Integer conversion wider than 64 bits
    #[error("cannot convert {length} bits to an integer (max 64)")]
    IntegerTooWide { length: usize },

    /// Two identifiers/bit strings that must have equal lengths do not
    #[error("bit length mismatch: expected {expected}, found {found}")]
    BitLengthMismatch { expected: usize, found: usize },

    /// The local node's own identifier was passed where it is disallowed
    #[error("identifier must not match base identifier {base_id}")]
    BaseIdMatch { base_id: Id },

    /// Identifier routed to a bucket whose prefix it does not carry
    #[error("identifier {id} does not start with bucket prefix {prefix}")]
    PrefixMismatch { id: Id, prefix: BitString },

    /// Structural parameters rejected at construction time
    #[error("invalid routing configuration: {0}")]
    InvalidConfig(String),

    /// Identifier already tracked under a different address
    #[error(
        "identifier {} already tracked with address {:?}",
        existing.node.id,
        existing.node.address
    )]
    EntryConflict { existing: Entry },

    /// Identifier already present in a near-set under a different address
    #[error("identifier {} already present with address {:?}", existing.id, existing.address)]
    NodeConflict { existing: Node },
}

impl RoutingError {
    /// True for identity conflicts, false for validation failures.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EntryConflict { .. } | Self::NodeConflict { .. })
    }

    /// The node already on record when this is an identity conflict.
    pub fn conflicting_node(&self) -> Option<&Node> {
        match self {
            Self::EntryConflict { existing } => Some(&existing.node),
            Self::NodeConflict { existing } => Some(existing),
            _ => None,
        }
    }
}
