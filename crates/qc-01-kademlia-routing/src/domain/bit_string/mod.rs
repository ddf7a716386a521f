//! Immutable fixed-length bit strings.
//!
//! Foundation for identifiers and bucket prefixes. Every mutator returns a
//! new `BitString`; the receiver is never modified, so callers may keep
//! references to earlier values.
//!
//! Bit 0 is the first (most significant) bit. Two construction paths from
//! raw bytes are supported, see [`BitOrder`]; both normalize to the same
//! internal representation.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use bitvec::prelude::*;

use crate::domain::RoutingError;

type Bits = BitVec<u8, Msb0>;

/// Bit-ordering convention of a byte buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitOrder {
    /// Bit `i` is bit `7 - i % 8` of byte `i / 8` (MSB first).
    Logical,
    /// Bit `i` is bit `i % 8` of byte `i / 8` (LSB first, each byte reversed).
    Read,
}

/// Immutable, fixed-length sequence of bits.
///
/// Equality, hashing and ordering depend only on length and bit values, never
/// on how the value was constructed. For equal lengths, ordering is that of
/// the unsigned integer the bits spell out.
#[derive(Clone, Default)]
pub struct BitString {
    bits: Bits,
}

impl BitString {
    /// The zero-length bit string.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse a textual `'0'`/`'1'` representation. No whitespace is tolerated.
    pub fn from_text(text: &str) -> Result<Self, RoutingError> {
        let mut bits = Bits::with_capacity(text.len());
        for (position, found) in text.chars().enumerate() {
            match found {
                '0' => bits.push(false),
                '1' => bits.push(true),
                _ => return Err(RoutingError::InvalidBitText { position, found }),
            }
        }
        Ok(Self { bits })
    }

    /// Read `length` bits starting at bit `offset` of `bytes`.
    pub fn from_bytes(
        bytes: &[u8],
        offset: usize,
        length: usize,
        order: BitOrder,
    ) -> Result<Self, RoutingError> {
        check_range(offset, length, bytes.len().saturating_mul(8))?;

        let range = offset..offset + length;
        let bits: Bits = match order {
            BitOrder::Logical => BitSlice::<u8, Msb0>::from_slice(bytes)[range]
                .iter()
                .by_vals()
                .collect(),
            BitOrder::Read => BitSlice::<u8, Lsb0>::from_slice(bytes)[range]
                .iter()
                .by_vals()
                .collect(),
        };
        Ok(Self { bits })
    }

    /// Build from the low `length` bits of `value`, most significant first.
    pub fn from_unsigned(value: u64, length: usize) -> Result<Self, RoutingError> {
        if length > 64 {
            return Err(RoutingError::IntegerTooWide { length });
        }
        let bits = (0..length)
            .map(|i| (value >> (length - 1 - i)) & 1 == 1)
            .collect();
        Ok(Self { bits })
    }

    /// Number of bits.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True for the zero-length bit string.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Iterate bit values from index 0.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = bool> + '_ {
        self.bits.iter().by_vals()
    }

    pub fn get_bit(&self, index: usize) -> Result<bool, RoutingError> {
        self.bits
            .get(index)
            .map(|bit| *bit)
            .ok_or(RoutingError::BitIndexOutOfBounds {
                index,
                length: self.len(),
            })
    }

    pub fn set_bit(&self, index: usize, value: bool) -> Result<Self, RoutingError> {
        self.check_index(index)?;
        let mut bits = self.bits.clone();
        bits.set(index, value);
        Ok(Self { bits })
    }

    pub fn flip_bit(&self, index: usize) -> Result<Self, RoutingError> {
        let current = self.get_bit(index)?;
        self.set_bit(index, !current)
    }

    /// Copy out `length` bits starting at `from`.
    pub fn slice(&self, from: usize, length: usize) -> Result<Self, RoutingError> {
        check_range(from, length, self.len())?;
        let bits = self.bits[from..from + length].iter().by_vals().collect();
        Ok(Self { bits })
    }

    /// Overwrite `[from, from + modifier.len())` with the bits of `modifier`.
    pub fn set_bits(&self, from: usize, modifier: &BitString) -> Result<Self, RoutingError> {
        check_range(from, modifier.len(), self.len())?;
        let mut bits = self.bits.clone();
        bits[from..from + modifier.len()].copy_from_bitslice(modifier.bits.as_bitslice());
        Ok(Self { bits })
    }

    /// Interpret `length` (≤ 64) bits starting at `from` as an unsigned
    /// integer, first bit most significant.
    pub fn as_unsigned(&self, from: usize, length: usize) -> Result<u64, RoutingError> {
        if length > 64 {
            return Err(RoutingError::IntegerTooWide { length });
        }
        check_range(from, length, self.len())?;
        Ok(self.bits[from..from + length]
            .iter()
            .by_vals()
            .fold(0u64, |acc, bit| (acc << 1) | u64::from(bit)))
    }

    /// Concatenate `other` after this bit string.
    pub fn append(&self, other: &BitString) -> Self {
        let mut bits = self.bits.clone();
        bits.extend_from_bitslice(other.bits.as_bitslice());
        Self { bits }
    }

    /// Bitwise XOR; lengths must match.
    pub fn xor(&self, other: &BitString) -> Result<Self, RoutingError> {
        if self.len() != other.len() {
            return Err(RoutingError::BitLengthMismatch {
                expected: self.len(),
                found: other.len(),
            });
        }
        let bits = self.iter().zip(other.iter()).map(|(a, b)| a ^ b).collect();
        Ok(Self { bits })
    }

    /// Count of equal leading bits, compared up to the shorter length.
    pub fn shared_prefix_length(&self, other: &BitString) -> usize {
        self.iter()
            .zip(other.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Count of equal trailing bits, each string read from its own end,
    /// compared up to the shorter length.
    pub fn shared_suffix_length(&self, other: &BitString) -> usize {
        self.iter()
            .rev()
            .zip(other.iter().rev())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// True when `prefix` is a leading subsequence of this bit string.
    pub fn starts_with(&self, prefix: &BitString) -> bool {
        prefix.len() <= self.len() && self.shared_prefix_length(prefix) == prefix.len()
    }

    /// Pack into bytes, MSB first, zero-padding the final byte.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = vec![0u8; self.len().div_ceil(8)];
        for (i, bit) in self.iter().enumerate() {
            if bit {
                out[i / 8] |= 0x80 >> (i % 8);
            }
        }
        out
    }

    fn check_index(&self, index: usize) -> Result<(), RoutingError> {
        if index < self.len() {
            Ok(())
        } else {
            Err(RoutingError::BitIndexOutOfBounds {
                index,
                length: self.len(),
            })
        }
    }
}

fn check_range(offset: usize, length: usize, available: usize) -> Result<(), RoutingError> {
    match offset.checked_add(length) {
        Some(end) if end <= available => Ok(()),
        _ => Err(RoutingError::BitRangeOutOfBounds {
            offset,
            length,
            available,
        }),
    }
}

impl PartialEq for BitString {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl Eq for BitString {}

impl Hash for BitString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.len().hash(state);
        self.to_bytes().hash(state);
    }
}

impl PartialOrd for BitString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BitString {
    /// Shorter strings first; equal lengths compare as unsigned integers.
    fn cmp(&self, other: &Self) -> Ordering {
        self.len()
            .cmp(&other.len())
            .then_with(|| self.iter().cmp(other.iter()))
    }
}

impl fmt::Display for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.iter() {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}

impl fmt::Debug for BitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitString({self})")
    }
}

impl FromStr for BitString {
    type Err = RoutingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_text(s)
    }
}
