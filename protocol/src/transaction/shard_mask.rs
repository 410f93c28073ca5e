//! Shard routing masks.
//!
//! A [`ShardMask`] is a fixed-length bit set attached to a contract or
//! chain-code target. Bit `i` set means the call may touch shard `i`.
//!
//! Only lengths the wire format can express are constructible: zero (the
//! wildcard, "any shard") or a power of two no smaller than two.

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ShardMaskError {
    #[error("unsupported shard mask length {0}: must be 0 or a power of two >= 2")]
    UnsupportedLength(usize),

    #[error("bit index {index} out of range for a {len}-bit mask")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("packed mask for {bits} bits needs {expected} bytes, got {got}")]
    PackedLength {
        bits: usize,
        expected: usize,
        got: usize,
    },

    #[error("packed mask has bits set beyond its length")]
    UnusedBitsSet,
}

/// Fixed-length shard bit set.
///
/// Bits are packed least-significant first: bit `i` lives at bit `i % 8`
/// of byte `i / 8`. Bits past `len` are always zero, so two masks with the
/// same set bits compare equal.
///
/// # Examples
///
/// ```
/// use ledger_tx::transaction::ShardMask;
///
/// let mut mask = ShardMask::new(4).unwrap();
/// mask.set(2, true).unwrap();
/// assert!(mask.get(2));
/// assert!(!mask.get(3));
/// assert!(ShardMask::new(3).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ShardMask {
    len: usize,
    packed: Vec<u8>,
}

impl ShardMask {
    /// An all-clear mask of `len` bits.
    pub fn new(len: usize) -> Result<Self, ShardMaskError> {
        if !Self::is_supported_len(len) {
            return Err(ShardMaskError::UnsupportedLength(len));
        }
        Ok(Self {
            len,
            packed: vec![0u8; len.div_ceil(8)],
        })
    }

    /// The zero-length wildcard mask.
    pub fn wildcard() -> Self {
        Self::default()
    }

    /// A mask of `len` bits with exactly the listed indices set.
    pub fn with_bits<I>(len: usize, bits: I) -> Result<Self, ShardMaskError>
    where
        I: IntoIterator<Item = usize>,
    {
        let mut mask = Self::new(len)?;
        for index in bits {
            mask.set(index, true)?;
        }
        Ok(mask)
    }

    /// Rebuilds a mask from its least-significant-first packed bytes.
    pub fn from_packed(len: usize, packed: Vec<u8>) -> Result<Self, ShardMaskError> {
        if !Self::is_supported_len(len) {
            return Err(ShardMaskError::UnsupportedLength(len));
        }
        let expected = len.div_ceil(8);
        if packed.len() != expected {
            return Err(ShardMaskError::PackedLength {
                bits: len,
                expected,
                got: packed.len(),
            });
        }
        if len % 8 != 0 {
            let used = (1u8 << (len % 8)) - 1;
            if packed[expected - 1] & !used != 0 {
                return Err(ShardMaskError::UnusedBitsSet);
            }
        }
        Ok(Self { len, packed })
    }

    pub fn is_supported_len(len: usize) -> bool {
        len == 0 || (len >= 2 && len.is_power_of_two())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// True for the zero-length wildcard mask.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reads bit `index`. Out-of-range indices read as clear.
    pub fn get(&self, index: usize) -> bool {
        index < self.len && self.packed[index / 8] & (1 << (index % 8)) != 0
    }

    pub fn set(&mut self, index: usize, value: bool) -> Result<(), ShardMaskError> {
        if index >= self.len {
            return Err(ShardMaskError::IndexOutOfRange {
                index,
                len: self.len,
            });
        }
        let bit = 1u8 << (index % 8);
        if value {
            self.packed[index / 8] |= bit;
        } else {
            self.packed[index / 8] &= !bit;
        }
        Ok(())
    }

    /// Indices of the set bits, ascending.
    pub fn iter_set(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |&i| self.get(i))
    }

    pub fn count_set(&self) -> usize {
        self.packed.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// Packed storage, least-significant bit first.
    pub fn packed(&self) -> &[u8] {
        &self.packed
    }
}

impl Serialize for ShardMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let set: Vec<usize> = self.iter_set().collect();
        let mut state = serializer.serialize_struct("ShardMask", 2)?;
        state.serialize_field("bits", &self.len)?;
        state.serialize_field("set", &set)?;
        state.end()
    }
}
