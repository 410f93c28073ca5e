//! Wire form of a target's shard mask: the contract header.
//!
//! ```text
//! 1000_0000                     wildcard, zero-length mask
//! 0000_00mm                     2-bit mask inline
//! 0001_mmmm                     4-bit mask inline
//! 01ee_eeee  b × 2^e            2^(e + 3)-bit mask, bytes most significant first
//! ```
//!
//! In the extended form bit `i` of the mask is bit `i % 8` of the byte
//! `i / 8` positions from the end.

use bytes::BufMut;

use super::error::DecodeError;
use super::reader::Reader;
use crate::config::{
    SHARD_MASK_EXPONENT_MASK, SHARD_MASK_EXTENDED, SHARD_MASK_FOUR_BITS, SHARD_MASK_WILDCARD,
};
use crate::transaction::ShardMask;

const TWO_BIT_MASK: u8 = 0x03;
const FOUR_BIT_MASK: u8 = 0x0F;

/// Extended masks start at 8 bits, i.e. exponent 0 means 2^3.
const EXTENDED_EXPONENT_BIAS: u32 = 3;

pub fn encoded_len(mask: &ShardMask) -> usize {
    match mask.len() {
        0 | 2 | 4 => 1,
        bits => 1 + bits / 8,
    }
}

pub fn encode_shard_mask<B: BufMut>(buf: &mut B, mask: &ShardMask) {
    match mask.len() {
        0 => buf.put_u8(SHARD_MASK_WILDCARD),
        2 => buf.put_u8(mask.packed()[0] & TWO_BIT_MASK),
        4 => buf.put_u8(SHARD_MASK_FOUR_BITS | (mask.packed()[0] & FOUR_BIT_MASK)),
        bits => {
            // ShardMask only admits powers of two, so this is exact.
            let exponent = bits.trailing_zeros() - EXTENDED_EXPONENT_BIAS;
            buf.put_u8(SHARD_MASK_EXTENDED | exponent as u8);
            for byte in mask.packed().iter().rev() {
                buf.put_u8(*byte);
            }
        }
    }
}

/// Reads a contract header and any trailing mask bytes.
///
/// Extended masks wider than `max_bits` are rejected before their bytes
/// are read.
pub fn decode_shard_mask(reader: &mut Reader<'_>, max_bits: u64) -> Result<ShardMask, DecodeError> {
    let header = reader.read_u8()?;
    let invalid = || DecodeError::InvalidContractHeader(header);

    if header & SHARD_MASK_WILDCARD != 0 {
        if header != SHARD_MASK_WILDCARD {
            return Err(invalid());
        }
        return Ok(ShardMask::wildcard());
    }

    if header & SHARD_MASK_EXTENDED != 0 {
        let log2 = (header & SHARD_MASK_EXPONENT_MASK) as u32 + EXTENDED_EXPONENT_BIAS;
        let declared = 1u64.checked_shl(log2).unwrap_or(u64::MAX);
        let bits = match usize::try_from(declared) {
            Ok(bits) if log2 < 64 && declared <= max_bits => bits,
            _ => {
                return Err(DecodeError::LimitExceeded {
                    field: "shard mask bits",
                    value: declared,
                    limit: max_bits,
                })
            }
        };
        let packed: Vec<u8> = reader.read_slice(bits / 8)?.iter().rev().copied().collect();
        return ShardMask::from_packed(bits, packed).map_err(|_| invalid());
    }

    let (bits, value) = if header & SHARD_MASK_FOUR_BITS != 0 {
        if header & !(SHARD_MASK_FOUR_BITS | FOUR_BIT_MASK) != 0 {
            return Err(invalid());
        }
        (4, header & FOUR_BIT_MASK)
    } else {
        if header & !TWO_BIT_MASK != 0 {
            return Err(invalid());
        }
        (2, header & TWO_BIT_MASK)
    };
    ShardMask::from_packed(bits, vec![value]).map_err(|_| invalid())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(mask: &ShardMask) -> Vec<u8> {
        let mut buf = Vec::new();
        encode_shard_mask(&mut buf, mask);
        assert_eq!(buf.len(), encoded_len(mask));
        buf
    }

    fn decode(bytes: &[u8]) -> Result<ShardMask, DecodeError> {
        decode_shard_mask(&mut Reader::new(bytes), 1 << 16)
    }

    #[test]
    fn test_wildcard() {
        assert_eq!(encode(&ShardMask::wildcard()), vec![0x80]);
        assert_eq!(decode(&[0x80]).unwrap(), ShardMask::wildcard());
    }

    #[test]
    fn test_two_bit_mask() {
        let mask = ShardMask::with_bits(2, [0]).unwrap();
        assert_eq!(encode(&mask), vec![0x01]);
        assert_eq!(decode(&[0x01]).unwrap(), mask);
        // An all-clear 2-bit mask is still a mask, not a wildcard.
        assert_eq!(decode(&[0x00]).unwrap(), ShardMask::new(2).unwrap());
    }

    #[test]
    fn test_four_bit_mask() {
        let mask = ShardMask::with_bits(4, [2, 3]).unwrap();
        assert_eq!(encode(&mask), vec![0x1C]);
        assert_eq!(decode(&[0x1C]).unwrap(), mask);
    }

    #[test]
    fn test_sixteen_bit_mask_byte_order() {
        let mask = ShardMask::with_bits(16, [0, 1, 3, 5, 7, 9, 11, 13, 14, 15]).unwrap();
        assert_eq!(hex::encode(encode(&mask)), "41eaab");
        assert_eq!(decode(&[0x41, 0xEA, 0xAB]).unwrap(), mask);
    }

    #[test]
    fn test_eight_bit_mask() {
        let mask = ShardMask::with_bits(8, [7]).unwrap();
        assert_eq!(encode(&mask), vec![0x40, 0x80]);
        assert_eq!(decode(&[0x40, 0x80]).unwrap(), mask);
    }

    #[test]
    fn test_wide_mask_roundtrip() {
        let mask = ShardMask::with_bits(256, [0, 8, 100, 255]).unwrap();
        let bytes = encode(&mask);
        assert_eq!(bytes[0], 0x45);
        assert_eq!(bytes.len(), 33);
        assert_eq!(decode(&bytes).unwrap(), mask);
    }

    #[test]
    fn test_unused_header_bits_rejected() {
        for header in [0x81, 0xC0, 0x04, 0x08, 0x20, 0x30] {
            assert_eq!(
                decode(&[header, 0, 0]),
                Err(DecodeError::InvalidContractHeader(header)),
                "header {:#04x}",
                header
            );
        }
    }

    #[test]
    fn test_extended_mask_truncated() {
        assert!(matches!(
            decode(&[0x41, 0xEA]),
            Err(DecodeError::Truncated {
                needed: 2,
                remaining: 1
            })
        ));
    }

    #[test]
    fn test_extended_mask_limit() {
        let err = decode_shard_mask(&mut Reader::new(&[0x41, 0, 0]), 8).unwrap_err();
        assert_eq!(
            err,
            DecodeError::LimitExceeded {
                field: "shard mask bits",
                value: 16,
                limit: 8
            }
        );
        // Exponent field maxed out: 2^66 bits.
        assert!(matches!(
            decode(&[0x7F]),
            Err(DecodeError::LimitExceeded { value: u64::MAX, .. })
        ));
    }
}
