//! Variable-width unsigned integers.
//!
//! ```text
//! 0x00..=0x7F      value itself                   1 byte
//! 0xC0 b           u8,  big-endian                2 bytes
//! 0xC1 b b         u16, big-endian                3 bytes
//! 0xC2 b b b b     u32, big-endian                5 bytes
//! 0xC3 b × 8       u64, big-endian                9 bytes
//! ```
//!
//! The encoder always picks the shortest form and the decoder only accepts
//! the shortest form, so each value has exactly one encoding.

use bytes::BufMut;

use super::error::DecodeError;
use super::reader::Reader;

const SHORT_LIMIT: u64 = 0x80;
const WIDE_TAG: u8 = 0xC0;
const WIDE_TAG_MASK: u8 = 0xF0;
const WIDE_WIDTH_MASK: u8 = 0x0F;

/// Largest width exponent we accept: 2^3 = 8 bytes.
const MAX_WIDTH_LOG2: u8 = 3;

/// log2 of the payload width for a wide value.
fn width_log2(value: u64) -> u8 {
    if value <= u8::MAX as u64 {
        0
    } else if value <= u16::MAX as u64 {
        1
    } else if value <= u32::MAX as u64 {
        2
    } else {
        3
    }
}

/// Number of bytes `value` occupies on the wire.
pub fn encoded_len(value: u64) -> usize {
    if value < SHORT_LIMIT {
        1
    } else {
        1 + (1 << width_log2(value))
    }
}

pub fn encode_integer<B: BufMut>(buf: &mut B, value: u64) {
    if value < SHORT_LIMIT {
        buf.put_u8(value as u8);
        return;
    }
    let log2 = width_log2(value);
    let width = 1usize << log2;
    buf.put_u8(WIDE_TAG | log2);
    buf.put_slice(&value.to_be_bytes()[8 - width..]);
}

pub fn decode_integer(reader: &mut Reader<'_>) -> Result<u64, DecodeError> {
    let tag = reader.read_u8()?;
    if (tag as u64) < SHORT_LIMIT {
        return Ok(tag as u64);
    }
    if tag & WIDE_TAG_MASK != WIDE_TAG || tag & WIDE_WIDTH_MASK > MAX_WIDTH_LOG2 {
        return Err(DecodeError::InvalidIntegerTag(tag));
    }

    let log2 = tag & WIDE_WIDTH_MASK;
    let width = 1usize << log2;
    let value = reader
        .read_slice(width)?
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | b as u64);

    if value < SHORT_LIMIT || width_log2(value) != log2 {
        return Err(DecodeError::NonCanonicalInteger { value, width });
    }
    Ok(value)
}
