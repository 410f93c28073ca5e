//! Length-prefixed byte strings: `integer(len) || bytes`.

use bytes::BufMut;

use super::error::DecodeError;
use super::integer::{decode_integer, encode_integer, encoded_len as integer_len};
use super::reader::Reader;

pub fn encoded_len(data: &[u8]) -> usize {
    integer_len(data.len() as u64) + data.len()
}

pub fn encode_bytes<B: BufMut>(buf: &mut B, data: &[u8]) {
    encode_integer(buf, data.len() as u64);
    buf.put_slice(data);
}

/// Reads one framed byte string, borrowing from the input.
///
/// The declared length is checked against what is left before anything is
/// sliced or allocated.
pub fn decode_bytes<'a>(reader: &mut Reader<'a>) -> Result<&'a [u8], DecodeError> {
    let declared = decode_integer(reader)?;
    let remaining = reader.remaining();
    match usize::try_from(declared) {
        Ok(len) if len <= remaining => reader.read_slice(len),
        _ => Err(DecodeError::Truncated {
            needed: usize::try_from(declared).unwrap_or(usize::MAX),
            remaining,
        }),
    }
}

/// Reads one framed UTF-8 string.
pub fn decode_string(reader: &mut Reader<'_>) -> Result<String, DecodeError> {
    let raw = decode_bytes(reader)?;
    std::str::from_utf8(raw)
        .map(str::to_owned)
        .map_err(|_| DecodeError::InvalidUtf8)
}
