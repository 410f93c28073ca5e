//! Signature framing.
//!
//! A signed transaction is the payload followed by one length-prefixed
//! signature per declared signer, in signer order. A 64-byte signature
//! frames as `0x40 || signature`, 65 bytes.

use bytes::BufMut;

use super::byte_string::{decode_bytes, encode_bytes};
use super::error::{DecodeError, EncodeError};
use super::reader::Reader;
use crate::config::SIGNATURE_LENGTH;
use crate::crypto::keys::{Keypair, Signature};
use crate::transaction::Transaction;

/// Wire size of one framed signature.
pub const FRAMED_SIGNATURE_LENGTH: usize = 1 + SIGNATURE_LENGTH;

pub fn encode_signatures<B: BufMut>(buf: &mut B, signatures: &[Signature]) {
    for signature in signatures {
        encode_bytes(buf, signature.as_bytes());
    }
}

/// Reads exactly `count` framed signatures.
pub fn decode_signatures(
    reader: &mut Reader<'_>,
    count: usize,
) -> Result<Vec<Signature>, DecodeError> {
    let mut signatures = Vec::with_capacity(count.min(reader.remaining() / FRAMED_SIGNATURE_LENGTH));
    for index in 0..count {
        let raw = decode_bytes(reader)?;
        let signature = Signature::from_slice(raw).map_err(|_| DecodeError::InvalidSignatureLength {
            index,
            len: raw.len(),
        })?;
        signatures.push(signature);
    }
    Ok(signatures)
}

/// Encodes `tx` and signs it with `keys`, one per signer in signer order.
///
/// Equivalent to sealing, signing and framing in one call.
///
/// # Examples
///
/// ```
/// use ledger_tx::crypto::Keypair;
/// use ledger_tx::encode_transaction;
/// use ledger_tx::transaction::Transaction;
///
/// let kp = Keypair::generate();
/// let mut tx = Transaction::new();
/// tx.set_from_address(kp.identity());
/// tx.add_signer(kp.identity()).unwrap();
///
/// let bytes = encode_transaction(&tx, &[kp]).unwrap();
/// assert_eq!(bytes[bytes.len() - 65], 0x40);
/// ```
pub fn encode_transaction(tx: &Transaction, keys: &[Keypair]) -> Result<Vec<u8>, EncodeError> {
    let signed = tx.clone().seal()?.sign(keys)?;
    Ok(signed.to_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn framed_signatures_are_65_bytes_each() {
        let kp = Keypair::generate();
        let sigs = vec![kp.sign(b"a"), kp.sign(b"b")];
        let mut buf = Vec::new();
        encode_signatures(&mut buf, &sigs);
        assert_eq!(buf.len(), 2 * FRAMED_SIGNATURE_LENGTH);
        assert_eq!(buf[0], 0x40);
        assert_eq!(buf[65], 0x40);

        let decoded = decode_signatures(&mut Reader::new(&buf), 2).unwrap();
        assert_eq!(decoded, sigs);
    }

    #[test]
    fn missing_signature_is_truncation() {
        let kp = Keypair::generate();
        let mut buf = Vec::new();
        encode_signatures(&mut buf, &[kp.sign(b"a")]);
        assert!(matches!(
            decode_signatures(&mut Reader::new(&buf), 2),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn wrong_signature_length_is_structural() {
        let mut buf = Vec::new();
        encode_bytes(&mut buf, &[0u8; 63]);
        assert_eq!(
            decode_signatures(&mut Reader::new(&buf), 1),
            Err(DecodeError::InvalidSignatureLength { index: 0, len: 63 })
        );
    }

    #[test]
    fn huge_count_does_not_preallocate() {
        let sigs = decode_signatures(&mut Reader::new(&[]), 0).unwrap();
        assert!(sigs.is_empty());
        assert!(decode_signatures(&mut Reader::new(&[]), usize::MAX).is_err());
    }
}
