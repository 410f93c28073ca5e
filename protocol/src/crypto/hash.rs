//! # Hashing Utilities
//!
//! SHA-256 is the only hash the transaction format uses: account addresses
//! are the SHA-256 of a public key, ECDSA signs the SHA-256 of the payload,
//! and the transaction digest is the SHA-256 of the payload rendered as
//! lowercase hex.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use ledger_tx::crypto::sha256;
///
/// let hash = sha256(b"ledger");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// SHA-256 over arbitrary bytes, rendered as 64 lowercase hex characters.
///
/// Applied to an unsigned payload this is the transaction identifier: it
/// does not change when signatures are added.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(sha256(data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha256_known_vector() {
        // NIST test vector for "abc".
        assert_eq!(
            sha256_hex(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn sha256_empty_input() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn hex_digest_is_fixed_width() {
        for input in [&b""[..], b"a", &[0u8; 1024]] {
            let digest = sha256_hex(input);
            assert_eq!(digest.len(), 64);
            assert!(digest.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        }
    }

    #[test]
    fn different_inputs_different_digests() {
        assert_ne!(sha256(b"payload-1"), sha256(b"payload-2"));
    }
}
