//! 32-byte account addresses.
//!
//! ```text
//! identity (64 bytes, x || y)
//!     -> SHA-256 -> address (32 bytes)
//! ```

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::ADDRESS_LENGTH;
use crate::crypto::hash::sha256;
use crate::crypto::keys::Identity;

/// Errors that can occur while parsing an address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid address length: expected {expected} bytes, got {got}")]
    InvalidLength { expected: usize, got: usize },

    #[error("invalid hex encoding")]
    InvalidHex,
}

/// A ledger account address: SHA-256 of the owner's public key.
///
/// Addresses are also used for contract references (the contract digest
/// and the contract owner's address), since both are 32-byte hashes on the
/// wire.
///
/// # Examples
///
/// ```
/// use ledger_tx::crypto::Keypair;
/// use ledger_tx::identity::Address;
///
/// let kp = Keypair::generate();
/// let addr = Address::from(kp.identity());
/// assert_eq!(addr.to_hex().len(), 64);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    /// Wraps raw address bytes without any derivation.
    pub const fn new(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_bytes(slice: &[u8]) -> Result<Self, AddressError> {
        let bytes: [u8; ADDRESS_LENGTH] =
            slice.try_into().map_err(|_| AddressError::InvalidLength {
                expected: ADDRESS_LENGTH,
                got: slice.len(),
            })?;
        Ok(Self(bytes))
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, AddressError> {
        let bytes = hex::decode(hex_str).map_err(|_| AddressError::InvalidHex)?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl From<&Identity> for Address {
    fn from(identity: &Identity) -> Self {
        Self(sha256(identity.as_bytes()))
    }
}

impl From<Identity> for Address {
    fn from(identity: Identity) -> Self {
        Self::from(&identity)
    }
}

impl From<[u8; ADDRESS_LENGTH]> for Address {
    fn from(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_hex())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;

    #[test]
    fn test_address_of_known_key() {
        let kp = Keypair::from_hex(
            "1411d53f88e736eac7872430dbe5b55ac28c17a3e648c388e0bd1b161ab04427",
        )
        .unwrap();
        assert_eq!(
            Address::from(kp.identity()).to_hex(),
            "532398dd883d1990f7dad3fde6a53a53347afc2680a04748f7f15ad03cadc4d4"
        );
    }

    #[test]
    fn test_owned_and_borrowed_conversions_agree() {
        let id = Keypair::generate().identity();
        assert_eq!(Address::from(&id), Address::from(id));
    }

    #[test]
    fn test_from_bytes_rejects_wrong_length() {
        assert_eq!(
            Address::from_bytes(&[0u8; 31]),
            Err(AddressError::InvalidLength {
                expected: 32,
                got: 31
            })
        );
    }

    #[test]
    fn test_hex_roundtrip() {
        let addr = Address::new([0xAB; 32]);
        assert_eq!(Address::from_hex(&addr.to_hex()).unwrap(), addr);
        assert_eq!(Address::from_hex("xyz"), Err(AddressError::InvalidHex));
    }

    #[test]
    fn test_serde_as_hex_string() {
        let addr = Address::new([0x01; 32]);
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{}\"", "01".repeat(32)));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, addr);
    }
}
