//! # Key Management
//!
//! secp256k1 keys for ledger identities.
//!
//! - [`Keypair`] holds a private scalar and signs payloads.
//! - [`Identity`] is the public half: the 64-byte uncompressed point that
//!   appears in a transaction's signer list and verifies its signatures.
//! - [`Signature`] is a compact 64-byte `r || s` ECDSA signature.
//!
//! Signatures are computed over SHA-256 of the message with RFC 6979
//! deterministic nonces and are emitted in low-S form. Verification accepts
//! high-S signatures as well, since other implementations on the network
//! do not normalise.
//!
//! Key bytes are never logged and `Keypair`'s `Debug` output only shows the
//! public identity.

use std::fmt;

use k256::ecdsa::signature::{Signer, Verifier};
use k256::ecdsa::{Signature as EcdsaSignature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::config::{
    IDENTITY_UNCOMPRESSED_PREFIX, IDENTITY_WIRE_LENGTH, PUBLIC_KEY_LENGTH, SECRET_KEY_LENGTH,
    SIGNATURE_LENGTH,
};

/// Errors that can occur while parsing key material.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyError {
    #[error("invalid secret key bytes: wrong length or not a valid scalar")]
    InvalidSecretKey,

    #[error("invalid public key bytes: not a valid secp256k1 point")]
    InvalidPublicKey,

    #[error("invalid signature bytes: expected 64 bytes")]
    InvalidSignature,

    #[error("invalid hex encoding")]
    InvalidHex,
}

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Public half of a ledger key pair.
///
/// Stored as the raw `x || y` coordinates. Every constructor checks that
/// the bytes are a point on the curve, so an `Identity` in hand always
/// converts to a usable verifying key.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    bytes: [u8; PUBLIC_KEY_LENGTH],
}

impl Identity {
    /// Parses a public key from either the raw 64-byte form or the 65-byte
    /// SEC1 uncompressed form (`0x04 || x || y`).
    pub fn from_bytes(slice: &[u8]) -> Result<Self, KeyError> {
        let raw = match slice.len() {
            PUBLIC_KEY_LENGTH => slice,
            IDENTITY_WIRE_LENGTH if slice[0] == IDENTITY_UNCOMPRESSED_PREFIX => &slice[1..],
            _ => return Err(KeyError::InvalidPublicKey),
        };

        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        bytes.copy_from_slice(raw);
        let identity = Self { bytes };

        // Reject anything that is not on the curve up front.
        identity.to_verifying_key()?;
        Ok(identity)
    }

    /// Parses a hex-encoded public key (raw or SEC1 uncompressed).
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidHex)?;
        Self::from_bytes(&bytes)
    }

    /// The raw 64-byte `x || y` coordinates.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_LENGTH] {
        &self.bytes
    }

    /// The 65-byte SEC1 uncompressed form, as written on the wire.
    pub fn to_sec1_bytes(&self) -> [u8; IDENTITY_WIRE_LENGTH] {
        let mut out = [0u8; IDENTITY_WIRE_LENGTH];
        out[0] = IDENTITY_UNCOMPRESSED_PREFIX;
        out[1..].copy_from_slice(&self.bytes);
        out
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }

    pub fn to_verifying_key(&self) -> Result<VerifyingKey, KeyError> {
        VerifyingKey::from_sec1_bytes(&self.to_sec1_bytes())
            .map_err(|_| KeyError::InvalidPublicKey)
    }

    /// Checks `signature` over `message` against this identity.
    ///
    /// Malformed signatures simply fail: there is no error oracle.
    pub fn verify(&self, message: &[u8], signature: &[u8]) -> bool {
        let Ok(verifying_key) = self.to_verifying_key() else {
            return false;
        };
        let Ok(signature) = EcdsaSignature::from_slice(signature) else {
            return false;
        };
        let signature = signature.normalize_s().unwrap_or(signature);
        verifying_key.verify(message, &signature).is_ok()
    }

    fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = key.as_affine().to_encoded_point(false);
        let mut bytes = [0u8; PUBLIC_KEY_LENGTH];
        bytes.copy_from_slice(&point.as_bytes()[1..]);
        Self { bytes }
    }
}

impl fmt::Debug for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identity({})", self.to_hex())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Identity::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Signature
// ---------------------------------------------------------------------------

/// A compact ECDSA signature, `r || s`, 64 bytes.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Signature {
    bytes: [u8; SIGNATURE_LENGTH],
}

impl Signature {
    pub fn from_bytes(bytes: [u8; SIGNATURE_LENGTH]) -> Self {
        Self { bytes }
    }

    pub fn from_slice(slice: &[u8]) -> Result<Self, KeyError> {
        let bytes: [u8; SIGNATURE_LENGTH] =
            slice.try_into().map_err(|_| KeyError::InvalidSignature)?;
        Ok(Self { bytes })
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LENGTH] {
        &self.bytes
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.bytes)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_hex())
    }
}

impl Serialize for Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

// ---------------------------------------------------------------------------
// Keypair
// ---------------------------------------------------------------------------

/// A secp256k1 private key together with its public [`Identity`].
///
/// `Keypair` does not implement `Serialize`. Exporting a private key should
/// be a deliberate call to [`Keypair::secret_key_bytes`].
///
/// # Examples
///
/// ```
/// use ledger_tx::crypto::Keypair;
///
/// let kp = Keypair::generate();
/// let sig = kp.sign(b"payload");
/// assert!(kp.identity().verify(b"payload", sig.as_bytes()));
/// ```
#[derive(Clone)]
pub struct Keypair {
    signing_key: SigningKey,
    identity: Identity,
}

impl Keypair {
    /// Generate a fresh keypair from the OS RNG.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::random(&mut OsRng))
    }

    /// Reconstruct a keypair from a 32-byte big-endian private scalar.
    pub fn from_bytes(secret_key_bytes: &[u8]) -> Result<Self, KeyError> {
        if secret_key_bytes.len() != SECRET_KEY_LENGTH {
            return Err(KeyError::InvalidSecretKey);
        }
        let signing_key =
            SigningKey::from_slice(secret_key_bytes).map_err(|_| KeyError::InvalidSecretKey)?;
        Ok(Self::from_signing_key(signing_key))
    }

    /// Reconstruct a keypair from a hex-encoded private scalar.
    pub fn from_hex(hex_str: &str) -> Result<Self, KeyError> {
        let bytes = hex::decode(hex_str).map_err(|_| KeyError::InvalidHex)?;
        Self::from_bytes(&bytes)
    }

    fn from_signing_key(signing_key: SigningKey) -> Self {
        let identity = Identity::from_verifying_key(signing_key.verifying_key());
        Self {
            signing_key,
            identity,
        }
    }

    /// The public identity that verifies this keypair's signatures.
    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Sign `message` (SHA-256 prehash, RFC 6979 nonce, low-S).
    pub fn sign(&self, message: &[u8]) -> Signature {
        let signature: EcdsaSignature = self.signing_key.sign(message);
        let mut bytes = [0u8; SIGNATURE_LENGTH];
        bytes.copy_from_slice(&signature.to_bytes());
        Signature { bytes }
    }

    /// Exports the raw 32-byte private scalar. Handle with care.
    pub fn secret_key_bytes(&self) -> [u8; SECRET_KEY_LENGTH] {
        let mut out = [0u8; SECRET_KEY_LENGTH];
        out.copy_from_slice(&self.signing_key.to_bytes());
        out
    }
}

impl fmt::Debug for Keypair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Public half only.
        write!(f, "Keypair(identity={})", self.identity.to_hex())
    }
}

impl PartialEq for Keypair {
    fn eq(&self, other: &Self) -> bool {
        self.identity == other.identity
    }
}

impl Eq for Keypair {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET_HEX: &str = "1411d53f88e736eac7872430dbe5b55ac28c17a3e648c388e0bd1b161ab04427";
    const PUBLIC_HEX: &str = "18c2a33af8bd2cba7fa714a840a308a217aa4483880b1ef14b4fdffe08ab956e\
                              3f4b921cec33be7c258cfd7025a2b9a942770e5b17758bcc4961bbdc75a0251c";

    #[test]
    fn identity_derived_from_known_secret() {
        let kp = Keypair::from_hex(SECRET_HEX).unwrap();
        assert_eq!(kp.identity().to_hex(), PUBLIC_HEX);
    }

    #[test]
    fn sign_then_verify() {
        let kp = Keypair::generate();
        let sig = kp.sign(b"transfer 100");
        assert!(kp.identity().verify(b"transfer 100", sig.as_bytes()));
    }

    #[test]
    fn verify_rejects_other_message() {
        let kp = Keypair::generate();
        let sig = kp.sign(b"transfer 100");
        assert!(!kp.identity().verify(b"transfer 101", sig.as_bytes()));
    }

    #[test]
    fn verify_rejects_other_identity() {
        let signer = Keypair::generate();
        let other = Keypair::generate();
        let sig = signer.sign(b"msg");
        assert!(!other.identity().verify(b"msg", sig.as_bytes()));
    }

    #[test]
    fn verify_rejects_malformed_signature_bytes() {
        let kp = Keypair::generate();
        assert!(!kp.identity().verify(b"msg", &[0u8; 10]));
        assert!(!kp.identity().verify(b"msg", &[0u8; 64]));
    }

    #[test]
    fn signing_is_deterministic() {
        let kp = Keypair::from_hex(SECRET_HEX).unwrap();
        assert_eq!(kp.sign(b"payload"), kp.sign(b"payload"));
    }

    #[test]
    fn identity_accepts_raw_and_sec1_forms() {
        let kp = Keypair::generate();
        let id = kp.identity();
        assert_eq!(Identity::from_bytes(id.as_bytes()).unwrap(), id);
        assert_eq!(Identity::from_bytes(&id.to_sec1_bytes()).unwrap(), id);
    }

    #[test]
    fn identity_rejects_off_curve_point() {
        assert_eq!(
            Identity::from_bytes(&[0x11u8; 64]),
            Err(KeyError::InvalidPublicKey)
        );
    }

    #[test]
    fn identity_rejects_wrong_prefix() {
        let mut sec1 = Keypair::generate().identity().to_sec1_bytes();
        sec1[0] = 0x02;
        assert_eq!(Identity::from_bytes(&sec1), Err(KeyError::InvalidPublicKey));
    }

    #[test]
    fn keypair_rejects_bad_secret() {
        assert_eq!(Keypair::from_bytes(&[0u8; 32]), Err(KeyError::InvalidSecretKey));
        assert_eq!(Keypair::from_bytes(&[1u8; 31]), Err(KeyError::InvalidSecretKey));
        assert_eq!(Keypair::from_hex("zz"), Err(KeyError::InvalidHex));
    }

    #[test]
    fn secret_key_roundtrip() {
        let kp = Keypair::generate();
        let restored = Keypair::from_bytes(&kp.secret_key_bytes()).unwrap();
        assert_eq!(kp, restored);
    }

    #[test]
    fn debug_does_not_leak_secret() {
        let kp = Keypair::from_hex(SECRET_HEX).unwrap();
        let debug = format!("{:?}", kp);
        assert!(!debug.contains(SECRET_HEX));
        assert!(debug.contains(&kp.identity().to_hex()));
    }

    #[test]
    fn identity_serde_as_hex() {
        let id = Keypair::from_hex(SECRET_HEX).unwrap().identity();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{}\"", PUBLIC_HEX));
        let back: Identity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
