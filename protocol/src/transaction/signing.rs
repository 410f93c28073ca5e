//! Sealed and signed transactions.
//!
//! Signing is a separate step from building because the keys may not be
//! available where the transaction is assembled. The sealed form owns the
//! exact payload bytes, so every signer signs the same immutable buffer and
//! the digest can be handed out before any key is involved.

use bytes::{Bytes, BytesMut};
use tracing::{debug, warn};

use super::builder::Transaction;
use crate::codec::{encode_payload, framing, EncodeError};
use crate::crypto::hash::sha256;
use crate::crypto::keys::{Keypair, Signature};
use crate::crypto::signatures::sign_all;

// ---------------------------------------------------------------------------
// UnsignedTransaction
// ---------------------------------------------------------------------------

/// A transaction frozen into its canonical payload.
///
/// The digest is SHA-256 over the payload alone and does not change when
/// signatures are added, so it identifies the transaction from here on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    transaction: Transaction,
    payload: Bytes,
    digest: [u8; 32],
}

impl UnsignedTransaction {
    pub(crate) fn from_transaction(transaction: Transaction) -> Result<Self, EncodeError> {
        let mut buf = BytesMut::new();
        encode_payload(&mut buf, &transaction)?;
        let payload = buf.freeze();
        let digest = sha256(&payload);
        Ok(Self {
            transaction,
            payload,
            digest,
        })
    }

    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    /// The unsigned payload bytes every signer signs.
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn digest(&self) -> [u8; 32] {
        self.digest
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// Signs the payload with one key per declared signer.
    ///
    /// `keys` must line up with the transaction's signers: same length, and
    /// the key at each position must belong to the signer at that position.
    pub fn sign(&self, keys: &[Keypair]) -> Result<SignedTransaction, EncodeError> {
        let signers = self.transaction.signers();
        if keys.len() != signers.len() {
            return Err(EncodeError::SignerCount {
                expected: signers.len(),
                got: keys.len(),
            });
        }
        for (index, (key, signer)) in keys.iter().zip(signers).enumerate() {
            if key.identity() != *signer {
                warn!(
                    index,
                    expected = %signer,
                    got = %key.identity(),
                    "signing key does not match declared signer"
                );
                return Err(EncodeError::SignerMismatch { index });
            }
        }

        let signatures = sign_all(keys, &self.payload);
        debug!(
            digest = %self.digest_hex(),
            signers = signatures.len(),
            "signed transaction payload"
        );

        Ok(SignedTransaction {
            payload: self.payload.clone(),
            digest: self.digest,
            signatures,
        })
    }
}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// A sealed payload plus one signature per signer, in signer order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    payload: Bytes,
    digest: [u8; 32],
    signatures: Vec<Signature>,
}

impl SignedTransaction {
    pub fn payload(&self) -> &Bytes {
        &self.payload
    }

    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// Total size of the framed transaction.
    pub fn encoded_len(&self) -> usize {
        self.payload.len() + self.signatures.len() * framing::FRAMED_SIGNATURE_LENGTH
    }

    /// The final wire bytes: payload followed by the framed signatures.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        out.extend_from_slice(&self.payload);
        framing::encode_signatures(&mut out, &self.signatures);
        out
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
