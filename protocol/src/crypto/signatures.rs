//! # Digital Signatures
//!
//! Signing and verification over a shared message, fanned out across
//! threads.
//!
//! A transaction with several signers has every signature computed over
//! the same immutable payload bytes, so the work is independent per key.
//! The helpers here run it on the `rayon` pool but always hand results
//! back in input order: signature position is what ties a signature to
//! its signer on the wire.

use rayon::prelude::*;

use super::keys::{Identity, Keypair, Signature};

/// Sign a message with a single keypair.
pub fn sign(keypair: &Keypair, message: &[u8]) -> Signature {
    keypair.sign(message)
}

/// Verify one signature. Malformed input is just `false`.
pub fn verify(identity: &Identity, message: &[u8], signature: &[u8]) -> bool {
    identity.verify(message, signature)
}

/// Sign `message` with every keypair, returning signatures in key order.
pub fn sign_all(keypairs: &[Keypair], message: &[u8]) -> Vec<Signature> {
    keypairs.par_iter().map(|kp| kp.sign(message)).collect()
}

/// Verify each `(identity, signature)` pair against `message`.
///
/// Returns one verdict per pair, in input order, so callers can report
/// exactly which signer failed.
pub fn verify_all<S>(pairs: &[(Identity, S)], message: &[u8]) -> Vec<bool>
where
    S: AsRef<[u8]> + Sync,
{
    pairs
        .par_iter()
        .map(|(identity, signature)| identity.verify(message, signature.as_ref()))
        .collect()
}
