//! # Cryptographic Primitives
//!
//! Thin, typed wrappers over audited implementations:
//!
//! - **secp256k1 ECDSA** (`k256`) for identities and signatures.
//! - **SHA-256** (`sha2`) for addresses, signing prehash and digests.
//!
//! Nothing in here implements curve arithmetic or hashing by hand.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{sha256, sha256_hex};
pub use keys::{Identity, KeyError, Keypair, Signature};
pub use signatures::{sign, sign_all, verify, verify_all};
