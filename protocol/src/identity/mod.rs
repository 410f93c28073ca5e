//! # Identity Module
//!
//! Account addressing. A ledger participant is known by two related values:
//!
//! 1. **Identity** ([`crate::crypto::Identity`]) — the secp256k1 public key.
//!    Signers are listed by identity because the decoder needs the full key
//!    to check their signatures.
//! 2. **Address** ([`Address`]) — SHA-256 of the identity's 64-byte public
//!    key. Senders, transfer recipients and contracts are referenced by
//!    address, which is half the size on the wire.
//!
//! Every identity maps to exactly one address; the reverse is not
//! recoverable, which is why signer slots never use addresses.

pub mod address;

pub use address::{Address, AddressError};
