// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Ledger Transactions — Core Library
//!
//! Builds, encodes, decodes, signs and verifies ledger transactions. The
//! centre of gravity is the wire codec: a compact binary format with a
//! presence-flag header, variable-width integers, a contract/chain-code
//! target with an embedded shard mask, and one length-prefixed signature
//! per declared signer appended after the unsigned payload.
//!
//! ## Architecture
//!
//! - **crypto** — secp256k1 keys and signatures, SHA-256 helpers.
//! - **identity** — 32-byte account addresses derived from public keys.
//! - **transaction** — the mutable builder, its value types, the sealed
//!   (frozen) and signed forms.
//! - **codec** — integer / byte-string / shard-mask primitives, the payload
//!   encoder and decoder, and signature framing.
//! - **config** — wire constants and decoder limits.
//!
//! ## Quick tour
//!
//! ```
//! use ledger_tx::crypto::Keypair;
//! use ledger_tx::transaction::Transaction;
//! use ledger_tx::{decode_transaction, encode_transaction};
//!
//! let alice = Keypair::generate();
//! let bob = Keypair::generate();
//!
//! let mut tx = Transaction::new();
//! tx.set_from_address(alice.identity());
//! tx.add_transfer(bob.identity(), 1_000);
//! tx.add_signer(alice.identity()).unwrap();
//!
//! let bytes = encode_transaction(&tx, &[alice]).unwrap();
//! let decoded = decode_transaction(&bytes).unwrap().into_decoded().unwrap();
//! assert_eq!(decoded.transaction(), &tx);
//! assert!(decoded.all_signatures_valid(&bytes));
//! ```
//!
//! ## Failure tiers
//!
//! Decoding distinguishes three outcomes. A stream that cannot possibly be a
//! transaction (wrong protocol tag, unsupported version) is a fatal
//! [`HeaderError`]. A stream that starts correctly but is truncated or
//! internally inconsistent is reported as [`DecodeOutcome::Failure`]. A
//! well-formed transaction whose signatures do not check out decodes
//! successfully; signature verification is a separate step.

pub mod codec;
pub mod config;
pub mod crypto;
pub mod identity;
pub mod transaction;

pub use codec::{
    decode_transaction, encode_payload, encode_transaction, DecodeError, DecodeOutcome,
    DecodedTransaction, Decoder, EncodeError, HeaderError,
};
pub use crypto::hash::sha256_hex;
