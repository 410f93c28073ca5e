//! # Wire Codec
//!
//! Canonical binary encoding of ledger transactions.
//!
//! ```text
//! integer.rs     — variable-width unsigned integers
//! byte_string.rs — length-prefixed byte strings
//! shard_mask.rs  — contract header carrying the target's shard mask
//! header.rs      — presence header as a struct, projected to flag bytes
//! encode.rs      — Transaction -> unsigned payload
//! decode.rs      — bytes -> DecodeOutcome, with configurable limits
//! framing.rs     — per-signer signature framing
//! reader.rs      — bounds-checked input cursor
//! ```
//!
//! The layout of a signed transaction:
//!
//! ```text
//! 0xA1 header0 header1 0x00 from
//! [n - 2] [to amount]×n [valid_from] valid_until charge_rate charge_limit
//! [contract header, digest address | name, action, data]
//! [signers - 64] nonce(8, LE) (0x04 identity)×signers
//! (0x40 signature)×signers
//! ```

pub mod byte_string;
pub mod decode;
pub mod encode;
pub mod error;
pub mod framing;
pub mod header;
pub mod integer;
pub mod reader;
pub mod shard_mask;

pub use decode::{decode_transaction, DecodeOutcome, DecodedTransaction, Decoder};
pub use encode::encode_payload;
pub use error::{DecodeError, EncodeError, HeaderError};
pub use framing::encode_transaction;
pub use header::{ContractMode, Header};
