//! Codec error types.
//!
//! Decoding failures come in two tiers. [`HeaderError`] means the stream is
//! not a transaction of this protocol at all and is returned as `Err`.
//! [`DecodeError`] means the stream looked right but is truncated or
//! internally inconsistent; it is reported inside
//! [`super::DecodeOutcome::Failure`].

use thiserror::Error;

use crate::crypto::keys::Identity;

/// Fatal framing errors: the input is not one of ours.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HeaderError {
    #[error("empty input")]
    Empty,

    #[error("invalid protocol tag {0:#04x}")]
    InvalidMagic(u8),

    #[error("unsupported payload version {0}")]
    UnsupportedVersion(u8),
}

/// Content errors found after the header checked out.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("truncated input: needed {needed} bytes, {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },

    #[error("unsupported integer tag {0:#04x}")]
    InvalidIntegerTag(u8),

    #[error("integer {value} not minimally encoded in {width} bytes")]
    NonCanonicalInteger { value: u64, width: usize },

    #[error("reserved header bit is set")]
    ReservedBitSet,

    #[error("charge unit flag is not supported")]
    ChargeUnitUnsupported,

    #[error("reserved byte must be zero, got {0:#04x}")]
    ReservedByte(u8),

    #[error("multiple-transfers flag set without the transfers flag")]
    MultipleTransfersWithoutTransfers,

    #[error("valid_from flag set with a zero height")]
    ZeroValidFrom,

    #[error("invalid contract header {0:#04x}")]
    InvalidContractHeader(u8),

    #[error("invalid identity at signer {index}")]
    InvalidIdentity { index: usize },

    #[error("duplicate signer {0}")]
    DuplicateSigner(Identity),

    #[error("text field is not valid UTF-8")]
    InvalidUtf8,

    #[error("signature {index} has length {len}, expected 64")]
    InvalidSignatureLength { index: usize, len: usize },

    #[error("{field} count {value} exceeds limit {limit}")]
    LimitExceeded {
        field: &'static str,
        value: u64,
        limit: u64,
    },

    #[error("{0} unexpected bytes after the last signature")]
    TrailingBytes(usize),
}

/// Reasons a transaction cannot be encoded or signed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("from address is not set")]
    MissingFromAddress,

    #[error("transaction has no signers")]
    NoSigners,

    #[error("action is set but the transaction has no target")]
    ActionWithoutTarget,

    #[error("data is set but the transaction has no target")]
    DataWithoutTarget,

    #[error("synergetic data submission requires a contract target")]
    SynergeticWithoutContract,

    #[error("expected {expected} signing keys, got {got}")]
    SignerCount { expected: usize, got: usize },

    #[error("signing key at position {index} does not match the declared signer")]
    SignerMismatch { index: usize },

    #[error("{field} count {value} exceeds the decoder limit {limit}")]
    LimitExceeded {
        field: &'static str,
        value: u64,
        limit: u64,
    },
}
