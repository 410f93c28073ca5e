//! # Protocol Configuration & Constants
//!
//! Every wire constant lives here. The values are frozen protocol
//! parameters: two encoders that disagree on any of them produce payloads
//! that hash and verify differently, so changing one is a network upgrade,
//! not a refactor.
//!
//! The only tunable part is [`DecoderConfig`], which bounds how much work
//! the decoder is willing to do on untrusted input.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Framing
// ---------------------------------------------------------------------------

/// Leading byte of every encoded transaction. Anything else is not ours.
pub const MAGIC: u8 = 0xA1;

/// Payload format version, carried in the top three bits of `header0`.
pub const VERSION: u8 = 2;

/// Value of the reserved byte that follows the two flag bytes.
pub const RESERVED: u8 = 0x00;

/// Number of bytes between the protocol tag and the sender address.
pub const HEADER_LENGTH: usize = 3;

// ---------------------------------------------------------------------------
// header0 layout: VVV R C T M F
// ---------------------------------------------------------------------------

pub const HEADER0_VERSION_SHIFT: u8 = 5;
pub const HEADER0_RESERVED_BIT: u8 = 0x10;
pub const HEADER0_CHARGE_UNIT_BIT: u8 = 0x08;
pub const HEADER0_TRANSFERS_BIT: u8 = 0x04;
pub const HEADER0_MULTIPLE_TRANSFERS_BIT: u8 = 0x02;
pub const HEADER0_VALID_FROM_BIT: u8 = 0x01;

// ---------------------------------------------------------------------------
// header1 layout: KK SSSSSS
// ---------------------------------------------------------------------------

pub const HEADER1_CONTRACT_MODE_SHIFT: u8 = 6;

/// Mask for the "signers minus one" field.
pub const HEADER1_SIGNERS_MASK: u8 = 0x3F;

/// Number of signers that fit in the header without an extension count.
/// A field value of [`HEADER1_SIGNERS_MASK`] means "this many or more".
pub const HEADER_SIGNER_CAPACITY: usize = 0x40;

/// Contract mode values (two bits of `header1`).
pub const CONTRACT_MODE_NONE: u8 = 0;
pub const CONTRACT_MODE_SMART_CONTRACT: u8 = 1;
pub const CONTRACT_MODE_CHAIN_CODE: u8 = 2;
pub const CONTRACT_MODE_SYNERGETIC: u8 = 3;

// ---------------------------------------------------------------------------
// Contract header (shard mask) layout
// ---------------------------------------------------------------------------

/// Target applies to every shard. Also the encoding of a zero-length mask.
pub const SHARD_MASK_WILDCARD: u8 = 0x80;

/// Mask longer than four bits; the low six bits hold `log2(bits) - 3`.
pub const SHARD_MASK_EXTENDED: u8 = 0x40;

/// Set for a four-bit inline mask, clear for a two-bit one.
pub const SHARD_MASK_FOUR_BITS: u8 = 0x10;

pub const SHARD_MASK_EXPONENT_MASK: u8 = 0x3F;

// ---------------------------------------------------------------------------
// Cryptographic sizes
// ---------------------------------------------------------------------------

/// Raw secp256k1 public key, `x || y` without the SEC1 prefix.
pub const PUBLIC_KEY_LENGTH: usize = 64;

/// SEC1 prefix written before every identity on the wire.
pub const IDENTITY_UNCOMPRESSED_PREFIX: u8 = 0x04;

/// Wire size of one identity: prefix plus raw key.
pub const IDENTITY_WIRE_LENGTH: usize = 1 + PUBLIC_KEY_LENGTH;

/// Compact `r || s` ECDSA signature.
pub const SIGNATURE_LENGTH: usize = 64;

/// Length of a secp256k1 private scalar.
pub const SECRET_KEY_LENGTH: usize = 32;

/// Addresses and digests are both SHA-256 outputs.
pub const ADDRESS_LENGTH: usize = 32;
pub const DIGEST_LENGTH: usize = 32;

/// Width of the anti-collision nonce written before the signer list.
pub const NONCE_LENGTH: usize = 8;

// ---------------------------------------------------------------------------
// Decoder limits
// ---------------------------------------------------------------------------

/// Bounds applied while decoding untrusted bytes.
///
/// Every count read off the wire is checked against these before any
/// allocation sized by it. The defaults are far above what a real network
/// transaction carries; they exist to keep a hostile header from turning a
/// short stream into a long loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Maximum number of transfers in one transaction.
    pub max_transfers: u64,

    /// Maximum number of declared signers.
    pub max_signers: u64,

    /// Maximum bit-length of an extended shard mask.
    pub max_shard_mask_bits: u64,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_transfers: 1 << 16,
            max_signers: 1 << 12,
            max_shard_mask_bits: 1 << 16,
        }
    }
}

impl DecoderConfig {
    /// Parses a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
