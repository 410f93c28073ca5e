//! Payload decoder.
//!
//! Decoding untrusted bytes has three possible results:
//!
//! - `Err(HeaderError)`: wrong protocol tag or version. The input is not a
//!   transaction of this protocol.
//! - `Ok(DecodeOutcome::Failure(_))`: the header checked out, but the body
//!   is truncated or inconsistent.
//! - `Ok(DecodeOutcome::Success(_))`: the structure parsed completely. The
//!   signatures have *not* been checked yet; see
//!   [`DecodedTransaction::verify_signatures`].

use serde::Serialize;
use tracing::{debug, trace};

use super::byte_string::{decode_bytes, decode_string};
use super::error::{DecodeError, HeaderError};
use super::framing::decode_signatures;
use super::header::{ContractMode, Header};
use super::integer::decode_integer;
use super::reader::Reader;
use super::shard_mask::decode_shard_mask;
use crate::config::{
    DecoderConfig, ADDRESS_LENGTH, HEADER_SIGNER_CAPACITY, IDENTITY_WIRE_LENGTH, MAGIC,
    NONCE_LENGTH, RESERVED, VERSION,
};
use crate::crypto::hash::sha256_hex;
use crate::crypto::keys::{Identity, Signature};
use crate::crypto::signatures::verify_all;
use crate::identity::Address;
use crate::transaction::{Transaction, TransactionError};

// ---------------------------------------------------------------------------
// Outcome types
// ---------------------------------------------------------------------------

/// Result of decoding a stream that passed the header checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeOutcome {
    Success(DecodedTransaction),
    Failure(DecodeError),
}

impl DecodeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn error(&self) -> Option<&DecodeError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(err) => Some(err),
        }
    }

    pub fn into_decoded(self) -> Option<DecodedTransaction> {
        match self {
            Self::Success(decoded) => Some(decoded),
            Self::Failure(_) => None,
        }
    }

    pub fn into_transaction(self) -> Option<Transaction> {
        self.into_decoded().map(DecodedTransaction::into_transaction)
    }

    /// Collapses the outcome into a `Result`.
    pub fn into_result(self) -> Result<DecodedTransaction, DecodeError> {
        match self {
            Self::Success(decoded) => Ok(decoded),
            Self::Failure(err) => Err(err),
        }
    }
}

/// A structurally valid transaction together with its framed signatures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedTransaction {
    transaction: Transaction,
    header: Header,
    payload_len: usize,
    signatures: Vec<Signature>,
}

impl DecodedTransaction {
    pub fn transaction(&self) -> &Transaction {
        &self.transaction
    }

    pub fn into_transaction(self) -> Transaction {
        self.transaction
    }

    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Length of the unsigned payload at the start of the decoded bytes.
    pub fn payload_len(&self) -> usize {
        self.payload_len
    }

    /// Signatures in signer order.
    pub fn signatures(&self) -> &[Signature] {
        &self.signatures
    }

    /// The payload sub-range of `bytes`, the buffer this was decoded from.
    pub fn payload<'a>(&self, bytes: &'a [u8]) -> Option<&'a [u8]> {
        bytes.get(..self.payload_len)
    }

    /// Digest of the payload sub-range of `bytes`.
    pub fn digest_hex(&self, bytes: &[u8]) -> Option<String> {
        self.payload(bytes).map(sha256_hex)
    }

    /// Checks each signature against the signer at the same position.
    ///
    /// `bytes` must be the buffer this transaction was decoded from. A
    /// buffer shorter than the payload fails every signer.
    pub fn verify_signatures(&self, bytes: &[u8]) -> Vec<bool> {
        let Some(payload) = self.payload(bytes) else {
            return vec![false; self.signatures.len()];
        };
        let pairs: Vec<(Identity, Signature)> = self
            .transaction
            .signers()
            .iter()
            .copied()
            .zip(self.signatures.iter().copied())
            .collect();
        verify_all(&pairs, payload)
    }

    pub fn all_signatures_valid(&self, bytes: &[u8]) -> bool {
        self.verify_signatures(bytes).into_iter().all(|ok| ok)
    }
}

// ---------------------------------------------------------------------------
// Decoder
// ---------------------------------------------------------------------------

/// Transaction decoder with configurable resource limits.
#[derive(Debug, Clone, Default)]
pub struct Decoder {
    config: DecoderConfig,
}

impl Decoder {
    pub fn new(config: DecoderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes a complete signed transaction.
    ///
    /// Only the protocol tag and version are fatal. Every other problem is
    /// reported as [`DecodeOutcome::Failure`].
    pub fn decode(&self, bytes: &[u8]) -> Result<DecodeOutcome, HeaderError> {
        let Some((&tag, rest)) = bytes.split_first() else {
            return Err(HeaderError::Empty);
        };
        if tag != MAGIC {
            return Err(HeaderError::InvalidMagic(tag));
        }
        if let Some(&header0) = rest.first() {
            let version = Header::version_of(header0);
            if version != VERSION {
                return Err(HeaderError::UnsupportedVersion(version));
            }
        }

        match self.decode_body(bytes) {
            Ok(decoded) => {
                debug!(
                    payload_len = decoded.payload_len,
                    signers = decoded.signatures.len(),
                    "decoded transaction"
                );
                Ok(DecodeOutcome::Success(decoded))
            }
            Err(err) => {
                debug!(error = %err, "transaction decode failed");
                Ok(DecodeOutcome::Failure(err))
            }
        }
    }

    fn check_limit(field: &'static str, value: u64, limit: u64) -> Result<(), DecodeError> {
        if value > limit {
            return Err(DecodeError::LimitExceeded {
                field,
                value,
                limit,
            });
        }
        Ok(())
    }

    fn decode_body(&self, bytes: &[u8]) -> Result<DecodedTransaction, DecodeError> {
        let mut reader = Reader::new(bytes);
        reader.read_u8()?; // protocol tag, already checked

        let header0 = reader.read_u8()?;
        let header1 = reader.read_u8()?;
        let header = Header::from_bytes(header0, header1)?;
        let reserved = reader.read_u8()?;
        if reserved != RESERVED {
            return Err(DecodeError::ReservedByte(reserved));
        }

        let mut tx = Transaction::with_nonce(0);
        tx.set_from_address(Address::new(reader.read_array::<ADDRESS_LENGTH>()?));

        let transfer_count = if header.multiple_transfers {
            decode_integer(&mut reader)?.saturating_add(2)
        } else {
            u64::from(header.has_transfers)
        };
        Self::check_limit("transfer", transfer_count, self.config.max_transfers)?;
        for _ in 0..transfer_count {
            let to = Address::new(reader.read_array::<ADDRESS_LENGTH>()?);
            let amount = decode_integer(&mut reader)?;
            tx.add_transfer(to, amount);
        }
        trace!(transfers = transfer_count, "decoded transfers");

        if header.has_valid_from {
            let valid_from = decode_integer(&mut reader)?;
            if valid_from == 0 {
                return Err(DecodeError::ZeroValidFrom);
            }
            tx.set_valid_from(valid_from);
        }
        tx.set_valid_until(decode_integer(&mut reader)?);
        tx.set_charge_rate(decode_integer(&mut reader)?);
        tx.set_charge_limit(decode_integer(&mut reader)?);

        if header.contract_mode != ContractMode::None {
            self.decode_target(&mut reader, header.contract_mode, &mut tx)?;
        }

        let mut signer_count = u64::from(header.signers_field) + 1;
        if header.has_signer_extension() {
            signer_count = decode_integer(&mut reader)?.saturating_add(HEADER_SIGNER_CAPACITY as u64);
        }
        Self::check_limit("signer", signer_count, self.config.max_signers)?;
        let signer_count = usize::try_from(signer_count).map_err(|_| DecodeError::LimitExceeded {
            field: "signer",
            value: signer_count,
            limit: usize::MAX as u64,
        })?;

        let nonce = reader.read_array::<NONCE_LENGTH>()?;
        tx.set_nonce(u64::from_le_bytes(nonce));

        for index in 0..signer_count {
            let raw = reader.read_slice(IDENTITY_WIRE_LENGTH)?;
            let identity = Identity::from_bytes(raw)
                .map_err(|_| DecodeError::InvalidIdentity { index })?;
            tx.add_signer(identity).map_err(|err| match err {
                TransactionError::DuplicateSigner(id) => DecodeError::DuplicateSigner(id),
            })?;
        }

        let payload_len = reader.position();
        let signatures = decode_signatures(&mut reader, signer_count)?;
        if !reader.is_empty() {
            return Err(DecodeError::TrailingBytes(reader.remaining()));
        }

        Ok(DecodedTransaction {
            transaction: tx,
            header,
            payload_len,
            signatures,
        })
    }

    fn decode_target(
        &self,
        reader: &mut Reader<'_>,
        mode: ContractMode,
        tx: &mut Transaction,
    ) -> Result<(), DecodeError> {
        let shard_mask = decode_shard_mask(reader, self.config.max_shard_mask_bits)?;
        if mode.is_contract() {
            let digest = Address::new(reader.read_array::<ADDRESS_LENGTH>()?);
            let address = Address::new(reader.read_array::<ADDRESS_LENGTH>()?);
            tx.target_contract(digest, address, shard_mask);
        } else {
            let name = decode_string(reader)?;
            tx.target_chain_code(name, shard_mask);
        }

        tx.set_action(decode_string(reader)?);
        tx.set_data(decode_bytes(reader)?.to_vec());
        tx.set_synergetic_data_submission(mode == ContractMode::Synergetic);
        trace!(mode = ?mode, "decoded target");
        Ok(())
    }
}

/// Decodes a signed transaction with the default limits.
///
/// # Examples
///
/// ```
/// use ledger_tx::{decode_transaction, HeaderError};
///
/// assert_eq!(decode_transaction(&[0x00]), Err(HeaderError::InvalidMagic(0x00)));
/// assert_eq!(
///     decode_transaction(&[0xA1, 0xEF, 0xFF]),
///     Err(HeaderError::UnsupportedVersion(7))
/// );
/// assert!(!decode_transaction(&[0xA1, 0x40]).unwrap().is_success());
/// ```
pub fn decode_transaction(bytes: &[u8]) -> Result<DecodeOutcome, HeaderError> {
    Decoder::default().decode(bytes)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
