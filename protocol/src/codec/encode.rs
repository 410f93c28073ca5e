//! Payload encoder.
//!
//! Writes a [`Transaction`] in canonical field order in a single forward
//! pass. The output is the unsigned payload: what gets signed and what the
//! digest is computed over.

use bytes::BufMut;
use tracing::{debug, trace};

use super::byte_string::encode_bytes;
use super::error::EncodeError;
use super::header::{ContractMode, Header};
use super::integer::encode_integer;
use super::shard_mask::encode_shard_mask;
use crate::config::{DecoderConfig, MAGIC, RESERVED};
use crate::transaction::{Target, Transaction};

fn check_limit(field: &'static str, value: usize, limit: u64) -> Result<(), EncodeError> {
    let value = value as u64;
    if value > limit {
        return Err(EncodeError::LimitExceeded {
            field,
            value,
            limit,
        });
    }
    Ok(())
}

/// Checks everything the encoder needs before a single byte is written.
///
/// Shapes the default [`DecoderConfig`] would refuse are rejected here, so
/// anything this encoder emits decodes again with default limits.
fn validate(tx: &Transaction) -> Result<Header, EncodeError> {
    if tx.from_address().is_none() {
        return Err(EncodeError::MissingFromAddress);
    }
    if tx.signers().is_empty() {
        return Err(EncodeError::NoSigners);
    }
    if tx.target().is_none() {
        if tx.action().is_some() {
            return Err(EncodeError::ActionWithoutTarget);
        }
        if tx.data().is_some() {
            return Err(EncodeError::DataWithoutTarget);
        }
    }
    if tx.synergetic_data_submission() && !matches!(tx.target(), Target::Contract { .. }) {
        return Err(EncodeError::SynergeticWithoutContract);
    }

    let limits = DecoderConfig::default();
    check_limit("transfer", tx.transfers().len(), limits.max_transfers)?;
    check_limit("signer", tx.signers().len(), limits.max_signers)?;
    if let Some(mask) = tx.target().shard_mask() {
        check_limit("shard mask bits", mask.len(), limits.max_shard_mask_bits)?;
    }
    Ok(Header::for_transaction(tx))
}

/// Writes the unsigned payload of `tx` into `buf`.
///
/// Nothing is written if the transaction is not encodable.
///
/// # Examples
///
/// ```
/// use ledger_tx::crypto::Keypair;
/// use ledger_tx::encode_payload;
/// use ledger_tx::transaction::Transaction;
///
/// let kp = Keypair::generate();
/// let mut tx = Transaction::new();
/// tx.set_from_address(kp.identity());
/// tx.add_signer(kp.identity()).unwrap();
///
/// let mut payload = Vec::new();
/// encode_payload(&mut payload, &tx).unwrap();
/// assert_eq!(&payload[..4], &[0xA1, 0x40, 0x00, 0x00]);
/// ```
pub fn encode_payload<B: BufMut>(buf: &mut B, tx: &Transaction) -> Result<(), EncodeError> {
    let header = validate(tx)?;
    let [header0, header1] = header.to_bytes();
    let from = tx.from_address().ok_or(EncodeError::MissingFromAddress)?;

    buf.put_u8(MAGIC);
    buf.put_u8(header0);
    buf.put_u8(header1);
    buf.put_u8(RESERVED);
    buf.put_slice(from.as_bytes());

    let transfers = tx.transfers();
    if header.multiple_transfers {
        encode_integer(buf, transfers.len() as u64 - 2);
    }
    for transfer in transfers {
        buf.put_slice(transfer.to.as_bytes());
        encode_integer(buf, transfer.amount);
    }
    trace!(transfers = transfers.len(), "encoded transfers");

    if let Some(valid_from) = tx.valid_from() {
        encode_integer(buf, valid_from);
    }
    encode_integer(buf, tx.valid_until().unwrap_or(0));
    encode_integer(buf, tx.charge_rate().unwrap_or(0));
    encode_integer(buf, tx.charge_limit().unwrap_or(0));

    match tx.target() {
        Target::None => {}
        Target::Contract {
            digest,
            address,
            shard_mask,
        } => {
            encode_shard_mask(buf, shard_mask);
            buf.put_slice(digest.as_bytes());
            buf.put_slice(address.as_bytes());
        }
        Target::ChainCode { name, shard_mask } => {
            encode_shard_mask(buf, shard_mask);
            encode_bytes(buf, name.as_bytes());
        }
    }
    if header.contract_mode != ContractMode::None {
        encode_bytes(buf, tx.action().unwrap_or_default().as_bytes());
        encode_bytes(buf, tx.data().unwrap_or_default());
        trace!(mode = ?header.contract_mode, "encoded target");
    }

    if let Some(extension) = Header::signer_extension(tx.signers().len()) {
        encode_integer(buf, extension);
    }
    buf.put_u64_le(tx.nonce());
    for signer in tx.signers() {
        buf.put_slice(&signer.to_sec1_bytes());
    }

    debug!(
        transfers = transfers.len(),
        signers = tx.signers().len(),
        mode = ?header.contract_mode,
        "encoded transaction payload"
    );
    Ok(())
}
