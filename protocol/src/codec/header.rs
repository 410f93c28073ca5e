//! The presence header.
//!
//! In memory the header is a plain struct of flags; it only becomes bits
//! at the codec boundary.
//!
//! ```text
//! header0   VVV R C T M F     version, reserved, charge unit,
//!                             transfers, multiple transfers, valid_from
//! header1   KK SSSSSS         contract mode, min(signers - 1, 63)
//! reserved  0000_0000
//! ```

use serde::Serialize;

use super::error::DecodeError;
use crate::config::{
    CONTRACT_MODE_CHAIN_CODE, CONTRACT_MODE_NONE, CONTRACT_MODE_SMART_CONTRACT,
    CONTRACT_MODE_SYNERGETIC, HEADER0_CHARGE_UNIT_BIT, HEADER0_MULTIPLE_TRANSFERS_BIT,
    HEADER0_RESERVED_BIT, HEADER0_TRANSFERS_BIT, HEADER0_VALID_FROM_BIT, HEADER0_VERSION_SHIFT,
    HEADER1_CONTRACT_MODE_SHIFT, HEADER1_SIGNERS_MASK, HEADER_SIGNER_CAPACITY, VERSION,
};
use crate::transaction::{Target, Transaction};

// ---------------------------------------------------------------------------
// ContractMode
// ---------------------------------------------------------------------------

/// Which target group follows the fee fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractMode {
    None,
    SmartContract,
    ChainCode,
    /// A smart contract receiving a synergetic data submission.
    Synergetic,
}

impl ContractMode {
    pub fn to_bits(self) -> u8 {
        match self {
            Self::None => CONTRACT_MODE_NONE,
            Self::SmartContract => CONTRACT_MODE_SMART_CONTRACT,
            Self::ChainCode => CONTRACT_MODE_CHAIN_CODE,
            Self::Synergetic => CONTRACT_MODE_SYNERGETIC,
        }
    }

    /// Total over the two-bit field.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0x03 {
            CONTRACT_MODE_SMART_CONTRACT => Self::SmartContract,
            CONTRACT_MODE_CHAIN_CODE => Self::ChainCode,
            CONTRACT_MODE_SYNERGETIC => Self::Synergetic,
            _ => Self::None,
        }
    }

    /// Smart contract and synergetic targets carry digest and address.
    pub fn is_contract(self) -> bool {
        matches!(self, Self::SmartContract | Self::Synergetic)
    }

    fn of(tx: &Transaction) -> Self {
        match tx.target() {
            Target::None => Self::None,
            Target::ChainCode { .. } => Self::ChainCode,
            Target::Contract { .. } if tx.synergetic_data_submission() => Self::Synergetic,
            Target::Contract { .. } => Self::SmartContract,
        }
    }
}

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Header {
    pub version: u8,
    pub has_transfers: bool,
    pub multiple_transfers: bool,
    pub has_valid_from: bool,
    pub contract_mode: ContractMode,
    /// `min(signers - 1, 63)`. The top value means the exact count follows
    /// as an integer just before the nonce.
    pub signers_field: u8,
}

impl Header {
    /// Derives the header a transaction encodes with.
    ///
    /// `tx` must have at least one signer.
    pub fn for_transaction(tx: &Transaction) -> Self {
        let signers = tx.signers().len().max(1);
        Self {
            version: VERSION,
            has_transfers: !tx.transfers().is_empty(),
            multiple_transfers: tx.transfers().len() > 1,
            has_valid_from: tx.valid_from().is_some(),
            contract_mode: ContractMode::of(tx),
            signers_field: (signers - 1).min(HEADER1_SIGNERS_MASK as usize) as u8,
        }
    }

    /// True when the signer count overflows the header field.
    pub fn has_signer_extension(&self) -> bool {
        self.signers_field == HEADER1_SIGNERS_MASK
    }

    /// Signer count to write as the extension, if any.
    pub fn signer_extension(signers: usize) -> Option<u64> {
        (signers >= HEADER_SIGNER_CAPACITY).then(|| (signers - HEADER_SIGNER_CAPACITY) as u64)
    }

    /// Version bits of a raw `header0` byte.
    pub fn version_of(header0: u8) -> u8 {
        header0 >> HEADER0_VERSION_SHIFT
    }

    pub fn to_bytes(&self) -> [u8; 2] {
        let mut header0 = self.version << HEADER0_VERSION_SHIFT;
        if self.has_transfers {
            header0 |= HEADER0_TRANSFERS_BIT;
        }
        if self.multiple_transfers {
            header0 |= HEADER0_MULTIPLE_TRANSFERS_BIT;
        }
        if self.has_valid_from {
            header0 |= HEADER0_VALID_FROM_BIT;
        }
        let header1 = (self.contract_mode.to_bits() << HEADER1_CONTRACT_MODE_SHIFT)
            | (self.signers_field & HEADER1_SIGNERS_MASK);
        [header0, header1]
    }

    /// Parses the two flag bytes. The version is taken as-is; callers
    /// gate on it first.
    pub fn from_bytes(header0: u8, header1: u8) -> Result<Self, DecodeError> {
        if header0 & HEADER0_RESERVED_BIT != 0 {
            return Err(DecodeError::ReservedBitSet);
        }
        if header0 & HEADER0_CHARGE_UNIT_BIT != 0 {
            return Err(DecodeError::ChargeUnitUnsupported);
        }
        let has_transfers = header0 & HEADER0_TRANSFERS_BIT != 0;
        let multiple_transfers = header0 & HEADER0_MULTIPLE_TRANSFERS_BIT != 0;
        if multiple_transfers && !has_transfers {
            return Err(DecodeError::MultipleTransfersWithoutTransfers);
        }

        Ok(Self {
            version: Self::version_of(header0),
            has_transfers,
            multiple_transfers,
            has_valid_from: header0 & HEADER0_VALID_FROM_BIT != 0,
            contract_mode: ContractMode::from_bits(header1 >> HEADER1_CONTRACT_MODE_SHIFT),
            signers_field: header1 & HEADER1_SIGNERS_MASK,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;
    use crate::identity::Address;
    use crate::transaction::ShardMask;

    fn tx_with_signers(n: usize) -> Transaction {
        let mut tx = Transaction::new();
        for _ in 0..n {
            tx.add_signer(Keypair::generate().identity()).unwrap();
        }
        tx
    }

    #[test]
    fn test_simple_transfer_header() {
        let mut tx = tx_with_signers(1);
        tx.add_transfer(Address::new([1; 32]), 256);
        assert_eq!(Header::for_transaction(&tx).to_bytes(), [0x44, 0x00]);
    }

    #[test]
    fn test_multi_transfer_with_valid_from() {
        let mut tx = tx_with_signers(1);
        tx.add_transfer(Address::new([1; 32]), 1)
            .add_transfer(Address::new([2; 32]), 2)
            .set_valid_from(100);
        assert_eq!(Header::for_transaction(&tx).to_bytes(), [0x47, 0x00]);
    }

    #[test]
    fn test_contract_modes() {
        let mut tx = tx_with_signers(1);
        tx.target_chain_code("foo", ShardMask::wildcard());
        assert_eq!(Header::for_transaction(&tx).to_bytes()[1], 0x80);

        tx.target_contract(Address::new([3; 32]), Address::new([4; 32]), ShardMask::wildcard());
        assert_eq!(Header::for_transaction(&tx).to_bytes()[1], 0x40);

        tx.set_synergetic_data_submission(true);
        assert_eq!(Header::for_transaction(&tx).to_bytes()[1], 0xC0);
    }

    #[test]
    fn test_signer_field_saturates() {
        assert_eq!(Header::for_transaction(&tx_with_signers(3)).signers_field, 2);
        let header = Header::for_transaction(&tx_with_signers(64));
        assert_eq!(header.signers_field, 0x3F);
        assert!(header.has_signer_extension());
        assert_eq!(Header::signer_extension(64), Some(0));
        assert_eq!(Header::signer_extension(70), Some(6));
        assert_eq!(Header::signer_extension(63), None);
    }

    #[test]
    fn test_parse_roundtrip() {
        let header = Header::from_bytes(0x47, 0xC5).unwrap();
        assert_eq!(header.version, 2);
        assert!(header.has_transfers && header.multiple_transfers && header.has_valid_from);
        assert_eq!(header.contract_mode, ContractMode::Synergetic);
        assert_eq!(header.signers_field, 5);
        assert_eq!(header.to_bytes(), [0x47, 0xC5]);
    }

    #[test]
    fn test_parse_rejects_inconsistent_flags() {
        assert_eq!(Header::from_bytes(0x50, 0), Err(DecodeError::ReservedBitSet));
        assert_eq!(Header::from_bytes(0x48, 0), Err(DecodeError::ChargeUnitUnsupported));
        assert_eq!(
            Header::from_bytes(0x42, 0),
            Err(DecodeError::MultipleTransfersWithoutTransfers)
        );
    }

    #[test]
    fn test_version_bits() {
        assert_eq!(Header::version_of(0x44), 2);
        assert_eq!(Header::version_of(0xEF), 7);
    }
}
