//! The mutable transaction builder.
//!
//! [`Transaction`] is the editable phase of a transaction's life. Once it
//! is complete, [`Transaction::seal`] freezes it into an
//! [`UnsignedTransaction`] that owns the canonical payload bytes and the
//! digest. Nothing can mutate a transaction after it has been encoded.

use rand::rngs::OsRng;
use rand_core::RngCore;
use serde::{Serialize, Serializer};
use thiserror::Error;

use super::shard_mask::ShardMask;
use super::signing::UnsignedTransaction;
use super::types::{Target, Transfer};
use crate::codec::EncodeError;
use crate::crypto::keys::Identity;
use crate::identity::Address;

/// Errors raised while editing a [`Transaction`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransactionError {
    #[error("signer {0} is already present")]
    DuplicateSigner(Identity),
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A ledger transaction under construction.
///
/// Optional scalars follow a zero-is-absence rule: the wire format cannot
/// tell a zero height or charge from a missing one, so setting one of them
/// to `0` clears it, and the same goes for an empty action or data. This
/// keeps a decoded transaction equal to the one that was encoded.
///
/// # Examples
///
/// ```
/// use ledger_tx::crypto::Keypair;
/// use ledger_tx::transaction::{ShardMask, Transaction};
///
/// let owner = Keypair::generate();
///
/// let mut tx = Transaction::new();
/// tx.set_from_address(owner.identity())
///     .set_charge_rate(1_000)
///     .set_charge_limit(1_000_000)
///     .target_chain_code("fetch.token", ShardMask::wildcard())
///     .set_action("transfer");
/// tx.add_signer(owner.identity()).unwrap();
///
/// let sealed = tx.seal().unwrap();
/// assert_eq!(sealed.digest_hex().len(), 64);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transaction {
    from_address: Option<Address>,
    transfers: Vec<Transfer>,
    valid_from: Option<u64>,
    valid_until: Option<u64>,
    charge_rate: Option<u64>,
    charge_limit: Option<u64>,
    target: Target,
    action: Option<String>,
    #[serde(serialize_with = "serialize_optional_hex")]
    data: Option<Vec<u8>>,
    synergetic_data_submission: bool,
    signers: Vec<Identity>,
    nonce: u64,
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

impl Transaction {
    /// A blank transaction with a nonce from the operating system's RNG.
    pub fn new() -> Self {
        Self::with_rng(&mut OsRng)
    }

    /// A blank transaction whose nonce is drawn from `rng`.
    ///
    /// Pass a fixed source to reproduce an exact payload.
    pub fn with_rng<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        Self::with_nonce(rng.next_u64())
    }

    pub(crate) fn with_nonce(nonce: u64) -> Self {
        Self {
            from_address: None,
            transfers: Vec::new(),
            valid_from: None,
            valid_until: None,
            charge_rate: None,
            charge_limit: None,
            target: Target::None,
            action: None,
            data: None,
            synergetic_data_submission: false,
            signers: Vec::new(),
            nonce,
        }
    }

    pub(crate) fn set_nonce(&mut self, nonce: u64) {
        self.nonce = nonce;
    }

    // -- accessors ----------------------------------------------------------

    pub fn from_address(&self) -> Option<Address> {
        self.from_address
    }

    pub fn transfers(&self) -> &[Transfer] {
        &self.transfers
    }

    pub fn valid_from(&self) -> Option<u64> {
        self.valid_from
    }

    pub fn valid_until(&self) -> Option<u64> {
        self.valid_until
    }

    pub fn charge_rate(&self) -> Option<u64> {
        self.charge_rate
    }

    pub fn charge_limit(&self) -> Option<u64> {
        self.charge_limit
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    /// The shard mask of the current target, if there is a target.
    pub fn shard_mask(&self) -> Option<&ShardMask> {
        self.target.shard_mask()
    }

    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    pub fn synergetic_data_submission(&self) -> bool {
        self.synergetic_data_submission
    }

    pub fn signers(&self) -> &[Identity] {
        &self.signers
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    // -- mutation -----------------------------------------------------------

    pub fn set_from_address(&mut self, address: impl Into<Address>) -> &mut Self {
        self.from_address = Some(address.into());
        self
    }

    pub fn add_transfer(&mut self, to: impl Into<Address>, amount: u64) -> &mut Self {
        self.transfers.push(Transfer::new(to, amount));
        self
    }

    /// Appends a signer. Signature order on the wire follows insertion order.
    pub fn add_signer(&mut self, identity: Identity) -> Result<&mut Self, TransactionError> {
        if self.signers.contains(&identity) {
            return Err(TransactionError::DuplicateSigner(identity));
        }
        self.signers.push(identity);
        Ok(self)
    }

    /// Targets a smart contract, replacing any previous target and mask.
    pub fn target_contract(
        &mut self,
        digest: impl Into<Address>,
        address: impl Into<Address>,
        shard_mask: ShardMask,
    ) -> &mut Self {
        self.target = Target::Contract {
            digest: digest.into(),
            address: address.into(),
            shard_mask,
        };
        self
    }

    /// Targets a chain-code module, replacing any previous target and mask.
    pub fn target_chain_code(&mut self, name: impl Into<String>, shard_mask: ShardMask) -> &mut Self {
        self.target = Target::ChainCode {
            name: name.into(),
            shard_mask,
        };
        self
    }

    pub fn clear_target(&mut self) -> &mut Self {
        self.target = Target::None;
        self
    }

    pub fn set_valid_from(&mut self, height: u64) -> &mut Self {
        self.valid_from = non_zero(height);
        self
    }

    pub fn set_valid_until(&mut self, height: u64) -> &mut Self {
        self.valid_until = non_zero(height);
        self
    }

    pub fn set_charge_rate(&mut self, rate: u64) -> &mut Self {
        self.charge_rate = non_zero(rate);
        self
    }

    pub fn set_charge_limit(&mut self, limit: u64) -> &mut Self {
        self.charge_limit = non_zero(limit);
        self
    }

    pub fn set_action(&mut self, action: impl Into<String>) -> &mut Self {
        let action = action.into();
        self.action = (!action.is_empty()).then_some(action);
        self
    }

    pub fn set_data(&mut self, data: impl Into<Vec<u8>>) -> &mut Self {
        let data = data.into();
        self.data = (!data.is_empty()).then_some(data);
        self
    }

    /// Marks `data` as a synergetic data submission. Only valid with a
    /// contract target.
    pub fn set_synergetic_data_submission(&mut self, enabled: bool) -> &mut Self {
        self.synergetic_data_submission = enabled;
        self
    }

    /// Freezes the transaction into its canonical payload.
    ///
    /// Fails if the transaction cannot be encoded: no sender, no signers,
    /// or call fields without a target.
    pub fn seal(self) -> Result<UnsignedTransaction, EncodeError> {
        UnsignedTransaction::from_transaction(self)
    }
}

fn non_zero(value: u64) -> Option<u64> {
    (value != 0).then_some(value)
}

fn serialize_optional_hex<S: Serializer>(
    data: &Option<Vec<u8>>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match data {
        Some(bytes) => serializer.serialize_some(&hex::encode(bytes)),
        None => serializer.serialize_none(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::Keypair;
    use rand::rngs::mock::StepRng;

    fn fixed_tx() -> Transaction {
        Transaction::with_rng(&mut StepRng::new(42, 1))
    }

    #[test]
    fn nonce_comes_from_injected_rng() {
        assert_eq!(fixed_tx().nonce(), 42);
        assert_eq!(fixed_tx(), fixed_tx());
    }

    #[test]
    fn fresh_transactions_get_distinct_nonces() {
        assert_ne!(Transaction::new().nonce(), Transaction::new().nonce());
    }

    #[test]
    fn blank_transaction_has_nothing_set() {
        let tx = fixed_tx();
        assert!(tx.from_address().is_none());
        assert!(tx.transfers().is_empty());
        assert!(tx.valid_from().is_none());
        assert!(tx.valid_until().is_none());
        assert!(tx.charge_rate().is_none());
        assert!(tx.charge_limit().is_none());
        assert!(tx.target().is_none());
        assert!(tx.shard_mask().is_none());
        assert!(tx.action().is_none());
        assert!(tx.data().is_none());
        assert!(!tx.synergetic_data_submission());
        assert!(tx.signers().is_empty());
    }

    #[test]
    fn transfers_keep_insertion_order() {
        let a = Address::new([1; 32]);
        let b = Address::new([2; 32]);
        let mut tx = fixed_tx();
        tx.add_transfer(b, 5).add_transfer(a, 7).add_transfer(b, 0);
        let recipients: Vec<_> = tx.transfers().iter().map(|t| t.to).collect();
        assert_eq!(recipients, vec![b, a, b]);
        assert_eq!(tx.transfers()[2].amount, 0);
    }

    #[test]
    fn duplicate_signer_is_rejected() {
        let kp = Keypair::generate();
        let mut tx = fixed_tx();
        tx.add_signer(kp.identity()).unwrap();
        assert_eq!(
            tx.add_signer(kp.identity()).unwrap_err(),
            TransactionError::DuplicateSigner(kp.identity())
        );
        assert_eq!(tx.signers().len(), 1);
    }

    #[test]
    fn signers_keep_insertion_order() {
        let keys: Vec<_> = (0..3).map(|_| Keypair::generate()).collect();
        let mut tx = fixed_tx();
        for kp in keys.iter().rev() {
            tx.add_signer(kp.identity()).unwrap();
        }
        let expected: Vec<_> = keys.iter().rev().map(|k| k.identity()).collect();
        assert_eq!(tx.signers(), expected.as_slice());
    }

    #[test]
    fn signers_are_not_reordered_by_key_bytes() {
        let mut keys: Vec<_> = (0..4).map(|_| Keypair::generate()).collect();
        keys.sort_by(|a, b| b.identity().as_bytes().cmp(a.identity().as_bytes()));

        let mut tx = fixed_tx();
        tx.set_from_address(keys[0].identity());
        for kp in &keys {
            tx.add_signer(kp.identity()).unwrap();
        }
        let sealed = tx.seal().unwrap();

        let payload = sealed.payload();
        let tail = &payload[payload.len() - 65 * keys.len()..];
        for (chunk, kp) in tail.chunks(65).zip(&keys) {
            assert_eq!(chunk, &kp.identity().to_sec1_bytes()[..]);
        }
        assert_eq!(sealed.transaction().signers()[0], keys[0].identity());
    }

    #[test]
    fn zero_scalars_mean_absent() {
        let mut tx = fixed_tx();
        tx.set_valid_from(10).set_valid_until(20).set_charge_rate(1).set_charge_limit(2);
        assert_eq!(tx.valid_from(), Some(10));
        assert_eq!(tx.charge_limit(), Some(2));

        tx.set_valid_from(0).set_valid_until(0).set_charge_rate(0).set_charge_limit(0);
        assert_eq!(tx, fixed_tx());
    }

    #[test]
    fn empty_action_and_data_mean_absent() {
        let mut tx = fixed_tx();
        tx.set_action("launch").set_data(b"go".to_vec());
        assert_eq!(tx.action(), Some("launch"));
        assert_eq!(tx.data(), Some(&b"go"[..]));

        tx.set_action("").set_data(Vec::new());
        assert!(tx.action().is_none());
        assert!(tx.data().is_none());
    }

    #[test]
    fn setting_a_target_replaces_the_previous_one() {
        let mut tx = fixed_tx();
        tx.target_contract(
            Address::new([3; 32]),
            Address::new([4; 32]),
            ShardMask::with_bits(4, [1]).unwrap(),
        );
        assert!(matches!(tx.target(), Target::Contract { .. }));

        tx.target_chain_code("foo.bar.baz", ShardMask::wildcard());
        assert_eq!(
            tx.target(),
            &Target::ChainCode {
                name: "foo.bar.baz".into(),
                shard_mask: ShardMask::wildcard(),
            }
        );
        assert_eq!(tx.shard_mask(), Some(&ShardMask::wildcard()));

        tx.clear_target();
        assert!(tx.target().is_none());
        assert!(tx.shard_mask().is_none());
    }

    #[test]
    fn seal_requires_sender_and_signer() {
        let kp = Keypair::generate();

        let mut tx = fixed_tx();
        tx.add_signer(kp.identity()).unwrap();
        assert_eq!(tx.seal().unwrap_err(), EncodeError::MissingFromAddress);

        let mut tx = fixed_tx();
        tx.set_from_address(kp.identity());
        assert_eq!(tx.seal().unwrap_err(), EncodeError::NoSigners);
    }

    #[test]
    fn json_view_uses_hex_for_data() {
        let mut tx = fixed_tx();
        tx.target_chain_code("foo", ShardMask::wildcard())
            .set_data(vec![0xDE, 0xAD]);
        let json = serde_json::to_value(&tx).unwrap();
        assert_eq!(json["data"], "dead");
        assert_eq!(json["nonce"], 42);
        assert!(json["valid_from"].is_null());
    }
}
