//! Value types carried by a [`super::Transaction`].

use serde::{Deserialize, Serialize};

use super::shard_mask::ShardMask;
use crate::identity::Address;

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

/// A value transfer to one recipient. Zero amounts are legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transfer {
    pub to: Address,
    pub amount: u64,
}

impl Transfer {
    pub fn new(to: impl Into<Address>, amount: u64) -> Self {
        Self {
            to: to.into(),
            amount,
        }
    }
}

// ---------------------------------------------------------------------------
// Target
// ---------------------------------------------------------------------------

/// What a transaction invokes, if anything.
///
/// The shard mask travels with the variant: a mask exists exactly when a
/// target does, and replacing the target replaces its mask.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    /// Plain value transfer, no invocation.
    #[default]
    None,

    /// A deployed smart contract, identified by the digest of its code and
    /// the address of its owner.
    Contract {
        digest: Address,
        address: Address,
        shard_mask: ShardMask,
    },

    /// A built-in chain-code module, addressed by name (for example
    /// `fetch.token`).
    ChainCode { name: String, shard_mask: ShardMask },
}

impl Target {
    pub fn is_none(&self) -> bool {
        matches!(self, Target::None)
    }

    pub fn shard_mask(&self) -> Option<&ShardMask> {
        match self {
            Target::None => None,
            Target::Contract { shard_mask, .. } | Target::ChainCode { shard_mask, .. } => {
                Some(shard_mask)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_target_is_none() {
        let target = Target::default();
        assert!(target.is_none());
        assert!(target.shard_mask().is_none());
    }

    #[test]
    fn test_mask_follows_variant() {
        let mask = ShardMask::with_bits(2, [0]).unwrap();
        let target = Target::ChainCode {
            name: "foo.bar".into(),
            shard_mask: mask.clone(),
        };
        assert_eq!(target.shard_mask(), Some(&mask));
    }

    #[test]
    fn test_target_serializes_with_kind_tag() {
        let json = serde_json::to_value(Target::ChainCode {
            name: "foo.bar".into(),
            shard_mask: ShardMask::wildcard(),
        })
        .unwrap();
        assert_eq!(json["kind"], "chain_code");
        assert_eq!(json["name"], "foo.bar");
        assert_eq!(json["shard_mask"]["bits"], 0);
    }

    #[test]
    fn test_transfer_accepts_identity() {
        let id = crate::crypto::Keypair::generate().identity();
        let transfer = Transfer::new(id, 0);
        assert_eq!(transfer.to, Address::from(id));
        assert_eq!(transfer.amount, 0);
    }
}
