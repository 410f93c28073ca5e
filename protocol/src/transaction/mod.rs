//! # Transaction Module
//!
//! The transaction model and its lifecycle.
//!
//! ## Architecture
//!
//! ```text
//! types.rs      — Transfer and Target value types
//! shard_mask.rs — fixed-length shard routing bit set
//! builder.rs    — the mutable Transaction builder
//! signing.rs    — sealed (UnsignedTransaction) and signed forms
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build** — edit a [`Transaction`]: sender, transfers, validity
//!    window, charges, target, signers.
//! 2. **Seal** — [`Transaction::seal`] encodes the canonical payload once
//!    and computes the digest. The result is immutable.
//! 3. **Sign** — [`UnsignedTransaction::sign`] produces a
//!    [`SignedTransaction`] with one signature per signer, in order.
//! 4. **Frame** — [`SignedTransaction::to_bytes`] yields the wire bytes.

pub mod builder;
pub mod shard_mask;
pub mod signing;
pub mod types;

pub use builder::{Transaction, TransactionError};
pub use shard_mask::{ShardMask, ShardMaskError};
pub use signing::{SignedTransaction, UnsignedTransaction};
pub use types::{Target, Transfer};
