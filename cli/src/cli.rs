//! # CLI Interface
//!
//! Command-line argument structure for `ledger-tx`, via `clap` derive.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Inspect encoded ledger transactions.
///
/// Every subcommand takes a hex-encoded signed transaction (an optional
/// `0x` prefix and surrounding whitespace are ignored), or `-` to read it
/// from stdin, and prints JSON to stdout.
#[derive(Parser, Debug)]
#[command(
    name = "ledger-tx",
    about = "Decode, digest and verify ledger transactions",
    version,
    propagate_version = true
)]
pub struct LedgerTxCli {
    /// Log output format.
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Default log filter when `RUST_LOG` is unset.
    #[arg(long, global = true, env = "LEDGER_TX_LOG", default_value = "warn")]
    pub log_level: String,

    /// JSON file with decoder limits (`max_transfers`, `max_signers`,
    /// `max_shard_mask_bits`). Missing fields keep their defaults.
    #[arg(long, short = 'c', global = true, env = "LEDGER_TX_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Decode a transaction and verify each signature.
    Decode(InputArgs),
    /// Print the payload digest (transaction identifier).
    Digest(InputArgs),
    /// Print the header fields and whether the body decodes.
    Inspect(InputArgs),
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Hex-encoded transaction, or `-` for stdin.
    pub hex: String,
}
