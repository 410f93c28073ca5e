// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # ledger-tx
//!
//! Entry point for the `ledger-tx` binary. Parses CLI arguments,
//! initializes logging, loads decoder limits and runs one subcommand:
//!
//! - `decode`  — decode a transaction and verify each signature
//! - `digest`  — print the payload digest
//! - `inspect` — print header fields and decode status

mod cli;
mod commands;
mod logging;

use anyhow::Result;
use clap::Parser;

use cli::{Commands, LedgerTxCli};

fn main() -> Result<()> {
    let cli = LedgerTxCli::parse();
    logging::init_logging(&cli.log_level, cli.log_format);

    let decoder = commands::load_decoder(cli.config.as_deref())?;

    let output = match &cli.command {
        Commands::Decode(args) => commands::decode(&decoder, &commands::read_input(&args.hex)?)?,
        Commands::Digest(args) => commands::digest(&decoder, &commands::read_input(&args.hex)?)?,
        Commands::Inspect(args) => commands::inspect(&decoder, &commands::read_input(&args.hex)?)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
