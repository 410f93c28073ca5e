//! Subcommand implementations.
//!
//! Each command returns a JSON value; `main` prints it. Fatal header errors
//! and reported decode failures both surface as `Err`, so the process exits
//! non-zero for anything that is not a well-formed transaction.

use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use ledger_tx::codec::Header;
use ledger_tx::config::DecoderConfig;
use ledger_tx::{DecodeOutcome, DecodedTransaction, Decoder};

/// Builds a decoder from an optional JSON limits file.
pub fn load_decoder(config: Option<&Path>) -> Result<Decoder> {
    let Some(path) = config else {
        return Ok(Decoder::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = DecoderConfig::from_json(&raw)
        .with_context(|| format!("invalid decoder config in {}", path.display()))?;
    info!(?config, "loaded decoder limits");
    Ok(Decoder::new(config))
}

/// Resolves the positional argument (`-` means stdin) and parses the hex.
pub fn read_input(arg: &str) -> Result<Vec<u8>> {
    let text = if arg == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read transaction from stdin")?;
        buf
    } else {
        arg.to_owned()
    };
    parse_hex(&text)
}

pub fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let trimmed = text.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    hex::decode(digits).context("input is not valid hex")
}

fn decode_strict(decoder: &Decoder, bytes: &[u8]) -> Result<DecodedTransaction> {
    let outcome = decoder
        .decode(bytes)
        .context("not a ledger transaction")?;
    match outcome {
        DecodeOutcome::Success(decoded) => Ok(decoded),
        DecodeOutcome::Failure(err) => Err(anyhow!(err).context("malformed transaction")),
    }
}

/// `decode`: full transaction plus one verdict per signer.
pub fn decode(decoder: &Decoder, bytes: &[u8]) -> Result<Value> {
    let decoded = decode_strict(decoder, bytes)?;
    let verdicts = decoded.verify_signatures(bytes);

    let signatures: Vec<Value> = decoded
        .transaction()
        .signers()
        .iter()
        .zip(decoded.signatures())
        .zip(&verdicts)
        .map(|((signer, signature), valid)| {
            json!({
                "signer": signer,
                "signature": signature,
                "valid": valid,
            })
        })
        .collect();

    let invalid = verdicts.iter().filter(|ok| !**ok).count();
    if invalid > 0 {
        warn!(invalid, "transaction carries invalid signatures");
    }

    Ok(json!({
        "digest": decoded.digest_hex(bytes),
        "payload_len": decoded.payload_len(),
        "transaction": decoded.transaction(),
        "signatures": signatures,
        "all_signatures_valid": invalid == 0,
    }))
}

/// `digest`: SHA-256 of the payload, hex encoded.
pub fn digest(decoder: &Decoder, bytes: &[u8]) -> Result<Value> {
    let decoded = decode_strict(decoder, bytes)?;
    let digest = decoded
        .digest_hex(bytes)
        .context("payload range exceeds input")?;
    Ok(Value::String(digest))
}

/// `inspect`: header flags, plus the body decode status.
///
/// A body that fails to decode still produces the report; it travels in the
/// returned error so the command fails and scripts can tell.
pub fn inspect(decoder: &Decoder, bytes: &[u8]) -> Result<Value> {
    let outcome = decoder
        .decode(bytes)
        .context("not a ledger transaction")?;

    let header = match (bytes.get(1), bytes.get(2)) {
        (Some(&h0), Some(&h1)) => Header::from_bytes(h0, h1).ok(),
        _ => None,
    };
    debug!(?header, "parsed header");

    let report = json!({
        "header": header,
        "length": bytes.len(),
        "status": match &outcome {
            DecodeOutcome::Success(_) => "ok".to_owned(),
            DecodeOutcome::Failure(err) => err.to_string(),
        },
    });

    match outcome {
        DecodeOutcome::Success(_) => Ok(report),
        DecodeOutcome::Failure(err) => Err(anyhow!(err).context(format!(
            "malformed transaction\n{}",
            serde_json::to_string_pretty(&report)?
        ))),
    }
}
