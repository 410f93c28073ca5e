// Wire codec benchmarks.
//
// Covers payload encoding, full decode of signed transactions, parallel
// signing across signer counts, and per-signer verification.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::mock::StepRng;

use ledger_tx::crypto::Keypair;
use ledger_tx::identity::Address;
use ledger_tx::transaction::{ShardMask, Transaction};
use ledger_tx::{decode_transaction, encode_payload, encode_transaction};

/// A chain-code call with a handful of transfers and `signers` signers.
fn sample_transaction(signers: usize) -> (Transaction, Vec<Keypair>) {
    let keys: Vec<Keypair> = (0..signers).map(|_| Keypair::generate()).collect();
    let mut tx = Transaction::with_rng(&mut StepRng::new(0, 0));
    tx.set_from_address(keys[0].identity());
    for i in 0..4u8 {
        tx.add_transfer(Address::new([i; 32]), 1_000 * u64::from(i + 1));
    }
    tx.set_valid_until(10_000)
        .set_charge_rate(1_000)
        .set_charge_limit(1_000_000)
        .target_chain_code(
            "fetch.token",
            ShardMask::with_bits(16, [0, 3, 9]).unwrap_or_default(),
        )
        .set_action("transfer")
        .set_data(vec![0xAB; 64]);
    for kp in &keys {
        let _ = tx.add_signer(kp.identity());
    }
    (tx, keys)
}

fn bench_encode_payload(c: &mut Criterion) {
    let (tx, _) = sample_transaction(1);
    let mut buf = Vec::with_capacity(512);

    c.bench_function("codec/encode_payload", |b| {
        b.iter(|| {
            buf.clear();
            let _ = encode_payload(&mut buf, &tx);
        });
    });
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/decode");

    for signers in [1usize, 4, 16] {
        let (tx, keys) = sample_transaction(signers);
        let Ok(bytes) = encode_transaction(&tx, &keys) else {
            continue;
        };
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(signers), &bytes, |b, bytes| {
            b.iter(|| decode_transaction(bytes));
        });
    }

    group.finish();
}

fn bench_sign(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/seal_and_sign");

    for signers in [1usize, 4, 16, 64] {
        let (tx, keys) = sample_transaction(signers);
        group.throughput(Throughput::Elements(signers as u64));
        group.bench_with_input(BenchmarkId::from_parameter(signers), &keys, |b, keys| {
            b.iter(|| encode_transaction(&tx, keys));
        });
    }

    group.finish();
}

fn bench_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/verify_signatures");

    for signers in [1usize, 4, 16] {
        let (tx, keys) = sample_transaction(signers);
        let Ok(bytes) = encode_transaction(&tx, &keys) else {
            continue;
        };
        let Some(decoded) = decode_transaction(&bytes).ok().and_then(|o| o.into_decoded()) else {
            continue;
        };
        group.throughput(Throughput::Elements(signers as u64));
        group.bench_with_input(BenchmarkId::from_parameter(signers), &bytes, |b, bytes| {
            b.iter(|| decoded.verify_signatures(bytes));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_encode_payload,
    bench_decode,
    bench_sign,
    bench_verify,
);

criterion_main!(benches);
