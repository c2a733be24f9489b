// Encoding, decoding, and identity-derivation benchmarks for the
// value-transfer core.
//
// Covers canonical encoding at several set sizes, strict decoding of the
// produced bytes, and BLAKE2b-256 identity derivation end to end.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion, Throughput};

use aurum_protocol::transfer::{
    Address, Color, ColoredBalance, Inputs, Output, OutputReference, Outputs, Transfer,
    TransferId,
};

/// Builds a transfer with `size` inputs and `size` single-balance outputs.
///
/// Fixtures are deterministic: identities and addresses are derived from
/// the element index so every run benchmarks identical bytes.
fn sample_transfer(size: usize) -> Transfer {
    let references = (0..size).map(|i| {
        let mut id = [0u8; 32];
        id[..8].copy_from_slice(&(i as u64).to_le_bytes());
        OutputReference::new(TransferId::from(id), (i % 4) as u16)
    });
    let inputs = Inputs::new(references).expect("indices are distinct");

    let outputs = Outputs::new((0..size).map(|i| {
        let mut address = [0u8; 32];
        address[..8].copy_from_slice(&(i as u64).to_le_bytes());
        address[31] = 0xAA;
        Output::new(
            Address::from(address),
            [ColoredBalance::new(Color::NATIVE, (i as u64 + 1) * 10)],
        )
        .expect("non-zero values")
    }))
    .expect("addresses are distinct");

    Transfer::new(inputs, outputs)
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer/encode");
    for size in [1usize, 8, 64] {
        let encoded_len = sample_transfer(size).bytes().len();
        group.throughput(Throughput::Bytes(encoded_len as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            // A fresh transfer per iteration: the first bytes() call is the
            // one that pays for encoding.
            b.iter_batched(
                || sample_transfer(size),
                |transfer| transfer.bytes(),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer/decode");
    for size in [1usize, 8, 64] {
        let bytes = sample_transfer(size).bytes();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| Transfer::from_bytes(bytes).expect("canonical bytes decode"));
        });
    }
    group.finish();
}

fn bench_identity(c: &mut Criterion) {
    let mut group = c.benchmark_group("transfer/identity");
    for size in [1usize, 8, 64] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            // Encoding and hashing together: the cost of the first id()
            // call on a locally built transfer.
            b.iter_batched(
                || sample_transfer(size),
                |transfer| transfer.id(),
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode, bench_identity);
criterion_main!(benches);
