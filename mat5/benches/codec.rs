//! Encode/decode throughput for representative payloads

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mat5::{DoubleArray, MatArray, MatFile};

fn build_arrays() -> Vec<MatArray> {
    let vals: Vec<f64> = (0..256 * 256).map(|i| (i % 997) as f64 * 0.125).collect();
    vec![DoubleArray::from_slice("grid", &vals, 256).unwrap().into()]
}

fn encode(c: &mut Criterion) {
    let arrays = build_arrays();
    c.bench_function("encode_uncompressed", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            mat5::write(&mut out, black_box(&arrays), false).unwrap();
            out
        })
    });
    c.bench_function("encode_compressed", |b| {
        b.iter(|| {
            let mut out = Vec::new();
            mat5::write(&mut out, black_box(&arrays), true).unwrap();
            out
        })
    });
}

fn decode(c: &mut Criterion) {
    let arrays = build_arrays();
    let mut plain = Vec::new();
    mat5::write(&mut plain, &arrays, false).unwrap();
    let mut deflated = Vec::new();
    mat5::write(&mut deflated, &arrays, true).unwrap();

    c.bench_function("decode_uncompressed", |b| {
        b.iter(|| MatFile::read_bytes(black_box(&plain)).unwrap())
    });
    c.bench_function("decode_compressed", |b| {
        b.iter(|| MatFile::read_bytes(black_box(&deflated)).unwrap())
    });
}

criterion_group!(benches, encode, decode);
criterion_main!(benches);
