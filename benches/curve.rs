//! SM2 curve operation benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use num_bigint::BigUint;
use sm2p256::{affine_add, curve_params, is_on_curve, scalar_base_mult, scalar_mult};

fn test_scalar() -> Vec<u8> {
    BigUint::parse_bytes(
        b"128b2fa8bd433c6c068c8d803dff79792a519a55171b1b650c23661d15897263",
        16,
    )
    .unwrap()
    .to_bytes_be()
}

fn bench_scalar_base_mult(c: &mut Criterion) {
    let k = test_scalar();
    c.bench_function("scalar_base_mult", |b| {
        b.iter(|| scalar_base_mult(black_box(&k)))
    });
}

fn bench_scalar_mult(c: &mut Criterion) {
    let params = curve_params();
    let k = test_scalar();
    c.bench_function("scalar_mult", |b| {
        b.iter(|| scalar_mult(black_box(&params.gx), black_box(&params.gy), black_box(&k)))
    });
}

fn bench_affine_add(c: &mut Criterion) {
    let params = curve_params();
    let (x2, y2) = scalar_base_mult(&[2]);
    c.bench_function("affine_add", |b| {
        b.iter(|| {
            affine_add(
                black_box(&params.gx),
                black_box(&params.gy),
                black_box(&x2),
                black_box(&y2),
            )
        })
    });
}

fn bench_is_on_curve(c: &mut Criterion) {
    let params = curve_params();
    c.bench_function("is_on_curve", |b| {
        b.iter(|| is_on_curve(black_box(&params.gx), black_box(&params.gy)))
    });
}

criterion_group!(
    benches,
    bench_scalar_base_mult,
    bench_scalar_mult,
    bench_affine_add,
    bench_is_on_curve
);
criterion_main!(benches);
