use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use galoisrs::field::BinaryOp;
use galoisrs::{ArithmeticMode, GaloisField, Poly};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const LEN: usize = 1 << 16;

/// Lookup tables against direct kernel arithmetic
fn bench_multiply_modes(c: &mut Criterion) {
    let mut group = c.benchmark_group("field_multiply");
    group.throughput(Throughput::Elements(LEN as u64));
    let mut rng = StdRng::seed_from_u64(0);

    for (p, m) in [(2, 8), (2, 16), (3, 5), (65_521, 1)] {
        for mode in [ArithmeticMode::Lookup, ArithmeticMode::Calculate] {
            let gf = GaloisField::builder(p, m).mode(mode).build().unwrap();
            let a: Vec<u64> = (0..LEN).map(|_| rng.random_range(0..gf.order())).collect();
            let b: Vec<u64> = (0..LEN).map(|_| rng.random_range(1..gf.order())).collect();
            let id = BenchmarkId::new(format!("{}", gf), mode);
            group.bench_function(id, |bench| {
                bench.iter(|| {
                    gf.apply_binary_par(BinaryOp::Multiply, black_box(&a), black_box(&b))
                        .unwrap()
                })
            });
        }
    }
    group.finish();
}

fn bench_poly_roots(c: &mut Criterion) {
    let mut group = c.benchmark_group("poly_roots");
    for (p, m) in [(2, 8), (2, 12)] {
        let gf = GaloisField::new(p, m).unwrap();
        let roots: Vec<u64> = (1..=16).map(|i| gf.alpha_power(i * 7)).collect();
        let poly = Poly::from_roots(&gf, &roots).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(&gf), &poly, |b, poly| {
            b.iter(|| black_box(poly).roots().unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_multiply_modes, bench_poly_roots);
criterion_main!(benches);
