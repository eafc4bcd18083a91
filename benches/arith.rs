//! Approximate versus exact arithmetic benchmarks.

use std::hint::black_box;

use divan::Bencher;
use divan::counter::ItemsCount;
use lutra_core::math::{
    Fixed, Log32, btm, log,
    rand::{DefaultRng, Distrib, Uniform},
};

const N: usize = 1024;

fn pairs<D: Distrib>(d: D) -> Vec<(D::Sample, D::Sample)> {
    let rng = &mut DefaultRng::default();
    (0..N).map(|_| (d.sample(rng), d.sample(rng))).collect()
}

#[divan::bench]
fn mul_u32_exact(b: Bencher) {
    let ops = pairs(Uniform(1u32..1 << 16));
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for &(x, y) in &ops {
            black_box(black_box(x).wrapping_mul(y));
        }
    });
}

#[divan::bench]
fn mul_u32_log(b: Bencher) {
    let ops = pairs(Uniform(1u32..1 << 16));
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for &(x, y) in &ops {
            black_box(log::mul_u32(black_box(x), y));
        }
    });
}

#[divan::bench]
fn div_u32_exact(b: Bencher) {
    let ops = pairs(Uniform(1u32..1 << 16));
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for &(x, y) in &ops {
            black_box(black_box(x) / y);
        }
    });
}

#[divan::bench]
fn div_u32_log(b: Bencher) {
    let ops = pairs(Uniform(1u32..1 << 16));
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for &(x, y) in &ops {
            black_box(log::div_u32(black_box(x), y));
        }
    });
}

#[divan::bench]
fn mul_f32_exact(b: Bencher) {
    let ops = pairs(Uniform(0.1f32..1000.0));
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for &(x, y) in &ops {
            black_box(black_box(x) * y);
        }
    });
}

#[divan::bench]
fn mul_f32_btm(b: Bencher) {
    let ops = pairs(Uniform(0.1f32..1000.0));
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for &(x, y) in &ops {
            black_box(btm::float_mul(black_box(x), y));
        }
    });
}

#[divan::bench]
fn mul_u32_by_f32_exact(b: Bencher) {
    let ints = pairs(Uniform(1u32..1 << 20));
    let floats = pairs(Uniform(0.01f32..100.0));
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for (&(x, _), &(f, _)) in ints.iter().zip(&floats) {
            black_box((black_box(x) as f32 * f) as u32);
        }
    });
}

#[divan::bench]
fn mul_u32_by_f32_chart(b: Bencher) {
    let ints = pairs(Uniform(1u32..1 << 20));
    let floats = pairs(Uniform(0.01f32..100.0));
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for (&(x, _), &(f, _)) in ints.iter().zip(&floats) {
            black_box(btm::mul_u32_by_f32(black_box(x), f));
        }
    });
}

#[divan::bench]
fn mul_fixed_exact(b: Bencher) {
    let ops = pairs(Uniform(Fixed::from_int(-100)..Fixed::from_int(100)));
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for &(x, y) in &ops {
            black_box(black_box(x) * y);
        }
    });
}

#[divan::bench]
fn mul_fixed_approx(b: Bencher) {
    let ops = pairs(Uniform(Fixed::from_int(-100)..Fixed::from_int(100)));
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for &(x, y) in &ops {
            black_box(black_box(x).mul_approx(y));
        }
    });
}

#[divan::bench]
fn product_chain_log32(b: Bencher) {
    let ops: Vec<_> = pairs(Uniform(1i32..10_000))
        .into_iter()
        .map(|(x, y)| (Log32::from_i32(x), Log32::from_i32(y)))
        .collect();
    b.counter(ItemsCount::new(N)).bench_local(|| {
        let mut acc = Log32::ONE;
        for &(x, y) in &ops {
            acc = black_box(acc * x / y);
        }
        acc
    });
}

fn main() {
    divan::main()
}
