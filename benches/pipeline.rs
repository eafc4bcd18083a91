//! Transform and projection benchmarks.

use std::hint::black_box;

use divan::Bencher;
use divan::counter::ItemsCount;
use lutra_core::math::rand::{DefaultRng, Distrib, Uniform};
use lutra_core::math::{Fixed, Mat4, Quat, Vec3, degs, splat, vec3};
use lutra_core::render::{
    Model, Pose, View, pipeline_mvp, pipeline_mvp_fused, project_perspective,
    project_perspective_fused,
};

const N: usize = 1024;

fn focal() -> Fixed {
    Fixed::from_int(256)
}

fn points<B: Clone>() -> Vec<Vec3<B>> {
    let d = Uniform(splat(Fixed::from_int(-40))..splat(Fixed::from_int(40)));
    d.iter(DefaultRng::default()).take(N).collect()
}

fn pose() -> Pose {
    let (o, z) = (Fixed::ZERO, Fixed::from_int(120));
    Pose {
        angles: [degs(15.0), degs(-40.0), degs(75.0)],
        translation: Vec3::new([o, o, z]),
        ..Pose::default()
    }
}

#[divan::bench]
fn project_exact(b: Bencher) {
    let pts = points::<View>();
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for p in &pts {
            black_box(project_perspective(black_box(p), focal()));
        }
    });
}

#[divan::bench]
fn project_fused(b: Bencher) {
    let pts = points::<View>();
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for p in &pts {
            black_box(project_perspective_fused(black_box(p), focal()));
        }
    });
}

#[divan::bench]
fn mvp_exact(b: Bencher) {
    let (pts, pose) = (points::<Model>(), pose());
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for p in &pts {
            black_box(pipeline_mvp(black_box(p), &pose, focal()));
        }
    });
}

#[divan::bench]
fn mvp_fused(b: Bencher) {
    let (pts, pose) = (points::<Model>(), pose());
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for p in &pts {
            black_box(pipeline_mvp_fused(black_box(p), &pose, focal()));
        }
    });
}

#[divan::bench]
fn rotate_matrix(b: Bencher) {
    let pts = points::<()>();
    let m: Mat4 = Mat4::rotate_y(degs(30.0));
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for p in &pts {
            black_box(m.apply(black_box(p)));
        }
    });
}

#[divan::bench]
fn rotate_quat(b: Bencher) {
    let pts = points::<()>();
    let o = Fixed::ZERO;
    let q = Quat::from_axis_angle(vec3(o, Fixed::ONE, o), degs(30.0));
    b.counter(ItemsCount::new(N)).bench_local(|| {
        for p in &pts {
            black_box(q.rotate(black_box(p)));
        }
    });
}

fn main() {
    divan::main()
}
