use std::hint::black_box;

use divan::{Bencher, counter::ItemsCount};

use lutra_core::{
    geom::{Plane, Ray, Sphere},
    math::rand::*,
    math::{Fixed, vec3},
};
use lutra_geom::Intersect;

fn f(x: i32) -> Fixed {
    Fixed::from_int(x)
}

/// Returns a unit-direction ray starting 10 units from the origin and
/// pointing towards it.
fn inward_ray(rng: &mut DefaultRng) -> Ray {
    let u = UnitSphere.sample(rng);
    Ray(u * f(10), -u)
}

#[divan::bench]
fn ray_sphere_hit(b: Bencher) {
    let mut rng = DefaultRng::default();
    let sphere = Sphere::new(vec3(f(0), f(0), f(0)), f(5));

    b.with_inputs(|| inward_ray(&mut rng))
        .counter(ItemsCount::new(1usize))
        .bench_local_values(|ray| {
            assert!(ray.intersect(&black_box(sphere)).is_some())
        });
}

#[divan::bench]
fn ray_sphere_miss(b: Bencher) {
    let mut rng = DefaultRng::default();
    let sphere = Sphere::new(vec3(f(0), f(0), f(0)), f(5));

    b.with_inputs(|| {
        let Ray(orig, dir) = inward_ray(&mut rng);
        Ray(orig, -dir)
    })
    .counter(ItemsCount::new(1usize))
    .bench_local_values(|ray| {
        assert!(ray.intersect(&black_box(sphere)).is_none())
    });
}

#[divan::bench]
fn ray_plane(b: Bencher) {
    let mut rng = DefaultRng::default();
    let plane = Plane::new(vec3(f(0), f(1), f(0)), f(-10));

    b.with_inputs(|| inward_ray(&mut rng))
        .counter(ItemsCount::new(1usize))
        .bench_local_values(|ray| black_box(ray.intersect(&plane)));
}

fn main() {
    divan::main()
}
