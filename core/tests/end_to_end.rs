use lutra_core::assert_approx_eq;
use lutra_core::math::rand::{DefaultRng, Distrib, Uniform};
use lutra_core::math::{atan2, btm, log, trig};
use lutra_core::prelude::*;
use lutra_core::render::{Model, View};

fn f(x: i32) -> Fixed {
    Fixed::from_int(x)
}

#[test]
fn integer_log_domain_multiply() {
    let p = log::mul_u16(500, 500);
    let err = (p as f32 - 250_000.0).abs() / 250_000.0;
    assert!(err < 0.005, "relative error {err}");

    assert_eq!(log::mul_u16(0, 500), 0);
    assert_eq!(log::mul_u16(500, 0), 0);
}

#[test]
fn float_multiply() {
    let p = btm::float_mul(123.456, 789.012);
    assert_approx_eq!(p, 123.456 * 789.012, eps = 1e-4);

    assert!(btm::float_mul(-2.5, 4.0) < 0.0);
    assert!(btm::float_mul(-2.5, -4.0) > 0.0);
}

#[test]
fn log_ring_chain() {
    let (a, b) = (Log32::from_i32(100), Log32::from_i32(200));
    assert_eq!((a + b).to_i32(), 300);

    // a·b / 40 + 500, all in the log domain
    let x = a * b / Log32::from_i32(40) + Log32::from_i32(500);
    let err = (x.to_i32() - 1000).abs();
    assert!(err <= 15, "{x:?}");
}

#[test]
fn trig_landmarks() {
    assert_eq!(trig::sin_u16(0), 0);
    assert_eq!(trig::sin_u16(0x4000), i16::MAX);
    assert_eq!(trig::cos_u16(0x4000), 0);
    assert_eq!(trig::atan2_u16(100, 100), 0x2000);
    assert_eq!(atan2(f(100), f(100)), degs(45.0));
}

#[test]
fn identity_composition() {
    let r: Mat4 = Mat4::rotate_y(degs(30.0));
    let m = r.then(&Mat4::translate(vec3(f(1), f(-2), f(3))));
    let id: Mat4 = Mat4::identity();
    assert_eq!(id.compose(&m), m);
    assert_eq!(m.compose(&id), m);
}

#[test]
fn rigid_transform_inverse() {
    let [rx, ry, t]: [Mat4; 3] = [
        Mat4::rotate_x(degs(60.0)),
        Mat4::rotate_y(degs(-15.0)),
        Mat4::translate(vec3(f(-7), f(2), f(12))),
    ];
    let m = rx.then(&ry).then(&t);
    let inv = m.inverse_affine_rot();
    assert_approx_eq!(inv.then(&m), Mat4::identity());
}

#[test]
fn quaternion_and_euler_rotations_agree() {
    let q = Quat::from_axis_angle(vec3(f(0), f(1), f(0)), degs(90.0));
    let m: Mat3 = Mat3::rotation_euler(Angle::ZERO, degs(90.0), Angle::ZERO);

    let v = vec3(f(4), f(-1), f(2));
    assert_approx_eq!(q.rotate(&v), m.apply(&v), eps = 0.02);
}

#[test]
fn standard_and_fused_pipelines_agree() {
    let mut rng = DefaultRng::default();
    let coords = Uniform(f(-20)..f(20));
    let units = Uniform(0u32..0x1_0000);
    let depths = Uniform(f(0)..f(120));

    for _ in 0..200 {
        let angles = [(); 3]
            .map(|_| Angle::from_units(units.sample(&mut rng) as u16));
        let depth = depths.sample(&mut rng);
        let pose = Pose {
            scale: Vec3::<Model>::new([Fixed::ONE; 3]),
            angles,
            translation: Vec3::<View>::new([f(0), f(0), depth]),
        };
        let v = Vec3::<Model>::new([(); 3].map(|_| coords.sample(&mut rng)));
        let focal = f(256);

        let exact = pipeline_mvp(&v, &pose, focal);
        let fused = pipeline_mvp_fused(&v, &pose, focal);
        for i in 0..2 {
            let (e, u) = (exact[i].to_f32(), fused[i].to_f32());
            let tol = 0.025 * e.abs().max(1.0);
            assert!((e - u).abs() <= tol, "{v:?}: {exact:?} vs {fused:?}");
        }
        assert_eq!(exact.z(), fused.z());
    }
}

#[test]
fn sampled_distributions_are_deterministic() {
    let d = Uniform(f(-1)..f(1));
    let a: Vec<Fixed> = d.iter(DefaultRng::default()).take(16).collect();
    let b: Vec<Fixed> = d.iter(DefaultRng::default()).take(16).collect();
    assert_eq!(a, b);
}
