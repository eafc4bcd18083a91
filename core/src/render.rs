//! Perspective projection and the model-to-screen transform pipeline.
//!
//! Each stage comes in two flavors. The standard path divides exactly in
//! Q16.16; the fused path converts the focal length and depth to the log
//! domain once, takes their difference, and applies that single factor to
//! both x and y. The fused outputs are close to, but not bit-identical with,
//! the standard ones.

use core::array;

use crate::math::angle::Angle;
use crate::math::fixed::Fixed;
use crate::math::lut::{PERSPECTIVE, STEREO};
use crate::math::mat::{Mat3, Mat4, RealToReal};
use crate::math::ring::Log32;
use crate::math::vec::{Vec3, Vector};

//
// Types
//

/// Model space coordinate basis.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Model;

/// View (camera) space coordinate basis.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct View;

/// Screen space coordinate basis.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Screen;

/// Mapping from model space to view space.
pub type ModelToView = RealToReal<3, Model, View>;

/// The placement of an object relative to the camera.
///
/// Applied to a vertex in the order scale, rotate, translate. The rotation
/// is given as Euler angles about the x, y, and z axes, applied in that
/// order.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Pose {
    /// Per-axis scale factors.
    pub scale: Vec3<Model>,
    /// Rotation angles about the x, y, and z axes.
    pub angles: [Angle; 3],
    /// Translation in view space.
    pub translation: Vec3<View>,
}

//
// Inherent impls
//

impl Pose {
    /// Returns the rotation part of `self` as a matrix.
    pub fn rotation(&self) -> Mat3<ModelToView> {
        let [ax, ay, az] = self.angles;
        Mat3::rotation_euler(ax, ay, az)
    }

    /// Returns `v` transformed from model space to view space.
    pub fn transform(&self, v: &Vec3<Model>) -> Vec3<View> {
        let scaled = Vector::new(array::from_fn(|i| v[i] * self.scale[i]));
        self.rotation().apply(&scaled) + self.translation
    }

    /// Returns the transform of `self` as an affine matrix.
    ///
    /// Equivalent to [`transform`][Self::transform] up to rounding.
    pub fn to_mat4(&self) -> Mat4<ModelToView> {
        let s: Mat4<RealToReal<3, Model, Model>> =
            Mat4::scale(self.scale.0.into());
        let r: Mat4<ModelToView> = self.rotation().into();
        let t: Mat4<RealToReal<3, View, View>> =
            Mat4::translate(self.translation.0.into());
        s.then(&r).then(&t)
    }
}

impl Default for Pose {
    /// Returns the identity pose.
    fn default() -> Self {
        Self {
            scale: Vector::new([Fixed::ONE; 3]),
            angles: [Angle::ZERO; 3],
            translation: Vector::new([Fixed::ZERO; 3]),
        }
    }
}

//
// Free fns
//

/// Projects `v` onto the image plane at distance `focal` from the
/// camera, using exact division.
///
/// The x and y components are multiplied by *f* / (*z* + *f*), where the
/// denominator is clamped to at least the smallest positive value. The z
/// component passes through unchanged. The result saturates for points
/// at or behind the camera plane.
///
/// # Examples
/// ```
/// use lutra_core::math::{Fixed, Vec3};
/// use lutra_core::render::{View, project_perspective};
///
/// let f = Fixed::from_int;
/// let v = Vec3::<View>::new([f(2), f(-4), f(256)]);
/// let p = project_perspective(&v, f(256));
/// assert_eq!(p.0, [f(1), f(-2), f(256)]);
/// ```
pub fn project_perspective(v: &Vec3<View>, focal: Fixed) -> Vec3<Screen> {
    debug_assert!(focal > Fixed::ZERO, "focal length must be positive");
    let d = depth(v.z(), focal).to_bits() as i64;
    let f = focal.to_bits() as i64;
    let proj = |c: Fixed| Fixed::saturate(c.to_bits() as i64 * f / d);
    Vector::new([proj(v.x()), proj(v.y()), v.z()])
}

/// Projects `v` onto the image plane at distance `focal` from the
/// camera, using a single log-domain scale factor.
///
/// Computes log₂ *f* − log₂(*z* + *f*) once as a [`Log32`] and applies it to
/// both x and y, replacing the two divisions of
/// [`project_perspective`]. The result agrees with that of
/// `project_perspective` to within about 1.5%.
///
/// # Examples
/// ```
/// use lutra_core::assert_approx_eq;
/// use lutra_core::math::{Fixed, Vec3};
/// use lutra_core::render::{View, project_perspective};
/// use lutra_core::render::project_perspective_fused as fused;
///
/// let f = Fixed::from_int;
/// let v = Vec3::<View>::new([f(3), f(-5), f(100)]);
/// let exact = project_perspective(&v, f(256));
/// assert_approx_eq!(fused(&v, f(256)), exact, eps = 0.02);
/// ```
pub fn project_perspective_fused(
    v: &Vec3<View>,
    focal: Fixed,
) -> Vec3<Screen> {
    debug_assert!(focal > Fixed::ZERO, "focal length must be positive");
    let d = depth(v.z(), focal);
    let factor =
        Log32::from_i32(focal.to_bits()) / Log32::from_i32(d.to_bits());
    let proj = |c: Fixed| {
        Fixed::from_bits((Log32::from_i32(c.to_bits()) * factor).to_i32())
    };
    Vector::new([proj(v.x()), proj(v.y()), v.z()])
}

/// Transforms `v` from model space to view space according to `pose`,
/// then projects it with [`project_perspective`].
///
/// # Examples
/// ```
/// use lutra_core::assert_approx_eq;
/// use lutra_core::math::{Fixed, Vec3};
/// use lutra_core::render::{Model, Pose, pipeline_mvp};
///
/// let f = Fixed::from_int;
/// let mut pose = Pose::default();
/// pose.translation.0[2] = f(128);
///
/// let v = Vec3::<Model>::new([f(3), f(0), f(0)]);
/// let p = pipeline_mvp(&v, &pose, f(128));
/// assert_approx_eq!(p.0, [Fixed::from_f32(1.5), f(0), f(128)]);
/// ```
pub fn pipeline_mvp(
    v: &Vec3<Model>,
    pose: &Pose,
    focal: Fixed,
) -> Vec3<Screen> {
    project_perspective(&pose.transform(v), focal)
}

/// Transforms `v` from model space to view space according to `pose`,
/// then projects it with [`project_perspective_fused`].
///
/// The model-to-view transform is the same as in [`pipeline_mvp`]; only
/// the projection differs.
pub fn pipeline_mvp_fused(
    v: &Vec3<Model>,
    pose: &Pose,
    focal: Fixed,
) -> Vec3<Screen> {
    project_perspective_fused(&pose.transform(v), focal)
}

/// Returns the perspective scale factor *f* / (*f* + *z*) in Q8 for a focal
/// length *f* of 256 units.
///
/// Index `i` corresponds to depth *z* = 1024 · `i` / 255; indices past the
/// end of the table are clamped to the last entry.
///
/// # Examples
/// ```
/// use lutra_core::render::perspective_scale;
///
/// assert_eq!(perspective_scale(0), 256);
/// assert_eq!(perspective_scale(255), 51);
/// assert_eq!(perspective_scale(1000), 51);
/// ```
#[inline]
pub fn perspective_scale(i: usize) -> u16 {
    PERSPECTIVE.get(i.min(PERSPECTIVE.len() - 1))
}

/// Returns the stereographic projection factor 2 / (1 + *r*²) in Q12.
///
/// Index `i` corresponds to radius *r* = 2 · `i` / 255; indices past the
/// end of the table are clamped to the last entry.
#[inline]
pub fn stereographic_scale(i: usize) -> u16 {
    STEREO.get(i.min(STEREO.len() - 1))
}

/// Returns the projection denominator *z* + *f*, at least one raw unit.
fn depth(z: Fixed, focal: Fixed) -> Fixed {
    (z + focal).max(Fixed::EPSILON)
}

#[cfg(test)]
mod tests {
    use crate::assert_approx_eq;
    use crate::math::rand::{DefaultRng, Distrib, Uniform};
    use crate::math::degs;

    use super::*;

    fn f(n: i32) -> Fixed {
        Fixed::from_int(n)
    }

    fn view(x: i32, y: i32, z: i32) -> Vec3<View> {
        Vec3::new([f(x), f(y), f(z)])
    }

    fn model(x: i32, y: i32, z: i32) -> Vec3<Model> {
        Vec3::new([f(x), f(y), f(z)])
    }

    const FOCAL: Fixed = Fixed::from_int(256);

    #[test]
    fn standard_projection() {
        let p = project_perspective(&view(0, 1, 32), FOCAL);
        assert_eq!(p.0.map(Fixed::to_bits), [0, 58254, 32 << 16]);

        let p = project_perspective(&view(-3, 6, 0), FOCAL);
        assert_eq!(p.0, [f(-3), f(6), f(0)]);
    }

    #[test]
    fn fused_projection() {
        let p = project_perspective_fused(&view(0, 1, 32), FOCAL);
        assert_eq!(p.0.map(Fixed::to_bits), [0, 58112, 32 << 16]);

        let p = project_perspective_fused(&view(-3, 6, 0), FOCAL);
        assert_approx_eq!(p.0, [f(-3), f(6), f(0)], eps = 0.01);
    }

    #[test]
    fn projection_at_camera_plane_saturates() {
        let v = view(1, -1, -256);
        let p = project_perspective(&v, FOCAL);
        assert_eq!((p.x(), p.y()), (Fixed::MAX, Fixed::MIN));

        let p = project_perspective_fused(&v, FOCAL);
        assert_eq!(p.x(), Fixed::MAX);
        assert!(p.y() <= -Fixed::MAX);
    }

    #[test]
    fn identity_pose() {
        let pose = Pose::default();
        let v = model(5, -7, 11);

        // Table cosine of zero is one minus an ulp of Q1.15
        assert_approx_eq!(pose.transform(&v).0, v.0);

        let expected = project_perspective(&Vec3::new(v.0), FOCAL);
        assert_approx_eq!(pipeline_mvp(&v, &pose, FOCAL), expected);
    }

    #[test]
    fn pose_transform_order() {
        let pose = Pose {
            scale: model(2, 1, 1),
            angles: [degs(0.0), degs(0.0), degs(90.0)],
            translation: view(0, 0, 10),
        };
        // Scaled to (2, 0, 0), rotated to (0, 2, 0), translated
        assert_approx_eq!(pose.transform(&model(1, 0, 0)), view(0, 2, 10));
    }

    #[test]
    fn pose_matrix_agrees_with_transform() {
        let pose = Pose {
            scale: Vec3::new([Fixed::HALF, f(2), f(1)]),
            angles: [degs(30.0), degs(-45.0), degs(100.0)],
            translation: view(3, -2, 50),
        };
        let m = pose.to_mat4();
        for v in [model(1, 2, 3), model(-4, 0, 2), model(0, 0, 0)] {
            assert_approx_eq!(m.apply(&v), pose.transform(&v), eps = 0.01);
        }
    }

    #[test]
    fn fused_pipeline_agrees_with_standard() {
        let mut rng = DefaultRng::default();
        let coord = Uniform(f(-4)..f(4));
        let scale = Uniform(Fixed::HALF..f(2));
        let units = Uniform(0u32..65536);

        for _ in 0..1000 {
            let pose = Pose {
                scale: Vec3::new([(); 3].map(|_| scale.sample(&mut rng))),
                angles: [(); 3]
                    .map(|_| Angle::from_units(units.sample(&mut rng) as u16)),
                translation: Vec3::new([
                    coord.sample(&mut rng) * f(2),
                    coord.sample(&mut rng) * f(2),
                    Uniform(f(16)..f(512)).sample(&mut rng),
                ]),
            };
            let v = Vec3::new([(); 3].map(|_| coord.sample(&mut rng)));

            let exact = pipeline_mvp(&v, &pose, FOCAL);
            let fused = pipeline_mvp_fused(&v, &pose, FOCAL);
            assert_eq!(exact.z(), fused.z());
            for i in 0..2 {
                let (e, g) = (exact[i].to_f32(), fused[i].to_f32());
                let tol = 0.025 * e.abs().max(1.0);
                assert!((e - g).abs() <= tol, "{exact:?} vs {fused:?}");
            }
        }
    }

    #[test]
    fn lookup_scales() {
        assert_eq!(perspective_scale(0), 256);
        assert_eq!(perspective_scale(255), 51);
        assert_eq!(perspective_scale(usize::MAX), 51);
        assert!(
            (1..256).all(|i| perspective_scale(i) <= perspective_scale(i - 1))
        );

        assert_eq!(stereographic_scale(0), 8192);
        assert_eq!(stereographic_scale(255), 1638);
        assert_eq!(stereographic_scale(300), 1638);
    }
}
