//! Quaternions for representing rotations.

use core::ops::Mul;

use crate::math::angle::Angle;
use crate::math::approx::ApproxEq;
use crate::math::fixed::Fixed;
use crate::math::mat::{Mat3, RealToReal};
use crate::math::vec::{Vec3, vec3};

/// A quaternion with fixed-point components.
///
/// Rotations are represented by unit quaternions. A rotation by angle θ
/// about the unit axis **n** is the quaternion (**n** sin θ/2, cos θ/2).
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Quat {
    /// The vector (imaginary) part.
    pub v: Vec3,
    /// The scalar (real) part.
    pub w: Fixed,
}

impl Quat {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        v: vec3(Fixed::ZERO, Fixed::ZERO, Fixed::ZERO),
        w: Fixed::ONE,
    };

    /// Returns a quaternion with vector part `v` and scalar part `w`.
    #[inline]
    pub const fn new(v: Vec3, w: Fixed) -> Self {
        Self { v, w }
    }

    /// Returns the rotation by `a` about `axis`.
    ///
    /// `axis` need not be of unit length, but must not be zero.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::assert_approx_eq;
    /// use lutra_core::math::{Fixed, Quat, degs, vec3};
    ///
    /// let (o, i) = (Fixed::ZERO, Fixed::ONE);
    /// let q = Quat::from_axis_angle(vec3(o, o, i), degs(90.0));
    /// assert_approx_eq!(q.rotate(&vec3(i, o, o)), vec3(o, i, o));
    /// ```
    pub fn from_axis_angle(axis: Vec3, a: Angle) -> Self {
        let (s, c) = a.half().sin_cos();
        Self::new(axis.normalize() * s, c)
    }

    /// Returns the conjugate of `self`.
    ///
    /// For a unit quaternion, this is the inverse rotation.
    #[inline]
    #[must_use]
    pub fn conjugate(&self) -> Self {
        Self::new(-self.v, self.w)
    }

    /// Returns the squared norm of `self`.
    pub fn norm_sqr(&self) -> Fixed {
        let [x, y, z, w] = self.raw();
        Fixed::from_wide(x * x + y * y + z * z + w * w)
    }

    /// Returns `self` scaled to approximately unit norm.
    ///
    /// Returns `self` unchanged if its squared norm is zero.
    #[must_use]
    pub fn normalize(&self) -> Self {
        let n = self.norm_sqr();
        if n <= Fixed::ZERO {
            return *self;
        }
        let r = n.recip_sqrt();
        Self::new(self.v * r, self.w * r)
    }

    /// Interpolates linearly between `self` and `other` and normalizes
    /// the result.
    ///
    /// Unlike spherical interpolation, the angular velocity is not
    /// constant. The shorter arc is not chosen automatically: if `self`
    /// and `other` lie in opposite hemispheres, the longer arc is taken.
    pub fn nlerp(&self, other: &Self, t: Fixed) -> Self {
        let v = self.v + (other.v - self.v) * t;
        let w = self.w + (other.w - self.w) * t;
        Self::new(v, w).normalize()
    }

    /// Returns `v` rotated by `self`.
    ///
    /// Assumes that `self` is a unit quaternion. Computes
    /// **v** + w**t** + **q** × **t** where **t** = 2**q** × **v**,
    /// without building a matrix.
    pub fn rotate(&self, v: &Vec3) -> Vec3 {
        let t = self.v.cross(v) * Fixed::from_int(2);
        *v + t * self.w + self.v.cross(&t)
    }

    /// Returns the rotation matrix equivalent to `self`.
    ///
    /// Assumes that `self` is a unit quaternion.
    pub fn to_mat3(&self) -> Mat3<RealToReal<3>> {
        let [x, y, z, w] = self.raw();
        let e = |a: i64| Fixed::from_wide(2 * a);
        let one = Fixed::ONE;
        Mat3::new([
            [one - e(y * y + z * z), e(x * y - w * z), e(x * z + w * y)],
            [e(x * y + w * z), one - e(x * x + z * z), e(y * z - w * x)],
            [e(x * z - w * y), e(y * z + w * x), one - e(x * x + y * y)],
        ])
    }

    fn raw(&self) -> [i64; 4] {
        let [x, y, z] = self.v.0;
        [x, y, z, self.w].map(|c| c.to_bits() as i64)
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul for Quat {
    type Output = Self;

    /// Returns the Hamilton product of `self` and `rhs`.
    ///
    /// The product rotates first by `rhs`, then by `self`.
    fn mul(self, rhs: Self) -> Self {
        let [x1, y1, z1, w1] = self.raw();
        let [x2, y2, z2, w2] = rhs.raw();
        let x = w1 * x2 + x1 * w2 + y1 * z2 - z1 * y2;
        let y = w1 * y2 - x1 * z2 + y1 * w2 + z1 * x2;
        let z = w1 * z2 + x1 * y2 - y1 * x2 + z1 * w2;
        let w = w1 * w2 - x1 * x2 - y1 * y2 - z1 * z2;
        let [x, y, z, w] = [x, y, z, w].map(Fixed::from_wide);
        Self::new(vec3(x, y, z), w)
    }
}

impl ApproxEq<Self, f32> for Quat {
    fn approx_eq_eps(&self, other: &Self, eps: &f32) -> bool {
        self.v.approx_eq_eps(&other.v, eps)
            && self.w.approx_eq_eps(&other.w, eps)
    }
    fn relative_epsilon() -> f32 {
        Fixed::relative_epsilon()
    }
}
