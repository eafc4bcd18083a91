//! Table-driven approximate arithmetic and fixed-point linear algebra.
//!
//! The recurring technique is to move an operation into a domain where it
//! becomes cheaper, and to approximate the maps into and out of that domain
//! with small precomputed tables. The logarithm of a product is the sum of
//! the logarithms, so multiplication becomes addition, division becomes
//! subtraction, and powers become scaling. The technique is applied at three
//! levels:
//!
//! * unsigned machine words, with Q8.8 logarithms ([`log`]),
//! * IEEE 754 single-precision floats, with bipartite mantissa tables
//!   ([`btm`]),
//! * a first-class logarithmic number type that keeps chains of products
//!   in the log domain ([`ring`]).
//!
//! On top of these sit Q16.16 [fixed point][fixed], table-driven
//! [trigonometry][trig] and [angles][angle], and [vectors][self::vec],
//! [matrices][mat] and [quaternions][quat] with fixed-point components.
//!
//! As elsewhere in this crate, the types are strongly typed: vectors are
//! tagged with the *basis* they are expressed in, and matrices with both the
//! source and destination basis, so a transform can only be applied to a
//! vector in its source basis.

pub use {
    angle::{Angle, acos, atan2, degs, rads, turns},
    approx::ApproxEq,
    fixed::Fixed,
    log::LogQ8,
    mat::{Mat3, Mat4, Matrix},
    quat::Quat,
    ring::Log32,
    space::{Linear, Real},
    vec::{Vec3, Vec4, Vector, splat, vec3, vec4},
};

pub mod angle;
pub mod approx;
pub mod btm;
pub mod fixed;
pub mod float;
pub mod log;
pub mod lut;
pub mod mat;
pub mod norm;
pub mod quat;
pub mod rand;
pub mod ring;
pub mod space;
pub mod trig;
pub mod vec;

/// Trait for linear interpolation between two values.
pub trait Lerp: Sized {
    /// Linearly interpolates between `self` and `other`.
    ///
    /// If `t` = 0, returns `self`; if `t` = 1, returns `other`.
    /// For 0 < `t` < 1, returns the weighted average of `self` and `other`
    /// ```text
    /// (1 - t) * self + t * other
    /// ```
    /// Values of `t` outside [0, 1] extrapolate, saturating on overflow.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::math::{Fixed, Lerp};
    ///
    /// let a = Fixed::from_int(1);
    /// let b = Fixed::from_int(5);
    /// assert_eq!(a.lerp(&b, Fixed::from_f32(0.25)), Fixed::from_int(2));
    /// ```
    fn lerp(&self, other: &Self, t: Fixed) -> Self;

    /// Returns the (unweighted) average of `self` and `other`.
    fn midpoint(&self, other: &Self) -> Self {
        self.lerp(other, Fixed::HALF)
    }
}

/// Linearly interpolates between two values.
///
/// For examples and more information, see [`Lerp::lerp`].
#[inline]
pub fn lerp<T: Lerp>(t: Fixed, from: T, to: T) -> T {
    from.lerp(&to, t)
}

impl<T: Linear<Scalar = Fixed>> Lerp for T {
    /// Returns `self + t * (other - self)`.
    fn lerp(&self, other: &Self, t: Fixed) -> Self {
        self.add(&other.sub(self).mul(t))
    }
}
