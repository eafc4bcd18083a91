//! Floating-point compatibility API.
//!
//! Most floating-point functions are unavailable in `no_std`. This module
//! provides the few the crate needs using either the `libm` or `micromath`
//! crate, depending on which feature is enabled. As a fallback, it also
//! implements the functions that do not need a logarithm even if none of
//! the features is enabled.
//!
//! The numeric engine itself never calls into this module; it is only used
//! for conversions between `f32` and the table-driven number types.

#[cfg(feature = "libm")]
pub mod libm {
    pub use libm::exp2f as exp2;
    pub use libm::fabsf as abs;
    pub use libm::floorf as floor;
    pub use libm::log2f as log2;

    pub use super::fallback::rem_euclid;
}

#[cfg(feature = "mm")]
pub mod mm {
    use micromath::F32Ext as mm;

    #[inline]
    pub fn floor(x: f32) -> f32 {
        mm::floor(x)
    }
    #[inline]
    pub fn rem_euclid(x: f32, m: f32) -> f32 {
        mm::rem_euclid(x, m)
    }
    #[inline]
    pub fn abs(x: f32) -> f32 {
        mm::abs(x)
    }
    #[inline]
    pub fn log2(x: f32) -> f32 {
        mm::log2(x)
    }
    /// Returns the approximate value of 2<sup>`x`</sup>.
    #[inline]
    pub fn exp2(x: f32) -> f32 {
        mm::powf(2.0, x)
    }
}

pub mod fallback {
    /// Returns the largest integer less than or equal to `x`.
    #[inline]
    pub fn floor(x: f32) -> f32 {
        let t = x as i64 as f32;
        t - (t > x) as i64 as f32
    }
    /// Returns the least non-negative remainder of `x` (mod `m`).
    #[inline]
    pub fn rem_euclid(x: f32, m: f32) -> f32 {
        let r = x % m;
        r + if r < 0.0 { abs(m) } else { 0.0 }
    }
    /// Returns the absolute value of `x`.
    #[inline]
    pub fn abs(x: f32) -> f32 {
        f32::from_bits(x.to_bits() & !(1 << 31))
    }
}

#[cfg(feature = "std")]
#[allow(non_camel_case_types)]
pub type f32 = core::primitive::f32;

#[cfg(all(feature = "libm", not(feature = "std")))]
pub use libm as f32;

#[cfg(all(feature = "mm", not(feature = "std"), not(feature = "libm")))]
pub use mm as f32;

#[cfg(not(feature = "fp"))]
pub use fallback as f32;

#[cfg(test)]
#[allow(unused_imports)]
mod tests {
    use super::{f32, *};
    use crate::assert_approx_eq;

    #[cfg(feature = "libm")]
    #[test]
    fn libm_functions() {
        assert_eq!(libm::floor(1.5), 1.0);
        assert_eq!(libm::floor(-1.1), -2.0);

        assert_approx_eq!(libm::rem_euclid(1.6, 0.5), 0.1);
        assert_approx_eq!(libm::rem_euclid(-1.6, 0.5), 0.4);

        assert_eq!(libm::abs(-2.5), 2.5);
        assert_eq!(libm::log2(8.0), 3.0);
        assert_eq!(libm::exp2(-2.0), 0.25);
        assert!(libm::log2(-1.0).is_nan());
    }

    #[cfg(feature = "mm")]
    #[test]
    fn mm_functions() {
        assert_eq!(mm::floor(1.5), 1.0);
        assert_eq!(mm::floor(-1.1), -2.0);

        assert_approx_eq!(mm::rem_euclid(1.6, 0.5), 0.1);
        assert_approx_eq!(mm::rem_euclid(-1.6, 0.5), 0.4);

        assert_eq!(mm::abs(-2.5), 2.5);
        assert_approx_eq!(mm::log2(8.0), 3.0);
        assert_approx_eq!(mm::exp2(-2.0), 0.25);
    }

    #[cfg(feature = "std")]
    #[test]
    fn std_functions() {
        assert_eq!(f32::floor(-0.0), 0.0);

        assert_approx_eq!(f32::rem_euclid(1.6, 0.5), 0.1);
        assert_approx_eq!(f32::rem_euclid(-1.6, 0.5), 0.4);

        assert_eq!(f32::log2(8.0), 3.0);
        assert_eq!(f32::exp2(-2.0), 0.25);
    }

    #[test]
    fn fallback_functions() {
        use fallback as fb;
        assert_eq!(fb::floor(1.5), 1.0);
        assert_eq!(fb::floor(0.99), 0.0);
        assert_eq!(fb::floor(-0.0), 0.0);
        assert_eq!(fb::floor(-1.1), -2.0);
        assert_eq!(fb::floor(-3.0), -3.0);

        assert_approx_eq!(fb::rem_euclid(1.6, 0.5), 0.1);
        assert_approx_eq!(fb::rem_euclid(-1.6, 0.5), 0.4);
        assert_approx_eq!(fb::rem_euclid(1.6, -0.5), 0.1);
        assert_approx_eq!(fb::rem_euclid(-1.6, -0.5), 0.4);

        assert_eq!(fb::abs(-0.0).to_bits(), 0);
        assert_eq!(fb::abs(-2.5), 2.5);
        assert_eq!(fb::abs(2.5), 2.5);
    }
}
