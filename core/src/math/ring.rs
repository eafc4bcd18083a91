//! A logarithmic number system.
//!
//! [`Log32`] stores a sign and the base-2 logarithm of the magnitude, so
//! that multiplication, division, and powers are plain integer addition,
//! subtraction, and scaling. Chains of such operations can stay in the log
//! domain and only convert back to linear values at the end.
//!
//! Addition of two values of the same sign uses the identity
//! ```text
//! log₂(a + b) = max(A, B) + log₂(1 + 2^-|A - B|)
//! ```
//! where A and B are the logarithms of a and b, and the last term comes
//! from a table. Addition of values of opposite sign is done in linear
//! arithmetic, after scaling both operands by a common power of two so that
//! the larger one has 24 significant bits.

use core::fmt::{self, Debug, Display, Formatter};
use core::ops::{Add, Div, Mul, Neg, Sub};

use super::log::{LogQ8, exp2_q8, log2_q8};
use super::lut::LSE;

/// The sign of a [`Log32`].
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
#[repr(i8)]
pub enum Sign {
    Neg = -1,
    Zero = 0,
    Pos = 1,
}

/// A number in sign-logarithm form.
///
/// Holds a [`Sign`] and the base-2 logarithm of the magnitude in Q8.8, so
/// the representable magnitudes range from about 2<sup>-128</sup> to
/// 2<sup>128</sup> with a relative resolution of about 0.27%. Zero is a
/// separate element whose magnitude field holds a sentinel; the sign is
/// [`Sign::Zero`] if and only if the magnitude is the sentinel.
///
/// # Examples
/// ```
/// use lutra_core::math::Log32;
///
/// let a = Log32::from_i32(100);
/// let b = Log32::from_i32(200);
/// assert_eq!((a * b).to_i32(), 20032);
/// assert_eq!((a + b).to_i32(), 300);
/// assert_eq!((a - b).to_i32(), -100);
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Log32 {
    sign: Sign,
    mag: i16,
}

/// The magnitude field of zero.
const ZERO_MAG: i16 = i16::MIN;
/// The smallest magnitude of a nonzero value.
const MIN_MAG: i16 = i16::MIN + 1;

impl Sign {
    #[inline]
    const fn mul(self, other: Self) -> Self {
        match (self, other) {
            (Sign::Zero, _) | (_, Sign::Zero) => Sign::Zero,
            (a, b) if a as i8 == b as i8 => Sign::Pos,
            _ => Sign::Neg,
        }
    }

    #[inline]
    const fn neg(self) -> Self {
        match self {
            Sign::Neg => Sign::Pos,
            Sign::Zero => Sign::Zero,
            Sign::Pos => Sign::Neg,
        }
    }
}

impl Log32 {
    /// Zero.
    pub const ZERO: Self = Self { sign: Sign::Zero, mag: ZERO_MAG };
    /// One.
    pub const ONE: Self = Self { sign: Sign::Pos, mag: 0 };
    /// The largest representable value, just below 2<sup>128</sup>.
    pub const MAX: Self = Self { sign: Sign::Pos, mag: i16::MAX };

    /// Returns a value with the given sign and Q8.8 log-magnitude.
    ///
    /// The magnitude is ignored if `sign` is [`Sign::Zero`], and clamped to
    /// the nonzero range otherwise.
    #[inline]
    pub const fn new(sign: Sign, mag: i16) -> Self {
        match sign {
            Sign::Zero => Self::ZERO,
            _ if mag == ZERO_MAG => Self { sign, mag: MIN_MAG },
            _ => Self { sign, mag },
        }
    }

    /// Returns the sign of `self`.
    #[inline]
    pub const fn sign(self) -> Sign {
        self.sign
    }

    /// Returns the base-2 logarithm of the magnitude of `self` in Q8.8.
    ///
    /// Returns [`LogQ8::NEG_INF`] if `self` is zero.
    #[inline]
    pub const fn log_mag(self) -> LogQ8 {
        match self.sign {
            Sign::Zero => LogQ8::NEG_INF,
            _ => LogQ8(self.mag as i32),
        }
    }

    /// Returns whether `self` is zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        matches!(self.sign, Sign::Zero)
    }

    /// Converts an integer to log form.
    ///
    /// Only the eight most significant bits of the magnitude are retained.
    #[inline]
    pub fn from_i32(v: i32) -> Self {
        let sign = match v {
            0 => return Self::ZERO,
            1.. => Sign::Pos,
            _ => Sign::Neg,
        };
        Self::with_mag(sign, log2_q8(v.unsigned_abs()).0)
    }

    /// Converts `self` to an integer, truncating and saturating.
    ///
    /// Magnitudes below one convert to zero.
    #[inline]
    pub fn to_i32(self) -> i32 {
        let m = exp2_q8(self.log_mag()).min(i32::MAX as u32) as i32;
        match self.sign {
            Sign::Neg => -m,
            _ => m,
        }
    }

    /// Returns `self` raised to the power `k`.
    ///
    /// Only non-negative bases are supported: the result is always
    /// non-negative. Zero raised to any power is zero.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::math::Log32;
    ///
    /// let two = Log32::from_i32(2);
    /// assert_eq!(two.powf(10.0).to_i32(), 1024);
    /// assert_eq!(Log32::from_i32(4096).powf(0.5).to_i32(), 64);
    /// ```
    pub fn powf(self, k: f32) -> Self {
        debug_assert!(
            self.sign != Sign::Neg,
            "power of a negative base is not supported"
        );
        if self.is_zero() {
            return Self::ZERO;
        }
        Self::with_mag(Sign::Pos, (self.mag as f32 * k) as i32)
    }

    /// Returns the absolute value of `self`.
    #[inline]
    pub const fn abs(self) -> Self {
        match self.sign {
            Sign::Neg => Self { sign: Sign::Pos, mag: self.mag },
            _ => self,
        }
    }

    /// Returns a nonzero value with a magnitude clamped to range.
    #[inline]
    fn with_mag(sign: Sign, mag: i32) -> Self {
        let mag = mag.clamp(MIN_MAG as i32, i16::MAX as i32) as i16;
        Self { sign, mag }
    }

    /// Adds two values of the same sign in the log domain.
    fn add_same_sign(self, other: Self) -> Self {
        let (hi, lo) = if self.mag >= other.mag {
            (self.mag, other.mag)
        } else {
            (other.mag, self.mag)
        };
        let d = (hi as i32 - lo as i32) >> 3;
        let corr = LSE.get(d.min(255) as usize);
        Self::with_mag(self.sign, hi as i32 + corr as i32)
    }

    /// Adds two values of opposite sign in the linear domain.
    fn add_opposite_sign(self, other: Self) -> Self {
        // Common scale placing the larger magnitude in [2^23, 2^24)
        let hi = self.mag.max(other.mag) as i32;
        let k = ((hi >> LogQ8::FRAC_BITS) - 23) << LogQ8::FRAC_BITS;

        let linear = |x: Self| {
            let m = exp2_q8(LogQ8(x.mag as i32 - k)) as i64;
            if x.sign == Sign::Neg { -m } else { m }
        };
        let sum = linear(self) + linear(other);
        let sign = match sum {
            0 => return Self::ZERO,
            1.. => Sign::Pos,
            _ => Sign::Neg,
        };
        let mag = log2_q8(sum.unsigned_abs() as u32).0 + k;
        Self::with_mag(sign, mag)
    }
}

#[cfg(feature = "fp")]
impl Log32 {
    /// Converts an `f32` to log form, rounding to the nearest magnitude.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::{assert_approx_eq, math::Log32};
    ///
    /// let x = Log32::from_f32(-0.5);
    /// assert_eq!(x.log_mag().0, -256);
    /// assert_approx_eq!(x.to_f32(), -0.5, eps = 1e-3);
    /// ```
    pub fn from_f32(x: f32) -> Self {
        use super::float::f32 as fp;
        if x == 0.0 {
            return Self::ZERO;
        }
        let sign = if x > 0.0 { Sign::Pos } else { Sign::Neg };
        let l = fp::log2(fp::abs(x)) * 256.0;
        Self::with_mag(sign, (l + if l < 0.0 { -0.5 } else { 0.5 }) as i32)
    }

    /// Converts `self` to an `f32`.
    pub fn to_f32(self) -> f32 {
        use super::float::f32 as fp;
        let m = fp::exp2(self.mag as f32 / 256.0);
        match self.sign {
            Sign::Neg => -m,
            Sign::Zero => 0.0,
            Sign::Pos => m,
        }
    }
}

//
// Foreign trait impls
//

impl Default for Log32 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl From<i32> for Log32 {
    fn from(v: i32) -> Self {
        Self::from_i32(v)
    }
}

impl Mul for Log32 {
    type Output = Self;
    /// Returns the product of `self` and `rhs`, saturating.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        match self.sign.mul(rhs.sign) {
            Sign::Zero => Self::ZERO,
            s => Self::with_mag(s, self.mag as i32 + rhs.mag as i32),
        }
    }
}

impl Div for Log32 {
    type Output = Self;
    /// Returns the quotient of `self` and `rhs`, saturating.
    ///
    /// Division by zero returns the largest magnitude with the sign of
    /// `self`, positive if `self` is zero.
    #[inline]
    fn div(self, rhs: Self) -> Self {
        if rhs.is_zero() {
            let sign = match self.sign {
                Sign::Neg => Sign::Neg,
                _ => Sign::Pos,
            };
            return Self { sign, mag: i16::MAX };
        }
        match self.sign.mul(rhs.sign) {
            Sign::Zero => Self::ZERO,
            s => Self::with_mag(s, self.mag as i32 - rhs.mag as i32),
        }
    }
}

impl Add for Log32 {
    type Output = Self;
    /// Returns the sum of `self` and `rhs`.
    ///
    /// Zero is the additive identity. Operands of opposite sign are added
    /// in the linear domain, relative to the larger of the two.
    fn add(self, rhs: Self) -> Self {
        if self.is_zero() {
            rhs
        } else if rhs.is_zero() {
            self
        } else if self.sign == rhs.sign {
            self.add_same_sign(rhs)
        } else {
            self.add_opposite_sign(rhs)
        }
    }
}

impl Sub for Log32 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self + -rhs
    }
}

impl Neg for Log32 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self { sign: self.sign.neg(), mag: self.mag }
    }
}

impl Display for Log32 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = match self.sign {
            Sign::Zero => return f.write_str("0"),
            Sign::Neg => "-",
            Sign::Pos => "",
        };
        write!(f, "{sign}2^")?;
        Display::fmt(&(self.mag as f32 / 256.0), f)
    }
}

impl Debug for Log32 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Log32({self})")
    }
}

#[cfg(test)]
mod tests {
    use std::format;

    use crate::math::rand::{Distrib, Uniform, Xorshift64};

    use super::*;

    fn l(v: i32) -> Log32 {
        Log32::from_i32(v)
    }

    fn is_valid(x: Log32) -> bool {
        (x.sign == Sign::Zero) == (x.mag == ZERO_MAG)
    }

    #[test]
    fn zero_and_one() {
        assert_eq!(l(0), Log32::ZERO);
        assert_eq!(l(1), Log32::ONE);
        assert_eq!(Log32::ZERO.to_i32(), 0);
        assert_eq!(Log32::ONE.to_i32(), 1);
        assert_eq!(Log32::default(), Log32::ZERO);
        assert_eq!(Log32::new(Sign::Zero, 123), Log32::ZERO);
        assert!(is_valid(Log32::new(Sign::Pos, ZERO_MAG)));
    }

    #[test]
    fn round_trip_error() {
        let mut max = 0.0f32;
        for v in (1..100_000).step_by(7) {
            let r = l(v).to_i32();
            let err = (r - v).abs() as f32 / v as f32;
            max = max.max(err);
            assert_eq!(l(-v).to_i32(), -r);
        }
        assert!(max < 0.008, "maximum error {max}");
    }

    #[test]
    fn extreme_integers() {
        assert_eq!(l(i32::MIN).to_i32(), i32::MIN + 1);
        assert!(l(i32::MAX).to_i32() > 2_130_000_000);
    }

    #[test]
    fn mul_and_div() {
        assert_eq!((l(100) * l(200)).to_i32(), 20032);
        assert_eq!((l(-100) * l(200)).to_i32(), -20032);
        assert_eq!((l(-100) * l(-200)).to_i32(), 20032);
        assert_eq!((l(20000) / l(-50)).to_i32(), -399);
        assert_eq!(l(0) * l(5), Log32::ZERO);
        assert_eq!(l(0) / l(5), Log32::ZERO);
    }

    #[test]
    fn div_by_zero() {
        assert_eq!(l(5) / l(0), Log32::MAX);
        assert_eq!(l(0) / l(0), Log32::MAX);
        assert_eq!(l(-5) / l(0), -Log32::MAX);
    }

    #[test]
    fn mul_saturates() {
        let big = Log32::MAX;
        assert_eq!(big * big, Log32::MAX);
        let tiny = Log32::new(Sign::Neg, MIN_MAG);
        let prod = tiny * tiny;
        assert_eq!(prod, Log32::new(Sign::Pos, MIN_MAG));
        assert!(is_valid(prod));
    }

    #[test]
    fn powers() {
        assert_eq!(l(2).powf(10.0).to_i32(), 1024);
        assert_eq!(l(10).powf(0.0), Log32::ONE);
        assert_eq!(l(0).powf(3.0), Log32::ZERO);
        assert_eq!(l(2).powf(1000.0), Log32::MAX);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn power_of_negative_base() {
        let _ = l(-2).powf(2.0);
    }

    #[test]
    fn add_same_sign() {
        assert_eq!((l(100) + l(200)).to_i32(), 300);
        assert_eq!((l(-100) + l(-200)).to_i32(), -300);
        assert_eq!((l(1000) + l(1000)).to_i32(), 2000);
    }

    #[test]
    fn add_opposite_signs() {
        assert_eq!((l(-5000) + l(3000)).to_i32(), -2000);
        assert_eq!((l(5000) - l(3000)).to_i32(), 2000);
        assert_eq!(l(1234) - l(1234), Log32::ZERO);
    }

    #[test]
    fn add_opposite_signs_large() {
        let big = l(1 << 20) * l(1 << 20);
        assert_eq!(big - Log32::ONE, Log32::new(Sign::Pos, 40 << 8));
        assert_eq!(Log32::ONE - big, Log32::new(Sign::Neg, 40 << 8));

        let (x, y) = (Log32::MAX, Log32::new(Sign::Neg, i16::MAX - 256));
        assert_eq!(x + y, Log32::new(Sign::Pos, i16::MAX - 256));
    }

    #[test]
    fn add_opposite_signs_fractional() {
        // 0.75 and 0.5
        let (a, b) = (Log32::new(Sign::Pos, -106), Log32::new(Sign::Pos, -256));
        assert_eq!(a - b, Log32::new(Sign::Pos, -512));
        assert_eq!(b - a, Log32::new(Sign::Neg, -512));

        let tiny = Log32::new(Sign::Pos, MIN_MAG);
        assert_eq!(tiny - tiny, Log32::ZERO);
        assert!(is_valid(tiny - Log32::new(Sign::Pos, MIN_MAG + 512)));
    }

    #[test]
    fn zero_is_additive_identity() {
        for v in [-1000, -1, 1, 77, 1 << 30] {
            assert_eq!(l(v) + Log32::ZERO, l(v));
            assert_eq!(Log32::ZERO + l(v), l(v));
            assert_eq!(Log32::ZERO - l(v), -l(v));
        }
    }

    #[test]
    fn invariant_holds_after_every_operation() {
        let d = Uniform(-100_000..100_000);
        let mut rng = Xorshift64::default();
        for _ in 0..1000 {
            let (a, b) = (l(d.sample(&mut rng)), l(d.sample(&mut rng)));
            for x in [a * b, a / b, a + b, a - b, -a, a.abs().powf(1.5)] {
                assert!(is_valid(x), "{a:?}, {b:?} -> {x:?}");
            }
        }
    }

    #[test]
    fn display_and_debug() {
        assert_eq!(format!("{}", l(0)), "0");
        assert_eq!(format!("{}", l(-8)), "-2^3");
        assert_eq!(format!("{:?}", l(2)), "Log32(2^1)");
    }

    #[cfg(feature = "fp")]
    #[test]
    fn f32_conversions() {
        use crate::assert_approx_eq;

        assert_eq!(Log32::from_f32(0.0), Log32::ZERO);
        assert_eq!(Log32::from_f32(1.0), Log32::ONE);
        assert_approx_eq!(Log32::from_f32(3.0).to_f32(), 3.0, eps = 0.003);
        assert_approx_eq!(Log32::from_f32(-1e-20).to_f32(), -1e-20, eps = 0.003);
        assert_approx_eq!(Log32::from_f32(1e30).to_f32(), 1e30, eps = 0.003);
    }
}
