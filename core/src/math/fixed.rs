//! Signed Q16.16 fixed-point numbers.

use core::fmt::{self, Debug, Display, Formatter};
use core::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub, SubAssign};

use super::approx::ApproxEq;
use super::log::{LogQ8, exp2_q8, log2_q8};

/// A signed fixed-point number with 16 integer and 16 fractional bits.
///
/// The range is approximately [-32768, 32768) with a resolution of
/// 2<sup>-16</sup>. Every operation saturates to [`Fixed::MIN`] or
/// [`Fixed::MAX`] instead of overflowing.
///
/// Multiplication and division come in two flavors: the operators `*` and
/// `/` are exact up to truncation, while [`mul_approx`][Self::mul_approx]
/// and [`div_approx`][Self::div_approx] go through the Q8.8 log domain and
/// need no hardware multiplier or divider.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct Fixed(i32);

/// Log-domain offset from the product of two raw values to a raw result.
const LOG_ONE: LogQ8 = LogQ8::from_int(Fixed::FRAC_BITS as i32);

impl Fixed {
    /// Number of fractional bits.
    pub const FRAC_BITS: u32 = 16;

    /// Zero.
    pub const ZERO: Self = Self(0);
    /// One.
    pub const ONE: Self = Self(1 << Self::FRAC_BITS);
    /// One half.
    pub const HALF: Self = Self(1 << (Self::FRAC_BITS - 1));
    /// The largest representable value, just below 32768.
    pub const MAX: Self = Self(i32::MAX);
    /// The smallest representable value, -32768.
    pub const MIN: Self = Self(i32::MIN);
    /// The smallest positive value, 2<sup>-16</sup>.
    pub const EPSILON: Self = Self(1);

    /// Returns a number with the raw representation `bits`.
    #[inline]
    pub const fn from_bits(bits: i32) -> Self {
        Self(bits)
    }

    /// Returns the raw representation of `self`.
    #[inline]
    pub const fn to_bits(self) -> i32 {
        self.0
    }

    /// Returns the integer `n` as a fixed-point number, saturating.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::math::Fixed;
    ///
    /// assert_eq!(Fixed::from_int(3).to_bits(), 3 << 16);
    /// assert_eq!(Fixed::from_int(100_000), Fixed::MAX);
    /// ```
    #[inline]
    pub const fn from_int(n: i32) -> Self {
        Self(n.saturating_mul(1 << Self::FRAC_BITS))
    }

    /// Returns the integer part of `self`, rounded towards negative infinity.
    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> Self::FRAC_BITS
    }

    /// Returns `x` rounded to the nearest fixed-point number, saturating.
    ///
    /// NaN maps to zero.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::math::Fixed;
    ///
    /// assert_eq!(Fixed::from_f32(1.5), Fixed::ONE + Fixed::HALF);
    /// assert_eq!(Fixed::from_f32(-0.25).to_bits(), -0x4000);
    /// assert_eq!(Fixed::from_f32(1e9), Fixed::MAX);
    /// ```
    #[inline]
    pub fn from_f32(x: f32) -> Self {
        let scaled = x * Self::ONE.0 as f32;
        let rounding = if scaled < 0.0 { -0.5 } else { 0.5 };
        Self((scaled + rounding) as i32)
    }

    /// Returns `self` as an `f32`.
    ///
    /// Values with more than 24 significant bits are rounded.
    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / Self::ONE.0 as f32
    }

    /// Returns the absolute value of `self`, saturating.
    #[inline]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Returns whether `self` is less than zero.
    #[inline]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Returns the approximate product of `self` and `other`.
    ///
    /// Computed in the Q8.8 log domain; see [`mul_u32`][super::log::mul_u32]
    /// for the error characteristics.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::math::Fixed;
    ///
    /// let x = Fixed::from_int(3).mul_approx(Fixed::from_f32(-0.5));
    /// assert_eq!(x, Fixed::from_f32(-1.5));
    /// ```
    pub fn mul_approx(self, other: Self) -> Self {
        if self.0 == 0 || other.0 == 0 {
            return Self::ZERO;
        }
        let (a, b) = (self.0.unsigned_abs(), other.0.unsigned_abs());
        let l = log2_q8(a) + log2_q8(b);
        Self::from_magnitude(exp2_q8(l - LOG_ONE), (self.0 ^ other.0) < 0)
    }

    /// Returns the approximate quotient of `self` and `other`.
    ///
    /// Computed in the Q8.8 log domain. Division by zero saturates to
    /// [`Fixed::MAX`] if `self` is non-negative and [`Fixed::MIN`] otherwise.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::math::Fixed;
    ///
    /// let x = Fixed::from_int(3).div_approx(Fixed::from_int(-4));
    /// assert_eq!(x, Fixed::from_f32(-0.75));
    /// ```
    pub fn div_approx(self, other: Self) -> Self {
        if other.0 == 0 {
            return self.div_by_zero();
        }
        if self.0 == 0 {
            return Self::ZERO;
        }
        let (a, b) = (self.0.unsigned_abs(), other.0.unsigned_abs());
        let l = log2_q8(a) - log2_q8(b);
        Self::from_magnitude(exp2_q8(l + LOG_ONE), (self.0 ^ other.0) < 0)
    }

    /// Returns the approximate square root of `self`.
    ///
    /// Returns zero if `self` is zero or negative.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::math::Fixed;
    ///
    /// assert_eq!(Fixed::from_int(9).sqrt(), Fixed::from_int(3));
    /// assert_eq!(Fixed::from_f32(0.25).sqrt(), Fixed::HALF);
    /// assert_eq!(Fixed::from_int(-4).sqrt(), Fixed::ZERO);
    /// ```
    pub fn sqrt(self) -> Self {
        if self.0 <= 0 {
            return Self::ZERO;
        }
        let l = log2_q8(self.0 as u32).half() + LogQ8::from_int(8);
        Self::from_magnitude(exp2_q8(l), false)
    }

    /// Returns the approximate reciprocal of the square root of `self`.
    ///
    /// Returns [`Fixed::MAX`] if `self` is zero or negative.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::math::Fixed;
    ///
    /// assert_eq!(Fixed::from_int(4).recip_sqrt(), Fixed::HALF);
    /// assert_eq!(Fixed::from_f32(0.25).recip_sqrt(), Fixed::from_int(2));
    /// assert_eq!(Fixed::ZERO.recip_sqrt(), Fixed::MAX);
    /// ```
    pub fn recip_sqrt(self) -> Self {
        if self.0 <= 0 {
            return Self::MAX;
        }
        let l = LogQ8::from_int(24) - log2_q8(self.0 as u32).half();
        Self::from_magnitude(exp2_q8(l), false)
    }

    /// Returns the saturated signed value of a magnitude.
    #[inline]
    fn from_magnitude(mag: u32, negative: bool) -> Self {
        let m = mag.min(i32::MAX as u32) as i32;
        Self(if negative { -m } else { m })
    }

    #[inline]
    fn div_by_zero(self) -> Self {
        if self.0 >= 0 { Self::MAX } else { Self::MIN }
    }

    /// Returns an accumulated sum of raw products, shifted back once and
    /// saturated.
    #[inline]
    pub(crate) fn from_wide(acc: i64) -> Self {
        Self::saturate(acc >> Self::FRAC_BITS)
    }

    #[inline]
    pub(crate) fn saturate(x: i64) -> Self {
        Self(x.clamp(i32::MIN as i64, i32::MAX as i64) as i32)
    }
}

//
// Local trait impls
//

impl ApproxEq<Self, f32> for Fixed {
    /// Returns whether `self` and `other` differ by at most `rel_eps` times
    /// the magnitude of `self`, or `rel_eps` if `self` is less than one.
    fn approx_eq_eps(&self, other: &Self, rel_eps: &f32) -> bool {
        let diff = (self.0 as i64 - other.0 as i64).unsigned_abs();
        let scale = self.0.unsigned_abs().max(Self::ONE.0 as u32);
        diff as f32 <= rel_eps * scale as f32
    }
    fn relative_epsilon() -> f32 {
        1.0 / 128.0
    }
}

//
// Foreign trait impls
//

impl Display for Fixed {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.to_f32(), f)
    }
}

impl Debug for Fixed {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("Fixed(")?;
        Display::fmt(self, f)?;
        f.write_str(")")
    }
}

impl From<i16> for Fixed {
    #[inline]
    fn from(n: i16) -> Self {
        Self::from_int(n.into())
    }
}

impl Add for Fixed {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Fixed {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl Neg for Fixed {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl Mul for Fixed {
    type Output = Self;
    /// Returns the product of `self` and `rhs`, rounded towards negative
    /// infinity and saturated.
    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::from_wide(self.0 as i64 * rhs.0 as i64)
    }
}

impl Div for Fixed {
    type Output = Self;
    /// Returns the quotient of `self` and `rhs`, rounded towards zero and
    /// saturated.
    ///
    /// Division by zero saturates to [`Fixed::MAX`] if `self` is
    /// non-negative and [`Fixed::MIN`] otherwise.
    #[inline]
    fn div(self, rhs: Self) -> Self {
        if rhs.0 == 0 {
            return self.div_by_zero();
        }
        Self::saturate(((self.0 as i64) << Self::FRAC_BITS) / rhs.0 as i64)
    }
}

impl AddAssign for Fixed {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Fixed {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Fixed {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}
