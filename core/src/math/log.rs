//! Integer arithmetic in the Q8.8 log domain.
//!
//! An unsigned word is mapped to its base-2 logarithm in Q8.8 fixed point
//! by [`log2_q8`] and back by [`exp2_q8`], each a single table lookup plus
//! shifts. Multiplication, division, and powers then reduce to addition,
//! subtraction, and scaling of logarithms.
//!
//! The results are approximate: about 0.5% relative error on average and
//! at most about 2% for 16-bit operands. Both directions truncate, so small
//! results in particular lose precision.

use core::fmt::{self, Debug, Display, Formatter};
use core::ops::{Add, Neg, Sub};

use super::lut::{EXP2, LOG2};
use super::norm::normalize;

/// A base-2 logarithm in signed Q8.8 fixed point.
///
/// The upper bits hold the integer part and the low eight bits the
/// fractional part. The special value [`LogQ8::NEG_INF`] denotes the
/// logarithm of zero.
///
/// Addition and subtraction saturate, and `NEG_INF` absorbs both, so that
/// products and quotients of zero stay zero.
#[derive(Copy, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(transparent)]
pub struct LogQ8(pub i32);

impl LogQ8 {
    /// The logarithm of zero.
    pub const NEG_INF: Self = Self(i32::MIN);
    /// The logarithm of one.
    pub const ZERO: Self = Self(0);
    /// Number of fractional bits.
    pub const FRAC_BITS: u32 = 8;

    /// Returns the logarithm of 2<sup>`n`</sup>.
    #[inline]
    pub const fn from_int(n: i32) -> Self {
        Self(n.saturating_mul(1 << Self::FRAC_BITS))
    }

    /// Returns whether `self` is the logarithm of zero.
    #[inline]
    pub const fn is_neg_inf(self) -> bool {
        self.0 == i32::MIN
    }

    /// Returns the integer part of `self`, rounded towards negative infinity.
    #[inline]
    pub const fn int_part(self) -> i32 {
        self.0 >> Self::FRAC_BITS
    }

    /// Returns the fractional part of `self` in units of 1/256.
    #[inline]
    pub const fn frac_part(self) -> u8 {
        self.0 as u8
    }

    /// Returns `self` halved, rounding towards negative infinity.
    ///
    /// Corresponds to taking the square root of the antilogarithm.
    #[inline]
    pub const fn half(self) -> Self {
        if self.is_neg_inf() { self } else { Self(self.0 >> 1) }
    }

    /// Returns `self` multiplied by `k`, saturating.
    ///
    /// Corresponds to raising the antilogarithm to the power `k`.
    #[inline]
    pub fn scale(self, k: f32) -> Self {
        if self.is_neg_inf() {
            return self;
        }
        // Saturating float-to-int cast; maps NaN to zero
        Self((self.0 as f32 * k) as i32).max(Self(i32::MIN + 1))
    }
}

/// Returns the base-2 logarithm of `v` in Q8.8.
///
/// Returns [`LogQ8::NEG_INF`] if `v` is zero.
///
/// # Examples
/// ```
/// use lutra_core::math::log::{LogQ8, log2_q8};
///
/// assert_eq!(log2_q8(0), LogQ8::NEG_INF);
/// assert_eq!(log2_q8(1), LogQ8(0));
/// assert_eq!(log2_q8(1024), LogQ8(10 << 8));
/// // log₂ 3 ≈ 1.585
/// assert_eq!(log2_q8(3), LogQ8(406));
/// ```
#[inline]
pub fn log2_q8(v: u32) -> LogQ8 {
    let n = normalize(v);
    if n.is_zero() {
        return LogQ8::NEG_INF;
    }
    let int = (n.exp as i32 - 7) << LogQ8::FRAC_BITS;
    LogQ8(int + LOG2.get(n.mant as usize) as i32)
}

/// Returns 2 raised to the power `y`, truncated to an integer.
///
/// Saturates to `u32::MAX` if the integer part of `y` exceeds 31, and
/// returns zero if the result would be shifted out entirely or if `y` is
/// [`LogQ8::NEG_INF`].
///
/// # Examples
/// ```
/// use lutra_core::math::log::{LogQ8, exp2_q8};
///
/// assert_eq!(exp2_q8(LogQ8(0)), 1);
/// assert_eq!(exp2_q8(LogQ8::from_int(31)), 1 << 31);
/// assert_eq!(exp2_q8(LogQ8::from_int(32)), u32::MAX);
/// assert_eq!(exp2_q8(LogQ8::from_int(-1)), 0);
/// assert_eq!(exp2_q8(LogQ8::NEG_INF), 0);
/// ```
#[inline]
pub fn exp2_q8(y: LogQ8) -> u32 {
    if y.is_neg_inf() {
        return 0;
    }
    let v = EXP2.get(y.frac_part() as usize) as u32;
    match y.int_part() {
        32.. => u32::MAX,
        i @ 8..=31 => v << (i - 8),
        i => match 8 - i {
            31.. => 0,
            s => v >> s,
        },
    }
}

/// Returns the approximate product of two 16-bit integers.
///
/// # Examples
/// ```
/// use lutra_core::math::log::mul_u16;
///
/// assert_eq!(mul_u16(0, 1234), 0);
/// // Exact result 20000
/// assert_eq!(mul_u16(100, 200), 20032);
/// // Exact result 250000
/// assert_eq!(mul_u16(500, 500), 249856);
/// ```
#[inline]
pub fn mul_u16(a: u16, b: u16) -> u32 {
    mul_u32(a.into(), b.into())
}

/// Returns the approximate product of two 32-bit integers.
///
/// Saturates to `u32::MAX` if the product does not fit in 32 bits.
#[inline]
pub fn mul_u32(a: u32, b: u32) -> u32 {
    if a == 0 || b == 0 {
        return 0;
    }
    exp2_q8(log2_q8(a) + log2_q8(b))
}

/// Returns the approximate quotient `a / b`.
///
/// Returns `u32::MAX` if `b` is zero and `a` is not, and zero if `a` is zero.
///
/// # Examples
/// ```
/// use lutra_core::math::log::div_u32;
///
/// // Exact result 400
/// assert_eq!(div_u32(20000, 50), 399);
/// assert_eq!(div_u32(1 << 20, 1 << 10), 1 << 10);
/// assert_eq!(div_u32(1, 0), u32::MAX);
/// assert_eq!(div_u32(0, 0), 0);
/// ```
#[inline]
pub fn div_u32(a: u32, b: u32) -> u32 {
    match (a, b) {
        (0, _) => 0,
        (_, 0) => u32::MAX,
        _ => exp2_q8(log2_q8(a) - log2_q8(b)),
    }
}

/// Returns `a` raised to the power `k`, approximately.
///
/// Returns zero if `a` is zero, and saturates to `u32::MAX`.
///
/// # Examples
/// ```
/// use lutra_core::math::log::pow_u32;
///
/// assert_eq!(pow_u32(2, 10.0), 1024);
/// assert_eq!(pow_u32(4096, 0.5), 64);
/// ```
#[inline]
pub fn pow_u32(a: u32, k: f32) -> u32 {
    exp2_q8(log2_q8(a).scale(k))
}

impl Add for LogQ8 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        if self.is_neg_inf() || rhs.is_neg_inf() {
            Self::NEG_INF
        } else {
            Self(self.0.saturating_add(rhs.0))
        }
    }
}

impl Sub for LogQ8 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        if self.is_neg_inf() {
            Self::NEG_INF
        } else {
            Self(self.0.saturating_sub(rhs.0))
        }
    }
}

impl Neg for LogQ8 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self(self.0.saturating_neg())
    }
}

impl Display for LogQ8 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_neg_inf() {
            f.write_str("-inf")
        } else {
            Display::fmt(&(self.0 as f32 / 256.0), f)
        }
    }
}

impl Debug for LogQ8 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "LogQ8({self})")
    }
}
