//! Approximate single-precision float arithmetic with bipartite tables.
//!
//! A float is split into its sign, exponent, and mantissa. The logarithm
//! of `1 + mantissa` is looked up with a *bipartite table method* (BTM):
//! a coarse table indexed by the high bits of the mantissa gives the value
//! at the center of an interval, and a small correction table indexed by
//! the coarse and the low bits gives a linear correction within it. The
//! sum of two 512-entry tables thus stands in for a 16384-entry table.
//!
//! Multiplication adds the logarithms of the mantissas and the exponents,
//! division subtracts them; a second bipartite pair maps the result back.
//! The relative error is about 0.006% on average and below 0.05% in the
//! worst case. Results are not IEEE 754 conformant: subnormal results are
//! flushed to zero. A NaN operand gives a NaN result.
//!
//! [`mul_u32_by_f32`] scales an integer by a float without a float
//! multiply: the mantissa is read from a piecewise linear chart of 16
//! segments and the exponent becomes a shift.

use core::fmt::{self, Debug, Formatter};

use super::lut::{
    BTM_EXP2_T1, BTM_EXP2_T2, BTM_LOG2_T1, BTM_LOG2_T2, MANT_C0, MANT_C1,
};

/// The fields of an IEEE 754 single-precision float.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct FloatBits {
    /// Whether the value is negative.
    pub sign: bool,
    /// The biased exponent, 0 to 255. The bias is 127.
    pub exp: u8,
    /// The 23-bit fraction, without the implicit leading one.
    pub mant: u32,
}

/// Widths of the coarse, middle, and fine parts of the table index.
const N1: u32 = 4;
const N2: u32 = 5;
const N3: u32 = 5;

const MANT_BITS: u32 = 23;
const MANT_MASK: u32 = (1 << MANT_BITS) - 1;
const EXP_BIAS: i32 = 127;
const EXP_MAX: i32 = 255;

impl FloatBits {
    /// Decomposes raw IEEE 754 bits.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::math::btm::FloatBits;
    ///
    /// let f = FloatBits::from_bits(0xC0A0_0000); // -5.0
    /// assert_eq!(f, FloatBits { sign: true, exp: 129, mant: 0x20_0000 });
    /// ```
    #[inline]
    pub const fn from_bits(bits: u32) -> Self {
        Self {
            sign: bits >> 31 != 0,
            exp: (bits >> MANT_BITS) as u8,
            mant: bits & MANT_MASK,
        }
    }

    /// Decomposes `x`.
    #[inline]
    pub fn from_f32(x: f32) -> Self {
        Self::from_bits(x.to_bits())
    }

    /// Reassembles raw IEEE 754 bits.
    ///
    /// Fraction bits above the 23rd are ignored.
    #[inline]
    pub const fn to_bits(self) -> u32 {
        (self.sign as u32) << 31
            | (self.exp as u32) << MANT_BITS
            | self.mant & MANT_MASK
    }

    /// Reassembles an `f32`.
    #[inline]
    pub fn to_f32(self) -> f32 {
        f32::from_bits(self.to_bits())
    }

    /// Returns whether `self` is a zero of either sign.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.exp == 0 && self.mant == 0
    }

    /// Returns whether `self` is a NaN.
    #[inline]
    pub const fn is_nan(self) -> bool {
        self.exp == EXP_MAX as u8 && self.mant != 0
    }

    /// Returns a signed infinity.
    #[inline]
    pub const fn infinity(sign: bool) -> Self {
        Self { sign, exp: EXP_MAX as u8, mant: 0 }
    }
}

/// Splits a 14-bit table index into the coarse and correction indices.
#[inline]
fn split(idx: u32) -> (usize, usize) {
    let coarse = idx >> N3;
    let fine = (idx >> (N2 + N3)) << N3 | idx & ((1 << N3) - 1);
    (coarse as usize, fine as usize)
}

#[inline]
fn lookup(t1: u16, t2: i16) -> u16 {
    (t1 as i32 + t2 as i32).clamp(0, u16::MAX as i32) as u16
}

/// Returns log₂(1 + `m`) in Q0.16, where `m` is a 23-bit fraction.
///
/// # Examples
/// ```
/// use lutra_core::math::btm::btm_log2;
///
/// // log₂ 1.5 ≈ 0.585
/// let l = btm_log2(0x40_0000);
/// assert!(l.abs_diff(38336) < 8);
/// ```
#[inline]
pub fn btm_log2(mant: u32) -> u16 {
    let idx = (mant & MANT_MASK) >> (MANT_BITS - N1 - N2 - N3);
    let (i, j) = split(idx);
    lookup(BTM_LOG2_T1.get(i), BTM_LOG2_T2.get(j))
}

/// Returns 2<sup>`frac`</sup> − 1 as a 23-bit fraction, where `frac` is
/// in Q0.16.
///
/// # Examples
/// ```
/// use lutra_core::math::btm::btm_exp2;
///
/// // 2^0.5 - 1 ≈ 0.4142
/// let m = btm_exp2(0x8000);
/// assert!(m.abs_diff(3474675) < 1 << 10);
/// ```
#[inline]
pub fn btm_exp2(frac: u16) -> u32 {
    let idx = (frac >> (16 - N1 - N2 - N3)) as u32;
    let (i, j) = split(idx);
    (lookup(BTM_EXP2_T1.get(i), BTM_EXP2_T2.get(j)) as u32) << (MANT_BITS - 16)
}

/// Assembles a result from a sign, unbiased-range exponent, and log fraction.
#[inline]
fn assemble(sign: bool, exp: i32, frac: u16) -> f32 {
    if exp <= 0 {
        0.0
    } else if exp >= EXP_MAX {
        FloatBits::infinity(sign).to_f32()
    } else {
        let mant = btm_exp2(frac);
        FloatBits { sign, exp: exp as u8, mant }.to_f32()
    }
}

/// Returns the approximate product of `a` and `b`.
///
/// Returns NaN if either operand is NaN. Otherwise returns positive zero
/// if either operand is zero or the result underflows, and a signed
/// infinity if it overflows.
///
/// # Examples
/// ```
/// use lutra_core::assert_approx_eq;
/// use lutra_core::math::btm::float_mul;
///
/// assert_approx_eq!(float_mul(123.456, 789.012), 97408.27, eps = 1e-4);
/// assert_eq!(float_mul(0.0, -5.0), 0.0);
/// assert_eq!(float_mul(1e30, -1e30), f32::NEG_INFINITY);
/// assert_eq!(float_mul(1e-30, 1e-30), 0.0);
/// ```
pub fn float_mul(a: f32, b: f32) -> f32 {
    let (a, b) = (FloatBits::from_f32(a), FloatBits::from_f32(b));
    if a.is_nan() || b.is_nan() {
        return f32::NAN;
    }
    if a.is_zero() || b.is_zero() {
        return 0.0;
    }
    let sum = btm_log2(a.mant) as u32 + btm_log2(b.mant) as u32;
    let carry = (sum >> 16) as i32;
    let exp = a.exp as i32 + b.exp as i32 - EXP_BIAS + carry;
    assemble(a.sign ^ b.sign, exp, sum as u16)
}

/// Returns the approximate quotient `a / b`.
///
/// Returns NaN if either operand is NaN. Otherwise returns positive zero
/// if `a` is zero or the result underflows, and a signed infinity if `b`
/// is zero or the result overflows.
///
/// # Examples
/// ```
/// use lutra_core::assert_approx_eq;
/// use lutra_core::math::btm::float_div;
///
/// assert_approx_eq!(float_div(1.0, 3.0), 0.33333334, eps = 1e-4);
/// assert_eq!(float_div(0.0, 3.0), 0.0);
/// assert_eq!(float_div(-1.0, 0.0), f32::NEG_INFINITY);
/// ```
pub fn float_div(a: f32, b: f32) -> f32 {
    let (a, b) = (FloatBits::from_f32(a), FloatBits::from_f32(b));
    if a.is_nan() || b.is_nan() {
        return f32::NAN;
    }
    if a.is_zero() {
        return 0.0;
    }
    if b.is_zero() {
        return FloatBits::infinity(a.sign ^ b.sign).to_f32();
    }
    let diff = btm_log2(a.mant) as i32 - btm_log2(b.mant) as i32;
    let (frac, carry) = if diff < 0 { (diff + 0x1_0000, -1) } else { (diff, 0) };
    let exp = a.exp as i32 - b.exp as i32 + EXP_BIAS + carry;
    assemble(a.sign ^ b.sign, exp, frac as u16)
}

/// Returns the product of `a` and `f`, truncated and saturated to `u32`.
///
/// The mantissa of `f` is evaluated to 16 fractional bits with a linear
/// chart, the integer product is taken in 64 bits, and the exponent of `f`
/// is applied as a single shift. Returns zero if `f` is negative, zero,
/// subnormal, or not finite.
///
/// # Examples
/// ```
/// use lutra_core::math::btm::mul_u32_by_f32;
///
/// assert_eq!(mul_u32_by_f32(1000, 1.5), 1500);
/// assert_eq!(mul_u32_by_f32(100, 0.25), 25);
/// assert_eq!(mul_u32_by_f32(7, 3.1), 21);
/// assert_eq!(mul_u32_by_f32(3, 1e10), u32::MAX);
/// assert_eq!(mul_u32_by_f32(5, -2.0), 0);
/// ```
pub fn mul_u32_by_f32(a: u32, f: f32) -> u32 {
    const SEG_BITS: u32 = 4;
    const DELTA_BITS: u32 = MANT_BITS - SEG_BITS;

    let x = FloatBits::from_f32(f);
    if a == 0 || x.sign || x.exp == 0 || x.exp == EXP_MAX as u8 {
        return 0;
    }
    let seg = (x.mant >> DELTA_BITS) as usize;
    let delta = (x.mant & ((1 << DELTA_BITS) - 1)) >> (DELTA_BITS - 16);
    let corr = (MANT_C1.get(seg) as i64 * delta as i64) >> 16;
    let m = (MANT_C0.get(seg) as i64 + corr) as u64;

    // m is in Q16.16, so the total right shift is 16 - exponent
    let prod = a as u64 * m;
    let shift = 16 - (x.exp as i32 - EXP_BIAS);
    let r = match shift {
        // prod ≥ 2^16, so any left shift of 16 or more overflows
        i32::MIN..-15 => u64::MAX,
        -15..0 => prod << -shift,
        _ => prod.checked_shr(shift as u32).unwrap_or(0),
    };
    r.min(u32::MAX as u64) as u32
}

impl Debug for FloatBits {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let sign = if self.sign { '-' } else { '+' };
        let exp = self.exp as i32 - EXP_BIAS;
        write!(f, "FloatBits({sign} 2^{exp} × 1.{:06X})", self.mant << 1)
    }
}
