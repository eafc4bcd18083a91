//! Bit length and normalization of unsigned integers.
//!
//! Both are computed with a byte-sized valuation table instead of a
//! count-leading-zeros instruction, which many small cores lack.

use core::fmt::{self, Debug, Formatter};

use super::lut::VALUATION;

/// An unsigned integer in normalized form.
///
/// Represents approximately `mant · 2^(exp - 7)`. The top bit of `mant` is
/// always set unless the value is zero, in which case `self` equals
/// [`Normalized::ZERO`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Normalized {
    /// Index of the highest set bit of the original value.
    pub exp: i8,
    /// The eight most significant bits of the original value.
    pub mant: u8,
}

impl Normalized {
    /// The normalized form of zero.
    pub const ZERO: Self = Self { exp: -127, mant: 0 };

    /// Returns whether `self` represents zero.
    #[inline]
    pub const fn is_zero(self) -> bool {
        self.mant == 0
    }

    /// Returns the value represented by `self`.
    ///
    /// Bits below the top eight of the original value are lost.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::math::norm::normalize;
    ///
    /// assert_eq!(normalize(200).to_u32(), 200);
    /// assert_eq!(normalize(0x1234_5678).to_u32(), 0x1220_0000);
    /// ```
    pub const fn to_u32(self) -> u32 {
        let m = self.mant as u32;
        match self.exp {
            e if self.is_zero() || e < 0 => 0,
            e @ 7.. => m << (e - 7),
            e => m >> (7 - e),
        }
    }
}

/// Returns the number of bits needed to represent `v`.
///
/// Equals ⌊log₂ `v`⌋ + 1 for nonzero `v`, and 0 for zero.
///
/// # Examples
/// ```
/// use lutra_core::math::norm::bit_len;
///
/// assert_eq!(bit_len(0), 0);
/// assert_eq!(bit_len(1), 1);
/// assert_eq!(bit_len(255), 8);
/// assert_eq!(bit_len(256), 9);
/// assert_eq!(bit_len(u32::MAX), 32);
/// ```
#[inline]
pub fn bit_len(v: u32) -> u32 {
    let [b3, b2, b1, b0] = v.to_be_bytes();
    let val = |b: u8| VALUATION.get(b as usize) as u32 + 1;
    if b3 != 0 {
        24 + val(b3)
    } else if b2 != 0 {
        16 + val(b2)
    } else if b1 != 0 {
        8 + val(b1)
    } else if b0 != 0 {
        val(b0)
    } else {
        0
    }
}

/// Returns `v` in normalized form.
///
/// The exponent is the index of the highest set bit, and the mantissa the
/// eight bits starting from it. Values shorter than eight bits are shifted
/// left so that the top bit of the mantissa is always set.
///
/// # Examples
/// ```
/// use lutra_core::math::norm::{Normalized, normalize};
///
/// assert_eq!(normalize(0), Normalized::ZERO);
/// assert_eq!(normalize(1), Normalized { exp: 0, mant: 0b1000_0000 });
/// assert_eq!(normalize(1000), Normalized { exp: 9, mant: 250 });
/// ```
#[inline]
pub fn normalize(v: u32) -> Normalized {
    let e = match bit_len(v) {
        0 => return Normalized::ZERO,
        n => n - 1,
    };
    let mant = if e >= 7 { v >> (e - 7) } else { v << (7 - e) };
    Normalized { exp: e as i8, mant: mant as u8 }
}

impl Debug for Normalized {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.is_zero() {
            f.write_str("Normalized(0)")
        } else {
            write!(f, "Normalized({:#010b} × 2^{})", self.mant, self.exp - 7)
        }
    }
}
