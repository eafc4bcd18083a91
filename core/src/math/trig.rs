//! Table-driven trigonometry on 16-bit angles.
//!
//! Angles are unsigned 16-bit integers where 65536 units make a full turn,
//! so that angle arithmetic wraps around for free. Sine and cosine are
//! single lookups into tables of [`SIN_LEN`] entries; the arctangent and
//! arccosine fold their argument into the first octant or quadrant and
//! use a 256-entry table.

use super::fixed::Fixed;
use super::lut::{ACOS, ATAN, COS, SIN, SIN_LEN};

/// Angle units in a quarter turn.
pub const QUARTER: u16 = 0x4000;
/// Angle units in a half turn.
pub const HALF: u16 = 0x8000;

/// Returns the index of the entry at or below angle `a` in a table of
/// `len` entries spanning a full turn.
///
/// Power-of-two lengths take a shift; other lengths a multiply and shift.
#[inline]
const fn index_for(a: u16, len: usize) -> usize {
    if len.is_power_of_two() {
        // 16 - log₂(len); zero for a table of 65536 entries
        (a as usize) >> (16 - len.trailing_zeros())
    } else {
        let i = ((a as u32 * len as u32) >> 16) as usize;
        if i >= len { 0 } else { i }
    }
}

#[inline]
fn index(a: u16) -> usize {
    index_for(a, SIN_LEN)
}

/// Returns the sine of angle `a` in Q1.15.
///
/// # Examples
/// ```
/// use lutra_core::math::trig::sin_u16;
///
/// assert_eq!(sin_u16(0), 0);
/// assert_eq!(sin_u16(0x4000), i16::MAX); // 90°
/// assert_eq!(sin_u16(0xC000), i16::MIN); // 270°
/// ```
#[inline]
pub fn sin_u16(a: u16) -> i16 {
    SIN.get(index(a))
}

/// Returns the cosine of angle `a` in Q1.15.
///
/// # Examples
/// ```
/// use lutra_core::math::trig::cos_u16;
///
/// assert_eq!(cos_u16(0), i16::MAX);
/// assert_eq!(cos_u16(0x4000), 0); // 90°
/// assert_eq!(cos_u16(0x8000), i16::MIN); // 180°
/// ```
#[inline]
pub fn cos_u16(a: u16) -> i16 {
    COS.get(index(a))
}

/// Returns the sine of angle `a` as a fixed-point number.
#[inline]
pub fn sin_q16(a: u16) -> Fixed {
    Fixed::from_bits((sin_u16(a) as i32) << 1)
}

/// Returns the cosine of angle `a` as a fixed-point number.
#[inline]
pub fn cos_q16(a: u16) -> Fixed {
    Fixed::from_bits((cos_u16(a) as i32) << 1)
}

/// Returns the four-quadrant arctangent of `y` and `x` as an angle.
///
/// The result is the angle between the positive x axis and the point
/// (`x`, `y`), counterclockwise, in the range [0, 65536). Only the ratio of
/// the arguments matters, so they may be raw fixed-point values of any
/// scale. Returns zero for (0, 0).
///
/// # Examples
/// ```
/// use lutra_core::math::trig::atan2_u16;
///
/// assert_eq!(atan2_u16(0, 1), 0);
/// assert_eq!(atan2_u16(100, 100), 0x2000); // 45°
/// assert_eq!(atan2_u16(1, 0), 0x4000); // 90°
/// assert_eq!(atan2_u16(0, -1), 0x8000); // 180°
/// assert_eq!(atan2_u16(-1, 0), 0xC000); // 270°
/// ```
pub fn atan2_u16(y: i32, x: i32) -> u16 {
    if x == 0 && y == 0 {
        return 0;
    }
    let (ux, uy) = (x.unsigned_abs() as u64, y.unsigned_abs() as u64);

    // Fold into the first octant, where the ratio is at most one
    let (small, large, steep) = if uy > ux {
        (ux, uy, true)
    } else {
        (uy, ux, false)
    };
    let t = ATAN.get((small * 255 / large) as usize) as u32;
    let t = if steep { QUARTER as u32 - t } else { t };

    let a = match (x < 0, y < 0) {
        (false, false) => t,
        (true, false) => HALF as u32 - t,
        (true, true) => HALF as u32 + t,
        (false, true) => 0x1_0000 - t,
    };
    a as u16
}

/// Returns the arccosine of `x` as an angle in the range [0, 32768].
///
/// Arguments outside [-1, 1] are clamped.
///
/// # Examples
/// ```
/// use lutra_core::math::{Fixed, trig::acos_u16};
///
/// assert_eq!(acos_u16(Fixed::ONE), 0);
/// assert_eq!(acos_u16(Fixed::ZERO), 0x4000);
/// assert_eq!(acos_u16(-Fixed::ONE), 0x8000);
/// ```
pub fn acos_u16(x: Fixed) -> u16 {
    let ux = x.to_bits().unsigned_abs().min(Fixed::ONE.to_bits() as u32);
    let i = (ux * 255 + (1 << 15)) >> 16;
    let a = ACOS.get(i as usize);
    if x.is_negative() { HALF - a } else { a }
}
