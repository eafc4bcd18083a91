//! Angular quantities.

use core::f32::consts::TAU;
use core::fmt::{self, Debug, Display};
use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

use crate::math::approx::ApproxEq;
use crate::math::fixed::Fixed;
use crate::math::float;
use crate::math::trig::{acos_u16, atan2_u16, cos_q16, sin_q16};

//
// Types
//

/// A scalar angular quantity.
///
/// Stored as an unsigned 16-bit integer where 65536 units make one full
/// turn, so addition and subtraction wrap around the circle. Prevents
/// confusion between degrees and radians by requiring the use of one of the
/// named constructors to create an `Angle`, and one of the named getters to
/// obtain its value.
#[derive(Copy, Clone, Default, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Angle(u16);

//
// Free fns and consts
//

/// Returns an angle of `a` radians, wrapped to one turn.
pub fn rads(a: f32) -> Angle {
    turns(a / TAU)
}

/// Returns an angle of `a` degrees, wrapped to one turn.
pub fn degs(a: f32) -> Angle {
    turns(a / 360.0)
}

/// Returns an angle of `a` turns, wrapped to one turn.
///
/// # Examples
/// ```
/// use lutra_core::math::angle::*;
///
/// assert_eq!(turns(0.25), Angle::RIGHT);
/// assert_eq!(turns(-0.25), degs(270.0));
/// assert_eq!(turns(1.5), Angle::STRAIGHT);
/// ```
pub fn turns(a: f32) -> Angle {
    let units = float::f32::rem_euclid(a, 1.0) * UNITS_PER_TURN;
    // Rounding can carry to a full turn, which wraps to zero
    Angle((units + 0.5) as u32 as u16)
}

/// Returns the four-quadrant arctangent of `y` and `x` as an `Angle`.
///
/// # Examples
/// ```
/// use lutra_core::math::{Fixed, angle::*};
///
/// let one = Fixed::ONE;
/// assert_eq!(atan2(Fixed::ZERO, one), Angle::ZERO);
/// assert_eq!(atan2(one, one), degs(45.0));
/// assert_eq!(atan2(one, Fixed::ZERO), degs(90.0));
/// assert_eq!(atan2(-one, Fixed::ZERO), degs(-90.0));
/// ```
pub fn atan2(y: Fixed, x: Fixed) -> Angle {
    Angle(atan2_u16(y.to_bits(), x.to_bits()))
}

/// Returns the arccosine of `x` as an `Angle` in the range [0°, 180°].
///
/// Arguments outside [-1, 1] are clamped.
///
/// # Examples
/// ```
/// use lutra_core::math::{Fixed, angle::*};
///
/// assert_eq!(acos(Fixed::ONE), Angle::ZERO);
/// assert_eq!(acos(Fixed::ZERO), Angle::RIGHT);
/// assert_eq!(acos(-Fixed::ONE), Angle::STRAIGHT);
/// ```
pub fn acos(x: Fixed) -> Angle {
    Angle(acos_u16(x))
}

const UNITS_PER_TURN: f32 = 65536.0;

//
// Inherent impls
//

impl Angle {
    /// A zero degree angle.
    pub const ZERO: Self = Self(0);
    /// A 90 degree angle.
    pub const RIGHT: Self = Self(0x4000);
    /// A 180 degree angle.
    pub const STRAIGHT: Self = Self(0x8000);

    /// Returns an angle of `units` 65536ths of a turn.
    #[inline]
    pub const fn from_units(units: u16) -> Self {
        Self(units)
    }

    /// Returns the value of `self` in 65536ths of a turn.
    #[inline]
    pub const fn to_units(self) -> u16 {
        self.0
    }

    /// Returns the value of `self` in radians, in the range [0, 2𝜋).
    pub fn to_rads(self) -> f32 {
        self.to_turns() * TAU
    }
    /// Returns the value of `self` in degrees, in the range [0, 360).
    /// # Examples
    /// ```
    /// # use lutra_core::math::degs;
    /// assert_eq!(degs(90.0).to_degs(), 90.0);
    /// assert_eq!(degs(-90.0).to_degs(), 270.0);
    /// ```
    pub fn to_degs(self) -> f32 {
        self.to_turns() * 360.0
    }
    /// Returns the value of `self` in turns, in the range [0, 1).
    /// # Examples
    /// ```
    /// # use lutra_core::math::degs;
    /// assert_eq!(degs(180.0).to_turns(), 0.5);
    /// ```
    pub fn to_turns(self) -> f32 {
        self.0 as f32 / UNITS_PER_TURN
    }

    /// Returns the sine of `self`.
    /// # Examples
    /// ```
    /// # use lutra_core::assert_approx_eq;
    /// # use lutra_core::math::{Fixed, angle::*};
    /// assert_approx_eq!(degs(30.0).sin(), Fixed::HALF);
    /// ```
    #[inline]
    pub fn sin(self) -> Fixed {
        sin_q16(self.0)
    }
    /// Returns the cosine of `self`.
    /// # Examples
    /// ```
    /// # use lutra_core::assert_approx_eq;
    /// # use lutra_core::math::{Fixed, angle::*};
    /// assert_approx_eq!(degs(60.0).cos(), Fixed::HALF);
    /// ```
    #[inline]
    pub fn cos(self) -> Fixed {
        cos_q16(self.0)
    }
    /// Simultaneously computes the sine and cosine of `self`.
    #[inline]
    pub fn sin_cos(self) -> (Fixed, Fixed) {
        (self.sin(), self.cos())
    }

    /// Returns half of `self`, in the range [0°, 180°).
    #[inline]
    #[must_use]
    pub const fn half(self) -> Self {
        Self(self.0 >> 1)
    }
}

//
// Local trait impls
//

impl ApproxEq<Self, u16> for Angle {
    /// Returns whether `self` and `other` are at most `eps` units apart,
    /// going the shorter way around the circle.
    fn approx_eq_eps(&self, other: &Self, eps: &u16) -> bool {
        let diff = self.0.wrapping_sub(other.0) as i16;
        diff.unsigned_abs() <= *eps
    }
    fn relative_epsilon() -> u16 {
        // About 0.1°
        16
    }
}

//
// Foreign trait impls
//

impl Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (val, unit) = if f.alternate() {
            (self.to_turns(), " tr")
        } else {
            (self.to_degs(), "°")
        };
        Display::fmt(&val, f)?;
        f.write_str(unit)
    }
}

impl Debug for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Angle(")?;
        Display::fmt(self, f)?;
        f.write_str(")")
    }
}

impl Add for Angle {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }
}
impl Sub for Angle {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }
}
impl Neg for Angle {
    type Output = Self;
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}
impl AddAssign for Angle {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}
impl SubAssign for Angle {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}
