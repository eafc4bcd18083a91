//! Fixed-point vectors.
//!
//! A vector is an array of [`Fixed`] components tagged with the space it
//! belongs to. Products of components are accumulated in 64 bits and
//! shifted back to Q16.16 once per result component.

use core::array;
use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData;
use core::ops::{Add, Index, Mul, Neg, Sub};

use crate::math::angle::Angle;
use crate::math::approx::ApproxEq;
use crate::math::fixed::Fixed;
use crate::math::space::{Affine, Linear, Real};

//
// Types
//

/// A generic vector type. Represents an element of a vector space, or a
/// point in an affine space, parameterized by the representation `Repr`
/// and the space `Space`.
#[repr(transparent)]
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct Vector<Repr, Space = ()>(pub Repr, PhantomData<Space>);

/// A 3-vector with fixed-point components in basis `B`.
pub type Vec3<B = ()> = Vector<[Fixed; 3], Real<3, B>>;

/// A 4-vector with fixed-point components in basis `B`.
///
/// Used as homogeneous coordinates for 3-D points.
pub type Vec4<B = ()> = Vector<[Fixed; 4], Real<4, B>>;

//
// Free fns
//

/// Returns a 3-vector with components `x`, `y`, and `z`.
///
/// # Examples
/// ```
/// use lutra_core::math::{Fixed, vec3};
///
/// let v = vec3(Fixed::ONE, Fixed::HALF, -Fixed::ONE);
/// assert_eq!(v.y(), Fixed::HALF);
/// ```
#[inline]
pub const fn vec3(x: Fixed, y: Fixed, z: Fixed) -> Vec3 {
    Vector([x, y, z], PhantomData)
}

/// Returns a 4-vector with components `x`, `y`, `z`, and `w`.
#[inline]
pub const fn vec4(x: Fixed, y: Fixed, z: Fixed, w: Fixed) -> Vec4 {
    Vector([x, y, z, w], PhantomData)
}

/// Returns a vector with all components equal to `s`.
///
/// # Examples
/// ```
/// use lutra_core::math::{Fixed, Vec3, splat};
///
/// let v: Vec3 = splat(Fixed::ONE);
/// assert_eq!(v.0, [Fixed::ONE; 3]);
/// ```
#[inline]
pub fn splat<Sp, const N: usize>(s: Fixed) -> Vector<[Fixed; N], Sp> {
    [s; N].into()
}

//
// Inherent impls
//

impl<Sp, const N: usize> Vector<[Fixed; N], Sp> {
    /// Returns a vector with the given components.
    #[inline]
    pub const fn new(els: [Fixed; N]) -> Self {
        Self(els, PhantomData)
    }

    /// Returns the dot product of `self` and `other`.
    ///
    /// The products are summed at full precision before shifting back,
    /// so the result is rounded once.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::math::{Fixed, vec3};
    ///
    /// let f = Fixed::from_int;
    /// let v = vec3(f(1), f(2), f(3));
    /// assert_eq!(v.dot(&vec3(f(4), f(-5), f(6))), f(12));
    /// ```
    pub fn dot(&self, other: &Self) -> Fixed {
        let mut acc = 0i64;
        for i in 0..N {
            let p = self.0[i].to_bits() as i64 * other.0[i].to_bits() as i64;
            acc = acc.saturating_add(p);
        }
        Fixed::from_wide(acc)
    }

    /// Returns the length of `self`, squared.
    #[inline]
    pub fn len_sqr(&self) -> Fixed {
        self.dot(self)
    }

    /// Returns the approximate length of `self`.
    ///
    /// Computed as *d* / √*d* where *d* is the squared length, using
    /// [`Fixed::recip_sqrt`]. Saturates if the squared length exceeds
    /// [`Fixed::MAX`], that is, for lengths greater than about 181.
    #[inline]
    pub fn len(&self) -> Fixed {
        let d = self.len_sqr();
        d * d.recip_sqrt()
    }

    /// Returns `self` scaled to approximately unit length.
    ///
    /// Returns `self` unchanged if its squared length is zero.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::assert_approx_eq;
    /// use lutra_core::math::{Fixed, vec3};
    ///
    /// let v = vec3(Fixed::from_int(3), Fixed::ZERO, Fixed::from_int(4));
    /// assert_approx_eq!(v.normalize().len(), Fixed::ONE, eps = 0.02);
    /// ```
    #[must_use]
    pub fn normalize(&self) -> Self {
        let d = self.len_sqr();
        if d <= Fixed::ZERO {
            return Self::new(self.0);
        }
        let r = d.recip_sqrt();
        Self::new(self.0.map(|c| c * r))
    }

    /// Returns the approximate Euclidean distance between `self` and
    /// `other`.
    #[inline]
    pub fn distance(&self, other: &Self) -> Fixed {
        Self::new(array::from_fn(|i| self.0[i] - other.0[i])).len()
    }
}

impl<B> Vec3<B> {
    /// Returns the x component of `self`.
    #[inline]
    pub const fn x(&self) -> Fixed {
        self.0[0]
    }
    /// Returns the y component of `self`.
    #[inline]
    pub const fn y(&self) -> Fixed {
        self.0[1]
    }
    /// Returns the z component of `self`.
    #[inline]
    pub const fn z(&self) -> Fixed {
        self.0[2]
    }

    /// Returns the cross product of `self` and `other`.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::math::{Fixed, vec3};
    ///
    /// let (o, i) = (Fixed::ZERO, Fixed::ONE);
    /// assert_eq!(vec3(i, o, o).cross(&vec3(o, i, o)), vec3(o, o, i));
    /// ```
    pub fn cross(&self, other: &Self) -> Self {
        let [a, b] = [self.0, other.0].map(|v| v.map(|c| c.to_bits() as i64));
        let x = a[1] * b[2] - a[2] * b[1];
        let y = a[2] * b[0] - a[0] * b[2];
        let z = a[0] * b[1] - a[1] * b[0];
        Self::new([x, y, z].map(Fixed::from_wide))
    }

    /// Returns `self` rotated by `a` about the x axis.
    #[must_use]
    pub fn rotate_x(&self, a: Angle) -> Self {
        let (y, z) = rotate(self.y(), self.z(), a);
        Self::new([self.x(), y, z])
    }
    /// Returns `self` rotated by `a` about the y axis.
    #[must_use]
    pub fn rotate_y(&self, a: Angle) -> Self {
        let (z, x) = rotate(self.z(), self.x(), a);
        Self::new([x, self.y(), z])
    }
    /// Returns `self` rotated by `a` about the z axis.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::assert_approx_eq;
    /// use lutra_core::math::{Fixed, degs, vec3};
    ///
    /// let (o, i) = (Fixed::ZERO, Fixed::ONE);
    /// assert_approx_eq!(vec3(i, o, o).rotate_z(degs(90.0)), vec3(o, i, o));
    /// ```
    #[must_use]
    pub fn rotate_z(&self, a: Angle) -> Self {
        let (x, y) = rotate(self.x(), self.y(), a);
        Self::new([x, y, self.z()])
    }

    /// Returns `self` extended with a fourth component `w`.
    #[inline]
    pub const fn to_vec4(&self, w: Fixed) -> Vec4<B> {
        let [x, y, z] = self.0;
        Vector([x, y, z, w], PhantomData)
    }
}

impl<B> Vec4<B> {
    /// Returns the x component of `self`.
    #[inline]
    pub const fn x(&self) -> Fixed {
        self.0[0]
    }
    /// Returns the y component of `self`.
    #[inline]
    pub const fn y(&self) -> Fixed {
        self.0[1]
    }
    /// Returns the z component of `self`.
    #[inline]
    pub const fn z(&self) -> Fixed {
        self.0[2]
    }
    /// Returns the w component of `self`.
    #[inline]
    pub const fn w(&self) -> Fixed {
        self.0[3]
    }

    /// Returns the x, y, and z components of `self`, dropping w.
    #[inline]
    pub const fn to_vec3(&self) -> Vec3<B> {
        let [x, y, z, _] = self.0;
        Vector([x, y, z], PhantomData)
    }
}

/// Rotates the pair (u, v) counterclockwise by `a` in the uv plane.
fn rotate(u: Fixed, v: Fixed, a: Angle) -> (Fixed, Fixed) {
    let (s, c) = a.sin_cos();
    let [u, v, s, c] = [u, v, s, c].map(|x| x.to_bits() as i64);
    (Fixed::from_wide(u * c - v * s), Fixed::from_wide(u * s + v * c))
}

//
// Local trait impls
//

impl<Sp, const N: usize> Affine for Vector<[Fixed; N], Sp> {
    type Space = Sp;
    type Diff = Self;
    const DIM: usize = N;

    #[inline]
    fn add(&self, other: &Self) -> Self {
        Self::new(array::from_fn(|i| self.0[i] + other.0[i]))
    }
    #[inline]
    fn sub(&self, other: &Self) -> Self {
        Self::new(array::from_fn(|i| self.0[i] - other.0[i]))
    }
}

impl<Sp, const N: usize> Linear for Vector<[Fixed; N], Sp> {
    type Scalar = Fixed;

    #[inline]
    fn zero() -> Self {
        Self::new([Fixed::ZERO; N])
    }
    #[inline]
    fn neg(&self) -> Self {
        Self::new(self.0.map(|c| -c))
    }
    #[inline]
    fn mul(&self, scalar: Fixed) -> Self {
        Self::new(self.0.map(|c| c * scalar))
    }
}

impl<Sp, const N: usize> ApproxEq<Self, f32> for Vector<[Fixed; N], Sp> {
    fn approx_eq_eps(&self, other: &Self, eps: &f32) -> bool {
        self.0.approx_eq_eps(&other.0, eps)
    }
    fn relative_epsilon() -> f32 {
        Fixed::relative_epsilon()
    }
}

//
// Foreign trait impls
//

impl<Sc: Debug, Sp: Debug + Default, const N: usize> Debug
    for Vector<[Sc; N], Sp>
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Vec<{:?}>{:?}", Sp::default(), self.0)
    }
}

impl<Repr, Space> From<Repr> for Vector<Repr, Space> {
    #[inline]
    fn from(els: Repr) -> Self {
        Self(els, PhantomData)
    }
}

impl<Sc, Sp, const N: usize> Index<usize> for Vector<[Sc; N], Sp> {
    type Output = Sc;

    #[inline]
    fn index(&self, i: usize) -> &Sc {
        &self.0[i]
    }
}

impl<Sp, const N: usize> Add for Vector<[Fixed; N], Sp> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Affine::add(&self, &rhs)
    }
}

impl<Sp, const N: usize> Sub for Vector<[Fixed; N], Sp> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Affine::sub(&self, &rhs)
    }
}

impl<Sp, const N: usize> Neg for Vector<[Fixed; N], Sp> {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Linear::neg(&self)
    }
}

impl<Sp, const N: usize> Mul<Fixed> for Vector<[Fixed; N], Sp> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: Fixed) -> Self {
        Linear::mul(&self, rhs)
    }
}
