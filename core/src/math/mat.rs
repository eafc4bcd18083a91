//! Matrices and linear transforms.
//!
//! Matrices are stored in row-major order and act on column vectors, so
//! `A.compose(&B)` is the product *AB* and applies *B* first. Every entry of
//! a product is a sum of raw 64-bit products shifted back to Q16.16 once.

use core::fmt::{self, Debug, Formatter};
use core::marker::PhantomData;
use core::ops::Range;

use crate::math::angle::Angle;
use crate::math::approx::ApproxEq;
use crate::math::fixed::Fixed;
use crate::math::space::Real;
use crate::math::vec::{Vec3, Vec4, Vector};

//
// Types
//

/// A linear map between two spaces.
pub trait LinearMap {
    /// The source space of the map.
    type Source;
    /// The destination space of the map.
    type Dest;
}

/// Tag type for maps from the `DIM`-dimensional real space in basis `Src`
/// to the same-dimensional real space in basis `Dst`.
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct RealToReal<const DIM: usize, Src = (), Dst = ()>(
    PhantomData<(Src, Dst)>,
);

/// Tag type for maps from 3-space in basis `Src` to homogeneous
/// projective space, such as perspective projections.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct RealToProj<Src = ()>(PhantomData<Src>);

/// A generic matrix type, parameterized by the representation `Repr` and
/// the linear map `Map` it stands for.
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq)]
pub struct Matrix<Repr, Map>(pub Repr, PhantomData<Map>);

/// A 3×3 fixed-point matrix, by default a linear map of 3-space.
pub type Mat3<Map = RealToReal<3>> = Matrix<[[Fixed; 3]; 3], Map>;

/// A 4×4 fixed-point matrix, by default an affine map of 3-space in
/// homogeneous coordinates.
pub type Mat4<Map = RealToReal<3>> = Matrix<[[Fixed; 4]; 4], Map>;

//
// Inherent impls
//

impl<M, const N: usize> Matrix<[[Fixed; N]; N], M> {
    /// Returns a matrix with the given rows.
    #[inline]
    pub const fn new(els: [[Fixed; N]; N]) -> Self {
        Self(els, PhantomData)
    }

    /// Returns the N×N identity matrix.
    pub fn identity() -> Self {
        let mut els = [[Fixed::ZERO; N]; N];
        for (i, row) in els.iter_mut().enumerate() {
            row[i] = Fixed::ONE;
        }
        Self::new(els)
    }

    /// Returns the row at index `i`.
    #[inline]
    pub fn row(&self, i: usize) -> &[Fixed; N] {
        &self.0[i]
    }

    /// Returns the column at index `i`.
    #[inline]
    pub fn col(&self, i: usize) -> [Fixed; N] {
        self.0.map(|row| row[i])
    }

    /// Returns the transpose of `self`, with the direction of the map
    /// left unchanged.
    #[must_use]
    pub fn transpose(&self) -> Self {
        let mut els = self.0;
        for (i, row) in els.iter_mut().enumerate() {
            *row = self.col(i);
        }
        Self::new(els)
    }

    /// Returns `self` reinterpreted as a different map.
    #[inline]
    pub fn to<N2>(&self) -> Matrix<[[Fixed; N]; N], N2> {
        Matrix::new(self.0)
    }

    /// Returns the product of `self` and `other`, with a map type chosen
    /// by the caller.
    fn mul_raw<M2>(&self, other: &Self) -> Matrix<[[Fixed; N]; N], M2> {
        let mut els = [[Fixed::ZERO; N]; N];
        for (i, row) in els.iter_mut().enumerate() {
            for (j, e) in row.iter_mut().enumerate() {
                *e = Fixed::from_wide(dot_wide(&self.0[i], &other.col(j)));
            }
        }
        Matrix::new(els)
    }
}

impl<S, D, const N: usize> Matrix<[[Fixed; N]; N], RealToReal<3, S, D>> {
    /// Returns the composition of `self` and `other`, a map that applies
    /// `other` first, then `self`.
    ///
    /// This is the matrix product `self` × `other`.
    pub fn compose<T>(
        &self,
        other: &Matrix<[[Fixed; N]; N], RealToReal<3, T, S>>,
    ) -> Matrix<[[Fixed; N]; N], RealToReal<3, T, D>> {
        self.mul_raw(&other.to())
    }

    /// Returns the composition of `self` and `other`, a map that applies
    /// `self` first, then `other`.
    ///
    /// This is the matrix product `other` × `self`.
    pub fn then<U>(
        &self,
        other: &Matrix<[[Fixed; N]; N], RealToReal<3, D, U>>,
    ) -> Matrix<[[Fixed; N]; N], RealToReal<3, S, U>> {
        other.compose(self)
    }
}

impl<M> Mat3<M> {
    /// Returns a matrix that rotates by `a` about the x axis.
    pub fn rotate_x(a: Angle) -> Self {
        Self::new(rotation(0, a))
    }
    /// Returns a matrix that rotates by `a` about the y axis.
    pub fn rotate_y(a: Angle) -> Self {
        Self::new(rotation(1, a))
    }
    /// Returns a matrix that rotates by `a` about the z axis.
    pub fn rotate_z(a: Angle) -> Self {
        Self::new(rotation(2, a))
    }
}

impl<S, D> Mat3<RealToReal<3, S, D>> {
    /// Returns the matrix that rotates first by `ax` about the x axis, then
    /// by `ay` about the y axis, and finally by `az` about the z axis.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::assert_approx_eq;
    /// use lutra_core::math::{Fixed, Mat3, degs, vec3};
    ///
    /// let (o, i) = (Fixed::ZERO, Fixed::ONE);
    /// let m: Mat3 = Mat3::rotation_euler(degs(90.0), degs(90.0), degs(0.0));
    /// // y rotates to z about x, then z rotates to x about y
    /// assert_approx_eq!(m.apply(&vec3(o, i, o)), vec3(i, o, o));
    /// ```
    pub fn rotation_euler(ax: Angle, ay: Angle, az: Angle) -> Self {
        let x: Mat3<RealToReal<3, S, S>> = Mat3::rotate_x(ax);
        let y: Mat3<RealToReal<3, S, S>> = Mat3::rotate_y(ay);
        let z: Mat3<RealToReal<3, S, D>> = Mat3::rotate_z(az);
        z.compose(&y.compose(&x))
    }

    /// Returns the image of `v` under `self`.
    pub fn apply(&self, v: &Vec3<S>) -> Vec3<D> {
        Vector::new(self.0.map(|row| Fixed::from_wide(dot_wide(&row, &v.0))))
    }
}

impl<M> Mat4<M> {
    /// Returns a matrix that translates by `t`.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::math::{Fixed, Mat4, vec3};
    ///
    /// let f = Fixed::from_int;
    /// let m: Mat4 = Mat4::translate(vec3(f(1), f(2), f(3)));
    /// assert_eq!(m.apply(&vec3(f(0), f(5), f(-3))), vec3(f(1), f(7), f(0)));
    /// ```
    pub fn translate(t: Vec3) -> Self {
        let mut els = Self::identity().0;
        for i in 0..3 {
            els[i][3] = t[i];
        }
        Self::new(els)
    }

    /// Returns a matrix that scales each axis by the corresponding
    /// component of `s`.
    pub fn scale(s: Vec3) -> Self {
        let mut els = Self::identity().0;
        for i in 0..3 {
            els[i][i] = s[i];
        }
        Self::new(els)
    }

    /// Returns a matrix that rotates by `a` about the x axis.
    pub fn rotate_x(a: Angle) -> Self {
        Self::new(embed(rotation(0, a)))
    }
    /// Returns a matrix that rotates by `a` about the y axis.
    pub fn rotate_y(a: Angle) -> Self {
        Self::new(embed(rotation(1, a)))
    }
    /// Returns a matrix that rotates by `a` about the z axis.
    pub fn rotate_z(a: Angle) -> Self {
        Self::new(embed(rotation(2, a)))
    }
}

impl<M> From<Mat3<M>> for Mat4<M> {
    /// Embeds a linear map of 3-space into a 4×4 matrix.
    fn from(m: Mat3<M>) -> Self {
        Self::new(embed(m.0))
    }
}

impl<S, D> Mat4<RealToReal<3, S, D>> {
    /// Returns the image of the point `v` under `self`.
    ///
    /// `v` is extended with w = 1, and the w component of the result is
    /// dropped.
    pub fn apply(&self, v: &Vec3<S>) -> Vec3<D> {
        let v = v.to_vec4(Fixed::ONE);
        let row = |i: usize| Fixed::from_wide(dot_wide(&self.0[i], &v.0));
        Vector::new([row(0), row(1), row(2)])
    }

    /// Returns the image of the homogeneous vector `v` under `self`.
    pub fn apply4(&self, v: &Vec4<S>) -> Vec4<D> {
        Vector::new(self.0.map(|row| Fixed::from_wide(dot_wide(&row, &v.0))))
    }

    /// Returns the inverse of `self`, assuming that `self` is a rigid
    /// transform: a rotation followed by a translation.
    ///
    /// The rotation block is transposed and the translation *t* replaced
    /// by -R<sup>T</sup>*t*. If `self` contains scaling, skew, or a
    /// projection, the result is meaningless.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::assert_approx_eq;
    /// use lutra_core::math::{Fixed, Mat4, degs, vec3};
    ///
    /// let r: Mat4 = Mat4::rotate_y(degs(30.0));
    /// let (o, i) = (Fixed::ZERO, Fixed::ONE);
    /// let t: Mat4 = Mat4::translate(vec3(i, o, Fixed::HALF));
    /// let m = r.then(&t);
    /// assert_approx_eq!(m.then(&m.inverse_affine_rot()), Mat4::identity());
    /// ```
    pub fn inverse_affine_rot(&self) -> Mat4<RealToReal<3, D, S>> {
        debug_assert!(
            self.0[3] == [Fixed::ZERO, Fixed::ZERO, Fixed::ZERO, Fixed::ONE],
            "not an affine matrix"
        );
        let mut els = [[Fixed::ZERO; 4]; 4];
        for i in 0..3 {
            for j in 0..3 {
                els[i][j] = self.0[j][i];
            }
        }
        let t = [0, 1, 2].map(|i| self.0[i][3]);
        for i in 0..3 {
            let r = [els[i][0], els[i][1], els[i][2]];
            els[i][3] = -Fixed::from_wide(dot_wide(&r, &t));
        }
        els[3][3] = Fixed::ONE;
        Matrix::new(els)
    }
}

impl<S> Mat4<RealToProj<S>> {
    /// Returns a perspective projection matrix.
    ///
    /// `focal_ratio` is the ratio of the focal length to half the width of
    /// the viewport, `aspect_ratio` the ratio of the viewport width to its
    /// height. Points at depth `near_far.start` map to z = -1 and points at
    /// `near_far.end` to z = 1 after division by w.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::assert_approx_eq;
    /// use lutra_core::math::{Fixed, Mat4, mat::RealToProj, vec3};
    ///
    /// let f = Fixed::from_int;
    /// let m: Mat4<RealToProj> = Mat4::perspective(f(1), f(1), f(1)..f(10));
    /// let p = m.apply(&vec3(f(1), f(1), f(1)));
    /// assert_approx_eq!(p.z(), -p.w());
    /// ```
    pub fn perspective(
        focal_ratio: Fixed,
        aspect_ratio: Fixed,
        near_far: Range<Fixed>,
    ) -> Self {
        let Range { start: near, end: far } = near_far;
        debug_assert!(
            Fixed::ZERO < near && near < far,
            "invalid depth range {near:?}..{far:?}"
        );
        debug_assert!(
            focal_ratio > Fixed::ZERO,
            "focal ratio must be positive, was {focal_ratio:?}"
        );
        let (o, i) = (Fixed::ZERO, Fixed::ONE);
        let x = focal_ratio;
        let y = aspect_ratio * focal_ratio;
        let z = (far + near) / (far - near);
        let w = Fixed::from_int(2) * far * near / (near - far);
        Self::new([
            [x, o, o, o],
            [o, y, o, o],
            [o, o, z, w],
            [o, o, i, o],
        ])
    }

    /// Returns the image of the point `v` in homogeneous coordinates.
    pub fn apply(&self, v: &Vec3<S>) -> Vec4 {
        let v = v.to_vec4(Fixed::ONE);
        Vector::new(self.0.map(|row| Fixed::from_wide(dot_wide(&row, &v.0))))
    }

    /// Returns the composition of `self` and `other`, a map that applies
    /// `other` first, then the projection.
    pub fn compose<T>(
        &self,
        other: &Mat4<RealToReal<3, T, S>>,
    ) -> Mat4<RealToProj<T>> {
        self.mul_raw(&other.to())
    }
}

/// Returns the sum of the raw products of `a` and `b` without shifting.
fn dot_wide<const N: usize>(a: &[Fixed; N], b: &[Fixed; N]) -> i64 {
    let mut acc = 0i64;
    for (x, y) in a.iter().zip(b) {
        acc = acc.saturating_add(x.to_bits() as i64 * y.to_bits() as i64);
    }
    acc
}

/// Returns the rotation matrix of `a` about the coordinate axis `axis`.
fn rotation(axis: usize, a: Angle) -> [[Fixed; 3]; 3] {
    let (s, c) = a.sin_cos();
    let (j, k) = ((axis + 1) % 3, (axis + 2) % 3);
    let mut els = [[Fixed::ZERO; 3]; 3];
    els[axis][axis] = Fixed::ONE;
    els[j][j] = c;
    els[j][k] = -s;
    els[k][j] = s;
    els[k][k] = c;
    els
}

fn embed(m: [[Fixed; 3]; 3]) -> [[Fixed; 4]; 4] {
    let mut els = [[Fixed::ZERO; 4]; 4];
    for i in 0..3 {
        els[i][..3].copy_from_slice(&m[i]);
    }
    els[3][3] = Fixed::ONE;
    els
}

//
// Local trait impls
//

impl<const DIM: usize, S, D> LinearMap for RealToReal<DIM, S, D> {
    type Source = Real<DIM, S>;
    type Dest = Real<DIM, D>;
}

impl<S> LinearMap for RealToProj<S> {
    type Source = Real<3, S>;
    type Dest = Real<4>;
}

impl<M, const N: usize> ApproxEq<Self, f32> for Matrix<[[Fixed; N]; N], M> {
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

impl<M: Debug + Default, const N: usize> Debug for Matrix<[[Fixed; N]; N], M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix<{:?}>[", M::default())?;
        for row in &self.0 {
            f.write_str("    [")?;
            for (j, e) in row.iter().enumerate() {
                if j > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{e:6.2}")?;
            }
            f.write_str("]\n")?;
        }
        f.write_str("]")
    }
}

impl<const DIM: usize, S, D> Debug for RealToReal<DIM, S, D>
where
    S: Debug + Default,
    D: Debug + Default,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}->{:?}", S::default(), D::default())
    }
}

impl<M, const N: usize> From<[[Fixed; N]; N]> for Matrix<[[Fixed; N]; N], M> {
    fn from(els: [[Fixed; N]; N]) -> Self {
        Self::new(els)
    }
}
