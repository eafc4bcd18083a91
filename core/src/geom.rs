//! Basic geometric primitives.
//!
//! Rays, spheres and planes over fixed-point [vectors][Vec3], tagged with
//! the basis they are expressed in. Intersection tests between them live in
//! the `lutra-geom` crate.

use core::fmt::{self, Debug, Formatter};

use crate::math::approx::ApproxEq;
use crate::math::fixed::Fixed;
use crate::math::space::{Affine, Linear};
use crate::math::vec::Vec3;

/// A ray, or a half-line, consisting of a starting point and a direction.
///
/// The direction need not be of unit length; the parameter *t* of a point
/// on the ray is measured in multiples of the direction vector.
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct Ray<B = ()>(pub Vec3<B>, pub Vec3<B>);

/// A sphere given by its center and radius.
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct Sphere<B = ()> {
    pub center: Vec3<B>,
    pub radius: Fixed,
}

/// A plane in three dimensions.
///
/// Consists of the points *p* that satisfy **n** · *p* = *d*, where **n**
/// is the normal vector of the plane and *d* its signed offset from the
/// origin along the normal.
#[derive(Copy, Clone, Default, Eq, PartialEq)]
pub struct Plane<B = ()> {
    normal: Vec3<B>,
    offset: Fixed,
}

impl<B> Ray<B> {
    /// Returns the starting point of `self`.
    #[inline]
    pub fn orig(&self) -> Vec3<B> {
        Vec3::new(self.0.0)
    }

    /// Returns the direction of `self`.
    #[inline]
    pub fn dir(&self) -> Vec3<B> {
        Vec3::new(self.1.0)
    }

    /// Returns the point at parameter `t` along `self`.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::geom::Ray;
    /// use lutra_core::math::{Fixed, vec3};
    ///
    /// let f = Fixed::from_int;
    /// let ray = Ray(vec3(f(1), f(0), f(0)), vec3(f(0), f(2), f(0)));
    /// assert_eq!(ray.at(Fixed::HALF), vec3(f(1), f(1), f(0)));
    /// ```
    #[inline]
    pub fn at(&self, t: Fixed) -> Vec3<B> {
        self.0.add(&self.1.mul(t))
    }
}

impl<B> Sphere<B> {
    /// Returns a sphere with the given center and radius.
    #[inline]
    pub const fn new(center: Vec3<B>, radius: Fixed) -> Self {
        Self { center, radius }
    }

    /// Returns whether `pt` is inside or on the surface of `self`.
    pub fn contains(&self, pt: &Vec3<B>) -> bool {
        let d = pt.sub(&self.center);
        d.len_sqr() <= self.radius * self.radius
    }
}

impl<B> Plane<B> {
    /// Creates a plane with normal `normal` and offset `offset`.
    ///
    /// The normal is normalized to approximately unit length, so that
    /// [`signed_dist`][Self::signed_dist] returns a true distance.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::geom::Plane;
    /// use lutra_core::math::{Fixed, vec3};
    ///
    /// let (o, f) = (Fixed::ZERO, Fixed::from_int);
    /// let p = <Plane>::new(vec3(o, f(1), o), f(2));
    /// assert_eq!(p.signed_dist(&vec3(f(5), f(3), f(-1))), f(1));
    /// ```
    pub fn new(normal: Vec3<B>, offset: Fixed) -> Self {
        Self { normal: normal.normalize(), offset }
    }

    /// Creates a plane passing through `pt` with normal `normal`.
    pub fn from_point_normal(pt: &Vec3<B>, normal: Vec3<B>) -> Self {
        let normal = normal.normalize();
        let offset = normal.dot(pt);
        Self { normal, offset }
    }

    /// Returns the unit normal of `self`.
    #[inline]
    pub fn normal(&self) -> Vec3<B> {
        Vec3::new(self.normal.0)
    }

    /// Returns the signed offset of `self` from the origin.
    #[inline]
    pub fn offset(&self) -> Fixed {
        self.offset
    }

    /// Returns the signed distance of `pt` from `self`.
    ///
    /// The distance is positive on the side the normal points to.
    #[inline]
    pub fn signed_dist(&self, pt: &Vec3<B>) -> Fixed {
        self.normal.dot(pt) - self.offset
    }
}

//
// Foreign trait impls
//

impl<B: Debug + Default> Debug for Ray<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Ray").field(&self.0).field(&self.1).finish()
    }
}

impl<B: Debug + Default> Debug for Sphere<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sphere")
            .field("center", &self.center)
            .field("radius", &self.radius)
            .finish()
    }
}

impl<B: Debug + Default> Debug for Plane<B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Plane")
            .field("normal", &self.normal)
            .field("offset", &self.offset)
            .finish()
    }
}

impl<B> ApproxEq<Self, f32> for Plane<B> {
    fn approx_eq_eps(&self, other: &Self, eps: &f32) -> bool {
        self.normal.approx_eq_eps(&other.normal, eps)
            && self.offset.approx_eq_eps(&other.offset, eps)
    }
    fn relative_epsilon() -> f32 {
        Fixed::relative_epsilon()
    }
}
