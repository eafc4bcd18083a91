use lutra_core::geom::{Plane, Ray, Sphere};
use lutra_core::math::log::{exp2_q8, log2_q8};
use lutra_core::math::{Fixed, Vec3, space::Affine};

/// Trait for testing whether `Self` and `T` intersect.
pub trait Intersect<T> {
    type Result;

    fn intersect(&self, other: &T) -> Self::Result;
}

/// The result of a ray intersection test: the parameter *t* of the
/// nearest hit and the point at *t*, or `None` if there is no hit.
pub type RayIntersect<B> = Option<(Fixed, Vec3<B>)>;

/// Threshold below which a ray is considered parallel to a plane.
///
/// Compared against the dot product of the ray direction and the unit
/// plane normal.
pub const PARALLEL_EPSILON: Fixed = Fixed::from_bits(16);

impl<B> Intersect<Sphere<B>> for Ray<B> {
    type Result = RayIntersect<B>;

    /// Returns the nearest intersection of `self` with the surface of `s`.
    ///
    /// If the ray starts inside the sphere, returns the point where it
    /// exits. The quadratic is solved in 128-bit integers, so whether the
    /// ray hits is decided exactly for any coordinates representable as
    /// [`Fixed`].
    ///
    /// # Examples
    /// ```
    /// use lutra_core::geom::{Ray, Sphere};
    /// use lutra_core::math::{Fixed, vec3};
    /// use lutra_geom::Intersect;
    ///
    /// let (o, f) = (Fixed::ZERO, Fixed::from_int);
    /// let ray = Ray(vec3(o, o, o), vec3(o, o, f(1)));
    /// let sphere = Sphere::new(vec3(o, o, f(10)), f(3));
    ///
    /// let (t, pt) = ray.intersect(&sphere).unwrap();
    /// assert_eq!(t, f(7));
    /// assert_eq!(pt, vec3(o, o, f(7)));
    /// ```
    fn intersect(&self, s: &Sphere<B>) -> Self::Result {
        let Self(orig, dir) = self;

        // Substituting o + td into |p - c|² = r² gives at² + 2bt + c = 0.
        // The coefficients are in Q32.32, shifted right by GUARD_BITS.
        let oc = orig.sub(&s.center);
        let a = dot_wide(dir, dir) >> GUARD_BITS;
        if a == 0 {
            // Zero or vanishingly short direction vector
            return None;
        }
        let b = dot_wide(&oc, dir) >> GUARD_BITS;
        let r = s.radius.to_bits() as i128;
        let c = (dot_wide(&oc, &oc) - r * r) >> GUARD_BITS;

        let disc = b * b - a * c;
        if disc < 0 {
            // Ray line misses the sphere entirely
            return None;
        }
        let sq = sqrt_wide(disc as u128) as i128;

        let near = -b - sq;
        let num = if near >= 0 {
            near
        } else {
            // Either the origin is inside the sphere, or the sphere
            // is entirely behind the origin
            let far = -b + sq;
            if far < 0 {
                return None;
            }
            far
        };
        let t = (num << Fixed::FRAC_BITS) / a;
        let t = Fixed::from_bits(t.min(i32::MAX as i128) as i32);
        Some((t, self.at(t)))
    }
}

/// Right shift applied to the quadratic coefficients, so that the
/// discriminant of any `Fixed` inputs fits in an `i128`.
const GUARD_BITS: u32 = 2;

/// Returns the dot product of `u` and `v` in Q32.32, without rounding.
fn dot_wide<B>(u: &Vec3<B>, v: &Vec3<B>) -> i128 {
    (0..3)
        .map(|i| u[i].to_bits() as i128 * v[i].to_bits() as i128)
        .sum()
}

/// Returns the approximate square root of `x`.
///
/// Shifts `x` right by an even amount until it fits in 32 bits, takes the
/// root in the log domain, and shifts back by half the amount.
fn sqrt_wide(x: u128) -> u128 {
    if x == 0 {
        return 0;
    }
    let bits = u128::BITS - x.leading_zeros();
    let k = bits.saturating_sub(32).next_multiple_of(2);
    let l = log2_q8((x >> k) as u32).half();
    (exp2_q8(l) as u128) << (k / 2)
}

impl<B> Intersect<Plane<B>> for Ray<B> {
    type Result = RayIntersect<B>;

    /// Returns the intersection of `self` with `p`.
    ///
    /// Returns `None` if the ray is parallel or nearly parallel to the
    /// plane, or if the plane is behind the ray origin.
    ///
    /// # Examples
    /// ```
    /// use lutra_core::geom::{Plane, Ray};
    /// use lutra_core::math::{Fixed, vec3};
    /// use lutra_geom::Intersect;
    ///
    /// let (o, f) = (Fixed::ZERO, Fixed::from_int);
    /// let floor = Plane::new(vec3(o, f(1), o), f(-2));
    ///
    /// let down = Ray(vec3(f(1), f(3), o), vec3(o, f(-1), o));
    /// let hit = down.intersect(&floor);
    /// assert_eq!(hit, Some((f(5), vec3(f(1), f(-2), o))));
    ///
    /// let up = Ray(vec3(f(1), f(3), o), vec3(o, f(1), o));
    /// assert_eq!(up.intersect(&floor), None);
    /// ```
    fn intersect(&self, p: &Plane<B>) -> Self::Result {
        let Self(orig, dir) = self;

        let denom = p.normal().dot(dir);
        if denom.abs() < PARALLEL_EPSILON {
            // Ray parallel with the plane, or dir is a zero vector
            return None;
        }
        let num = -p.signed_dist(orig);

        let t = num / denom;
        if t.is_negative() {
            // Intersection behind the ray origin
            return None;
        }
        Some((t, self.at(t)))
    }
}

#[cfg(test)]
mod tests {
    use lutra_core::assert_approx_eq;
    use lutra_core::math::vec3;

    use super::*;

    const O: Fixed = Fixed::ZERO;
    const I: Fixed = Fixed::ONE;

    fn f(x: i32) -> Fixed {
        Fixed::from_int(x)
    }

    fn sphere() -> Sphere {
        Sphere::new(vec3(O, O, f(10)), f(3))
    }

    mod ray_sphere {
        use super::*;

        #[test]
        fn through_center() {
            let ray = Ray(vec3(O, O, O), vec3(O, O, I));
            let (t, pt) = ray.intersect(&sphere()).unwrap();
            assert_approx_eq!(t, f(7));
            assert_approx_eq!(pt, vec3(O, O, f(7)));
        }

        #[test]
        fn non_unit_direction() {
            let ray = Ray(vec3(O, O, O), vec3(O, O, f(2)));
            let (t, pt) = ray.intersect(&sphere()).unwrap();
            assert_approx_eq!(t, Fixed::from_f32(3.5));
            assert_approx_eq!(pt, vec3(O, O, f(7)));
        }

        #[test]
        fn off_center() {
            let ray = Ray(vec3(f(2), O, O), vec3(O, O, I));
            let (t, pt) = ray.intersect(&sphere()).unwrap();
            // Hits where z = 10 - √5
            assert_approx_eq!(t, Fixed::from_f32(7.763932), eps = 0.01);
            assert_approx_eq!(pt, vec3(f(2), O, t));
        }

        #[test]
        fn miss() {
            let ray = Ray(vec3(f(4), O, O), vec3(O, O, I));
            assert_eq!(ray.intersect(&sphere()), None);

            let ray = Ray(vec3(O, O, O), vec3(I, O, O));
            assert_eq!(ray.intersect(&sphere()), None);
        }

        #[test]
        fn sphere_behind_origin() {
            let ray = Ray(vec3(O, O, O), vec3(O, O, -I));
            assert_eq!(ray.intersect(&sphere()), None);
        }

        #[test]
        fn origin_inside_sphere() {
            let ray = Ray(vec3(O, O, f(9)), vec3(O, O, I));
            let (t, pt) = ray.intersect(&sphere()).unwrap();
            assert_approx_eq!(t, f(4));
            assert_approx_eq!(pt, vec3(O, O, f(13)));
        }

        #[test]
        fn distant_miss() {
            // Passes 5 units from the surface
            let far = Sphere::new(vec3(f(15), O, f(200)), f(10));
            let ray = Ray(vec3(O, O, O), vec3(O, O, I));
            assert_eq!(ray.intersect(&far), None);

            let far = Sphere::new(vec3(f(12), O, f(30000)), f(10));
            assert_eq!(ray.intersect(&far), None);
        }

        #[test]
        fn distant_hit() {
            let ray = Ray(vec3(O, O, O), vec3(O, O, I));

            // Hits where z = 200 - √75
            let far = Sphere::new(vec3(f(5), O, f(200)), f(10));
            let (t, _) = ray.intersect(&far).unwrap();
            assert_approx_eq!(t, Fixed::from_f32(191.33975), eps = 1e-3);

            let far = Sphere::new(vec3(O, O, f(1000)), f(50));
            let (t, pt) = ray.intersect(&far).unwrap();
            assert_approx_eq!(t, f(950), eps = 1e-3);
            assert_approx_eq!(pt, vec3(O, O, f(950)), eps = 1e-3);
        }

        #[test]
        fn sqrt_of_wide_values() {
            assert_eq!(sqrt_wide(0), 0);
            assert_eq!(sqrt_wide(9), 3);
            assert_eq!(sqrt_wide(9 << 64), 3 << 32);
            assert_eq!(sqrt_wide(1 << 124), 1 << 62);
            let r = sqrt_wide(75 << 60) as f64 / (1u64 << 30) as f64;
            assert!((r - 8.660254).abs() < 0.02, "{r}");
        }

        #[test]
        fn zero_direction() {
            let ray = Ray(vec3(O, O, O), vec3(O, O, O));
            assert_eq!(ray.intersect(&sphere()), None);
        }
    }

    mod ray_plane {
        use super::*;

        fn plane() -> Plane {
            // z = 4
            Plane::new(vec3(O, O, I), f(4))
        }

        #[test]
        fn perpendicular() {
            let ray = Ray(vec3(f(1), f(2), O), vec3(O, O, I));
            let (t, pt) = ray.intersect(&plane()).unwrap();
            assert_eq!(t, f(4));
            assert_eq!(pt, vec3(f(1), f(2), f(4)));
        }

        #[test]
        fn oblique() {
            let ray = Ray(vec3(O, O, O), vec3(I, O, f(2)));
            let (t, pt) = ray.intersect(&plane()).unwrap();
            assert_eq!(t, f(2));
            assert_eq!(pt, vec3(f(2), O, f(4)));
        }

        #[test]
        fn from_back_side() {
            let ray = Ray(vec3(O, O, f(10)), vec3(O, O, -I));
            let (t, pt) = ray.intersect(&plane()).unwrap();
            assert_eq!(t, f(6));
            assert_eq!(pt, vec3(O, O, f(4)));
        }

        #[test]
        fn origin_on_plane() {
            let ray = Ray(vec3(f(3), f(3), f(4)), vec3(O, I, I));
            assert_eq!(ray.intersect(&plane()), Some((O, ray.orig())));
        }

        #[test]
        fn parallel() {
            let ray = Ray(vec3(O, O, O), vec3(I, f(5), O));
            assert_eq!(ray.intersect(&plane()), None);

            let nearly = vec3(I, O, Fixed::from_bits(3));
            assert_eq!(Ray(vec3(O, O, O), nearly).intersect(&plane()), None);
        }

        #[test]
        fn plane_behind_origin() {
            let ray = Ray(vec3(O, O, O), vec3(O, O, -I));
            assert_eq!(ray.intersect(&plane()), None);
        }
    }
}
