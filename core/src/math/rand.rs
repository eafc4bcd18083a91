//! Pseudo-random number generation and sampling.
//!
//! Used to drive statistical error measurements and benchmarks with
//! reproducible inputs.

use core::{array, fmt::Debug, ops::Range};

use crate::math::fixed::Fixed;
use crate::math::vec::{Vec3, Vector};

//
// Traits and types
//

/// The generator used by default.
pub type DefaultRng = Xorshift64;

/// Trait for generating values sampled from a probability distribution.
pub trait Distrib<R = DefaultRng>: Clone {
    /// The type of the elements of the sample space of `Self`, also called
    /// "outcomes".
    type Sample;

    /// Returns a pseudo-random value sampled from `self`.
    fn sample(&self, rng: &mut R) -> Self::Sample;

    /// Returns an iterator that yields samples from `self`.
    fn iter(&self, rng: R) -> Iter<Self, R> {
        Iter(self.clone(), rng)
    }
}

/// A pseudo-random number generator (PRNG) that uses a [Xorshift algorithm][^1]
/// to generate 64 bits of randomness at a time, represented by a `u64`.
///
/// Xorshift is a type of linear-feedback shift register that uses only three
/// shifts and three xor operations per generated number, making it very
/// efficient. Xorshift64 has a period of 2<sup>64</sup>-1: it yields every
/// number in the interval [1, 2<sup>64</sup>) exactly once before repeating.
///
/// [^1]: Marsaglia, G. (2003). Xorshift RNGs. Journal of Statistical Software,
///     8(14), 1–6. <https://doi.org/10.18637/jss.v008.i14>
#[derive(Copy, Clone, Debug)]
#[repr(transparent)]
pub struct Xorshift64(pub u64);

/// A uniform distribution of values in the given range.
#[derive(Clone, Debug)]
pub struct Uniform<T>(pub Range<T>);

/// A uniform distribution of 3-vectors on the (surface of) the unit sphere.
///
/// The vectors have unit length up to the precision of
/// [`Vector::normalize`].
#[derive(Copy, Clone, Debug, Default)]
pub struct UnitSphere;

/// Iterator returned by the [Distrib::iter()] method.
pub struct Iter<D, R>(D, R);

//
// Inherent impls
//

impl Xorshift64 {
    /// A random 64-bit prime, used to initialize the generator returned by
    /// [`Xorshift64::default()`].
    pub const DEFAULT_SEED: u64 = 378682147834061;

    /// Returns a new `Xorshift64` seeded by the given number.
    ///
    /// Two `Xorshift64` instances generate the same sequence of pseudo-random
    /// numbers if and only if they were created with the same seed.
    ///
    /// # Examples
    /// ```
    /// # use lutra_core::math::rand::Xorshift64;
    /// let mut g = Xorshift64::from_seed(123);
    /// assert_eq!(g.next_bits(), 133101616827);
    /// assert_eq!(g.next_bits(), 12690785413091508870);
    /// assert_eq!(g.next_bits(), 7516749944291143043);
    /// ```
    ///
    /// # Panics
    ///
    /// If `seed` equals 0.
    pub fn from_seed(seed: u64) -> Self {
        assert_ne!(seed, 0, "xorshift seed cannot be zero");
        Self(seed)
    }

    /// Returns 64 bits of pseudo-randomness.
    ///
    /// Successive calls to this function (with the same `self`) will yield
    /// every value in the interval [1, 2<sup>64</sup>) exactly once before
    /// starting to repeat the sequence.
    pub fn next_bits(&mut self) -> u64 {
        let Self(x) = self;
        *x ^= *x << 13;
        *x ^= *x >> 7;
        *x ^= *x << 17;
        *x
    }
}

//
// Foreign trait impls
//

impl<D: Distrib> Iterator for Iter<D, DefaultRng> {
    type Item = D::Sample;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.0.sample(&mut self.1))
    }
}

impl Default for Xorshift64 {
    /// Returns a `Xorshift64` seeded with [`Self::DEFAULT_SEED`].
    fn default() -> Self {
        Self::from_seed(Self::DEFAULT_SEED)
    }
}

//
// Local trait impls
//

impl Distrib for Uniform<i32> {
    type Sample = i32;

    /// Returns a uniformly distributed `i32` in the given range.
    fn sample(&self, rng: &mut DefaultRng) -> i32 {
        let Range { start, end } = self.0;
        let bits = rng.next_bits() as i32 as i64;
        // TODO rem introduces slight bias
        (bits.rem_euclid(end as i64 - start as i64) + start as i64) as i32
    }
}

impl Distrib for Uniform<u32> {
    type Sample = u32;

    /// Returns a uniformly distributed `u32` in the given range.
    fn sample(&self, rng: &mut DefaultRng) -> u32 {
        let Range { start, end } = self.0;
        let bits = (rng.next_bits() >> 32) as u32;
        bits % (end - start) + start
    }
}

impl Distrib for Uniform<f32> {
    type Sample = f32;

    /// Returns a uniformly distributed `f32` in the given range.
    fn sample(&self, rng: &mut DefaultRng) -> f32 {
        let Range { start, end } = self.0;
        // Bit repr of a random f32 in range 1.0..2.0
        let bits = 127 << 23 | rng.next_bits() >> 41;
        let unit = f32::from_bits(bits as u32) - 1.0;
        unit * (end - start) + start
    }
}

impl Distrib for Uniform<Fixed> {
    type Sample = Fixed;

    /// Returns a uniformly distributed fixed-point number in the given range.
    fn sample(&self, rng: &mut DefaultRng) -> Fixed {
        let Range { start, end } = self.0;
        let raw = Uniform(start.to_bits()..end.to_bits()).sample(rng);
        Fixed::from_bits(raw)
    }
}

impl<T, O, const N: usize> Distrib for Uniform<[T; N]>
where
    T: Copy,
    Uniform<T>: Distrib<Sample = O>,
{
    type Sample = [O; N];

    /// Returns an array of values that represents a uniformly distributed point
    /// within the N-dimensional rectangular volume bounded by `self.0`.
    fn sample(&self, rng: &mut DefaultRng) -> [O; N] {
        array::from_fn(|i| Uniform(self.0.start[i]..self.0.end[i]).sample(rng))
    }
}

impl<Sc, Sp, const DIM: usize> Distrib for Uniform<Vector<[Sc; DIM], Sp>>
where
    Sc: Copy,
    Sp: Clone,
    Uniform<[Sc; DIM]>: Distrib<Sample = [Sc; DIM]>,
{
    type Sample = Vector<[Sc; DIM], Sp>;

    /// Returns a uniformly distributed vector within the rectangular volume
    /// bounded by the range `self.0`.
    fn sample(&self, rng: &mut DefaultRng) -> Self::Sample {
        Uniform(self.0.start.0..self.0.end.0)
            .sample(rng)
            .into()
    }
}

impl Distrib for UnitSphere {
    type Sample = Vec3;

    /// Returns a vector approximately uniformly distributed on the unit
    /// sphere.
    fn sample(&self, rng: &mut DefaultRng) -> Vec3 {
        let d = Uniform([-Fixed::ONE; 3]..[Fixed::ONE; 3]);
        loop {
            let v = Vec3::from(d.sample(rng));
            // Reject the corners of the cube and the neighborhood of zero
            let len_sqr = v.len_sqr();
            if Fixed::from_f32(0.01) < len_sqr && len_sqr <= Fixed::ONE {
                return v.normalize();
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::manual_range_contains)]
mod tests {
    use crate::assert_approx_eq;
    use crate::math::vec::vec3;

    use super::*;

    const COUNT: usize = 1000;

    fn rng() -> DefaultRng {
        Default::default()
    }

    #[test]
    fn uniform_i32() {
        let dist = Uniform(-123..456);
        for r in dist.iter(rng()).take(COUNT) {
            assert!(-123 <= r && r < 456);
        }
    }

    #[test]
    fn uniform_i32_full_range() {
        let dist = Uniform(i32::MIN..i32::MAX);
        assert!(dist.iter(rng()).take(COUNT).any(|r| r < -1 << 30));
        assert!(dist.iter(rng()).take(COUNT).any(|r| r > 1 << 30));
    }

    #[test]
    fn uniform_u32() {
        let dist = Uniform(10u32..20);
        for r in dist.iter(rng()).take(COUNT) {
            assert!(10 <= r && r < 20);
        }
    }

    #[test]
    fn uniform_f32() {
        let dist = Uniform(-1.23..4.56);
        for r in dist.iter(rng()).take(COUNT) {
            assert!(-1.23 <= r && r < 4.56);
        }
    }

    #[test]
    fn uniform_fixed() {
        let (lo, hi) = (Fixed::from_int(-3), Fixed::from_f32(0.5));
        for r in Uniform(lo..hi).iter(rng()).take(COUNT) {
            assert!(lo <= r && r < hi);
        }
    }

    #[test]
    fn uniform_vec3() {
        let lo = vec3(Fixed::from_int(-2), Fixed::ZERO, Fixed::from_int(-1));
        let hi = vec3(Fixed::ONE, Fixed::from_int(2), Fixed::from_int(3));

        for v in Uniform::<Vec3>(lo..hi).iter(rng()).take(COUNT) {
            for i in 0..3 {
                assert!(lo[i] <= v[i] && v[i] < hi[i], "{v:?}");
            }
        }
    }

    #[test]
    fn unit_sphere() {
        for v in UnitSphere.iter(rng()).take(COUNT) {
            assert_approx_eq!(v.len(), Fixed::ONE, eps = 0.02, "{v:?}");
        }
    }
}
