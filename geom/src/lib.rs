//! Intersection tests between the geometric primitives of `lutra-core`.
//!
//! All computations are done in Q16.16 fixed point. A test reports the
//! parameter of the hit along the ray together with the hit point, or
//! `None` if there is no hit in front of the ray origin.

#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod isect;

pub use isect::Intersect;
