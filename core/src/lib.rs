//! Core functionality of the `lutra` project.
//!
//! Includes table-driven approximate arithmetic for processors without a
//! fast multiplier, divider, or floating-point unit: an integer log-domain
//! engine, a bipartite-table float engine, a logarithmic number type, Q16.16
//! fixed point with table-driven trigonometry, and a fixed-point 3D transform
//! pipeline with perspective projection and ray intersection.
//!
//! Every lookup table is computed at build time and linked into the binary
//! as an immutable static. No operation allocates, blocks, or loops a
//! data-dependent number of times.
//!
//! # Crate features
//!
//! * `fp`:
//!   Enables the items that need floating-point functions not included in
//!   `core`, such as exact conversions between `f32` and [`Log32`][ring].
//!   Implied by each of the following features, one of which must be enabled
//!   to actually provide the functions.
//!
//! * `std`:
//!   Uses the floating-point functions of the standard library.
//!
//! * `libm`:
//!   Provides software implementations of floating-point functions via the
//!   [libm](https://crates.io/crates/libm) crate.
//!
//! * `mm`:
//!   Provides fast approximate implementations of floating-point functions
//!   via the [micromath](https://crates.io/crates/micromath) crate.
//!
//! All features are disabled by default.
//!
//! # Build-time configuration
//!
//! * `LUTRA_SIN_TABLE_LEN`:
//!   The number of entries in the sine and cosine tables, 1024 by default.
//!   Powers of two index the table with a single shift.
//!
//! [ring]: math::ring::Log32

#![no_std]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod geom;
pub mod math;
pub mod render;

pub mod prelude {
    pub use crate::math::{
        angle::{Angle, degs, rads, turns},
        fixed::Fixed,
        mat::{Mat3, Mat4},
        quat::Quat,
        rand::Distrib,
        ring::Log32,
        vec::{Vec3, Vec4, splat, vec3, vec4},
    };

    pub use crate::geom::{Plane, Ray, Sphere};

    pub use crate::render::{Pose, pipeline_mvp, pipeline_mvp_fused};
}
