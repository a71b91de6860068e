//! Physics module for ray casting
//!
//! Only the geometric queries needed by pointer picking live here; orbits
//! are fixed circular paths, not force-integrated.

pub mod collision;

pub use collision::{BoundingSphere, Ray, RayHit};
