//! # orbit_math - Spatial Value Types
//!
//! The transform value type and bounding volumes shared by the editor core.
//! Vector, quaternion and matrix arithmetic comes from `glam`; this crate adds
//! the editor's conventions on top (scale-rotate-translate order, safe
//! decomposition, oriented box helpers).

pub mod transform;
pub mod bounds;

pub use transform::*;
pub use bounds::*;

pub use glam::{Mat4, Quat, Vec2, Vec3};

/// Common math constants
pub mod consts {
    pub const DEG_TO_RAD: f32 = core::f32::consts::PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / core::f32::consts::PI;
    pub const EPSILON: f32 = 1e-6;
}

/// Convert degrees to radians
#[inline]
pub fn radians(degrees: f32) -> f32 {
    degrees * consts::DEG_TO_RAD
}

/// Convert radians to degrees
#[inline]
pub fn degrees(radians: f32) -> f32 {
    radians * consts::RAD_TO_DEG
}

/// Round `value` to the nearest multiple of `step`. A non-positive step leaves
/// the value untouched.
#[inline]
pub fn snap(value: f32, step: f32) -> f32 {
    if step > 0.0 {
        (value / step).round() * step
    } else {
        value
    }
}

pub mod prelude {
    pub use crate::transform::Transform;
    pub use crate::bounds::Aabb;
    pub use crate::{radians, degrees, snap};
    pub use glam::{Mat4, Quat, Vec2, Vec3};
}
