//! # heist_math - 2D Math Primitives
//!
//! Small, copyable math types for a top-down world:
//! - `Vec2` with the usual operators
//! - `Aabb2` axis-aligned regions for footprints and zones
//! - Angle helpers (degrees are the public unit for orientation)

pub mod bounds;
pub mod vector;

pub use bounds::*;
pub use vector::*;

/// Common math constants
pub mod consts {
    pub const PI: f32 = core::f32::consts::PI;
    pub const TAU: f32 = PI * 2.0;
    pub const DEG_TO_RAD: f32 = PI / 180.0;
    pub const RAD_TO_DEG: f32 = 180.0 / PI;
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

/// Linear interpolation
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Clamp value between min and max
#[inline]
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    if value < min { min }
    else if value > max { max }
    else { value }
}

/// Move `current` towards `target` by at most `max_delta`, never overshooting
#[inline]
pub fn move_towards(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Sign of `value`, with zero mapping to zero (unlike `f32::signum`)
#[inline]
pub fn sign_or_zero(value: f32) -> f32 {
    if value > 0.0 { 1.0 }
    else if value < 0.0 { -1.0 }
    else { 0.0 }
}

/// Round to the nearest integer, halves to even, saturating at the i32 range
#[inline]
pub fn round_to_int(value: f32) -> i32 {
    value.round_ties_even() as i32
}

/// Wrap an angle in degrees into `[0, 360)`
#[inline]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle % 360.0;
    if wrapped < 0.0 { wrapped + 360.0 } else { wrapped }
}

pub mod prelude {
    pub use crate::bounds::Aabb2;
    pub use crate::vector::Vec2;
    pub use crate::{clamp, degrees, lerp, move_towards, radians, round_to_int, sign_or_zero, wrap_degrees};
}
