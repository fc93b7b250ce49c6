//! Small vector helpers on top of glam

use glam::{Quat, Vec3};
use std::f32::consts::PI;

/// One degree, applied as the per-tick orbital swirl
pub const ORBIT_SWIRL: f32 = PI / 180.0;

/// World up axis used for the swirl rotation
pub const WORLD_UP: Vec3 = Vec3::Y;

/// Rotate `point` around `pivot` about `axis` by `angle` radians
pub fn rotate_around(point: Vec3, pivot: Vec3, axis: Vec3, angle: f32) -> Vec3 {
    let rotation = Quat::from_axis_angle(axis.normalize_or_zero(), angle);
    pivot + rotation * (point - pivot)
}

/// Position on a sphere around `target` given arc-rotate angles.
///
/// `alpha` is the longitudinal angle in the XZ plane, `beta` the angle from
/// the up axis.
pub fn orbit_position(target: Vec3, alpha: f32, beta: f32, radius: f32) -> Vec3 {
    target
        + Vec3::new(
            alpha.cos() * beta.sin(),
            beta.cos(),
            alpha.sin() * beta.sin(),
        ) * radius
}
