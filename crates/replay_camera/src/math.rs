//! Interpolation and orientation helpers.
//!
//! Angles are degrees. Yaw turns about +Y; pitch is measured downwards, so a
//! positive pitch looks below the horizon.

use bevy::math::{Dir3, EulerRot, Quat, Vec3};
use bevy::transform::components::Transform;

const EPSILON: f32 = 0.001;

/// Per-tick blend. `speed` is the fraction of the remaining distance covered.
pub fn blend(from: Vec3, to: Vec3, speed: f32) -> Vec3 {
    from.lerp(to, speed.clamp(0.0, 1.0))
}

pub fn blend_rotation(from: Quat, to: Quat, speed: f32) -> Quat {
    from.slerp(to, speed.clamp(0.0, 1.0)).normalize()
}

/// Position of `value` inside `start..=end`, clamped to `[0, 1]`.
/// A degenerate segment counts as already traversed.
pub fn segment_fraction(value: f32, start: f32, end: f32) -> f32 {
    let span = end - start;
    if span.abs() < EPSILON {
        return 1.0;
    }
    ((value - start) / span).clamp(0.0, 1.0)
}

/// Like `f32::clamp`, but tolerates bounds given in either order.
pub fn clamp_between(value: f32, a: f32, b: f32) -> f32 {
    value.clamp(a.min(b), a.max(b))
}

/// Wraps an angle into `(-180, 180]`.
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Angle between two orientations in degrees.
pub fn angle_between(a: Quat, b: Quat) -> f32 {
    a.angle_between(b).to_degrees()
}

/// Rotation whose forward axis (-Z) points along `direction`.
///
/// Returns `None` for a zero direction.
pub fn look_rotation(direction: Vec3, up: Vec3) -> Option<Quat> {
    let forward = Dir3::new(direction).ok()?;
    Some(Transform::IDENTITY.looking_to(forward, up).rotation)
}

/// Rotation from yaw/pitch in degrees.
pub fn rotation_from_yaw_pitch(yaw: f32, pitch: f32) -> Quat {
    Quat::from_rotation_y(yaw.to_radians()) * Quat::from_rotation_x(-pitch.to_radians())
}

/// Inverse of [`rotation_from_yaw_pitch`]; roll is discarded.
pub fn yaw_pitch_from_rotation(rotation: Quat) -> (f32, f32) {
    let (yaw, pitch, _) = rotation.to_euler(EulerRot::YXZ);
    (yaw.to_degrees(), wrap_degrees(-pitch.to_degrees()))
}
