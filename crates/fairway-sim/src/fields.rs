//! Continuous force fields: magnetic pull and wind volumes.
//!
//! Both return a velocity delta for one step; they never touch position.

use fairway_core::level::{MagneticField, WindZone};
use fairway_core::math::Vec3;

use crate::config::PhysicsConfig;

/// Velocity change from a magnetic field this step.
///
/// No pull inside the safe zone (so a ball resting on the magnet can be
/// launched) or beyond `range`. Between the two the pull fades linearly from
/// full strength at the safe-zone edge to zero at `range`. Strengths are tuned
/// per frame at the reference rate, hence the `dt * fps` scaling.
pub fn magnetic_pull(
    position: Vec3,
    field: &MagneticField,
    config: &PhysicsConfig,
    dt: f32,
) -> Vec3 {
    let to_center = (field.position - position).horizontal();
    let distance = to_center.length();
    let safe = config.magnet_safe_zone;
    if distance <= safe || distance >= field.range {
        return Vec3::ZERO;
    }
    let Some(direction) = to_center.try_normalize() else {
        return Vec3::ZERO;
    };
    let span = field.range - safe;
    let t = ((distance - safe) / span).clamp(0.0, 1.0);
    let strength = field.strength * (1.0 - t);
    direction * (strength * dt * config.magnet_reference_fps)
}

/// Velocity change from a wind zone this step: uniform inside the box, zero outside.
pub fn wind_push(position: Vec3, zone: &WindZone, dt: f32) -> Vec3 {
    let offset = position - zone.position;
    let inside = offset.x.abs() <= zone.size.x * 0.5
        && offset.y.abs() <= zone.size.y * 0.5
        && offset.z.abs() <= zone.size.z * 0.5;
    if !inside {
        return Vec3::ZERO;
    }
    zone.direction.normalize_or_zero() * (zone.strength * dt)
}
