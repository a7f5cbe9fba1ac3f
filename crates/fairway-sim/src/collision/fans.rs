use fairway_core::level::Rect;
use fairway_core::math::Vec3;

use super::boxes::sweep;
use super::{BoxFaces, Contact, box_push_out};
use crate::config::PhysicsConfig;
use crate::registry::{Blade, FanState};

/// Collide with rotating fan blades. The bounce is computed relative to the
/// blade surface, so a fast blade throws the ball harder than a still one.
///
/// Blades stand on the ground, so the bottom face never takes part. The
/// travel segment is swept in each blade's frame before the overlap test.
pub(super) fn resolve_blades(
    contact: &mut Contact,
    previous: Vec3,
    fans: &[FanState],
    config: &PhysicsConfig,
) -> bool {
    let r = contact.radius;
    for state in fans {
        for blade in state.blades(config.fan_blade_thickness) {
            let half = blade.half_extents + Vec3::new(r, r, r);
            let local = to_local(&blade, contact.position);
            if local.y.abs() >= half.y {
                continue;
            }

            let footprint = Rect::new(-half.x, half.x, -half.z, half.z);
            let hit = match sweep(to_local(&blade, previous), local, &footprint) {
                Some(swept) => {
                    let snapped = swept.point + swept.normal * config.collision_epsilon;
                    Some((Vec3::new(snapped.x, local.y, snapped.z), swept.normal))
                },
                None => box_push_out(local, half, BoxFaces::SidesAndTop, config.collision_epsilon),
            };
            let Some((corrected, normal)) = hit else {
                continue;
            };

            contact.position = blade.center + corrected.rotate_y(blade.angle);
            let normal = normal.rotate_y(blade.angle);
            let surface = state.surface_velocity(contact.position);
            let relative = contact.velocity - surface;
            if relative.dot(normal) < 0.0 {
                contact.velocity = surface + relative.reflect(normal) * config.bounce_damping;
            }
            return true;
        }
    }
    false
}

fn to_local(blade: &Blade, point: Vec3) -> Vec3 {
    (point - blade.center).rotate_y(-blade.angle)
}

/// Clockwise (seen from above) swirl around each fan, strongest near the hub
/// and fading to nothing at the fan radius. Applies whether or not the ball
/// touches a blade.
pub(super) fn apply_push(contact: &mut Contact, fans: &[FanState], dt: f32) -> bool {
    let mut pushed = false;
    for state in fans {
        let fan = &state.fan;
        let y = contact.position.y;
        if y < -contact.radius || y > fan.height + contact.radius {
            continue;
        }
        let offset = (contact.position - state.hub()).horizontal();
        let distance = offset.length();
        if distance >= fan.radius {
            continue;
        }
        let Some(radial) = offset.try_normalize() else {
            continue;
        };
        let tangent = Vec3::new(-radial.z, 0.0, radial.x);
        let falloff = 1.0 - distance / fan.radius;
        contact.velocity += tangent * (fan.push_strength * falloff * dt);
        pushed = true;
    }
    pushed
}
