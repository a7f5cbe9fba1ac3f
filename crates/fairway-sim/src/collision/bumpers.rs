use fairway_core::level::Bumper;
use fairway_core::math::Vec3;

use super::Contact;
use crate::config::PhysicsConfig;

/// Bounce off torus bumpers. Unlike walls these add energy: the reflected
/// velocity is amplified rather than damped.
pub(super) fn resolve(contact: &mut Contact, bumpers: &[Bumper], config: &PhysicsConfig) -> bool {
    let r = contact.radius;
    let mut hit = false;
    for bumper in bumpers {
        let offset = (contact.position - bumper.position).horizontal();
        let distance = offset.length();
        let outer = bumper.radius + bumper.tube_radius + r;
        let inner = (bumper.radius - bumper.tube_radius - r).max(0.0);
        let vertical = (contact.position.y - bumper.position.y).abs();
        if distance < inner || distance > outer || vertical > bumper.tube_radius + r {
            continue;
        }

        // Dead center of the bumper has no radial direction; fall back to
        // sending the ball back the way it came.
        let normal = offset
            .try_normalize()
            .or_else(|| (-contact.velocity.horizontal()).try_normalize())
            .unwrap_or(Vec3::X);

        let pushed = bumper.position + normal * (outer + config.collision_epsilon);
        contact.position = Vec3::new(pushed.x, contact.position.y, pushed.z);

        let velocity = if contact.velocity.dot(normal) < 0.0 {
            contact.velocity.reflect(normal)
        } else {
            contact.velocity
        };
        contact.velocity = velocity * config.bumper_amplification;
        hit = true;
    }
    hit
}
