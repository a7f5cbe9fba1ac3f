use fairway_core::math::Vec3;

use super::{BoxFaces, Contact, bounce, box_push_out};
use crate::config::PhysicsConfig;
use crate::registry::MovingWallState;

/// Resolve against sliding walls at their current animated position.
pub(super) fn resolve(
    contact: &mut Contact,
    walls: impl Iterator<Item = MovingWallState>,
    config: &PhysicsConfig,
) -> bool {
    let r = contact.radius;
    for state in walls {
        let local = contact.position - state.center;
        if local.y.abs() >= state.half_extents.y + r {
            continue;
        }
        let half = Vec3::new(state.half_extents.x + r, 0.0, state.half_extents.z + r);
        let Some((corrected, normal)) =
            box_push_out(local, half, BoxFaces::Sides, config.collision_epsilon)
        else {
            continue;
        };

        contact.position = state.center + corrected;
        contact.velocity = bounce(contact.velocity, normal, config.bounce_damping);
        if config.moving_wall_transfer && normal.z != 0.0 {
            contact.velocity.z += state.velocity.z;
        }
        return true;
    }
    false
}
