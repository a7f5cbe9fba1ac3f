use fairway_core::math::Vec3;

use super::{BoxFaces, Contact, bounce, box_push_out};
use crate::config::PhysicsConfig;
use crate::registry::RotatedWallGeom;

/// Resolve against walls rotated about Y. Only the four side faces collide;
/// the wall's height just gates whether the ball is in reach at all.
pub(super) fn resolve(
    contact: &mut Contact,
    walls: &[RotatedWallGeom],
    config: &PhysicsConfig,
) -> bool {
    let r = contact.radius;
    for geom in walls {
        let wall = &geom.wall;
        if !geom
            .bounds
            .inset(-r)
            .contains(contact.position.x, contact.position.z)
        {
            continue;
        }
        let y = contact.position.y;
        if y < wall.position.y - r || y > wall.position.y + wall.height + r {
            continue;
        }

        let local = (contact.position - wall.position).rotate_y(-wall.rotation);
        let half = Vec3::new(wall.width * 0.5 + r, 0.0, wall.length * 0.5 + r);
        let Some((corrected, normal)) =
            box_push_out(local, half, BoxFaces::Sides, config.collision_epsilon)
        else {
            continue;
        };

        contact.position = wall.position + corrected.rotate_y(wall.rotation);
        let normal = normal.rotate_y(wall.rotation);
        contact.velocity = bounce(contact.velocity, normal, config.bounce_damping);
        return true;
    }
    false
}
