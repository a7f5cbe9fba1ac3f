//! Collision resolution against every obstacle class.
//!
//! Stages run in the fixed order of [`CollisionStage::ORDER`]. Surface stages
//! (walls, blades) are mutually exclusive: once anything has been hit this
//! tick, the remaining surface stages are skipped. Bumpers and the fan push
//! always run; a bumper hit still counts as a hit for the stages after it.

mod boxes;
mod bumpers;
mod fans;
mod moving;
mod perimeter;
mod rotated;

use serde::{Deserialize, Serialize};

use fairway_core::math::Vec3;

use crate::config::PhysicsConfig;
use crate::registry::ObstacleRegistry;

/// One category of collision, in resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollisionStage {
    /// Course outline; only on levels without a custom wall list.
    Perimeter,
    RotatedWalls,
    /// Axis-aligned level walls, with swept detection against tunneling.
    CustomWalls,
    Bumpers,
    FanBlades,
    /// Tangential push around a fan. A force, never reported as a hit.
    FanPush,
    MovingWalls,
}

impl CollisionStage {
    pub const ORDER: [Self; 7] = [
        Self::Perimeter,
        Self::RotatedWalls,
        Self::CustomWalls,
        Self::Bumpers,
        Self::FanBlades,
        Self::FanPush,
        Self::MovingWalls,
    ];

    /// Surface stages are skipped once an earlier stage reported a hit.
    pub fn is_exclusive(self) -> bool {
        !matches!(self, Self::Bumpers | Self::FanPush)
    }

    fn reports_hit(self) -> bool {
        self != Self::FanPush
    }
}

/// Mutable ball state threaded through the stages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
}

/// Result of resolving one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionOutcome {
    pub position: Vec3,
    pub velocity: Vec3,
    pub collided: bool,
    /// Every stage that reported a hit, in resolution order.
    pub hits: Vec<CollisionStage>,
}

/// Resolve penetration for a ball that moved from `previous_position` to
/// `position` this tick.
///
/// Resolving an already-resolved, non-penetrating position is a no-op.
pub fn resolve(
    position: Vec3,
    velocity: Vec3,
    previous_position: Vec3,
    world: &ObstacleRegistry,
    config: &PhysicsConfig,
    dt: f32,
) -> CollisionOutcome {
    let mut contact = Contact {
        position,
        velocity,
        radius: config.ball_radius,
    };
    let mut hits = Vec::new();

    for stage in CollisionStage::ORDER {
        if stage.is_exclusive() && !hits.is_empty() {
            continue;
        }
        let hit = match stage {
            CollisionStage::Perimeter => {
                !world.has_custom_walls()
                    && perimeter::resolve(&mut contact, world.bounds(), config)
            },
            CollisionStage::RotatedWalls => {
                rotated::resolve(&mut contact, world.rotated_walls(), config)
            },
            CollisionStage::CustomWalls => {
                boxes::resolve(&mut contact, previous_position, world.walls(), config)
            },
            CollisionStage::Bumpers => bumpers::resolve(&mut contact, world.bumpers(), config),
            CollisionStage::FanBlades => {
                fans::resolve_blades(&mut contact, previous_position, world.fans(), config)
            },
            CollisionStage::FanPush => fans::apply_push(&mut contact, world.fans(), dt),
            CollisionStage::MovingWalls => {
                moving::resolve(&mut contact, world.moving_walls(), config)
            },
        };
        if hit && stage.reports_hit() {
            hits.push(stage);
        }
    }

    CollisionOutcome {
        position: contact.position,
        velocity: contact.velocity,
        collided: !hits.is_empty(),
        hits,
    }
}

/// Reflect `velocity` about `normal` and scale it, but only when the ball is
/// moving into the surface.
pub(crate) fn bounce(velocity: Vec3, normal: Vec3, factor: f32) -> Vec3 {
    if velocity.dot(normal) < 0.0 {
        velocity.reflect(normal) * factor
    } else {
        velocity
    }
}

/// Which faces of a box take part in push-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BoxFaces {
    /// Four vertical faces; height is handled by the caller.
    Sides,
    /// Vertical faces plus the top, for boxes standing on the ground.
    SidesAndTop,
}

/// Nearest-face push-out for a point in a box centered on the origin whose
/// `half` extents already include the ball radius. The bottom face never
/// takes part.
///
/// Returns the corrected point (just outside the nearest face) and that
/// face's outward normal, or `None` when the point is not inside.
pub(crate) fn box_push_out(
    local: Vec3,
    half: Vec3,
    faces: BoxFaces,
    epsilon: f32,
) -> Option<(Vec3, Vec3)> {
    if local.x.abs() >= half.x || local.z.abs() >= half.z {
        return None;
    }
    if faces == BoxFaces::SidesAndTop && local.y.abs() >= half.y {
        return None;
    }

    let mut candidates = vec![
        (half.x - local.x, Vec3::X),
        (local.x + half.x, -Vec3::X),
        (half.z - local.z, Vec3::Z),
        (local.z + half.z, -Vec3::Z),
    ];
    if faces == BoxFaces::SidesAndTop {
        candidates.push((half.y - local.y, Vec3::Y));
    }

    let (depth, normal) = candidates
        .into_iter()
        .fold((f32::INFINITY, Vec3::X), |best, c| if c.0 < best.0 { c } else { best });
    Some((local + normal * (depth + epsilon), normal))
}
