use fairway_core::level::{BoxWall, Rect};
use fairway_core::math::Vec3;

use super::{BoxFaces, Contact, bounce, box_push_out};
use crate::config::PhysicsConfig;

/// Earliest crossing of an expanded wall face along the frame's travel segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(super) struct SweptHit {
    pub t: f32,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Resolve against the level's axis-aligned walls.
///
/// The travel segment `previous -> contact.position` is swept first so a ball
/// moving further than a wall's thickness in one frame still stops at the face
/// it crossed. Failing that, a ball already overlapping a wall is pushed out of
/// its nearest face.
pub(super) fn resolve(
    contact: &mut Contact,
    previous: Vec3,
    walls: &[BoxWall],
    config: &PhysicsConfig,
) -> bool {
    let r = contact.radius;

    let earliest = walls
        .iter()
        .filter_map(|w| sweep(previous, contact.position, &expanded(w, r)))
        .min_by(|a, b| a.t.total_cmp(&b.t));
    if let Some(hit) = earliest {
        let snapped = hit.point + hit.normal * config.collision_epsilon;
        contact.position = Vec3::new(snapped.x, contact.position.y, snapped.z);
        contact.velocity = bounce(contact.velocity, hit.normal, config.bounce_damping);
        return true;
    }

    for wall in walls {
        let center = Vec3::new(wall.x, contact.position.y, wall.z);
        let half = Vec3::new(wall.width * 0.5 + r, 0.0, wall.depth * 0.5 + r);
        if let Some((corrected, normal)) = box_push_out(
            contact.position - center,
            half,
            BoxFaces::Sides,
            config.collision_epsilon,
        ) {
            contact.position = center + corrected;
            contact.velocity = bounce(contact.velocity, normal, config.bounce_damping);
            return true;
        }
    }
    false
}

fn expanded(wall: &BoxWall, radius: f32) -> Rect {
    Rect::centered(wall.x, wall.z, wall.width, wall.depth).inset(-radius)
}

/// Intersect the segment `from -> to` with the four faces of `rect`, keeping
/// the earliest entry whose crossing point lies within the face's span.
pub(super) fn sweep(from: Vec3, to: Vec3, rect: &Rect) -> Option<SweptHit> {
    let d = to - from;
    let mut best: Option<SweptHit> = None;
    let mut consider = |t: f32, normal: Vec3| {
        if !(0.0..=1.0).contains(&t) {
            return;
        }
        let point = from + d * t;
        let on_face = if normal.x != 0.0 {
            point.z >= rect.min_z && point.z <= rect.max_z
        } else {
            point.x >= rect.min_x && point.x <= rect.max_x
        };
        if on_face && best.is_none_or(|b| t < b.t) {
            best = Some(SweptHit { t, point, normal });
        }
    };

    if d.x > 0.0 && from.x <= rect.min_x && to.x > rect.min_x {
        consider((rect.min_x - from.x) / d.x, -Vec3::X);
    }
    if d.x < 0.0 && from.x >= rect.max_x && to.x < rect.max_x {
        consider((rect.max_x - from.x) / d.x, Vec3::X);
    }
    if d.z > 0.0 && from.z <= rect.min_z && to.z > rect.min_z {
        consider((rect.min_z - from.z) / d.z, -Vec3::Z);
    }
    if d.z < 0.0 && from.z >= rect.max_z && to.z < rect.max_z {
        consider((rect.max_z - from.z) / d.z, Vec3::Z);
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thin_wall() -> BoxWall {
        BoxWall {
            x: 10.0,
            z: 0.0,
            width: 2.0,
            depth: 20.0,
        }
    }

    #[test]
    fn fast_ball_stops_at_thin_wall_face() {
        let cfg = PhysicsConfig::default();
        // 150 u/s for 0.1 s: 15 units of travel across a 2-unit wall.
        let previous = Vec3::flat(0.0, 0.0);
        let mut c = Contact {
            position: Vec3::flat(15.0, 0.0),
            velocity: Vec3::new(150.0, 0.0, 0.0),
            radius: 0.5,
        };
        assert!(resolve(&mut c, previous, &[thin_wall()], &cfg));
        assert!(c.position.x < 8.5, "ball tunneled to {:?}", c.position);
        assert!((c.position.x - 8.5).abs() < 0.01);
        assert!(c.velocity.x < 0.0);
    }

    #[test]
    fn sweep_picks_earliest_wall() {
        let cfg = PhysicsConfig::default();
        let near = BoxWall {
            x: 5.0,
            z: 0.0,
            width: 1.0,
            depth: 10.0,
        };
        let previous = Vec3::flat(0.0, 0.0);
        let mut c = Contact {
            position: Vec3::flat(15.0, 0.0),
            velocity: Vec3::new(150.0, 0.0, 0.0),
            radius: 0.5,
        };
        assert!(resolve(&mut c, previous, &[thin_wall(), near], &cfg));
        assert!((c.position.x - 4.0).abs() < 0.01, "got {:?}", c.position);
    }

    #[test]
    fn sweep_misses_when_crossing_outside_span() {
        let rect = expanded(&thin_wall(), 0.5);
        // Passes the wall's x range well beyond its z extent.
        let hit = sweep(Vec3::flat(0.0, 30.0), Vec3::flat(15.0, 30.0), &rect);
        assert!(hit.is_none());
    }

    #[test]
    fn overlap_pushes_out_without_travel() {
        let cfg = PhysicsConfig::default();
        let mut c = Contact {
            position: Vec3::flat(9.0, 0.0),
            velocity: Vec3::new(1.0, 0.0, 0.0),
            radius: 0.5,
        };
        let previous = c.position;
        assert!(resolve(&mut c, previous, &[thin_wall()], &cfg));
        assert!(c.position.x <= 8.5);
        assert!(c.velocity.x < 0.0);
    }
}
