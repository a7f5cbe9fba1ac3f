use fairway_core::level::{CourseBounds, Rect};

use super::Contact;
use crate::config::PhysicsConfig;

/// Keep the ball inside the course outline.
///
/// For an L-shaped course the ball may sit anywhere in the union of the two
/// rectangles; when it is outside both, it is clamped into whichever needs the
/// smaller correction.
pub(super) fn resolve(
    contact: &mut Contact,
    bounds: &CourseBounds,
    config: &PhysicsConfig,
) -> bool {
    let (x, z) = (contact.position.x, contact.position.z);
    let allowed: Vec<Rect> = bounds
        .parts()
        .iter()
        .map(|r| r.inset(contact.radius))
        .collect();
    if allowed.iter().any(|r| r.contains(x, z)) {
        return false;
    }

    let Some(target) = allowed.into_iter().min_by(|a, b| {
        correction_sq(a, x, z).total_cmp(&correction_sq(b, x, z))
    }) else {
        return false;
    };

    let mut reflected = false;
    if x < target.min_x {
        contact.position.x = target.min_x;
        if contact.velocity.x < 0.0 {
            contact.velocity.x = -contact.velocity.x;
            reflected = true;
        }
    } else if x > target.max_x {
        contact.position.x = target.max_x;
        if contact.velocity.x > 0.0 {
            contact.velocity.x = -contact.velocity.x;
            reflected = true;
        }
    }
    if z < target.min_z {
        contact.position.z = target.min_z;
        if contact.velocity.z < 0.0 {
            contact.velocity.z = -contact.velocity.z;
            reflected = true;
        }
    } else if z > target.max_z {
        contact.position.z = target.max_z;
        if contact.velocity.z > 0.0 {
            contact.velocity.z = -contact.velocity.z;
            reflected = true;
        }
    }
    if reflected {
        contact.velocity.x *= config.bounce_damping;
        contact.velocity.z *= config.bounce_damping;
    }
    true
}

/// Squared distance from `(x, z)` to the nearest point of `r`.
fn correction_sq(r: &Rect, x: f32, z: f32) -> f32 {
    let dx = (r.min_x - x).max(0.0).max(x - r.max_x);
    let dz = (r.min_z - z).max(0.0).max(z - r.max_z);
    dx * dx + dz * dz
}

#[cfg(test)]
mod tests {
    use fairway_core::math::Vec3;

    use super::*;

    fn contact(x: f32, z: f32, vx: f32, vz: f32) -> Contact {
        Contact {
            position: Vec3::flat(x, z),
            velocity: Vec3::new(vx, 0.0, vz),
            radius: 0.5,
        }
    }

    #[test]
    fn clamps_and_reflects_off_left_edge() {
        let bounds = CourseBounds::Rect(Rect::new(0.0, 20.0, 0.0, 40.0));
        let cfg = PhysicsConfig::default();
        let mut c = contact(-1.0, 10.0, -10.0, 2.0);
        assert!(resolve(&mut c, &bounds, &cfg));
        assert_eq!(c.position.x, 0.5);
        assert!((c.velocity.x - 10.0 * cfg.bounce_damping).abs() < 1e-5);
        assert!((c.velocity.z - 2.0 * cfg.bounce_damping).abs() < 1e-5);
    }

    #[test]
    fn corner_reflects_both_axes() {
        let bounds = CourseBounds::Rect(Rect::new(0.0, 20.0, 0.0, 40.0));
        let cfg = PhysicsConfig::default();
        let mut c = contact(21.0, 41.0, 5.0, 5.0);
        assert!(resolve(&mut c, &bounds, &cfg));
        assert_eq!((c.position.x, c.position.z), (19.5, 39.5));
        assert!(c.velocity.x < 0.0 && c.velocity.z < 0.0);
    }

    #[test]
    fn inside_is_untouched() {
        let bounds = CourseBounds::Rect(Rect::new(0.0, 20.0, 0.0, 40.0));
        let mut c = contact(10.0, 10.0, 5.0, 5.0);
        let before = c;
        assert!(!resolve(&mut c, &bounds, &PhysicsConfig::default()));
        assert_eq!(c, before);
    }

    #[test]
    fn l_shape_allows_both_arms_and_clamps_to_nearest() {
        // Vertical arm x in [0, 10], z in [0, 40]; horizontal arm x in [0, 30], z in [30, 40].
        let bounds = CourseBounds::LShape {
            parts: [
                Rect::new(0.0, 10.0, 0.0, 40.0),
                Rect::new(0.0, 30.0, 30.0, 40.0),
            ],
        };
        let cfg = PhysicsConfig::default();

        let mut in_arm = contact(25.0, 35.0, 1.0, 0.0);
        assert!(!resolve(&mut in_arm, &bounds, &cfg));

        // Just past the inner corner wall of the horizontal arm.
        let mut c = contact(20.0, 29.8, 0.0, -3.0);
        assert!(resolve(&mut c, &bounds, &cfg));
        assert_eq!(c.position.z, 30.5);
        assert!(c.velocity.z > 0.0);
    }
}
