//! Per-tick motion: hole and hazard dynamics, force fields, friction, and
//! ground contact.

use fairway_core::level::Hole;
use fairway_core::math::Vec3;

use crate::ball::Ball;
use crate::config::PhysicsConfig;
use crate::fields::{magnetic_pull, wind_push};
use crate::registry::ObstacleRegistry;
use crate::terrain::{HeightField, slope_gradient};

/// How close above the ground a descending ball must be to snap onto it.
const GROUND_SNAP: f32 = 0.05;

/// What the integrator observed this tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntegrationReport {
    pub over_hole: bool,
    pub over_hazard: bool,
    /// Ball ended the tick resting on the terrain.
    pub grounded: bool,
    /// The hazard fall crossed the out-of-bounds depth this tick.
    pub hazard_triggered: bool,
}

/// Rescale `velocity` so its horizontal magnitude is at most `max`.
pub fn clamp_horizontal_speed(velocity: &mut Vec3, max: f32) {
    let speed = velocity.horizontal_length();
    if speed > max && speed > 0.0 {
        let scale = max / speed;
        velocity.x *= scale;
        velocity.z *= scale;
    }
}

/// True when the ball has dropped into `hole`: over the cup, below the lip,
/// and either slow enough or deep enough that it cannot bounce back out.
pub fn check_win_condition(
    position: Vec3,
    velocity: Vec3,
    hole: &Hole,
    config: &PhysicsConfig,
) -> bool {
    position.distance_xz(hole.position) < hole.radius
        && position.y < config.hole_deep_y
        && (velocity.horizontal_length() < config.capture_max_speed
            || position.y < config.capture_deep_y)
}

/// Advance `ball` by one tick of `dt` seconds. Collisions are resolved
/// separately, afterwards.
pub fn integrate(
    ball: &mut Ball,
    world: &ObstacleRegistry,
    config: &PhysicsConfig,
    dt: f32,
) -> IntegrationReport {
    let dt = config.clamp_dt(dt);
    clamp_horizontal_speed(&mut ball.velocity, config.max_speed);

    let over_hole = world.is_over_hole(ball.position);
    let over_hazard = !over_hole && world.is_over_hazard(ball.position);
    let mut report = IntegrationReport {
        over_hole,
        over_hazard,
        ..Default::default()
    };

    if over_hole {
        let speed_factor = (ball.velocity.horizontal_length() / config.max_shot_speed).min(1.0);
        let force = config.hole_downward_force * (1.0 - speed_factor * 0.3);
        ball.velocity.y -= force * dt;
        let drag = config.hole_drag_slow
            + (config.hole_drag_fast - config.hole_drag_slow) * speed_factor;
        ball.velocity.x *= drag;
        ball.velocity.z *= drag;
    } else if over_hazard {
        ball.velocity.y -= config.hazard_gravity * dt;
    } else {
        ball.hazard.rearm();
    }

    if over_hole && ball.position.y < config.hole_deep_y {
        ball.velocity *= config.hole_settle_damping;
    }

    for field in world.magnetic_fields() {
        ball.velocity += magnetic_pull(ball.position, field, config, dt);
    }
    for zone in world.wind_zones() {
        ball.velocity += wind_push(ball.position, zone, dt);
    }

    ball.position += ball.velocity * dt;

    if over_hazard && ball.position.y < config.hazard_oob_depth {
        report.hazard_triggered = ball.hazard.trigger();
    }

    let friction = config.rolling_friction(ball.velocity.horizontal_length());
    ball.velocity.x *= friction;
    ball.velocity.z *= friction;
    if ball.velocity.horizontal_length() < config.min_velocity {
        ball.velocity.x = 0.0;
        ball.velocity.z = 0.0;
    }

    if !over_hole && !over_hazard {
        report.grounded = settle_on_ground(ball, world.terrain(), config, dt);
    }
    report
}

/// Roll downhill and clamp to the terrain, or fall under gravity when
/// airborne. A landing ball loses downward speed and some horizontal speed.
/// Returns whether the ball is on the ground.
fn settle_on_ground(
    ball: &mut Ball,
    field: &impl HeightField,
    config: &PhysicsConfig,
    dt: f32,
) -> bool {
    let Vec3 { x, z, .. } = ball.position;
    let ground = field.height_at(x, z);
    if ball.position.y > ground + GROUND_SNAP || ball.velocity.y > 0.0 {
        ball.velocity.y -= config.gravity * dt;
        return false;
    }

    // Still descending means this is the landing tick.
    if ball.velocity.y < 0.0 {
        ball.velocity.x *= config.ground_contact_damping;
        ball.velocity.z *= config.ground_contact_damping;
    }

    let (gx, gz) = slope_gradient(field, x, z, config.slope_sample_offset);
    ball.velocity.x -= gx * config.slope_acceleration * dt;
    ball.velocity.z -= gz * config.slope_acceleration * dt;

    ball.position.y = ground;
    ball.velocity.y = 0.0;
    true
}
