use fairway_core::events::GolfEvent;
use fairway_core::level::{Level, Obstacle, Teleporter};
use fairway_core::math::Vec3;

use fairway_sim::{Ball, CourseSession, ObstacleRegistry, PhysicsConfig};

pub const DT: f32 = 1.0 / 60.0;

/// Step the whole session for `ticks` frames, collecting every event.
pub fn run_session(session: &mut CourseSession, ticks: usize) -> Vec<GolfEvent> {
    (0..ticks).flat_map(|_| session.update(DT)).collect()
}

/// Step a lone ball for `ticks` frames.
pub fn run_ball(
    ball: &mut Ball,
    world: &ObstacleRegistry,
    config: &PhysicsConfig,
    ticks: usize,
) -> Vec<GolfEvent> {
    (0..ticks).flat_map(|_| ball.step(world, config, DT)).collect()
}

pub fn session(level: Level) -> CourseSession {
    CourseSession::new(level, PhysicsConfig::default()).expect("test level must be playable")
}

/// Paired teleporter pad, 2x2.
pub fn pad(x: f32, z: f32, pair_id: u32) -> Obstacle {
    Obstacle::Teleporter(Teleporter {
        position: Vec3::flat(x, z),
        pair_id,
        size: 2.0,
        is_one_way: false,
        destination: None,
    })
}
