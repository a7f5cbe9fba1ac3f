//! The ghost opponent: a second ball on the same course, driven by a shot
//! policy instead of player input.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use fairway_core::events::{BallKind, GolfEvent};
use fairway_core::math::Vec3;

use crate::ball::{Ball, Shot};
use crate::config::PhysicsConfig;
use crate::registry::ObstacleRegistry;

/// Decides the ghost's next shot whenever it is ready to take one.
pub trait ShotPolicy: Send {
    /// Return `None` to pass on this opportunity; the ghost asks again after
    /// its next think delay.
    fn next_shot(&mut self, ball: &Ball, world: &ObstacleRegistry) -> Option<Shot>;
}

/// Aim straight at the hole with a little seeded noise, hitting harder the
/// further away the hole is.
#[derive(Debug, Clone)]
pub struct AimAtHole {
    rng: StdRng,
    reach: f32,
    jitter: f32,
}

impl AimAtHole {
    pub fn new(seed: u64, config: &PhysicsConfig) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            reach: config.ghost_shot_reach.max(f32::EPSILON),
            jitter: config.ghost_aim_jitter.abs(),
        }
    }
}

impl ShotPolicy for AimAtHole {
    fn next_shot(&mut self, ball: &Ball, world: &ObstacleRegistry) -> Option<Shot> {
        let to_hole = (world.hole().position - ball.position).horizontal();
        let distance = to_hole.length();
        let direction = to_hole.try_normalize()?;

        let noise = self.rng.random_range(-self.jitter..=self.jitter);
        Some(Shot {
            angle: direction.z.atan2(direction.x) + noise,
            power: (distance * 1.1 / self.reach).clamp(0.1, 1.0),
        })
    }
}

/// Replays a fixed list of shots, then passes forever.
#[derive(Debug, Clone, Default)]
pub struct Scripted {
    shots: VecDeque<Shot>,
}

impl Scripted {
    pub fn new(shots: impl IntoIterator<Item = Shot>) -> Self {
        Self {
            shots: shots.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.shots.len()
    }
}

impl ShotPolicy for Scripted {
    fn next_shot(&mut self, _ball: &Ball, _world: &ObstacleRegistry) -> Option<Shot> {
        self.shots.pop_front()
    }
}

/// Everything the ghost owns. Shares nothing mutable with the player; the
/// obstacle registry is only ever borrowed.
pub struct GhostSession {
    ball: Ball,
    policy: Box<dyn ShotPolicy>,
    think_timer: f32,
    trail: VecDeque<Vec3>,
}

impl GhostSession {
    pub fn new(start: Vec3, policy: Box<dyn ShotPolicy>, config: &PhysicsConfig) -> Self {
        Self {
            ball: Ball::new(BallKind::Ghost, start, config),
            policy,
            think_timer: 0.0,
            trail: VecDeque::new(),
        }
    }

    pub fn ball(&self) -> &Ball {
        &self.ball
    }

    pub fn ball_mut(&mut self) -> &mut Ball {
        &mut self.ball
    }

    /// Recent finite positions, oldest first.
    pub fn trail(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.trail.iter().copied()
    }

    /// Start over at `start` for a new level.
    pub fn reset(&mut self, start: Vec3) {
        self.ball.reset_to(start);
        self.ball.strokes = 0;
        self.think_timer = 0.0;
        self.trail.clear();
    }

    /// Take a shot if the ghost has been waiting long enough, then step its
    /// ball through the same pipeline as the player's.
    pub fn update(
        &mut self,
        world: &ObstacleRegistry,
        config: &PhysicsConfig,
        dt: f32,
    ) -> Vec<GolfEvent> {
        let dt = config.clamp_dt(dt);
        let mut events = Vec::new();

        if self.ball.can_stroke() {
            self.think_timer += dt;
            if self.think_timer >= config.ghost_think_delay {
                self.think_timer = 0.0;
                if let Some(shot) = self.policy.next_shot(&self.ball, world)
                    && let Some(event) = self.ball.stroke(shot, config)
                {
                    events.push(event);
                }
            }
        } else {
            self.think_timer = 0.0;
        }

        events.extend(self.ball.step(world, config, dt));
        self.record_trail(config.ghost_trail_length);
        events
    }

    fn record_trail(&mut self, capacity: usize) {
        if !self.ball.position.is_finite() {
            return;
        }
        self.trail.push_back(self.ball.position);
        while self.trail.len() > capacity {
            self.trail.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use fairway_core::test_helpers::course_with;

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn aim_points_at_hole() {
        let world = ObstacleRegistry::from_level(&course_with(Vec::new()));
        let cfg = PhysicsConfig {
            ghost_aim_jitter: 0.0,
            ..Default::default()
        };
        let ball = Ball::new(BallKind::Ghost, world.start(), &cfg);
        let shot = AimAtHole::new(7, &cfg).next_shot(&ball, &world).unwrap();
        // Start (20, 5) to hole (20, 75) is straight down +Z.
        assert!((shot.angle - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert_eq!(shot.power, 1.0);
    }

    #[test]
    fn same_seed_same_shots() {
        let world = ObstacleRegistry::from_level(&course_with(Vec::new()));
        let cfg = PhysicsConfig::default();
        let ball = Ball::new(BallKind::Ghost, world.start(), &cfg);
        let mut a = AimAtHole::new(42, &cfg);
        let mut b = AimAtHole::new(42, &cfg);
        for _ in 0..5 {
            assert_eq!(a.next_shot(&ball, &world), b.next_shot(&ball, &world));
        }
    }

    #[test]
    fn ghost_waits_before_shooting() {
        let world = ObstacleRegistry::from_level(&course_with(Vec::new()));
        let cfg = PhysicsConfig::default();
        let policy = Scripted::new([Shot {
            angle: 0.0,
            power: 0.3,
        }]);
        let mut ghost = GhostSession::new(world.start(), Box::new(policy), &cfg);

        let mut tick = |n: usize| -> Vec<GolfEvent> {
            (0..n).flat_map(|_| ghost.update(&world, &cfg, DT)).collect()
        };
        assert!(tick(30).is_empty());
        let later = tick(40);
        assert_eq!(
            later.first(),
            Some(&GolfEvent::StrokeTaken {
                ball: BallKind::Ghost,
                strokes: 1
            })
        );
    }

    #[test]
    fn trail_is_bounded_and_skips_non_finite_points() {
        let world = ObstacleRegistry::from_level(&course_with(Vec::new()));
        let cfg = PhysicsConfig {
            ghost_trail_length: 10,
            ..Default::default()
        };
        let mut ghost = GhostSession::new(world.start(), Box::new(Scripted::default()), &cfg);
        for _ in 0..25 {
            ghost.update(&world, &cfg, DT);
        }
        assert_eq!(ghost.trail().count(), 10);

        ghost.ball_mut().position = Vec3::new(f32::NAN, 0.0, 0.0);
        ghost.record_trail(cfg.ghost_trail_length);
        assert!(ghost.trail().all(Vec3::is_finite));
    }
}
