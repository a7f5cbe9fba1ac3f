use serde::{Deserialize, Serialize};

use fairway_core::events::{BallKind, GolfEvent};
use fairway_core::level::{Level, LevelError, LevelIssue};
use fairway_core::math::Vec3;

use crate::ball::{Ball, BallPhase, Shot};
use crate::config::PhysicsConfig;
use crate::course::builtin_levels;
use crate::ghost::{GhostSession, ShotPolicy};
use crate::registry::ObstacleRegistry;

/// Per-ball state the renderer needs each frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BallSnapshot {
    pub kind: BallKind,
    pub position: Vec3,
    pub velocity: Vec3,
    pub strokes: u32,
    pub phase: BallPhase,
}

impl From<&Ball> for BallSnapshot {
    fn from(ball: &Ball) -> Self {
        Self {
            kind: ball.kind,
            position: ball.position,
            velocity: ball.velocity,
            strokes: ball.strokes,
            phase: ball.phase(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSnapshot {
    pub level: String,
    pub elapsed: f32,
    pub player: BallSnapshot,
    pub ghost: Option<BallSnapshot>,
}

/// Pack a snapshot as MessagePack for a renderer bridge.
pub fn encode_snapshot(snapshot: &FrameSnapshot) -> Vec<u8> {
    match rmp_serde::to_vec(snapshot) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!("Failed to encode frame snapshot: {e}");
            Vec::new()
        },
    }
}

pub fn decode_snapshot(bytes: &[u8]) -> Option<FrameSnapshot> {
    rmp_serde::from_slice(bytes).ok()
}

/// One loaded level with its balls.
///
/// The registry and both balls are replaced together on every level load, so
/// the first tick of a new level never sees state from the previous one.
pub struct CourseSession {
    config: PhysicsConfig,
    level: Level,
    world: ObstacleRegistry,
    player: Ball,
    ghost: Option<GhostSession>,
}

impl CourseSession {
    pub fn new(level: Level, config: PhysicsConfig) -> Result<Self, LevelError> {
        check_playable(&level)?;
        let world = ObstacleRegistry::from_level(&level);
        let player = Ball::new(BallKind::Player, world.start(), &config);
        tracing::info!(level = %level.name, "Level loaded");
        Ok(Self {
            config,
            level,
            world,
            player,
            ghost: None,
        })
    }

    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn world(&self) -> &ObstacleRegistry {
        &self.world
    }

    pub fn player(&self) -> &Ball {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Ball {
        &mut self.player
    }

    pub fn ghost(&self) -> Option<&GhostSession> {
        self.ghost.as_ref()
    }

    pub fn ghost_mut(&mut self) -> Option<&mut GhostSession> {
        self.ghost.as_mut()
    }

    /// Swap in a new level. A level with fatal issues is rejected and the
    /// current one stays loaded.
    pub fn load_level(&mut self, level: Level) -> Result<(), LevelError> {
        check_playable(&level)?;
        self.world = ObstacleRegistry::from_level(&level);
        self.player = Ball::new(BallKind::Player, self.world.start(), &self.config);
        if let Some(ghost) = &mut self.ghost {
            ghost.reset(self.world.start());
        }
        tracing::info!(level = %level.name, "Level loaded");
        self.level = level;
        Ok(())
    }

    /// Load a built-in level by index. Unknown indices are ignored and the
    /// current level is kept.
    pub fn load_builtin(&mut self, index: usize) -> bool {
        let Some(level) = builtin_levels().into_iter().nth(index) else {
            tracing::warn!(index, "Unknown built-in level, keeping {}", self.level.name);
            return false;
        };
        match self.load_level(level) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(index, "Built-in level rejected: {e}");
                false
            },
        }
    }

    /// Add (or replace) the ghost opponent, starting from the tee.
    pub fn spawn_ghost(&mut self, policy: Box<dyn ShotPolicy>) {
        self.ghost = Some(GhostSession::new(self.world.start(), policy, &self.config));
    }

    pub fn stroke(&mut self, shot: Shot) -> Option<GolfEvent> {
        self.player.stroke(shot, &self.config)
    }

    /// Advance one frame: animate obstacles, then step the player and the
    /// ghost against the same frozen registry.
    pub fn update(&mut self, dt: f32) -> Vec<GolfEvent> {
        let dt = self.config.clamp_dt(dt);
        self.world.advance(dt);

        let mut events = self.player.step(&self.world, &self.config, dt);
        if let Some(ghost) = &mut self.ghost {
            events.extend(ghost.update(&self.world, &self.config, dt));
        }
        events
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            level: self.level.name.clone(),
            elapsed: self.world.elapsed(),
            player: BallSnapshot::from(&self.player),
            ghost: self.ghost.as_ref().map(|g| BallSnapshot::from(g.ball())),
        }
    }
}

fn check_playable(level: &Level) -> Result<(), LevelError> {
    let fatal: Vec<LevelIssue> = level
        .validate()
        .into_iter()
        .filter(LevelIssue::is_fatal)
        .collect();
    if fatal.is_empty() {
        Ok(())
    } else {
        Err(LevelError::Invalid(fatal))
    }
}

#[cfg(test)]
mod tests {
    use fairway_core::level::{CourseBounds, Rect};
    use fairway_core::test_helpers::open_course;

    use super::*;
    use crate::ghost::Scripted;

    fn open_session() -> CourseSession {
        CourseSession::new(open_course(20.0, 40.0), PhysicsConfig::default()).unwrap()
    }

    #[test]
    fn bad_level_is_rejected_and_previous_kept() {
        let mut session = open_session();
        let mut broken = open_course(20.0, 40.0);
        broken.name = "Broken".to_string();
        broken.bounds = CourseBounds::Rect(Rect::new(10.0, 0.0, 0.0, 40.0));

        assert!(matches!(
            session.load_level(broken),
            Err(LevelError::Invalid(_))
        ));
        assert_eq!(session.level().name, "Open 20x40");
    }

    #[test]
    fn unknown_builtin_keeps_current_level() {
        let mut session = open_session();
        assert!(!session.load_builtin(99));
        assert_eq!(session.level().name, "Open 20x40");
        assert!(session.load_builtin(1));
        assert_eq!(session.level().name, "Bumper Garden");
    }

    #[test]
    fn level_change_resets_both_balls() {
        let mut session = open_session();
        session.spawn_ghost(Box::new(Scripted::default()));
        session.stroke(Shot {
            angle: 0.5,
            power: 0.5,
        });
        for _ in 0..10 {
            session.update(1.0 / 60.0);
        }
        session.load_builtin(0);
        let start = session.world().start();
        assert_eq!(session.player().position, start);
        assert_eq!(session.player().strokes, 0);
        assert_eq!(session.player().previous_position(), start);
        assert_eq!(session.ghost().map(|g| g.ball().position), Some(start));
        assert_eq!(session.world().elapsed(), 0.0);
    }

    #[test]
    fn snapshot_round_trips_through_msgpack() {
        let mut session = open_session();
        session.spawn_ghost(Box::new(Scripted::default()));
        session.update(1.0 / 60.0);
        let snapshot = session.snapshot();
        let bytes = encode_snapshot(&snapshot);
        assert!(!bytes.is_empty());
        assert_eq!(decode_snapshot(&bytes), Some(snapshot));
    }

    #[test]
    fn oversized_frame_is_clamped() {
        let mut session = open_session();
        session.update(5.0);
        assert!((session.world().elapsed() - 0.1).abs() < 1e-6);
    }
}
