use serde::{Deserialize, Serialize};

use fairway_core::events::{BallKind, GolfEvent};
use fairway_core::math::Vec3;

use crate::collision;
use crate::config::PhysicsConfig;
use crate::integrator::{self, IntegrationReport, check_win_condition, clamp_horizontal_speed};
use crate::registry::ObstacleRegistry;
use crate::teleport::TeleportTracker;

/// Where a ball is in its shot lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BallPhase {
    Resting,
    Rolling,
    FallingInHole,
    FallingInHazard,
    /// Just arrived through a teleporter; may be struck again.
    Teleporting { remaining: f32 },
    /// Frozen until `reset_in` elapses, then placed back at the start.
    OutOfBounds { reset_in: f32 },
    Holed,
}

/// Edge trigger for a hazard fall: fires once per hazard entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HazardLatch {
    #[default]
    Armed,
    Triggered,
}

impl HazardLatch {
    /// Returns true only on the `Armed -> Triggered` transition.
    pub fn trigger(&mut self) -> bool {
        let fired = *self == Self::Armed;
        *self = Self::Triggered;
        fired
    }

    pub fn rearm(&mut self) {
        *self = Self::Armed;
    }
}

/// A discrete shot: direction in the XZ plane and power in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shot {
    /// Radians from +X toward +Z.
    pub angle: f32,
    pub power: f32,
}

/// One ball (player or ghost) with all of its own physics bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub kind: BallKind,
    pub position: Vec3,
    pub velocity: Vec3,
    pub radius: f32,
    pub strokes: u32,
    phase: BallPhase,
    previous_position: Vec3,
    teleport: TeleportTracker,
    pub(crate) hazard: HazardLatch,
    oob_timer: f32,
}

impl Ball {
    pub fn new(kind: BallKind, start: Vec3, config: &PhysicsConfig) -> Self {
        Self {
            kind,
            position: start,
            velocity: Vec3::ZERO,
            radius: config.ball_radius,
            strokes: 0,
            phase: BallPhase::Resting,
            previous_position: start,
            teleport: TeleportTracker::default(),
            hazard: HazardLatch::Armed,
            oob_timer: 0.0,
        }
    }

    pub fn phase(&self) -> BallPhase {
        self.phase
    }

    /// Position at the start of the last tick; the swept-collision origin.
    pub fn previous_position(&self) -> Vec3 {
        self.previous_position
    }

    pub fn teleport(&self) -> &TeleportTracker {
        &self.teleport
    }

    pub fn at_rest(&self) -> bool {
        self.phase == BallPhase::Resting
    }

    pub fn in_hole(&self) -> bool {
        self.phase == BallPhase::Holed
    }

    pub fn is_out_of_bounds(&self) -> bool {
        matches!(self.phase, BallPhase::OutOfBounds { .. })
    }

    /// Whether a stroke would be accepted right now.
    pub fn can_stroke(&self) -> bool {
        matches!(
            self.phase,
            BallPhase::Resting | BallPhase::Teleporting { .. }
        )
    }

    /// Strike the ball. Ignored unless the ball is at rest (or has just come
    /// out of a teleporter) and the shot is finite.
    pub fn stroke(&mut self, shot: Shot, config: &PhysicsConfig) -> Option<GolfEvent> {
        if !self.can_stroke() || !shot.angle.is_finite() || !shot.power.is_finite() {
            return None;
        }
        let speed = shot.power.clamp(0.0, 1.0) * config.max_shot_speed;
        self.velocity = Vec3::new(shot.angle.cos(), 0.0, shot.angle.sin()) * speed;
        self.strokes += 1;
        self.phase = BallPhase::Rolling;
        Some(GolfEvent::StrokeTaken {
            ball: self.kind,
            strokes: self.strokes,
        })
    }

    /// Place the ball at `position` with all transient state cleared.
    /// Strokes are kept.
    pub fn reset_to(&mut self, position: Vec3) {
        self.position = position;
        self.previous_position = position;
        self.velocity = Vec3::ZERO;
        self.phase = BallPhase::Resting;
        self.teleport.reset();
        self.hazard.rearm();
        self.oob_timer = 0.0;
    }

    /// Freeze the ball, add the stroke penalty, and schedule a reset.
    pub fn trigger_out_of_bounds(&mut self, config: &PhysicsConfig) -> GolfEvent {
        self.velocity = Vec3::ZERO;
        self.strokes += config.oob_penalty_strokes;
        self.oob_timer = 0.0;
        self.phase = BallPhase::OutOfBounds {
            reset_in: config.oob_reset_delay(self.kind.is_player()),
        };
        tracing::debug!(ball = ?self.kind, strokes = self.strokes, "Ball out of bounds");
        GolfEvent::OutOfBounds {
            ball: self.kind,
            strokes: self.strokes,
        }
    }

    /// Advance this ball by one tick: integrate, collide, teleport, then
    /// evaluate capture and out-of-bounds.
    pub fn step(
        &mut self,
        world: &ObstacleRegistry,
        config: &PhysicsConfig,
        dt: f32,
    ) -> Vec<GolfEvent> {
        let dt = config.clamp_dt(dt);
        let mut events = Vec::new();

        match self.phase {
            BallPhase::Holed => return events,
            BallPhase::OutOfBounds { reset_in } => {
                let reset_in = reset_in - dt;
                if reset_in > 0.0 {
                    self.phase = BallPhase::OutOfBounds { reset_in };
                } else {
                    self.reset_to(world.start());
                    events.push(GolfEvent::BallReset {
                        ball: self.kind,
                        position: self.position,
                    });
                }
                return events;
            },
            _ => {},
        }

        self.teleport.tick(dt);
        self.previous_position = self.position;

        let report = integrator::integrate(self, world, config, dt);
        if report.hazard_triggered {
            events.push(self.trigger_out_of_bounds(config));
            return events;
        }

        let outcome = collision::resolve(
            self.position,
            self.velocity,
            self.previous_position,
            world,
            config,
            dt,
        );
        self.position = outcome.position;
        self.velocity = outcome.velocity;

        let mut teleported = false;
        if let Some(hit) = self
            .teleport
            .check(self.position, world, config.teleport_cooldown)
        {
            self.position = hit.destination;
            self.velocity = Vec3::ZERO;
            self.phase = BallPhase::Teleporting {
                remaining: config.teleport_cooldown,
            };
            let narrative =
                self.kind.is_player() && config.narrative_pair_id == Some(hit.pair_id);
            tracing::debug!(ball = ?self.kind, pair = hit.pair_id, narrative, "Teleported");
            events.push(GolfEvent::Teleported {
                ball: self.kind,
                pair_id: hit.pair_id,
                destination: hit.destination,
                narrative,
            });
            teleported = true;
        }

        if !self.position.is_finite() || !self.velocity.is_finite() {
            let fallback = if self.previous_position.is_finite() {
                self.previous_position
            } else {
                world.start()
            };
            tracing::warn!(ball = ?self.kind, "Non-finite ball state, restoring {fallback:?}");
            self.position = fallback;
            self.velocity = Vec3::ZERO;
        }
        clamp_horizontal_speed(&mut self.velocity, config.max_speed);

        if check_win_condition(self.position, self.velocity, world.hole(), config) {
            self.velocity = Vec3::ZERO;
            self.phase = BallPhase::Holed;
            tracing::debug!(ball = ?self.kind, strokes = self.strokes, "Hole captured");
            events.push(GolfEvent::HoleCaptured {
                ball: self.kind,
                strokes: self.strokes,
            });
            return events;
        }

        let Vec3 { x, z, .. } = self.position;
        if world.bounds().contains_with_margin(x, z, config.oob_margin) {
            self.oob_timer = 0.0;
        } else {
            self.oob_timer += dt;
            if self.oob_timer >= config.oob_grace {
                events.push(self.trigger_out_of_bounds(config));
                return events;
            }
        }

        if !teleported {
            self.phase = self.next_phase(report, config, dt);
        }
        events
    }

    fn next_phase(
        &mut self,
        report: IntegrationReport,
        config: &PhysicsConfig,
        dt: f32,
    ) -> BallPhase {
        if let BallPhase::Teleporting { remaining } = self.phase {
            let remaining = remaining - dt;
            if remaining > 0.0 && self.velocity.horizontal_length() < config.min_velocity {
                return BallPhase::Teleporting { remaining };
            }
        }

        if report.over_hole && self.position.y < 0.0 {
            BallPhase::FallingInHole
        } else if report.over_hazard && self.position.y < 0.0 {
            BallPhase::FallingInHazard
        } else if report.grounded && self.velocity.horizontal_length() < config.min_velocity {
            self.velocity.x = 0.0;
            self.velocity.z = 0.0;
            BallPhase::Resting
        } else {
            BallPhase::Rolling
        }
    }
}
