use serde::{Deserialize, Serialize};

/// Ball radius in world units.
pub const BALL_RADIUS: f32 = 0.5;
/// Hard cap on horizontal ball speed (units/s).
pub const MAX_SPEED: f32 = 200.0;
/// Speed of a full-power stroke (units/s).
pub const MAX_SHOT_SPEED: f32 = 50.0;
/// Largest simulation step accepted; longer frame hitches are truncated.
pub const MAX_FRAME_DT: f32 = 0.1;
/// Horizontal speeds below this are snapped to zero.
pub const MIN_VELOCITY: f32 = 0.1;

/// Tuning constants for the physics core, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub ball_radius: f32,
    pub max_speed: f32,
    pub max_shot_speed: f32,
    pub max_frame_dt: f32,
    pub min_velocity: f32,

    /// Downward pull over the hole before the speed adjustment (units/s^2).
    pub hole_downward_force: f32,
    /// Horizontal drag multiplier over the hole for a stationary ball.
    pub hole_drag_slow: f32,
    /// Horizontal drag multiplier over the hole at full shot speed.
    pub hole_drag_fast: f32,
    /// Below this height over the hole the ball counts as dropping in.
    pub hole_deep_y: f32,
    /// Per-tick velocity multiplier once the ball is deep in the cup.
    pub hole_settle_damping: f32,
    /// Capture also requires speed below this ...
    pub capture_max_speed: f32,
    /// ... unless the ball has sunk below this height.
    pub capture_deep_y: f32,

    pub hazard_gravity: f32,
    /// Height at which a ball falling into a hazard is declared out of bounds.
    pub hazard_oob_depth: f32,

    pub gravity: f32,
    /// Horizontal velocity multiplier applied on the tick the ball lands.
    pub ground_contact_damping: f32,
    /// Horizontal acceleration per unit of terrain gradient.
    pub slope_acceleration: f32,
    /// Offset used for the finite-difference slope estimate.
    pub slope_sample_offset: f32,

    /// Rolling friction multiplier at or below `friction_blend_start`.
    pub friction_slow: f32,
    /// Rolling friction multiplier at or above `friction_blend_end`.
    pub friction_fast: f32,
    pub friction_blend_start: f32,
    pub friction_blend_end: f32,

    /// Velocity multiplier applied on wall bounces.
    pub bounce_damping: f32,
    /// Velocity multiplier applied on bumper bounces.
    pub bumper_amplification: f32,
    pub fan_blade_thickness: f32,
    /// Extra clearance added when pushing the ball out of a surface.
    pub collision_epsilon: f32,
    /// Add a moving wall's instantaneous velocity to the ball on contact.
    pub moving_wall_transfer: bool,

    /// Radius around a magnetic field's center where it exerts no pull.
    pub magnet_safe_zone: f32,
    /// Reference frame rate the per-field magnet strengths were tuned at.
    pub magnet_reference_fps: f32,

    pub teleport_cooldown: f32,
    /// Teleporter pair that triggers the story cutscene for the player.
    pub narrative_pair_id: Option<u32>,

    pub oob_margin: f32,
    /// Continuous time outside the margin before out-of-bounds triggers.
    pub oob_grace: f32,
    pub oob_penalty_strokes: u32,
    pub oob_reset_delay_player: f32,
    pub oob_reset_delay_ghost: f32,

    /// Time the ghost waits at rest before taking its next shot.
    pub ghost_think_delay: f32,
    /// Distance a full-power ghost shot is expected to roll.
    pub ghost_shot_reach: f32,
    /// Maximum aim error of the ghost, in radians.
    pub ghost_aim_jitter: f32,
    pub ghost_trail_length: usize,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            ball_radius: BALL_RADIUS,
            max_speed: MAX_SPEED,
            max_shot_speed: MAX_SHOT_SPEED,
            max_frame_dt: MAX_FRAME_DT,
            min_velocity: MIN_VELOCITY,
            hole_downward_force: 60.0,
            hole_drag_slow: 0.85,
            hole_drag_fast: 0.75,
            hole_deep_y: -0.5,
            hole_settle_damping: 0.95,
            capture_max_speed: 5.0,
            capture_deep_y: -1.0,
            hazard_gravity: 150.0,
            hazard_oob_depth: -3.0,
            gravity: 30.0,
            ground_contact_damping: 0.95,
            slope_acceleration: 15.0,
            slope_sample_offset: 0.5,
            friction_slow: 0.92,
            friction_fast: 0.98,
            friction_blend_start: 1.0,
            friction_blend_end: 3.0,
            bounce_damping: 0.8,
            bumper_amplification: 2.0,
            fan_blade_thickness: 0.4,
            collision_epsilon: 0.001,
            moving_wall_transfer: false,
            magnet_safe_zone: 1.5,
            magnet_reference_fps: 60.0,
            teleport_cooldown: 0.5,
            narrative_pair_id: Some(3),
            oob_margin: 2.0,
            oob_grace: 0.35,
            oob_penalty_strokes: 2,
            oob_reset_delay_player: 1.0,
            oob_reset_delay_ghost: 0.5,
            ghost_think_delay: 1.0,
            ghost_shot_reach: 40.0,
            ghost_aim_jitter: 0.05,
            ghost_trail_length: 240,
        }
    }
}

impl PhysicsConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is missing
    /// or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("FAIRWAY_PHYSICS_CONFIG")
            .unwrap_or_else(|_| "config/physics.toml".to_string());
        Self::load_from(&path)
    }

    pub fn load_from(path: &str) -> Self {
        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<PhysicsConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    PhysicsConfig::default()
                },
            },
            Err(_) => PhysicsConfig::default(),
        }
    }

    /// Clamp a raw frame delta into `[0, max_frame_dt]`; non-finite deltas become 0.
    pub fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.max_frame_dt)
        } else {
            0.0
        }
    }

    /// Rolling friction multiplier for the given horizontal speed. Slow rolls
    /// bleed speed quickly, fast rolls coast.
    pub fn rolling_friction(&self, speed: f32) -> f32 {
        if speed <= self.friction_blend_start {
            self.friction_slow
        } else if speed >= self.friction_blend_end {
            self.friction_fast
        } else {
            let t = (speed - self.friction_blend_start)
                / (self.friction_blend_end - self.friction_blend_start);
            self.friction_slow + (self.friction_fast - self.friction_slow) * t
        }
    }

    pub fn oob_reset_delay(&self, is_player: bool) -> f32 {
        if is_player {
            self.oob_reset_delay_player
        } else {
            self.oob_reset_delay_ghost
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn friction_curve_endpoints_and_midpoint() {
        let cfg = PhysicsConfig::default();
        assert_eq!(cfg.rolling_friction(0.5), 0.92);
        assert_eq!(cfg.rolling_friction(10.0), 0.98);
        assert!((cfg.rolling_friction(2.0) - 0.95).abs() < 1e-6);
    }

    #[test]
    fn dt_is_capped_and_sanitized() {
        let cfg = PhysicsConfig::default();
        assert_eq!(cfg.clamp_dt(0.5), 0.1);
        assert_eq!(cfg.clamp_dt(-1.0), 0.0);
        assert_eq!(cfg.clamp_dt(f32::NAN), 0.0);
        assert_eq!(cfg.clamp_dt(0.016), 0.016);
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let cfg: PhysicsConfig = toml::from_str("bounce_damping = 0.5\n").unwrap();
        assert_eq!(cfg.bounce_damping, 0.5);
        assert_eq!(cfg.max_speed, MAX_SPEED);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let cfg = PhysicsConfig::load_from("/nonexistent/physics.toml");
        assert_eq!(cfg, PhysicsConfig::default());
    }
}
