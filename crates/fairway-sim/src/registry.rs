use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};

use fairway_core::level::{
    BoxWall, Bumper, CourseBounds, Fan, Hole, Level, MagneticField, MovingWall, Obstacle, Rect,
    RectHazard, RotatedWall, Teleporter, Terrain, WindZone,
};
use fairway_core::math::Vec3;

/// Index of a teleporter within the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TeleporterId(pub usize);

/// Rotated wall plus its world-space footprint for broad-phase rejection.
#[derive(Debug, Clone, Copy)]
pub struct RotatedWallGeom {
    pub wall: RotatedWall,
    pub bounds: Rect,
}

impl RotatedWallGeom {
    fn new(wall: RotatedWall) -> Self {
        let (sin, cos) = wall.rotation.sin_cos();
        let hw = wall.width * 0.5;
        let hl = wall.length * 0.5;
        let ex = cos.abs() * hw + sin.abs() * hl;
        let ez = sin.abs() * hw + cos.abs() * hl;
        Self {
            wall,
            bounds: Rect::new(
                wall.position.x - ex,
                wall.position.x + ex,
                wall.position.z - ez,
                wall.position.z + ez,
            ),
        }
    }
}

/// A fan and its accumulated blade rotation.
#[derive(Debug, Clone, Copy)]
pub struct FanState {
    pub fan: Fan,
    pub angle: f32,
}

/// One fan blade as an oriented box. Local +X runs from the hub to the tip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blade {
    pub center: Vec3,
    pub angle: f32,
    pub half_extents: Vec3,
}

impl FanState {
    pub fn hub(&self) -> Vec3 {
        Vec3::new(self.fan.x, 0.0, self.fan.z)
    }

    pub fn blade_length(&self) -> f32 {
        self.fan.radius * self.fan.blade_length_multiplier
    }

    /// Current blade boxes, recomputed from the accumulated angle.
    pub fn blades(&self, thickness: f32) -> impl Iterator<Item = Blade> + '_ {
        let n = self.fan.num_blades.max(1);
        let length = self.blade_length();
        let hub = Vec3::new(self.fan.x, self.fan.height * 0.5, self.fan.z);
        (0..n).map(move |i| {
            let angle = self.angle + i as f32 * TAU / n as f32;
            Blade {
                center: hub + Vec3::X.rotate_y(angle) * (length * 0.5),
                angle,
                half_extents: Vec3::new(length * 0.5, self.fan.height * 0.5, thickness * 0.5),
            }
        })
    }

    /// Velocity of the blade surface at `point` (`omega x r` about the hub).
    pub fn surface_velocity(&self, point: Vec3) -> Vec3 {
        let r = point - self.hub();
        let omega = self.fan.rotation_speed;
        Vec3::new(omega * r.z, 0.0, -omega * r.x)
    }
}

/// Where a moving wall is right now and how fast it is travelling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingWallState {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub velocity: Vec3,
}

impl MovingWallState {
    pub fn sample(wall: &MovingWall, time: f32) -> Self {
        let phase = time * wall.speed;
        Self {
            center: Vec3::new(
                wall.x,
                wall.height * 0.5,
                wall.z_center + phase.sin() * wall.z_range,
            ),
            half_extents: Vec3::new(wall.width * 0.5, wall.height * 0.5, wall.depth * 0.5),
            velocity: Vec3::new(0.0, 0.0, phase.cos() * wall.z_range * wall.speed),
        }
    }
}

/// All collision-relevant geometry for the loaded level.
///
/// Built once per level load and replaced wholesale on the next load. During a
/// frame the physics step only ever sees `&ObstacleRegistry`; animation
/// (`advance`) happens between steps.
#[derive(Debug, Clone)]
pub struct ObstacleRegistry {
    bounds: CourseBounds,
    terrain: Terrain,
    hole: Hole,
    start: Vec3,
    walls: Vec<BoxWall>,
    rotated_walls: Vec<RotatedWallGeom>,
    bumpers: Vec<Bumper>,
    fans: Vec<FanState>,
    moving_walls: Vec<MovingWall>,
    magnetic_fields: Vec<MagneticField>,
    wind_zones: Vec<WindZone>,
    teleporters: Vec<Teleporter>,
    hazards: Vec<RectHazard>,
    elapsed: f32,
}

impl ObstacleRegistry {
    /// Build the registry, dropping any obstacle that fails validation.
    pub fn from_level(level: &Level) -> Self {
        let rejected: Vec<usize> = level
            .validate()
            .into_iter()
            .filter_map(|issue| {
                let index = issue.obstacle?;
                tracing::warn!(level = %level.name, "Dropping obstacle: {issue}");
                Some(index)
            })
            .collect();

        let mut registry = Self {
            bounds: level.bounds.clone(),
            terrain: level.terrain,
            hole: level.hole,
            start: level.start,
            walls: Vec::new(),
            rotated_walls: Vec::new(),
            bumpers: Vec::new(),
            fans: Vec::new(),
            moving_walls: Vec::new(),
            magnetic_fields: Vec::new(),
            wind_zones: Vec::new(),
            teleporters: Vec::new(),
            hazards: Vec::new(),
            elapsed: 0.0,
        };

        for (i, obstacle) in level.obstacles.iter().enumerate() {
            if rejected.contains(&i) {
                continue;
            }
            match *obstacle {
                Obstacle::Wall(w) => registry.walls.push(w),
                Obstacle::RotatedWall(w) => registry.rotated_walls.push(RotatedWallGeom::new(w)),
                Obstacle::Bumper(b) => registry.bumpers.push(b),
                Obstacle::Fan(fan) => registry.fans.push(FanState { fan, angle: 0.0 }),
                Obstacle::MovingWall(w) => registry.moving_walls.push(w),
                Obstacle::MagneticField(m) => registry.magnetic_fields.push(m),
                Obstacle::WindZone(w) => registry.wind_zones.push(w),
                Obstacle::Teleporter(t) => registry.teleporters.push(t),
                Obstacle::RectangularHazard(h) => registry.hazards.push(h),
            }
        }

        tracing::debug!(
            level = %level.name,
            walls = registry.walls.len(),
            bumpers = registry.bumpers.len(),
            fans = registry.fans.len(),
            teleporters = registry.teleporters.len(),
            dropped = rejected.len(),
            "Obstacle registry built"
        );
        registry
    }

    /// Advance animated obstacles (fan blades, moving walls) by `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.elapsed += dt;
        for state in &mut self.fans {
            state.angle = (state.angle + state.fan.rotation_speed * dt).rem_euclid(TAU);
        }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    pub fn bounds(&self) -> &CourseBounds {
        &self.bounds
    }

    pub fn terrain(&self) -> &Terrain {
        &self.terrain
    }

    pub fn hole(&self) -> &Hole {
        &self.hole
    }

    pub fn start(&self) -> Vec3 {
        self.start
    }

    /// Levels with their own wall list skip the perimeter walls entirely.
    pub fn has_custom_walls(&self) -> bool {
        !self.walls.is_empty()
    }

    pub fn walls(&self) -> &[BoxWall] {
        &self.walls
    }

    pub fn rotated_walls(&self) -> &[RotatedWallGeom] {
        &self.rotated_walls
    }

    pub fn bumpers(&self) -> &[Bumper] {
        &self.bumpers
    }

    pub fn fans(&self) -> &[FanState] {
        &self.fans
    }

    pub fn magnetic_fields(&self) -> &[MagneticField] {
        &self.magnetic_fields
    }

    pub fn wind_zones(&self) -> &[WindZone] {
        &self.wind_zones
    }

    pub fn hazards(&self) -> &[RectHazard] {
        &self.hazards
    }

    pub fn moving_walls(&self) -> impl Iterator<Item = MovingWallState> + '_ {
        self.moving_walls
            .iter()
            .map(|w| MovingWallState::sample(w, self.elapsed))
    }

    /// Current state of one moving wall, or `None` for an unknown index.
    pub fn moving_wall_state(&self, index: usize) -> Option<MovingWallState> {
        let Some(wall) = self.moving_walls.get(index) else {
            tracing::debug!(index, "Ignoring lookup of unknown moving wall");
            return None;
        };
        Some(MovingWallState::sample(wall, self.elapsed))
    }

    pub fn teleporters(&self) -> impl Iterator<Item = (TeleporterId, &Teleporter)> {
        self.teleporters
            .iter()
            .enumerate()
            .map(|(i, t)| (TeleporterId(i), t))
    }

    pub fn teleporter(&self, id: TeleporterId) -> Option<&Teleporter> {
        self.teleporters.get(id.0)
    }

    /// The other end of a paired teleporter.
    pub fn partner_of(&self, id: TeleporterId) -> Option<TeleporterId> {
        let pad = self.teleporter(id)?;
        if pad.is_one_way {
            return None;
        }
        self.teleporters()
            .find(|(other, t)| *other != id && !t.is_one_way && t.pair_id == pad.pair_id)
            .map(|(other, _)| other)
    }

    pub fn is_over_hole(&self, position: Vec3) -> bool {
        position.distance_xz(self.hole.position) < self.hole.radius
    }

    pub fn is_over_hazard(&self, position: Vec3) -> bool {
        self.hazards
            .iter()
            .any(|h| h.footprint().contains(position.x, position.z))
    }
}

#[cfg(test)]
mod tests {
    use fairway_core::level::Obstacle;
    use fairway_core::test_helpers::course_with;

    use super::*;

    fn fan(num_blades: u32) -> Fan {
        Fan {
            x: 10.0,
            z: 10.0,
            radius: 4.0,
            height: 2.0,
            num_blades,
            rotation_speed: 1.0,
            push_strength: 5.0,
            blade_length_multiplier: 1.0,
        }
    }

    #[test]
    fn invalid_obstacles_are_dropped() {
        let level = course_with(vec![
            Obstacle::Fan(fan(0)),
            Obstacle::Fan(fan(3)),
            Obstacle::Wall(BoxWall {
                x: 5.0,
                z: 5.0,
                width: -1.0,
                depth: 2.0,
            }),
        ]);
        let registry = ObstacleRegistry::from_level(&level);
        assert_eq!(registry.fans().len(), 1);
        assert!(registry.walls().is_empty());
        assert!(!registry.has_custom_walls());
    }

    #[test]
    fn blades_spread_evenly_and_rotate() {
        let level = course_with(vec![Obstacle::Fan(fan(4))]);
        let mut registry = ObstacleRegistry::from_level(&level);
        let before: Vec<Blade> = registry.fans()[0].blades(0.4).collect();
        assert_eq!(before.len(), 4);
        assert!((before[1].angle - before[0].angle - TAU / 4.0).abs() < 1e-5);
        // First blade points along +X at angle 0.
        assert!((before[0].center.x - 12.0).abs() < 1e-5);

        registry.advance(0.5);
        let after: Vec<Blade> = registry.fans()[0].blades(0.4).collect();
        assert!((after[0].angle - 0.5).abs() < 1e-5);
    }

    #[test]
    fn blade_surface_velocity_matches_rotation() {
        let state = FanState {
            fan: fan(2),
            angle: 0.0,
        };
        // A point on +X moves toward -Z for positive rotation about +Y.
        let v = state.surface_velocity(Vec3::flat(13.0, 10.0));
        assert!(v.z < 0.0 && v.x.abs() < 1e-6, "got {v:?}");
        assert!((v.z + 3.0).abs() < 1e-5);
    }

    #[test]
    fn moving_wall_oscillates() {
        let wall = MovingWall {
            x: 0.0,
            z_center: 10.0,
            z_range: 4.0,
            width: 2.0,
            height: 1.0,
            depth: 1.0,
            speed: 2.0,
        };
        let at_rest = MovingWallState::sample(&wall, 0.0);
        assert_eq!(at_rest.center.z, 10.0);
        assert_eq!(at_rest.velocity.z, 8.0);
        let quarter = MovingWallState::sample(&wall, std::f32::consts::FRAC_PI_4);
        assert!((quarter.center.z - 14.0).abs() < 1e-4);
        assert!(quarter.velocity.z.abs() < 1e-4);
    }

    #[test]
    fn unknown_moving_wall_lookup_is_none() {
        let registry = ObstacleRegistry::from_level(&course_with(Vec::new()));
        assert!(registry.moving_wall_state(3).is_none());
    }

    #[test]
    fn rotated_wall_bounds_cover_corners() {
        let geom = RotatedWallGeom::new(RotatedWall {
            position: Vec3::flat(0.0, 0.0),
            rotation: std::f32::consts::FRAC_PI_4,
            width: 2.0,
            length: 2.0,
            height: 1.0,
        });
        let half_diag = 2.0_f32.sqrt();
        assert!((geom.bounds.max_x - half_diag).abs() < 1e-5);
        assert!((geom.bounds.min_z + half_diag).abs() < 1e-5);
    }

    #[test]
    fn partner_lookup() {
        let pad = |x: f32, pair_id: u32| {
            Obstacle::Teleporter(Teleporter {
                position: Vec3::flat(x, 20.0),
                pair_id,
                size: 2.0,
                is_one_way: false,
                destination: None,
            })
        };
        let level = course_with(vec![pad(5.0, 1), pad(10.0, 2), pad(30.0, 1), pad(35.0, 2)]);
        let registry = ObstacleRegistry::from_level(&level);
        assert_eq!(registry.partner_of(TeleporterId(0)), Some(TeleporterId(2)));
        assert_eq!(registry.partner_of(TeleporterId(3)), Some(TeleporterId(1)));
        assert_eq!(registry.partner_of(TeleporterId(9)), None);
    }
}
