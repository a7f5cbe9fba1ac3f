use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Hole capture radius in world units.
pub const HOLE_RADIUS: f32 = 2.0;

/// An axis-aligned rectangle on the XZ plane.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Rect {
    pub min_x: f32,
    pub max_x: f32,
    pub min_z: f32,
    pub max_z: f32,
}

impl Rect {
    pub const fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// Rectangle of the given size centered on `(x, z)`.
    pub fn centered(x: f32, z: f32, width: f32, depth: f32) -> Self {
        Self::new(
            x - width * 0.5,
            x + width * 0.5,
            z - depth * 0.5,
            z + depth * 0.5,
        )
    }

    /// Shrink (positive) or grow (negative) every side by `amount`.
    pub fn inset(&self, amount: f32) -> Self {
        Self::new(
            self.min_x + amount,
            self.max_x - amount,
            self.min_z + amount,
            self.max_z - amount,
        )
    }

    pub fn contains(&self, x: f32, z: f32) -> bool {
        x >= self.min_x && x <= self.max_x && z >= self.min_z && z <= self.max_z
    }

    pub fn overlaps(&self, other: &Rect) -> bool {
        self.min_x <= other.max_x
            && self.max_x >= other.min_x
            && self.min_z <= other.max_z
            && self.max_z >= other.min_z
    }

    fn is_well_formed(&self) -> bool {
        [self.min_x, self.max_x, self.min_z, self.max_z]
            .iter()
            .all(|v| v.is_finite())
            && self.min_x < self.max_x
            && self.min_z < self.max_z
    }
}

/// Playable course outline used for perimeter collision and out-of-bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum CourseBounds {
    Rect(Rect),
    /// Union of two overlapping rectangles (the L-shaped course).
    LShape { parts: [Rect; 2] },
}

impl CourseBounds {
    pub fn parts(&self) -> &[Rect] {
        match self {
            Self::Rect(r) => std::slice::from_ref(r),
            Self::LShape { parts } => parts,
        }
    }

    /// Whether `(x, z)` lies within the outline grown by `margin`.
    pub fn contains_with_margin(&self, x: f32, z: f32, margin: f32) -> bool {
        self.parts()
            .iter()
            .any(|r| r.inset(-margin).contains(x, z))
    }
}

/// Ground height profile.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Terrain {
    #[default]
    Flat,
    /// Tilted plane: `height = base + slope_x * x + slope_z * z`.
    Plane { base: f32, slope_x: f32, slope_z: f32 },
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Hole {
    pub position: Vec3,
    #[serde(default = "default_hole_radius")]
    pub radius: f32,
}

fn default_hole_radius() -> f32 {
    HOLE_RADIUS
}

impl Hole {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            radius: HOLE_RADIUS,
        }
    }
}

/// Axis-aligned wall given by center and footprint; unbounded vertically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoxWall {
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub depth: f32,
}

/// Wall rotated about Y. `position.y` is the base of the wall.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RotatedWall {
    pub position: Vec3,
    pub rotation: f32,
    pub width: f32,
    pub length: f32,
    pub height: f32,
}

/// Torus bumper lying flat; `radius` is the ring radius, `tube_radius` its thickness.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bumper {
    pub position: Vec3,
    pub radius: f32,
    pub tube_radius: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Fan {
    pub x: f32,
    pub z: f32,
    pub radius: f32,
    pub height: f32,
    pub num_blades: u32,
    /// Radians per second.
    pub rotation_speed: f32,
    pub push_strength: f32,
    #[serde(default = "default_blade_length_multiplier")]
    pub blade_length_multiplier: f32,
}

fn default_blade_length_multiplier() -> f32 {
    1.0
}

/// Wall oscillating along Z around `z_center`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MovingWall {
    pub x: f32,
    pub z_center: f32,
    pub z_range: f32,
    pub width: f32,
    pub height: f32,
    pub depth: f32,
    pub speed: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct MagneticField {
    pub position: Vec3,
    pub strength: f32,
    pub range: f32,
}

/// Box volume applying a uniform acceleration.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WindZone {
    pub position: Vec3,
    pub size: Vec3,
    pub direction: Vec3,
    pub strength: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Teleporter {
    pub position: Vec3,
    pub pair_id: u32,
    pub size: f32,
    #[serde(default)]
    pub is_one_way: bool,
    #[serde(default)]
    pub destination: Option<Vec3>,
}

/// Rectangular pit; `width` spans X and `length` spans Z.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RectHazard {
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub length: f32,
}

impl RectHazard {
    pub fn footprint(&self) -> Rect {
        Rect::centered(self.x, self.z, self.width, self.length)
    }
}

/// Every obstacle a level can place, decoupled from any render handle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Obstacle {
    Wall(BoxWall),
    RotatedWall(RotatedWall),
    Bumper(Bumper),
    Fan(Fan),
    MovingWall(MovingWall),
    MagneticField(MagneticField),
    WindZone(WindZone),
    Teleporter(Teleporter),
    RectangularHazard(RectHazard),
}

impl Obstacle {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Wall(_) => "wall",
            Self::RotatedWall(_) => "rotated_wall",
            Self::Bumper(_) => "bumper",
            Self::Fan(_) => "fan",
            Self::MovingWall(_) => "moving_wall",
            Self::MagneticField(_) => "magnetic_field",
            Self::WindZone(_) => "wind_zone",
            Self::Teleporter(_) => "teleporter",
            Self::RectangularHazard(_) => "rectangular_hazard",
        }
    }

    /// Describe the first thing wrong with this descriptor, if anything.
    pub fn problem(&self) -> Option<&'static str> {
        let finite = |values: &[f32]| values.iter().all(|v| v.is_finite());
        match self {
            Self::Wall(w) => {
                if !finite(&[w.x, w.z, w.width, w.depth]) {
                    Some("non-finite geometry")
                } else if w.width <= 0.0 || w.depth <= 0.0 {
                    Some("footprint must be positive")
                } else {
                    None
                }
            },
            Self::RotatedWall(w) => {
                if !w.position.is_finite() || !finite(&[w.rotation, w.width, w.length, w.height])
                {
                    Some("non-finite geometry")
                } else if w.width <= 0.0 || w.length <= 0.0 || w.height <= 0.0 {
                    Some("extents must be positive")
                } else {
                    None
                }
            },
            Self::Bumper(b) => {
                if !b.position.is_finite() || !finite(&[b.radius, b.tube_radius]) {
                    Some("non-finite geometry")
                } else if b.tube_radius <= 0.0 || b.radius < b.tube_radius {
                    Some("ring radius must cover a positive tube radius")
                } else {
                    None
                }
            },
            Self::Fan(f) => {
                if !finite(&[
                    f.x,
                    f.z,
                    f.radius,
                    f.height,
                    f.rotation_speed,
                    f.push_strength,
                    f.blade_length_multiplier,
                ]) {
                    Some("non-finite geometry")
                } else if f.num_blades == 0 {
                    Some("fan needs at least one blade")
                } else if f.radius <= 0.0 || f.height <= 0.0 || f.blade_length_multiplier <= 0.0 {
                    Some("extents must be positive")
                } else {
                    None
                }
            },
            Self::MovingWall(w) => {
                if !finite(&[
                    w.x, w.z_center, w.z_range, w.width, w.height, w.depth, w.speed,
                ]) {
                    Some("non-finite geometry")
                } else if w.width <= 0.0 || w.height <= 0.0 || w.depth <= 0.0 {
                    Some("extents must be positive")
                } else {
                    None
                }
            },
            Self::MagneticField(m) => {
                if !m.position.is_finite() || !finite(&[m.strength, m.range]) {
                    Some("non-finite geometry")
                } else if m.range <= 0.0 {
                    Some("range must be positive")
                } else {
                    None
                }
            },
            Self::WindZone(w) => {
                if !w.position.is_finite() || !w.size.is_finite() || !w.direction.is_finite() {
                    Some("non-finite geometry")
                } else if !w.strength.is_finite() {
                    Some("non-finite strength")
                } else if w.size.x <= 0.0 || w.size.y <= 0.0 || w.size.z <= 0.0 {
                    Some("volume must be positive")
                } else {
                    None
                }
            },
            Self::Teleporter(t) => {
                if !t.position.is_finite() || !t.size.is_finite() {
                    Some("non-finite geometry")
                } else if t.size <= 0.0 {
                    Some("pad size must be positive")
                } else if t.is_one_way && !t.destination.is_some_and(Vec3::is_finite) {
                    Some("one-way teleporter needs a finite destination")
                } else {
                    None
                }
            },
            Self::RectangularHazard(h) => {
                if !finite(&[h.x, h.z, h.width, h.length]) {
                    Some("non-finite geometry")
                } else if h.width <= 0.0 || h.length <= 0.0 {
                    Some("footprint must be positive")
                } else {
                    None
                }
            },
        }
    }
}

/// Complete in-memory description of one hole, supplied at load time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Level {
    pub name: String,
    #[serde(default = "default_par")]
    pub par: u8,
    pub bounds: CourseBounds,
    #[serde(default)]
    pub terrain: Terrain,
    pub hole: Hole,
    pub start: Vec3,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

fn default_par() -> u8 {
    3
}

/// A problem found while validating a level. `obstacle` is the index into
/// `Level::obstacles`, or `None` for level-wide fields.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelIssue {
    pub obstacle: Option<usize>,
    pub kind: &'static str,
    pub problem: String,
}

impl LevelIssue {
    /// Level-wide issues make the level unplayable; obstacle issues only
    /// drop the offending obstacle.
    pub fn is_fatal(&self) -> bool {
        self.obstacle.is_none()
    }
}

impl fmt::Display for LevelIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.obstacle {
            Some(i) => write!(f, "{} #{i}: {}", self.kind, self.problem),
            None => write!(f, "{}: {}", self.kind, self.problem),
        }
    }
}

impl Level {
    /// Check every field, returning all issues found (empty when valid).
    pub fn validate(&self) -> Vec<LevelIssue> {
        let mut issues = Vec::new();
        let mut level_issue = |kind: &'static str, problem: &str| {
            issues.push(LevelIssue {
                obstacle: None,
                kind,
                problem: problem.to_string(),
            });
        };

        if !self.bounds.parts().iter().all(Rect::is_well_formed) {
            level_issue("bounds", "rectangles must be finite with min < max");
        }
        if let CourseBounds::LShape { parts: [a, b] } = &self.bounds
            && !a.overlaps(b)
        {
            level_issue("bounds", "L-shape rectangles must overlap");
        }
        let radius = self.hole.radius;
        if !self.hole.position.is_finite() || !radius.is_finite() || radius <= 0.0 {
            level_issue("hole", "position must be finite and radius positive");
        }
        if !self.start.is_finite() {
            level_issue("start", "start position must be finite");
        }
        if let Terrain::Plane {
            base,
            slope_x,
            slope_z,
        } = self.terrain
            && !(base.is_finite() && slope_x.is_finite() && slope_z.is_finite())
        {
            level_issue("terrain", "plane coefficients must be finite");
        }

        for (i, obstacle) in self.obstacles.iter().enumerate() {
            if let Some(problem) = obstacle.problem() {
                issues.push(LevelIssue {
                    obstacle: Some(i),
                    kind: obstacle.kind(),
                    problem: problem.to_string(),
                });
            }
        }

        // Paired teleporters need exactly one partner.
        for (i, obstacle) in self.obstacles.iter().enumerate() {
            let Obstacle::Teleporter(t) = obstacle else {
                continue;
            };
            if t.is_one_way {
                continue;
            }
            let partners = self
                .obstacles
                .iter()
                .enumerate()
                .filter(|(j, o)| match o {
                    Obstacle::Teleporter(p) => *j != i && !p.is_one_way && p.pair_id == t.pair_id,
                    _ => false,
                })
                .count();
            if partners != 1 {
                issues.push(LevelIssue {
                    obstacle: Some(i),
                    kind: "teleporter",
                    problem: format!("pair {} has {partners} partners, expected 1", t.pair_id),
                });
            }
        }

        issues
    }
}

/// Errors raised while loading a level description from disk.
#[derive(Debug)]
pub enum LevelError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Invalid(Vec<LevelIssue>),
}

impl fmt::Display for LevelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "failed to read level: {e}"),
            Self::Parse(e) => write!(f, "failed to parse level: {e}"),
            Self::Invalid(issues) => {
                write!(f, "level is unplayable:")?;
                for issue in issues {
                    write!(f, " [{issue}]")?;
                }
                Ok(())
            },
        }
    }
}

impl std::error::Error for LevelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            Self::Invalid(_) => None,
        }
    }
}

impl From<std::io::Error> for LevelError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for LevelError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Parse a level from JSON. Obstacle-level issues are logged and left for the
/// obstacle registry to drop; level-wide issues reject the level.
pub fn parse_level(json: &str) -> Result<Level, LevelError> {
    let level: Level = serde_json::from_str(json)?;
    let (fatal, soft): (Vec<_>, Vec<_>) =
        level.validate().into_iter().partition(LevelIssue::is_fatal);
    for issue in &soft {
        tracing::warn!(level = %level.name, "{issue}");
    }
    if !fatal.is_empty() {
        return Err(LevelError::Invalid(fatal));
    }
    Ok(level)
}

/// Load a level from a JSON file.
pub fn load_level_from_file(path: &str) -> Result<Level, LevelError> {
    let content = std::fs::read_to_string(path)?;
    parse_level(&content)
}
