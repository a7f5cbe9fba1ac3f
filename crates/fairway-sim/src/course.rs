use fairway_core::level::{
    BoxWall, Bumper, CourseBounds, Fan, Hole, Level, MagneticField, MovingWall, Obstacle, Rect,
    RectHazard, RotatedWall, Teleporter, Terrain, WindZone,
};
use fairway_core::math::Vec3;

/// Thickness of the boundary walls on custom-wall levels.
const BOUNDARY_THICKNESS: f32 = 1.0;

/// The built-in demo holes, in play order.
pub fn builtin_levels() -> Vec<Level> {
    vec![
        straight_shot(),
        bumper_garden(),
        windmill(),
        dogleg_portal(),
        tilted_table(),
    ]
}

fn wall(x: f32, z: f32, width: f32, depth: f32) -> Obstacle {
    Obstacle::Wall(BoxWall { x, z, width, depth })
}

/// Four walls enclosing `[0, w] x [0, d]`. A level with custom walls gets no
/// perimeter, so it has to bring its own.
fn boundary_walls(w: f32, d: f32) -> Vec<Obstacle> {
    let t = BOUNDARY_THICKNESS;
    vec![
        wall(w * 0.5, -t * 0.5, w + 2.0 * t, t),
        wall(w * 0.5, d + t * 0.5, w + 2.0 * t, t),
        wall(-t * 0.5, d * 0.5, t, d),
        wall(w + t * 0.5, d * 0.5, t, d),
    ]
}

/// Hole 1: Straight Shot. Open rectangle, nothing in the way.
fn straight_shot() -> Level {
    let (w, d) = (20.0, 40.0);
    Level {
        name: "Straight Shot".to_string(),
        par: 2,
        bounds: CourseBounds::Rect(Rect::new(0.0, w, 0.0, d)),
        terrain: Terrain::Flat,
        hole: Hole::at(Vec3::flat(w * 0.5, 34.0)),
        start: Vec3::flat(w * 0.5, 5.0),
        obstacles: Vec::new(),
    }
}

/// Hole 2: Bumper Garden. A divider across the middle with a bumper on
/// either side of it and an angled deflector guarding the cup.
fn bumper_garden() -> Level {
    let (w, d) = (30.0, 50.0);
    let mut obstacles = boundary_walls(w, d);
    obstacles.push(wall(15.0, 25.0, 16.0, 1.0));
    obstacles.extend([
        Obstacle::Bumper(Bumper {
            position: Vec3::flat(4.0, 25.0),
            radius: 1.5,
            tube_radius: 0.5,
        }),
        Obstacle::Bumper(Bumper {
            position: Vec3::flat(26.0, 25.0),
            radius: 1.5,
            tube_radius: 0.5,
        }),
        Obstacle::RotatedWall(RotatedWall {
            position: Vec3::flat(15.0, 37.0),
            rotation: 0.6,
            width: 1.0,
            length: 6.0,
            height: 1.0,
        }),
    ]);
    Level {
        name: "Bumper Garden".to_string(),
        par: 3,
        bounds: CourseBounds::Rect(Rect::new(0.0, w, 0.0, d)),
        terrain: Terrain::Flat,
        hole: Hole::at(Vec3::flat(15.0, 45.0)),
        start: Vec3::flat(15.0, 5.0),
        obstacles,
    }
}

/// Hole 3: Windmill. Crosswind, a spinning fan, a sliding gate, and a magnet
/// around the cup.
fn windmill() -> Level {
    let (w, d) = (24.0, 60.0);
    Level {
        name: "Windmill".to_string(),
        par: 4,
        bounds: CourseBounds::Rect(Rect::new(0.0, w, 0.0, d)),
        terrain: Terrain::Flat,
        hole: Hole::at(Vec3::flat(12.0, 54.0)),
        start: Vec3::flat(12.0, 4.0),
        obstacles: vec![
            Obstacle::WindZone(WindZone {
                position: Vec3::new(12.0, 0.5, 14.0),
                size: Vec3::new(24.0, 2.0, 6.0),
                direction: Vec3::X,
                strength: 6.0,
            }),
            Obstacle::Fan(Fan {
                x: 12.0,
                z: 27.0,
                radius: 4.0,
                height: 2.0,
                num_blades: 4,
                rotation_speed: 1.5,
                push_strength: 12.0,
                blade_length_multiplier: 0.9,
            }),
            Obstacle::MovingWall(MovingWall {
                x: 12.0,
                z_center: 41.0,
                z_range: 3.0,
                width: 8.0,
                height: 1.0,
                depth: 1.0,
                speed: 1.2,
            }),
            Obstacle::MagneticField(MagneticField {
                position: Vec3::flat(12.0, 54.0),
                strength: 0.15,
                range: 6.0,
            }),
        ],
    }
}

/// Hole 4: Dogleg Portal. L-shaped course with a pit in the first arm, a
/// paired teleporter that skips the corner, and a one-way pad that sends
/// careless shots back to the tee.
fn dogleg_portal() -> Level {
    let pad = |position: Vec3, pair_id: u32, destination: Option<Vec3>| {
        Obstacle::Teleporter(Teleporter {
            position,
            pair_id,
            size: 2.0,
            is_one_way: destination.is_some(),
            destination,
        })
    };
    Level {
        name: "Dogleg Portal".to_string(),
        par: 4,
        bounds: CourseBounds::LShape {
            parts: [
                Rect::new(0.0, 14.0, 0.0, 60.0),
                Rect::new(0.0, 50.0, 46.0, 60.0),
            ],
        },
        terrain: Terrain::Flat,
        hole: Hole::at(Vec3::flat(44.0, 53.0)),
        start: Vec3::flat(7.0, 5.0),
        obstacles: vec![
            Obstacle::RectangularHazard(RectHazard {
                x: 7.0,
                z: 24.0,
                width: 6.0,
                length: 4.0,
            }),
            pad(Vec3::flat(7.0, 38.0), 3, None),
            pad(Vec3::flat(30.0, 53.0), 3, None),
            pad(Vec3::flat(12.0, 52.0), 9, Some(Vec3::flat(7.0, 5.0))),
        ],
    }
}

/// Hole 5: Tilted Table. The whole green slopes toward the cup.
fn tilted_table() -> Level {
    let terrain = Terrain::Plane {
        base: 2.0,
        slope_x: 0.0,
        slope_z: -0.05,
    };
    Level {
        name: "Tilted Table".to_string(),
        par: 2,
        bounds: CourseBounds::Rect(Rect::new(0.0, 30.0, 0.0, 40.0)),
        terrain,
        hole: Hole::at(Vec3::flat(18.0, 35.0)),
        start: Vec3::new(12.0, 1.75, 5.0),
        obstacles: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn builtin_levels_are_valid() {
        for level in builtin_levels() {
            let issues = level.validate();
            assert!(issues.is_empty(), "{}: {issues:?}", level.name);
        }
    }

    #[test]
    fn builtin_levels_have_unique_names() {
        let levels = builtin_levels();
        let names: HashSet<&str> = levels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names.len(), levels.len());
    }

    #[test]
    fn start_and_hole_lie_on_the_course() {
        for level in builtin_levels() {
            let (s, h) = (level.start, level.hole.position);
            assert!(
                level.bounds.contains_with_margin(s.x, s.z, 0.0),
                "{} start outside",
                level.name
            );
            assert!(
                level.bounds.contains_with_margin(h.x, h.z, 0.0),
                "{} hole outside",
                level.name
            );
        }
    }

    #[test]
    fn every_obstacle_kind_appears() {
        let kinds: HashSet<&str> = builtin_levels()
            .iter()
            .flat_map(|l| l.obstacles.iter().map(Obstacle::kind))
            .collect();
        for kind in [
            "wall",
            "rotated_wall",
            "bumper",
            "fan",
            "moving_wall",
            "magnetic_field",
            "wind_zone",
            "teleporter",
            "rectangular_hazard",
        ] {
            assert!(kinds.contains(kind), "no built-in level uses {kind}");
        }
    }
}
