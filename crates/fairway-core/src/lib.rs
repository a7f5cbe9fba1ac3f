pub mod events;
pub mod level;
pub mod math;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use crate::level::{CourseBounds, Hole, Level, Obstacle, Rect, Terrain};
    use crate::math::Vec3;

    /// Empty rectangular course `[0, width] x [0, depth]` with the start near
    /// the low-Z end and the hole near the high-Z end.
    pub fn open_course(width: f32, depth: f32) -> Level {
        Level {
            name: format!("Open {width}x{depth}"),
            par: 3,
            bounds: CourseBounds::Rect(Rect::new(0.0, width, 0.0, depth)),
            terrain: Terrain::Flat,
            hole: Hole::at(Vec3::flat(width * 0.5, depth - 5.0)),
            start: Vec3::flat(width * 0.5, 5.0),
            obstacles: Vec::new(),
        }
    }

    /// A 40x80 open course with the given obstacles placed on it.
    pub fn course_with(obstacles: Vec<Obstacle>) -> Level {
        Level {
            obstacles,
            ..open_course(40.0, 80.0)
        }
    }

    /// Same as `course_with`, with the hole moved far out of the way so tests
    /// of other obstacles never get captured.
    pub fn course_without_hole(obstacles: Vec<Obstacle>) -> Level {
        let mut level = course_with(obstacles);
        level.hole = Hole::at(Vec3::flat(-500.0, -500.0));
        level
    }
}
