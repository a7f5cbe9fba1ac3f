pub mod ball;
pub mod collision;
pub mod config;
pub mod course;
pub mod fields;
pub mod ghost;
pub mod integrator;
pub mod registry;
pub mod scoring;
pub mod session;
pub mod teleport;
pub mod terrain;

pub use ball::{Ball, BallPhase, Shot};
pub use config::PhysicsConfig;
pub use ghost::{AimAtHole, GhostSession, Scripted, ShotPolicy};
pub use registry::ObstacleRegistry;
pub use session::{CourseSession, FrameSnapshot, encode_snapshot};
