use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use fairway_core::events::GolfEvent;
use fairway_core::level::load_level_from_file;
use fairway_sim::course::builtin_levels;
use fairway_sim::scoring::ScoreTerm;
use fairway_sim::{AimAtHole, CourseSession, PhysicsConfig};

/// Simulation rate; one tick per rendered frame in the browser build.
const FRAME_RATE: f32 = 60.0;

#[derive(Parser)]
#[command(author, version, long_about = None)]
#[command(about = "Play a Fairway hole with the ghost opponent")]
struct Args {
    /// Index into the built-in levels
    #[arg(short, long, default_value_t = 0)]
    level: usize,

    /// Load a level from a JSON file instead of the built-ins
    #[arg(short, long)]
    file: Option<String>,

    /// Seed for the ghost's aim noise
    #[arg(short, long, default_value_t = 1)]
    seed: u64,

    /// Give up after this much simulated time
    #[arg(long, default_value_t = 120.0)]
    max_seconds: f32,

    /// Physics config TOML (defaults to FAIRWAY_PHYSICS_CONFIG or config/physics.toml)
    #[arg(short, long)]
    config: Option<String>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => PhysicsConfig::load_from(path),
        None => PhysicsConfig::load(),
    };

    let level = match &args.file {
        Some(path) => match load_level_from_file(path) {
            Ok(level) => level,
            Err(e) => {
                tracing::error!("Failed to load {path}: {e}");
                return ExitCode::FAILURE;
            },
        },
        None => {
            let mut levels = builtin_levels();
            if args.level >= levels.len() {
                tracing::error!(
                    "No built-in level {}, there are {}",
                    args.level,
                    levels.len()
                );
                return ExitCode::FAILURE;
            }
            levels.swap_remove(args.level)
        },
    };

    let par = level.par;
    let mut session = match CourseSession::new(level, config) {
        Ok(session) => session,
        Err(e) => {
            tracing::error!("Level is not playable: {e}");
            return ExitCode::FAILURE;
        },
    };
    let policy = AimAtHole::new(args.seed, session.config());
    session.spawn_ghost(Box::new(policy));

    let dt = 1.0 / FRAME_RATE;
    let max_ticks = (args.max_seconds.max(0.0) * FRAME_RATE) as u64;
    let mut holed = false;
    for tick in 0..max_ticks {
        for event in session.update(dt) {
            tracing::info!(time = tick as f32 * dt, "{event:?}");
            if matches!(event, GolfEvent::HoleCaptured { .. }) {
                holed = true;
            }
        }
        if holed {
            break;
        }
    }

    let Some(ghost) = session.ghost() else {
        return ExitCode::FAILURE;
    };
    let strokes = ghost.ball().strokes;
    if holed {
        tracing::info!(
            level = %session.level().name,
            strokes,
            par,
            "Ghost holed out: {:?}",
            ScoreTerm::classify(strokes, par)
        );
        ExitCode::SUCCESS
    } else {
        tracing::warn!(
            level = %session.level().name,
            strokes,
            "Ghost did not finish within {}s",
            args.max_seconds
        );
        ExitCode::FAILURE
    }
}
