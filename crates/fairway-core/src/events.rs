use serde::{Deserialize, Serialize};

use crate::math::Vec3;

/// Which ball an event or snapshot refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallKind {
    Player,
    Ghost,
}

impl BallKind {
    pub fn is_player(self) -> bool {
        self == Self::Player
    }
}

/// Notifications emitted by the simulation for the rendering/UI layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GolfEvent {
    StrokeTaken {
        ball: BallKind,
        strokes: u32,
    },
    HoleCaptured {
        ball: BallKind,
        strokes: u32,
    },
    /// `strokes` already includes the penalty.
    OutOfBounds {
        ball: BallKind,
        strokes: u32,
    },
    Teleported {
        ball: BallKind,
        pair_id: u32,
        destination: Vec3,
        /// Set when the player uses the pair that drives the story cutscene.
        narrative: bool,
    },
    /// Ball placed back at the level start after an out-of-bounds delay.
    BallReset {
        ball: BallKind,
        position: Vec3,
    },
}

impl GolfEvent {
    pub fn ball(&self) -> BallKind {
        match self {
            Self::StrokeTaken { ball, .. }
            | Self::HoleCaptured { ball, .. }
            | Self::OutOfBounds { ball, .. }
            | Self::Teleported { ball, .. }
            | Self::BallReset { ball, .. } => *ball,
        }
    }
}
