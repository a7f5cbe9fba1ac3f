use fairway_core::level::Teleporter;
use fairway_core::math::Vec3;

use crate::registry::{ObstacleRegistry, TeleporterId};

/// A teleport that fired this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeleportHit {
    pub source: TeleporterId,
    pub destination: Vec3,
    pub pair_id: u32,
    pub is_one_way: bool,
    /// Pad the ball arrived on; `None` for one-way pads.
    pub target: Option<TeleporterId>,
}

/// Per-ball teleport bookkeeping.
///
/// After a teleport the pad the ball arrived on is ignored until the ball has
/// left it, so pairs never ping-pong. A short cooldown additionally suppresses
/// every pad.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeleportTracker {
    cooldown: f32,
    last_destination: Option<TeleporterId>,
}

impl TeleportTracker {
    pub fn cooldown(&self) -> f32 {
        self.cooldown
    }

    pub fn last_destination(&self) -> Option<TeleporterId> {
        self.last_destination
    }

    pub fn tick(&mut self, dt: f32) {
        self.cooldown = (self.cooldown - dt).max(0.0);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check `position` against every pad and fire at most one teleport.
    pub fn check(
        &mut self,
        position: Vec3,
        world: &ObstacleRegistry,
        cooldown: f32,
    ) -> Option<TeleportHit> {
        if let Some(id) = self.last_destination
            && !world.teleporter(id).is_some_and(|pad| on_pad(pad, position))
        {
            self.last_destination = None;
        }
        if self.cooldown > 0.0 {
            return None;
        }

        for (id, pad) in world.teleporters() {
            if self.last_destination == Some(id) || !on_pad(pad, position) {
                continue;
            }
            let (destination, target) = if pad.is_one_way {
                let Some(destination) = pad.destination else {
                    continue;
                };
                (destination, None)
            } else {
                let Some(partner) = world.partner_of(id) else {
                    continue;
                };
                let Some(other) = world.teleporter(partner) else {
                    continue;
                };
                (other.position, Some(partner))
            };

            self.cooldown = cooldown;
            self.last_destination = target;
            return Some(TeleportHit {
                source: id,
                destination,
                pair_id: pad.pair_id,
                is_one_way: pad.is_one_way,
                target,
            });
        }
        None
    }
}

fn on_pad(pad: &Teleporter, position: Vec3) -> bool {
    let half = pad.size * 0.5;
    (position.x - pad.position.x).abs() <= half && (position.z - pad.position.z).abs() <= half
}
