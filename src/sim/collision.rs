//! Player collision resolution
//!
//! Obstacles are checked before coins: if any obstacle overlaps the player
//! the tick is fatal and coins touched on the same tick are not collected.

use super::entity::{EntityKind, EntityPool, EntityRole};
use super::player::Player;

/// Outcome of checking the player against the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollisionOutcome {
    /// Nothing touched
    Clear,
    /// Hit an obstacle; the run is over
    Fatal { entity_id: u32, kind: EntityKind },
    /// Touched these coins (ids, spawn order)
    Collected(Vec<u32>),
}

/// Check the player's current hit-box against every solid entity
pub fn resolve(player: &Player, pool: &EntityPool) -> CollisionOutcome {
    let player_box = player.aabb();

    let fatal = pool
        .with_role(EntityRole::Obstacle)
        .find(|e| e.hitbox.is_solid() && e.aabb().overlaps(&player_box));
    if let Some(obstacle) = fatal {
        return CollisionOutcome::Fatal {
            entity_id: obstacle.id,
            kind: obstacle.kind,
        };
    }

    let coins: Vec<u32> = pool
        .with_role(EntityRole::Collectible)
        .filter(|e| e.hitbox.is_solid() && e.aabb().overlaps(&player_box))
        .map(|e| e.id)
        .collect();

    if coins.is_empty() {
        CollisionOutcome::Clear
    } else {
        CollisionOutcome::Collected(coins)
    }
}
