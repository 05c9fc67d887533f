//! Transient world entities and the pool that owns them
//!
//! Obstacles, coins and ambient particles all live in one pool, iterated in
//! spawn (id) order. The player is not a pool entity.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::FrameDelta;
use super::hitbox::{Aabb, Hitbox};
use crate::consts::*;

/// Every kind of pooled entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Ground spike, jump over it
    LowObstacle,
    /// Overhang, slide under it
    OverheadObstacle,
    /// Void in the floor, jump across it
    PitObstacle,
    /// Two spikes with a gap, a long jump
    DoubleSpike,
    /// Tall barrier bobbing up and down
    OscillatingBarrier,
    Coin,
    /// Running dust behind the player (cosmetic)
    AmbientParticle,
}

/// What happens when the player touches an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityRole {
    /// Fatal on contact
    Obstacle,
    /// Collected on contact
    Collectible,
    /// Never collides
    Ambient,
}

impl EntityKind {
    pub fn role(self) -> EntityRole {
        match self {
            EntityKind::LowObstacle
            | EntityKind::OverheadObstacle
            | EntityKind::PitObstacle
            | EntityKind::DoubleSpike
            | EntityKind::OscillatingBarrier => EntityRole::Obstacle,
            EntityKind::Coin => EntityRole::Collectible,
            EntityKind::AmbientParticle => EntityRole::Ambient,
        }
    }

    pub fn is_obstacle(self) -> bool {
        self.role() == EntityRole::Obstacle
    }

    /// First level at which this kind may spawn
    pub fn unlock_level(self) -> u8 {
        match self {
            EntityKind::LowObstacle
            | EntityKind::OverheadObstacle
            | EntityKind::PitObstacle
            | EntityKind::Coin
            | EntityKind::AmbientParticle => 1,
            EntityKind::DoubleSpike => 2,
            EntityKind::OscillatingBarrier => 3,
        }
    }

    pub fn hitbox(self) -> Hitbox {
        match self {
            EntityKind::LowObstacle => Hitbox::new(20.0, 60.0),
            EntityKind::OverheadObstacle => Hitbox::new(130.0, 46.0),
            EntityKind::PitObstacle => Hitbox::new(170.0, 70.0),
            EntityKind::DoubleSpike => Hitbox::new(66.0, 60.0),
            EntityKind::OscillatingBarrier => Hitbox::new(28.0, 110.0),
            EntityKind::Coin => Hitbox::new(28.0, 28.0),
            EntityKind::AmbientParticle => Hitbox::NONE,
        }
    }

    /// How far past the right edge of the viewport this kind spawns
    pub fn lead_in(self) -> f32 {
        match self {
            EntityKind::LowObstacle => 50.0,
            EntityKind::OverheadObstacle => 80.0,
            EntityKind::PitObstacle => 90.0,
            EntityKind::DoubleSpike => 60.0,
            EntityKind::OscillatingBarrier => 70.0,
            EntityKind::Coin => 50.0,
            EntityKind::AmbientParticle => 0.0,
        }
    }

    /// Center height above the floor line at spawn (negative sits below it)
    pub fn rest_height(self) -> f32 {
        match self {
            EntityKind::LowObstacle => 32.0,
            // Underside 40 above the floor: clears a crouched runner only
            EntityKind::OverheadObstacle => 63.0,
            EntityKind::PitObstacle => -25.0,
            EntityKind::DoubleSpike => 32.0,
            EntityKind::OscillatingBarrier => 60.0,
            EntityKind::Coin => ((COIN_BAND_LOW + COIN_BAND_HIGH) / 2) as f32,
            EntityKind::AmbientParticle => 0.0,
        }
    }

    /// Entities left of this x are removed
    pub fn cull_x(self) -> f32 {
        match self.role() {
            EntityRole::Obstacle => OBSTACLE_CULL_X,
            EntityRole::Collectible | EntityRole::Ambient => COIN_CULL_X,
        }
    }

    /// Motion a freshly spawned entity of this kind starts with
    pub fn spawn_motion(self, spawn_y: f32) -> Motion {
        match self {
            EntityKind::OscillatingBarrier => Motion::Oscillate {
                base_y: spawn_y,
                age_ms: 0.0,
            },
            EntityKind::AmbientParticle => Motion::Fade {
                life_ms: PARTICLE_LIFETIME_MS,
            },
            EntityKind::LowObstacle
            | EntityKind::OverheadObstacle
            | EntityKind::PitObstacle
            | EntityKind::DoubleSpike
            | EntityKind::Coin => Motion::Linear,
        }
    }

    /// Whether horizontal velocity tracks the world scroll speed
    pub fn scrolls(self) -> bool {
        match self.role() {
            EntityRole::Obstacle | EntityRole::Collectible => true,
            EntityRole::Ambient => false,
        }
    }
}

/// Per-entity motion beyond horizontal scrolling
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Motion {
    /// Straight line at `vel`
    Linear,
    /// Sinusoidal bob above `base_y`, independent of scroll
    Oscillate { base_y: f32, age_ms: f32 },
    /// Fades out after `life_ms`
    Fade { life_ms: f32 },
}

impl Motion {
    /// Vertical offset of an oscillating entity (0 at rest, up to `-BARRIER_AMPLITUDE`)
    pub fn oscillation_offset(age_ms: f32) -> f32 {
        let phase = age_ms / BARRIER_PERIOD_MS * std::f32::consts::TAU;
        -BARRIER_AMPLITUDE * (1.0 - phase.cos()) * 0.5
    }
}

/// A pooled entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub vel: Vec2,
    pub hitbox: Hitbox,
    pub motion: Motion,
}

impl Entity {
    pub fn aabb(&self) -> Aabb {
        self.hitbox.at(self.pos)
    }

    fn is_expired(&self) -> bool {
        match self.motion {
            Motion::Fade { life_ms } => life_ms <= 0.0,
            Motion::Linear | Motion::Oscillate { .. } => false,
        }
    }
}

/// Owner of all transient entities for one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityPool {
    entities: Vec<Entity>,
    next_id: u32,
}

impl Default for EntityPool {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityPool {
    pub fn new() -> Self {
        Self {
            entities: Vec::new(),
            next_id: 1,
        }
    }

    /// Add an entity; returns its id
    pub fn spawn(&mut self, kind: EntityKind, pos: Vec2, vel: Vec2, motion: Motion) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.push(Entity {
            id,
            kind,
            pos,
            vel,
            hitbox: kind.hitbox(),
            motion,
        });
        id
    }

    /// Refresh every scrolling entity's velocity to the current world speed
    pub fn set_scroll_speed(&mut self, scroll_speed: f32) {
        for entity in self.entities.iter_mut().filter(|e| e.kind.scrolls()) {
            entity.vel.x = -scroll_speed;
        }
    }

    /// Integrate positions and per-kind motion over one whole tick
    pub fn advance(&mut self, frame: &FrameDelta) {
        let h = frame.substep_secs();
        for _ in 0..frame.substeps {
            self.advance_substep(h);
        }
    }

    /// Integrate one physics sub-step of `h` seconds
    pub fn advance_substep(&mut self, h: f32) {
        let h_ms = h * 1000.0;
        for entity in &mut self.entities {
            entity.pos += entity.vel * h;
            match &mut entity.motion {
                Motion::Linear => {}
                Motion::Oscillate { base_y, age_ms } => {
                    *age_ms += h_ms;
                    entity.pos.y = *base_y + Motion::oscillation_offset(*age_ms);
                }
                Motion::Fade { life_ms } => {
                    *life_ms -= h_ms;
                }
            }
        }
    }

    /// Remove everything past its cull line or expired; returns the count removed
    pub fn cull(&mut self) -> usize {
        let before = self.entities.len();
        self.entities
            .retain(|e| e.pos.x >= e.kind.cull_x() && !e.is_expired());
        before - self.entities.len()
    }

    /// Destroy one entity by id
    pub fn remove(&mut self, id: u32) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    pub fn get(&self, id: u32) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn with_role(&self, role: EntityRole) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.kind.role() == role)
    }

    pub fn count_role(&self, role: EntityRole) -> usize {
        self.with_role(role).count()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities that should already be gone (used by invariant checks)
    pub fn stale_count(&self) -> usize {
        self.entities
            .iter()
            .filter(|e| e.pos.x < e.kind.cull_x() || e.is_expired())
            .count()
    }
}
