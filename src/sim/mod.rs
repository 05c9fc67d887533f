//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only from the host-supplied delta
//! - Gameplay randomness only through `RandomSource`
//! - Stable iteration order (by entity id)
//! - No rendering, storage or platform dependencies

pub mod clock;
pub mod collision;
pub mod entity;
pub mod hitbox;
pub mod player;
pub mod progression;
pub mod rng;
pub mod spawner;
pub mod state;
pub mod tick;

pub use clock::{Clock, FrameDelta};
pub use collision::{CollisionOutcome, resolve};
pub use entity::{Entity, EntityKind, EntityPool, EntityRole, Motion};
pub use hitbox::{Aabb, Hitbox};
pub use player::{Player, PlayerState};
pub use progression::{LevelChange, Progression, level_message};
pub use rng::{RandomSource, RngState, ScriptedRandom};
pub use spawner::{Spawner, VARIANT_TABLE, pick_obstacle, unlocked_variants};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{Command, TickInput, tick};
