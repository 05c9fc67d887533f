//! Game state and core simulation types
//!
//! One `GameState` per run. A new run replaces it wholesale, so nothing
//! (entities, slide deadlines, spawn timers) can leak between runs.

use serde::{Deserialize, Serialize};

use super::clock::Clock;
use super::entity::{EntityKind, EntityPool};
use super::player::{Player, PlayerState};
use super::progression::{LevelChange, Progression};
use super::spawner::Spawner;
use crate::settings::{RunConfig, Skin, Viewport};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Fresh state, waiting for `start`
    Ready,
    /// Active gameplay
    Running,
    /// Halted by the host; state kept as-is
    Stopped,
    /// Run ended by a collision
    GameOver,
}

/// Something observable that happened during a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    /// A coin was picked up; `score` is the new coin count
    CoinCollected { score: u32 },
    LevelChanged(LevelChange),
    /// Terminal; emitted exactly once per run
    GameOver {
        final_score: u32,
        distance: u64,
        tick: u64,
        hit: EntityKind,
    },
}

/// Complete state of one run
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    /// Seed the run's random source was built from (if the engine owns it)
    pub seed: u64,
    /// Coins collected this run
    pub score: u32,
    pub progression: Progression,
    pub phase: GamePhase,
    pub clock: Clock,
    pub player: Player,
    pub entities: EntityPool,
    pub spawner: Spawner,
    pub viewport: Viewport,
    /// Cosmetic only
    pub skin: Skin,
    /// Events raised since the host last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Fresh run state, in `Ready`
    pub fn new(config: &RunConfig, seed: u64) -> Self {
        Self {
            seed,
            score: 0,
            progression: Progression::new(),
            phase: GamePhase::Ready,
            clock: Clock::new(),
            player: Player::new(config.viewport.floor_y()),
            entities: EntityPool::new(),
            spawner: Spawner::new(),
            viewport: config.viewport,
            skin: config.skin,
            events: Vec::new(),
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    pub fn player_state(&self) -> PlayerState {
        self.player.state
    }

    pub fn level(&self) -> u8 {
        self.progression.level
    }

    pub fn distance(&self) -> u64 {
        self.progression.distance
    }

    pub fn display_distance(&self) -> u64 {
        self.progression.display_distance()
    }

    pub fn scroll_speed(&self) -> f32 {
        self.progression.scroll_speed
    }

    pub fn difficulty_multiplier(&self) -> f32 {
        self.progression.difficulty_multiplier
    }

    /// Game time after which the next obstacle is due
    pub fn next_obstacle_spawn_at(&self) -> f64 {
        self.spawner
            .next_obstacle_at(self.progression.difficulty_multiplier)
    }

    /// Game time after which the next coin is due
    pub fn next_coin_spawn_at(&self) -> f64 {
        self.spawner
            .next_coin_at(self.progression.coin_cadence_multiplier())
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
