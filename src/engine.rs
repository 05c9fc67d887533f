//! Engine boundary
//!
//! Wraps one run of the simulation with the host-facing contract:
//! lifecycle (`start` / `stop` / `reset`), fire-and-forget input commands,
//! a per-frame `step`, and observable outputs (observer callbacks plus a
//! pull-style event backlog and a serializable snapshot).
//!
//! The host never touches `GameState` mutably.

use std::collections::VecDeque;

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::error::EngineError;
use crate::settings::{RunConfig, Skin};
use crate::sim::{
    Command, EntityKind, GameEvent, GamePhase, GameState, LevelChange, PlayerState, RandomSource,
    RngState, TickInput, tick,
};

/// Maximum events kept for pull-style consumers between drains
pub const MAX_PUBLISHED_EVENTS: usize = 256;

/// Push-style outputs. All methods default to no-ops.
pub trait EngineObserver {
    /// Live coin count, after every pickup
    fn on_score(&mut self, _score: u32) {}

    fn on_level_changed(&mut self, _change: &LevelChange) {}

    /// Final coin count; called exactly once per run
    fn on_game_over(&mut self, _final_score: u32) {}
}

/// Read-only view of an entity for renderers
#[derive(Debug, Clone, Serialize)]
pub struct EntityView {
    pub id: u32,
    pub kind: EntityKind,
    pub pos: Vec2,
    pub size: Vec2,
}

/// Published state for renderers and HUDs
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub score: u32,
    pub distance: u64,
    /// Metres shown in the HUD
    pub display_distance: u64,
    pub level: u8,
    pub scroll_speed: f32,
    pub difficulty_multiplier: f32,
    pub player_state: PlayerState,
    pub player_pos: Vec2,
    pub player_size: Vec2,
    pub skin: Skin,
    pub tint: u32,
    pub entities: Vec<EntityView>,
}

/// One game, driven by the host's frame loop
pub struct Engine<R: RandomSource = Pcg32> {
    config: RunConfig,
    state: GameState,
    rng: R,
    input: TickInput,
    observers: Vec<Box<dyn EngineObserver>>,
    published: VecDeque<GameEvent>,
}

impl Engine<Pcg32> {
    /// Engine with a PCG source; the run is `Ready` until `start`
    pub fn new(config: RunConfig) -> Result<Self, EngineError> {
        // Placeholder seed; `replace_run` seeds every run
        Self::with_random(config, RngState::new(0).to_rng())
    }
}

impl<R: RandomSource> Engine<R> {
    /// Engine with an injected random source (scripted sources in tests)
    pub fn with_random(config: RunConfig, rng: R) -> Result<Self, EngineError> {
        config.validate()?;
        let mut engine = Self {
            state: GameState::new(&config, 0),
            config,
            rng,
            input: TickInput::default(),
            observers: Vec::new(),
            published: VecDeque::new(),
        };
        engine.replace_run();
        Ok(engine)
    }

    /// Begin a fresh run with `config`
    pub fn start(&mut self, config: RunConfig) -> Result<(), EngineError> {
        config.validate()?;
        self.config = config;
        self.replace_run();
        self.state.phase = GamePhase::Running;
        log::info!(
            "Run started (seed={}, skin={}, viewport={}x{})",
            self.state.seed,
            self.config.skin.as_str(),
            self.config.viewport.width,
            self.config.viewport.height
        );
        Ok(())
    }

    /// Halt the run; state is kept for display
    pub fn stop(&mut self) {
        if self.state.phase == GamePhase::Running {
            self.state.phase = GamePhase::Stopped;
            log::info!("Run stopped at {}m", self.state.display_distance());
        }
        self.input.clear();
    }

    /// Throw the current run away and return to `Ready`
    pub fn reset(&mut self) {
        self.replace_run();
        log::info!("Run reset");
    }

    /// Advance by one logical tick
    pub fn step(&mut self, delta_ms: f64) {
        if self.state.phase == GamePhase::Running {
            tick(&mut self.state, &self.input, delta_ms, &mut self.rng);
        }
        self.input.clear();
        self.dispatch_events();
    }

    pub fn jump(&mut self) {
        self.queue(Command::Jump);
    }

    pub fn slide_start(&mut self) {
        self.queue(Command::SlideStart);
    }

    pub fn slide_end(&mut self) {
        self.queue(Command::SlideEnd);
    }

    pub fn send(&mut self, command: Command) {
        self.queue(command);
    }

    pub fn add_observer(&mut self, observer: Box<dyn EngineObserver>) {
        self.observers.push(observer);
    }

    /// Events since the last drain, oldest first
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.published.drain(..).collect()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn level(&self) -> u8 {
        self.state.level()
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = &self.state;
        Snapshot {
            phase: state.phase,
            score: state.score,
            distance: state.distance(),
            display_distance: state.display_distance(),
            level: state.level(),
            scroll_speed: state.scroll_speed(),
            difficulty_multiplier: state.difficulty_multiplier(),
            player_state: state.player.state,
            player_pos: state.player.pos,
            player_size: state.player.hitbox().size,
            skin: state.skin,
            tint: state.skin.tint(),
            entities: state
                .entities
                .iter()
                .map(|e| EntityView {
                    id: e.id,
                    kind: e.kind,
                    pos: e.pos,
                    size: e.hitbox.size,
                })
                .collect(),
        }
    }

    fn queue(&mut self, command: Command) {
        if self.state.phase == GamePhase::Running {
            self.input.push(command);
        }
    }

    /// Replace the whole run state; nothing from the old run survives
    fn replace_run(&mut self) {
        let seed = self.config.seed.unwrap_or_else(rand::random);
        self.rng.reseed(seed);
        self.state = GameState::new(&self.config, seed);
        self.input.clear();
        self.published.clear();
    }

    fn dispatch_events(&mut self) {
        for event in self.state.take_events() {
            for observer in &mut self.observers {
                match &event {
                    GameEvent::CoinCollected { score } => observer.on_score(*score),
                    GameEvent::LevelChanged(change) => observer.on_level_changed(change),
                    GameEvent::GameOver { final_score, .. } => {
                        observer.on_game_over(*final_score)
                    }
                }
            }

            if self.published.len() >= MAX_PUBLISHED_EVENTS {
                self.published.pop_front();
                log::warn!("Event backlog full, dropping oldest event");
            }
            self.published.push_back(event);
        }
    }
}
