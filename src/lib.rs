//! Neon Runner - side-scrolling jump/slide runner simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (player physics, spawning, collisions, progression)
//! - `engine`: Lifecycle, input commands and observable outputs around `sim`
//! - `settings`: Run configuration (skin, viewport, seed)
//! - `records`: Local high score / skin persistence
//! - `autopilot`: Demo controller that plays the game

pub mod autopilot;
pub mod engine;
pub mod error;
pub mod records;
pub mod settings;
pub mod sim;

pub use autopilot::Autopilot;
pub use engine::{Engine, EngineObserver, Snapshot};
pub use error::{EngineError, RecordsError};
pub use records::LocalRecords;
pub use settings::{RunConfig, Skin, Viewport};

/// Game configuration constants
pub mod consts {
    /// Physics sub-step (120 Hz) used to integrate one logical tick
    pub const PHYSICS_SUBSTEP_MS: f64 = 1000.0 / 120.0;
    /// Maximum physics sub-steps per tick
    pub const MAX_SUBSTEPS: u32 = 12;
    /// Frame deltas above this are clamped (tab switches, debugger pauses)
    pub const MAX_FRAME_DELTA_MS: f64 = 100.0;

    /// Default viewport
    pub const DEFAULT_VIEWPORT_WIDTH: f32 = 1024.0;
    pub const DEFAULT_VIEWPORT_HEIGHT: f32 = 600.0;
    /// Height of the floor strip at the bottom of the viewport
    pub const FLOOR_HEIGHT: f32 = 50.0;

    /// Player defaults (world is y-down, player x is fixed)
    pub const PLAYER_X: f32 = 100.0;
    pub const PLAYER_WIDTH: f32 = 36.0;
    pub const PLAYER_HEIGHT: f32 = 51.0;
    /// Crouched hit-box height while sliding
    pub const PLAYER_SLIDE_HEIGHT: f32 = 30.0;
    /// Distance from player center down to the feet
    pub const PLAYER_FOOT_OFFSET: f32 = 30.0;
    /// Downward acceleration while airborne (units/s²)
    pub const GRAVITY: f32 = 1600.0;
    /// Upward impulse on jump (units/s, negative is up)
    pub const JUMP_VELOCITY: f32 = -600.0;
    /// Slide auto-release
    pub const SLIDE_DURATION_MS: f64 = 600.0;

    /// World scroll speed at difficulty 1.0 (units/s)
    pub const BASE_SCROLL_SPEED: f32 = 420.0;
    /// Distance ticks per level
    pub const LEVEL_THRESHOLD: u64 = 500;
    pub const MAX_LEVEL: u8 = 5;
    /// Distance ticks per displayed metre
    pub const DISPLAY_DISTANCE_DIVISOR: u64 = 10;
    /// Displayed metres per +1.0 of obstacle difficulty
    pub const DIFFICULTY_DIVISOR: f32 = 700.0;
    /// Displayed metres per +1.0 of coin cadence compression
    pub const COIN_DIFFICULTY_DIVISOR: f32 = 1200.0;

    /// Obstacle spawn delay window (ms, before difficulty compression)
    pub const OBSTACLE_DELAY_MIN_MS: i32 = 900;
    pub const OBSTACLE_DELAY_MAX_MS: i32 = 1700;
    pub const INITIAL_OBSTACLE_DELAY_MS: f64 = 1200.0;
    /// Coin spawn delay window (ms, before difficulty compression)
    pub const COIN_DELAY_MIN_MS: i32 = 800;
    pub const COIN_DELAY_MAX_MS: i32 = 1800;
    pub const INITIAL_COIN_DELAY_MS: f64 = 1700.0;
    /// Coin band above the floor line (jump-reachable)
    pub const COIN_BAND_LOW: i32 = 80;
    pub const COIN_BAND_HIGH: i32 = 180;

    /// Oscillating barrier travel above its resting height
    pub const BARRIER_AMPLITUDE: f32 = 100.0;
    /// Full up-and-down cycle
    pub const BARRIER_PERIOD_MS: f32 = 4000.0;

    /// Entities left of these x positions are culled
    pub const OBSTACLE_CULL_X: f32 = -200.0;
    pub const COIN_CULL_X: f32 = -100.0;

    /// Ambient dust particles
    pub const MAX_PARTICLES: usize = 48;
    pub const PARTICLE_LIFETIME_MS: f32 = 300.0;
    pub const PARTICLE_INTERVAL_MS: f64 = 25.0;
}
