//! Obstacle, coin and dust spawning
//!
//! Obstacles and coins run on independent schedules. After each spawn the
//! base delay is redrawn from its window; the window is compressed at check
//! time by the current difficulty, so speeding up also tightens spacing that
//! was already scheduled.
//!
//! Gameplay draws, in order:
//! - obstacle: variant index, then next base delay
//! - coin: height above the floor, then next base delay

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{EntityKind, EntityPool, EntityRole};
use super::rng::{RandomSource, cosmetic_hash};
use crate::consts::*;
use crate::settings::Viewport;

/// Obstacle variants in unlock order
pub const VARIANT_TABLE: [EntityKind; 5] = [
    EntityKind::LowObstacle,
    EntityKind::OverheadObstacle,
    EntityKind::PitObstacle,
    EntityKind::DoubleSpike,
    EntityKind::OscillatingBarrier,
];

/// Number of variants in the draw pool at each level
pub fn unlocked_count(level: u8) -> usize {
    match level {
        0 | 1 => 3,
        2 => 4,
        _ => 5,
    }
}

/// The uniform draw pool for `level`.
///
/// Panics if the pool disagrees with the per-kind unlock levels: a broken
/// difficulty table must not silently spawn nothing.
pub fn unlocked_variants(level: u8) -> &'static [EntityKind] {
    let level = level.max(1);
    let count = unlocked_count(level);
    assert!(
        count <= VARIANT_TABLE.len(),
        "level {level} unlocks {count} variants, table has {}",
        VARIANT_TABLE.len()
    );
    let (unlocked, locked) = VARIANT_TABLE.split_at(count);
    assert!(
        unlocked.iter().all(|k| k.unlock_level() <= level)
            && locked.iter().all(|k| k.unlock_level() > level),
        "variant pool for level {level} does not match unlock levels"
    );
    unlocked
}

/// Uniform draw over the variants unlocked at `level`
pub fn pick_obstacle(level: u8, rng: &mut impl RandomSource) -> EntityKind {
    let pool = unlocked_variants(level);
    let index = rng.between(0, pool.len() as i32 - 1);
    pool[index as usize]
}

/// Per-tick inputs to the spawner
#[derive(Debug, Clone, Copy)]
pub struct SpawnContext {
    pub now_ms: f64,
    pub tick: u64,
    pub level: u8,
    pub difficulty_multiplier: f32,
    pub coin_multiplier: f32,
    pub scroll_speed: f32,
    pub viewport: Viewport,
    pub player_pos: Vec2,
    /// Feet on the floor (running or sliding)
    pub player_on_ground: bool,
}

/// What one `update` created
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpawnReport {
    pub obstacle: Option<(u32, EntityKind)>,
    pub coin: Option<u32>,
    pub particles: usize,
}

/// Spawn scheduling state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spawner {
    last_obstacle_ms: f64,
    /// Base delay before difficulty compression
    obstacle_delay_ms: f64,
    last_coin_ms: f64,
    coin_delay_ms: f64,
    last_particle_ms: f64,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawner {
    pub fn new() -> Self {
        Self {
            last_obstacle_ms: 0.0,
            obstacle_delay_ms: INITIAL_OBSTACLE_DELAY_MS,
            last_coin_ms: 0.0,
            coin_delay_ms: INITIAL_COIN_DELAY_MS,
            last_particle_ms: 0.0,
        }
    }

    /// Game time after which the next obstacle fires
    pub fn next_obstacle_at(&self, difficulty_multiplier: f32) -> f64 {
        self.last_obstacle_ms + self.obstacle_delay_ms / difficulty_multiplier as f64
    }

    /// Game time after which the next coin fires
    pub fn next_coin_at(&self, coin_multiplier: f32) -> f64 {
        self.last_coin_ms + self.coin_delay_ms / coin_multiplier as f64
    }

    pub fn obstacle_delay_ms(&self) -> f64 {
        self.obstacle_delay_ms
    }

    pub fn coin_delay_ms(&self) -> f64 {
        self.coin_delay_ms
    }

    /// Spawn whatever is due this tick
    pub fn update(
        &mut self,
        ctx: &SpawnContext,
        pool: &mut EntityPool,
        rng: &mut impl RandomSource,
    ) -> SpawnReport {
        let mut report = SpawnReport::default();
        let floor_y = ctx.viewport.floor_y();
        let scroll_vel = Vec2::new(-ctx.scroll_speed, 0.0);

        if ctx.now_ms > self.next_obstacle_at(ctx.difficulty_multiplier) {
            let kind = pick_obstacle(ctx.level, rng);
            let y = floor_y - kind.rest_height();
            let pos = Vec2::new(ctx.viewport.width + kind.lead_in(), y);
            let id = pool.spawn(kind, pos, scroll_vel, kind.spawn_motion(y));

            self.last_obstacle_ms = ctx.now_ms;
            self.obstacle_delay_ms =
                rng.between(OBSTACLE_DELAY_MIN_MS, OBSTACLE_DELAY_MAX_MS) as f64;
            log::debug!(
                "Spawned {:?} #{} at level {} (next base delay {}ms)",
                kind,
                id,
                ctx.level,
                self.obstacle_delay_ms
            );
            report.obstacle = Some((id, kind));
        }

        if ctx.now_ms > self.next_coin_at(ctx.coin_multiplier) {
            let height = rng.between(COIN_BAND_LOW, COIN_BAND_HIGH) as f32;
            let kind = EntityKind::Coin;
            let pos = Vec2::new(ctx.viewport.width + kind.lead_in(), floor_y - height);
            let id = pool.spawn(kind, pos, scroll_vel, kind.spawn_motion(pos.y));

            self.last_coin_ms = ctx.now_ms;
            self.coin_delay_ms = rng.between(COIN_DELAY_MIN_MS, COIN_DELAY_MAX_MS) as f64;
            report.coin = Some(id);
        }

        report.particles = self.emit_dust(ctx, pool);
        report
    }

    /// Kick up dust behind a running player. Jitter is hashed, not drawn.
    fn emit_dust(&mut self, ctx: &SpawnContext, pool: &mut EntityPool) -> usize {
        if !ctx.player_on_ground
            || ctx.now_ms - self.last_particle_ms < PARTICLE_INTERVAL_MS
            || pool.count_role(EntityRole::Ambient) >= MAX_PARTICLES
        {
            return 0;
        }

        let hash = cosmetic_hash(ctx.tick, 17);
        let vel = Vec2::new(
            -20.0 - (hash % 80) as f32,
            -(((hash >> 8) % 60) as f32),
        );
        let kind = EntityKind::AmbientParticle;
        let pos = ctx.player_pos + Vec2::new(-10.0, 24.0);
        pool.spawn(kind, pos, vel, kind.spawn_motion(pos.y));
        self.last_particle_ms = ctx.now_ms;
        1
    }
}
