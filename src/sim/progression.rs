//! Distance, level and difficulty
//!
//! Everything here is derived from the distance counter, so the curves are
//! plain functions and `Progression` only remembers the last level it saw.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Metres shown to the player
#[inline]
pub fn display_distance(distance: u64) -> u64 {
    distance / DISPLAY_DISTANCE_DIVISOR
}

/// Level for a distance, clamped to `MAX_LEVEL`
pub fn level_for_distance(distance: u64) -> u8 {
    let level = distance / LEVEL_THRESHOLD + 1;
    level.min(MAX_LEVEL as u64) as u8
}

/// Obstacle difficulty (>= 1.0, unbounded)
pub fn difficulty_multiplier(distance: u64) -> f32 {
    1.0 + display_distance(distance) as f32 / DIFFICULTY_DIVISOR
}

/// Coin cadence compression, gentler than the obstacle curve
pub fn coin_cadence_multiplier(distance: u64) -> f32 {
    1.0 + display_distance(distance) as f32 / COIN_DIFFICULTY_DIVISOR
}

pub fn scroll_speed_for(multiplier: f32) -> f32 {
    BASE_SCROLL_SPEED * multiplier
}

/// Announcement shown when a level starts
pub fn level_message(level: u8) -> &'static str {
    match level {
        1 => "Welcome! Jump over Spikes!",
        2 => "Watch Out! Sliding Required!",
        3 => "New Challenge: Avoid the Void!",
        4 => "Double Trouble Ahead!",
        5 => "ULTIMATE: Moving Barriers!",
        _ => "Keep Going!",
    }
}

/// A level transition
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LevelChange {
    pub from: u8,
    pub to: u8,
    /// Tick on which the change happened
    pub tick: u64,
    pub message: &'static str,
}

/// Run progression
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Progression {
    pub distance: u64,
    pub level: u8,
    pub difficulty_multiplier: f32,
    pub scroll_speed: f32,
}

impl Default for Progression {
    fn default() -> Self {
        Self::at_distance(0)
    }
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Progression as it would stand at `distance`
    pub fn at_distance(distance: u64) -> Self {
        let difficulty_multiplier = difficulty_multiplier(distance);
        Self {
            distance,
            level: level_for_distance(distance),
            difficulty_multiplier,
            scroll_speed: scroll_speed_for(difficulty_multiplier),
        }
    }

    pub fn display_distance(&self) -> u64 {
        display_distance(self.distance)
    }

    pub fn coin_cadence_multiplier(&self) -> f32 {
        coin_cadence_multiplier(self.distance)
    }

    /// Count one tick of distance and re-derive everything.
    /// Returns the level change, if any.
    pub fn advance(&mut self, tick: u64) -> Option<LevelChange> {
        self.distance += 1;
        self.difficulty_multiplier = difficulty_multiplier(self.distance);
        self.scroll_speed = scroll_speed_for(self.difficulty_multiplier);

        let level = level_for_distance(self.distance);
        if level > self.level {
            let change = LevelChange {
                from: self.level,
                to: level,
                tick,
                message: level_message(level),
            };
            self.level = level;
            Some(change)
        } else {
            None
        }
    }
}
