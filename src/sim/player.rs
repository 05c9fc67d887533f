//! Player controller
//!
//! Grounded / Airborne / Sliding state machine. The player's x never changes;
//! only vertical motion and the hit-box shape do.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::clock::FrameDelta;
use super::hitbox::{Aabb, Hitbox};
use crate::consts::*;

/// Player movement state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerState {
    Grounded,
    Airborne,
    Sliding,
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    /// Vertical velocity (positive is down)
    pub vel_y: f32,
    pub state: PlayerState,
    /// Game time at which an active slide releases itself
    pub slide_deadline_ms: Option<f64>,
    /// Center y when standing on the floor
    ground_y: f32,
    /// Set on game over; no further motion or transitions
    frozen: bool,
}

impl Player {
    /// A grounded player standing on `floor_y`
    pub fn new(floor_y: f32) -> Self {
        let ground_y = floor_y - PLAYER_FOOT_OFFSET;
        Self {
            pos: Vec2::new(PLAYER_X, ground_y),
            vel_y: 0.0,
            state: PlayerState::Grounded,
            slide_deadline_ms: None,
            ground_y,
            frozen: false,
        }
    }

    pub fn ground_y(&self) -> f32 {
        self.ground_y
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Current hit-box shape (crouched while sliding, feet stay put)
    pub fn hitbox(&self) -> Hitbox {
        match self.state {
            PlayerState::Grounded | PlayerState::Airborne => {
                Hitbox::new(PLAYER_WIDTH, PLAYER_HEIGHT)
                    .with_offset(0.0, PLAYER_FOOT_OFFSET - PLAYER_HEIGHT / 2.0)
            }
            PlayerState::Sliding => Hitbox::new(PLAYER_WIDTH, PLAYER_SLIDE_HEIGHT)
                .with_offset(0.0, PLAYER_FOOT_OFFSET - PLAYER_SLIDE_HEIGHT / 2.0),
        }
    }

    pub fn aabb(&self) -> Aabb {
        self.hitbox().at(self.pos)
    }

    /// Jump if standing on the ground. Returns whether the jump happened.
    pub fn jump(&mut self) -> bool {
        if self.frozen || self.state != PlayerState::Grounded {
            return false;
        }
        self.vel_y = JUMP_VELOCITY;
        self.state = PlayerState::Airborne;
        true
    }

    /// Crouch if grounded; arms the auto-release deadline.
    pub fn start_slide(&mut self, now_ms: f64) -> bool {
        if self.frozen || self.state != PlayerState::Grounded {
            return false;
        }
        self.state = PlayerState::Sliding;
        self.slide_deadline_ms = Some(now_ms + SLIDE_DURATION_MS);
        true
    }

    /// Stand back up; clears the pending deadline.
    pub fn end_slide(&mut self) -> bool {
        if self.frozen || self.state != PlayerState::Sliding {
            return false;
        }
        self.state = PlayerState::Grounded;
        self.slide_deadline_ms = None;
        true
    }

    /// Release the slide if its deadline has passed
    pub fn expire_slide(&mut self, now_ms: f64) -> bool {
        match self.slide_deadline_ms {
            Some(deadline) if now_ms >= deadline => self.end_slide(),
            _ => false,
        }
    }

    /// Apply gravity and resolve against the ground.
    /// Returns true if the player landed this tick.
    pub fn integrate(&mut self, frame: &FrameDelta) -> bool {
        let h = frame.substep_secs();
        for _ in 0..frame.substeps {
            if self.integrate_substep(h) {
                return true;
            }
        }
        false
    }

    /// One physics sub-step of `h` seconds. Returns true on landing.
    pub fn integrate_substep(&mut self, h: f32) -> bool {
        if self.frozen || self.state != PlayerState::Airborne {
            return false;
        }

        // Semi-implicit Euler keeps the jump arc stable under jittery deltas
        self.vel_y += GRAVITY * h;
        self.pos.y += self.vel_y * h;

        if self.vel_y >= 0.0 && self.pos.y >= self.ground_y {
            self.pos.y = self.ground_y;
            self.vel_y = 0.0;
            self.state = PlayerState::Grounded;
            return true;
        }
        false
    }

    /// Stop all motion and refuse further commands
    pub fn freeze(&mut self) {
        self.frozen = true;
        self.vel_y = 0.0;
        self.slide_deadline_ms = None;
    }
}
