//! Axis-aligned hit-boxes
//!
//! A hit-box is sized independently of the sprite and anchored to the entity
//! position by an offset (from entity center to box center). World is y-down.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Hit-box shape relative to its owner
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hitbox {
    /// Width and height
    pub size: Vec2,
    /// Offset from the owner's position to the box center
    pub offset: Vec2,
}

impl Hitbox {
    pub const NONE: Hitbox = Hitbox {
        size: Vec2::ZERO,
        offset: Vec2::ZERO,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
            offset: Vec2::ZERO,
        }
    }

    pub fn with_offset(mut self, x: f32, y: f32) -> Self {
        self.offset = Vec2::new(x, y);
        self
    }

    /// Zero-area boxes never collide
    #[inline]
    pub fn is_solid(&self) -> bool {
        self.size.x > 0.0 && self.size.y > 0.0
    }

    /// World-space box for an owner at `pos`
    pub fn at(&self, pos: Vec2) -> Aabb {
        let center = pos + self.offset;
        let half = self.size * 0.5;
        Aabb {
            min: center - half,
            max: center + half,
        }
    }
}

/// World-space rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Strict overlap; boxes that only touch along an edge do not overlap
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    pub fn top(&self) -> f32 {
        self.min.y
    }

    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }
}
