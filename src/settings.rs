//! Run configuration
//!
//! Carries only cosmetic choices and the viewport; nothing here touches physics.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::EngineError;

/// Smallest viewport that still fits the floor, the coin band and a margin above it
pub const MIN_VIEWPORT_WIDTH: f32 = 2.0 * PLAYER_X;
pub const MIN_VIEWPORT_HEIGHT: f32 = FLOOR_HEIGHT + COIN_BAND_HIGH as f32 + 50.0;

/// Runner skins (visual tint only)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Skin {
    #[default]
    #[serde(rename = "runner-blue")]
    Blue,
    #[serde(rename = "runner-red")]
    Red,
    #[serde(rename = "runner-green")]
    Green,
    #[serde(rename = "runner-yellow")]
    Yellow,
    #[serde(rename = "runner-purple")]
    Purple,
    #[serde(rename = "runner-orange")]
    Orange,
}

impl Skin {
    pub const ALL: [Skin; 6] = [
        Skin::Blue,
        Skin::Red,
        Skin::Green,
        Skin::Yellow,
        Skin::Purple,
        Skin::Orange,
    ];

    /// Stable identifier, shared with the skin catalog and local storage
    pub fn as_str(&self) -> &'static str {
        match self {
            Skin::Blue => "runner-blue",
            Skin::Red => "runner-red",
            Skin::Green => "runner-green",
            Skin::Yellow => "runner-yellow",
            Skin::Purple => "runner-purple",
            Skin::Orange => "runner-orange",
        }
    }

    pub fn from_id(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|skin| skin.as_str().eq_ignore_ascii_case(s.trim()))
    }

    /// Unknown identifiers fall back to the default skin
    pub fn from_id_or_default(s: &str) -> Self {
        Self::from_id(s).unwrap_or_default()
    }

    /// Shirt tint as 0xRRGGBB
    pub fn tint(&self) -> u32 {
        match self {
            Skin::Blue => 0x00ccff,
            Skin::Red => 0xff3333,
            Skin::Green => 0x00ff00,
            Skin::Yellow => 0xffff00,
            Skin::Purple => 0xff00ff,
            Skin::Orange => 0xff9900,
        }
    }
}

/// Logical viewport in world units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_VIEWPORT_WIDTH,
            height: DEFAULT_VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// y of the floor line (top of the floor strip)
    pub fn floor_y(&self) -> f32 {
        self.height - FLOOR_HEIGHT
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        let fits = self.width.is_finite()
            && self.height.is_finite()
            && self.width >= MIN_VIEWPORT_WIDTH
            && self.height >= MIN_VIEWPORT_HEIGHT;
        if fits {
            Ok(())
        } else {
            Err(EngineError::InvalidViewport {
                width: self.width,
                height: self.height,
            })
        }
    }
}

/// Configuration for one run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub skin: Skin,
    #[serde(default)]
    pub viewport: Viewport,
    /// Fixed seed for reproducible runs; `None` picks one per run
    #[serde(default)]
    pub seed: Option<u64>,
}

impl RunConfig {
    pub fn with_skin(mut self, skin: Skin) -> Self {
        self.skin = skin;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        self.viewport.validate()
    }

    /// Load from a JSON file; missing fields take their defaults
    pub fn load_json(path: &Path) -> Result<Self, EngineError> {
        let json = std::fs::read_to_string(path).map_err(EngineError::ConfigRead)?;
        let config: RunConfig = serde_json::from_str(&json)?;
        config.validate()?;
        log::info!(
            "Loaded run config from {} (skin={})",
            path.display(),
            config.skin.as_str()
        );
        Ok(config)
    }
}
