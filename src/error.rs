//! Error types for the fallible edges of the crate
//!
//! The simulation itself never fails; only configuration and persistence do.

use thiserror::Error;

/// Errors raised by the engine boundary.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("viewport {width}x{height} cannot fit the floor, player and coin band")]
    InvalidViewport { width: f32, height: f32 },

    #[error("could not read run config: {0}")]
    ConfigRead(#[source] std::io::Error),

    #[error("run config is not valid JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

/// Errors raised by the local records store.
#[derive(Debug, Error)]
pub enum RecordsError {
    #[error("records I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("records are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
