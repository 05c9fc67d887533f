//! Tick clock
//!
//! Converts the variable frame delta supplied by the host into simulation time.
//! The engine never reads wall-clock time.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DELTA_MS, MAX_SUBSTEPS, PHYSICS_SUBSTEP_MS};

/// Time consumed by one logical tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameDelta {
    /// Clamped delta for this tick
    pub dt_ms: f64,
    /// Physics sub-steps this tick is split into
    pub substeps: u32,
}

impl FrameDelta {
    /// Length of each physics sub-step, in seconds
    pub fn substep_secs(&self) -> f32 {
        if self.substeps == 0 {
            0.0
        } else {
            (self.dt_ms / self.substeps as f64 / 1000.0) as f32
        }
    }
}

/// Simulation clock (elapsed game time and tick count)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Clock {
    elapsed_ms: f64,
    ticks: u64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Game time elapsed this run
    pub fn now_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Advance by one tick. Negative or non-finite deltas count as zero,
    /// oversized ones are clamped.
    pub fn advance(&mut self, delta_ms: f64) -> FrameDelta {
        let dt_ms = if delta_ms.is_finite() {
            delta_ms.clamp(0.0, MAX_FRAME_DELTA_MS)
        } else {
            0.0
        };
        let substeps = ((dt_ms / PHYSICS_SUBSTEP_MS).ceil() as u32).min(MAX_SUBSTEPS);

        self.elapsed_ms += dt_ms;
        self.ticks += 1;

        FrameDelta { dt_ms, substeps }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_accumulates() {
        let mut clock = Clock::new();
        clock.advance(16.0);
        clock.advance(17.0);
        assert_eq!(clock.ticks(), 2);
        assert!((clock.now_ms() - 33.0).abs() < 1e-9);
    }

    #[test]
    fn test_advance_clamps_bad_deltas() {
        let mut clock = Clock::new();
        assert_eq!(clock.advance(-5.0).dt_ms, 0.0);
        assert_eq!(clock.advance(f64::NAN).dt_ms, 0.0);
        let big = clock.advance(5000.0);
        assert_eq!(big.dt_ms, MAX_FRAME_DELTA_MS);
        assert_eq!(clock.ticks(), 3);
    }

    #[test]
    fn test_substeps_cover_delta() {
        let mut clock = Clock::new();
        let frame = clock.advance(16.0);
        assert_eq!(frame.substeps, 2);
        assert!((frame.substep_secs() * 2.0 - 0.016).abs() < 1e-6);

        let idle = clock.advance(0.0);
        assert_eq!(idle.substeps, 0);
        assert_eq!(idle.substep_secs(), 0.0);
    }
}
