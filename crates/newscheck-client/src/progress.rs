//! Cosmetic progress for an in-flight check.
//!
//! The service reports no real progress, so the value climbs by a random
//! step each tick and stalls at [`PENDING_CEILING`] until the response lands.

use std::time::Duration;

use newscheck_core::PENDING_PROGRESS_CEILING;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Progress never passes this while the request is pending.
pub const PENDING_CEILING: f64 = PENDING_PROGRESS_CEILING as f64;

pub const DEFAULT_TICK: Duration = Duration::from_millis(500);
pub const DEFAULT_MAX_STEP: f64 = 15.0;

pub struct ProgressSimulator {
    value: f64,
    rng: StdRng,
}

impl Default for ProgressSimulator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressSimulator {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Deterministic sequence for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self { value: 0.0, rng }
    }

    /// Interval between increments.
    pub fn tick(&self) -> Duration {
        DEFAULT_TICK
    }

    pub fn reset(&mut self) {
        self.value = 0.0;
    }

    /// Add one random increment, capped at [`PENDING_CEILING`]. Returns the new percentage.
    pub fn advance(&mut self) -> u8 {
        let step = self.rng.gen_range(0.0..DEFAULT_MAX_STEP);
        self.value = (self.value + step).min(PENDING_CEILING);
        self.percent()
    }

    /// Current value, rounded down to a whole percent.
    pub fn percent(&self) -> u8 {
        self.value.floor() as u8
    }
}
