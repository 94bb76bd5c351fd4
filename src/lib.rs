//! Jetpack Run - An endless side-scrolling runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (character, recyclers, world driver)
//! - `platform`: Presentation and input seams consumed by a shell
//! - `tuning`: Data-driven game balance
//! - `error`: Configuration errors

pub mod error;
pub mod platform;
pub mod sim;
pub mod tuning;

pub use error::ConfigError;
pub use tuning::Tuning;

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one step per rendered frame)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Smallest number of coins in one batch
    pub const MIN_BATCH_SIZE: usize = 1;
    /// Largest number of coins in one batch; the pool must hold at least this many
    pub const MAX_BATCH_SIZE: usize = 20;
}

/// Uniform draw from the inclusive band `[min, max]`.
///
/// Bands are validated by [`Tuning::validate`], so `min <= max` holds for
/// every draw made by a running session.
#[inline]
pub fn between<R: Rng>(rng: &mut R, min: f32, max: f32) -> f32 {
    debug_assert!(min <= max, "inverted band [{min}, {max}]");
    if min >= max {
        return min;
    }
    rng.random_range(min..=max)
}
