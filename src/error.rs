//! Configuration errors
//!
//! The only failures the game knows about happen before a session exists.
//! Once a [`crate::sim::GameState`] is built, frame processing never fails.

use thiserror::Error;

/// Errors raised while loading or validating [`crate::Tuning`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The coin pool cannot hold the largest possible batch.
    #[error("pickup pool capacity {capacity} is smaller than the maximum batch size {max_batch}")]
    PoolTooSmall { capacity: usize, max_batch: usize },
    /// A random band would have `min > max` for some draw.
    #[error("random band `{name}` is inverted: min {min} > max {max}")]
    InvertedBand {
        name: &'static str,
        min: f32,
        max: f32,
    },
    /// A size or speed that has to be strictly positive.
    #[error("`{0}` must be positive")]
    NonPositive(&'static str),
    /// A value outside the range the simulation can run with.
    #[error("`{name}` is {value}, expected {expected}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },
    /// NaN or infinity in the tuning table.
    #[error("`{0}` must be finite")]
    NonFinite(&'static str),
    /// Tuning JSON could not be parsed.
    #[error("malformed tuning: {0}")]
    Parse(#[from] serde_json::Error),
    /// Tuning file could not be read.
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
}
