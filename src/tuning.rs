//! Data-driven game balance
//!
//! Every number the simulation uses lives here so a run can be retuned from
//! a JSON file without recompiling. Missing fields fall back to defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::MAX_BATCH_SIZE;
use crate::error::ConfigError;

/// Inclusive `(min, max)` range for a uniform draw.
pub type Band = (f32, f32);

/// Game tuning table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === World ===
    /// Visible width of the camera
    pub view_width: f32,
    /// Visible height of the camera
    pub view_height: f32,
    /// Downward world gravity (units/s²)
    pub gravity: f32,
    /// Distance from the bottom of the view to the floor the character runs on
    pub floor_inset: f32,
    /// Camera x past which every tracked coordinate is shifted back
    pub rebase_threshold: f32,

    // === Character ===
    /// Character footprint (width, height), anchored at the feet
    pub character_size: (f32, f32),
    /// Vertical offset of the spawn point above the bottom of the view
    pub character_spawn_inset: f32,
    /// Upward acceleration while ascend is held (negative is up)
    pub ascend_accel: f32,
    /// Horizontal velocity applied on kill
    pub knockback_speed: f32,
    /// Per-tick multiplier on horizontal velocity while Killed
    pub knockback_decay: f32,
    /// Horizontal speed at or below which Killed becomes Dead
    pub stop_epsilon: f32,

    // === Difficulty ramp ===
    /// Starting run/fall/fly speed
    pub base_speed: f32,
    /// Multiplier applied per ramp tick
    pub ramp_factor: f32,
    /// Seconds between ramp ticks
    pub ramp_period: f32,
    /// Clamp band for the run speed
    pub run_speed_band: Band,
    /// Clamp band for the fall speed
    pub fall_speed_band: Band,
    /// Clamp band for the fly speed
    pub fly_speed_band: Band,

    // === Hazard ===
    /// Spawn anchor of the laser
    pub hazard_start: (f32, f32),
    /// Size of each laser end cap (width, height)
    pub hazard_cap_size: (f32, f32),
    /// Stretched height of the laser middle segment
    pub hazard_middle_height: f32,
    /// Footprint drop below the anchor
    pub hazard_footprint_drop: f32,
    /// Extra random distance past the leading gap when recycling
    pub hazard_spread: f32,
    /// Vertical anchor band when recycling
    pub hazard_y_band: Band,

    // === Decor ===
    pub window_width: f32,
    pub window_y: f32,
    pub window_starts: [Band; 2],
    pub shelf_width: f32,
    pub shelf_y: f32,
    pub shelf_starts: [Band; 2],
    pub hole_width: f32,
    pub hole_y: f32,
    pub hole_start: Band,
    /// Offsets past the right edge where a recycled hole lands
    pub hole_spread: Band,
    /// Random spread for recycled windows and shelves
    pub decor_spread: f32,

    // === Coins ===
    pub coin_width: f32,
    /// Number of reusable coins; at least the maximum batch size
    pub pickup_pool_capacity: usize,
    /// Gap between the right edge and the first coin of a batch
    pub coin_lead: f32,
    /// Spacing between coins as a multiple of their width
    pub coin_spacing: f32,
    /// Distance kept from the top and bottom of the view
    pub coin_edge_inset: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            view_width: 800.0,
            view_height: 640.0,
            gravity: 200.0,
            floor_inset: 55.0,
            rebase_threshold: 2380.0,

            character_size: (70.0, 90.0),
            character_spawn_inset: 30.0,
            ascend_accel: -600.0,
            knockback_speed: 1000.0,
            knockback_decay: 0.99,
            stop_epsilon: 5.0,

            base_speed: 300.0,
            ramp_factor: 1.05,
            ramp_period: 1.0,
            run_speed_band: (300.0, 1000.0),
            fall_speed_band: (300.0, 1500.0),
            fly_speed_band: (300.0, 2000.0),

            hazard_start: (900.0, 100.0),
            hazard_cap_size: (64.0, 32.0),
            hazard_middle_height: 200.0,
            hazard_footprint_drop: 40.0,
            hazard_spread: 1000.0,
            hazard_y_band: (0.0, 300.0),

            window_width: 120.0,
            window_y: 200.0,
            window_starts: [(900.0, 1300.0), (1600.0, 2000.0)],
            shelf_width: 140.0,
            shelf_y: 580.0,
            shelf_starts: [(2200.0, 2700.0), (2900.0, 3400.0)],
            hole_width: 80.0,
            hole_y: 501.0,
            hole_start: (900.0, 1500.0),
            hole_spread: (100.0, 1000.0),
            decor_spread: 800.0,

            coin_width: 20.0,
            pickup_pool_capacity: MAX_BATCH_SIZE,
            coin_lead: 100.0,
            coin_spacing: 1.5,
            coin_edge_inset: 100.0,
        }
    }
}

impl Tuning {
    /// Parse a tuning table from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning table from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path.display());
        Ok(tuning)
    }

    /// Floor y the character's feet rest on
    pub fn floor_y(&self) -> f32 {
        self.view_height - self.floor_inset
    }

    /// Vertical band coins are drawn from
    pub fn coin_y_band(&self) -> Band {
        (self.coin_edge_inset, self.view_height - self.coin_edge_inset)
    }

    /// Footprint size of the laser (width, height)
    pub fn hazard_footprint_size(&self) -> (f32, f32) {
        let (cap_w, cap_h) = self.hazard_cap_size;
        (cap_w * 0.5, (cap_h * 2.0 + self.hazard_middle_height) * 0.8)
    }

    /// Reject any table that could make a session misbehave.
    ///
    /// Every random band that is drawn at runtime is checked here, relative
    /// bands included, so frame processing never sees `min > max`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("view_width", self.view_width),
            ("view_height", self.view_height),
            ("gravity", self.gravity),
            ("floor_inset", self.floor_inset),
            ("rebase_threshold", self.rebase_threshold),
            ("character_size.0", self.character_size.0),
            ("character_size.1", self.character_size.1),
            ("character_spawn_inset", self.character_spawn_inset),
            ("ascend_accel", self.ascend_accel),
            ("knockback_speed", self.knockback_speed),
            ("knockback_decay", self.knockback_decay),
            ("stop_epsilon", self.stop_epsilon),
            ("base_speed", self.base_speed),
            ("ramp_factor", self.ramp_factor),
            ("ramp_period", self.ramp_period),
            ("hazard_cap_size.0", self.hazard_cap_size.0),
            ("hazard_cap_size.1", self.hazard_cap_size.1),
            ("hazard_middle_height", self.hazard_middle_height),
            ("hazard_footprint_drop", self.hazard_footprint_drop),
            ("hazard_spread", self.hazard_spread),
            ("window_width", self.window_width),
            ("window_y", self.window_y),
            ("shelf_width", self.shelf_width),
            ("shelf_y", self.shelf_y),
            ("hole_width", self.hole_width),
            ("hole_y", self.hole_y),
            ("decor_spread", self.decor_spread),
            ("coin_width", self.coin_width),
            ("coin_lead", self.coin_lead),
            ("coin_spacing", self.coin_spacing),
            ("coin_edge_inset", self.coin_edge_inset),
        ];
        for (name, value) in scalars {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
        }

        let positive = [
            ("view_width", self.view_width),
            ("view_height", self.view_height),
            ("rebase_threshold", self.rebase_threshold),
            ("character_size.0", self.character_size.0),
            ("character_size.1", self.character_size.1),
            ("knockback_decay", self.knockback_decay),
            ("stop_epsilon", self.stop_epsilon),
            ("base_speed", self.base_speed),
            ("ramp_factor", self.ramp_factor),
            ("ramp_period", self.ramp_period),
            ("hazard_cap_size.0", self.hazard_cap_size.0),
            ("window_width", self.window_width),
            ("shelf_width", self.shelf_width),
            ("hole_width", self.hole_width),
            ("coin_width", self.coin_width),
            ("coin_spacing", self.coin_spacing),
        ];
        for (name, value) in positive {
            if value <= 0.0 {
                return Err(ConfigError::NonPositive(name));
            }
        }

        // Killed has to slow down to reach Dead
        if self.knockback_decay >= 1.0 {
            return Err(ConfigError::OutOfRange {
                name: "knockback_decay",
                value: self.knockback_decay,
                expected: "a factor below 1",
            });
        }

        if self.pickup_pool_capacity < MAX_BATCH_SIZE {
            return Err(ConfigError::PoolTooSmall {
                capacity: self.pickup_pool_capacity,
                max_batch: MAX_BATCH_SIZE,
            });
        }

        let bands = [
            ("run_speed_band", self.run_speed_band),
            ("fall_speed_band", self.fall_speed_band),
            ("fly_speed_band", self.fly_speed_band),
            ("hazard_y_band", self.hazard_y_band),
            ("window_starts[0]", self.window_starts[0]),
            ("window_starts[1]", self.window_starts[1]),
            ("shelf_starts[0]", self.shelf_starts[0]),
            ("shelf_starts[1]", self.shelf_starts[1]),
            ("hole_start", self.hole_start),
            ("hole_spread", self.hole_spread),
            ("coin_y_band", self.coin_y_band()),
            // Recycled windows land in [right + 2w, right + spread]
            ("window_leader", (self.window_width * 2.0, self.decor_spread)),
            // Chained and hazard placements add a non-negative spread
            ("decor_follower", (0.0, self.decor_spread)),
            ("hazard_x", (0.0, self.hazard_spread)),
        ];
        for (name, (min, max)) in bands {
            if !min.is_finite() || !max.is_finite() {
                return Err(ConfigError::NonFinite(name));
            }
            if min > max {
                return Err(ConfigError::InvertedBand { name, min, max });
            }
        }

        let speed_bands = [
            ("run_speed_band", self.run_speed_band),
            ("fall_speed_band", self.fall_speed_band),
            ("fly_speed_band", self.fly_speed_band),
        ];
        for (name, (min, max)) in speed_bands {
            if min <= 0.0 {
                return Err(ConfigError::NonPositive(name));
            }
            if self.base_speed < min || self.base_speed > max {
                return Err(ConfigError::OutOfRange {
                    name: "base_speed",
                    value: self.base_speed,
                    expected: name,
                });
            }
        }

        Ok(())
    }
}
