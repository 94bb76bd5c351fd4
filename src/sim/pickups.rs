//! Collectible coin pool
//!
//! A fixed set of coins allocated once per session. Spawning never
//! allocates: it hides every coin, then claims inactive slots by scanning.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Circle;
use super::state::ScrollBounds;
use crate::between;
use crate::consts::{MAX_BATCH_SIZE, MIN_BATCH_SIZE};
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// A coin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    /// Centre
    pub pos: Vec2,
    pub active: bool,
    pub visible: bool,
    pub footprint: Circle,
}

impl Collectible {
    fn dormant(width: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            active: false,
            visible: false,
            footprint: Circle::new(Vec2::ZERO, width * 0.5),
        }
    }

    fn sync_footprint(&mut self) {
        self.footprint.center = self.pos;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectiblePool {
    coins: Vec<Collectible>,
    coin_width: f32,
}

impl CollectiblePool {
    /// Allocate `capacity` inactive coins.
    ///
    /// Fails when the pool could not hold the largest batch.
    pub fn new(capacity: usize, coin_width: f32) -> Result<Self, ConfigError> {
        if capacity < MAX_BATCH_SIZE {
            return Err(ConfigError::PoolTooSmall {
                capacity,
                max_batch: MAX_BATCH_SIZE,
            });
        }
        Ok(Self {
            coins: (0..capacity).map(|_| Collectible::dormant(coin_width)).collect(),
            coin_width,
        })
    }

    /// Hide everything and lay out a batch of random size ahead of the camera.
    /// Returns the number of coins placed.
    pub fn spawn_batch<R: Rng>(&mut self, bounds: ScrollBounds, tuning: &Tuning, rng: &mut R) -> usize {
        let count = rng.random_range(MIN_BATCH_SIZE..=MAX_BATCH_SIZE);
        self.spawn_batch_of(count, bounds, tuning, rng)
    }

    /// Hide everything and lay out exactly `count` coins left to right from
    /// `right + coin_lead`, spaced by `coin_spacing` widths.
    pub fn spawn_batch_of<R: Rng>(
        &mut self,
        count: usize,
        bounds: ScrollBounds,
        tuning: &Tuning,
        rng: &mut R,
    ) -> usize {
        self.hide_all();

        let (y_min, y_max) = tuning.coin_y_band();
        let step = self.coin_width * tuning.coin_spacing;
        let mut x = bounds.right + tuning.coin_lead;
        let mut placed = 0;

        for _ in 0..count {
            let Some(slot) = self.acquire() else {
                log::warn!("Coin pool exhausted after {} of {} coins", placed, count);
                break;
            };
            let coin = &mut self.coins[slot];
            coin.pos = Vec2::new(x, between(rng, y_min, y_max));
            coin.active = true;
            coin.visible = true;
            coin.sync_footprint();

            x += step;
            placed += 1;
        }

        log::debug!("Spawned {} coins from x={:.1}", placed, bounds.right + tuning.coin_lead);
        placed
    }

    /// Deactivate a coin. Returns true only if it was active, so duplicate
    /// overlap reports in one frame score once.
    pub fn collect(&mut self, index: usize) -> bool {
        match self.coins.get_mut(index) {
            Some(coin) if coin.active => {
                coin.active = false;
                coin.visible = false;
                true
            }
            _ => false,
        }
    }

    /// First inactive slot
    pub fn acquire(&self) -> Option<usize> {
        self.coins.iter().position(|c| !c.active)
    }

    /// Shift every active coin (re-basing)
    pub fn shift_active_x(&mut self, dx: f32) {
        for coin in self.coins.iter_mut().filter(|c| c.active) {
            coin.pos.x += dx;
            coin.sync_footprint();
        }
    }

    pub fn hide_all(&mut self) {
        for coin in &mut self.coins {
            coin.active = false;
            coin.visible = false;
        }
    }

    pub fn active_count(&self) -> usize {
        self.coins.iter().filter(|c| c.active).count()
    }

    pub fn capacity(&self) -> usize {
        self.coins.len()
    }

    pub fn get(&self, index: usize) -> Option<&Collectible> {
        self.coins.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collectible> {
        self.coins.iter()
    }
}
