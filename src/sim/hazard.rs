//! The laser hazard
//!
//! A single static obstacle. It is never destroyed, only moved ahead of the
//! camera once the camera has left it behind.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::ScrollBounds;
use crate::between;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Hazard {
    /// Visual anchor: top centre of the upper end cap
    pub pos: Vec2,
    /// World-space footprint
    pub footprint: Rect,
    /// Footprint corner relative to the anchor
    footprint_offset: Vec2,
}

impl Hazard {
    pub fn new(tuning: &Tuning) -> Self {
        let (w, h) = tuning.hazard_footprint_size();
        let size = Vec2::new(w, h);
        let mut hazard = Self {
            pos: Vec2::new(tuning.hazard_start.0, tuning.hazard_start.1),
            footprint: Rect::new(Vec2::ZERO, size),
            footprint_offset: Vec2::new(-w * 0.5, tuning.hazard_footprint_drop),
        };
        hazard.sync_footprint();
        hazard
    }

    /// Move ahead of the camera once the footprint's width past the anchor
    /// has scrolled off the left edge. Returns true if the hazard moved.
    pub fn recycle<R: Rng>(&mut self, bounds: ScrollBounds, tuning: &Tuning, rng: &mut R) -> bool {
        let width = self.footprint.width();
        if self.pos.x + width >= bounds.left {
            return false;
        }

        let lead = bounds.right + width;
        self.pos.x = between(rng, lead, lead + tuning.hazard_spread);
        self.pos.y = between(rng, tuning.hazard_y_band.0, tuning.hazard_y_band.1);
        self.sync_footprint();
        log::trace!("Hazard recycled to ({:.1}, {:.1})", self.pos.x, self.pos.y);
        true
    }

    pub fn shift_x(&mut self, dx: f32) {
        self.pos.x += dx;
        self.sync_footprint();
    }

    pub fn sync_footprint(&mut self) {
        self.footprint.min = self.pos + self.footprint_offset;
    }

    pub fn footprint_offset(&self) -> Vec2 {
        self.footprint_offset
    }
}
