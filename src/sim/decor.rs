//! Background decor recycling
//!
//! Windows and shelves each form a short chain: the first item is dropped
//! ahead of the camera, later items are placed after their predecessor so
//! items of one kind never land on top of each other. After a move the item
//! is hidden when it sits too close to any item of the other kind. That
//! check is a cheap centre-distance test against the *other* item's width,
//! not real geometry, and depends on the order items are recycled in.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::ScrollBounds;
use crate::between;
use crate::tuning::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DecorKind {
    Window,
    Shelf,
    Hole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecorItem {
    pub kind: DecorKind,
    /// Horizontal centre
    pub x: f32,
    /// Fixed per kind
    pub y: f32,
    pub width: f32,
    pub visible: bool,
}

impl DecorItem {
    fn new(kind: DecorKind, x: f32, y: f32, width: f32) -> Self {
        Self {
            kind,
            x,
            y,
            width,
            visible: true,
        }
    }
}

/// Placement rule for one chained kind
#[derive(Debug, Clone, Copy)]
pub struct ChainRule {
    /// Random spread past the minimum placement
    pub spread: f32,
    /// Whether the leader's upper bound also includes its padded width
    pub pad_leader_max: bool,
}

/// All decor in the world: two windows, two shelves, one hole
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decor {
    pub windows: [DecorItem; 2],
    pub shelves: [DecorItem; 2],
    pub hole: DecorItem,
}

impl Decor {
    /// Session-start placement
    pub fn new<R: Rng>(tuning: &Tuning, rng: &mut R) -> Self {
        let hole = DecorItem::new(
            DecorKind::Hole,
            between(rng, tuning.hole_start.0, tuning.hole_start.1),
            tuning.hole_y,
            tuning.hole_width,
        );
        let windows = tuning.window_starts.map(|(min, max)| {
            DecorItem::new(
                DecorKind::Window,
                between(rng, min, max),
                tuning.window_y,
                tuning.window_width,
            )
        });
        let shelves = tuning.shelf_starts.map(|(min, max)| {
            DecorItem::new(
                DecorKind::Shelf,
                between(rng, min, max),
                tuning.shelf_y,
                tuning.shelf_width,
            )
        });
        Self {
            windows,
            shelves,
            hole,
        }
    }

    /// Recycle everything that has left the screen. Returns how many items moved.
    pub fn recycle<R: Rng>(&mut self, bounds: ScrollBounds, tuning: &Tuning, rng: &mut R) -> usize {
        let mut moved = 0;

        if self.hole.x + self.hole.width < bounds.left {
            let (near, far) = tuning.hole_spread;
            self.hole.x = between(rng, bounds.right + near, bounds.right + far);
            moved += 1;
        }

        let windows = ChainRule {
            spread: tuning.decor_spread,
            pad_leader_max: false,
        };
        moved += recycle_chain(&mut self.windows, &self.shelves, bounds, windows, rng);

        let shelves = ChainRule {
            spread: tuning.decor_spread,
            pad_leader_max: true,
        };
        moved += recycle_chain(&mut self.shelves, &self.windows, bounds, shelves, rng);

        moved
    }

    pub fn shift_x(&mut self, dx: f32) {
        for item in self.items_mut() {
            item.x += dx;
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &DecorItem> {
        self.windows
            .iter()
            .chain(self.shelves.iter())
            .chain(std::iter::once(&self.hole))
    }

    fn items_mut(&mut self) -> impl Iterator<Item = &mut DecorItem> {
        self.windows
            .iter_mut()
            .chain(self.shelves.iter_mut())
            .chain(std::iter::once(&mut self.hole))
    }
}

/// Recycle one chained kind against the occluders of the other kind.
///
/// The leader is considered gone once it is two widths past the left edge
/// and lands in `[right + 2w, right + spread]` (plus `2w` on the upper bound
/// when `pad_leader_max`). Each follower is gone one width past the left
/// edge and lands in `[prev.x + w, prev.x + w + spread]`.
pub fn recycle_chain<R: Rng>(
    items: &mut [DecorItem],
    occluders: &[DecorItem],
    bounds: ScrollBounds,
    rule: ChainRule,
    rng: &mut R,
) -> usize {
    let mut moved = 0;

    for i in 0..items.len() {
        let (min, max) = if i == 0 {
            let padded = items[0].width * 2.0;
            if items[0].x + padded >= bounds.left {
                continue;
            }
            let max = if rule.pad_leader_max {
                bounds.right + padded + rule.spread
            } else {
                bounds.right + rule.spread
            };
            (bounds.right + padded, max)
        } else {
            let width = items[i].width;
            if items[i].x + width >= bounds.left {
                continue;
            }
            let anchor = items[i - 1].x + width;
            (anchor, anchor + rule.spread)
        };

        let item = &mut items[i];
        item.x = between(rng, min, max);
        item.visible = !occluded(item, occluders);
        moved += 1;
    }

    moved
}

/// Centre distance within the occluder's own width.
///
/// The radius is always the width of the item in `occluders`, for windows
/// and shelves alike, never the width of `item`.
pub fn occluded(item: &DecorItem, occluders: &[DecorItem]) -> bool {
    occluders.iter().any(|o| (item.x - o.x).abs() <= o.width)
}
