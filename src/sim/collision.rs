//! Collision footprints and overlap testing
//!
//! Footprints are the regions used for overlap checks, separate from what is
//! drawn. The simulation only ever asks one question of them: do these two
//! overlap this frame? That question goes through [`OverlapTest`] so a shell
//! can substitute its own physics.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self { min, size }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Closest point inside the rect to `p`
    #[inline]
    pub fn clamp_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max())
    }
}

/// Circle footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }
}

/// Any collision footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Footprint {
    Rect(Rect),
    Circle(Circle),
}

impl From<Rect> for Footprint {
    fn from(rect: Rect) -> Self {
        Footprint::Rect(rect)
    }
}

impl From<Circle> for Footprint {
    fn from(circle: Circle) -> Self {
        Footprint::Circle(circle)
    }
}

/// Geometry capability used by the world driver once per monitored pair per frame.
pub trait OverlapTest {
    fn overlaps(&self, a: &Footprint, b: &Footprint) -> bool;
}

/// Arcade-style overlap: touching rect edges do not overlap, touching circles do.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArcadeOverlap;

impl OverlapTest for ArcadeOverlap {
    fn overlaps(&self, a: &Footprint, b: &Footprint) -> bool {
        match (a, b) {
            (Footprint::Rect(a), Footprint::Rect(b)) => rect_rect(a, b),
            (Footprint::Rect(r), Footprint::Circle(c))
            | (Footprint::Circle(c), Footprint::Rect(r)) => circle_rect(c, r),
            (Footprint::Circle(a), Footprint::Circle(b)) => circle_circle(a, b),
        }
    }
}

/// Strict rectangle intersection
pub fn rect_rect(a: &Rect, b: &Rect) -> bool {
    let (a_max, b_max) = (a.max(), b.max());
    !(a_max.x <= b.min.x || a_max.y <= b.min.y || a.min.x >= b_max.x || a.min.y >= b_max.y)
}

/// Circle against rectangle via the closest point on the rect
pub fn circle_rect(c: &Circle, r: &Rect) -> bool {
    let closest = r.clamp_point(c.center);
    closest.distance_squared(c.center) <= c.radius * c.radius
}

pub fn circle_circle(a: &Circle, b: &Circle) -> bool {
    let reach = a.radius + b.radius;
    a.center.distance_squared(b.center) <= reach * reach
}
