//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Fixed-size entity sets, no allocation per frame
//! - No rendering or platform dependencies

pub mod character;
pub mod collision;
pub mod decor;
pub mod hazard;
pub mod pickups;
pub mod state;
pub mod tick;

pub use character::{Animation, Character, CharacterState};
pub use collision::{ArcadeOverlap, Circle, Footprint, OverlapTest, Rect};
pub use decor::{Decor, DecorItem, DecorKind};
pub use hazard::Hazard;
pub use pickups::{Collectible, CollectiblePool};
pub use state::{EntityRef, GameEvent, GameState, RunStats, Scene, ScrollBounds};
pub use tick::{TickInput, rebase, tick, tick_with};
