//! Session state and shared simulation types
//!
//! [`GameState`] is the session context: it owns the tuning table, the seeded
//! RNG and every entity, and it is handed to each component explicitly
//! instead of living in a global scene.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::character::{Animation, Character};
use super::decor::Decor;
use super::hazard::Hazard;
use super::pickups::CollectiblePool;
use crate::error::ConfigError;
use crate::tuning::Tuning;

/// Which presented entity an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityRef {
    Character,
    Jetpack,
}

/// Presentation scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Scene {
    Game,
    GameOver,
}

/// Discrete side effects for the presentation shell, drained once per frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PlayAnimation {
        entity: EntityRef,
        animation: Animation,
        restart_if_same: bool,
    },
    JetpackVisible(bool),
    ScoreChanged(u32),
    /// Emitted once, on the edge into Dead
    SwitchScene(Scene),
}

/// Horizontal extent of the camera in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollBounds {
    pub left: f32,
    pub right: f32,
}

impl ScrollBounds {
    pub fn new(left: f32, view_width: f32) -> Self {
        Self {
            left,
            right: left + view_width,
        }
    }
}

/// Summary of a run, for the game-over report
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub score: u32,
    /// Distance covered including every re-base
    pub distance: f32,
    pub elapsed_secs: f32,
    pub rebases: u32,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub tuning: Tuning,
    pub(crate) rng: Pcg32,
    pub character: Character,
    pub hazard: Hazard,
    pub decor: Decor,
    pub pickups: CollectiblePool,
    pub score: u32,
    /// Camera left edge
    pub scroll_x: f32,
    /// Tiling background offset (visual only)
    pub background_offset: f32,
    /// Seconds accumulated toward the next difficulty tick
    pub ramp_timer: f32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub elapsed_secs: f32,
    pub rebase_count: u32,
    pub batches_spawned: u32,
    /// Character x at session start
    spawn_x: f32,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session. Invalid tuning aborts creation.
    pub fn new(tuning: Tuning, seed: u64) -> Result<Self, ConfigError> {
        tuning.validate()?;
        let mut rng = Pcg32::seed_from_u64(seed);

        let decor = Decor::new(&tuning, &mut rng);
        let hazard = Hazard::new(&tuning);
        let pickups = CollectiblePool::new(tuning.pickup_pool_capacity, tuning.coin_width)?;
        let character = Character::new(&tuning);

        let mut state = Self {
            seed,
            spawn_x: character.pos.x,
            tuning,
            rng,
            character,
            hazard,
            decor,
            pickups,
            score: 0,
            scroll_x: 0.0,
            background_offset: 0.0,
            ramp_timer: 0.0,
            time_ticks: 0,
            elapsed_secs: 0.0,
            rebase_count: 0,
            batches_spawned: 0,
            events: Vec::with_capacity(16),
        };
        state.spawn_batch();
        state.announce();

        log::info!("New session with seed {}", seed);
        Ok(state)
    }

    /// Reinitialise in place for a new run with the same tuning
    pub fn reset(&mut self, seed: u64) {
        let mut rng = Pcg32::seed_from_u64(seed);
        self.decor = Decor::new(&self.tuning, &mut rng);
        self.hazard = Hazard::new(&self.tuning);
        self.pickups.hide_all();
        self.character = Character::new(&self.tuning);

        self.seed = seed;
        self.rng = rng;
        self.spawn_x = self.character.pos.x;
        self.score = 0;
        self.scroll_x = 0.0;
        self.background_offset = 0.0;
        self.ramp_timer = 0.0;
        self.time_ticks = 0;
        self.elapsed_secs = 0.0;
        self.rebase_count = 0;
        self.batches_spawned = 0;
        self.events.clear();

        self.spawn_batch();
        self.announce();
        log::info!("Session reset with seed {}", seed);
    }

    /// Camera extent for the current scroll position
    pub fn bounds(&self) -> ScrollBounds {
        ScrollBounds::new(self.scroll_x, self.tuning.view_width)
    }

    /// Lay out a fresh coin batch ahead of the camera
    pub fn spawn_batch(&mut self) -> usize {
        let bounds = self.bounds();
        self.batches_spawned += 1;
        self.pickups.spawn_batch(bounds, &self.tuning, &mut self.rng)
    }

    /// Hazard contact
    pub fn kill(&mut self) -> bool {
        self.character.kill(&self.tuning, &mut self.events)
    }

    /// Coin contact. Scores only if the coin was still active.
    pub fn collect(&mut self, index: usize) -> bool {
        if !self.pickups.collect(index) {
            return false;
        }
        self.score += 1;
        self.events.push(GameEvent::ScoreChanged(self.score));
        true
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    pub fn stats(&self) -> RunStats {
        let travelled = self.character.pos.x - self.spawn_x;
        RunStats {
            score: self.score,
            distance: self.rebase_count as f32 * self.tuning.rebase_threshold + travelled,
            elapsed_secs: self.elapsed_secs,
            rebases: self.rebase_count,
        }
    }

    /// Initial presentation state for a fresh session
    fn announce(&mut self) {
        self.events.push(GameEvent::PlayAnimation {
            entity: EntityRef::Character,
            animation: Animation::Run,
            restart_if_same: false,
        });
        self.events.push(GameEvent::PlayAnimation {
            entity: EntityRef::Jetpack,
            animation: Animation::FlamesOn,
            restart_if_same: false,
        });
        self.events.push(GameEvent::JetpackVisible(false));
        self.events.push(GameEvent::ScoreChanged(0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::character::CharacterState;

    #[test]
    fn test_new_session() {
        let state = GameState::new(Tuning::default(), 42).expect("valid tuning");
        assert_eq!(state.score, 0);
        assert_eq!(state.character.state, CharacterState::Running);
        assert_eq!(state.batches_spawned, 1);
        assert!((1..=20).contains(&state.pickups.active_count()));
        assert_eq!(state.pickups.capacity(), 20);
        assert!(state.events().contains(&GameEvent::ScoreChanged(0)));
    }

    #[test]
    fn test_bad_tuning_aborts_session() {
        let tuning = Tuning {
            pickup_pool_capacity: 4,
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(tuning, 1),
            Err(ConfigError::PoolTooSmall { capacity: 4, .. })
        ));
    }

    #[test]
    fn test_unusable_speeds_abort_session() {
        let tuning = Tuning {
            fly_speed_band: (-500.0, -400.0),
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(tuning, 1),
            Err(ConfigError::NonPositive("fly_speed_band"))
        ));

        let tuning = Tuning {
            knockback_decay: 1.01,
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(tuning, 1),
            Err(ConfigError::OutOfRange { name: "knockback_decay", .. })
        ));
    }

    #[test]
    fn test_same_seed_same_world() {
        let a = GameState::new(Tuning::default(), 7).expect("valid");
        let b = GameState::new(Tuning::default(), 7).expect("valid");
        let xa: Vec<f32> = a.decor.items().map(|i| i.x).collect();
        let xb: Vec<f32> = b.decor.items().map(|i| i.x).collect();
        assert_eq!(xa, xb);
        assert_eq!(a.pickups.active_count(), b.pickups.active_count());
    }

    #[test]
    fn test_collect_counts_score() {
        let mut state = GameState::new(Tuning::default(), 3).expect("valid");
        let bounds = state.bounds();
        state.pickups.spawn_batch_of(4, bounds, &state.tuning, &mut state.rng);
        state.drain_events().for_each(drop);

        assert!(state.collect(0));
        assert!(state.collect(1));
        assert!(state.collect(2));
        assert_eq!(state.score, 3);
        assert!(!state.collect(2));
        assert_eq!(state.score, 3);

        let scores: Vec<_> = state.drain_events().collect();
        assert_eq!(
            scores,
            vec![
                GameEvent::ScoreChanged(1),
                GameEvent::ScoreChanged(2),
                GameEvent::ScoreChanged(3)
            ]
        );
    }

    #[test]
    fn test_reset_restores_session_start() {
        let mut state = GameState::new(Tuning::default(), 5).expect("valid");
        state.collect(0);
        state.kill();
        state.scroll_x = 1234.0;
        state.rebase_count = 3;
        state.character.pos.x += 900.0;

        state.reset(5);
        let fresh = GameState::new(Tuning::default(), 5).expect("valid");

        assert_eq!(state.score, 0);
        assert_eq!(state.character.state, CharacterState::Running);
        assert_eq!(state.character.pos, fresh.character.pos);
        assert_eq!(state.character.vel, fresh.character.vel);
        assert_eq!(state.scroll_x, 0.0);
        assert_eq!(state.rebase_count, 0);
        assert_eq!(state.batches_spawned, 1);
        let xa: Vec<f32> = state.decor.items().map(|i| i.x).collect();
        let xb: Vec<f32> = fresh.decor.items().map(|i| i.x).collect();
        assert_eq!(xa, xb);
        assert_eq!(state.pickups.active_count(), fresh.pickups.active_count());
        assert_eq!(state.events(), fresh.events());
    }

    #[test]
    fn test_stats_include_rebased_distance() {
        let mut state = GameState::new(Tuning::default(), 9).expect("valid");
        state.rebase_count = 2;
        state.character.pos.x += 100.0;
        let stats = state.stats();
        assert!((stats.distance - (2.0 * 2380.0 + 100.0)).abs() < 1e-3);
    }
}
