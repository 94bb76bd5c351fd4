//! Fixed timestep simulation tick
//!
//! The world driver: one call advances the session by one frame.
//!
//! Order within a frame:
//! 1. character controller (input, state machine, integration)
//! 2. camera follows the character on x
//! 3. decor and hazard recycling against the camera bounds
//! 4. background offset
//! 5. re-basing once the camera passes the threshold
//! 6. difficulty timer
//! 7. overlap checks (hazard kills, coins score)

use super::collision::{ArcadeOverlap, Footprint, OverlapTest};
use super::state::GameState;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jetpack held this frame
    pub ascend: bool,
}

/// Advance the game state by one fixed timestep with arcade overlap tests
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    tick_with(state, input, dt, &ArcadeOverlap);
}

/// Advance the game state using a caller-supplied overlap test
pub fn tick_with<O: OverlapTest + ?Sized>(
    state: &mut GameState,
    input: &TickInput,
    dt: f32,
    overlap: &O,
) {
    state.time_ticks += 1;
    state.elapsed_secs += dt;

    state
        .character
        .update(input.ascend, &state.tuning, dt, &mut state.events);

    // Camera centres on the character and never scrolls left of the origin
    state.scroll_x = (state.character.pos.x - state.tuning.view_width * 0.5).max(0.0);

    let bounds = state.bounds();
    state.decor.recycle(bounds, &state.tuning, &mut state.rng);
    state.hazard.recycle(bounds, &state.tuning, &mut state.rng);

    state.background_offset = state.scroll_x;

    if state.scroll_x > state.tuning.rebase_threshold {
        rebase(state);
    }

    state.ramp_timer += dt;
    while state.ramp_timer >= state.tuning.ramp_period {
        state.ramp_timer -= state.tuning.ramp_period;
        state.character.ramp_speed(&state.tuning);
    }

    resolve_overlaps(state, overlap);
}

/// Shift every tracked x back by the threshold and respawn the coins.
///
/// Relative spacing between re-based entities is preserved. Inactive coins
/// are left alone; the respawn hides them anyway.
pub fn rebase(state: &mut GameState) {
    let shift = -state.tuning.rebase_threshold;

    state.character.shift_x(shift);
    state.decor.shift_x(shift);
    state.hazard.shift_x(shift);
    state.pickups.shift_active_x(shift);
    state.scroll_x += shift;
    state.background_offset = state.scroll_x;
    state.rebase_count += 1;

    log::debug!(
        "Re-based by {} (#{}) at tick {}",
        -shift,
        state.rebase_count,
        state.time_ticks
    );

    state.spawn_batch();
}

/// Map overlap reports to kill and collect
fn resolve_overlaps<O: OverlapTest + ?Sized>(state: &mut GameState, overlap: &O) {
    let body = Footprint::from(state.character.footprint);

    if overlap.overlaps(&Footprint::from(state.hazard.footprint), &body) {
        state.kill();
    }

    for index in 0..state.pickups.capacity() {
        let hit = match state.pickups.get(index) {
            Some(coin) if coin.active => overlap.overlaps(&Footprint::from(coin.footprint), &body),
            _ => false,
        };
        if hit {
            state.collect(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::character::CharacterState;
    use crate::sim::state::{GameEvent, Scene};
    use crate::tuning::Tuning;
    use glam::Vec2;
    use proptest::prelude::*;
    use std::cell::Cell;

    /// Reports nothing, so runs are not cut short by random hazard placement
    struct NoOverlap;

    impl OverlapTest for NoOverlap {
        fn overlaps(&self, _a: &Footprint, _b: &Footprint) -> bool {
            false
        }
    }

    /// Coins always touch, the hazard never does
    struct CoinsOnly;

    impl OverlapTest for CoinsOnly {
        fn overlaps(&self, a: &Footprint, _b: &Footprint) -> bool {
            matches!(a, Footprint::Circle(_))
        }
    }

    /// Reports every pair and counts the queries
    struct AlwaysOverlap {
        queries: Cell<usize>,
    }

    impl OverlapTest for AlwaysOverlap {
        fn overlaps(&self, _a: &Footprint, _b: &Footprint) -> bool {
            self.queries.set(self.queries.get() + 1);
            true
        }
    }

    fn session(seed: u64) -> GameState {
        GameState::new(Tuning::default(), seed).expect("valid tuning")
    }

    /// Every tracked x coordinate, in a fixed order
    fn tracked_xs(state: &GameState) -> Vec<f32> {
        let mut xs = vec![
            state.character.pos.x,
            state.character.footprint.min.x,
            state.hazard.pos.x,
            state.hazard.footprint.min.x,
        ];
        xs.extend(state.decor.items().map(|i| i.x));
        xs
    }

    #[test]
    fn test_camera_follows_character() {
        let mut state = session(1);
        let input = TickInput::default();
        for _ in 0..120 {
            tick_with(&mut state, &input, SIM_DT, &NoOverlap);
        }
        let expected = (state.character.pos.x - 400.0).max(0.0);
        assert_eq!(state.scroll_x, expected);
        assert_eq!(state.background_offset, state.scroll_x);
        assert!(state.scroll_x > 0.0);
    }

    #[test]
    fn test_rebase_shifts_everything_by_threshold() {
        let mut state = session(2);
        // Place the character so this frame's camera lands past the threshold
        state.character.pos.x = 2380.0 + 400.0 + 10.0;
        state.character.sync_footprint();
        let bounds = state.bounds();
        state.pickups.spawn_batch_of(5, bounds, &state.tuning, &mut state.rng);

        // Predict the pre-rebase positions by running the same frame on a clone
        // with re-basing disabled
        let mut reference = state.clone();
        reference.tuning.rebase_threshold = f32::MAX;
        let input = TickInput::default();
        tick_with(&mut reference, &input, SIM_DT, &NoOverlap);
        assert_eq!(reference.rebase_count, 0);

        let batches_before = state.batches_spawned;
        tick_with(&mut state, &input, SIM_DT, &NoOverlap);

        assert_eq!(state.rebase_count, 1);
        assert_eq!(state.batches_spawned, batches_before + 1);
        for (before, after) in tracked_xs(&reference).iter().zip(tracked_xs(&state)) {
            assert!(
                (before - after - 2380.0).abs() < 1e-2,
                "{before} -> {after} is not a 2380 shift"
            );
        }
        assert!((reference.scroll_x - state.scroll_x - 2380.0).abs() < 1e-2);
    }

    #[test]
    fn test_rebase_respawns_coins_ahead_of_rebased_camera() {
        let mut state = session(3);
        state.scroll_x = 2500.0;
        state.character.pos.x = 2900.0;
        rebase(&mut state);

        let right = state.bounds().right;
        assert!((state.scroll_x - 120.0).abs() < 1e-3);
        let active: Vec<_> = state.pickups.iter().filter(|c| c.active).collect();
        assert!((1..=20).contains(&active.len()));
        assert!((active[0].pos.x - (right + 100.0)).abs() < 1e-3);
        assert!(state.pickups.iter().filter(|c| !c.active).all(|c| !c.visible));
    }

    #[test]
    fn test_rebase_preserves_relative_spacing() {
        let mut state = session(4);
        let bounds = state.bounds();
        state.pickups.spawn_batch_of(6, bounds, &state.tuning, &mut state.rng);

        let before = tracked_xs(&state);
        let coins_before: Vec<f32> = state.pickups.iter().filter(|c| c.active).map(|c| c.pos.x).collect();
        // Shift only, then compare pairwise differences
        state.character.shift_x(-2380.0);
        state.decor.shift_x(-2380.0);
        state.hazard.shift_x(-2380.0);
        state.pickups.shift_active_x(-2380.0);
        let after = tracked_xs(&state);
        let coins_after: Vec<f32> = state.pickups.iter().filter(|c| c.active).map(|c| c.pos.x).collect();

        let all_before: Vec<f32> = before.iter().chain(coins_before.iter()).copied().collect();
        let all_after: Vec<f32> = after.iter().chain(coins_after.iter()).copied().collect();
        for i in 0..all_before.len() {
            for j in 0..all_before.len() {
                let d_before = all_before[i] - all_before[j];
                let d_after = all_after[i] - all_after[j];
                assert!((d_before - d_after).abs() < 1e-2);
            }
        }
    }

    #[test]
    fn test_hazard_overlap_kills() {
        let mut state = session(5);
        state.drain_events().for_each(drop);
        let always = AlwaysOverlap {
            queries: Cell::new(0),
        };
        tick_with(&mut state, &TickInput { ascend: true }, SIM_DT, &always);

        assert_eq!(state.character.state, CharacterState::Killed);
        assert_eq!(state.character.vel, Vec2::new(1000.0, 0.0));
        assert_eq!(state.character.accel_y, 0.0);
        // Every active coin was also reported and collected
        assert_eq!(state.pickups.active_count(), 0);
        assert!(state.score >= 1);
        // One hazard query plus one per active coin
        assert_eq!(always.queries.get(), 1 + state.score as usize);
    }

    #[test]
    fn test_hazard_overlap_repeated_is_idempotent() {
        let mut state = session(6);
        let always = AlwaysOverlap {
            queries: Cell::new(0),
        };
        tick_with(&mut state, &TickInput::default(), SIM_DT, &always);
        let vel = state.character.vel;
        tick_with(&mut state, &TickInput::default(), SIM_DT, &always);
        // Still Killed and decaying, not re-knocked back
        assert_eq!(state.character.state, CharacterState::Killed);
        assert!(state.character.vel.x < vel.x);
    }

    #[test]
    fn test_touching_real_hazard() {
        let mut state = session(7);
        // Park the laser on the character
        state.hazard.pos = state.character.pos - Vec2::new(0.0, 150.0);
        state.hazard.sync_footprint();
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.character.state, CharacterState::Killed);
    }

    #[test]
    fn test_coin_pickup_scores() {
        let mut state = session(8);
        let bounds = state.bounds();
        state.pickups.spawn_batch_of(3, bounds, &state.tuning, &mut state.rng);
        state.drain_events().for_each(drop);

        tick_with(&mut state, &TickInput::default(), SIM_DT, &CoinsOnly);
        assert_eq!(state.score, 3);
        assert_eq!(state.pickups.active_count(), 0);
        assert_eq!(state.character.state, CharacterState::Running);
        let last_score = state
            .drain_events()
            .filter(|e| matches!(e, GameEvent::ScoreChanged(_)))
            .last();
        assert_eq!(last_score, Some(GameEvent::ScoreChanged(3)));

        // Collected coins stay collected even though the overlap keeps firing
        tick_with(&mut state, &TickInput::default(), SIM_DT, &CoinsOnly);
        assert_eq!(state.score, 3);
    }

    #[test]
    fn test_coin_under_character_is_collected() {
        let mut state = session(15);
        state.hazard.shift_x(10_000.0);
        let bounds = state.bounds();
        state.pickups.spawn_batch_of(3, bounds, &state.tuning, &mut state.rng);
        let coin = state.pickups.get(0).cloned().expect("coin");

        // One frame of running moves the body 5 units right, onto the coin
        let half_height = state.character.size.y * 0.5;
        state.character.pos = coin.pos + Vec2::new(-5.0, half_height);
        state.character.sync_footprint();
        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(!state.pickups.get(0).expect("coin").active);
        assert!(state.score >= 1);
        assert_eq!(state.pickups.active_count() as u32 + state.score, 3);
    }

    #[test]
    fn test_ramp_ticks_once_per_period() {
        let mut state = session(9);
        let input = TickInput::default();
        for _ in 0..59 {
            tick_with(&mut state, &input, SIM_DT, &NoOverlap);
        }
        assert_eq!(state.character.run_speed, 300.0);
        for _ in 0..2 {
            tick_with(&mut state, &input, SIM_DT, &NoOverlap);
        }
        assert!((state.character.run_speed - 315.0).abs() < 1e-3);
    }

    #[test]
    fn test_ramp_paused_after_kill() {
        let mut state = session(10);
        state.kill();
        let input = TickInput::default();
        for _ in 0..300 {
            tick_with(&mut state, &input, SIM_DT, &NoOverlap);
        }
        assert_eq!(state.character.run_speed, 300.0);
    }

    #[test]
    fn test_game_over_event_emitted_once() {
        let mut state = session(11);
        state.kill();
        let input = TickInput::default();
        let mut switches = 0;
        for _ in 0..1200 {
            tick_with(&mut state, &input, SIM_DT, &NoOverlap);
            switches += state
                .drain_events()
                .filter(|e| *e == GameEvent::SwitchScene(Scene::GameOver))
                .count();
        }
        assert_eq!(state.character.state, CharacterState::Dead);
        assert_eq!(switches, 1);
    }

    #[test]
    fn test_long_run_stays_bounded() {
        let mut state = session(12);
        let mut input = TickInput::default();
        for frame in 0..20_000 {
            input.ascend = (frame / 45) % 2 == 0;
            tick_with(&mut state, &input, SIM_DT, &NoOverlap);
            state.drain_events().for_each(drop);
        }
        assert!(state.rebase_count > 10);
        assert!(state.scroll_x <= state.tuning.rebase_threshold);
        let limit = state.tuning.rebase_threshold * 3.0;
        assert!(state.character.pos.x < limit);
        assert!(state.decor.items().all(|i| i.x.abs() < limit + 2000.0));
        assert!(state.hazard.pos.x.abs() < limit + 2000.0);
        assert_eq!(state.batches_spawned, state.rebase_count + 1);
    }

    #[test]
    fn test_reset_after_game_over() {
        let mut state = session(13);
        state.kill();
        let input = TickInput::default();
        while state.character.state != CharacterState::Dead {
            tick_with(&mut state, &input, SIM_DT, &NoOverlap);
        }
        state.reset(14);
        assert_eq!(state.character.state, CharacterState::Running);
        assert_eq!(state.score, 0);
        tick_with(&mut state, &input, SIM_DT, &NoOverlap);
        assert_eq!(state.character.state, CharacterState::Running);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_rebase_is_a_pure_shift(seed in any::<u64>(), extra in 1.0f32..1500.0) {
            let mut state = session(seed);
            let bounds = state.bounds();
            state.pickups.spawn_batch_of(8, bounds, &state.tuning, &mut state.rng);
            state.scroll_x = 2380.0 + extra;

            let before = tracked_xs(&state);
            let batches = state.batches_spawned;
            rebase(&mut state);
            let after = tracked_xs(&state);

            prop_assert_eq!(state.batches_spawned, batches + 1);
            for (b, a) in before.iter().zip(after.iter()) {
                prop_assert!((b - a - 2380.0).abs() < 1e-2);
            }
        }
    }
}
