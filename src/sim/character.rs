//! Character controller
//!
//! The jetpack runner: a kinematic body with an explicit integrator and a
//! one-way state machine.
//!
//! ```text
//! Running --kill()--> Killed --vel.x <= epsilon--> Dead
//! ```
//!
//! Dead is terminal; only a session reset brings back a Running character.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::state::{EntityRef, GameEvent, Scene};
use crate::tuning::Tuning;

/// Vertical motion state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterState {
    /// Player-controlled, speeds ramp up over time
    Running,
    /// Hit the hazard, sliding to a stop
    Killed,
    /// Stopped for good
    Dead,
}

/// Named animations a presenter knows how to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Animation {
    Run,
    Fly,
    Fall,
    Dead,
    /// Looping jetpack flames
    FlamesOn,
}

/// The player entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    /// Anchor at the feet, horizontally centred
    pub pos: Vec2,
    pub vel: Vec2,
    /// Vertical acceleration from the jetpack (gravity is added on top)
    pub accel_y: f32,
    pub run_speed: f32,
    /// Cap on downward speed while Running
    pub fall_speed: f32,
    /// Cap on upward speed while Running
    pub fly_speed: f32,
    pub state: CharacterState,
    pub size: Vec2,
    /// World-space footprint, re-derived after every move
    pub footprint: Rect,
    /// Resting on the floor after the last integration
    pub on_ground: bool,
    pub jetpack_on: bool,
    /// Last animation requested from the presenter
    pub animation: Animation,
}

impl Character {
    pub fn new(tuning: &Tuning) -> Self {
        let size = Vec2::new(tuning.character_size.0, tuning.character_size.1);
        let pos = Vec2::new(
            tuning.view_width * 0.5,
            tuning.view_height - tuning.character_spawn_inset,
        );
        let mut character = Self {
            pos,
            vel: Vec2::ZERO,
            accel_y: 0.0,
            run_speed: tuning.base_speed,
            fall_speed: tuning.base_speed,
            fly_speed: tuning.base_speed,
            state: CharacterState::Running,
            size,
            footprint: Rect::new(Vec2::ZERO, size),
            on_ground: false,
            jetpack_on: false,
            animation: Animation::Run,
        };
        character.sync_footprint();
        character
    }

    /// Advance one tick: state machine first, then integration.
    pub fn update(&mut self, ascend: bool, tuning: &Tuning, dt: f32, events: &mut Vec<GameEvent>) {
        match self.state {
            CharacterState::Running => {
                if ascend {
                    self.accel_y = tuning.ascend_accel;
                } else {
                    self.accel_y = 0.0;
                }
                self.set_jetpack(ascend, events);

                // Ground contact from the previous step wins over flying
                let next = if self.on_ground {
                    Animation::Run
                } else if ascend {
                    Animation::Fly
                } else {
                    Animation::Fall
                };
                self.play(next, false, events);

                self.vel.x = self.run_speed;
                self.integrate(tuning, dt);
            }

            CharacterState::Killed => {
                self.vel.x *= tuning.knockback_decay;
                if self.vel.x <= tuning.stop_epsilon {
                    self.enter_dead(events);
                } else {
                    self.integrate(tuning, dt);
                }
            }

            CharacterState::Dead => {
                self.vel = Vec2::ZERO;
            }
        }
    }

    /// Knock the character back. Only has an effect while Running.
    ///
    /// Returns true if this call performed the transition.
    pub fn kill(&mut self, tuning: &Tuning, events: &mut Vec<GameEvent>) -> bool {
        if !self.is_running() {
            return false;
        }

        self.state = CharacterState::Killed;
        self.play(Animation::Dead, true, events);
        self.accel_y = 0.0;
        self.vel = Vec2::new(tuning.knockback_speed, 0.0);
        self.set_jetpack(false, events);
        log::info!("Character killed at x={:.1}", self.pos.x);
        true
    }

    /// One difficulty step: grow each speed and clamp it to its band.
    ///
    /// No-op unless Running. Returns true if the speeds were updated.
    pub fn ramp_speed(&mut self, tuning: &Tuning) -> bool {
        if !self.is_running() {
            return false;
        }

        let was_capped = self.run_speed >= tuning.run_speed_band.1;
        let f = tuning.ramp_factor;
        let (run_min, run_max) = tuning.run_speed_band;
        let (fall_min, fall_max) = tuning.fall_speed_band;
        let (fly_min, fly_max) = tuning.fly_speed_band;
        self.run_speed = (self.run_speed * f).clamp(run_min, run_max);
        self.fall_speed = (self.fall_speed * f).clamp(fall_min, fall_max);
        self.fly_speed = (self.fly_speed * f).clamp(fly_min, fly_max);
        log::debug!(
            "Speed ramp: run={:.1} fall={:.1} fly={:.1}",
            self.run_speed,
            self.fall_speed,
            self.fly_speed
        );
        if !was_capped && self.run_speed >= tuning.run_speed_band.1 {
            log::info!("Run speed capped at {:.1}", self.run_speed);
        }
        true
    }

    /// Move horizontally without integrating (re-basing)
    pub fn shift_x(&mut self, dx: f32) {
        self.pos.x += dx;
        self.sync_footprint();
    }

    /// Place the footprint so its bottom centre sits on the anchor
    pub fn sync_footprint(&mut self) {
        self.footprint.min = Vec2::new(self.pos.x - self.size.x * 0.5, self.pos.y - self.size.y);
        self.footprint.size = self.size;
    }

    pub fn is_running(&self) -> bool {
        self.state == CharacterState::Running
    }

    /// Semi-implicit Euler step with floor and ceiling contacts
    fn integrate(&mut self, tuning: &Tuning, dt: f32) {
        self.vel.y += (tuning.gravity + self.accel_y) * dt;
        if self.state == CharacterState::Running {
            self.vel.y = self.vel.y.clamp(-self.fly_speed, self.fall_speed);
        }
        self.pos += self.vel * dt;

        let floor = tuning.floor_y();
        self.on_ground = false;
        if self.pos.y >= floor {
            self.pos.y = floor;
            self.vel.y = self.vel.y.min(0.0);
            self.on_ground = true;
        }
        if self.pos.y - self.size.y < 0.0 {
            self.pos.y = self.size.y;
            self.vel.y = self.vel.y.max(0.0);
        }

        self.sync_footprint();
    }

    fn enter_dead(&mut self, events: &mut Vec<GameEvent>) {
        self.state = CharacterState::Dead;
        self.vel = Vec2::ZERO;
        self.accel_y = 0.0;
        events.push(GameEvent::SwitchScene(Scene::GameOver));
        log::info!("Character stopped at x={:.1}, game over", self.pos.x);
    }

    /// Request an animation; unchanged requests without restart are dropped
    fn play(&mut self, animation: Animation, restart_if_same: bool, events: &mut Vec<GameEvent>) {
        if self.animation == animation && !restart_if_same {
            return;
        }
        self.animation = animation;
        events.push(GameEvent::PlayAnimation {
            entity: EntityRef::Character,
            animation,
            restart_if_same,
        });
    }

    fn set_jetpack(&mut self, on: bool, events: &mut Vec<GameEvent>) {
        if self.jetpack_on != on {
            self.jetpack_on = on;
            events.push(GameEvent::JetpackVisible(on));
        }
    }
}
