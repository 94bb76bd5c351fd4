//! Platform abstraction layer
//!
//! The simulation never talks to a renderer or an input device. A shell:
//! - folds raw key/pointer events into [`InputState`] and samples a
//!   [`TickInput`] each step
//! - drains [`GameEvent`]s after each step and hands them to a [`Presenter`]

use crate::sim::{Animation, EntityRef, GameEvent, Scene, TickInput};

/// Presentation capabilities the simulation relies on
pub trait Presenter {
    fn play_animation(&mut self, entity: EntityRef, animation: Animation, restart_if_same: bool);
    fn set_jetpack_visible(&mut self, visible: bool);
    fn switch_scene(&mut self, scene: Scene);
    fn set_score_text(&mut self, score: u32);
}

/// Forward simulation events to a presenter, in order
pub fn dispatch_events<P, I>(events: I, presenter: &mut P)
where
    P: Presenter + ?Sized,
    I: IntoIterator<Item = GameEvent>,
{
    for event in events {
        match event {
            GameEvent::PlayAnimation {
                entity,
                animation,
                restart_if_same,
            } => presenter.play_animation(entity, animation, restart_if_same),
            GameEvent::JetpackVisible(visible) => presenter.set_jetpack_visible(visible),
            GameEvent::ScoreChanged(score) => presenter.set_score_text(score),
            GameEvent::SwitchScene(scene) => presenter.switch_scene(scene),
        }
    }
}

/// Held state of the ascend control, built from discrete down/up events
#[derive(Debug, Clone, Copy, Default)]
pub struct InputState {
    held: bool,
    /// Set on a down edge, cleared by [`InputState::take_pressed`]
    pressed: bool,
}

impl InputState {
    pub fn ascend_down(&mut self) {
        if !self.held {
            self.pressed = true;
        }
        self.held = true;
    }

    pub fn ascend_up(&mut self) {
        self.held = false;
    }

    pub fn is_held(&self) -> bool {
        self.held
    }

    /// Consume the pending down edge (menu-style "press to continue")
    pub fn take_pressed(&mut self) -> bool {
        std::mem::take(&mut self.pressed)
    }

    /// Input for the next simulation step
    pub fn sample(&self) -> TickInput {
        TickInput { ascend: self.held }
    }
}

/// Presenter that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogPresenter {
    pub scene: Option<Scene>,
    pub score_text: String,
    pub jetpack_visible: bool,
    pub animation: Option<Animation>,
}

impl Presenter for LogPresenter {
    fn play_animation(&mut self, entity: EntityRef, animation: Animation, restart_if_same: bool) {
        log::trace!("{:?} plays {:?} (restart: {})", entity, animation, restart_if_same);
        if entity == EntityRef::Character {
            self.animation = Some(animation);
        }
    }

    fn set_jetpack_visible(&mut self, visible: bool) {
        self.jetpack_visible = visible;
    }

    fn switch_scene(&mut self, scene: Scene) {
        log::info!("Switching to {:?}", scene);
        self.scene = Some(scene);
    }

    fn set_score_text(&mut self, score: u32) {
        self.score_text = format!("Score: {}", score);
    }
}
