//! Jetpack Run entry point
//!
//! Headless native runner: drives the simulation with an autopilot at a
//! fixed frame rate and logs what a presenter would show.
//!
//! Usage: `jetpack-run [--seed N] [--frames N] [--tuning FILE]`

use std::process::ExitCode;

use jetpack_run::consts::{MAX_SUBSTEPS, SIM_DT};
use jetpack_run::platform::{InputState, LogPresenter, dispatch_events};
use jetpack_run::sim::{GameState, Scene, tick};
use jetpack_run::{ConfigError, Tuning};

/// Rendered frame length the runner pretends to see
const FRAME_DT: f32 = 1.0 / 60.0;

/// Frames the game-over screen stays up before the autopilot presses again
const GAME_OVER_FRAMES: u32 = 90;

/// Command-line options
#[derive(Debug)]
struct Options {
    seed: u64,
    frames: u64,
    tuning: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            seed: 1,
            frames: 60 * 120,
            tuning: None,
        }
    }
}

impl Options {
    fn parse(args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut options = Self::default();
        let mut args = args;
        while let Some(arg) = args.next() {
            let mut value = |name: &str| args.next().ok_or(format!("{} needs a value", name));
            match arg.as_str() {
                "--seed" => {
                    options.seed = value("--seed")?.parse().map_err(|e| format!("--seed: {}", e))?;
                }
                "--frames" => {
                    options.frames = value("--frames")?
                        .parse()
                        .map_err(|e| format!("--frames: {}", e))?;
                }
                "--tuning" => options.tuning = Some(value("--tuning")?),
                other => return Err(format!("unknown argument `{}`", other)),
            }
        }
        Ok(options)
    }
}

/// Holds ascend to chase a slowly drifting target height
struct Autopilot {
    phase: f32,
}

impl Autopilot {
    fn steer(&mut self, state: &GameState, input: &mut InputState) {
        self.phase += FRAME_DT;
        let floor = state.tuning.floor_y();
        let target = floor - 180.0 + 140.0 * (self.phase * 0.7).sin();
        if state.character.pos.y > target {
            input.ascend_down();
        } else {
            input.ascend_up();
        }
    }
}

/// Game instance holding all state
struct Game {
    state: GameState,
    input: InputState,
    presenter: LogPresenter,
    autopilot: Autopilot,
    accumulator: f32,
    game_over_frames: u32,
    next_seed: u64,
    runs: u32,
}

impl Game {
    fn new(tuning: Tuning, seed: u64) -> Result<Self, ConfigError> {
        let mut state = GameState::new(tuning, seed)?;
        let mut presenter = LogPresenter::default();
        dispatch_events(state.drain_events(), &mut presenter);
        Ok(Self {
            state,
            input: InputState::default(),
            presenter,
            autopilot: Autopilot { phase: 0.0 },
            accumulator: 0.0,
            game_over_frames: 0,
            next_seed: seed.wrapping_add(1),
            runs: 1,
        })
    }

    /// Run simulation ticks for one rendered frame
    fn update(&mut self, dt: f32) {
        if self.presenter.scene == Some(Scene::GameOver) {
            self.game_over_screen();
            return;
        }

        self.autopilot.steer(&self.state, &mut self.input);

        let dt = dt.min(0.1);
        self.accumulator += dt;
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(&mut self.state, &self.input.sample(), SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
            dispatch_events(self.state.drain_events(), &mut self.presenter);
        }
    }

    /// Wait for a fresh press, then start a new run
    fn game_over_screen(&mut self) {
        self.game_over_frames += 1;
        if self.game_over_frames < GAME_OVER_FRAMES {
            self.input.ascend_up();
            self.input.take_pressed();
            return;
        }
        self.input.ascend_down();
        if self.input.take_pressed() {
            self.restart();
        }
    }

    fn restart(&mut self) {
        let seed = self.next_seed;
        self.next_seed = self.next_seed.wrapping_add(1);
        self.state.reset(seed);
        self.accumulator = 0.0;
        self.game_over_frames = 0;
        self.input = InputState::default();
        self.presenter.scene = Some(Scene::Game);
        dispatch_events(self.state.drain_events(), &mut self.presenter);
        self.runs += 1;
        log::info!("Game restarted with seed: {}", seed);
    }

    fn report(&self) {
        let stats = self.state.stats();
        log::info!(
            "Run {}: score {}, distance {:.0}, {:.1}s, {} re-bases",
            self.runs,
            stats.score,
            stats.distance,
            stats.elapsed_secs,
            stats.rebases
        );
    }
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Jetpack Run (headless) starting...");

    let options = match Options::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("usage: jetpack-run [--seed N] [--frames N] [--tuning FILE]");
            return ExitCode::FAILURE;
        }
    };

    let tuning = match options.tuning.as_deref().map(Tuning::load).transpose() {
        Ok(tuning) => tuning.unwrap_or_default(),
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut game = match Game::new(tuning, options.seed) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Cannot start session: {}", e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Game initialized with seed: {}", options.seed);

    for _ in 0..options.frames {
        let was_over = game.presenter.scene == Some(Scene::GameOver);
        game.update(FRAME_DT);
        if !was_over && game.presenter.scene == Some(Scene::GameOver) {
            game.report();
        }
    }

    game.report();
    log::info!("{} after {} frames", game.presenter.score_text, options.frames);
    ExitCode::SUCCESS
}
