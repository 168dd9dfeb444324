//! The simulation: one owned [`Game`] advanced by a single `tick` and read by
//! the renderer in between.

pub mod bird;
pub mod collision;
pub mod difficulty;
pub mod layout;
pub mod pipes;

use rand::rngs::StdRng;
use std::time::Duration;

use crate::audio::{Audio, Cue};
use crate::config::{MAX_VIEWPORT_WIDTH, MIN_VIEWPORT_WIDTH, Tuning, VIEWPORT_HEIGHT};
use crate::input::Command;
use crate::store::ScoreStore;
use bird::Bird;
use collision::Crash;
use layout::Layout;
use pipes::ObstacleStream;

/// Playfield size in logical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Logical viewport for a display surface of `pw` x `ph` pixels. Height is
    /// fixed; width follows the aspect ratio within the playable range.
    pub fn from_surface(pw: usize, ph: usize) -> Self {
        let width = if ph == 0 {
            MAX_VIEWPORT_WIDTH
        } else {
            VIEWPORT_HEIGHT * pw as f64 / ph as f64
        };
        Self::new(
            width.clamp(MIN_VIEWPORT_WIDTH, MAX_VIEWPORT_WIDTH),
            VIEWPORT_HEIGHT,
        )
    }

    pub fn bird_x(&self) -> f64 {
        self.width / 4.0
    }

    pub fn floor_y(&self, tuning: &Tuning) -> f64 {
        self.height - tuning.ground_height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Idle,
    /// Crash checks are skipped while `grace_frames > 0`.
    Playing { grace_frames: u32 },
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Not playing; nothing moved.
    Inactive,
    Running,
    Over(Crash),
}

pub struct Game {
    tuning: Tuning,
    viewport: Viewport,
    /// Surface change seen mid-session, applied once the session is left.
    pending_viewport: Option<Viewport>,
    layout: Layout,
    bird: Bird,
    stream: ObstacleStream,
    score: u32,
    best: u32,
    state: GameState,
    jump_queued: bool,
    last_crash: Option<Crash>,
    frame: u64,
    ground_x: f64,
    rng: StdRng,
}

impl Game {
    pub fn new(tuning: Tuning, viewport: Viewport, best: u32, mut rng: StdRng) -> Self {
        let layout = Layout::for_viewport(viewport, &tuning);
        let stream = ObstacleStream::seed(&layout, viewport, &tuning, &mut rng);
        Self {
            bird: Bird::spawn(viewport, &tuning),
            tuning,
            viewport,
            pending_viewport: None,
            layout,
            stream,
            score: 0,
            best,
            state: GameState::Idle,
            jump_queued: false,
            last_crash: None,
            frame: 0,
            ground_x: 0.0,
            rng,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn bird(&self) -> &Bird {
        &self.bird
    }

    pub fn stream(&self) -> &ObstacleStream {
        &self.stream
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn last_crash(&self) -> Option<Crash> {
        self.last_crash
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Accumulated scroll distance, for parallax scenery.
    pub fn ground_x(&self) -> f64 {
        self.ground_x
    }

    pub fn scroll_speed(&self) -> f64 {
        difficulty::scroll_speed(self.score, &self.tuning)
    }

    /// Record a new surface size. The geometry is locked while a session is
    /// running or frozen on the game-over screen.
    pub fn resize(&mut self, viewport: Viewport) {
        if self.state == GameState::Idle {
            self.apply_viewport(viewport);
        } else {
            self.pending_viewport = Some(viewport);
        }
    }

    fn apply_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.layout = Layout::for_viewport(viewport, &self.tuning);
        self.bird = Bird::spawn(viewport, &self.tuning);
    }

    pub fn apply(&mut self, command: Command, audio: &mut dyn Audio) -> bool {
        match command {
            Command::Start => self.start(audio),
            Command::Jump => self.jump(audio),
            Command::Dismiss => self.dismiss(),
        }
    }

    /// Idle -> Playing. Everything session-scoped is rebuilt from scratch.
    pub fn start(&mut self, audio: &mut dyn Audio) -> bool {
        if self.state != GameState::Idle {
            return false;
        }
        if let Some(viewport) = self.pending_viewport.take() {
            self.viewport = viewport;
        }
        self.layout = Layout::for_viewport(self.viewport, &self.tuning);
        self.bird = Bird::spawn(self.viewport, &self.tuning);
        self.stream = ObstacleStream::seed(&self.layout, self.viewport, &self.tuning, &mut self.rng);
        self.score = 0;
        self.jump_queued = false;
        self.last_crash = None;
        self.state = GameState::Playing {
            grace_frames: self.tuning.grace_frames,
        };
        audio.play(Cue::Start);
        tracing::info!(
            width = self.viewport.width,
            compact = self.layout.compact,
            "Session started"
        );
        true
    }

    /// Queue a jump for the next tick. Ignored outside Playing.
    pub fn jump(&mut self, audio: &mut dyn Audio) -> bool {
        if !matches!(self.state, GameState::Playing { .. }) {
            return false;
        }
        self.jump_queued = true;
        audio.play(Cue::Jump);
        true
    }

    /// GameOver -> Idle. Never starts a new session by itself.
    pub fn dismiss(&mut self) -> bool {
        if self.state != GameState::GameOver {
            return false;
        }
        self.state = GameState::Idle;
        self.frame = 0;
        match self.pending_viewport.take() {
            Some(viewport) => self.apply_viewport(viewport),
            None => self.bird = Bird::spawn(self.viewport, &self.tuning),
        }
        true
    }

    /// Advance one Playing step: physics, obstacles, then crash and pass
    /// evaluation once the grace period is over.
    pub fn tick(&mut self, audio: &mut dyn Audio, store: &mut dyn ScoreStore) -> TickOutcome {
        if !matches!(self.state, GameState::Playing { .. }) {
            return TickOutcome::Inactive;
        }

        if std::mem::take(&mut self.jump_queued) {
            self.bird.jump(&self.tuning);
        }
        self.bird.step(&self.tuning);

        let speed = self.scroll_speed();
        self.stream.advance(
            speed,
            &self.layout,
            self.viewport,
            &self.tuning,
            &mut self.rng,
        );
        self.ground_x += speed;

        if let GameState::Playing { grace_frames } = &mut self.state
            && *grace_frames > 0
        {
            *grace_frames -= 1;
            return TickOutcome::Running;
        }

        let bounds = self.bird.bounds(self.viewport, &self.tuning);
        if let Some(crash) = collision::check_crash(
            &bounds,
            &self.stream,
            &self.layout,
            self.viewport,
            &self.tuning,
        ) {
            self.end_session(crash, audio, store);
            return TickOutcome::Over(crash);
        }

        let pass_line = Bird::pass_line(self.viewport, &self.tuning);
        for _ in 0..collision::award_passes(pass_line, &mut self.stream, &self.tuning) {
            self.score += 1;
            audio.play(Cue::Score);
            tracing::debug!(score = self.score, "pipe passed");
        }
        TickOutcome::Running
    }

    fn end_session(&mut self, crash: Crash, audio: &mut dyn Audio, store: &mut dyn ScoreStore) {
        self.state = GameState::GameOver;
        self.last_crash = Some(crash);
        self.jump_queued = false;

        audio.play(Cue::Hit);
        audio.play_after(Cue::Die, Duration::from_millis(self.tuning.die_delay_ms));

        tracing::info!(score = self.score, ?crash, "Game over");
        if self.score > self.best {
            self.best = self.score;
            store.write_best(self.best);
            tracing::info!(best = self.best, "New best score");
        }
    }

    /// One step of the idle float animation. No physics, no pipes, no scoring.
    pub fn idle_step(&mut self) {
        if self.state != GameState::Idle {
            return;
        }
        self.frame += 1;
        let phase = self.frame as f64 * self.tuning.idle_float_rate;
        self.bird.y = Bird::center_y(self.viewport, &self.tuning)
            + phase.sin() * self.tuning.idle_float_amplitude;
        self.bird.vy = 0.0;
        self.bird.angle = 0.0;
        self.ground_x += self.tuning.base_speed;
    }
}
