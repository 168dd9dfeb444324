//! Frame pacing.
//!
//! The Playing loop and the idle float animation run at different rates and
//! never at the same time. Switching cadence restarts the clock, so a stopped
//! loop cannot deliver a late tick into the next state.

use std::time::{Duration, Instant};

use crate::game::GameState;

pub const IDLE_FPS: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    /// Simulation ticks at the configured frame rate.
    Playing,
    /// Cosmetic float animation only.
    Idle,
    /// Game-over screen: repaint, nothing moves.
    Frozen,
}

impl Cadence {
    pub fn for_state(state: GameState) -> Self {
        match state {
            GameState::Idle => Self::Idle,
            GameState::Playing { .. } => Self::Playing,
            GameState::GameOver => Self::Frozen,
        }
    }
}

#[derive(Debug)]
pub struct FrameClock {
    play_period: Duration,
    idle_period: Duration,
    cadence: Cadence,
    next: Instant,
}

impl FrameClock {
    pub fn new(fps: u32, now: Instant) -> Self {
        let idle_period = period(IDLE_FPS);
        Self {
            play_period: period(fps),
            idle_period,
            cadence: Cadence::Idle,
            next: now + idle_period,
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    fn period_of(&self, cadence: Cadence) -> Duration {
        match cadence {
            Cadence::Playing => self.play_period,
            Cadence::Idle | Cadence::Frozen => self.idle_period,
        }
    }

    /// Follow the game state. A cadence change cancels the pending deadline
    /// and schedules a fresh one a full period out.
    pub fn sync(&mut self, state: GameState, now: Instant) {
        let cadence = Cadence::for_state(state);
        if cadence != self.cadence {
            tracing::debug!(from = ?self.cadence, to = ?cadence, "cadence switch");
            self.cadence = cadence;
            self.next = now + self.period_of(cadence);
        }
    }

    /// Time left before the next frame is due.
    pub fn until_due(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Consume the due frame, if any. A late frame is not replayed; the clock
    /// resynchronizes to `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<Cadence> {
        if now < self.next {
            return None;
        }
        let period = self.period_of(self.cadence);
        self.next += period;
        if self.next <= now {
            self.next = now + period;
        }
        Some(self.cadence)
    }
}

fn period(fps: u32) -> Duration {
    Duration::from_secs_f64(1.0 / fps.max(1) as f64)
}
