//! Raw activations to logical commands.

use std::time::{Duration, Instant};

use crate::game::GameState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Jump,
    Dismiss,
}

/// The kind of device an activation came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Activation {
    Key,
    Pointer,
    Touch,
}

/// Maps activations to commands for the current state.
///
/// On the game-over screen a touch needs a second tap within the double-tap
/// window to dismiss, so the stray taps that ended the session do not
/// skip the score. Keys and pointer clicks dismiss immediately.
#[derive(Debug, Clone)]
pub struct InputMapper {
    double_tap: Duration,
    last_tap: Option<Instant>,
}

impl InputMapper {
    pub fn new(double_tap: Duration) -> Self {
        Self {
            double_tap,
            last_tap: None,
        }
    }

    pub fn map(
        &mut self,
        activation: Activation,
        state: GameState,
        now: Instant,
    ) -> Option<Command> {
        match state {
            GameState::Idle => {
                self.last_tap = None;
                Some(Command::Start)
            }
            GameState::Playing { .. } => {
                self.last_tap = None;
                Some(Command::Jump)
            }
            GameState::GameOver => match activation {
                Activation::Key | Activation::Pointer => Some(Command::Dismiss),
                Activation::Touch => {
                    if let Some(prev) = self.last_tap.take()
                        && now.duration_since(prev) <= self.double_tap
                    {
                        return Some(Command::Dismiss);
                    }
                    self.last_tap = Some(now);
                    None
                }
            },
        }
    }
}
