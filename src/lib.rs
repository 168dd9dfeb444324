//! Flappy Bird style arcade game.
//!
//! [`game`] holds the simulation and is independent of any terminal or sound
//! device. The other modules are the collaborators the binary wires around
//! it: input mapping, frame pacing, painting, sound cues and best-score
//! storage.

pub mod audio;
pub mod config;
pub mod driver;
pub mod error;
pub mod game;
pub mod input;
pub mod render;
pub mod store;

pub use error::{Error, Result};
pub use game::{Game, GameState, TickOutcome, Viewport};
