#![allow(dead_code)]

use flappy_arcade::audio::{Audio, Cue};
use flappy_arcade::config::Tuning;
use flappy_arcade::store::ScoreStore;
use flappy_arcade::{Game, GameState, Viewport};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::Duration;

#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub played: Vec<Cue>,
    pub delayed: Vec<(Cue, Duration)>,
}

impl Audio for RecordingAudio {
    fn play(&mut self, cue: Cue) {
        self.played.push(cue);
    }

    fn play_after(&mut self, cue: Cue, delay: Duration) {
        self.delayed.push((cue, delay));
    }
}

#[derive(Debug, Default)]
pub struct RecordingStore {
    pub best: u32,
    pub writes: Vec<u32>,
}

impl ScoreStore for RecordingStore {
    fn read_best(&self) -> u32 {
        self.best
    }

    fn write_best(&mut self, score: u32) {
        self.best = score;
        self.writes.push(score);
    }
}

pub fn game_with_seed(seed: u64) -> Game {
    Game::new(
        Tuning::default(),
        Viewport::new(400.0, 600.0),
        0,
        StdRng::seed_from_u64(seed),
    )
}

pub fn is_playing(game: &Game) -> bool {
    matches!(game.state(), GameState::Playing { .. })
}

/// Jump whenever the bird sinks below the middle of the next gap ahead.
pub fn autopilot(game: &mut Game, audio: &mut RecordingAudio) {
    let tuning = game.tuning().clone();
    let bird_left = game.viewport().bird_x();
    let Some(pipe) = game
        .stream()
        .pipes()
        .iter()
        .find(|p| p.right(tuning.pipe_width) > bird_left)
    else {
        return;
    };
    let target = pipe.gap_top + game.layout().vertical_gap / 2.0 - tuning.bird_size;
    if game.bird().y > target + 10.0 && game.bird().vy > 0.0 {
        game.jump(audio);
    }
}
