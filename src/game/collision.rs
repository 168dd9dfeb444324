//! Crash detection and pass scoring.

use super::Viewport;
use super::layout::Layout;
use super::pipes::ObstacleStream;
use crate::config::Tuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Rect {
    fn overlaps_column(&self, left: f64, right: f64) -> bool {
        self.right > left && self.left < right
    }
}

/// What ended a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crash {
    Pipe,
    Ceiling,
    Ground,
}

/// Pipes are checked before the boundaries, so clipping a pipe while also
/// touching the ground reports `Pipe`.
pub fn check_crash(
    bird: &Rect,
    stream: &ObstacleStream,
    layout: &Layout,
    viewport: Viewport,
    tuning: &Tuning,
) -> Option<Crash> {
    let hit_pipe = stream.pipes().iter().any(|pipe| {
        bird.overlaps_column(pipe.x, pipe.right(tuning.pipe_width))
            && (bird.top < pipe.gap_top || bird.bottom > pipe.gap_bottom(layout))
    });
    if hit_pipe {
        return Some(Crash::Pipe);
    }
    if bird.top < 0.0 {
        return Some(Crash::Ceiling);
    }
    if bird.bottom >= viewport.floor_y(tuning) {
        return Some(Crash::Ground);
    }
    None
}

/// Latch `passed` on every pipe whose trailing edge is behind `pass_line`.
/// Returns how many pipes were newly passed.
pub fn award_passes(pass_line: f64, stream: &mut ObstacleStream, tuning: &Tuning) -> u32 {
    let mut newly_passed = 0;
    for pipe in stream.pipes_mut() {
        if !pipe.passed && pass_line > pipe.right(tuning.pipe_width) {
            pipe.passed = true;
            newly_passed += 1;
        }
    }
    newly_passed
}
