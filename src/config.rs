//! Game tuning.
//!
//! Every constant the simulation reads lives in [`Tuning`]. The defaults match
//! a 600-unit tall playfield; a TOML file can override any subset of fields.

use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};

/// Logical playfield height. Width follows the display surface.
pub const VIEWPORT_HEIGHT: f64 = 600.0;
pub const MIN_VIEWPORT_WIDTH: f64 = 240.0;
pub const MAX_VIEWPORT_WIDTH: f64 = 400.0;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Tuning {
    pub gravity: f64,
    /// Velocity the bird is set to on a jump (negative = up).
    pub jump_impulse: f64,
    pub bird_size: f64,
    pub pipe_width: f64,
    pub ground_height: f64,

    /// Default profile: vertical gap as a fraction of viewport height.
    pub gap_fraction: f64,
    /// Default profile: horizontal distance between consecutive pipes.
    pub pipe_spacing: f64,
    /// Compact profile multipliers, applied to `bird_size`.
    pub compact_gap_birds: f64,
    pub compact_spacing_birds: f64,
    /// Viewports narrower than this use the compact profile.
    pub compact_below_width: f64,

    pub first_pipe_offset: f64,
    pub min_gap_top: f64,
    pub gap_top_floor: f64,

    pub grace_frames: u32,

    pub base_speed: f64,
    /// `(score threshold, speed)` bands, ascending.
    pub speed_bands: Vec<(u32, f64)>,

    pub angle_rising: f64,
    pub angle_falling: f64,
    pub angle_smoothing: f64,

    pub idle_float_amplitude: f64,
    pub idle_float_rate: f64,

    pub die_delay_ms: u64,
    pub double_tap_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            gravity: 0.35,
            jump_impulse: -6.0,
            bird_size: 40.0,
            pipe_width: 60.0,
            ground_height: 60.0,

            gap_fraction: 1.0 / 3.0,
            pipe_spacing: 200.0,
            compact_gap_birds: 5.5,
            compact_spacing_birds: 5.0,
            compact_below_width: 320.0,

            first_pipe_offset: 100.0,
            min_gap_top: 50.0,
            gap_top_floor: 60.0,

            grace_frames: 30,

            base_speed: 1.5,
            speed_bands: vec![(10, 2.0), (20, 2.5)],

            angle_rising: -25.0,
            angle_falling: 70.0,
            angle_smoothing: 0.15,

            idle_float_amplitude: 10.0,
            idle_float_rate: 0.3,

            die_delay_ms: 200,
            double_tap_ms: 400,
        }
    }
}

impl Tuning {
    /// Load overrides from a TOML file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let tuning = Self::from_toml(&text)?;
        tracing::info!("Loaded tuning overrides from {:?}", path);
        Ok(tuning)
    }

    pub fn from_toml(text: &str) -> Result<Self> {
        let tuning: Tuning = toml::from_str(text)?;
        tuning.validate()?;
        Ok(tuning)
    }

    fn validate(&self) -> Result<()> {
        fn invalid(msg: &str) -> Result<()> {
            Err(Error::InvalidTuning(msg.into()))
        }

        if self.jump_impulse >= 0.0 {
            return invalid("jump_impulse must be negative");
        }
        if self.gravity <= 0.0 {
            return invalid("gravity must be positive");
        }
        if self.bird_size <= 0.0 || self.pipe_width <= 0.0 {
            return invalid("sizes must be positive");
        }
        if self.ground_height < 0.0 || self.ground_height >= VIEWPORT_HEIGHT {
            return invalid("ground_height must fit inside the playfield");
        }
        if !(self.gap_fraction > 0.0 && self.gap_fraction < 1.0) {
            return invalid("gap_fraction must be between 0 and 1");
        }
        if self.compact_gap_birds <= 0.0 || self.compact_spacing_birds <= 0.0 {
            return invalid("compact multipliers must be positive");
        }
        // Anything tighter recycles a pipe before the next one is on screen.
        if self.pipe_spacing <= self.pipe_width
            || self.compact_spacing_birds * self.bird_size <= self.pipe_width
        {
            return invalid("pipe spacing must exceed pipe_width");
        }
        if self.base_speed <= 0.0 {
            return invalid("base_speed must be positive");
        }
        if !self.speed_bands.windows(2).all(|w| w[0].0 < w[1].0) {
            return invalid("speed_bands thresholds must be strictly ascending");
        }
        let mut prev = self.base_speed;
        for &(_, speed) in &self.speed_bands {
            if speed <= prev {
                return invalid("speed_bands speeds must rise above base_speed");
            }
            prev = speed;
        }
        Ok(())
    }
}
