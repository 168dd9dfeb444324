//! Pipe gap sizing.
//!
//! Two profiles exist. The default one sizes the vertical gap from the
//! viewport height and uses a fixed pipe spacing. The compact profile, picked
//! for narrow viewports, sizes both gaps from the bird instead. The profile is
//! chosen once when a session starts.

use super::Viewport;
use crate::config::Tuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub vertical_gap: f64,
    pub horizontal_gap: f64,
    pub compact: bool,
}

impl Layout {
    pub fn for_viewport(viewport: Viewport, tuning: &Tuning) -> Self {
        Self::with_profile(viewport, tuning, viewport.width < tuning.compact_below_width)
    }

    pub fn with_profile(viewport: Viewport, tuning: &Tuning, compact: bool) -> Self {
        if compact {
            Self {
                vertical_gap: tuning.bird_size * tuning.compact_gap_birds,
                horizontal_gap: tuning.bird_size * tuning.compact_spacing_birds,
                compact,
            }
        } else {
            Self {
                vertical_gap: viewport.height * tuning.gap_fraction,
                horizontal_gap: tuning.pipe_spacing,
                compact,
            }
        }
    }

    /// Inclusive range a pipe's `gap_top` is drawn from, before the floor
    /// clamp. Collapses to a single point when the viewport is too short.
    pub fn gap_top_range(&self, viewport: Viewport, tuning: &Tuning) -> (f64, f64) {
        let lo = tuning.min_gap_top;
        let hi = viewport.height - self.vertical_gap - tuning.ground_height - tuning.min_gap_top;
        (lo, hi.max(lo))
    }
}
