//! The obstacle stream: two pipe pairs sliding left, recycled off the left
//! edge and re-appended one spacing behind the survivor.

use rand::Rng;

use super::Viewport;
use super::layout::Layout;
use crate::config::Tuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipeColor {
    Green,
    Red,
}

impl PipeColor {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        if rng.random_bool(0.5) {
            Self::Green
        } else {
            Self::Red
        }
    }
}

/// One obstacle pair. The top column covers `[0, gap_top)`, the bottom one
/// starts at `gap_top + vertical_gap` and runs down to the ground.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipe {
    pub x: f64,
    pub gap_top: f64,
    pub color: PipeColor,
    /// Latches once the bird clears the trailing edge.
    pub passed: bool,
}

impl Pipe {
    fn spawn<R: Rng + ?Sized>(
        x: f64,
        layout: &Layout,
        viewport: Viewport,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Self {
        Self {
            x,
            gap_top: random_gap_top(layout, viewport, tuning, rng),
            color: PipeColor::random(rng),
            passed: false,
        }
    }

    pub fn right(&self, pipe_width: f64) -> f64 {
        self.x + pipe_width
    }

    pub fn gap_bottom(&self, layout: &Layout) -> f64 {
        self.gap_top + layout.vertical_gap
    }
}

fn random_gap_top<R: Rng + ?Sized>(
    layout: &Layout,
    viewport: Viewport,
    tuning: &Tuning,
    rng: &mut R,
) -> f64 {
    let (lo, hi) = layout.gap_top_range(viewport, tuning);
    let raw = if hi > lo { rng.random_range(lo..=hi) } else { lo };
    raw.max(tuning.gap_top_floor)
}

/// Always exactly two pipes, ordered left to right.
#[derive(Debug, Clone, PartialEq)]
pub struct ObstacleStream {
    pipes: [Pipe; 2],
}

impl ObstacleStream {
    /// Seed both pipes just past the right edge of the viewport.
    pub fn seed<R: Rng + ?Sized>(
        layout: &Layout,
        viewport: Viewport,
        tuning: &Tuning,
        rng: &mut R,
    ) -> Self {
        let first_x = viewport.width + tuning.first_pipe_offset;
        let first = Pipe::spawn(first_x, layout, viewport, tuning, rng);
        let second = Pipe::spawn(
            first_x + layout.horizontal_gap,
            layout,
            viewport,
            tuning,
            rng,
        );
        Self {
            pipes: [first, second],
        }
    }

    pub fn pipes(&self) -> &[Pipe] {
        &self.pipes
    }

    pub fn pipes_mut(&mut self) -> &mut [Pipe] {
        &mut self.pipes
    }

    /// Scroll every pipe left by `speed`, then recycle the leading pipe if its
    /// trailing edge has left the viewport. Returns whether a pipe was recycled.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        speed: f64,
        layout: &Layout,
        viewport: Viewport,
        tuning: &Tuning,
        rng: &mut R,
    ) -> bool {
        for pipe in &mut self.pipes {
            pipe.x -= speed;
        }

        if self.pipes[0].right(tuning.pipe_width) >= 0.0 {
            return false;
        }

        self.pipes.rotate_left(1);
        let x = self.pipes[0].x + layout.horizontal_gap;
        self.pipes[1] = Pipe::spawn(x, layout, viewport, tuning, rng);
        tracing::trace!(x, gap_top = self.pipes[1].gap_top, "pipe recycled");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn setup() -> (Tuning, Viewport, Layout, StdRng) {
        let tuning = Tuning::default();
        let viewport = Viewport::new(400.0, 600.0);
        let layout = Layout::for_viewport(viewport, &tuning);
        (tuning, viewport, layout, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_seed_positions() {
        let (tuning, viewport, layout, mut rng) = setup();
        let stream = ObstacleStream::seed(&layout, viewport, &tuning, &mut rng);
        let pipes = stream.pipes();
        assert_eq!(pipes.len(), 2);
        assert!((pipes[0].x - 500.0).abs() < 1e-9);
        assert!((pipes[1].x - 700.0).abs() < 1e-9);
        assert!(pipes.iter().all(|p| !p.passed));
    }

    #[test]
    fn test_gap_top_within_bounds() {
        let (tuning, viewport, layout, mut rng) = setup();
        let (_, hi) = layout.gap_top_range(viewport, &tuning);
        for _ in 0..500 {
            let top = random_gap_top(&layout, viewport, &tuning, &mut rng);
            assert!(top >= tuning.gap_top_floor);
            assert!(top <= hi);
        }
    }

    #[test]
    fn test_advance_scrolls_without_recycling() {
        let (tuning, viewport, layout, mut rng) = setup();
        let mut stream = ObstacleStream::seed(&layout, viewport, &tuning, &mut rng);
        let recycled = stream.advance(1.5, &layout, viewport, &tuning, &mut rng);
        assert!(!recycled);
        assert!((stream.pipes()[0].x - 498.5).abs() < 1e-9);
        assert!((stream.pipes()[1].x - 698.5).abs() < 1e-9);
    }

    #[test]
    fn test_recycle_appends_one_spacing_behind_survivor() {
        let (tuning, viewport, layout, mut rng) = setup();
        let mut stream = ObstacleStream::seed(&layout, viewport, &tuning, &mut rng);
        stream.pipes_mut()[0].x = -tuning.pipe_width + 0.5;
        stream.pipes_mut()[0].passed = true;
        stream.pipes_mut()[1].x = 139.5;

        assert!(stream.advance(1.0, &layout, viewport, &tuning, &mut rng));

        let pipes = stream.pipes();
        assert_eq!(pipes.len(), 2);
        assert!((pipes[0].x - 138.5).abs() < 1e-9);
        assert!((pipes[1].x - 338.5).abs() < 1e-9);
        assert!(!pipes[1].passed);
    }

    #[test]
    fn test_trailing_edge_exactly_at_origin_is_kept() {
        let (tuning, viewport, layout, mut rng) = setup();
        let mut stream = ObstacleStream::seed(&layout, viewport, &tuning, &mut rng);
        stream.pipes_mut()[0].x = -tuning.pipe_width + 1.0;
        assert!(!stream.advance(1.0, &layout, viewport, &tuning, &mut rng));
    }

    #[test]
    fn test_long_run_keeps_spacing_and_order() {
        let (tuning, viewport, layout, mut rng) = setup();
        let mut stream = ObstacleStream::seed(&layout, viewport, &tuning, &mut rng);
        let mut recycles = 0;
        for _ in 0..5_000 {
            if stream.advance(2.5, &layout, viewport, &tuning, &mut rng) {
                recycles += 1;
                let p = stream.pipes();
                assert!((p[1].x - p[0].x - layout.horizontal_gap).abs() < 1e-6);
            }
            let p = stream.pipes();
            assert!(p[0].x <= p[1].x);
        }
        assert!(recycles > 10);
    }

    #[test]
    fn test_both_colors_appear() {
        let mut rng = StdRng::seed_from_u64(3);
        let colors: Vec<_> = (0..64).map(|_| PipeColor::random(&mut rng)).collect();
        assert!(colors.contains(&PipeColor::Green));
        assert!(colors.contains(&PipeColor::Red));
    }
}
