//! Bird physics: gravity, jump, cosmetic tilt.

use super::Viewport;
use super::collision::Rect;
use crate::config::Tuning;

#[derive(Debug, Clone, PartialEq)]
pub struct Bird {
    /// Top edge, in logical units. Never clamped; the boundary check ends
    /// the session instead.
    pub y: f64,
    /// Positive = falling.
    pub vy: f64,
    /// Tilt in degrees. Render-only.
    pub angle: f64,
}

impl Bird {
    /// A motionless bird vertically centered in the viewport.
    pub fn spawn(viewport: Viewport, tuning: &Tuning) -> Self {
        Self {
            y: Self::center_y(viewport, tuning),
            vy: 0.0,
            angle: 0.0,
        }
    }

    pub fn center_y(viewport: Viewport, tuning: &Tuning) -> f64 {
        (viewport.height - tuning.bird_size) / 2.0
    }

    /// Velocity reset, not an additive impulse.
    pub fn jump(&mut self, tuning: &Tuning) {
        self.vy = tuning.jump_impulse;
    }

    pub fn step(&mut self, tuning: &Tuning) {
        self.vy += tuning.gravity;
        self.y += self.vy;

        let target = if self.vy < 0.0 {
            tuning.angle_rising
        } else {
            tuning.angle_falling
        };
        self.angle += (target - self.angle) * tuning.angle_smoothing;
    }

    /// Collision box. Its left edge sits on the quarter-width column.
    pub fn bounds(&self, viewport: Viewport, tuning: &Tuning) -> Rect {
        let left = viewport.bird_x();
        Rect {
            left,
            top: self.y,
            right: left + tuning.bird_size,
            bottom: self.y + tuning.bird_size,
        }
    }

    /// A pipe counts as passed once its trailing edge is behind this line,
    /// half a bird past the quarter-width column.
    pub fn pass_line(viewport: Viewport, tuning: &Tuning) -> f64 {
        viewport.bird_x() + tuning.bird_size / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(400.0, 600.0)
    }

    #[test]
    fn test_spawn_is_centered_and_still() {
        let tuning = Tuning::default();
        let bird = Bird::spawn(viewport(), &tuning);
        assert!((bird.y - 280.0).abs() < f64::EPSILON);
        assert_eq!(bird.vy, 0.0);
    }

    #[test]
    fn test_step_integrates_velocity_then_position() {
        let tuning = Tuning::default();
        let mut bird = Bird::spawn(viewport(), &tuning);
        bird.step(&tuning);
        assert!((bird.vy - 0.35).abs() < 1e-9);
        assert!((bird.y - 280.35).abs() < 1e-9);
        bird.step(&tuning);
        assert!((bird.vy - 0.70).abs() < 1e-9);
        assert!((bird.y - 281.05).abs() < 1e-9);
    }

    #[test]
    fn test_jump_resets_velocity_instead_of_adding() {
        let tuning = Tuning::default();
        let mut bird = Bird::spawn(viewport(), &tuning);
        bird.vy = 9.0;
        bird.jump(&tuning);
        assert_eq!(bird.vy, tuning.jump_impulse);
        bird.vy = -3.0;
        bird.jump(&tuning);
        assert_eq!(bird.vy, tuning.jump_impulse);
    }

    #[test]
    fn test_angle_eases_toward_direction() {
        let tuning = Tuning::default();
        let mut bird = Bird::spawn(viewport(), &tuning);
        bird.jump(&tuning);
        bird.step(&tuning);
        assert!(bird.angle < 0.0);
        assert!(bird.angle > tuning.angle_rising);

        for _ in 0..200 {
            bird.step(&tuning);
        }
        assert!(bird.angle > 0.0);
        assert!(bird.angle <= tuning.angle_falling);
    }

    #[test]
    fn test_bounds_start_at_quarter_width() {
        let tuning = Tuning::default();
        let bird = Bird::spawn(viewport(), &tuning);
        let rect = bird.bounds(viewport(), &tuning);
        assert!((rect.left - 100.0).abs() < f64::EPSILON);
        assert!((rect.right - 140.0).abs() < f64::EPSILON);
        assert!((rect.bottom - rect.top - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pass_line_is_half_a_bird_in() {
        let tuning = Tuning::default();
        assert!((Bird::pass_line(viewport(), &tuning) - 120.0).abs() < f64::EPSILON);
    }
}
