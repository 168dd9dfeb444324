use crate::config::Tuning;

/// Scroll speed for the current score: the base speed, or the speed of the
/// highest band whose threshold the score has reached.
pub fn scroll_speed(score: u32, tuning: &Tuning) -> f64 {
    tuning
        .speed_bands
        .iter()
        .rev()
        .find(|(threshold, _)| score >= *threshold)
        .map_or(tuning.base_speed, |&(_, speed)| speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bands() {
        let tuning = Tuning::default();
        assert_eq!(scroll_speed(0, &tuning), 1.5);
        assert_eq!(scroll_speed(9, &tuning), 1.5);
        assert_eq!(scroll_speed(10, &tuning), 2.0);
        assert_eq!(scroll_speed(19, &tuning), 2.0);
        assert_eq!(scroll_speed(20, &tuning), 2.5);
        assert_eq!(scroll_speed(500, &tuning), 2.5);
    }

    #[test]
    fn test_no_bands_means_constant_speed() {
        let tuning = Tuning {
            speed_bands: Vec::new(),
            ..Tuning::default()
        };
        assert_eq!(scroll_speed(100, &tuning), tuning.base_speed);
    }
}
