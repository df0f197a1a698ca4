use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::game_state::FOOD_SCORE;

pub const INITIAL_SPEED_MS: u64 = 150;
pub const SPEED_INCREMENT_MS: u64 = 2;
pub const MIN_SPEED_MS: u64 = 50;

/// Step function from score to tick interval: every food eaten shortens the
/// interval by `speed_increment_ms`, never below `min_speed_ms`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyCurve {
    pub initial_speed_ms: u64,
    pub speed_increment_ms: u64,
    pub min_speed_ms: u64,
}

impl Default for DifficultyCurve {
    fn default() -> Self {
        Self {
            initial_speed_ms: INITIAL_SPEED_MS,
            speed_increment_ms: SPEED_INCREMENT_MS,
            min_speed_ms: MIN_SPEED_MS,
        }
    }
}

impl DifficultyCurve {
    pub fn speed_ms(&self, score: u32) -> u64 {
        let steps = u64::from(score / FOOD_SCORE);
        self.initial_speed_ms
            .saturating_sub(steps.saturating_mul(self.speed_increment_ms))
            .max(self.min_speed_ms)
    }

    pub fn tick_interval(&self, score: u32) -> Duration {
        Duration::from_millis(self.speed_ms(score))
    }
}

impl Validate for DifficultyCurve {
    fn validate(&self) -> Result<(), String> {
        if self.min_speed_ms == 0 {
            return Err("min_speed_ms must be greater than 0".to_string());
        }
        if self.min_speed_ms > self.initial_speed_ms {
            return Err("min_speed_ms must not exceed initial_speed_ms".to_string());
        }
        if self.initial_speed_ms > 5000 {
            return Err("initial_speed_ms must not exceed 5000".to_string());
        }
        Ok(())
    }
}

/// Tick interval in milliseconds for `score` under the default curve.
pub fn get_speed(score: u32) -> u64 {
    DifficultyCurve::default().speed_ms(score)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_speed() {
        assert_eq!(get_speed(0), 150);
        assert_eq!(get_speed(9), 150);
    }

    #[test]
    fn test_each_food_speeds_up_by_increment() {
        assert_eq!(get_speed(10), 148);
        assert_eq!(get_speed(20), 146);
        assert_eq!(get_speed(250), 100);
    }

    #[test]
    fn test_floor_at_min_speed() {
        assert_eq!(get_speed(500), 50);
        assert_eq!(get_speed(510), 50);
        assert_eq!(get_speed(u32::MAX), 50);
    }

    #[test]
    fn test_non_increasing_in_score() {
        let mut previous = get_speed(0);
        for score in (0..2000).step_by(5) {
            let speed = get_speed(score);
            assert!(speed <= previous);
            assert!(speed >= MIN_SPEED_MS);
            previous = speed;
        }
    }

    #[test]
    fn test_validate_rejects_inverted_bounds() {
        let curve = DifficultyCurve {
            initial_speed_ms: 40,
            ..DifficultyCurve::default()
        };
        assert!(curve.validate().is_err());
        assert!(DifficultyCurve::default().validate().is_ok());
    }
}
