use serde::{Deserialize, Serialize};

use crate::config::Validate;
use super::bot_controller::DEFAULT_GREEDY_PROBABILITY;
use super::difficulty::DifficultyCurve;
use super::game_state::DEFAULT_GRID_SIZE;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeSessionSettings {
    pub grid_size: usize,
    pub difficulty: DifficultyCurve,
    /// How often autoplay heads for the food instead of wandering.
    pub autoplay_greedy_probability: f64,
}

impl Default for SnakeSessionSettings {
    fn default() -> Self {
        Self {
            grid_size: DEFAULT_GRID_SIZE,
            difficulty: DifficultyCurve::default(),
            autoplay_greedy_probability: DEFAULT_GREEDY_PROBABILITY,
        }
    }
}

impl Validate for SnakeSessionSettings {
    fn validate(&self) -> Result<(), String> {
        if self.grid_size < 5 || self.grid_size > 100 {
            return Err("grid_size must be between 5 and 100".to_string());
        }
        self.difficulty.validate()?;
        if !(0.0..=1.0).contains(&self.autoplay_greedy_probability) {
            return Err("autoplay_greedy_probability must be between 0.0 and 1.0".to_string());
        }
        Ok(())
    }
}
