mod bot_controller;
mod difficulty;
mod food;
mod game_state;
mod input;
mod session;
mod settings;
mod types;

pub use bot_controller::{BotController, DEFAULT_GREEDY_PROBABILITY};
pub use difficulty::{DifficultyCurve, INITIAL_SPEED_MS, MIN_SPEED_MS, SPEED_INCREMENT_MS, get_speed};
pub use food::generate_food;
pub use game_state::{
    DEFAULT_GRID_SIZE, FOOD_SCORE, INITIAL_SNAKE_LENGTH, SnakeGameState, next_position,
};
pub use input::{InputQueue, is_valid_direction_change};
pub use session::{
    GameObserver, SessionCommand, SessionHandle, SessionPhase, SnakeController, SnakeSession,
};
pub use settings::SnakeSessionSettings;
pub use types::{DeathReason, Direction, GameMode, Point};
