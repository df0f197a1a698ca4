use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::EngineError;
use crate::session_rng::SessionRng;
use super::food::generate_food;
use super::types::{DeathReason, Direction, GameMode, Point};

pub const DEFAULT_GRID_SIZE: usize = 20;
pub const INITIAL_SNAKE_LENGTH: usize = 3;
pub const FOOD_SCORE: u32 = 10;

/// One instant of a game. Snapshots are never edited after publication:
/// [`SnakeGameState::step`] returns a new value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnakeGameState {
    /// Head first, tail last.
    pub snake: VecDeque<Point>,
    pub food: Point,
    pub direction: Direction,
    pub score: u32,
    pub is_game_over: bool,
    pub is_paused: bool,
    pub mode: GameMode,
    pub grid_size: usize,
    pub death_reason: Option<DeathReason>,
}

impl SnakeGameState {
    /// Fresh game on the default board.
    pub fn create_initial_state(mode: GameMode, rng: &mut SessionRng) -> Result<Self, EngineError> {
        Self::create_with_grid_size(mode, DEFAULT_GRID_SIZE, rng)
    }

    /// Three horizontal segments around the board centre, heading right.
    pub fn create_with_grid_size(
        mode: GameMode,
        grid_size: usize,
        rng: &mut SessionRng,
    ) -> Result<Self, EngineError> {
        if grid_size < INITIAL_SNAKE_LENGTH {
            return Err(EngineError::InvalidSettings(format!(
                "grid size {} cannot hold a {}-segment snake",
                grid_size, INITIAL_SNAKE_LENGTH
            )));
        }

        let center = grid_size / 2;
        let head_x = center.max(INITIAL_SNAKE_LENGTH - 1);
        let snake: VecDeque<Point> = (0..INITIAL_SNAKE_LENGTH)
            .map(|i| Point::new(head_x - i, center))
            .collect();
        let food = generate_food(&snake, grid_size, rng)?;

        Ok(Self {
            snake,
            food,
            direction: Direction::Right,
            score: 0,
            is_game_over: false,
            is_paused: false,
            mode,
            grid_size,
            death_reason: None,
        })
    }

    /// Builds an arbitrary running position, mainly for replays and tests.
    pub fn from_parts(
        snake: impl IntoIterator<Item = Point>,
        food: Point,
        direction: Direction,
        mode: GameMode,
        grid_size: usize,
    ) -> Result<Self, EngineError> {
        let snake: VecDeque<Point> = snake.into_iter().collect();
        if snake.is_empty() {
            return Err(EngineError::InvalidSettings("snake must have at least one segment".to_string()));
        }
        if snake.iter().chain(std::iter::once(&food)).any(|p| p.x >= grid_size || p.y >= grid_size) {
            return Err(EngineError::InvalidSettings("position outside the board".to_string()));
        }

        Ok(Self {
            snake,
            food,
            direction,
            score: 0,
            is_game_over: false,
            is_paused: false,
            mode,
            grid_size,
            death_reason: None,
        })
    }

    pub fn head(&self) -> Point {
        *self.snake.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Point {
        *self.snake.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.snake.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snake.is_empty()
    }

    /// Where the head lands when moving `direction`, or `None` when it leaves
    /// a walled board.
    pub fn next_head(&self, direction: Direction) -> Option<Point> {
        next_position(self.head(), direction, self.mode, self.grid_size)
    }

    /// Whether `pos` hits the body, ignoring the current tail which vacates
    /// its cell on the same tick.
    pub fn hits_body(&self, pos: Point) -> bool {
        let body_without_tail = self.snake.len().saturating_sub(1);
        self.snake.iter().take(body_without_tail).any(|segment| *segment == pos)
    }

    /// Advances the game by one tick. Game-over and paused states are returned
    /// unchanged. Fails only when a growth tick leaves no cell for new food.
    pub fn step(&self, direction: Direction, rng: &mut SessionRng) -> Result<Self, EngineError> {
        if self.is_game_over || self.is_paused {
            return Ok(self.clone());
        }

        let Some(next_head) = self.next_head(direction) else {
            return Ok(self.game_over(DeathReason::WallCollision));
        };

        if self.hits_body(next_head) {
            return Ok(self.game_over(DeathReason::SelfCollision));
        }

        let mut next = self.clone();
        next.direction = direction;
        next.snake.push_front(next_head);

        if next_head == self.food {
            next.score += FOOD_SCORE;
            next.food = generate_food(&next.snake, self.grid_size, rng)?;
        } else {
            next.snake.pop_back();
        }

        Ok(next)
    }

    pub fn with_paused(&self, is_paused: bool) -> Self {
        Self {
            is_paused,
            ..self.clone()
        }
    }

    fn game_over(&self, reason: DeathReason) -> Self {
        Self {
            is_game_over: true,
            death_reason: Some(reason),
            ..self.clone()
        }
    }
}

pub fn next_position(from: Point, direction: Direction, mode: GameMode, grid_size: usize) -> Option<Point> {
    match mode {
        GameMode::Walls => match direction {
            Direction::Up if from.y > 0 => Some(Point::new(from.x, from.y - 1)),
            Direction::Down if from.y + 1 < grid_size => Some(Point::new(from.x, from.y + 1)),
            Direction::Left if from.x > 0 => Some(Point::new(from.x - 1, from.y)),
            Direction::Right if from.x + 1 < grid_size => Some(Point::new(from.x + 1, from.y)),
            _ => None,
        },
        GameMode::PassThrough => Some(match direction {
            Direction::Up => Point::new(from.x, wrapping_dec(from.y, grid_size)),
            Direction::Down => Point::new(from.x, wrapping_inc(from.y, grid_size)),
            Direction::Left => Point::new(wrapping_dec(from.x, grid_size), from.y),
            Direction::Right => Point::new(wrapping_inc(from.x, grid_size), from.y),
        }),
    }
}

fn wrapping_inc(value: usize, max: usize) -> usize {
    if value + 1 >= max { 0 } else { value + 1 }
}

fn wrapping_dec(value: usize, max: usize) -> usize {
    if value == 0 { max - 1 } else { value - 1 }
}
