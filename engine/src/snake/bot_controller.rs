use crate::session_rng::SessionRng;
use super::game_state::SnakeGameState;
use super::types::Direction;

pub const DEFAULT_GREEDY_PROBABILITY: f64 = 0.8;

/// One-step look-ahead autoplay for spectator games. It avoids moves that die
/// on the next tick and usually heads for the food, but it does no path
/// planning and will trap itself eventually.
pub struct BotController;

impl BotController {
    pub fn calculate_move(
        state: &SnakeGameState,
        greedy_probability: f64,
        rng: &mut SessionRng,
    ) -> Direction {
        let current_direction = state.direction;
        if state.is_game_over {
            return current_direction;
        }

        let safe_directions = Self::safe_directions(state);
        if safe_directions.is_empty() {
            return current_direction;
        }

        if rng.chance(greedy_probability)
            && let Some(direction) = Self::toward_food(state, &safe_directions)
        {
            return direction;
        }

        safe_directions[rng.random_range(0..safe_directions.len())]
    }

    /// Non-reversing directions whose next head neither leaves a walled board
    /// nor bites the body (the current tail excluded).
    pub fn safe_directions(state: &SnakeGameState) -> Vec<Direction> {
        Self::get_valid_directions(state.direction)
            .into_iter()
            .filter(|&direction| match state.next_head(direction) {
                Some(next_pos) => !state.hits_body(next_pos),
                None => false,
            })
            .collect()
    }

    fn get_valid_directions(current: Direction) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|d| !d.is_opposite(&current))
            .collect()
    }

    // Vertical moves are tried before horizontal ones.
    fn toward_food(state: &SnakeGameState, safe_directions: &[Direction]) -> Option<Direction> {
        let head = state.head();
        let food = state.food;

        let preferred = [
            (food.y < head.y, Direction::Up),
            (food.y > head.y, Direction::Down),
            (food.x < head.x, Direction::Left),
            (food.x > head.x, Direction::Right),
        ];

        preferred
            .into_iter()
            .filter(|(closer, _)| *closer)
            .map(|(_, direction)| direction)
            .find(|direction| safe_directions.contains(direction))
    }
}
