use std::collections::{HashSet, VecDeque};

use crate::EngineError;
use crate::session_rng::SessionRng;
use super::types::Point;

const RANDOM_ATTEMPTS: usize = 100;

/// Picks a uniformly random free cell. After a bounded number of blind draws it
/// falls back to choosing among the enumerated free cells, so a crowded board
/// still terminates and a full one reports [`EngineError::BoardFull`].
pub fn generate_food(
    snake: &VecDeque<Point>,
    grid_size: usize,
    rng: &mut SessionRng,
) -> Result<Point, EngineError> {
    if grid_size == 0 {
        return Err(EngineError::BoardFull { grid_size });
    }

    let occupied: HashSet<Point> = snake.iter().copied().collect();
    if occupied.len() >= grid_size * grid_size {
        return Err(EngineError::BoardFull { grid_size });
    }

    for _ in 0..RANDOM_ATTEMPTS {
        let pos = Point::new(rng.random_range(0..grid_size), rng.random_range(0..grid_size));
        if !occupied.contains(&pos) {
            return Ok(pos);
        }
    }

    let free: Vec<Point> = (0..grid_size)
        .flat_map(|y| (0..grid_size).map(move |x| Point::new(x, y)))
        .filter(|pos| !occupied.contains(pos))
        .collect();

    if free.is_empty() {
        return Err(EngineError::BoardFull { grid_size });
    }
    Ok(free[rng.random_range(0..free.len())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_never_on_snake() {
        let mut rng = SessionRng::new(42);
        let snake: VecDeque<Point> = (0..10).map(|x| Point::new(x, 3)).collect();
        for _ in 0..1000 {
            let food = generate_food(&snake, 10, &mut rng).unwrap();
            assert!(!snake.contains(&food));
            assert!(food.x < 10 && food.y < 10);
        }
    }

    #[test]
    fn test_single_free_cell_is_found() {
        let mut rng = SessionRng::new(42);
        let grid_size = 4;
        let snake: VecDeque<Point> = (0..grid_size)
            .flat_map(|y| (0..grid_size).map(move |x| Point::new(x, y)))
            .filter(|p| *p != Point::new(2, 1))
            .collect();
        assert_eq!(generate_food(&snake, grid_size, &mut rng), Ok(Point::new(2, 1)));
    }

    #[test]
    fn test_full_board_is_an_error() {
        let mut rng = SessionRng::new(42);
        let snake: VecDeque<Point> = (0..3)
            .flat_map(|y| (0..3).map(move |x| Point::new(x, y)))
            .collect();
        assert_eq!(
            generate_food(&snake, 3, &mut rng),
            Err(EngineError::BoardFull { grid_size: 3 })
        );
    }
}
