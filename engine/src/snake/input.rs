use std::collections::VecDeque;

use super::types::Direction;

/// Only a full reversal is rejected; repeating the current direction is a
/// valid no-op.
pub fn is_valid_direction_change(current: Direction, next: Direction) -> bool {
    !current.is_opposite(&next)
}

/// Buffers directional intents between ticks and resolves at most one of them
/// per tick.
#[derive(Debug, Default, Clone)]
pub struct InputQueue {
    pending: VecDeque<Direction>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enqueue(&mut self, direction: Direction) {
        self.pending.push_back(direction);
    }

    /// Parses a raw token; unrecognized tokens are dropped. Returns whether the
    /// token was queued.
    pub fn enqueue_token(&mut self, token: &str) -> bool {
        match token.parse::<Direction>() {
            Ok(direction) => {
                self.enqueue(direction);
                true
            }
            Err(_) => false,
        }
    }

    /// Pops intents until one is a legal change from `current`. Rejected
    /// reversals are consumed too. With nothing usable queued, `current`
    /// persists.
    pub fn resolve(&mut self, current: Direction) -> Direction {
        while let Some(next) = self.pending.pop_front() {
            if is_valid_direction_change(current, next) {
                return next;
            }
        }
        current
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_direction_changes() {
        for d in Direction::ALL {
            assert!(!is_valid_direction_change(d, d.opposite()));
            assert!(is_valid_direction_change(d, d));
        }
        assert!(is_valid_direction_change(Direction::Up, Direction::Left));
        assert!(is_valid_direction_change(Direction::Up, Direction::Right));
        assert!(is_valid_direction_change(Direction::Left, Direction::Up));
        assert!(is_valid_direction_change(Direction::Left, Direction::Down));
    }

    #[test]
    fn test_empty_queue_keeps_direction() {
        let mut queue = InputQueue::new();
        assert_eq!(queue.resolve(Direction::Left), Direction::Left);
    }

    #[test]
    fn test_one_intent_per_tick_in_order() {
        let mut queue = InputQueue::new();
        queue.enqueue(Direction::Up);
        queue.enqueue(Direction::Left);
        assert_eq!(queue.resolve(Direction::Right), Direction::Up);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.resolve(Direction::Up), Direction::Left);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_rejected_reversal_is_consumed() {
        let mut queue = InputQueue::new();
        queue.enqueue(Direction::Left);
        queue.enqueue(Direction::Down);
        assert_eq!(queue.resolve(Direction::Right), Direction::Down);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_only_reversals_leave_direction_and_empty_queue() {
        let mut queue = InputQueue::new();
        queue.enqueue(Direction::Left);
        queue.enqueue(Direction::Left);
        assert_eq!(queue.resolve(Direction::Right), Direction::Right);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_unknown_tokens_are_ignored() {
        let mut queue = InputQueue::new();
        assert!(!queue.enqueue_token("jump"));
        assert!(queue.enqueue_token("down"));
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.resolve(Direction::Right), Direction::Down);
    }
}
