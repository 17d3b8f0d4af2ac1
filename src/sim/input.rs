//! Input samplers
//!
//! Samplers sit between host events and the updater. They only ever hold the
//! most recent intent; the updater reads (and for one-shot actions, consumes)
//! it once per tick.

use std::collections::VecDeque;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// Cardinal direction on a grid (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// One-cell step in this direction
    pub fn delta(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::new(0, -1),
            Direction::Down => IVec2::new(0, 1),
            Direction::Left => IVec2::new(-1, 0),
            Direction::Right => IVec2::new(1, 0),
        }
    }
}

/// One-shot action slot: set by input, consumed by exactly one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Latch<T> {
    pending: Option<T>,
}

impl<T> Default for Latch<T> {
    fn default() -> Self {
        Self { pending: None }
    }
}

impl<T> Latch<T> {
    /// Record an action; a newer one replaces an unconsumed older one
    pub fn set(&mut self, value: T) {
        self.pending = Some(value);
    }

    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn is_set(&self) -> bool {
        self.pending.is_some()
    }
}

/// Next heading for a grid mover that may not reverse into itself
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeadingBuffer {
    next: Latch<Direction>,
}

impl HeadingBuffer {
    /// Request a turn. Rejected if it reverses `current` (the heading applied
    /// by the last tick). Returns whether the request was kept.
    pub fn request(&mut self, direction: Direction, current: Direction) -> bool {
        if direction == current.opposite() {
            return false;
        }
        self.next.set(direction);
        true
    }

    /// Heading to use for this tick
    pub fn take(&mut self, current: Direction) -> Direction {
        self.next.take().unwrap_or(current)
    }
}

/// Currently held up/down keys, read fresh each tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
}

impl HeldKeys {
    /// -1 (up), 0 or +1 (down); both held cancel out
    pub fn axis(&self) -> f32 {
        match (self.up, self.down) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Bounded FIFO of discrete moves, one applied per tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveQueue {
    moves: VecDeque<Direction>,
}

impl MoveQueue {
    pub const CAPACITY: usize = 4;

    /// Queue a move; drops it when the queue is full
    pub fn push(&mut self, direction: Direction) -> bool {
        if self.moves.len() >= Self::CAPACITY {
            return false;
        }
        self.moves.push_back(direction);
        true
    }

    pub fn pop(&mut self) -> Option<Direction> {
        self.moves.pop_front()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }
}

impl Default for MoveQueue {
    fn default() -> Self {
        Self {
            moves: VecDeque::with_capacity(Self::CAPACITY),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_rejects_reversal() {
        let mut buffer = HeadingBuffer::default();
        assert!(!buffer.request(Direction::Left, Direction::Right));
        assert_eq!(buffer.take(Direction::Right), Direction::Right);
    }

    #[test]
    fn test_heading_checks_applied_heading_not_buffered() {
        // Up then Left while moving Right: Left would reverse the applied
        // heading, so Up survives
        let mut buffer = HeadingBuffer::default();
        assert!(buffer.request(Direction::Up, Direction::Right));
        assert!(!buffer.request(Direction::Left, Direction::Right));
        assert_eq!(buffer.take(Direction::Right), Direction::Up);
        // Consumed
        assert_eq!(buffer.take(Direction::Up), Direction::Up);
    }

    #[test]
    fn test_latch_fires_once() {
        let mut latch = Latch::default();
        latch.set(());
        latch.set(());
        assert!(latch.is_set());
        assert_eq!(latch.take(), Some(()));
        assert_eq!(latch.take(), None);
    }

    #[test]
    fn test_held_keys_axis() {
        let mut keys = HeldKeys::default();
        assert_eq!(keys.axis(), 0.0);
        keys.up = true;
        assert_eq!(keys.axis(), -1.0);
        keys.down = true;
        assert_eq!(keys.axis(), 0.0);
        keys.up = false;
        assert_eq!(keys.axis(), 1.0);
    }

    #[test]
    fn test_move_queue_is_bounded_fifo() {
        let mut queue = MoveQueue::default();
        for dir in Direction::ALL {
            assert!(queue.push(dir));
        }
        assert!(!queue.push(Direction::Up));
        assert_eq!(queue.len(), MoveQueue::CAPACITY);
        assert_eq!(queue.pop(), Some(Direction::Up));
        assert_eq!(queue.pop(), Some(Direction::Down));
    }

    #[test]
    fn test_direction_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.delta() + dir.opposite().delta(), IVec2::ZERO);
        }
    }
}
