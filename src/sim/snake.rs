//! Snake
//!
//! Grid mover on a fixed interval. The head advances one cell per tick;
//! eating food grows the body by keeping the tail.

use std::collections::VecDeque;

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::input::{Direction, HeadingBuffer};
use super::state::{GameRng, Lifecycle, Outcome, Round};
use super::tick::Game;
use crate::platform::{Cadence, HostEvent, Key};
use crate::settings::SnakeSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnakeState {
    pub board_size: i32,
    /// Head first
    pub body: VecDeque<IVec2>,
    pub heading: Direction,
    /// None once the body fills the board
    pub food: Option<IVec2>,
    pub score: u64,
    pub food_eaten: u32,
    pub lifecycle: Lifecycle,
    pub outcome: Option<Outcome>,
    pub ticks: u64,
}

impl SnakeState {
    /// Single-segment snake in the middle of the board heading right
    pub fn new<R: Rng>(board_size: i32, rng: &mut R) -> Self {
        let center = IVec2::splat(board_size / 2);
        let body = VecDeque::from([center]);
        let food = spawn_food(&body, board_size, rng);
        Self {
            board_size,
            body,
            heading: Direction::Right,
            food,
            score: 0,
            food_eaten: 0,
            lifecycle: Lifecycle::NotStarted,
            outcome: None,
            ticks: 0,
        }
    }

    pub fn head(&self) -> IVec2 {
        self.body[0]
    }

    pub fn occupies(&self, cell: IVec2) -> bool {
        self.body.contains(&cell)
    }
}

impl Round for SnakeState {
    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}

#[inline]
pub fn in_bounds(cell: IVec2, board_size: i32) -> bool {
    cell.x >= 0 && cell.x < board_size && cell.y >= 0 && cell.y < board_size
}

/// Uniformly random cell not covered by `body`; None if the board is full
pub fn spawn_food<R: Rng>(body: &VecDeque<IVec2>, board_size: i32, rng: &mut R) -> Option<IVec2> {
    let empty: Vec<IVec2> = (0..board_size)
        .flat_map(|y| (0..board_size).map(move |x| IVec2::new(x, y)))
        .filter(|cell| !body.contains(cell))
        .collect();
    if empty.is_empty() {
        return None;
    }
    Some(empty[rng.random_range(0..empty.len())])
}

/// Terminal check for a prospective head cell: off the board, or onto any
/// existing segment
pub fn is_fatal(state: &SnakeState, head: IVec2) -> bool {
    !in_bounds(head, state.board_size) || state.occupies(head)
}

/// Advance one movement step
pub fn step<R: Rng>(state: &mut SnakeState, heading: &mut HeadingBuffer, food_points: u64, rng: &mut R) {
    if !state.lifecycle.is_running() {
        return;
    }
    state.ticks += 1;
    state.heading = heading.take(state.heading);

    let new_head = state.head() + state.heading.delta();
    if is_fatal(state, new_head) {
        state.outcome = Some(Outcome::Lost);
        state.lifecycle.finish();
        return;
    }

    state.body.push_front(new_head);

    if state.food == Some(new_head) {
        state.score += food_points;
        state.food_eaten += 1;
        state.food = spawn_food(&state.body, state.board_size, rng);
        log::debug!("snake ate at {new_head}, length {}, next food {:?}", state.body.len(), state.food);

        if state.food.is_none() {
            state.outcome = Some(Outcome::Won);
            state.lifecycle.finish();
        }
    } else {
        state.body.pop_back();
    }
}

/// Snake with its tuning
#[derive(Debug, Clone, Default)]
pub struct Snake {
    pub settings: SnakeSettings,
}

impl Snake {
    pub fn new(settings: SnakeSettings) -> Self {
        Self { settings }
    }
}

impl Game for Snake {
    type State = SnakeState;
    type Sampler = HeadingBuffer;
    type Action = Direction;

    const NAME: &'static str = "snake";

    fn cadence(&self) -> Cadence {
        Cadence::from_millis(self.settings.interval_ms)
    }

    fn new_round(&self, rng: &mut GameRng) -> SnakeState {
        SnakeState::new(self.settings.board_size, rng)
    }

    fn translate(&self, event: HostEvent) -> Option<Direction> {
        match event {
            HostEvent::KeyDown(Key::Up) => Some(Direction::Up),
            HostEvent::KeyDown(Key::Down) => Some(Direction::Down),
            HostEvent::KeyDown(Key::Left) => Some(Direction::Left),
            HostEvent::KeyDown(Key::Right) => Some(Direction::Right),
            _ => None,
        }
    }

    fn sample(&self, sampler: &mut HeadingBuffer, state: &SnakeState, action: Direction) {
        sampler.request(action, state.heading);
    }

    fn tick(&self, state: &mut SnakeState, sampler: &mut HeadingBuffer, _dt: f32, rng: &mut GameRng) {
        step(state, sampler, self.settings.food_points, rng);
    }
}
