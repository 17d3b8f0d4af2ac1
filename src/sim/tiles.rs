//! 2048
//!
//! Tiles slide toward one edge; equal neighbours merge once per move and the
//! merged value is added to the score. A move that changes the board spawns
//! one new tile.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::input::{Direction, MoveQueue};
use super::state::{GameRng, Lifecycle, Outcome, Round};
use super::tick::Game;
use crate::consts::FRAME_DT;
use crate::platform::{Cadence, HostEvent, Key};
use crate::settings::TilesSettings;

/// Row-major grid, 0 = empty
pub type Board = Vec<Vec<u32>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilesState {
    pub board: Board,
    pub score: u64,
    /// Target tile reached at some point this round
    pub won: bool,
    /// Moves that changed the board
    pub moves: u32,
    pub lifecycle: Lifecycle,
    pub outcome: Option<Outcome>,
    pub ticks: u64,
}

impl TilesState {
    pub fn new<R: Rng>(settings: &TilesSettings, rng: &mut R) -> Self {
        let mut board = vec![vec![0; settings.size]; settings.size];
        for _ in 0..settings.start_tiles {
            spawn_tile(&mut board, settings.four_chance, rng);
        }
        Self::from_board(board)
    }

    pub fn from_board(board: Board) -> Self {
        Self {
            board,
            score: 0,
            won: false,
            moves: 0,
            lifecycle: Lifecycle::NotStarted,
            outcome: None,
            ticks: 0,
        }
    }
}

impl Round for TilesState {
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

/// What a single slide did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoveOutcome {
    pub moved: bool,
    /// Sum of merged tile values
    pub gained: u64,
    /// (row, col, value) of the spawned tile
    pub spawned: Option<(usize, usize, u32)>,
}

/// Collapse a line toward index 0. Each tile merges at most once.
pub fn slide_line(line: &[u32]) -> (Vec<u32>, u64) {
    let tiles: Vec<u32> = line.iter().copied().filter(|&v| v != 0).collect();
    let mut out = Vec::with_capacity(line.len());
    let mut gained = 0;

    let mut i = 0;
    while i < tiles.len() {
        if i + 1 < tiles.len() && tiles[i] == tiles[i + 1] {
            let merged = tiles[i] * 2;
            gained += u64::from(merged);
            out.push(merged);
            i += 2;
        } else {
            out.push(tiles[i]);
            i += 1;
        }
    }
    out.resize(line.len(), 0);
    (out, gained)
}

/// Cells of line `index` for a slide toward `direction`, leading edge first
fn line_cells(size: usize, direction: Direction, index: usize) -> Vec<(usize, usize)> {
    match direction {
        Direction::Left => (0..size).map(|c| (index, c)).collect(),
        Direction::Right => (0..size).rev().map(|c| (index, c)).collect(),
        Direction::Up => (0..size).map(|r| (r, index)).collect(),
        Direction::Down => (0..size).rev().map(|r| (r, index)).collect(),
    }
}

/// Slide every line of `board`. Returns (moved, gained).
pub fn slide(board: &mut Board, direction: Direction) -> (bool, u64) {
    let size = board.len();
    let mut moved = false;
    let mut gained = 0;

    for index in 0..size {
        let cells = line_cells(size, direction, index);
        let line: Vec<u32> = cells.iter().map(|&(r, c)| board[r][c]).collect();
        let (collapsed, line_gain) = slide_line(&line);
        if collapsed != line {
            moved = true;
            for (&(r, c), &value) in cells.iter().zip(&collapsed) {
                board[r][c] = value;
            }
        }
        gained += line_gain;
    }
    (moved, gained)
}

pub fn empty_cells(board: &Board) -> Vec<(usize, usize)> {
    board
        .iter()
        .enumerate()
        .flat_map(|(r, row)| {
            row.iter()
                .enumerate()
                .filter(|&(_, &v)| v == 0)
                .map(move |(c, _)| (r, c))
        })
        .collect()
}

/// Place a 2 (or a 4 with `four_chance`) on a uniformly random empty cell
pub fn spawn_tile<R: Rng>(board: &mut Board, four_chance: f64, rng: &mut R) -> Option<(usize, usize, u32)> {
    let empty = empty_cells(board);
    if empty.is_empty() {
        return None;
    }
    let (r, c) = empty[rng.random_range(0..empty.len())];
    let value = if rng.random_bool(four_chance) { 4 } else { 2 };
    board[r][c] = value;
    Some((r, c, value))
}

/// Any empty cell or any equal pair of row/column neighbours
pub fn can_move(board: &Board) -> bool {
    let size = board.len();
    for r in 0..size {
        for c in 0..size {
            let v = board[r][c];
            if v == 0 {
                return true;
            }
            if c + 1 < size && board[r][c + 1] == v {
                return true;
            }
            if r + 1 < size && board[r + 1][c] == v {
                return true;
            }
        }
    }
    false
}

pub fn reached(board: &Board, target: u32) -> bool {
    board.iter().flatten().any(|&v| v >= target)
}

pub fn tile_sum(board: &Board) -> u64 {
    board.iter().flatten().map(|&v| u64::from(v)).sum()
}

/// Slide, score, and spawn if the board changed
pub fn apply_move<R: Rng>(state: &mut TilesState, direction: Direction, settings: &TilesSettings, rng: &mut R) -> MoveOutcome {
    let (moved, gained) = slide(&mut state.board, direction);
    if !moved {
        return MoveOutcome::default();
    }
    state.score += gained;
    state.moves += 1;
    let spawned = spawn_tile(&mut state.board, settings.four_chance, rng);
    MoveOutcome {
        moved,
        gained,
        spawned,
    }
}

/// Apply at most one queued move, then evaluate win/loss
pub fn step<R: Rng>(state: &mut TilesState, queue: &mut MoveQueue, settings: &TilesSettings, rng: &mut R) {
    if !state.lifecycle.is_running() {
        return;
    }
    state.ticks += 1;

    let Some(direction) = queue.pop() else {
        return;
    };
    let outcome = apply_move(state, direction, settings, rng);
    if !outcome.moved {
        return;
    }

    if !state.won && reached(&state.board, settings.target) {
        state.won = true;
        log::info!("2048: reached {} after {} moves", settings.target, state.moves);
    }
    if !can_move(&state.board) {
        state.outcome = Some(if state.won { Outcome::Won } else { Outcome::Lost });
        state.lifecycle.finish();
    }
}

/// 2048 with its tuning
#[derive(Debug, Clone, Default)]
pub struct Tiles {
    pub settings: TilesSettings,
}

impl Tiles {
    pub fn new(settings: TilesSettings) -> Self {
        Self { settings }
    }
}

impl Game for Tiles {
    type State = TilesState;
    type Sampler = MoveQueue;
    type Action = Direction;

    const NAME: &'static str = "2048";

    fn cadence(&self) -> Cadence {
        Cadence::Interval { secs: FRAME_DT }
    }

    fn new_round(&self, rng: &mut GameRng) -> TilesState {
        TilesState::new(&self.settings, rng)
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

    fn starts_round(&self, _action: Direction) -> bool {
        true
    }

    fn sample(&self, sampler: &mut MoveQueue, _state: &TilesState, action: Direction) {
        sampler.push(action);
    }

    fn tick(&self, state: &mut TilesState, sampler: &mut MoveQueue, _dt: f32, rng: &mut GameRng) {
        step(state, sampler, &self.settings, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::round_rng;
    use proptest::prelude::*;

    fn running(board: Board) -> TilesState {
        let mut state = TilesState::from_board(board);
        state.lifecycle = Lifecycle::Running;
        state
    }

    #[test]
    fn test_left_merge_scenario() {
        let settings = TilesSettings::default();
        let mut state = running(vec![
            vec![2, 2, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]);

        let outcome = apply_move(&mut state, Direction::Left, &settings, &mut round_rng(4));

        assert!(outcome.moved);
        assert_eq!(outcome.gained, 4);
        assert_eq!(state.score, 4);
        let (r, c, value) = outcome.spawned.unwrap();
        assert!(value == 2 || value == 4);
        assert!((r, c) != (0, 0));
        assert_eq!(state.board[r][c], value);
        // First row is [4,0,0,0] apart from the spawned tile
        let mut row = state.board[0].clone();
        if r == 0 {
            row[c] = 0;
        }
        assert_eq!(row, vec![4, 0, 0, 0]);
        assert_eq!(tile_sum(&state.board), 4 + u64::from(value));
    }

    #[test]
    fn test_each_tile_merges_once() {
        assert_eq!(slide_line(&[2, 2, 2, 2]), (vec![4, 4, 0, 0], 8));
        assert_eq!(slide_line(&[4, 4, 8, 0]), (vec![8, 8, 0, 0], 8));
        assert_eq!(slide_line(&[2, 0, 2, 4]), (vec![4, 4, 0, 0], 4));
        assert_eq!(slide_line(&[2, 2, 2, 0]), (vec![4, 2, 0, 0], 4));
        assert_eq!(slide_line(&[0, 0, 0, 2]), (vec![2, 0, 0, 0], 0));
    }

    #[test]
    fn test_directions_use_their_leading_edge() {
        let base = vec![
            vec![2, 2, 2, 0],
            vec![0, 0, 0, 0],
            vec![2, 0, 0, 0],
            vec![2, 0, 0, 0],
        ];

        let mut board = base.clone();
        slide(&mut board, Direction::Right);
        assert_eq!(board[0], vec![0, 0, 2, 4]);

        let mut board = base.clone();
        let (moved, gained) = slide(&mut board, Direction::Down);
        assert!(moved);
        assert_eq!(gained, 4);
        let column: Vec<u32> = board.iter().map(|row| row[0]).collect();
        assert_eq!(column, vec![0, 0, 2, 4]);

        let mut board = base;
        slide(&mut board, Direction::Up);
        let column: Vec<u32> = board.iter().map(|row| row[0]).collect();
        assert_eq!(column, vec![4, 2, 0, 0]);
    }

    #[test]
    fn test_noop_move_spawns_nothing() {
        let settings = TilesSettings::default();
        let board = vec![
            vec![2, 4, 0, 0],
            vec![4, 2, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ];
        let mut state = running(board.clone());
        let outcome = apply_move(&mut state, Direction::Left, &settings, &mut round_rng(4));
        assert_eq!(outcome, MoveOutcome::default());
        assert_eq!(state.board, board);
        assert_eq!(state.score, 0);
        assert_eq!(state.moves, 0);
    }

    #[test]
    fn test_stuck_board_detection() {
        let stuck = vec![
            vec![2, 4, 2, 4],
            vec![4, 2, 4, 2],
            vec![2, 4, 2, 4],
            vec![4, 2, 4, 2],
        ];
        assert!(!can_move(&stuck));

        let mut pair = stuck.clone();
        pair[3][3] = 4;
        assert!(can_move(&pair));

        let mut hole = stuck;
        hole[1][1] = 0;
        assert!(can_move(&hole));
    }

    #[test]
    fn test_last_move_into_stuck_board_ends_round() {
        let settings = TilesSettings {
            four_chance: 0.0,
            ..Default::default()
        };
        // Sliding right opens one gap that the spawned 2 fills with no match
        let mut state = running(vec![
            vec![4, 8, 16, 0],
            vec![8, 16, 4, 8],
            vec![4, 8, 16, 4],
            vec![8, 16, 4, 8],
        ]);
        let mut queue = MoveQueue::default();
        queue.push(Direction::Right);

        step(&mut state, &mut queue, &settings, &mut round_rng(4));

        assert_eq!(state.board[0], vec![2, 4, 8, 16]);
        assert_eq!(state.lifecycle, Lifecycle::Over);
        assert_eq!(state.outcome, Some(Outcome::Lost));
    }

    #[test]
    fn test_reaching_target_sets_won_without_halting() {
        let settings = TilesSettings::default();
        let mut state = running(vec![
            vec![1024, 1024, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
            vec![0, 0, 0, 0],
        ]);
        let mut queue = MoveQueue::default();
        queue.push(Direction::Left);
        queue.push(Direction::Right);

        let mut rng = round_rng(4);
        step(&mut state, &mut queue, &settings, &mut rng);
        assert!(state.won);
        assert_eq!(state.score, 2048);
        assert!(state.lifecycle.is_running());

        step(&mut state, &mut queue, &settings, &mut rng);
        assert_eq!(state.moves, 2);
        assert!(state.lifecycle.is_running());
    }

    #[test]
    fn test_new_round_has_start_tiles() {
        let settings = TilesSettings::default();
        let state = TilesState::new(&settings, &mut round_rng(11));
        assert_eq!(empty_cells(&state.board).len(), 14);
        assert!(state.board.iter().flatten().all(|&v| v == 0 || v == 2 || v == 4));
    }

    fn board_strategy() -> impl Strategy<Value = Board> {
        let tile = prop_oneof![Just(0u32), Just(2), Just(4), Just(8), Just(16)];
        proptest::collection::vec(proptest::collection::vec(tile, 4), 4)
    }

    fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    proptest! {
        #[test]
        fn prop_tile_sum_is_conserved(board in board_strategy(), dir in direction(), seed in any::<u64>()) {
            let settings = TilesSettings::default();
            let mut state = running(board.clone());
            let before = tile_sum(&state.board);

            let outcome = apply_move(&mut state, dir, &settings, &mut round_rng(seed));

            let spawned = outcome.spawned.map_or(0, |(_, _, v)| u64::from(v));
            prop_assert_eq!(tile_sum(&state.board), before + spawned);
            prop_assert_eq!(state.score, outcome.gained);
            if !outcome.moved {
                prop_assert_eq!(&state.board, &board);
                prop_assert_eq!(state.score, 0);
                prop_assert!(outcome.spawned.is_none());
            } else {
                prop_assert!(outcome.spawned.is_some());
            }
        }

        #[test]
        fn prop_stuck_iff_no_move_changes_board(board in board_strategy()) {
            prop_assume!(tile_sum(&board) > 0);
            let full_and_unpaired = empty_cells(&board).is_empty() && !can_move(&board);
            let any_move = Direction::ALL.iter().any(|&dir| {
                let mut copy = board.clone();
                slide(&mut copy, dir).0
            });
            prop_assert_eq!(full_and_unpaired, !any_move);
        }
    }
}
