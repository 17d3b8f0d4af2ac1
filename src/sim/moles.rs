//! Whack-a-Mole
//!
//! One mole at a time pops out of a square grid of holes. The mole's life is
//! a single [`PhaseTimer`]: `Up(cell)` for `show_secs`, then `Hidden` for
//! `hide_secs`, then up again somewhere random. Hitting the raised cell
//! replaces the pending transition.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::input::Latch;
use super::state::{GameRng, Lifecycle, Outcome, Round};
use super::tick::Game;
use super::timer::PhaseTimer;
use crate::platform::{Cadence, HostEvent};
use crate::settings::MoleSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MolePhase {
    Hidden,
    /// Raised in the given cell (row-major index)
    Up(usize),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoleState {
    pub mole: PhaseTimer<MolePhase>,
    pub time_left: f32,
    pub score: u64,
    pub misses: u32,
    pub lifecycle: Lifecycle,
    pub outcome: Option<Outcome>,
    pub ticks: u64,
}

impl MoleState {
    pub fn new<R: Rng>(settings: &MoleSettings, rng: &mut R) -> Self {
        // First mole pops up on the first tick of the round
        let mut mole = PhaseTimer::new(MolePhase::Hidden);
        mole.schedule(random_hole(settings, rng), 0.0);
        Self {
            mole,
            time_left: settings.round_secs,
            score: 0,
            misses: 0,
            lifecycle: Lifecycle::NotStarted,
            outcome: None,
            ticks: 0,
        }
    }

    /// Cell the mole is currently raised in
    pub fn raised(&self) -> Option<usize> {
        match self.mole.phase() {
            MolePhase::Up(cell) => Some(cell),
            MolePhase::Hidden => None,
        }
    }
}

impl Round for MoleState {
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

fn random_hole<R: Rng>(settings: &MoleSettings, rng: &mut R) -> MolePhase {
    let holes = settings.grid_size * settings.grid_size;
    MolePhase::Up(rng.random_range(0..holes.max(1)))
}

/// Queue the follow-up for the phase just entered
fn rearm<R: Rng>(state: &mut MoleState, settings: &MoleSettings, rng: &mut R) {
    match state.mole.phase() {
        MolePhase::Up(_) => state.mole.schedule(MolePhase::Hidden, settings.show_secs),
        MolePhase::Hidden => state.mole.schedule(random_hole(settings, rng), settings.hide_secs),
    }
}

/// One frame: resolve the latched tap, run the mole clock, then the countdown
pub fn step<R: Rng>(state: &mut MoleState, tap: &mut Latch<usize>, settings: &MoleSettings, dt: f32, rng: &mut R) {
    if !state.lifecycle.is_running() {
        return;
    }
    state.ticks += 1;

    if let Some(cell) = tap.take() {
        if state.raised() == Some(cell) {
            state.score += 1;
            state.mole.set(MolePhase::Hidden);
            rearm(state, settings, rng);
            log::debug!("whack-a-mole: hit cell {cell}, score {}", state.score);
        } else {
            state.misses += 1;
        }
    }

    if state.mole.advance(dt).is_some() {
        rearm(state, settings, rng);
    }

    state.time_left = (state.time_left - dt).max(0.0);
    if state.time_left <= 0.0 {
        state.mole.set(MolePhase::Hidden);
        state.outcome = Some(Outcome::TimeUp);
        state.lifecycle.finish();
    }
}

/// Whack-a-Mole with its tuning
#[derive(Debug, Clone, Default)]
pub struct Moles {
    pub settings: MoleSettings,
}

impl Moles {
    pub fn new(settings: MoleSettings) -> Self {
        Self { settings }
    }
}

impl Game for Moles {
    type State = MoleState;
    type Sampler = Latch<usize>;
    type Action = usize;

    const NAME: &'static str = "whack-a-mole";

    fn cadence(&self) -> Cadence {
        Cadence::PerFrame
    }

    fn new_round(&self, rng: &mut GameRng) -> MoleState {
        MoleState::new(&self.settings, rng)
    }

    fn translate(&self, event: HostEvent) -> Option<usize> {
        let holes = self.settings.grid_size * self.settings.grid_size;
        match event {
            HostEvent::Tap(Some(cell)) if cell < holes => Some(cell),
            _ => None,
        }
    }

    fn sample(&self, sampler: &mut Latch<usize>, _state: &MoleState, cell: usize) {
        sampler.set(cell);
    }

    fn tick(&self, state: &mut MoleState, sampler: &mut Latch<usize>, dt: f32, rng: &mut GameRng) {
        step(state, sampler, &self.settings, dt, rng);
    }
}
