//! Per-game tick contract
//!
//! A `Game` bundles one game's tuning with its pure pieces: how a round is
//! seeded, how host events become actions, how actions are sampled, and how
//! a single tick advances the state.

use serde::Serialize;

use super::state::{GameRng, Round};
use crate::platform::{Cadence, HostEvent};

pub trait Game {
    /// Snapshot handed to the view
    type State: Round + Clone + Serialize;
    /// Latest input intent, read by the next tick
    type Sampler: Default;
    /// The game's narrow input vocabulary
    type Action: Copy + std::fmt::Debug;

    const NAME: &'static str;

    fn cadence(&self) -> Cadence;

    /// Fresh `NotStarted` round
    fn new_round(&self, rng: &mut GameRng) -> Self::State;

    /// Map a host event into this game's vocabulary (None = ignored)
    fn translate(&self, event: HostEvent) -> Option<Self::Action>;

    /// Whether the action also starts a round that has not started yet
    fn starts_round(&self, _action: Self::Action) -> bool {
        false
    }

    /// Record an action for the next tick. Never touches the state.
    fn sample(&self, sampler: &mut Self::Sampler, state: &Self::State, action: Self::Action);

    /// Advance one tick of `dt` seconds. Must be a no-op unless running.
    fn tick(&self, state: &mut Self::State, sampler: &mut Self::Sampler, dt: f32, rng: &mut GameRng);
}
