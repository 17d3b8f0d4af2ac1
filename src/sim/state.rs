//! Round state shared by every game
//!
//! Each game keeps its own snapshot struct; what they have in common is the
//! lifecycle flag, the outcome and the way they draw randomness.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

/// Random source handed to updaters. Seedable so rounds can be replayed.
pub type GameRng = Pcg32;

/// Build the generator for a round from its seed material
pub fn round_rng(seed: u64) -> GameRng {
    Pcg32::seed_from_u64(seed)
}

/// Whether ticks and input are accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lifecycle {
    /// Fresh round, waiting for `start()`
    #[default]
    NotStarted,
    /// Ticks are applied
    Running,
    /// Round ended; state frozen until reset
    Over,
}

impl Lifecycle {
    pub fn is_running(self) -> bool {
        self == Lifecycle::Running
    }

    pub fn is_over(self) -> bool {
        self == Lifecycle::Over
    }

    /// `NotStarted -> Running`. Returns false (and changes nothing) otherwise.
    pub fn start(&mut self) -> bool {
        if *self == Lifecycle::NotStarted {
            *self = Lifecycle::Running;
            true
        } else {
            false
        }
    }

    /// `Running -> Over`. Returns false (and changes nothing) otherwise.
    pub fn finish(&mut self) -> bool {
        if *self == Lifecycle::Running {
            *self = Lifecycle::Over;
            true
        } else {
            false
        }
    }
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Won,
    Lost,
    /// Timed games end on the clock, not on a win or loss
    TimeUp,
}

/// Read access every game snapshot provides to the controller
pub trait Round {
    fn lifecycle(&self) -> Lifecycle;
    fn lifecycle_mut(&mut self) -> &mut Lifecycle;
    /// Score shown by the host (non-decreasing within a round)
    fn score(&self) -> u64;
    fn outcome(&self) -> Option<Outcome>;
}
