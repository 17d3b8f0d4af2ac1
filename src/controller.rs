//! Per-instance game controller
//!
//! Owns everything one running game needs: the current state, the input
//! sampler, the round RNG and the tick scheduler. Two controllers never
//! share anything, so any number of games can run side by side.
//!
//! The view never reads the live state while a tick is in progress. After
//! every change the controller publishes a copy into a single-slot handoff;
//! a slow view simply skips the states it missed.

use rand::Rng;

use crate::highscores::HighScores;
use crate::platform::{HostEvent, TickScheduler, TickToken};
use crate::sim::{Game, GameRng, Lifecycle, Round, round_rng};

/// A state copy stamped with its publication order
#[derive(Debug, Clone, PartialEq)]
pub struct Published<S> {
    pub version: u64,
    pub state: S,
}

/// Single-slot latest-state handoff. Publishing overwrites the slot.
#[derive(Debug, Clone)]
pub struct LatestState<S> {
    slot: Option<Published<S>>,
    version: u64,
}

impl<S> Default for LatestState<S> {
    fn default() -> Self {
        Self {
            slot: None,
            version: 0,
        }
    }
}

impl<S> LatestState<S> {
    pub fn publish(&mut self, state: S) -> u64 {
        self.version += 1;
        self.slot = Some(Published {
            version: self.version,
            state,
        });
        self.version
    }

    /// Take the newest unread state, leaving the slot empty
    pub fn take(&mut self) -> Option<Published<S>> {
        self.slot.take()
    }

    pub fn peek(&self) -> Option<&Published<S>> {
        self.slot.as_ref()
    }

    /// Version of the last publication (0 before the first)
    pub fn version(&self) -> u64 {
        self.version
    }
}

pub struct GameController<G: Game> {
    game: G,
    state: G::State,
    sampler: G::Sampler,
    /// Drives spawns within the current round
    rng: GameRng,
    /// Seeds each new round
    seeds: GameRng,
    scheduler: TickScheduler,
    latest: LatestState<G::State>,
    round: u32,
    best_score: u64,
    high_scores: HighScores,
}

impl<G: Game> GameController<G> {
    /// Controller whose rounds are fully determined by `seed`
    pub fn new(game: G, seed: u64) -> Self {
        let mut seeds = round_rng(seed);
        let mut rng = round_rng(seeds.random());
        let state = game.new_round(&mut rng);
        let scheduler = TickScheduler::new(game.cadence());

        let mut controller = Self {
            game,
            state,
            sampler: G::Sampler::default(),
            rng,
            seeds,
            scheduler,
            latest: LatestState::default(),
            round: 1,
            best_score: 0,
            high_scores: HighScores::new(),
        };
        controller.publish();
        controller
    }

    /// Controller seeded from the platform's entropy source
    pub fn with_entropy(game: G) -> Self {
        Self::new(game, rand::random())
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    /// Live state. Hosts that render asynchronously should use the handoff.
    pub fn state(&self) -> &G::State {
        &self.state
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state.lifecycle()
    }

    pub fn score(&self) -> u64 {
        self.state.score()
    }

    /// Newest published state without consuming it
    pub fn snapshot(&self) -> Option<&Published<G::State>> {
        self.latest.peek()
    }

    /// Newest published state the view has not taken yet
    pub fn take_published(&mut self) -> Option<Published<G::State>> {
        self.latest.take()
    }

    pub fn best_score(&self) -> u64 {
        self.best_score
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }

    /// Rounds begun in this session, counting the current one
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Start a `NotStarted` round and arm the scheduler.
    ///
    /// A running round keeps its token; a finished round stays finished.
    pub fn start(&mut self) -> Option<TickToken> {
        if self.state.lifecycle_mut().start() {
            log::info!("{}: round {} started", G::NAME, self.round);
            self.publish();
            return Some(self.scheduler.start());
        }
        self.scheduler.token()
    }

    /// Replace the round with a fresh `NotStarted` one.
    ///
    /// Stopping the scheduler invalidates every outstanding token, and the
    /// old state (with any scheduled phase transition) is dropped whole.
    pub fn reset(&mut self) {
        self.scheduler.stop();
        let seed = self.seeds.random();
        self.rng = round_rng(seed);
        self.state = self.game.new_round(&mut self.rng);
        self.sampler = G::Sampler::default();
        self.round += 1;
        log::info!("{}: reset to round {} (seed {seed:#x})", G::NAME, self.round);
        self.publish();
    }

    /// Stop ticking without touching the lifecycle
    pub fn pause(&mut self) -> bool {
        if !self.scheduler.is_running() {
            return false;
        }
        self.scheduler.stop();
        log::info!("{}: paused", G::NAME);
        true
    }

    /// Re-arm the scheduler of a paused running round
    pub fn resume(&mut self) -> Option<TickToken> {
        if !self.lifecycle().is_running() || self.scheduler.is_running() {
            return None;
        }
        // Releases that happened while paused were never seen
        self.sampler = G::Sampler::default();
        log::info!("{}: resumed", G::NAME);
        Some(self.scheduler.start())
    }

    pub fn is_paused(&self) -> bool {
        self.lifecycle().is_running() && !self.scheduler.is_running()
    }

    /// Feed one host event to the input sampler.
    ///
    /// Returns whether the game took it. Input only counts while ticks are
    /// being scheduled, except for an action that starts a fresh round. The
    /// state itself only changes on the next tick.
    pub fn handle(&mut self, event: HostEvent) -> bool {
        let Some(action) = self.game.translate(event) else {
            return false;
        };
        if self.lifecycle() == Lifecycle::NotStarted && self.game.starts_round(action) {
            self.start();
        }
        if !self.scheduler.is_running() {
            return false;
        }
        self.game.sample(&mut self.sampler, &self.state, action);
        true
    }

    /// Token the host must pass back with each timer callback
    pub fn token(&self) -> Option<TickToken> {
        self.scheduler.token()
    }

    /// Host timer callback: `elapsed` seconds passed since the last one.
    ///
    /// Returns the number of ticks applied. A stale token applies none.
    pub fn frame(&mut self, token: TickToken, elapsed: f32) -> u32 {
        let plan = self.scheduler.fire(token, elapsed);
        let mut applied = 0;

        for _ in 0..plan.steps {
            if !self.scheduler.is_live(token) {
                break;
            }
            self.game.tick(&mut self.state, &mut self.sampler, plan.dt, &mut self.rng);
            applied += 1;

            if self.lifecycle().is_over() {
                self.finish_round();
            }
        }

        if applied > 0 {
            self.publish();
        }
        applied
    }

    /// Drive the current run, for hosts that keep no token of their own
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        match self.token() {
            Some(token) => self.frame(token, elapsed),
            None => 0,
        }
    }

    fn finish_round(&mut self) {
        self.scheduler.stop();
        let score = self.state.score();
        let outcome = self.state.outcome();
        self.best_score = self.best_score.max(score);
        let rank = self.high_scores.add_score(score, self.round, outcome);
        log::info!(
            "{}: round {} over ({outcome:?}), score {score}, best {}, rank {rank:?}",
            G::NAME,
            self.round,
            self.best_score
        );
    }

    fn publish(&mut self) {
        self.latest.publish(self.state.clone());
    }
}
