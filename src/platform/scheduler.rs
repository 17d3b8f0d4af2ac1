//! Tick scheduling
//!
//! The host owns the real clock (`setInterval`, `requestAnimationFrame`, a
//! native frame loop). The scheduler turns the elapsed time it reports into a
//! number of simulation ticks, and owns the liveness check: every host
//! callback carries the `TickToken` it was armed with, and a token issued
//! before the last `stop()` or `start()` fires nothing.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};

/// How often a game's updater runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cadence {
    /// Fixed wall-clock interval (discrete games)
    Interval { secs: f32 },
    /// Once per display refresh with the measured frame time (continuous games)
    PerFrame,
}

impl Cadence {
    pub fn from_millis(ms: u32) -> Self {
        Cadence::Interval {
            secs: ms as f32 / 1000.0,
        }
    }
}

/// Proof that a host callback was armed by the current scheduling run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickToken(u32);

impl TickToken {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Ticks to run for one host callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickPlan {
    pub steps: u32,
    /// Seconds integrated by each step
    pub dt: f32,
}

impl TickPlan {
    pub const NONE: TickPlan = TickPlan { steps: 0, dt: 0.0 };

    pub fn is_empty(&self) -> bool {
        self.steps == 0
    }
}

/// Drives a game's updater at its cadence
#[derive(Debug, Clone)]
pub struct TickScheduler {
    cadence: Cadence,
    generation: u32,
    running: bool,
    accumulator: f32,
}

impl TickScheduler {
    pub fn new(cadence: Cadence) -> Self {
        Self {
            cadence,
            generation: 0,
            running: false,
            accumulator: 0.0,
        }
    }

    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Begin scheduling. Already running keeps the current token.
    pub fn start(&mut self) -> TickToken {
        if !self.running {
            self.generation = self.generation.wrapping_add(1);
            self.accumulator = 0.0;
            self.running = true;
        }
        TickToken(self.generation)
    }

    /// Halt scheduling. Every token handed out so far goes stale.
    pub fn stop(&mut self) {
        if self.running {
            self.generation = self.generation.wrapping_add(1);
            self.running = false;
            self.accumulator = 0.0;
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Token for the current run, if scheduling
    pub fn token(&self) -> Option<TickToken> {
        self.running.then_some(TickToken(self.generation))
    }

    pub fn is_live(&self, token: TickToken) -> bool {
        self.running && token.0 == self.generation
    }

    /// Account for `elapsed` seconds of host time on behalf of `token`
    pub fn fire(&mut self, token: TickToken, elapsed: f32) -> TickPlan {
        if !self.is_live(token) {
            return TickPlan::NONE;
        }
        let elapsed = elapsed.max(0.0);

        match self.cadence {
            Cadence::Interval { secs } => {
                self.accumulator += elapsed;

                let mut steps = 0;
                while self.accumulator >= secs && steps < MAX_SUBSTEPS {
                    self.accumulator -= secs;
                    steps += 1;
                }
                // Drop backlog we refused to simulate
                if steps == MAX_SUBSTEPS {
                    self.accumulator %= secs;
                }

                TickPlan { steps, dt: secs }
            }
            Cadence::PerFrame => {
                if elapsed == 0.0 {
                    return TickPlan::NONE;
                }
                TickPlan {
                    steps: 1,
                    dt: elapsed.min(MAX_FRAME_DT),
                }
            }
        }
    }
}
