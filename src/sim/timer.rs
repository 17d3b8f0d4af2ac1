//! Cancellable phase transitions
//!
//! Multi-phase effects (a mole popping up then down, a score flash fading)
//! keep their current phase plus at most one scheduled transition. The timer
//! lives inside the game state and only moves when the updater advances it,
//! so replacing the state on reset cancels it with nothing left in flight.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
struct Pending<P> {
    next: P,
    remaining: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseTimer<P> {
    phase: P,
    pending: Option<Pending<P>>,
}

impl<P: Copy> PhaseTimer<P> {
    pub fn new(phase: P) -> Self {
        Self {
            phase,
            pending: None,
        }
    }

    pub fn phase(&self) -> P {
        self.phase
    }

    /// Jump to `phase` now, dropping any scheduled transition
    pub fn set(&mut self, phase: P) {
        self.phase = phase;
        self.pending = None;
    }

    /// Move to `next` after `secs`. Replaces any scheduled transition.
    pub fn schedule(&mut self, next: P, secs: f32) {
        self.pending = Some(Pending {
            next,
            remaining: secs.max(0.0),
        });
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Scheduled phase and seconds until it applies
    pub fn pending(&self) -> Option<(P, f32)> {
        self.pending.map(|p| (p.next, p.remaining))
    }

    /// Let `dt` seconds pass. Returns the phase entered, if any.
    pub fn advance(&mut self, dt: f32) -> Option<P> {
        let pending = self.pending.as_mut()?;
        pending.remaining -= dt;
        if pending.remaining > 0.0 {
            return None;
        }
        let next = pending.next;
        self.phase = next;
        self.pending = None;
        Some(next)
    }
}
