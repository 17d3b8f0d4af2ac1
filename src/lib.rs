//! Arcade Loop - real-time cores for a browser mini-game catalog
//!
//! Core modules:
//! - `sim`: Pure per-game state, updaters and terminal evaluators
//! - `platform`: Tick scheduling and host input vocabulary
//! - `controller`: Per-instance owner of state, sampler and scheduler
//! - `arcade`: Slug lookup and dispatch over every game
//! - `settings`: Data-driven game tuning
//! - `highscores`: In-session leaderboard

pub mod arcade;
pub mod controller;
pub mod highscores;
pub mod platform;
pub mod settings;
pub mod sim;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use arcade::{Arcade, GameKind};
pub use controller::GameController;
pub use highscores::HighScores;
pub use settings::Settings;

/// Loop configuration constants
pub mod consts {
    /// Display refresh step assumed by continuous games (60 Hz)
    pub const FRAME_DT: f32 = 1.0 / 60.0;
    /// Maximum fixed-interval ticks per host frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame a per-frame tick will integrate (tab switches, hitches)
    pub const MAX_FRAME_DT: f32 = 0.1;
}
