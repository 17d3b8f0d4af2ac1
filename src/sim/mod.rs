//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time only arrives as a `dt` from the caller
//! - Seeded RNG only, passed in explicitly
//! - All state is per instance; nothing global
//! - No rendering or platform dependencies

pub mod collision;
pub mod flappy;
pub mod input;
pub mod moles;
pub mod pong;
pub mod snake;
pub mod state;
pub mod tick;
pub mod tiles;
pub mod timer;

pub use collision::{Aabb, CollisionResult, box_band_collision, box_paddle_collision, reflect_velocity};
pub use flappy::{Flappy, FlappyState};
pub use input::{Direction, HeadingBuffer, HeldKeys, Latch, MoveQueue};
pub use moles::{MolePhase, MoleState, Moles};
pub use pong::{Pong, PongState, Side};
pub use snake::{Snake, SnakeState};
pub use state::{GameRng, Lifecycle, Outcome, Round, round_rng};
pub use tick::Game;
pub use tiles::{Tiles, TilesState};
pub use timer::PhaseTimer;
