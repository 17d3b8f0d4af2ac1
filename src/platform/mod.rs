//! Platform abstraction layer
//!
//! Everything between the host environment and the pure simulation:
//! - Tick cadence and cancellation (`scheduler`)
//! - Input events (`keys`)

pub mod keys;
pub mod scheduler;

pub use keys::{HostEvent, Key};
pub use scheduler::{Cadence, TickPlan, TickScheduler, TickToken};
