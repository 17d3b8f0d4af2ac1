//! Host input vocabulary
//!
//! Browser key names are mapped onto a small set of keys; each game then
//! translates `HostEvent`s into its own actions. Anything unmapped is dropped
//! here or by the game.

use serde::{Deserialize, Serialize};

/// Keys the arcade understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    /// Space / Enter
    Action,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` (or `.code` for Space) value
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Key::Up),
            "ArrowDown" | "s" | "S" => Some(Key::Down),
            "ArrowLeft" | "a" | "A" => Some(Key::Left),
            "ArrowRight" | "d" | "D" => Some(Key::Right),
            " " | "Space" | "Spacebar" | "Enter" => Some(Key::Action),
            _ => None,
        }
    }
}

/// A single input event from the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Click/touch, with the grid cell under the pointer when the view has one
    Tap(Option<usize>),
}
