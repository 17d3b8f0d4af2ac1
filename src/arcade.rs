//! Game catalog
//!
//! Maps catalog slugs to games and dispatches host calls to the right
//! controller, so a host can hold "whatever game the page asked for".

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::controller::GameController;
use crate::platform::{HostEvent, TickToken};
use crate::settings::Settings;
use crate::sim::{Flappy, Lifecycle, Moles, Pong, Snake, Tiles};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GameKind {
    Snake,
    Pong,
    FlappyBird,
    Tiles2048,
    WhackAMole,
}

impl GameKind {
    pub const ALL: [GameKind; 5] = [
        GameKind::Snake,
        GameKind::Pong,
        GameKind::FlappyBird,
        GameKind::Tiles2048,
        GameKind::WhackAMole,
    ];

    /// Catalog slug
    pub fn as_str(self) -> &'static str {
        match self {
            GameKind::Snake => "snake",
            GameKind::Pong => "pong",
            GameKind::FlappyBird => "flappy-bird",
            GameKind::Tiles2048 => "2048",
            GameKind::WhackAMole => "whack-a-mole",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slug that names no game in the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGame(pub String);

impl fmt::Display for UnknownGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown game '{}'", self.0)
    }
}

impl std::error::Error for UnknownGame {}

impl FromStr for GameKind {
    type Err = UnknownGame;

    fn from_str(slug: &str) -> Result<Self, Self::Err> {
        GameKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == slug)
            .ok_or_else(|| UnknownGame(slug.to_string()))
    }
}

/// One controller of any kind
pub enum Arcade {
    Snake(GameController<Snake>),
    Pong(GameController<Pong>),
    FlappyBird(GameController<Flappy>),
    Tiles2048(GameController<Tiles>),
    WhackAMole(GameController<Moles>),
}

/// Run the same expression against whichever controller is inside
macro_rules! dispatch {
    ($arcade:expr, $c:ident => $body:expr) => {
        match $arcade {
            Arcade::Snake($c) => $body,
            Arcade::Pong($c) => $body,
            Arcade::FlappyBird($c) => $body,
            Arcade::Tiles2048($c) => $body,
            Arcade::WhackAMole($c) => $body,
        }
    };
}

impl Arcade {
    pub fn new(kind: GameKind, settings: &Settings, seed: u64) -> Self {
        log::info!("Creating {kind} with seed {seed:#x}");
        match kind {
            GameKind::Snake => Arcade::Snake(GameController::new(Snake::new(settings.snake.clone()), seed)),
            GameKind::Pong => Arcade::Pong(GameController::new(Pong::new(settings.pong.clone()), seed)),
            GameKind::FlappyBird => Arcade::FlappyBird(GameController::new(Flappy::new(settings.flappy.clone()), seed)),
            GameKind::Tiles2048 => Arcade::Tiles2048(GameController::new(Tiles::new(settings.tiles.clone()), seed)),
            GameKind::WhackAMole => Arcade::WhackAMole(GameController::new(Moles::new(settings.moles.clone()), seed)),
        }
    }

    pub fn kind(&self) -> GameKind {
        match self {
            Arcade::Snake(_) => GameKind::Snake,
            Arcade::Pong(_) => GameKind::Pong,
            Arcade::FlappyBird(_) => GameKind::FlappyBird,
            Arcade::Tiles2048(_) => GameKind::Tiles2048,
            Arcade::WhackAMole(_) => GameKind::WhackAMole,
        }
    }

    pub fn start(&mut self) -> Option<TickToken> {
        dispatch!(self, c => c.start())
    }

    pub fn reset(&mut self) {
        dispatch!(self, c => c.reset())
    }

    pub fn pause(&mut self) -> bool {
        dispatch!(self, c => c.pause())
    }

    pub fn resume(&mut self) -> Option<TickToken> {
        dispatch!(self, c => c.resume())
    }

    pub fn handle(&mut self, event: HostEvent) -> bool {
        dispatch!(self, c => c.handle(event))
    }

    pub fn token(&self) -> Option<TickToken> {
        dispatch!(self, c => c.token())
    }

    pub fn frame(&mut self, token: TickToken, elapsed: f32) -> u32 {
        dispatch!(self, c => c.frame(token, elapsed))
    }

    pub fn advance(&mut self, elapsed: f32) -> u32 {
        dispatch!(self, c => c.advance(elapsed))
    }

    pub fn score(&self) -> u64 {
        dispatch!(self, c => c.score())
    }

    pub fn best_score(&self) -> u64 {
        dispatch!(self, c => c.best_score())
    }

    pub fn lifecycle(&self) -> Lifecycle {
        dispatch!(self, c => c.lifecycle())
    }

    /// Live state as JSON for the view
    pub fn state_json(&self) -> Result<String, serde_json::Error> {
        dispatch!(self, c => serde_json::to_string(c.state()))
    }

    /// Newest unread published state as JSON, if any
    pub fn take_published_json(&mut self) -> Result<Option<String>, serde_json::Error> {
        dispatch!(self, c => c.take_published().map(|p| serde_json::to_string(&p.state)).transpose())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::Key;

    #[test]
    fn test_slugs_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(kind.as_str().parse::<GameKind>(), Ok(kind));
        }
        assert_eq!("tetris".parse::<GameKind>(), Err(UnknownGame("tetris".into())));
        assert_eq!(GameKind::FlappyBird.to_string(), "flappy-bird");
    }

    #[test]
    fn test_every_game_starts_and_ticks() {
        let settings = Settings::default();
        for kind in GameKind::ALL {
            let mut arcade = Arcade::new(kind, &settings, 7);
            assert_eq!(arcade.kind(), kind);
            assert_eq!(arcade.lifecycle(), Lifecycle::NotStarted);

            let token = arcade.start().unwrap();
            assert_eq!(arcade.lifecycle(), Lifecycle::Running);
            assert!(arcade.frame(token, 0.2) >= 1, "{kind} did not tick");
            assert!(arcade.state_json().is_ok());
        }
    }

    #[test]
    fn test_state_json_reports_lifecycle() {
        let mut arcade = Arcade::new(GameKind::Tiles2048, &Settings::default(), 3);
        let json = arcade.state_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["lifecycle"], "NotStarted");
        assert_eq!(value["board"].as_array().map(|rows| rows.len()), Some(4));

        assert!(arcade.handle(HostEvent::KeyDown(Key::Left)));
        assert_eq!(arcade.lifecycle(), Lifecycle::Running);
        let published = arcade.take_published_json().unwrap().unwrap();
        assert!(published.contains("\"Running\""));
        assert_eq!(arcade.take_published_json().unwrap(), None);
    }

    #[test]
    fn test_instances_are_independent() {
        let settings = Settings::default();
        let mut a = Arcade::new(GameKind::Snake, &settings, 9);
        let b = Arcade::new(GameKind::Snake, &settings, 9);

        let token = a.start().unwrap();
        a.frame(token, 0.15);
        assert_eq!(a.lifecycle(), Lifecycle::Running);
        assert_eq!(b.lifecycle(), Lifecycle::NotStarted);
        assert_eq!(b.token(), None);
    }
}
