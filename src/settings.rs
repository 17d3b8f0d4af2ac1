//! Game tuning
//!
//! One section per game, every field defaulted so a host can override only
//! what it cares about: `{"snake": {"interval_ms": 100}}` is a valid config.

use serde::{Deserialize, Serialize};

/// Snake tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeSettings {
    /// Board is `board_size` x `board_size` cells
    pub board_size: i32,
    /// Milliseconds between movement steps
    pub interval_ms: u32,
    /// Points awarded per food eaten
    pub food_points: u64,
}

impl Default for SnakeSettings {
    fn default() -> Self {
        Self {
            board_size: 20,
            interval_ms: 150,
            food_points: 10,
        }
    }
}

/// Pong tuning (pixels, seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PongSettings {
    pub width: f32,
    pub height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub ball_size: f32,
    /// Player paddle speed (px/s)
    pub paddle_speed: f32,
    /// Opponent speed as a fraction of `paddle_speed`
    pub ai_speed_factor: f32,
    /// Serve speed on each axis (px/s)
    pub ball_speed: f32,
    /// Horizontal speed multiplier applied on every paddle hit
    pub speed_multiplier: f32,
    /// Per-axis ball speed cap (px/s)
    pub max_ball_speed: f32,
    pub winning_score: u32,
}

impl Default for PongSettings {
    fn default() -> Self {
        Self {
            width: 360.0,
            height: 480.0,
            paddle_width: 12.0,
            paddle_height: 70.0,
            ball_size: 16.0,
            paddle_speed: 360.0,
            ai_speed_factor: 0.85,
            ball_speed: 300.0,
            speed_multiplier: 1.05,
            max_ball_speed: 1200.0,
            winning_score: 5,
        }
    }
}

/// Flappy Bird tuning (pixels, seconds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlappySettings {
    pub width: f32,
    pub height: f32,
    pub bird_size: f32,
    /// Fixed horizontal position of the bird's left edge
    pub bird_x: f32,
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    /// Vertical velocity set by a flap (negative is up)
    pub flap_velocity: f32,
    pub pipe_width: f32,
    pub pipe_gap: f32,
    /// Horizontal pipe speed (px/s)
    pub pipe_speed: f32,
    /// Distance between the two starting pipes
    pub pipe_spacing: f32,
    /// Minimum distance between the gap and the top/bottom edges
    pub gap_margin: f32,
    /// How long the "+1" flash stays up after scoring
    pub score_flash_secs: f32,
}

impl Default for FlappySettings {
    fn default() -> Self {
        Self {
            width: 400.0,
            height: 600.0,
            bird_size: 40.0,
            bird_x: 80.0,
            gravity: 1800.0,
            flap_velocity: -540.0,
            pipe_width: 80.0,
            pipe_gap: 180.0,
            pipe_speed: 132.0,
            pipe_spacing: 220.0,
            gap_margin: 60.0,
            score_flash_secs: 0.5,
        }
    }
}

/// 2048 tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilesSettings {
    pub size: usize,
    pub start_tiles: usize,
    pub target: u32,
    /// Probability that a spawned tile is a 4 instead of a 2
    pub four_chance: f64,
}

impl Default for TilesSettings {
    fn default() -> Self {
        Self {
            size: 4,
            start_tiles: 2,
            target: 2048,
            four_chance: 0.1,
        }
    }
}

/// Whack-a-Mole tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MoleSettings {
    /// Grid is `grid_size` x `grid_size` holes
    pub grid_size: usize,
    pub round_secs: f32,
    /// How long a mole stays up
    pub show_secs: f32,
    /// Pause between a mole going down and the next one appearing
    pub hide_secs: f32,
}

impl Default for MoleSettings {
    fn default() -> Self {
        Self {
            grid_size: 3,
            round_secs: 30.0,
            show_secs: 0.7,
            hide_secs: 0.4,
        }
    }
}

/// Tuning for every game in the arcade
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub snake: SnakeSettings,
    pub pong: PongSettings,
    pub flappy: FlappySettings,
    pub tiles: TilesSettings,
    pub moles: MoleSettings,
}

impl Settings {
    /// Parse settings from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let settings: Self = serde_json::from_str(json)?;
        Ok(settings.sanitize())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Clamp values that would make a game unplayable
    pub fn sanitize(mut self) -> Self {
        if self.snake.board_size < 4 {
            log::warn!("snake.board_size {} too small, using 4", self.snake.board_size);
            self.snake.board_size = 4;
        }
        if self.snake.interval_ms == 0 {
            log::warn!("snake.interval_ms must be positive, using default");
            self.snake.interval_ms = SnakeSettings::default().interval_ms;
        }

        if self.pong.winning_score == 0 {
            log::warn!("pong.winning_score must be positive, using 1");
            self.pong.winning_score = 1;
        }
        if self.pong.speed_multiplier < 1.0 {
            log::warn!(
                "pong.speed_multiplier {} below 1.0, using 1.0",
                self.pong.speed_multiplier
            );
            self.pong.speed_multiplier = 1.0;
        }
        if self.pong.height < 1.0 {
            log::warn!("pong.height {} too small, using default", self.pong.height);
            self.pong.height = PongSettings::default().height;
        }
        if self.pong.ball_size > self.pong.height {
            log::warn!("pong.ball_size {} taller than the field, using {}", self.pong.ball_size, self.pong.height);
            self.pong.ball_size = self.pong.height;
        }
        self.pong.paddle_height = self.pong.paddle_height.clamp(1.0, self.pong.height);
        self.pong.max_ball_speed = self.pong.max_ball_speed.max(self.pong.ball_speed);

        let flappy = &mut self.flappy;
        if flappy.height < 1.0 {
            log::warn!("flappy.height {} too small, using default", flappy.height);
            flappy.height = FlappySettings::default().height;
        }
        if flappy.bird_size > flappy.height {
            log::warn!("flappy.bird_size {} taller than the field, using {}", flappy.bird_size, flappy.height);
            flappy.bird_size = flappy.height;
        }
        let max_margin = ((flappy.height - flappy.pipe_gap) / 2.0).max(0.0);
        if flappy.gap_margin > max_margin {
            log::warn!("flappy.gap_margin {} leaves no room for the gap", flappy.gap_margin);
            flappy.gap_margin = max_margin;
        }

        if self.tiles.size < 2 {
            log::warn!("tiles.size {} too small, using 2", self.tiles.size);
            self.tiles.size = 2;
        }
        self.tiles.start_tiles = self.tiles.start_tiles.min(self.tiles.size * self.tiles.size);
        self.tiles.four_chance = self.tiles.four_chance.clamp(0.0, 1.0);

        if self.moles.grid_size == 0 {
            log::warn!("moles.grid_size must be positive, using 1");
            self.moles.grid_size = 1;
        }

        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{"snake": {"interval_ms": 100}}"#).unwrap();
        assert_eq!(settings.snake.interval_ms, 100);
        assert_eq!(settings.snake.board_size, 20);
        assert_eq!(settings.pong, PongSettings::default());
    }

    #[test]
    fn test_round_trip_json() {
        let settings = Settings::default();
        let json = settings.to_json().unwrap();
        assert_eq!(Settings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_sanitize_clamps_unplayable_values() {
        let settings = Settings::from_json(
            r#"{"snake": {"board_size": 1, "interval_ms": 0},
                "pong": {"winning_score": 0, "speed_multiplier": 0.5},
                "tiles": {"size": 1, "four_chance": 3.0}}"#,
        )
        .unwrap();
        assert_eq!(settings.snake.board_size, 4);
        assert_eq!(settings.snake.interval_ms, 150);
        assert_eq!(settings.pong.winning_score, 1);
        assert_eq!(settings.pong.speed_multiplier, 1.0);
        assert_eq!(settings.tiles.size, 2);
        assert_eq!(settings.tiles.four_chance, 1.0);
    }

    #[test]
    fn test_sanitize_fits_bodies_inside_the_field() {
        let settings = Settings::from_json(
            r#"{"flappy": {"bird_size": 700}, "pong": {"ball_size": 900, "height": 0}}"#,
        )
        .unwrap();
        assert_eq!(settings.flappy.bird_size, settings.flappy.height);
        assert_eq!(settings.pong.height, 480.0);
        assert_eq!(settings.pong.ball_size, 480.0);
    }

    #[test]
    fn test_oversized_bird_does_not_break_the_game() {
        use crate::arcade::{Arcade, GameKind};
        use crate::sim::Lifecycle;

        let settings = Settings::from_json(r#"{"flappy": {"bird_size": 700}}"#).unwrap();
        let mut arcade = Arcade::new(GameKind::FlappyBird, &settings, 1);
        let token = arcade.start().unwrap();
        assert_eq!(arcade.frame(token, 0.016), 1);
        // A bird the height of the field is already touching both bounds
        assert_eq!(arcade.lifecycle(), Lifecycle::Over);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Settings::from_json("{not json").is_err());
    }
}
