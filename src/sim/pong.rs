//! Pong
//!
//! Continuous-time rally between the player (left paddle) and a tracking
//! opponent (right paddle). Positions are top-left corners in pixels,
//! velocities in pixels per second.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{Aabb, box_band_collision, box_paddle_collision, reflect_velocity};
use super::input::HeldKeys;
use super::state::{GameRng, Lifecycle, Outcome, Round};
use super::tick::Game;
use crate::platform::{Cadence, HostEvent, Key};
use crate::settings::PongSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    /// Player
    Left,
    /// Opponent
    Right,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Normal of this side's hitting face
    fn face(self) -> Vec2 {
        match self {
            Side::Left => Vec2::X,
            Side::Right => -Vec2::X,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PongState {
    /// Top edge of the player's paddle
    pub player_y: f32,
    /// Top edge of the opponent's paddle
    pub opponent_y: f32,
    pub ball: Ball,
    pub score_left: u32,
    pub score_right: u32,
    /// Paddle hits since the last point
    pub rally: u32,
    pub lifecycle: Lifecycle,
    pub outcome: Option<Outcome>,
    pub ticks: u64,
}

impl PongState {
    pub fn new<R: Rng>(settings: &PongSettings, rng: &mut R) -> Self {
        let paddle_y = (settings.height - settings.paddle_height) / 2.0;
        Self {
            player_y: paddle_y,
            opponent_y: paddle_y,
            ball: serve(settings, Side::Right, rng),
            score_left: 0,
            score_right: 0,
            rally: 0,
            lifecycle: Lifecycle::NotStarted,
            outcome: None,
            ticks: 0,
        }
    }

    pub fn score_of(&self, side: Side) -> u32 {
        match side {
            Side::Left => self.score_left,
            Side::Right => self.score_right,
        }
    }
}

impl Round for PongState {
    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn score(&self) -> u64 {
        u64::from(self.score_left) + u64::from(self.score_right)
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}

/// Ball at center heading toward `toward`, random vertical direction
pub fn serve<R: Rng>(settings: &PongSettings, toward: Side, rng: &mut R) -> Ball {
    let center = Vec2::new(settings.width, settings.height) / 2.0 - Vec2::splat(settings.ball_size / 2.0);
    let vx = match toward {
        Side::Left => -settings.ball_speed,
        Side::Right => settings.ball_speed,
    };
    let vy = if rng.random_bool(0.5) {
        settings.ball_speed
    } else {
        -settings.ball_speed
    };
    Ball {
        pos: center,
        vel: Vec2::new(vx, vy),
    }
}

pub fn paddle_box(settings: &PongSettings, side: Side, y: f32) -> Aabb {
    let x = match side {
        Side::Left => 0.0,
        Side::Right => settings.width - settings.paddle_width,
    };
    Aabb::new(
        Vec2::new(x, y),
        Vec2::new(settings.paddle_width, settings.paddle_height),
    )
}

pub fn ball_box(settings: &PongSettings, ball: &Ball) -> Aabb {
    Aabb::new(ball.pos, Vec2::splat(settings.ball_size))
}

fn clamp_paddle(settings: &PongSettings, y: f32) -> f32 {
    y.clamp(0.0, settings.height - settings.paddle_height)
}

/// Player paddle driven by held keys
pub fn move_player(settings: &PongSettings, y: f32, keys: &HeldKeys, dt: f32) -> f32 {
    clamp_paddle(settings, y + keys.axis() * settings.paddle_speed * dt)
}

/// Opponent paddle: proportional step toward centering on the ball,
/// never overshooting
pub fn track_ball(settings: &PongSettings, y: f32, ball: &Ball, dt: f32) -> f32 {
    let target = ball.pos.y + settings.ball_size / 2.0 - settings.paddle_height / 2.0;
    let max_step = settings.paddle_speed * settings.ai_speed_factor * dt;
    clamp_paddle(settings, y + (target - y).clamp(-max_step, max_step))
}

/// Side that won the round, if any
pub fn winner(settings: &PongSettings, state: &PongState) -> Option<Side> {
    if state.score_left >= settings.winning_score {
        Some(Side::Left)
    } else if state.score_right >= settings.winning_score {
        Some(Side::Right)
    } else {
        None
    }
}

/// Advance one frame of `dt` seconds
pub fn step<R: Rng>(state: &mut PongState, keys: &HeldKeys, settings: &PongSettings, dt: f32, rng: &mut R) {
    if !state.lifecycle.is_running() {
        return;
    }
    state.ticks += 1;

    state.player_y = move_player(settings, state.player_y, keys, dt);
    state.opponent_y = track_ball(settings, state.opponent_y, &state.ball, dt);

    let ball = &mut state.ball;
    let travel = ball.vel * dt;
    ball.pos += travel;

    // Top/bottom walls
    let wall = box_band_collision(&ball_box(settings, ball), 0.0, settings.height);
    if wall.hit {
        ball.pos += wall.normal * wall.penetration;
        if ball.vel.dot(wall.normal) < 0.0 {
            ball.vel = reflect_velocity(ball.vel, wall.normal);
        }
    }

    // Paddles
    for (side, y) in [(Side::Left, state.player_y), (Side::Right, state.opponent_y)] {
        let hit = box_paddle_collision(
            &ball_box(settings, ball),
            travel,
            &paddle_box(settings, side, y),
            side.face(),
        );
        if hit.hit {
            ball.pos += hit.normal * hit.penetration;
            ball.vel = reflect_velocity(ball.vel, hit.normal);
            ball.vel.x = (ball.vel.x * settings.speed_multiplier)
                .clamp(-settings.max_ball_speed, settings.max_ball_speed);
            state.rally += 1;
        }
    }

    // Side boundaries
    let scorer = if ball.pos.x < 0.0 {
        Some(Side::Right)
    } else if ball.pos.x > settings.width - settings.ball_size {
        Some(Side::Left)
    } else {
        None
    };
    if let Some(scorer) = scorer {
        match scorer {
            Side::Left => state.score_left += 1,
            Side::Right => state.score_right += 1,
        }
        log::debug!(
            "pong point to {scorer:?} after {} hits ({}-{})",
            state.rally,
            state.score_left,
            state.score_right
        );
        state.rally = 0;
        state.ball = serve(settings, scorer, rng);
    }

    if let Some(side) = winner(settings, state) {
        state.outcome = Some(if side == Side::Left {
            Outcome::Won
        } else {
            Outcome::Lost
        });
        state.lifecycle.finish();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleKey {
    Up,
    Down,
}

/// Press or release of a paddle key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddleInput {
    pub key: PaddleKey,
    pub held: bool,
}

/// Pong with its tuning
#[derive(Debug, Clone, Default)]
pub struct Pong {
    pub settings: PongSettings,
}

impl Pong {
    pub fn new(settings: PongSettings) -> Self {
        Self { settings }
    }
}

impl Game for Pong {
    type State = PongState;
    type Sampler = HeldKeys;
    type Action = PaddleInput;

    const NAME: &'static str = "pong";

    fn cadence(&self) -> Cadence {
        Cadence::PerFrame
    }

    fn new_round(&self, rng: &mut GameRng) -> PongState {
        PongState::new(&self.settings, rng)
    }

    fn translate(&self, event: HostEvent) -> Option<PaddleInput> {
        let (key, held) = match event {
            HostEvent::KeyDown(key) => (key, true),
            HostEvent::KeyUp(key) => (key, false),
            HostEvent::Tap(_) => return None,
        };
        let key = match key {
            Key::Up => PaddleKey::Up,
            Key::Down => PaddleKey::Down,
            _ => return None,
        };
        Some(PaddleInput { key, held })
    }

    fn starts_round(&self, action: PaddleInput) -> bool {
        action.held
    }

    fn sample(&self, sampler: &mut HeldKeys, _state: &PongState, action: PaddleInput) {
        match action.key {
            PaddleKey::Up => sampler.up = action.held,
            PaddleKey::Down => sampler.down = action.held,
        }
    }

    fn tick(&self, state: &mut PongState, sampler: &mut HeldKeys, dt: f32, rng: &mut GameRng) {
        step(state, sampler, &self.settings, dt, rng);
    }
}
