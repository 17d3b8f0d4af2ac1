//! Flappy Bird
//!
//! A bird at a fixed x falls under gravity; flaps set an upward velocity.
//! Pipe pairs scroll left and are recycled off the left edge, each recycle
//! scoring a point.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::Aabb;
use super::input::Latch;
use super::state::{GameRng, Lifecycle, Outcome, Round};
use super::tick::Game;
use super::timer::PhaseTimer;
use crate::platform::{Cadence, HostEvent, Key};
use crate::settings::FlappySettings;

/// A pipe pair: solid above `gap_top` and below `gap_top + pipe_gap`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pipe {
    /// Left edge
    pub x: f32,
    pub gap_top: f32,
}

/// The transient "+1" shown after scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScoreFlash {
    Hidden,
    Visible,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlappyState {
    /// Top edge of the bird
    pub bird_y: f32,
    /// Vertical velocity, positive is down
    pub bird_vel: f32,
    /// Leftmost first
    pub pipes: VecDeque<Pipe>,
    pub score: u64,
    pub flash: PhaseTimer<ScoreFlash>,
    pub lifecycle: Lifecycle,
    pub outcome: Option<Outcome>,
    pub ticks: u64,
}

impl FlappyState {
    pub fn new<R: Rng>(settings: &FlappySettings, rng: &mut R) -> Self {
        let first = settings.width + 100.0;
        let pipes = [first, first + settings.pipe_spacing]
            .into_iter()
            .map(|x| Pipe {
                x,
                gap_top: random_gap_top(settings, rng),
            })
            .collect();
        Self {
            bird_y: settings.height / 2.0,
            bird_vel: 0.0,
            pipes,
            score: 0,
            flash: PhaseTimer::new(ScoreFlash::Hidden),
            lifecycle: Lifecycle::NotStarted,
            outcome: None,
            ticks: 0,
        }
    }
}

impl Round for FlappyState {
    fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    fn lifecycle_mut(&mut self) -> &mut Lifecycle {
        &mut self.lifecycle
    }

    fn score(&self) -> u64 {
        self.score
    }

    fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }
}

/// Uniform gap offset kept `gap_margin` away from the top and bottom
pub fn random_gap_top<R: Rng>(settings: &FlappySettings, rng: &mut R) -> f32 {
    let low = settings.gap_margin;
    let high = settings.height - settings.pipe_gap - settings.gap_margin;
    if high <= low {
        return low;
    }
    rng.random_range(low..high)
}

pub fn bird_box(settings: &FlappySettings, bird_y: f32) -> Aabb {
    Aabb::new(Vec2::new(settings.bird_x, bird_y), Vec2::splat(settings.bird_size))
}

/// Solid parts of a pipe pair (upper, lower)
pub fn pipe_solids(settings: &FlappySettings, pipe: &Pipe) -> [Aabb; 2] {
    let gap_bottom = pipe.gap_top + settings.pipe_gap;
    [
        Aabb::new(Vec2::new(pipe.x, 0.0), Vec2::new(settings.pipe_width, pipe.gap_top)),
        Aabb::new(
            Vec2::new(pipe.x, gap_bottom),
            Vec2::new(settings.pipe_width, settings.height - gap_bottom),
        ),
    ]
}

pub fn hits_pipe(settings: &FlappySettings, bird_y: f32, pipe: &Pipe) -> bool {
    let bird = bird_box(settings, bird_y);
    pipe_solids(settings, pipe).iter().any(|solid| bird.overlaps(solid))
}

/// Bird touching the ceiling or the floor
pub fn out_of_bounds(settings: &FlappySettings, bird_y: f32) -> bool {
    bird_y <= 0.0 || bird_y >= settings.height - settings.bird_size
}

/// Advance one frame of `dt` seconds
pub fn step<R: Rng>(state: &mut FlappyState, flap: &mut Latch<()>, settings: &FlappySettings, dt: f32, rng: &mut R) {
    if !state.lifecycle.is_running() {
        return;
    }
    state.ticks += 1;
    state.flash.advance(dt);

    if flap.take().is_some() {
        state.bird_vel = settings.flap_velocity;
    }
    state.bird_vel += settings.gravity * dt;
    state.bird_y = (state.bird_y + state.bird_vel * dt).clamp(0.0, settings.height - settings.bird_size);

    for pipe in &mut state.pipes {
        pipe.x -= settings.pipe_speed * dt;
    }
    if state
        .pipes
        .front()
        .is_some_and(|lead| lead.x + settings.pipe_width < 0.0)
    {
        state.pipes.pop_front();
        state.pipes.push_back(Pipe {
            x: settings.width,
            gap_top: random_gap_top(settings, rng),
        });
        state.score += 1;
        state.flash.set(ScoreFlash::Visible);
        state.flash.schedule(ScoreFlash::Hidden, settings.score_flash_secs);
        log::debug!("flappy passed pipe, score {}", state.score);
    }

    let crashed = out_of_bounds(settings, state.bird_y)
        || state.pipes.iter().any(|pipe| hits_pipe(settings, state.bird_y, pipe));
    if crashed {
        state.outcome = Some(Outcome::Lost);
        state.lifecycle.finish();
    }
}

/// The one Flappy action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flap;

/// Flappy Bird with its tuning
#[derive(Debug, Clone, Default)]
pub struct Flappy {
    pub settings: FlappySettings,
}

impl Flappy {
    pub fn new(settings: FlappySettings) -> Self {
        Self { settings }
    }
}

impl Game for Flappy {
    type State = FlappyState;
    type Sampler = Latch<()>;
    type Action = Flap;

    const NAME: &'static str = "flappy-bird";

    fn cadence(&self) -> Cadence {
        Cadence::PerFrame
    }

    fn new_round(&self, rng: &mut GameRng) -> FlappyState {
        FlappyState::new(&self.settings, rng)
    }

    fn translate(&self, event: HostEvent) -> Option<Flap> {
        match event {
            HostEvent::KeyDown(Key::Action) | HostEvent::Tap(_) => Some(Flap),
            _ => None,
        }
    }

    fn starts_round(&self, _action: Flap) -> bool {
        true
    }

    fn sample(&self, sampler: &mut Latch<()>, _state: &FlappyState, _action: Flap) {
        sampler.set(());
    }

    fn tick(&self, state: &mut FlappyState, sampler: &mut Latch<()>, dt: f32, rng: &mut GameRng) {
        step(state, sampler, &self.settings, dt, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::sim::state::round_rng;
    use proptest::prelude::*;

    fn running(settings: &FlappySettings) -> FlappyState {
        let mut state = FlappyState::new(settings, &mut round_rng(1));
        state.lifecycle = Lifecycle::Running;
        state
    }

    #[test]
    fn test_gravity_pulls_bird_down() {
        let settings = FlappySettings::default();
        let mut state = running(&settings);
        let y = state.bird_y;

        step(&mut state, &mut Latch::default(), &settings, FRAME_DT, &mut round_rng(2));

        assert!((state.bird_vel - settings.gravity * FRAME_DT).abs() < 0.001);
        assert!(state.bird_y > y);
        assert!(state.lifecycle.is_running());
    }

    #[test]
    fn test_flap_applies_once() {
        let settings = FlappySettings::default();
        let mut state = running(&settings);
        let mut flap = Latch::default();
        flap.set(());
        flap.set(());

        step(&mut state, &mut flap, &settings, FRAME_DT, &mut round_rng(2));
        let after_flap = settings.flap_velocity + settings.gravity * FRAME_DT;
        assert!((state.bird_vel - after_flap).abs() < 0.001);

        step(&mut state, &mut flap, &settings, FRAME_DT, &mut round_rng(2));
        assert!((state.bird_vel - (after_flap + settings.gravity * FRAME_DT)).abs() < 0.001);
    }

    #[test]
    fn test_recycled_pipe_scores_once_and_flashes() {
        let settings = FlappySettings::default();
        let mut state = running(&settings);
        // Lead pipe about to leave, gap lined up with the bird
        state.pipes[0] = Pipe {
            x: -settings.pipe_width + 1.0,
            gap_top: state.bird_y - 70.0,
        };
        state.pipes[1].x = 300.0;

        let mut flap = Latch::default();
        step(&mut state, &mut flap, &settings, FRAME_DT, &mut round_rng(2));

        assert_eq!(state.score, 1);
        assert_eq!(state.pipes.len(), 2);
        assert_eq!(state.pipes[1].x, settings.width);
        assert_eq!(state.flash.phase(), ScoreFlash::Visible);

        // Flash goes away after its duration without another point
        for _ in 0..40 {
            // Hold the bird mid-air so only the clock matters
            state.bird_y = 300.0;
            state.bird_vel = 0.0;
            step(&mut state, &mut flap, &settings, FRAME_DT, &mut round_rng(2));
        }
        assert!(state.lifecycle.is_running());
        assert_eq!(state.score, 1);
        assert_eq!(state.flash.phase(), ScoreFlash::Hidden);
    }

    #[test]
    fn test_new_gaps_respect_margins() {
        let settings = FlappySettings::default();
        let mut rng = round_rng(9);
        for _ in 0..500 {
            let top = random_gap_top(&settings, &mut rng);
            assert!(top >= settings.gap_margin);
            assert!(top + settings.pipe_gap <= settings.height - settings.gap_margin);
        }
    }

    #[test]
    fn test_hitting_pipe_ends_round() {
        let settings = FlappySettings::default();
        let mut state = running(&settings);
        // Pipe right at the bird with the gap far above it
        state.pipes[0] = Pipe {
            x: settings.bird_x,
            gap_top: 60.0,
        };
        state.bird_y = 400.0;

        step(&mut state, &mut Latch::default(), &settings, FRAME_DT, &mut round_rng(2));

        assert_eq!(state.lifecycle, Lifecycle::Over);
        assert_eq!(state.outcome, Some(Outcome::Lost));
    }

    #[test]
    fn test_flying_through_gap_is_safe() {
        let settings = FlappySettings::default();
        let pipe = Pipe {
            x: settings.bird_x,
            gap_top: 200.0,
        };
        assert!(!hits_pipe(&settings, 250.0, &pipe));
        assert!(hits_pipe(&settings, 190.0, &pipe));
        assert!(hits_pipe(&settings, 350.0, &pipe));
    }

    #[test]
    fn test_floor_ends_round_with_bird_clamped() {
        let settings = FlappySettings::default();
        let mut state = running(&settings);
        state.bird_y = settings.height - settings.bird_size - 1.0;
        state.bird_vel = 600.0;

        step(&mut state, &mut Latch::default(), &settings, FRAME_DT, &mut round_rng(2));

        assert_eq!(state.bird_y, settings.height - settings.bird_size);
        assert_eq!(state.lifecycle, Lifecycle::Over);
    }

    #[test]
    fn test_flap_key_and_tap_both_flap() {
        let game = Flappy::default();
        assert_eq!(game.translate(HostEvent::KeyDown(Key::Action)), Some(Flap));
        assert_eq!(game.translate(HostEvent::Tap(None)), Some(Flap));
        assert_eq!(game.translate(HostEvent::KeyUp(Key::Action)), None);
        assert_eq!(game.translate(HostEvent::KeyDown(Key::Left)), None);
    }

    proptest! {
        #[test]
        fn prop_score_counts_recycles_and_crash_is_exact(
            seed in any::<u64>(),
            flaps in proptest::collection::vec(proptest::bool::weighted(0.08), 1..900),
        ) {
            let settings = FlappySettings::default();
            let mut rng = round_rng(seed);
            let mut state = FlappyState::new(&settings, &mut rng);
            state.lifecycle.start();
            let mut latch = Latch::default();

            for flap in flaps {
                if flap {
                    latch.set(());
                }
                let lead_before = state.pipes[0];
                let score_before = state.score;
                step(&mut state, &mut latch, &settings, FRAME_DT, &mut rng);

                let recycled = state.pipes[0] != Pipe { x: lead_before.x - settings.pipe_speed * FRAME_DT, ..lead_before };
                prop_assert_eq!(state.score - score_before, u64::from(recycled));

                let crashed = out_of_bounds(&settings, state.bird_y)
                    || state.pipes.iter().any(|p| hits_pipe(&settings, state.bird_y, p));
                prop_assert_eq!(state.lifecycle.is_over(), crashed);
                if crashed {
                    break;
                }
            }
        }
    }
}
