//! Arcade loop entry point
//!
//! Native builds run a headless attract mode: every game (or the one named
//! on the command line) is played by a simple autopilot at 60 Hz of
//! simulated time and the result is logged. The browser build is driven from
//! JavaScript through `arcade_loop::web`.
//!
//! Environment:
//! - `ARCADE_SEED`: decimal seed for reproducible runs
//! - `ARCADE_SETTINGS`: tuning overrides as JSON
//! - `RUST_LOG`: log filter (default `info`)

#[cfg(not(target_arch = "wasm32"))]
mod attract {
    use arcade_loop::consts::FRAME_DT;
    use arcade_loop::platform::{HostEvent, Key};
    use arcade_loop::settings::Settings;
    use arcade_loop::sim::snake::is_fatal;
    use arcade_loop::sim::{
        Direction, Flappy, FlappyState, Game, MoleState, Moles, Pong, PongState, Round, Snake, SnakeState, Tiles,
        TilesState,
    };
    use arcade_loop::{GameController, GameKind};

    /// Simulated time limit per game
    const MAX_SECS: f32 = 180.0;

    pub fn settings_from_env() -> Settings {
        match std::env::var("ARCADE_SETTINGS") {
            Ok(json) => Settings::from_json(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring ARCADE_SETTINGS: {e}");
                Settings::default()
            }),
            Err(_) => Settings::default(),
        }
    }

    pub fn run(kind: GameKind, settings: &Settings, seed: u64) {
        match kind {
            GameKind::Snake => play(Snake::new(settings.snake.clone()), seed, snake_pilot),
            GameKind::Pong => play(Pong::new(settings.pong.clone()), seed, pong_pilot),
            GameKind::FlappyBird => play(Flappy::new(settings.flappy.clone()), seed, flappy_pilot),
            GameKind::Tiles2048 => {
                let mut turn = 0usize;
                play(Tiles::new(settings.tiles.clone()), seed, move |_: &Tiles, _: &TilesState| {
                    turn += 1;
                    let key = [Key::Left, Key::Down, Key::Right, Key::Down][turn % 4];
                    vec![HostEvent::KeyDown(key)]
                })
            }
            GameKind::WhackAMole => play(Moles::new(settings.moles.clone()), seed, mole_pilot),
        }
    }

    fn play<G, P>(game: G, seed: u64, mut pilot: P)
    where
        G: Game,
        P: FnMut(&G, &G::State) -> Vec<HostEvent>,
    {
        let mut controller = GameController::new(game, seed);
        let Some(token) = controller.start() else {
            log::warn!("{}: round did not start", G::NAME);
            return;
        };

        let frames = (MAX_SECS / FRAME_DT) as u32;
        let mut ticks = 0;
        for _ in 0..frames {
            for event in pilot(controller.game(), controller.state()) {
                controller.handle(event);
            }
            ticks += controller.frame(token, FRAME_DT);
            if controller.lifecycle().is_over() {
                break;
            }
        }

        match controller.state().outcome() {
            Some(outcome) => log::info!("{}: {outcome:?} with score {} after {ticks} ticks", G::NAME, controller.score()),
            None => log::info!("{}: still running at the time limit, score {}", G::NAME, controller.score()),
        }
    }

    fn key_for(direction: Direction) -> Key {
        match direction {
            Direction::Up => Key::Up,
            Direction::Down => Key::Down,
            Direction::Left => Key::Left,
            Direction::Right => Key::Right,
        }
    }

    /// Head for the food, preferring any move that does not die
    fn snake_pilot(_: &Snake, state: &SnakeState) -> Vec<HostEvent> {
        let Some(food) = state.food else {
            return Vec::new();
        };
        let delta = food - state.head();
        let wanted = if delta.x > 0 {
            Direction::Right
        } else if delta.x < 0 {
            Direction::Left
        } else if delta.y > 0 {
            Direction::Down
        } else {
            Direction::Up
        };

        let safe = |dir: Direction| dir != state.heading.opposite() && !is_fatal(state, state.head() + dir.delta());
        let choice = std::iter::once(wanted)
            .chain(Direction::ALL)
            .find(|&dir| safe(dir))
            .unwrap_or(state.heading);
        vec![HostEvent::KeyDown(key_for(choice))]
    }

    /// Keep the paddle centre on the ball
    fn pong_pilot(game: &Pong, state: &PongState) -> Vec<HostEvent> {
        let s = &game.settings;
        let paddle = state.player_y + s.paddle_height / 2.0;
        let ball = state.ball.pos.y + s.ball_size / 2.0;

        if ball < paddle - 8.0 {
            vec![HostEvent::KeyUp(Key::Down), HostEvent::KeyDown(Key::Up)]
        } else if ball > paddle + 8.0 {
            vec![HostEvent::KeyUp(Key::Up), HostEvent::KeyDown(Key::Down)]
        } else {
            vec![HostEvent::KeyUp(Key::Up), HostEvent::KeyUp(Key::Down)]
        }
    }

    /// Flap whenever the bird sinks below the next gap's centre
    fn flappy_pilot(game: &Flappy, state: &FlappyState) -> Vec<HostEvent> {
        let s = &game.settings;
        let Some(next) = state.pipes.iter().find(|pipe| pipe.x + s.pipe_width > s.bird_x) else {
            return Vec::new();
        };
        let gap_center = next.gap_top + s.pipe_gap / 2.0;
        let bird_center = state.bird_y + s.bird_size / 2.0;

        if bird_center > gap_center + 12.0 && state.bird_vel > 0.0 {
            vec![HostEvent::KeyDown(Key::Action)]
        } else {
            Vec::new()
        }
    }

    fn mole_pilot(_: &Moles, state: &MoleState) -> Vec<HostEvent> {
        state.raised().map(|cell| vec![HostEvent::Tap(Some(cell))]).unwrap_or_default()
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use arcade_loop::GameKind;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Arcade loop (native) starting attract mode...");

    let settings = attract::settings_from_env();
    let seed: u64 = std::env::var("ARCADE_SEED")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random);
    log::info!("Seed: {seed}");

    let kinds = match std::env::args().nth(1) {
        Some(slug) => match slug.parse::<GameKind>() {
            Ok(kind) => vec![kind],
            Err(e) => {
                log::error!("{e}");
                std::process::exit(2);
            }
        },
        None => GameKind::ALL.to_vec(),
    };

    for kind in kinds {
        attract::run(kind, &settings, seed);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is arcade_loop::web::init, this is just to satisfy the compiler
}
