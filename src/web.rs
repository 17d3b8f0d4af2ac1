//! Browser bindings
//!
//! The page owns the clock: it calls `start()`, then drives `frame()` from
//! `requestAnimationFrame` (or `setInterval`) passing back the token it was
//! given. A token from before the last pause or reset is ignored.

use wasm_bindgen::prelude::*;
use web_sys::KeyboardEvent;

use crate::arcade::{Arcade, GameKind};
use crate::platform::{HostEvent, Key, TickToken};
use crate::settings::Settings;
use crate::sim::Lifecycle;

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"arcade-loop: logger already initialised".into());
    }
    log::info!("Arcade loop ready");
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen]
pub struct ArcadeHandle {
    arcade: Arcade,
}

#[wasm_bindgen]
impl ArcadeHandle {
    /// Game from its catalog slug with default tuning
    #[wasm_bindgen(constructor)]
    pub fn new(slug: &str) -> Result<ArcadeHandle, JsValue> {
        Self::with_settings(slug, "{}")
    }

    /// Game from its catalog slug with tuning overrides as JSON
    pub fn with_settings(slug: &str, settings_json: &str) -> Result<ArcadeHandle, JsValue> {
        let kind: GameKind = slug.parse().map_err(to_js)?;
        let settings = Settings::from_json(settings_json).map_err(to_js)?;
        Ok(Self {
            arcade: Arcade::new(kind, &settings, rand::random()),
        })
    }

    pub fn slug(&self) -> String {
        self.arcade.kind().as_str().to_string()
    }

    /// Returns the token to pass to `frame`, if the round is running
    pub fn start(&mut self) -> Option<u32> {
        self.arcade.start().map(TickToken::raw)
    }

    pub fn reset(&mut self) {
        self.arcade.reset();
    }

    pub fn pause(&mut self) -> bool {
        self.arcade.pause()
    }

    pub fn resume(&mut self) -> Option<u32> {
        self.arcade.resume().map(TickToken::raw)
    }

    /// Returns true when the game used the key (the page should then
    /// suppress scrolling)
    pub fn key_down(&mut self, event: &KeyboardEvent) -> bool {
        self.key(event, HostEvent::KeyDown)
    }

    pub fn key_up(&mut self, event: &KeyboardEvent) -> bool {
        self.key(event, HostEvent::KeyUp)
    }

    /// Pointer or touch press, with the grid cell under it if any
    pub fn tap(&mut self, cell: Option<u32>) -> bool {
        self.arcade.handle(HostEvent::Tap(cell.map(|c| c as usize)))
    }

    pub fn token(&self) -> Option<u32> {
        self.arcade.token().map(TickToken::raw)
    }

    /// Timer callback. Returns the number of ticks applied.
    pub fn frame(&mut self, token: u32, dt_ms: f64) -> u32 {
        self.arcade.frame(TickToken::from_raw(token), (dt_ms / 1000.0) as f32)
    }

    pub fn state_json(&self) -> Result<String, JsValue> {
        self.arcade.state_json().map_err(to_js)
    }

    /// Newest unread published state, for views that render at their own pace
    pub fn take_state_json(&mut self) -> Result<Option<String>, JsValue> {
        self.arcade.take_published_json().map_err(to_js)
    }

    pub fn score(&self) -> f64 {
        self.arcade.score() as f64
    }

    pub fn best_score(&self) -> f64 {
        self.arcade.best_score() as f64
    }

    /// "not-started", "running" or "over"
    pub fn lifecycle(&self) -> String {
        match self.arcade.lifecycle() {
            Lifecycle::NotStarted => "not-started",
            Lifecycle::Running => "running",
            Lifecycle::Over => "over",
        }
        .to_string()
    }
}

impl ArcadeHandle {
    fn key(&mut self, event: &KeyboardEvent, wrap: fn(Key) -> HostEvent) -> bool {
        let Some(key) = Key::from_dom(&event.key()) else {
            return false;
        };
        let used = self.arcade.handle(wrap(key));
        if used {
            event.prevent_default();
        }
        used
    }
}
