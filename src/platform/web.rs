//! Browser facade
//!
//! The JS host owns one `WebGame`, forwards key events to it, calls `frame`
//! from `requestAnimationFrame`, and draws from the JSON snapshots.

use wasm_bindgen::prelude::*;

use super::input::InputLatch;
use crate::settings::{GameMode, Settings};
use crate::sim::{GamePhase, GameState, tick};
use crate::tuning::Tuning;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        web_sys::console::warn_1(&"Logger already initialized".into());
    }
    log::info!("Powder Run starting...");
}

#[wasm_bindgen]
pub struct WebGame {
    state: GameState,
    input: InputLatch,
    last_time: Option<f64>,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        log::info!("Game initialized with seed: {}", seed);
        WebGame {
            state: GameState::new(seed, width, height, &settings, Tuning::default()),
            input: InputLatch::default(),
            last_time: None,
        }
    }

    /// Advance by the time since the previous frame
    pub fn frame(&mut self, time_ms: f64) {
        let dt = match self.last_time {
            Some(last) => ((time_ms - last) / 1000.0) as f32,
            None => 0.0,
        };
        self.last_time = Some(time_ms);

        let input = self.input.take();
        tick(&mut self.state, &input, dt);
    }

    /// Returns true when the key is a game key (host should preventDefault)
    pub fn key_down(&mut self, key: &str) -> bool {
        match key {
            "Escape" | "p" | "P" => {
                self.state.toggle_pause();
                true
            }
            "Enter" => {
                match self.state.phase {
                    GamePhase::Ready => self.state.start(),
                    GamePhase::GameOver => self.reset(),
                    _ => {}
                }
                true
            }
            "i" | "I" => {
                self.input.autopilot = !self.input.autopilot;
                log::info!("Autopilot: {}", self.input.autopilot);
                true
            }
            _ => {
                let airborne = self.state.rider.is_airborne();
                self.input.key_down(key, airborne)
            }
        }
    }

    pub fn key_up(&mut self, key: &str) {
        self.input.key_up(key);
    }

    /// Tab hidden or window blurred
    pub fn blur(&mut self) {
        self.input.release_all();
        if self.state.phase == GamePhase::Running {
            self.state.toggle_pause();
            log::info!("Auto-paused (focus lost)");
        }
    }

    pub fn start(&mut self) {
        self.state.start();
    }

    pub fn reset(&mut self) {
        self.input.release_all();
        self.last_time = None;
        self.state.reset();
    }

    pub fn toggle_pause(&mut self) {
        self.state.toggle_pause();
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.resize(width, height);
    }

    /// "adventure" or "zen"; returns false for an unknown name
    pub fn set_mode(&mut self, mode: &str) -> bool {
        match GameMode::from_str(mode) {
            Some(mode) => {
                self.state.set_mode(mode);
                self.state.settings().save();
                true
            }
            None => {
                log::warn!("Unknown game mode: {}", mode);
                false
            }
        }
    }

    pub fn set_colors(&mut self, rider_color: String, scarf_color: String) {
        let mut appearance = self.state.appearance.clone();
        appearance.rider_color = rider_color;
        appearance.scarf_color = scarf_color;
        self.state.set_appearance(appearance);
        self.state.settings().save();
    }

    pub fn set_particles(&mut self, enabled: bool) {
        self.state.set_particles(enabled);
        self.state.settings().save();
    }

    pub fn phase(&self) -> String {
        self.state.phase.as_str().to_string()
    }

    pub fn hud_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.hud()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn render_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Events from the last frame (popups, sounds)
    pub fn events_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.state.events).map_err(|e| JsValue::from_str(&e.to_string()))
    }
}
