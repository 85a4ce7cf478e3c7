//! Browser bindings
//!
//! Thin wasm-bindgen wrapper around `Session`. The page owns the animation
//! loop, input listeners and drawing; it passes `performance.now()` in.

use wasm_bindgen::prelude::*;

use crate::sim::{LaneShift, Session, TickInput, TickOutcome};
use crate::tuning::Tuning;

fn to_js<E: std::fmt::Display>(err: E) -> JsValue {
    JsValue::from_str(&err.to_string())
}

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // A second init (hot reload) keeps the existing logger
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("Lane Runner core loaded");
}

#[wasm_bindgen]
pub struct WebSession {
    session: Session,
}

#[wasm_bindgen]
impl WebSession {
    /// Create a session, optionally overriding balance with a JSON document
    #[wasm_bindgen(constructor)]
    pub fn new(tuning_json: Option<String>) -> Result<WebSession, JsValue> {
        let tuning = match tuning_json {
            Some(json) => Tuning::from_json(&json).map_err(to_js)?,
            None => Tuning::default(),
        };
        let seed = js_sys::Date::now() as u64;
        log::info!("Session created with seed: {}", seed);
        Ok(Self {
            session: Session::new(seed, tuning),
        })
    }

    pub fn start(&mut self, now: f64) -> bool {
        self.session.start(now)
    }

    pub fn restart(&mut self, now: f64) {
        self.session.restart(now);
    }

    pub fn lane_left(&mut self, now: f64) -> bool {
        self.session.change_lane(LaneShift::Left, now)
    }

    pub fn lane_right(&mut self, now: f64) -> bool {
        self.session.change_lane(LaneShift::Right, now)
    }

    /// Advance one frame; false when no run is in progress afterwards
    pub fn tick(&mut self, now: f64) -> bool {
        let input = TickInput {
            now,
            autopilot: false,
        };
        matches!(self.session.tick(&input), TickOutcome::Running)
    }

    pub fn current_lane(&self) -> u32 {
        self.session.run.current_lane.index() as u32
    }

    pub fn hud_json(&self, now: f64) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.hud(now)).map_err(to_js)
    }

    pub fn obstacles_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.run.obstacles).map_err(to_js)
    }

    /// Whether a display score would make the session leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        self.session.high_scores.qualifies(score)
    }

    /// Rank a display score would take (1-indexed)
    pub fn potential_rank(&self, score: u64) -> Option<u32> {
        self.session
            .high_scores
            .potential_rank(score)
            .map(|rank| rank as u32)
    }

    pub fn high_scores_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.session.high_scores).map_err(to_js)
    }
}
