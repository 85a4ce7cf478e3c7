//! Lane Runner - A three-lane dodging game that learns from your mistakes
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tracker, spawner, perturbations, tick)
//! - `hud`: Read-only snapshot handed to the rendering layer
//! - `highscores`: In-memory leaderboard for the current session
//! - `tuning`: Data-driven game balance
//! - `web`: wasm-bindgen facade (wasm32 only)

pub mod highscores;
pub mod hud;
pub mod sim;
pub mod tuning;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use highscores::{HighScores, RunReport};
pub use hud::Hud;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants (defaults for `Tuning`)
pub mod consts {
    /// Number of lanes on the track
    pub const LANE_COUNT: usize = 3;

    /// Player band along the track (player is 50 tall, 50 above the bottom)
    pub const PLAYER_TOP: f64 = 500.0;
    pub const PLAYER_BOTTOM: f64 = 550.0;

    /// Obstacles appear just above the visible track
    pub const OBSTACLE_START: f64 = -100.0;
    /// Obstacles are dropped once fully past the player
    pub const TRAVEL_BOUND: f64 = 700.0;
    pub const HIGH_EXTENT: f64 = 50.0;
    pub const LOW_EXTENT: f64 = 32.0;
    pub const OBSTACLE_STEP: f64 = 3.0;

    pub const SPEED_SCORE_DIVISOR: f64 = 500.0;
    pub const SPAWN_BASE_INTERVAL: f64 = 800.0;
    pub const SPAWN_SPEED_FACTOR: f64 = 100.0;
    pub const SPAWN_MIN_INTERVAL: f64 = 400.0;
    pub const SPAWN_CONFIDENCE_SPEEDUP: f64 = 0.2;
    pub const SPAWN_SPEEDUP_MIN_MISTAKES: u32 = 5;

    /// Milliseconds between lane changes below which a switch is "quick"
    pub const REACTION_THRESHOLD: f64 = 200.0;
    pub const LAST_MOMENT_WINDOW: f64 = 80.0;
    pub const LANE_HOLD_THRESHOLD: u32 = 30;
    pub const ROLLING_WINDOW: u32 = 10;
    /// Mistakes at which the spawner is fully confident
    pub const CONFIDENCE_MISTAKES: f64 = 20.0;

    /// Confidence gates of the lane selection rules
    pub const PREFERRED_LANE_CONFIDENCE: f64 = 0.3;
    pub const CAMPING_CONFIDENCE: f64 = 0.2;
    pub const DELAYED_SWITCH_CONFIDENCE: f64 = 0.4;
    /// Delayed switches before slow switchers are punished
    pub const DELAYED_SWITCH_MIN: u32 = 2;
    pub const PREFERENCE_WEIGHT: f64 = 0.7;
    pub const COLLISION_WEIGHT: f64 = 2.0;
    /// Mistakes per unit of "variety" in obstacle shapes
    pub const KIND_VARIETY_MISTAKES: f64 = 10.0;

    /// HUD timing label thresholds
    pub const SLOW_SWITCH_LABEL_MIN: u32 = 5;
    pub const ADAPTING_LABEL_MIN_MISTAKES: u32 = 3;

    pub const EVENT_MIN_SCORE: u64 = 300;
    pub const EVENT_THRESHOLD_MIN: f64 = 8000.0;
    pub const EVENT_THRESHOLD_MAX: f64 = 15000.0;
    pub const SURGE_MULTIPLIER: f64 = 1.5;
    pub const SURGE_DURATION: f64 = 2000.0;
    pub const SHAKE_DURATION: f64 = 800.0;

    pub const PERTURBATION_MESSAGE_DURATION: f64 = 1500.0;
    pub const COLLISION_MESSAGE_DURATION: f64 = 2000.0;
    pub const NEAR_MISS_MESSAGE_DURATION: f64 = 1200.0;
    pub const NEAR_MISS_CHANCE: f64 = 0.3;
    pub const NEAR_MISS_WINDOW: f64 = 50.0;

    /// Host frame length used by the headless demo (60 Hz)
    pub const FRAME_MS: f64 = 1000.0 / 60.0;
}
