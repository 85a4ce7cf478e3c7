//! Data-driven game balance
//!
//! Every constant the simulation reads comes from `Tuning`. Defaults match
//! `crate::consts`; a JSON file may override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised when a tuning file is unreadable or breaks an invariant
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid tuning json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be greater than {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f64,
        value: f64,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
    #[error("{low_field} ({low:.2}) must be below {high_field} ({high:.2})")]
    Ordering {
        low_field: &'static str,
        low: f64,
        high_field: &'static str,
        high: f64,
    },
}

/// Balance constants for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Track geometry ===
    /// Top edge of the player band
    pub player_top: f64,
    /// Bottom edge of the player band
    pub player_bottom: f64,
    /// Where new obstacles appear
    pub obstacle_start: f64,
    /// Obstacles past this position are dropped
    pub travel_bound: f64,
    pub high_extent: f64,
    pub low_extent: f64,
    /// Distance per tick at speed 1.0
    pub obstacle_step: f64,

    // === Pacing ===
    /// Score needed for +1.0 speed
    pub speed_score_divisor: f64,
    pub spawn_base_interval: f64,
    pub spawn_speed_factor: f64,
    pub spawn_min_interval: f64,
    /// Maximum fraction the interval shrinks at full confidence
    pub spawn_confidence_speedup: f64,
    /// Mistakes required before the interval starts shrinking
    pub spawn_speedup_min_mistakes: u32,

    // === Tracker ===
    /// Lane changes faster than this count as quick reactions
    pub reaction_threshold: f64,
    /// Distance above the player bottom that makes a switch "last moment"
    pub last_moment_window: f64,
    /// Ticks in one lane before the player counts as camping
    pub lane_hold_threshold: u32,
    /// Rolling sample window
    pub rolling_window: u32,
    /// Mistakes at which confidence reaches 1.0
    pub confidence_mistakes: f64,

    // === Spawner ===
    /// Confidence above which the detected preferred lane is targeted
    pub preferred_lane_confidence: f64,
    /// Confidence above which a camped lane is targeted
    pub camping_confidence: f64,
    /// Confidence above which slow switchers are punished
    pub delayed_switch_confidence: f64,
    pub delayed_switch_min: u32,
    pub preference_weight: f64,
    pub collision_weight: f64,
    pub kind_variety_mistakes: f64,

    // === HUD ===
    /// Delayed switches above which the player reads as slow
    pub slow_switch_label_min: u32,
    /// Mistakes above which the tracker reads as adapting
    pub adapting_label_min_mistakes: u32,

    // === Perturbations ===
    pub event_min_score: u64,
    pub event_threshold_min: f64,
    pub event_threshold_max: f64,
    pub surge_multiplier: f64,
    pub surge_duration: f64,
    pub shake_duration: f64,

    // === Advisory messages ===
    pub perturbation_message_duration: f64,
    pub collision_message_duration: f64,
    pub near_miss_message_duration: f64,
    /// Probability of commenting on a near miss
    pub near_miss_chance: f64,
    /// Depth below the player band that still counts as a near miss
    pub near_miss_window: f64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_top: PLAYER_TOP,
            player_bottom: PLAYER_BOTTOM,
            obstacle_start: OBSTACLE_START,
            travel_bound: TRAVEL_BOUND,
            high_extent: HIGH_EXTENT,
            low_extent: LOW_EXTENT,
            obstacle_step: OBSTACLE_STEP,

            speed_score_divisor: SPEED_SCORE_DIVISOR,
            spawn_base_interval: SPAWN_BASE_INTERVAL,
            spawn_speed_factor: SPAWN_SPEED_FACTOR,
            spawn_min_interval: SPAWN_MIN_INTERVAL,
            spawn_confidence_speedup: SPAWN_CONFIDENCE_SPEEDUP,
            spawn_speedup_min_mistakes: SPAWN_SPEEDUP_MIN_MISTAKES,

            reaction_threshold: REACTION_THRESHOLD,
            last_moment_window: LAST_MOMENT_WINDOW,
            lane_hold_threshold: LANE_HOLD_THRESHOLD,
            rolling_window: ROLLING_WINDOW,
            confidence_mistakes: CONFIDENCE_MISTAKES,

            preferred_lane_confidence: PREFERRED_LANE_CONFIDENCE,
            camping_confidence: CAMPING_CONFIDENCE,
            delayed_switch_confidence: DELAYED_SWITCH_CONFIDENCE,
            delayed_switch_min: DELAYED_SWITCH_MIN,
            preference_weight: PREFERENCE_WEIGHT,
            collision_weight: COLLISION_WEIGHT,
            kind_variety_mistakes: KIND_VARIETY_MISTAKES,

            slow_switch_label_min: SLOW_SWITCH_LABEL_MIN,
            adapting_label_min_mistakes: ADAPTING_LABEL_MIN_MISTAKES,

            event_min_score: EVENT_MIN_SCORE,
            event_threshold_min: EVENT_THRESHOLD_MIN,
            event_threshold_max: EVENT_THRESHOLD_MAX,
            surge_multiplier: SURGE_MULTIPLIER,
            surge_duration: SURGE_DURATION,
            shake_duration: SHAKE_DURATION,

            perturbation_message_duration: PERTURBATION_MESSAGE_DURATION,
            collision_message_duration: COLLISION_MESSAGE_DURATION,
            near_miss_message_duration: NEAR_MISS_MESSAGE_DURATION,
            near_miss_chance: NEAR_MISS_CHANCE,
            near_miss_window: NEAR_MISS_WINDOW,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON document; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a JSON tuning file (native only)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_file(path: &str) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path).map_err(|source| TuningError::Io {
            path: path.to_string(),
            source,
        })?;
        let tuning = Self::from_json(&json)?;
        log::info!("Loaded tuning from {}", path);
        Ok(tuning)
    }

    pub fn validate(&self) -> Result<(), TuningError> {
        if self.player_top >= self.player_bottom {
            return Err(TuningError::Ordering {
                low_field: "player_top",
                low: self.player_top,
                high_field: "player_bottom",
                high: self.player_bottom,
            });
        }
        if self.obstacle_start >= self.player_top {
            return Err(TuningError::Ordering {
                low_field: "obstacle_start",
                low: self.obstacle_start,
                high_field: "player_top",
                high: self.player_top,
            });
        }
        if self.travel_bound <= self.player_bottom {
            return Err(TuningError::Ordering {
                low_field: "player_bottom",
                low: self.player_bottom,
                high_field: "travel_bound",
                high: self.travel_bound,
            });
        }
        for (field, value) in [
            ("high_extent", self.high_extent),
            ("low_extent", self.low_extent),
            ("obstacle_step", self.obstacle_step),
            ("speed_score_divisor", self.speed_score_divisor),
            ("spawn_min_interval", self.spawn_min_interval),
            ("rolling_window", f64::from(self.rolling_window)),
            ("confidence_mistakes", self.confidence_mistakes),
            ("kind_variety_mistakes", self.kind_variety_mistakes),
        ] {
            if value <= 0.0 {
                return Err(TuningError::MinViolation {
                    field,
                    min: 0.0,
                    value,
                });
            }
        }
        if self.spawn_min_interval > self.spawn_base_interval {
            return Err(TuningError::Ordering {
                low_field: "spawn_min_interval",
                low: self.spawn_min_interval,
                high_field: "spawn_base_interval",
                high: self.spawn_base_interval,
            });
        }
        if self.event_threshold_min >= self.event_threshold_max {
            return Err(TuningError::Ordering {
                low_field: "event_threshold_min",
                low: self.event_threshold_min,
                high_field: "event_threshold_max",
                high: self.event_threshold_max,
            });
        }
        for (field, value) in [
            ("spawn_confidence_speedup", self.spawn_confidence_speedup),
            ("near_miss_chance", self.near_miss_chance),
            ("preferred_lane_confidence", self.preferred_lane_confidence),
            ("camping_confidence", self.camping_confidence),
            ("delayed_switch_confidence", self.delayed_switch_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::RangeViolation {
                    field,
                    min: 0.0,
                    max: 1.0,
                    value,
                });
            }
        }
        for (field, value) in [
            ("preference_weight", self.preference_weight),
            ("collision_weight", self.collision_weight),
        ] {
            if value < 0.0 {
                return Err(TuningError::RangeViolation {
                    field,
                    min: 0.0,
                    max: f64::MAX,
                    value,
                });
            }
        }
        if self.surge_multiplier < 1.0 {
            return Err(TuningError::RangeViolation {
                field: "surge_multiplier",
                min: 1.0,
                max: f64::MAX,
                value: self.surge_multiplier,
            });
        }
        Ok(())
    }
}
