//! Skill-independent perturbations and advisory messages
//!
//! Timed effects carry explicit expiry timestamps that are checked every
//! tick; nothing is scheduled behind the host's back.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Perturbation types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerturbationKind {
    /// Faster obstacles for a short while
    SpeedSurge,
    /// Cosmetic only
    TrackShake,
}

/// Category tag of an advisory phrase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageCategory {
    SpeedSurge,
    TrackShake,
    Collision,
    NearMiss,
}

impl MessageCategory {
    pub fn phrases(self) -> &'static [&'static str] {
        match self {
            MessageCategory::SpeedSurge => &[
                "Too comfortable, huh?",
                "Let's pick up the pace.",
                "Wake up call!",
            ],
            MessageCategory::TrackShake => &[
                "Did you feel that?",
                "Oops, my hand slipped.",
                "Just keeping you on your toes.",
            ],
            MessageCategory::Collision => &[
                "Yeah... I'm not letting you win that easily.",
                "Nice try.",
                "Almost had it.",
                "Getting predictable, aren't we?",
            ],
            MessageCategory::NearMiss => &["That was close!", "Lucky.", "Barely made it."],
        }
    }
}

impl From<PerturbationKind> for MessageCategory {
    fn from(kind: PerturbationKind) -> Self {
        match kind {
            PerturbationKind::SpeedSurge => MessageCategory::SpeedSurge,
            PerturbationKind::TrackShake => MessageCategory::TrackShake,
        }
    }
}

/// A message on screen until `expires_at`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Advisory {
    pub category: MessageCategory,
    pub text: &'static str,
    pub expires_at: f64,
}

/// Per-run perturbation state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventInjector {
    pub speed_surge_active: bool,
    pub speed_surge_end_time: f64,
    pub track_shake_active: bool,
    pub track_shake_end_time: f64,
    /// Quiet time required before the next event
    pub next_event_threshold: f64,
    pub last_event_time: f64,
    #[serde(skip)]
    pub active_message: Option<Advisory>,
}

impl EventInjector {
    /// Fresh injector for a run starting at `now`
    pub fn new<R: Rng + ?Sized>(now: f64, rng: &mut R, tuning: &Tuning) -> Self {
        Self {
            last_event_time: now,
            next_event_threshold: draw_threshold(rng, tuning),
            ..Self::default()
        }
    }

    /// Expire finished effects, then maybe arm a new perturbation
    pub fn update<R: Rng + ?Sized>(
        &mut self,
        score: u64,
        now: f64,
        rng: &mut R,
        tuning: &Tuning,
    ) -> Option<PerturbationKind> {
        self.expire(now);

        if score < tuning.event_min_score {
            return None;
        }
        if now - self.last_event_time <= self.next_event_threshold {
            return None;
        }

        let kind = if rng.random_bool(0.5) {
            PerturbationKind::SpeedSurge
        } else {
            PerturbationKind::TrackShake
        };
        // An already-running effect is not re-armed, but the clock still resets
        let armed = match kind {
            PerturbationKind::SpeedSurge if !self.speed_surge_active => {
                self.speed_surge_active = true;
                self.speed_surge_end_time = now + tuning.surge_duration;
                true
            }
            PerturbationKind::TrackShake if !self.track_shake_active => {
                self.track_shake_active = true;
                self.track_shake_end_time = now + tuning.shake_duration;
                true
            }
            _ => false,
        };

        self.last_event_time = now;
        self.next_event_threshold = draw_threshold(rng, tuning);

        if !armed {
            return None;
        }
        self.show_message(kind.into(), now, tuning.perturbation_message_duration, rng);
        log::info!(
            "{:?} at score {} (next event in {:.0}ms)",
            kind,
            score,
            self.next_event_threshold
        );
        Some(kind)
    }

    /// Clear effects and messages whose time is up
    pub fn expire(&mut self, now: f64) {
        if self.speed_surge_active && now >= self.speed_surge_end_time {
            self.speed_surge_active = false;
        }
        if self.track_shake_active && now >= self.track_shake_end_time {
            self.track_shake_active = false;
        }
        if self
            .active_message
            .as_ref()
            .is_some_and(|m| now >= m.expires_at)
        {
            self.active_message = None;
        }
    }

    pub fn perturbation_active(&self) -> bool {
        self.speed_surge_active || self.track_shake_active
    }

    pub fn speed_multiplier(&self, tuning: &Tuning) -> f64 {
        if self.speed_surge_active {
            tuning.surge_multiplier
        } else {
            1.0
        }
    }

    /// Show a random phrase from `category`, replacing any current message
    pub fn show_message<R: Rng + ?Sized>(
        &mut self,
        category: MessageCategory,
        now: f64,
        duration: f64,
        rng: &mut R,
    ) {
        let Some(&text) = category.phrases().choose(rng) else {
            return;
        };
        self.active_message = Some(Advisory {
            category,
            text,
            expires_at: now + duration,
        });
    }

    /// Message still on screen at `now`, whether or not `expire` has run
    pub fn message_at(&self, now: f64) -> Option<&Advisory> {
        self.active_message.as_ref().filter(|m| now < m.expires_at)
    }

    pub fn speed_surge_at(&self, now: f64) -> bool {
        self.speed_surge_active && now < self.speed_surge_end_time
    }

    pub fn track_shake_at(&self, now: f64) -> bool {
        self.track_shake_active && now < self.track_shake_end_time
    }

    /// Display time left on the current message
    pub fn message_remaining(&self, now: f64) -> Option<f64> {
        self.message_at(now).map(|m| m.expires_at - now)
    }
}

/// Uniform draw from `[event_threshold_min, event_threshold_max)`
fn draw_threshold<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning) -> f64 {
    rng.random_range(tuning.event_threshold_min..tuning.event_threshold_max)
}
