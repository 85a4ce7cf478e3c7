//! HUD snapshot for the rendering layer

use serde::Serialize;

use crate::sim::{EventInjector, HeuristicTracker, RunPhase, RunState};
use crate::tuning::Tuning;

/// Everything the UI shows besides the track itself
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hud {
    pub phase: RunPhase,
    /// `floor(score / 10)`
    pub score: u64,
    /// Speed with one decimal
    pub speed: String,
    pub total_mistakes: u32,
    /// Lane the player gets hit in most
    pub favored_lane: &'static str,
    /// What the spawner has figured out about the player
    pub timing: &'static str,
    pub message: Option<&'static str>,
    /// Milliseconds left on `message`
    pub message_remaining: Option<f64>,
    pub speed_surge: bool,
    pub track_shake: bool,
}

impl Hud {
    /// Snapshot at `now`; effects and messages past their expiry are hidden
    pub fn capture(
        run: &RunState,
        tracker: &HeuristicTracker,
        events: &EventInjector,
        tuning: &Tuning,
        now: f64,
    ) -> Self {
        Self {
            phase: run.phase,
            score: run.display_score(),
            speed: format!("{:.1}", run.speed),
            total_mistakes: tracker.total_mistakes,
            favored_lane: favored_lane_label(tracker),
            timing: timing_label(tracker, tuning),
            message: events.message_at(now).map(|m| m.text),
            message_remaining: events.message_remaining(now),
            speed_surge: events.speed_surge_at(now),
            track_shake: events.track_shake_at(now),
        }
    }
}

pub fn favored_lane_label(tracker: &HeuristicTracker) -> &'static str {
    tracker
        .most_collided_lane()
        .map(|lane| lane.as_str())
        .unwrap_or("None")
}

pub fn timing_label(tracker: &HeuristicTracker, tuning: &Tuning) -> &'static str {
    if tracker.delayed_switches > tuning.slow_switch_label_min {
        "Slow to switch lanes"
    } else if tracker.preferred_lane.is_some() {
        "Predictable pattern detected"
    } else if tracker.total_mistakes > tuning.adapting_label_min_mistakes {
        "Adapting to your habits"
    } else {
        "Learning..."
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Lane, MessageCategory};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_labels_for_fresh_tracker() {
        let tracker = HeuristicTracker::new();
        assert_eq!(favored_lane_label(&tracker), "None");
        assert_eq!(timing_label(&tracker, &Tuning::default()), "Learning...");
    }

    #[test]
    fn test_timing_label_priority() {
        let tuning = Tuning::default();
        let mut tracker = HeuristicTracker {
            total_mistakes: 3,
            ..HeuristicTracker::default()
        };
        assert_eq!(timing_label(&tracker, &tuning), "Learning...");
        tracker.total_mistakes = 4;
        assert_eq!(timing_label(&tracker, &tuning), "Adapting to your habits");
        tracker.preferred_lane = Some(Lane::Left);
        assert_eq!(timing_label(&tracker, &tuning), "Predictable pattern detected");
        tracker.delayed_switches = 5;
        assert_eq!(timing_label(&tracker, &tuning), "Predictable pattern detected");
        tracker.delayed_switches = 6;
        assert_eq!(timing_label(&tracker, &tuning), "Slow to switch lanes");
    }

    #[test]
    fn test_favored_lane_follows_collisions() {
        let tracker = HeuristicTracker {
            lane_collisions: [1, 3, 3],
            ..HeuristicTracker::default()
        };
        assert_eq!(favored_lane_label(&tracker), "Center");
    }

    #[test]
    fn test_capture_formats_score_and_speed() {
        let mut run = RunState::started(0.0);
        run.score = 1234;
        run.speed = 2.468;
        let hud = Hud::capture(
            &run,
            &HeuristicTracker::new(),
            &EventInjector::default(),
            &Tuning::default(),
            0.0,
        );
        assert_eq!(hud.score, 123);
        assert_eq!(hud.speed, "2.5");
        assert_eq!(hud.phase, RunPhase::Running);
        assert_eq!(hud.message, None);
    }

    #[test]
    fn test_capture_hides_expired_advisory() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut run = RunState::started(0.0);
        run.phase = RunPhase::Ended;
        let mut events = EventInjector {
            speed_surge_active: true,
            speed_surge_end_time: 2010.0,
            ..EventInjector::default()
        };
        events.show_message(MessageCategory::Collision, 10.0, 2000.0, &mut rng);
        let tracker = HeuristicTracker::new();
        let tuning = Tuning::default();

        let hud = Hud::capture(&run, &tracker, &events, &tuning, 1000.0);
        assert!(hud.message.is_some());
        assert_eq!(hud.message_remaining, Some(1010.0));
        assert!(hud.speed_surge);

        let hud = Hud::capture(&run, &tracker, &events, &tuning, 60_000.0);
        assert_eq!(hud.message, None);
        assert_eq!(hud.message_remaining, None);
        assert!(!hud.speed_surge);
        assert!(!hud.track_shake);
    }
}
