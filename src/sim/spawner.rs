//! Adaptive obstacle spawner
//!
//! Lane selection exploits the tracker's statistics once enough mistakes have
//! been seen; before that, obstacles rotate through the lanes by score.

use rand::Rng;

use super::state::{Lane, ObstacleKind, ObstacleSpec, RunState};
use super::tracker::{HeuristicTracker, argmax};
use crate::tuning::Tuning;

/// Pick the lane for the next obstacle (first matching rule wins)
pub fn select_lane<R: Rng + ?Sized>(
    tracker: &HeuristicTracker,
    score: u64,
    tuning: &Tuning,
    rng: &mut R,
) -> Lane {
    let confidence = tracker.confidence(tuning);

    // Too little data, or not confident enough this time: rotate evenly
    if tracker.preference_total() == 0 || rng.random::<f64>() > confidence {
        return Lane::from_score(score);
    }

    if confidence > tuning.preferred_lane_confidence
        && let Some(lane) = tracker.preferred_lane
    {
        return lane;
    }

    let hold = tracker.consecutive_lane_time;
    if hold.time > tuning.lane_hold_threshold && confidence > tuning.camping_confidence {
        return hold.lane;
    }

    let normalized = tracker.normalized_collisions();

    if tracker.delayed_switches > tuning.delayed_switch_min
        && confidence > tuning.delayed_switch_confidence
    {
        let scores: [f64; 3] = std::array::from_fn(|i| {
            f64::from(tracker.lane_preferences[i]) * tuning.preference_weight
                + normalized[i] * tuning.collision_weight
        });
        return Lane::ALL[argmax(&scores)];
    }

    // Where the player struggles most
    Lane::ALL[argmax(&normalized)]
}

/// Pick the shape of the next obstacle
pub fn select_kind<R: Rng + ?Sized>(
    tracker: &HeuristicTracker,
    score: u64,
    tuning: &Tuning,
    rng: &mut R,
) -> ObstacleKind {
    if f64::from(tracker.total_mistakes) / tuning.kind_variety_mistakes > 0.5 {
        if rng.random_bool(0.5) {
            ObstacleKind::High
        } else {
            ObstacleKind::Low
        }
    } else if score % 7 < 4 {
        ObstacleKind::High
    } else {
        ObstacleKind::Low
    }
}

/// Time between spawns at the given speed
///
/// Shrinks with speed down to the floor, then by up to 20% more as the
/// tracker grows confident (only after a handful of mistakes).
pub fn spawn_interval(tracker: &HeuristicTracker, speed: f64, tuning: &Tuning) -> f64 {
    let mut interval = (tuning.spawn_base_interval - speed * tuning.spawn_speed_factor)
        .max(tuning.spawn_min_interval);
    if tracker.total_mistakes > tuning.spawn_speedup_min_mistakes {
        interval *= 1.0 - tracker.confidence(tuning) * tuning.spawn_confidence_speedup;
    }
    interval
}

/// Decide the next obstacle and let the tracker remember it
pub fn spawn<R: Rng + ?Sized>(
    tracker: &mut HeuristicTracker,
    run: &RunState,
    tuning: &Tuning,
    rng: &mut R,
    now: f64,
) -> ObstacleSpec {
    let lane = select_lane(tracker, run.score, tuning, rng);
    let kind = select_kind(tracker, run.score, tuning, rng);
    let spec = ObstacleSpec { lane, kind };
    tracker.remember_spawn(spec, now);
    log::debug!(
        "spawn {:?} in {} lane at score {} (confidence {:.2})",
        kind,
        lane.as_str(),
        run.score,
        tracker.confidence(tuning)
    );
    spec
}
