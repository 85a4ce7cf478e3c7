//! Heuristic tracker
//!
//! Rolling statistics about where the player goes and where they get hit.
//! Lives for the whole session: restarts keep it, so the spawner keeps
//! getting sharper across attempts.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::state::{Lane, ObstacleKind, ObstacleSpec};
use crate::consts::LANE_COUNT;
use crate::tuning::Tuning;

/// Spawn history kept for inspection
pub const RECENT_OBSTACLES_LEN: usize = 10;

/// How long the player has stayed in one lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LaneHold {
    pub lane: Lane,
    /// Ticks spent in `lane`
    pub time: u32,
}

/// A spawned obstacle, as remembered by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnRecord {
    pub lane: Lane,
    pub kind: ObstacleKind,
    pub spawn_time: f64,
}

/// Player behaviour statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicTracker {
    pub total_mistakes: u32,
    /// Lane changes landing on each lane
    pub lane_preferences: [u32; LANE_COUNT],
    /// Decayed per-lane hit counts (drives the "favored lane" label)
    pub lane_collisions: [u32; LANE_COUNT],
    pub lane_collision_rolling_sums: [u32; LANE_COUNT],
    /// Capped at the rolling window
    pub lane_collision_sample_counts: [u32; LANE_COUNT],
    pub mistake_rolling_average: f64,
    /// Capped at the rolling window
    pub mistake_sample_count: u32,
    pub consecutive_lane_time: LaneHold,
    /// Lane the player camps in, once confidently detected
    pub preferred_lane: Option<Lane>,
    pub delayed_switches: u32,
    /// Slow switches made with an obstacle bearing down in the old lane
    pub last_moment_switches: u32,
    /// Host timestamp of the last lane change
    pub last_lane_change: Option<f64>,
    pub recent_obstacles: VecDeque<SpawnRecord>,
}

impl Default for HeuristicTracker {
    fn default() -> Self {
        Self {
            total_mistakes: 0,
            lane_preferences: [0; LANE_COUNT],
            lane_collisions: [0; LANE_COUNT],
            lane_collision_rolling_sums: [0; LANE_COUNT],
            lane_collision_sample_counts: [0; LANE_COUNT],
            mistake_rolling_average: 0.0,
            mistake_sample_count: 0,
            consecutive_lane_time: LaneHold {
                lane: Lane::Center,
                time: 0,
            },
            preferred_lane: None,
            delayed_switches: 0,
            last_moment_switches: 0,
            last_lane_change: None,
            recent_obstacles: VecDeque::with_capacity(RECENT_OBSTACLES_LEN),
        }
    }
}

impl HeuristicTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time since the previous lane change; unbounded before the first one
    pub fn reaction_latency(&self, now: f64) -> f64 {
        self.last_lane_change
            .map(|last| now - last)
            .unwrap_or(f64::INFINITY)
    }

    /// Record a lane change from `from` to `to`
    ///
    /// `last_moment` is true when an obstacle in `from` was about to reach
    /// the player at the time of the switch.
    pub fn record_lane_change(
        &mut self,
        from: Lane,
        to: Lane,
        reaction_latency: f64,
        last_moment: bool,
        tuning: &Tuning,
    ) {
        if reaction_latency < tuning.reaction_threshold {
            self.delayed_switches = self.delayed_switches.saturating_sub(1);
        } else {
            self.delayed_switches += 1;
            if last_moment {
                self.last_moment_switches += 1;
            }
        }

        self.lane_preferences[to.index()] += 1;

        if self.consecutive_lane_time.lane != to {
            self.consecutive_lane_time = LaneHold { lane: to, time: 0 };
        }

        log::debug!(
            "lane change {} -> {} after {:.0}ms (delayed={}, last_moment={})",
            from.as_str(),
            to.as_str(),
            reaction_latency,
            self.delayed_switches,
            last_moment
        );
    }

    /// Record a collision in `lane`
    pub fn record_collision(&mut self, lane: Lane, tuning: &Tuning) {
        let window = tuning.rolling_window;

        let n = self.mistake_sample_count;
        self.mistake_rolling_average = (self.mistake_rolling_average * f64::from(n) + 1.0)
            / f64::from((n + 1).min(window));
        if n < window {
            self.mistake_sample_count += 1;
        }

        self.total_mistakes += 1;

        let i = lane.index();
        self.lane_collision_rolling_sums[i] += 1;
        if self.lane_collision_sample_counts[i] < window {
            self.lane_collision_sample_counts[i] += 1;
        } else {
            // Window full: age out one old hit before counting this one
            self.lane_collisions[i] = self.lane_collisions[i].saturating_sub(1);
        }
        self.lane_collisions[i] += 1;

        let most_preferred = Lane::ALL[argmax(&self.lane_preferences.map(f64::from))];
        let hold = self.consecutive_lane_time;
        if hold.time > tuning.lane_hold_threshold
            && hold.lane == most_preferred
            && hold.lane == lane
        {
            self.preferred_lane = Some(most_preferred);
        }

        self.consecutive_lane_time.time = 0;

        log::debug!(
            "collision in {} lane (mistakes={}, avg={:.2}, preferred={:?})",
            lane.as_str(),
            self.total_mistakes,
            self.mistake_rolling_average,
            self.preferred_lane
        );
    }

    /// Count one tick in `current`, restarting the count on a lane mismatch
    pub fn tick_lane_hold(&mut self, current: Lane) {
        self.consecutive_lane_time.time += 1;
        if self.consecutive_lane_time.lane != current {
            self.consecutive_lane_time = LaneHold {
                lane: current,
                time: 0,
            };
        }
    }

    /// Remember a spawn (bounded history)
    pub fn remember_spawn(&mut self, spec: ObstacleSpec, now: f64) {
        self.recent_obstacles.push_back(SpawnRecord {
            lane: spec.lane,
            kind: spec.kind,
            spawn_time: now,
        });
        if self.recent_obstacles.len() > RECENT_OBSTACLES_LEN {
            self.recent_obstacles.pop_front();
        }
    }

    /// `min(1, total_mistakes / confidence_mistakes)`
    pub fn confidence(&self, tuning: &Tuning) -> f64 {
        (f64::from(self.total_mistakes) / tuning.confidence_mistakes).min(1.0)
    }

    pub fn preference_total(&self) -> u32 {
        self.lane_preferences.iter().sum()
    }

    /// Rolling collision rate per lane (0 for lanes with no samples)
    pub fn normalized_collisions(&self) -> [f64; LANE_COUNT] {
        std::array::from_fn(|i| {
            f64::from(self.lane_collision_rolling_sums[i])
                / f64::from(self.lane_collision_sample_counts[i].max(1))
        })
    }

    /// Lane with the most decayed hits, `None` before the first collision
    pub fn most_collided_lane(&self) -> Option<Lane> {
        let counts = self.lane_collisions.map(f64::from);
        let i = argmax(&counts);
        (counts[i] > 0.0).then(|| Lane::ALL[i])
    }
}

/// Index of the largest value; ties go to the lowest index
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &value) in values.iter().enumerate().skip(1) {
        if value > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_quick_switch_never_goes_negative() {
        let tuning = Tuning::default();
        let mut tracker = HeuristicTracker::new();
        tracker.record_lane_change(Lane::Center, Lane::Left, 50.0, false, &tuning);
        assert_eq!(tracker.delayed_switches, 0);
        tracker.record_lane_change(Lane::Left, Lane::Center, 250.0, false, &tuning);
        assert_eq!(tracker.delayed_switches, 1);
        tracker.record_lane_change(Lane::Center, Lane::Right, 10.0, false, &tuning);
        assert_eq!(tracker.delayed_switches, 0);
    }

    #[test]
    fn test_lane_change_resets_hold() {
        let tuning = Tuning::default();
        let mut tracker = HeuristicTracker::new();
        for _ in 0..40 {
            tracker.tick_lane_hold(Lane::Center);
        }
        assert_eq!(tracker.consecutive_lane_time.time, 40);
        tracker.record_lane_change(Lane::Center, Lane::Right, 1000.0, true, &tuning);
        assert_eq!(
            tracker.consecutive_lane_time,
            LaneHold {
                lane: Lane::Right,
                time: 0
            }
        );
        assert_eq!(tracker.lane_preferences, [0, 0, 1]);
        assert_eq!(tracker.last_moment_switches, 1);
    }

    #[test]
    fn test_collision_window_decays_lane_collisions() {
        let tuning = Tuning::default();
        let mut tracker = HeuristicTracker::new();
        for _ in 0..15 {
            tracker.record_collision(Lane::Left, &tuning);
        }
        assert_eq!(tracker.total_mistakes, 15);
        assert_eq!(tracker.lane_collision_sample_counts[0], 10);
        assert_eq!(tracker.lane_collision_rolling_sums[0], 15);
        // 10 counted, then each further hit decays one and adds one
        assert_eq!(tracker.lane_collisions[0], 10);
        assert_eq!(tracker.mistake_sample_count, 10);
    }

    #[test]
    fn test_rolling_average_first_samples() {
        let tuning = Tuning::default();
        let mut tracker = HeuristicTracker::new();
        tracker.record_collision(Lane::Center, &tuning);
        assert!((tracker.mistake_rolling_average - 1.0).abs() < 1e-9);
        tracker.record_collision(Lane::Center, &tuning);
        // (1 * 1 + 1) / 2
        assert!((tracker.mistake_rolling_average - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_camping_sets_preferred_lane() {
        let tuning = Tuning::default();
        let mut tracker = HeuristicTracker::new();
        tracker.record_lane_change(Lane::Center, Lane::Right, 1000.0, false, &tuning);
        for _ in 0..31 {
            tracker.tick_lane_hold(Lane::Right);
        }
        tracker.record_collision(Lane::Right, &tuning);
        assert_eq!(tracker.preferred_lane, Some(Lane::Right));
        assert_eq!(tracker.consecutive_lane_time.time, 0);
    }

    #[test]
    fn test_short_hold_does_not_set_preferred_lane() {
        let tuning = Tuning::default();
        let mut tracker = HeuristicTracker::new();
        tracker.record_lane_change(Lane::Center, Lane::Right, 1000.0, false, &tuning);
        for _ in 0..30 {
            tracker.tick_lane_hold(Lane::Right);
        }
        tracker.record_collision(Lane::Right, &tuning);
        assert_eq!(tracker.preferred_lane, None);
    }

    #[test]
    fn test_hit_in_other_lane_does_not_set_preferred_lane() {
        let tuning = Tuning::default();
        let mut tracker = HeuristicTracker::new();
        tracker.record_lane_change(Lane::Center, Lane::Right, 1000.0, false, &tuning);
        for _ in 0..31 {
            tracker.tick_lane_hold(Lane::Right);
        }
        tracker.record_collision(Lane::Left, &tuning);
        assert_eq!(tracker.preferred_lane, None);
        assert_eq!(tracker.consecutive_lane_time.time, 0);
    }

    #[test]
    fn test_confidence_saturates() {
        let tuning = Tuning::default();
        let mut tracker = HeuristicTracker::new();
        assert_eq!(tracker.confidence(&tuning), 0.0);
        tracker.total_mistakes = 6;
        assert_eq!(tracker.confidence(&tuning), 0.3);
        tracker.total_mistakes = 45;
        assert_eq!(tracker.confidence(&tuning), 1.0);
    }

    #[test]
    fn test_recent_obstacles_bounded() {
        let mut tracker = HeuristicTracker::new();
        let spec = ObstacleSpec {
            lane: Lane::Left,
            kind: ObstacleKind::Low,
        };
        for i in 0..25 {
            tracker.remember_spawn(spec, i as f64);
        }
        assert_eq!(tracker.recent_obstacles.len(), RECENT_OBSTACLES_LEN);
        assert_eq!(tracker.recent_obstacles[0].spawn_time, 15.0);
    }

    #[test]
    fn test_argmax_ties_pick_lowest() {
        assert_eq!(argmax(&[0.0, 0.0, 0.0]), 0);
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), 1);
        assert_eq!(argmax(&[1.0, 2.0, 5.0]), 2);
    }

    #[derive(Debug, Clone)]
    enum Event {
        Change(usize, usize, f64),
        Hit(usize),
        Hold(usize),
    }

    fn event() -> impl Strategy<Value = Event> {
        prop_oneof![
            (0usize..3, 0usize..3, 0.0f64..1000.0).prop_map(|(a, b, l)| Event::Change(a, b, l)),
            (0usize..3).prop_map(Event::Hit),
            (0usize..3).prop_map(Event::Hold),
        ]
    }

    proptest! {
        #[test]
        fn tracker_invariants_hold(events in prop::collection::vec(event(), 0..200)) {
            let tuning = Tuning::default();
            let mut tracker = HeuristicTracker::new();
            for ev in events {
                let before = tracker.lane_preferences;
                match ev {
                    Event::Change(from, to, latency) => {
                        let (from, to) = (Lane::ALL[from], Lane::ALL[to]);
                        tracker.record_lane_change(from, to, latency, false, &tuning);
                        for i in 0..LANE_COUNT {
                            let expected = before[i] + u32::from(i == to.index());
                            prop_assert_eq!(tracker.lane_preferences[i], expected);
                        }
                    }
                    Event::Hit(lane) => {
                        tracker.record_collision(Lane::ALL[lane], &tuning);
                        prop_assert_eq!(tracker.lane_preferences, before);
                    }
                    Event::Hold(lane) => {
                        tracker.tick_lane_hold(Lane::ALL[lane]);
                        prop_assert_eq!(tracker.lane_preferences, before);
                    }
                }
                prop_assert!(tracker.mistake_sample_count <= tuning.rolling_window);
                for count in tracker.lane_collision_sample_counts {
                    prop_assert!(count <= tuning.rolling_window);
                }
                prop_assert!(tracker.confidence(&tuning) <= 1.0);
            }
        }
    }
}
