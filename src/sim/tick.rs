//! Fixed-step simulation tick
//!
//! `Session` owns everything that outlives a frame: the tuning, the seeded
//! RNG, the heuristic tracker and the current run. The host calls `tick`
//! once per animation frame and forwards lane-change input as it arrives.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{self, CollisionResult};
use super::events::{EventInjector, MessageCategory};
use super::spawner;
use super::state::{Lane, LaneShift, RunPhase, RunState};
use super::tracker::HeuristicTracker;
use crate::highscores::{HighScores, RunReport};
use crate::hud::Hud;
use crate::tuning::Tuning;

/// How far above the player the autopilot looks for trouble
const AUTOPILOT_LOOKAHEAD: f64 = 120.0;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Host timestamp in milliseconds
    pub now: f64,
    /// Let the built-in autopilot steer (demo mode)
    pub autopilot: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TickOutcome {
    /// No run in progress; nothing moved
    Idle,
    Running,
    /// The run ended on this tick
    Ended(RunReport),
}

/// A play session: many runs, one tracker
pub struct Session {
    seed: u64,
    tuning: Tuning,
    rng: Pcg32,
    pub tracker: HeuristicTracker,
    pub run: RunState,
    pub events: EventInjector,
    pub high_scores: HighScores,
}

impl Session {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            tracker: HeuristicTracker::new(),
            run: RunState::default(),
            events: EventInjector::default(),
            high_scores: HighScores::new(),
        }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Begin a run unless one is already in progress
    pub fn start(&mut self, now: f64) -> bool {
        if self.run.is_running() {
            return false;
        }
        self.begin_run(now);
        true
    }

    /// Discard the current run and perturbations; the tracker keeps learning
    pub fn restart(&mut self, now: f64) {
        self.begin_run(now);
    }

    fn begin_run(&mut self, now: f64) {
        self.run = RunState::started(now);
        self.events = EventInjector::new(now, &mut self.rng, &self.tuning);
        log::info!(
            "Run started (seed {}, {} mistakes so far)",
            self.seed,
            self.tracker.total_mistakes
        );
    }

    /// Apply a lane change right away; ignored at the edges and between runs
    pub fn change_lane(&mut self, shift: LaneShift, now: f64) -> bool {
        if !self.run.is_running() {
            return false;
        }
        let last_moment =
            collision::imminent_in_lane(&self.run.obstacles, self.run.current_lane, &self.tuning);
        let Some((from, to)) = self.run.shift_lane(shift) else {
            return false;
        };
        let latency = self.tracker.reaction_latency(now);
        self.tracker
            .record_lane_change(from, to, latency, last_moment, &self.tuning);
        self.tracker.last_lane_change = Some(now);
        true
    }

    /// Advance the current run by one step
    pub fn tick(&mut self, input: &TickInput) -> TickOutcome {
        let now = input.now;
        if !self.run.is_running() {
            // Advisories keep timing out between runs
            self.events.expire(now);
            return TickOutcome::Idle;
        }

        if input.autopilot && let Some(shift) = autopilot_shift(&self.run, &self.tuning) {
            self.change_lane(shift, now);
        }

        self.run.score += 1;

        self.events
            .update(self.run.score, now, &mut self.rng, &self.tuning);

        let base_speed = 1.0 + self.run.score as f64 / self.tuning.speed_score_divisor;
        self.run.speed = base_speed * self.events.speed_multiplier(&self.tuning);

        let interval = spawner::spawn_interval(&self.tracker, self.run.speed, &self.tuning);
        if now - self.run.last_spawn_time > interval {
            let spec = spawner::spawn(
                &mut self.tracker,
                &self.run,
                &self.tuning,
                &mut self.rng,
                now,
            );
            self.run.push_obstacle(spec, &self.tuning);
            self.run.last_spawn_time = now;
        }

        self.run.advance_obstacles(&self.tuning);

        if let Some(hit) =
            collision::find_collision(&self.run.obstacles, self.run.current_lane, &self.tuning)
        {
            return TickOutcome::Ended(self.end_run(hit, now));
        }

        self.check_near_misses(now);
        self.tracker.tick_lane_hold(self.run.current_lane);

        TickOutcome::Running
    }

    fn end_run(&mut self, hit: CollisionResult, now: f64) -> RunReport {
        self.tracker.record_collision(hit.lane, &self.tuning);

        if self.events.perturbation_active() {
            self.events.show_message(
                MessageCategory::Collision,
                now,
                self.tuning.collision_message_duration,
                &mut self.rng,
            );
        }

        self.run.phase = RunPhase::Ended;

        let report = RunReport {
            score: self.run.display_score(),
            total_mistakes: self.tracker.total_mistakes,
            ticks: self.run.score,
        };
        let rank = self.high_scores.add_report(report);
        log::info!(
            "Run ended: hit {:?} obstacle #{} in {} lane, score {}, mistakes {}, rank {:?}",
            hit.kind,
            hit.obstacle_id,
            hit.lane.as_str(),
            report.score,
            report.total_mistakes,
            rank
        );
        report
    }

    /// Comment on close calls while a perturbation is running
    fn check_near_misses(&mut self, now: f64) {
        if !self.events.perturbation_active() || self.events.active_message.is_some() {
            return;
        }
        let current = self.run.current_lane;
        let mut comment = false;
        for obstacle in &mut self.run.obstacles {
            if obstacle.near_miss_flagged || !collision::is_near_miss(obstacle, current, &self.tuning)
            {
                continue;
            }
            obstacle.near_miss_flagged = true;
            if self.rng.random_bool(self.tuning.near_miss_chance) {
                comment = true;
            }
        }
        if comment {
            self.events.show_message(
                MessageCategory::NearMiss,
                now,
                self.tuning.near_miss_message_duration,
                &mut self.rng,
            );
        }
    }

    pub fn hud(&self, now: f64) -> Hud {
        Hud::capture(&self.run, &self.tracker, &self.events, &self.tuning, now)
    }
}

/// Dodge into a free neighbouring lane when the current one is about to be hit
fn autopilot_shift(run: &RunState, tuning: &Tuning) -> Option<LaneShift> {
    let threatened = |lane: Lane| {
        run.obstacles.iter().any(|o| {
            o.lane == lane
                && o.bottom(tuning) > tuning.player_top - AUTOPILOT_LOOKAHEAD
                && o.top() < tuning.player_bottom
        })
    };
    if !threatened(run.current_lane) {
        return None;
    }
    [LaneShift::Left, LaneShift::Right]
        .into_iter()
        .find(|&shift| run.current_lane.shifted(shift).is_some_and(|l| !threatened(l)))
}
