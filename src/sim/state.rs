//! Run state and core simulation types
//!
//! Everything that is discarded on restart lives here. The heuristic tracker
//! (see `tracker.rs`) is deliberately kept out of `RunState`.

use serde::{Deserialize, Serialize};

use crate::consts::LANE_COUNT;
use crate::tuning::Tuning;

/// One of the three tracks the player and obstacles occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Lane {
    Left,
    #[default]
    Center,
    Right,
}

impl Lane {
    pub const ALL: [Lane; LANE_COUNT] = [Lane::Left, Lane::Center, Lane::Right];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Lane::Left => 0,
            Lane::Center => 1,
            Lane::Right => 2,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Lane cycled by elapsed score: `floor(score / 100) mod 3`
    pub fn from_score(score: u64) -> Self {
        Self::ALL[((score / 100) % LANE_COUNT as u64) as usize]
    }

    /// Neighbouring lane in the given direction, `None` at the edges
    pub fn shifted(self, shift: LaneShift) -> Option<Self> {
        match shift {
            LaneShift::Left => self.index().checked_sub(1).and_then(Self::from_index),
            LaneShift::Right => Self::from_index(self.index() + 1),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::Left => "Left",
            Lane::Center => "Center",
            Lane::Right => "Right",
        }
    }
}

/// Direction of a lane-change input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LaneShift {
    Left,
    Right,
}

/// Obstacle shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    Low,
    High,
}

impl ObstacleKind {
    /// Vertical extent along the track
    pub fn extent(self, tuning: &Tuning) -> f64 {
        match self {
            ObstacleKind::Low => tuning.low_extent,
            ObstacleKind::High => tuning.high_extent,
        }
    }
}

/// Lane and shape chosen by the spawner, before the obstacle exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObstacleSpec {
    pub lane: Lane,
    pub kind: ObstacleKind,
}

/// An obstacle travelling toward the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub lane: Lane,
    pub kind: ObstacleKind,
    /// Distance travelled down the track (top edge)
    pub position: f64,
    /// Already considered for near-miss commentary
    #[serde(default)]
    pub near_miss_flagged: bool,
}

impl Obstacle {
    #[inline]
    pub fn top(&self) -> f64 {
        self.position
    }

    #[inline]
    pub fn bottom(&self, tuning: &Tuning) -> f64 {
        self.position + self.kind.extent(tuning)
    }
}

/// Lifecycle of a single run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    #[default]
    NotStarted,
    Running,
    Ended,
}

/// Per-run state, discarded on restart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    pub phase: RunPhase,
    /// Ticks survived (time-based, not points)
    pub score: u64,
    pub speed: f64,
    /// Owned by lane-change input
    pub current_lane: Lane,
    /// Spawn order
    pub obstacles: Vec<Obstacle>,
    /// Host timestamp of the last spawn
    pub last_spawn_time: f64,
    next_id: u32,
}

impl Default for RunState {
    fn default() -> Self {
        Self {
            phase: RunPhase::NotStarted,
            score: 0,
            speed: 1.0,
            current_lane: Lane::Center,
            obstacles: Vec::new(),
            last_spawn_time: 0.0,
            next_id: 1,
        }
    }
}

impl RunState {
    /// Fresh run, already running, starting at `now`
    pub fn started(now: f64) -> Self {
        Self {
            phase: RunPhase::Running,
            last_spawn_time: now,
            ..Self::default()
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Score as shown on the HUD
    pub fn display_score(&self) -> u64 {
        self.score / 10
    }

    /// Allocate a new obstacle ID
    fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Append a new obstacle at the top of the track
    pub fn push_obstacle(&mut self, spec: ObstacleSpec, tuning: &Tuning) -> u32 {
        let id = self.next_obstacle_id();
        self.obstacles.push(Obstacle {
            id,
            lane: spec.lane,
            kind: spec.kind,
            position: tuning.obstacle_start,
            near_miss_flagged: false,
        });
        id
    }

    /// Move every obstacle by `3 × speed`, dropping the ones past the player
    pub fn advance_obstacles(&mut self, tuning: &Tuning) {
        let step = tuning.obstacle_step * self.speed;
        for obstacle in &mut self.obstacles {
            obstacle.position += step;
        }
        self.obstacles.retain(|o| o.position <= tuning.travel_bound);
    }

    /// Apply a lane change, returning `(from, to)` when it moved
    pub fn shift_lane(&mut self, shift: LaneShift) -> Option<(Lane, Lane)> {
        let from = self.current_lane;
        let to = from.shifted(shift)?;
        self.current_lane = to;
        Some((from, to))
    }
}
