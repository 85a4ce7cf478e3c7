//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied timestamps only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod events;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod tracker;

pub use collision::{CollisionResult, find_collision};
pub use events::{Advisory, EventInjector, MessageCategory, PerturbationKind};
pub use spawner::{select_kind, select_lane, spawn, spawn_interval};
pub use state::{Lane, LaneShift, Obstacle, ObstacleKind, ObstacleSpec, RunPhase, RunState};
pub use tick::{Session, TickInput, TickOutcome};
pub use tracker::{HeuristicTracker, LaneHold, SpawnRecord};
