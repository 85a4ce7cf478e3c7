//! Collision detection against the player band
//!
//! The player and obstacles share a lane, so only the vertical extents have
//! to overlap. Obstacles are scanned in spawn order and the first hit wins.

use super::state::{Lane, Obstacle, ObstacleKind};
use crate::tuning::Tuning;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Index into the obstacle sequence
    pub index: usize,
    pub obstacle_id: u32,
    pub lane: Lane,
    pub kind: ObstacleKind,
}

/// Open-interval overlap of `[top, bottom]` with the player band
#[inline]
pub fn overlaps_player(top: f64, bottom: f64, tuning: &Tuning) -> bool {
    tuning.player_top < bottom && tuning.player_bottom > top
}

/// First obstacle in `lane` overlapping the player band
pub fn find_collision(obstacles: &[Obstacle], lane: Lane, tuning: &Tuning) -> Option<CollisionResult> {
    obstacles
        .iter()
        .enumerate()
        .find(|(_, o)| o.lane == lane && overlaps_player(o.top(), o.bottom(tuning), tuning))
        .map(|(index, o)| CollisionResult {
            index,
            obstacle_id: o.id,
            lane: o.lane,
            kind: o.kind,
        })
}

/// Whether an obstacle in `lane` is about to hit the player
///
/// Used to tag slow lane changes as last-moment dodges.
pub fn imminent_in_lane(obstacles: &[Obstacle], lane: Lane, tuning: &Tuning) -> bool {
    obstacles.iter().any(|o| {
        o.lane == lane
            && o.bottom(tuning) > tuning.player_bottom - tuning.last_moment_window
            && o.top() < tuning.player_bottom
    })
}

/// Obstacle in another lane whose top just passed the player
pub fn is_near_miss(obstacle: &Obstacle, current_lane: Lane, tuning: &Tuning) -> bool {
    obstacle.lane != current_lane
        && obstacle.top() > tuning.player_bottom
        && obstacle.top() < tuning.player_bottom + tuning.near_miss_window
}
