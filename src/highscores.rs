//! Session leaderboard
//!
//! Kept in memory only; the top 10 runs of the current session.

use serde::{Deserialize, Serialize};

/// Maximum number of runs to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// End-of-run summary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    /// Score as displayed (`ticks / 10`)
    pub score: u64,
    /// Session-wide mistakes at the end of this run
    pub total_mistakes: u32,
    /// Ticks survived
    pub ticks: u64,
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<RunReport>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Add a finished run (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_report(&mut self, report: RunReport) -> Option<usize> {
        if !self.qualifies(report.score) {
            return None;
        }

        // Sorted descending by score; ties keep the earlier run ahead
        let pos = self.entries.iter().position(|e| report.score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, report);
                i + 1
            }
            None => {
                self.entries.push(report);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(score: u64) -> RunReport {
        RunReport {
            score,
            total_mistakes: 1,
            ticks: score * 10,
        }
    }

    #[test]
    fn test_zero_score_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_report(report(0)), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_ranks_sorted_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_report(report(10)), Some(1));
        assert_eq!(scores.add_report(report(30)), Some(1));
        assert_eq!(scores.add_report(report(20)), Some(2));
        assert_eq!(scores.add_report(report(20)), Some(3));
        assert_eq!(scores.top_score(), Some(30));
        let ordered: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(ordered, vec![30, 20, 20, 10]);
    }

    #[test]
    fn test_board_is_capped() {
        let mut scores = HighScores::new();
        for s in 1..=MAX_HIGH_SCORES as u64 {
            scores.add_report(report(s * 10));
        }
        assert!(!scores.qualifies(5));
        assert_eq!(scores.potential_rank(15), Some(10));
        assert_eq!(scores.add_report(report(1000)), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(20));
    }
}
