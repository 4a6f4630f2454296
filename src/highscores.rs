//! High score leaderboard
//!
//! Lives only as long as the process; nothing is written to disk.

use serde::{Deserialize, Serialize};

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Difficulty stage reached
    pub stage: usize,
    /// Length of the run in ticks
    pub ticks: u64,
}

/// High score leaderboard, best first
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
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
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Add a finished run; returns the rank achieved (1-indexed)
    pub fn add_score(&mut self, score: u64, stage: usize, ticks: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            stage,
            ticks,
        };

        // Ties rank below the existing entry
        let pos = self.entries.iter().position(|e| score > e.score);
        let rank = match pos {
            Some(i) => {
                self.entries.insert(i, entry);
                i + 1
            }
            None => {
                self.entries.push(entry);
                self.entries.len()
            }
        };

        self.entries.truncate(MAX_HIGH_SCORES);

        Some(rank)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Best score so far (0 when empty)
    pub fn top_score(&self) -> u64 {
        self.entries.first().map(|e| e.score).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranks_descending() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(100, 1, 600), Some(1));
        assert_eq!(scores.add_score(300, 2, 1200), Some(1));
        assert_eq!(scores.add_score(200, 1, 900), Some(2));
        assert_eq!(scores.add_score(200, 1, 950), Some(3));

        let order: Vec<u64> = scores.entries.iter().map(|e| e.score).collect();
        assert_eq!(order, vec![300, 200, 200, 100]);
        assert_eq!(scores.top_score(), 300);
    }

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(0, 0, 10), None);
        assert!(scores.is_empty());
        assert_eq!(scores.top_score(), 0);
    }

    #[test]
    fn test_truncates_to_max() {
        let mut scores = HighScores::new();
        for score in 1..=15 {
            scores.add_score(score, 0, score * 10);
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(6));
        assert!(!scores.qualifies(5));
        assert!(scores.qualifies(7));
    }
}
