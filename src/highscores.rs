//! High score leaderboard
//!
//! Kept per controller for the session, tracks the top 10 finished rounds.

use serde::{Deserialize, Serialize};

use crate::sim::Outcome;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Final score of the round
    pub score: u64,
    /// Which round of the session (1-indexed)
    pub round: u32,
    /// How the round ended
    pub outcome: Option<Outcome>,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
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
        // Check if score beats the lowest entry
        self.entries.last().is_none_or(|e| score > e.score)
    }

    /// Add a finished round to the leaderboard (if it qualifies)
    /// Returns the rank achieved (1-indexed) or None if didn't qualify
    pub fn add_score(&mut self, score: u64, round: u32, outcome: Option<Outcome>) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = HighScoreEntry {
            score,
            round,
            outcome,
        };

        // Ties rank below earlier rounds
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

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_never_qualifies() {
        let mut scores = HighScores::new();
        assert!(!scores.qualifies(0));
        assert_eq!(scores.add_score(0, 1, Some(Outcome::Lost)), None);
        assert!(scores.is_empty());
    }

    #[test]
    fn test_sorted_descending_with_ranks() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(30, 1, None), Some(1));
        assert_eq!(scores.add_score(50, 2, None), Some(1));
        assert_eq!(scores.add_score(40, 3, None), Some(2));
        assert_eq!(scores.add_score(40, 4, None), Some(3));

        let ordered: Vec<(u64, u32)> = scores.entries.iter().map(|e| (e.score, e.round)).collect();
        assert_eq!(ordered, vec![(50, 2), (40, 3), (40, 4), (30, 1)]);
        assert_eq!(scores.top_score(), Some(50));
    }

    #[test]
    fn test_truncates_to_max() {
        let mut scores = HighScores::new();
        for round in 1..=12 {
            scores.add_score(u64::from(round) * 10, round, Some(Outcome::Lost));
        }
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(30));

        assert!(!scores.qualifies(30));
        assert_eq!(scores.add_score(35, 13, None), Some(10));
    }
}
