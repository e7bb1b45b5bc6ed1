//! High score leaderboard
//!
//! Fed by game over events; the embedder decides where the JSON lives.
//! Keeps the top 5 distinct distances plus the best coin haul.

use serde::{Deserialize, Serialize};

use crate::error::SimError;
use crate::sim::GameOverEvent;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 5;

/// A single high score entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    /// Distance flown in meters
    pub distance_m: u32,
    /// Coins collected on that run
    pub coins: u32,
}

/// High score leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HighScores {
    /// Sorted by distance, longest first
    pub entries: Vec<HighScoreEntry>,
    /// Most coins collected in a single run
    #[serde(default)]
    pub most_coins: u32,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a distance earns a leaderboard spot. A distance already on
    /// the board does not take a second slot.
    pub fn qualifies(&self, distance_m: u32) -> bool {
        if self.entries.iter().any(|e| e.distance_m == distance_m) {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Must strictly beat the lowest entry
        self.entries.last().is_none_or(|e| distance_m > e.distance_m)
    }

    /// Get the rank a distance would achieve (1-indexed, None if it doesn't qualify)
    pub fn potential_rank(&self, distance_m: u32) -> Option<usize> {
        if !self.qualifies(distance_m) {
            return None;
        }
        let rank = self.entries.iter().position(|e| distance_m > e.distance_m);
        Some(rank.unwrap_or(self.entries.len()) + 1)
    }

    /// Record a finished run. Returns the distance rank achieved (1-indexed)
    /// or None if it didn't make the board. The coin record is updated either way.
    pub fn record(&mut self, event: &GameOverEvent) -> Option<usize> {
        if event.coins_collected > self.most_coins {
            self.most_coins = event.coins_collected;
            log::info!("New coin record: {}", self.most_coins);
        }

        let rank = self.potential_rank(event.distance_m)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                distance_m: event.distance_m,
                coins: event.coins_collected,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        log::info!("High score #{}: {} m", rank, event.distance_m);
        Some(rank)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the best distance (if any)
    pub fn top_distance(&self) -> Option<u32> {
        self.entries.first().map(|e| e.distance_m)
    }

    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let mut scores: HighScores = serde_json::from_str(json)?;
        // Stored data may have been edited by hand
        scores.entries.sort_by(|a, b| b.distance_m.cmp(&a.distance_m));
        scores.entries.dedup_by_key(|e| e.distance_m);
        scores.entries.truncate(MAX_HIGH_SCORES);
        log::info!("Loaded {} high scores", scores.entries.len());
        Ok(scores)
    }

    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(distance_m: u32, coins_collected: u32) -> GameOverEvent {
        GameOverEvent {
            distance_m,
            coins_collected,
        }
    }

    #[test]
    fn test_board_keeps_top_five_descending() {
        let mut scores = HighScores::new();
        for d in [120, 40, 300, 75, 10] {
            assert!(scores.record(&run(d, 0)).is_some());
        }
        let distances: Vec<_> = scores.entries.iter().map(|e| e.distance_m).collect();
        assert_eq!(distances, vec![300, 120, 75, 40, 10]);

        assert_eq!(scores.record(&run(200, 0)), Some(2));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().unwrap().distance_m, 40);
        assert_eq!(scores.top_distance(), Some(300));
    }

    #[test]
    fn test_ties_with_the_lowest_do_not_qualify() {
        let mut scores = HighScores::new();
        for d in [50, 60, 70, 80, 90] {
            scores.record(&run(d, 0));
        }
        assert!(!scores.qualifies(50));
        assert_eq!(scores.record(&run(50, 0)), None);
        assert!(scores.qualifies(51));
    }

    #[test]
    fn test_equal_distances_share_one_slot() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(&run(120, 1)), Some(1));
        assert!(!scores.qualifies(120));
        assert_eq!(scores.potential_rank(120), None);
        // Same distance again: no new slot, but the coin record still counts
        assert_eq!(scores.record(&run(120, 9)), None);
        assert_eq!(scores.entries.len(), 1);
        assert_eq!(scores.entries[0].coins, 1);
        assert_eq!(scores.most_coins, 9);

        for d in [40, 40, 300, 75, 10, 75] {
            scores.record(&run(d, 0));
        }
        let distances: Vec<_> = scores.entries.iter().map(|e| e.distance_m).collect();
        assert_eq!(distances, vec![300, 120, 75, 40, 10]);
    }

    #[test]
    fn test_loading_collapses_duplicate_distances() {
        let json = r#"{"entries":[{"distance_m":50,"coins":1},{"distance_m":50,"coins":4},
            {"distance_m":80,"coins":0}]}"#;
        let scores = HighScores::from_json(json).unwrap();
        let distances: Vec<_> = scores.entries.iter().map(|e| e.distance_m).collect();
        assert_eq!(distances, vec![80, 50]);
    }

    #[test]
    fn test_zero_distance_fills_an_empty_board() {
        let mut scores = HighScores::new();
        assert_eq!(scores.record(&run(0, 0)), Some(1));
    }

    #[test]
    fn test_coin_record_tracks_every_run() {
        let mut scores = HighScores::new();
        for d in [500, 400, 300, 200, 100] {
            scores.record(&run(d, 1));
        }
        // Too short for the board, but a coin record
        assert_eq!(scores.record(&run(5, 12)), None);
        assert_eq!(scores.most_coins, 12);
        scores.record(&run(600, 3));
        assert_eq!(scores.most_coins, 12);
    }

    #[test]
    fn test_json_roundtrip_sorts_hand_edits() {
        let json = r#"{"entries":[{"distance_m":5,"coins":0},{"distance_m":90,"coins":2}]}"#;
        let scores = HighScores::from_json(json).unwrap();
        assert_eq!(scores.top_distance(), Some(90));
        assert_eq!(scores.most_coins, 0);

        let again = HighScores::from_json(&scores.to_json().unwrap()).unwrap();
        assert_eq!(again, scores);
        assert!(HighScores::from_json("not json").is_err());
    }
}
