// Season snapshot records consumed and produced by the analysis.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Reported totals and starters' points may differ by rounding only.
pub const POINTS_TOLERANCE: f64 = 1e-2;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// A player and the natural positions they are listed at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    pub positions: Vec<String>,
}

/// Player lookup keyed by player id.
#[derive(Debug, Clone, Default)]
pub struct PlayerTable {
    players: HashMap<String, Player>,
}

impl PlayerTable {
    pub fn new(players: impl IntoIterator<Item = Player>) -> Self {
        Self {
            players: players.into_iter().map(|p| (p.id.clone(), p)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Player> {
        self.players.get(id)
    }
}

/// One roster's result for one week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub roster_id: u32,
    /// Every player on the roster that week, starters and bench.
    pub players: Vec<String>,
    pub players_points: HashMap<String, f64>,
    /// The total the league reported for this roster.
    pub points: f64,
    /// Points of the players who were actually started.
    pub starters_points: Vec<f64>,
}

impl Matchup {
    /// Check that the reported total matches the starters' points.
    pub fn verify_total(&self) -> Result<()> {
        let starters: f64 = self.starters_points.iter().sum();
        if (starters - self.points).abs() >= POINTS_TOLERANCE {
            return Err(CoreError::StarterMismatch {
                roster_id: self.roster_id,
                reported: self.points,
                starters,
            });
        }
        Ok(())
    }
}

/// All matchups of one completed week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekMatchups {
    pub week: u32,
    pub matchups: Vec<Matchup>,
}

/// League-reported standings for one manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub manager: String,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
}

impl SeasonRecord {
    /// Head-to-head win rate with ties counted as half a win. `None` before
    /// any game has been played.
    pub fn win_rate(&self) -> Option<f64> {
        let games = self.wins + self.losses + self.ties;
        if games == 0 {
            return None;
        }
        Some((f64::from(self.wins) + 0.5 * f64::from(self.ties)) / f64::from(games))
    }
}

// ---------------------------------------------------------------------------
// Derived
// ---------------------------------------------------------------------------

/// Manager → points for one week under one scenario.
///
/// Entries keep insertion order; a manager may appear only once.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WeeklyScoreboard {
    pub week: u32,
    scores: Vec<(String, f64)>,
}

impl WeeklyScoreboard {
    pub fn new(week: u32) -> Self {
        Self {
            week,
            scores: Vec::new(),
        }
    }

    /// Build from `(manager, points)` pairs, rejecting duplicates.
    pub fn from_scores<I, S>(week: u32, scores: I) -> Result<Self>
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        let mut board = Self::new(week);
        for (manager, points) in scores {
            board.insert(manager, points)?;
        }
        Ok(board)
    }

    pub fn insert(&mut self, manager: impl Into<String>, points: f64) -> Result<()> {
        let manager = manager.into();
        if self.scores.iter().any(|(m, _)| *m == manager) {
            return Err(CoreError::DuplicateManager {
                week: self.week,
                manager,
            });
        }
        self.scores.push((manager, points));
        Ok(())
    }

    pub fn get(&self, manager: &str) -> Option<f64> {
        self.scores
            .iter()
            .find(|(m, _)| m == manager)
            .map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(m, p)| (m.as_str(), *p))
    }
}

/// One row of the season output table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManagerMetrics {
    pub manager: String,
    /// Head-to-head win rate from league standings.
    pub win_rate: f64,
    /// Matchup-independent win rate of the lineups actually started.
    pub miwr: f64,
    /// Matchup-independent win rate of the best possible lineups.
    pub bb_miwr: f64,
    pub points_for: f64,
    pub points_against: f64,
    pub bb_points_for: f64,
    /// `win_rate - miwr`: positive when the schedule helped.
    pub luck: f64,
    /// `miwr - bb_miwr`: how much lineup setting beat roster strength.
    pub lineup_boost: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matchup(points: f64, starters: &[f64]) -> Matchup {
        Matchup {
            roster_id: 4,
            players: vec![],
            players_points: HashMap::new(),
            points,
            starters_points: starters.to_vec(),
        }
    }

    #[test]
    fn total_within_tolerance_passes() {
        assert!(matchup(100.0, &[60.0, 40.004]).verify_total().is_ok());
    }

    #[test]
    fn total_outside_tolerance_fails() {
        let err = matchup(100.0, &[60.0, 39.5]).verify_total().unwrap_err();
        assert!(matches!(err, CoreError::StarterMismatch { roster_id: 4, .. }));
    }

    #[test]
    fn win_rate_counts_ties_as_half() {
        let record = SeasonRecord {
            manager: "a".into(),
            wins: 5,
            losses: 4,
            ties: 1,
            points_for: 0.0,
            points_against: 0.0,
        };
        assert!((record.win_rate().unwrap() - 0.55).abs() < 1e-12);
    }

    #[test]
    fn win_rate_without_games_is_none() {
        let record = SeasonRecord {
            manager: "a".into(),
            wins: 0,
            losses: 0,
            ties: 0,
            points_for: 0.0,
            points_against: 0.0,
        };
        assert!(record.win_rate().is_none());
    }

    #[test]
    fn scoreboard_rejects_duplicate_manager() {
        let err = WeeklyScoreboard::from_scores(3, [("a", 1.0), ("b", 2.0), ("a", 3.0)])
            .unwrap_err();
        assert_eq!(
            err,
            CoreError::DuplicateManager {
                week: 3,
                manager: "a".into()
            }
        );
    }

    #[test]
    fn scoreboard_keeps_insertion_order() {
        let board = WeeklyScoreboard::from_scores(1, [("c", 1.0), ("a", 2.0)]).unwrap();
        let names: Vec<&str> = board.iter().map(|(m, _)| m).collect();
        assert_eq!(names, vec!["c", "a"]);
        assert_eq!(board.get("a"), Some(2.0));
        assert_eq!(board.get("z"), None);
    }
}
