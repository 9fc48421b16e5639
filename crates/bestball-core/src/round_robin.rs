// Matchup-independent ranking: every manager plays every other manager every
// week, regardless of the real schedule.
//
// Wins are tallied in half-wins (win = 2, tie = 1, loss = 0) so the season
// total can be checked exactly.

use serde::Serialize;
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::model::WeeklyScoreboard;

/// Running round-robin tally over any number of weeks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundRobinTally {
    /// Half-wins per manager, in order of first appearance.
    half_wins: Vec<(String, u64)>,
    weeks: u32,
}

impl RoundRobinTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tally of a single week.
    pub fn for_week(board: &WeeklyScoreboard) -> Self {
        Self::new().accumulate_week(board)
    }

    /// Add one week's pairwise results and return the updated tally.
    pub fn accumulate_week(mut self, board: &WeeklyScoreboard) -> Self {
        self.record_week(board);
        self
    }

    /// Add one week's pairwise results in place.
    pub fn record_week(&mut self, board: &WeeklyScoreboard) {
        let scores: Vec<(&str, f64)> = board.iter().collect();
        let slots: Vec<usize> = scores.iter().map(|(m, _)| self.slot(m)).collect();

        for a in 0..scores.len() {
            for b in (a + 1)..scores.len() {
                let (name_a, score_a) = scores[a];
                let (name_b, score_b) = scores[b];
                if score_a == score_b {
                    debug!(
                        week = board.week,
                        "round-robin tie between {name_a} and {name_b} at {score_a}"
                    );
                    self.half_wins[slots[a]].1 += 1;
                    self.half_wins[slots[b]].1 += 1;
                } else if score_a > score_b {
                    self.half_wins[slots[a]].1 += 2;
                } else {
                    self.half_wins[slots[b]].1 += 2;
                }
            }
        }
        self.weeks += 1;
    }

    /// Fold another tally (e.g. a single week computed elsewhere) into this one.
    pub fn merge(&mut self, other: &RoundRobinTally) {
        for (manager, half) in &other.half_wins {
            let slot = self.slot(manager);
            self.half_wins[slot].1 += half;
        }
        self.weeks += other.weeks;
    }

    fn slot(&mut self, manager: &str) -> usize {
        match self.half_wins.iter().position(|(m, _)| m == manager) {
            Some(i) => i,
            None => {
                self.half_wins.push((manager.to_string(), 0));
                self.half_wins.len() - 1
            }
        }
    }

    /// Accumulated wins for `manager` (ties count half).
    #[cfg(test)]
    pub(crate) fn wins(&self, manager: &str) -> Option<f64> {
        self.half_wins
            .iter()
            .find(|(m, _)| m == manager)
            .map(|(_, h)| *h as f64 / 2.0)
    }

    #[cfg(test)]
    pub(crate) fn total_wins(&self) -> f64 {
        self.total_half_wins() as f64 / 2.0
    }

    fn total_half_wins(&self) -> u64 {
        self.half_wins.iter().map(|(_, h)| h).sum()
    }

    pub fn weeks(&self) -> u32 {
        self.weeks
    }

    /// Check the season total and rank managers.
    ///
    /// With `managers` present every week for `W` weeks, the tally must hold
    /// exactly `managers * (managers - 1) * W / 2` wins; anything else means a
    /// manager was missing from (or doubled in) some week.
    pub fn finish(self, managers: usize) -> Result<RoundRobinStandings> {
        if self.weeks == 0 {
            return Err(CoreError::EmptySeason);
        }
        let n = managers as u64;
        let expected_half = n * n.saturating_sub(1) * u64::from(self.weeks);
        let actual_half = self.total_half_wins();
        if actual_half != expected_half || self.half_wins.len() != managers {
            return Err(CoreError::RankingInvariant {
                expected: expected_half as f64 / 2.0,
                actual: actual_half as f64 / 2.0,
            });
        }

        let max_wins = (n.saturating_sub(1) * u64::from(self.weeks)) as f64;
        let mut entries: Vec<RoundRobinEntry> = self
            .half_wins
            .into_iter()
            .map(|(manager, half)| {
                let wins = half as f64 / 2.0;
                RoundRobinEntry {
                    manager,
                    wins,
                    win_rate: if max_wins > 0.0 { wins / max_wins } else { 0.0 },
                }
            })
            .collect();
        // Stable: equal records keep first-appearance order.
        entries.sort_by(|a, b| b.wins.total_cmp(&a.wins));

        Ok(RoundRobinStandings {
            entries,
            weeks: self.weeks,
            max_wins,
        })
    }
}

/// One manager's season round-robin result.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundRobinEntry {
    pub manager: String,
    pub wins: f64,
    /// `wins / ((managers - 1) * weeks)`.
    pub win_rate: f64,
}

/// Verified and ranked round-robin results, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundRobinStandings {
    entries: Vec<RoundRobinEntry>,
    weeks: u32,
    max_wins: f64,
}

impl RoundRobinStandings {
    pub fn ranking(&self) -> &[RoundRobinEntry] {
        &self.entries
    }

    pub fn get(&self, manager: &str) -> Option<&RoundRobinEntry> {
        self.entries.iter().find(|e| e.manager == manager)
    }

    pub fn weeks(&self) -> u32 {
        self.weeks
    }

    pub fn max_wins(&self) -> f64 {
        self.max_wins
    }
}
