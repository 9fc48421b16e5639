// Season pipeline: per-week scoring in parallel, then an ordered fold into
// the round-robin tallies and the final join.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::aggregate::SeasonAggregator;
use crate::eligibility::EligibilityRules;
use crate::error::{CoreError, Result};
use crate::lineup::solver::{AssignmentSolver, HungarianSolver};
use crate::lineup::{Lineup, LineupOptimizer};
use crate::managers::ManagerDirectory;
use crate::model::{ManagerMetrics, PlayerTable, SeasonRecord, WeekMatchups, WeeklyScoreboard};
use crate::roster::RosterSlotSpec;
use crate::round_robin::{RoundRobinStandings, RoundRobinTally};

/// Everything the analysis needs about one season, already fetched.
#[derive(Debug, Clone)]
pub struct SeasonInput {
    pub players: PlayerTable,
    /// Completed weeks, in week order.
    pub weeks: Vec<WeekMatchups>,
    pub standings: Vec<SeasonRecord>,
    pub directory: ManagerDirectory,
}

/// Actual and best-ball scoreboards for one week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekScores {
    pub actual: WeeklyScoreboard,
    pub best_ball: WeeklyScoreboard,
    /// The lineup behind each best-ball score, in matchup order.
    pub lineups: Vec<(String, Lineup)>,
}

/// A manager's weekly points across the season.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManagerSeries {
    pub manager: String,
    pub actual: Vec<f64>,
    pub best_ball: Vec<f64>,
}

/// Result of a season analysis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonReport {
    pub weeks: Vec<u32>,
    /// One row per manager, ordered by the actual round-robin ranking.
    pub metrics: Vec<ManagerMetrics>,
    pub actual: RoundRobinStandings,
    pub best_ball: RoundRobinStandings,
    /// Weekly points per manager, in `metrics` order.
    pub series: Vec<ManagerSeries>,
}

pub struct SeasonAnalyzer<S = HungarianSolver> {
    optimizer: LineupOptimizer<S>,
}

impl SeasonAnalyzer<HungarianSolver> {
    pub fn new(rules: EligibilityRules, slots: RosterSlotSpec) -> Self {
        Self {
            optimizer: LineupOptimizer::new(rules, slots),
        }
    }
}

impl<S: AssignmentSolver> SeasonAnalyzer<S> {
    /// Score one week: every matchup's reported and best-ball points, keyed
    /// by manager name.
    pub fn score_week(
        &self,
        week: &WeekMatchups,
        players: &PlayerTable,
        directory: &ManagerDirectory,
    ) -> Result<WeekScores> {
        let rows = week
            .matchups
            .par_iter()
            .map(|m| {
                let lineup = self.optimizer.optimal_lineup(m, players)?;
                Ok((directory.manager_name(m.roster_id), m.points, lineup))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut actual = WeeklyScoreboard::new(week.week);
        let mut best_ball = WeeklyScoreboard::new(week.week);
        let mut lineups = Vec::with_capacity(rows.len());
        for (manager, points, lineup) in rows {
            let starters: Vec<String> = lineup
                .starters
                .iter()
                .map(|e| format!("{}={}", e.slot, e.player_id))
                .collect();
            debug!(
                week = week.week,
                %manager,
                points,
                best = lineup.points,
                "week scored, best lineup [{}]",
                starters.join(", ")
            );
            actual.insert(manager.clone(), points)?;
            best_ball.insert(manager.clone(), lineup.points)?;
            lineups.push((manager, lineup));
        }
        info!(week = week.week, matchups = week.matchups.len(), "processed week");
        Ok(WeekScores {
            actual,
            best_ball,
            lineups,
        })
    }

    /// Run the full season analysis.
    pub fn analyze(&self, input: &SeasonInput) -> Result<SeasonReport> {
        if input.weeks.is_empty() {
            return Err(CoreError::EmptySeason);
        }

        let scored = input
            .weeks
            .par_iter()
            .map(|w| self.score_week(w, &input.players, &input.directory))
            .collect::<Result<Vec<_>>>()?;

        let mut actual_tally = RoundRobinTally::new();
        let mut bb_tally = RoundRobinTally::new();
        let mut bb_points_for: HashMap<String, f64> = HashMap::new();
        for week in &scored {
            actual_tally.merge(&RoundRobinTally::for_week(&week.actual));
            bb_tally.merge(&RoundRobinTally::for_week(&week.best_ball));
            for (manager, points) in week.best_ball.iter() {
                *bb_points_for.entry(manager.to_string()).or_default() += points;
            }
        }

        let managers = input.standings.len();
        let actual = actual_tally.finish(managers)?;
        let best_ball = bb_tally.finish(managers)?;

        let metrics = SeasonAggregator {
            standings: &input.standings,
            actual: &actual,
            best_ball: &best_ball,
            bb_points_for: &bb_points_for,
        }
        .metrics()?;

        let series = metrics
            .iter()
            .map(|row| ManagerSeries {
                manager: row.manager.clone(),
                actual: scored
                    .iter()
                    .filter_map(|w| w.actual.get(&row.manager))
                    .collect(),
                best_ball: scored
                    .iter()
                    .filter_map(|w| w.best_ball.get(&row.manager))
                    .collect(),
            })
            .collect();

        info!(weeks = scored.len(), managers, "season analysis complete");
        Ok(SeasonReport {
            weeks: input.weeks.iter().map(|w| w.week).collect(),
            metrics,
            actual,
            best_ball,
            series,
        })
    }
}
