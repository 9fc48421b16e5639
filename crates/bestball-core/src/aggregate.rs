// Season join: standings + round-robin results + best-ball totals → metrics.

use std::collections::HashMap;

use tracing::warn;

use crate::error::{CoreError, Result};
use crate::model::{ManagerMetrics, SeasonRecord};
use crate::round_robin::RoundRobinStandings;

/// Joins the per-manager season inputs into the output table.
#[derive(Debug, Clone, Copy)]
pub struct SeasonAggregator<'a> {
    pub standings: &'a [SeasonRecord],
    pub actual: &'a RoundRobinStandings,
    pub best_ball: &'a RoundRobinStandings,
    /// Season best-ball points per manager.
    pub bb_points_for: &'a HashMap<String, f64>,
}

impl SeasonAggregator<'_> {
    /// One row per manager, ordered by the actual round-robin ranking.
    ///
    /// Every manager must appear in all four inputs.
    pub fn metrics(&self) -> Result<Vec<ManagerMetrics>> {
        let records: HashMap<&str, &SeasonRecord> = self
            .standings
            .iter()
            .map(|r| (r.manager.as_str(), r))
            .collect();

        for record in self.standings {
            if self.actual.get(&record.manager).is_none() {
                return Err(missing(&record.manager, "the actual round robin"));
            }
        }

        self.actual
            .ranking()
            .iter()
            .map(|entry| {
                let manager = entry.manager.as_str();
                let record = records
                    .get(manager)
                    .ok_or_else(|| missing(manager, "the league standings"))?;
                let bb = self
                    .best_ball
                    .get(manager)
                    .ok_or_else(|| missing(manager, "the best-ball round robin"))?;
                let bb_points_for = *self
                    .bb_points_for
                    .get(manager)
                    .ok_or_else(|| missing(manager, "the best-ball points totals"))?;

                let win_rate = record.win_rate().unwrap_or_else(|| {
                    warn!(manager, "no games in standings, win rate taken as 0");
                    0.0
                });

                Ok(ManagerMetrics {
                    manager: manager.to_string(),
                    win_rate,
                    miwr: entry.win_rate,
                    bb_miwr: bb.win_rate,
                    points_for: record.points_for,
                    points_against: record.points_against,
                    bb_points_for,
                    luck: win_rate - entry.win_rate,
                    lineup_boost: entry.win_rate - bb.win_rate,
                })
            })
            .collect()
    }
}

fn missing(manager: &str, source_name: &'static str) -> CoreError {
    CoreError::MissingManager {
        manager: manager.to_string(),
        source_name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WeeklyScoreboard;
    use crate::round_robin::RoundRobinTally;

    fn record(manager: &str, wins: u32, losses: u32, pf: f64) -> SeasonRecord {
        SeasonRecord {
            manager: manager.into(),
            wins,
            losses,
            ties: 0,
            points_for: pf,
            points_against: 100.0,
        }
    }

    fn standings_of(scores: &[(&str, f64)]) -> RoundRobinStandings {
        let board = WeeklyScoreboard::from_scores(1, scores.iter().copied()).unwrap();
        RoundRobinTally::for_week(&board).finish(scores.len()).unwrap()
    }

    fn bb_points(entries: &[(&str, f64)]) -> HashMap<String, f64> {
        entries.iter().map(|&(m, p)| (m.to_string(), p)).collect()
    }

    #[test]
    fn luck_and_boost_follow_from_the_join() {
        let standings = vec![record("a", 1, 0, 120.0), record("b", 0, 1, 90.0)];
        let actual = standings_of(&[("a", 120.0), ("b", 90.0)]);
        let best_ball = standings_of(&[("a", 121.0), ("b", 140.0)]);
        let totals = bb_points(&[("a", 121.0), ("b", 140.0)]);

        let rows = SeasonAggregator {
            standings: &standings,
            actual: &actual,
            best_ball: &best_ball,
            bb_points_for: &totals,
        }
        .metrics()
        .unwrap();

        assert_eq!(rows.len(), 2);
        let a = &rows[0];
        assert_eq!(a.manager, "a");
        assert_eq!(a.win_rate, 1.0);
        assert_eq!(a.miwr, 1.0);
        assert_eq!(a.bb_miwr, 0.0);
        assert_eq!(a.luck, 0.0);
        assert_eq!(a.lineup_boost, 1.0);
        assert_eq!(a.bb_points_for, 121.0);
        let b = &rows[1];
        assert_eq!(b.lineup_boost, -1.0);
        assert_eq!(b.points_for, 90.0);
    }

    #[test]
    fn rows_follow_actual_ranking() {
        let standings = vec![record("a", 0, 1, 80.0), record("b", 1, 0, 95.0)];
        let actual = standings_of(&[("a", 80.0), ("b", 95.0)]);
        let best_ball = standings_of(&[("a", 99.0), ("b", 98.0)]);
        let totals = bb_points(&[("a", 99.0), ("b", 98.0)]);
        let rows = SeasonAggregator {
            standings: &standings,
            actual: &actual,
            best_ball: &best_ball,
            bb_points_for: &totals,
        }
        .metrics()
        .unwrap();
        let order: Vec<&str> = rows.iter().map(|r| r.manager.as_str()).collect();
        assert_eq!(order, vec!["b", "a"]);
    }

    #[test]
    fn manager_missing_from_standings_is_an_error() {
        let standings = vec![record("a", 1, 0, 1.0)];
        let actual = standings_of(&[("a", 2.0), ("b", 1.0)]);
        let totals = bb_points(&[("a", 2.0), ("b", 1.0)]);
        let err = SeasonAggregator {
            standings: &standings,
            actual: &actual,
            best_ball: &actual,
            bb_points_for: &totals,
        }
        .metrics()
        .unwrap_err();
        assert_eq!(
            err,
            CoreError::MissingManager {
                manager: "b".into(),
                source_name: "the league standings"
            }
        );
    }

    #[test]
    fn manager_missing_from_round_robin_is_an_error() {
        let standings = vec![record("a", 1, 0, 1.0), record("z", 0, 1, 1.0)];
        let actual = standings_of(&[("a", 2.0), ("b", 1.0)]);
        let totals = bb_points(&[("a", 2.0), ("b", 1.0)]);
        let err = SeasonAggregator {
            standings: &standings,
            actual: &actual,
            best_ball: &actual,
            bb_points_for: &totals,
        }
        .metrics()
        .unwrap_err();
        assert!(matches!(err, CoreError::MissingManager { ref manager, .. } if manager == "z"));
    }

    #[test]
    fn standings_without_games_rate_zero() {
        let mut idle = record("a", 0, 0, 0.0);
        idle.points_against = 0.0;
        let standings = vec![idle, record("b", 0, 0, 0.0)];
        let actual = standings_of(&[("a", 3.0), ("b", 1.0)]);
        let totals = bb_points(&[("a", 3.0), ("b", 1.0)]);
        let rows = SeasonAggregator {
            standings: &standings,
            actual: &actual,
            best_ball: &actual,
            bb_points_for: &totals,
        }
        .metrics()
        .unwrap();
        assert_eq!(rows[0].win_rate, 0.0);
        assert_eq!(rows[0].luck, -1.0);
    }
}
