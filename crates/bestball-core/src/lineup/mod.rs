// Best-ball lineup optimization: the most points a roster could have started.

pub mod solver;

use serde::Serialize;
use tracing::debug;

use crate::eligibility::EligibilityRules;
use crate::error::{CoreError, Result};
use crate::model::{Matchup, PlayerTable};
use crate::roster::RosterSlotSpec;

use self::solver::{AssignmentProblem, AssignmentSolver, HungarianSolver};

/// Points are solved as integer thousandths of a point.
pub const POINT_SCALE: f64 = 1000.0;

/// A player placed in a starting slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineupEntry {
    pub player_id: String,
    pub slot: String,
    pub points: f64,
}

/// An optimal starting lineup and its total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Lineup {
    pub starters: Vec<LineupEntry>,
    pub points: f64,
}

/// Finds the point-maximizing legal lineup for a matchup.
pub struct LineupOptimizer<S = HungarianSolver> {
    rules: EligibilityRules,
    slots: RosterSlotSpec,
    solver: S,
}

impl LineupOptimizer<HungarianSolver> {
    pub fn new(rules: EligibilityRules, slots: RosterSlotSpec) -> Self {
        Self::with_solver(rules, slots, HungarianSolver)
    }
}

impl<S: AssignmentSolver> LineupOptimizer<S> {
    pub fn with_solver(rules: EligibilityRules, slots: RosterSlotSpec, solver: S) -> Self {
        Self {
            rules,
            slots,
            solver,
        }
    }

    /// Best-ball score for `matchup`.
    pub fn optimal_lineup_points(&self, matchup: &Matchup, players: &PlayerTable) -> Result<f64> {
        self.optimal_lineup(matchup, players).map(|l| l.points)
    }

    /// Best-ball lineup for `matchup`.
    ///
    /// Fails if the matchup's reported total disagrees with its starters,
    /// if a listed player is unknown or has no points, or if the solver
    /// cannot certify its answer.
    pub fn optimal_lineup(&self, matchup: &Matchup, players: &PlayerTable) -> Result<Lineup> {
        matchup.verify_total()?;

        let labels = self.slots.labels();
        let mut points = Vec::with_capacity(matchup.players.len());
        let mut eligible = Vec::with_capacity(matchup.players.len());

        for player_id in &matchup.players {
            let player = players
                .get(player_id)
                .ok_or_else(|| CoreError::UnknownPlayer {
                    roster_id: matchup.roster_id,
                    player_id: player_id.clone(),
                })?;
            let scored = *matchup.players_points.get(player_id).ok_or_else(|| {
                CoreError::MissingPoints {
                    roster_id: matchup.roster_id,
                    player_id: player_id.clone(),
                }
            })?;

            let allowed = self.rules.allowed_slots(&labels, &player.positions)?;
            let kinds: Vec<usize> = allowed
                .iter()
                .filter_map(|label| labels.iter().position(|l| l == label))
                .collect();

            points.push(scored);
            eligible.push(kinds);
        }

        let problem = AssignmentProblem {
            weights: points.iter().map(|p| scale(*p)).collect(),
            eligible,
            capacities: self.slots.slots().iter().map(|s| s.count).collect(),
        };
        let assignment = self.solver.solve(&problem)?;
        problem.certify(&assignment)?;

        let mut starters: Vec<LineupEntry> = assignment
            .pairs
            .iter()
            .map(|&(item, kind)| LineupEntry {
                player_id: matchup.players[item].clone(),
                slot: labels[kind].to_string(),
                points: points[item],
            })
            .collect();
        starters.sort_by_key(|e| labels.iter().position(|l| *l == e.slot));

        let total = assignment.objective as f64 / POINT_SCALE;
        debug!(
            roster_id = matchup.roster_id,
            actual = matchup.points,
            best = total,
            "optimal lineup solved"
        );
        Ok(Lineup {
            starters,
            points: total,
        })
    }
}

fn scale(points: f64) -> i64 {
    (points * POINT_SCALE).round() as i64
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use proptest::prelude::*;

    use super::solver::tests::ExhaustiveSolver;
    use super::*;
    use crate::model::Player;

    fn player(id: &str, positions: &[&str]) -> Player {
        Player {
            id: id.into(),
            positions: positions.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Matchup where every listed player's points are given and the first
    /// `started` players are the real starters.
    fn matchup(scores: &[(&str, f64)], started: usize) -> Matchup {
        let starters_points: Vec<f64> = scores.iter().take(started).map(|s| s.1).collect();
        Matchup {
            roster_id: 1,
            players: scores.iter().map(|s| s.0.to_string()).collect(),
            players_points: scores.iter().map(|&(id, p)| (id.to_string(), p)).collect(),
            points: starters_points.iter().sum(),
            starters_points,
        }
    }

    fn optimizer(positions: &[&str]) -> LineupOptimizer {
        let rules = EligibilityRules::default();
        let slots = RosterSlotSpec::from_positions(positions, &rules).unwrap();
        LineupOptimizer::new(rules, slots)
    }

    fn table() -> PlayerTable {
        PlayerTable::new([
            player("qb1", &["QB"]),
            player("qb2", &["QB"]),
            player("rb1", &["RB"]),
            player("rb2", &["RB"]),
            player("rb3", &["RB"]),
            player("wr1", &["WR"]),
            player("wr2", &["WR"]),
            player("wr3", &["WR"]),
            player("te1", &["TE"]),
            player("k1", &["K"]),
            player("dst", &["DEF"]),
            player("hyb", &["RB", "WR"]),
        ])
    }

    #[test]
    fn flex_takes_best_eligible_bench_player() {
        let opt = optimizer(&["QB", "FLEX"]);
        let m = matchup(&[("qb1", 20.0), ("rb2", 8.0), ("wr1", 12.0)], 2);
        assert_eq!(m.points, 28.0);
        let lineup = opt.optimal_lineup(&m, &table()).unwrap();
        assert!((lineup.points - 32.0).abs() < 1e-9);
        let ids: Vec<&str> = lineup.starters.iter().map(|e| e.player_id.as_str()).collect();
        assert_eq!(ids, vec!["qb1", "wr1"]);
    }

    #[test]
    fn starters_are_listed_in_slot_order() {
        let opt = optimizer(&["QB", "RB", "WR", "FLEX", "BN", "BN"]);
        let m = matchup(
            &[("wr1", 10.0), ("rb1", 9.0), ("qb1", 18.0), ("rb2", 7.5), ("wr2", 3.0)],
            4,
        );
        let lineup = opt.optimal_lineup(&m, &table()).unwrap();
        let slots: Vec<&str> = lineup.starters.iter().map(|e| e.slot.as_str()).collect();
        assert_eq!(slots, vec!["QB", "RB", "WR", "FLEX"]);
        assert!((lineup.points - 44.5).abs() < 1e-9);
    }

    #[test]
    fn full_league_lineup() {
        let opt = optimizer(&[
            "QB", "RB", "RB", "WR", "WR", "TE", "FLEX", "K", "DEF", "BN", "BN", "BN",
        ]);
        let m = matchup(
            &[
                ("qb1", 22.4),
                ("rb1", 14.1),
                ("rb2", 3.2),
                ("wr1", 9.9),
                ("wr2", 11.0),
                ("te1", 6.5),
                ("hyb", 4.0),
                ("k1", 8.0),
                ("dst", -2.0),
                ("qb2", 30.0),
                ("rb3", 12.6),
                ("wr3", 0.0),
            ],
            9,
        );
        // qb2 30 + rb1 14.1 + rb3 12.6 + wr2 11 + wr1 9.9 + te1 6.5
        // + FLEX hyb 4.0 + k1 8. DEF stays empty rather than take -2.
        let best = opt.optimal_lineup_points(&m, &table()).unwrap();
        assert!((best - 96.1).abs() < 1e-9, "got {best}");
        assert!(best >= m.points);
    }

    #[test]
    fn reported_total_mismatch_is_data_error() {
        let opt = optimizer(&["QB"]);
        let mut m = matchup(&[("qb1", 20.0)], 1);
        m.points = 25.0;
        let err = opt.optimal_lineup_points(&m, &table()).unwrap_err();
        assert!(matches!(err, CoreError::StarterMismatch { .. }));
    }

    #[test]
    fn unknown_player_is_data_error() {
        let opt = optimizer(&["QB"]);
        let m = matchup(&[("ghost", 20.0)], 1);
        let err = opt.optimal_lineup_points(&m, &table()).unwrap_err();
        assert_eq!(
            err,
            CoreError::UnknownPlayer {
                roster_id: 1,
                player_id: "ghost".into()
            }
        );
    }

    #[test]
    fn missing_points_is_data_error() {
        let opt = optimizer(&["QB"]);
        let mut m = matchup(&[("qb1", 20.0)], 1);
        m.players.push("qb2".into());
        let err = opt.optimal_lineup_points(&m, &table()).unwrap_err();
        assert!(matches!(err, CoreError::MissingPoints { .. }));
    }

    #[test]
    fn empty_roster_scores_zero() {
        let opt = optimizer(&["QB", "BN"]);
        let m = Matchup {
            roster_id: 9,
            players: vec![],
            players_points: HashMap::new(),
            points: 0.0,
            starters_points: vec![],
        };
        assert_eq!(opt.optimal_lineup_points(&m, &table()).unwrap(), 0.0);
    }

    #[test]
    fn agrees_with_exhaustive_solver() {
        let rules = EligibilityRules::default();
        let slots =
            RosterSlotSpec::from_positions(&["RB", "WR", "FLEX", "WRRB_FLEX"], &rules).unwrap();
        let fast = LineupOptimizer::new(rules.clone(), slots.clone());
        let slow = LineupOptimizer::with_solver(rules, slots, ExhaustiveSolver);
        let m = matchup(
            &[
                ("rb1", 11.0),
                ("wr1", 13.0),
                ("hyb", 15.0),
                ("rb2", 12.0),
                ("te1", 9.0),
                ("wr2", 12.5),
            ],
            4,
        );
        let a = fast.optimal_lineup_points(&m, &table()).unwrap();
        let b = slow.optimal_lineup_points(&m, &table()).unwrap();
        assert_eq!(a, b);
        assert!((a - 52.5).abs() < 1e-9);
    }

    const POOL: &[&str] = &["qb1", "qb2", "rb1", "rb2", "rb3", "wr1", "wr2", "wr3", "te1", "k1", "dst", "hyb"];
    const LABELS: &[&str] = &["QB", "RB", "WR", "TE", "K", "DEF", "FLEX", "WRRB_FLEX", "REC_FLEX"];

    proptest! {
        #[test]
        fn extra_capacity_never_lowers_best_ball(
            points in prop::collection::vec(-50i32..500, POOL.len()),
            roster in prop::collection::vec(prop::sample::select(LABELS), 1..8),
            extra in prop::sample::select(LABELS),
        ) {
            let rules = EligibilityRules::default();
            let slots = RosterSlotSpec::from_positions(&roster, &rules).unwrap();
            let bigger = slots.with_extra_slot(extra);
            let scores: Vec<(&str, f64)> = POOL
                .iter()
                .zip(&points)
                .map(|(id, p)| (*id, f64::from(*p) / 10.0))
                .collect();
            let m = matchup(&scores, 0);
            let base = LineupOptimizer::new(rules.clone(), slots)
                .optimal_lineup_points(&m, &table())
                .unwrap();
            let more = LineupOptimizer::new(rules, bigger)
                .optimal_lineup_points(&m, &table())
                .unwrap();
            prop_assert!(more >= base);
        }
    }
}
