// Library root: best-ball lineup optimization and round-robin luck metrics
// for a season of fantasy-football results.

pub mod aggregate;
pub mod eligibility;
pub mod error;
pub mod lineup;
pub mod managers;
pub mod model;
pub mod roster;
pub mod round_robin;
pub mod season;

pub use aggregate::SeasonAggregator;
pub use eligibility::{EligibilityRules, FlexSlot};
pub use error::{CoreError, Result};
pub use lineup::solver::{AssignmentSolver, HungarianSolver};
pub use lineup::{Lineup, LineupOptimizer};
pub use managers::ManagerDirectory;
pub use model::{
    ManagerMetrics, Matchup, Player, PlayerTable, SeasonRecord, WeekMatchups, WeeklyScoreboard,
};
pub use roster::RosterSlotSpec;
pub use round_robin::{RoundRobinStandings, RoundRobinTally};
pub use season::{SeasonAnalyzer, SeasonInput, SeasonReport};
