// Error taxonomy for the season analysis.
//
// Every variant here is fatal for the season being analyzed. Lookup misses
// (unknown roster owner or display name) are not errors; they are absorbed
// by `ManagerDirectory` and logged.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum CoreError {
    /// A roster slot label outside the standard/flex vocabulary.
    #[error("roster slot `{label}` is not a supported position")]
    UnsupportedSlot { label: String },

    /// The matchup's reported total does not match its starters' points.
    #[error(
        "roster {roster_id}: reported {reported:.2} points but starters sum to {starters:.2}"
    )]
    StarterMismatch {
        roster_id: u32,
        reported: f64,
        starters: f64,
    },

    /// A player listed in a matchup is missing from the player table.
    #[error("roster {roster_id}: player `{player_id}` is not in the player table")]
    UnknownPlayer { roster_id: u32, player_id: String },

    /// A player listed in a matchup has no entry in the matchup's points map.
    #[error("roster {roster_id}: no points recorded for player `{player_id}`")]
    MissingPoints { roster_id: u32, player_id: String },

    /// The same manager appeared twice in one week's scoreboard.
    #[error("week {week}: manager `{manager}` appears more than once")]
    DuplicateManager { week: u32, manager: String },

    /// The assignment solver returned something that is not a certified
    /// optimum of the lineup problem.
    #[error("lineup solver failed: {0}")]
    Solver(String),

    /// Accumulated round-robin wins do not add up to the expected total.
    #[error("round-robin total is {actual} wins, expected {expected}")]
    RankingInvariant { expected: f64, actual: f64 },

    /// A manager is present in one input of the season join but not another.
    #[error("manager `{manager}` is missing from {source_name}")]
    MissingManager {
        manager: String,
        source_name: &'static str,
    },

    #[error("no completed weeks to analyze")]
    EmptySeason,
}

pub type Result<T> = std::result::Result<T, CoreError>;
