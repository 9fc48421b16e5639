// Sleeper API v1 response shapes.
//
// Only the fields the analysis reads are declared; everything else in the
// responses is ignored. Fields Sleeper omits or nulls for some rosters are
// `Option`s.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// `GET /state/nfl`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NflState {
    /// Current week; weeks before it are complete.
    pub week: u32,
    pub season: String,
    #[serde(default)]
    pub season_type: String,
}

impl NflState {
    /// Weeks whose matchups are final, in order.
    pub fn completed_weeks(&self) -> Vec<u32> {
        (1..self.week).collect()
    }
}

/// `GET /league/<league_id>`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct League {
    #[serde(default)]
    pub league_id: String,
    pub name: String,
    #[serde(default)]
    pub season: String,
    pub roster_positions: Vec<String>,
}

/// One element of `GET /league/<league_id>/users`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub user_id: String,
    pub display_name: Option<String>,
}

/// One element of `GET /league/<league_id>/rosters`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Roster {
    pub roster_id: u32,
    pub owner_id: Option<String>,
    pub settings: RosterSettings,
}

/// Season standings Sleeper keeps on each roster. Points are split into a
/// whole part and hundredths.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RosterSettings {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub ties: u32,
    #[serde(default)]
    pub losses: u32,
    #[serde(default)]
    pub fpts: f64,
    pub fpts_decimal: Option<f64>,
    pub fpts_against: Option<f64>,
    pub fpts_against_decimal: Option<f64>,
}

impl RosterSettings {
    pub fn points_for(&self) -> f64 {
        self.fpts + 0.01 * self.fpts_decimal.unwrap_or(0.0)
    }

    pub fn points_against(&self) -> f64 {
        self.fpts_against.unwrap_or(0.0) + 0.01 * self.fpts_against_decimal.unwrap_or(0.0)
    }
}

/// One element of `GET /league/<league_id>/matchups/<week>`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Matchup {
    pub roster_id: u32,
    pub matchup_id: Option<u32>,
    #[serde(default)]
    pub points: f64,
    pub players: Option<Vec<String>>,
    pub players_points: Option<HashMap<String, f64>>,
    pub starters: Option<Vec<String>>,
    pub starters_points: Option<Vec<f64>>,
}

/// One value of the `GET /players/nfl` map, keyed by player id.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub full_name: Option<String>,
    pub position: Option<String>,
    pub fantasy_positions: Option<Vec<String>>,
}

impl PlayerRecord {
    /// Positions used for slot eligibility: the fantasy positions, else the
    /// primary position.
    pub fn positions(&self) -> Vec<String> {
        match (&self.fantasy_positions, &self.position) {
            (Some(fantasy), _) if !fantasy.is_empty() => fantasy.clone(),
            (_, Some(primary)) => vec![primary.clone()],
            _ => Vec::new(),
        }
    }
}

pub type PlayerMap = HashMap<String, PlayerRecord>;
