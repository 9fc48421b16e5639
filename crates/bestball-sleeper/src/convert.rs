// Conversion from Sleeper responses into the analysis input.

use bestball_core::{
    EligibilityRules, ManagerDirectory, Matchup, Player, PlayerTable, RosterSlotSpec,
    SeasonInput, SeasonRecord, WeekMatchups,
};

use crate::api::{self, PlayerMap, Roster, User};
use crate::source::{SeasonSnapshot, WeekResponse};

pub fn player_table(players: &PlayerMap) -> PlayerTable {
    PlayerTable::new(players.iter().map(|(id, record)| Player {
        id: id.clone(),
        positions: record.positions(),
    }))
}

/// Roster → owner → display name. Users without a display name are left
/// out so they resolve to the placeholder.
pub fn manager_directory(users: &[User], rosters: &[Roster]) -> ManagerDirectory {
    ManagerDirectory::new(
        rosters.iter().map(|r| (r.roster_id, r.owner_id.clone())),
        users
            .iter()
            .filter_map(|u| Some((u.user_id.clone(), u.display_name.clone()?))),
    )
}

/// League-reported standings, one record per roster.
pub fn standings(rosters: &[Roster], directory: &ManagerDirectory) -> Vec<SeasonRecord> {
    rosters
        .iter()
        .map(|r| SeasonRecord {
            manager: directory.manager_name(r.roster_id),
            wins: r.settings.wins,
            losses: r.settings.losses,
            ties: r.settings.ties,
            points_for: r.settings.points_for(),
            points_against: r.settings.points_against(),
        })
        .collect()
}

pub fn matchup(m: &api::Matchup) -> Matchup {
    Matchup {
        roster_id: m.roster_id,
        players: m.players.clone().unwrap_or_default(),
        players_points: m.players_points.clone().unwrap_or_default(),
        points: m.points,
        starters_points: m.starters_points.clone().unwrap_or_default(),
    }
}

pub fn week(response: &WeekResponse) -> WeekMatchups {
    WeekMatchups {
        week: response.week,
        matchups: response.matchups.iter().map(matchup).collect(),
    }
}

/// Starting-slot layout from the league's roster positions.
pub fn slot_spec(
    league: &api::League,
    rules: &EligibilityRules,
) -> bestball_core::Result<RosterSlotSpec> {
    RosterSlotSpec::from_positions(&league.roster_positions, rules)
}

/// Assemble the full analysis input.
pub fn season_input(snapshot: &SeasonSnapshot, players: &PlayerMap) -> SeasonInput {
    let directory = manager_directory(&snapshot.users, &snapshot.rosters);
    SeasonInput {
        players: player_table(players),
        weeks: snapshot.weeks.iter().map(week).collect(),
        standings: standings(&snapshot.rosters, &directory),
        directory,
    }
}
