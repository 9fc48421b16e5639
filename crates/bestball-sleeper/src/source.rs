// League data source abstraction and the season fetch built on it.

use async_trait::async_trait;
use futures_util::future::try_join_all;
use tracing::info;

use crate::api::{League, Matchup, NflState, PlayerMap, Roster, User};
use crate::client::{SleeperClient, SleeperError};

/// Read access to a league's data. Implemented by [`SleeperClient`]; tests
/// substitute an in-memory source.
#[async_trait]
pub trait LeagueSource: Send + Sync {
    async fn nfl_state(&self) -> Result<NflState, SleeperError>;
    async fn league(&self, league_id: &str) -> Result<League, SleeperError>;
    async fn users(&self, league_id: &str) -> Result<Vec<User>, SleeperError>;
    async fn rosters(&self, league_id: &str) -> Result<Vec<Roster>, SleeperError>;
    async fn matchups(&self, league_id: &str, week: u32) -> Result<Vec<Matchup>, SleeperError>;
    async fn players(&self) -> Result<PlayerMap, SleeperError>;
}

#[async_trait]
impl LeagueSource for SleeperClient {
    async fn nfl_state(&self) -> Result<NflState, SleeperError> {
        SleeperClient::nfl_state(self).await
    }

    async fn league(&self, league_id: &str) -> Result<League, SleeperError> {
        SleeperClient::league(self, league_id).await
    }

    async fn users(&self, league_id: &str) -> Result<Vec<User>, SleeperError> {
        SleeperClient::users(self, league_id).await
    }

    async fn rosters(&self, league_id: &str) -> Result<Vec<Roster>, SleeperError> {
        SleeperClient::rosters(self, league_id).await
    }

    async fn matchups(&self, league_id: &str, week: u32) -> Result<Vec<Matchup>, SleeperError> {
        SleeperClient::matchups(self, league_id, week).await
    }

    async fn players(&self) -> Result<PlayerMap, SleeperError> {
        SleeperClient::players(self).await
    }
}

// ---------------------------------------------------------------------------
// Season snapshot
// ---------------------------------------------------------------------------

/// All matchups of one week as returned by the API.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekResponse {
    pub week: u32,
    pub matchups: Vec<Matchup>,
}

/// Everything about a league season except the player table.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonSnapshot {
    pub state: NflState,
    pub league: League,
    pub users: Vec<User>,
    pub rosters: Vec<Roster>,
    /// Completed weeks, in week order.
    pub weeks: Vec<WeekResponse>,
}

/// Fetch a league's completed season so far. Weeks are requested
/// concurrently; any failed request fails the whole fetch.
pub async fn fetch_snapshot(
    source: &dyn LeagueSource,
    league_id: &str,
) -> Result<SeasonSnapshot, SleeperError> {
    let state = source.nfl_state().await?;
    let weeks = state.completed_weeks();
    info!(
        season = %state.season,
        current_week = state.week,
        completed = weeks.len(),
        "fetched NFL state"
    );

    let (league, users, rosters) = futures_util::try_join!(
        source.league(league_id),
        source.users(league_id),
        source.rosters(league_id),
    )?;
    info!(league = %league.name, rosters = rosters.len(), "fetched league");

    let weeks = try_join_all(weeks.into_iter().map(|week| async move {
        let matchups = source.matchups(league_id, week).await?;
        Ok::<_, SleeperError>(WeekResponse { week, matchups })
    }))
    .await?;

    Ok(SeasonSnapshot {
        state,
        league,
        users,
        rosters,
        weeks,
    })
}
