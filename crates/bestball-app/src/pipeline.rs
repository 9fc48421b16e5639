// Fetch → convert → analyze orchestration.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bestball_core::{SeasonAnalyzer, SeasonReport};
use bestball_sleeper::{convert, fetch_snapshot, LeagueSource, PlayerCache};
use tracing::info;

use crate::config::Config;

/// A finished league analysis.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub league_name: String,
    pub season: String,
    pub report: SeasonReport,
}

/// Where the player cache lives: the configured path, else the per-user
/// cache directory.
pub fn cache_path(config: &Config) -> Result<PathBuf> {
    if !config.cache.path.is_empty() {
        return Ok(PathBuf::from(&config.cache.path));
    }
    PlayerCache::default_path().context("no home directory for the default player cache")
}

/// Open the player cache, creating its directory if needed.
pub fn open_cache(config: &Config) -> Result<PlayerCache> {
    let path = cache_path(config)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create cache directory {}", parent.display()))?;
    }
    PlayerCache::open(&path.to_string_lossy())
}

/// Fetch the configured league's completed weeks and run the season
/// analysis on a blocking worker.
pub async fn analyze_league(
    source: &dyn LeagueSource,
    cache: &PlayerCache,
    config: &Config,
) -> Result<Analysis> {
    let league_id = &config.league.league_id;
    let snapshot = fetch_snapshot(source, league_id)
        .await
        .with_context(|| format!("failed to fetch league {league_id}"))?;

    let max_age = chrono::Duration::hours(i64::from(config.cache.max_age_hours));
    let players = cache
        .load_or_refresh(source, max_age)
        .await
        .context("failed to load player table")?;

    let rules = config.eligibility();
    let slots = convert::slot_spec(&snapshot.league, &rules)
        .context("league roster uses unsupported slots")?;
    info!(
        starters = slots.starters(),
        bench = slots.bench(),
        "roster slots: {:?}",
        slots.labels()
    );

    let input = convert::season_input(&snapshot, &players);
    let report = tokio::task::spawn_blocking(move || SeasonAnalyzer::new(rules, slots).analyze(&input))
        .await
        .context("season analysis task failed")?
        .context("season analysis failed")?;

    let league_name = config
        .league
        .name
        .clone()
        .unwrap_or_else(|| snapshot.league.name.clone());
    Ok(Analysis {
        league_name,
        season: snapshot.state.season,
        report,
    })
}
