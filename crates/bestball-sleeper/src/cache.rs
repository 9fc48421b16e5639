// SQLite-backed cache of the Sleeper NFL player table.

use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::info;

use crate::api::{PlayerMap, PlayerRecord};
use crate::source::LeagueSource;

const REFRESHED_AT: &str = "refreshed_at";

/// Local copy of the player table plus the time it was last refreshed.
pub struct PlayerCache {
    conn: Mutex<Connection>,
}

impl PlayerCache {
    /// Open (or create) the cache at `path`. Pass `":memory:"` for an
    /// ephemeral cache.
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open player cache at {path}"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )
        .context("failed to set cache pragmas")?;

        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS players (
                id        TEXT PRIMARY KEY,
                full_name TEXT,
                position  TEXT,
                positions TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS cache_meta (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            ",
        )
        .context("failed to create player cache schema")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Per-user data location used when no cache path is configured.
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "bestball").map(|dirs| dirs.cache_dir().join("players.sqlite3"))
    }

    /// Panics if the mutex is poisoned (another thread panicked while
    /// holding the lock).
    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().expect("player cache mutex poisoned")
    }

    /// When the table was last replaced, if ever.
    pub fn refreshed_at(&self) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn();
        let raw: Option<String> = conn
            .query_row(
                "SELECT value FROM cache_meta WHERE key = ?1",
                params![REFRESHED_AT],
                |row| row.get(0),
            )
            .optional()
            .context("failed to read cache refresh time")?;

        raw.map(|s| {
            DateTime::parse_from_rfc3339(&s)
                .map(|t| t.with_timezone(&Utc))
                .with_context(|| format!("invalid cache refresh time `{s}`"))
        })
        .transpose()
    }

    /// `true` if the cache was refreshed less than `max_age` before `now`.
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> Result<bool> {
        Ok(self
            .refreshed_at()?
            .is_some_and(|at| now.signed_duration_since(at) < max_age))
    }

    /// Replace the cached table with `players` and stamp it with `now`.
    pub fn store(&self, players: &PlayerMap, now: DateTime<Utc>) -> Result<usize> {
        let mut conn = self.conn();
        let tx = conn
            .transaction()
            .context("failed to begin cache transaction")?;
        tx.execute("DELETE FROM players", [])
            .context("failed to clear cached players")?;
        {
            let mut stmt = tx
                .prepare(
                    "INSERT INTO players (id, full_name, position, positions)
                     VALUES (?1, ?2, ?3, ?4)",
                )
                .context("failed to prepare player insert")?;
            for (id, record) in players {
                let positions = serde_json::to_string(&record.fantasy_positions)
                    .context("failed to serialize fantasy positions")?;
                stmt.execute(params![id, record.full_name, record.position, positions])
                    .with_context(|| format!("failed to cache player {id}"))?;
            }
        }
        tx.execute(
            "INSERT OR REPLACE INTO cache_meta (key, value) VALUES (?1, ?2)",
            params![REFRESHED_AT, now.to_rfc3339()],
        )
        .context("failed to stamp cache refresh time")?;
        tx.commit().context("failed to commit player cache")?;
        Ok(players.len())
    }

    /// Every cached player.
    pub fn load(&self) -> Result<PlayerMap> {
        let conn = self.conn();
        let mut stmt = conn
            .prepare("SELECT id, full_name, position, positions FROM players")
            .context("failed to prepare player query")?;

        let rows = stmt
            .query_map([], |row| {
                let id: String = row.get(0)?;
                let full_name: Option<String> = row.get(1)?;
                let position: Option<String> = row.get(2)?;
                let positions: String = row.get(3)?;
                Ok((id, full_name, position, positions))
            })
            .context("failed to query cached players")?
            .collect::<std::result::Result<Vec<_>, _>>()
            .context("failed to map cached player rows")?;

        rows.into_iter()
            .map(|(id, full_name, position, positions)| {
                let fantasy_positions: Option<Vec<String>> = serde_json::from_str(&positions)
                    .with_context(|| format!("corrupt positions for cached player {id}"))?;
                Ok((
                    id,
                    PlayerRecord {
                        full_name,
                        position,
                        fantasy_positions,
                    },
                ))
            })
            .collect()
    }

    /// Cached players, refreshed from `source` first when older than
    /// `max_age`.
    pub async fn load_or_refresh(
        &self,
        source: &dyn LeagueSource,
        max_age: Duration,
    ) -> Result<PlayerMap> {
        let now = Utc::now();
        if self.is_fresh(now, max_age)? {
            let players = self.load()?;
            info!(players = players.len(), "using cached player table");
            return Ok(players);
        }

        info!("updating player cache");
        let players = source
            .players()
            .await
            .context("failed to download player table")?;
        let stored = self.store(&players, now)?;
        info!(players = stored, "player cache refreshed");
        Ok(players)
    }
}
