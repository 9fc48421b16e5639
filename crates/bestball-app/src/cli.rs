// Command line arguments.

use clap::Parser;

/// Best-ball luck analysis for a Sleeper fantasy-football league
#[derive(Debug, Parser)]
#[command(name = "bestball")]
#[command(about = "Best-ball luck analysis for a Sleeper fantasy-football league")]
#[command(version)]
pub struct Cli {
    /// Sleeper league id; overrides `league_id` in config/league.toml
    pub league_id: Option<String>,
}
