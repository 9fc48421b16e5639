// Best-ball luck analysis entry point.
//
// Startup sequence:
// 1. Parse arguments (clap handles --help and --version)
// 2. Initialize tracing (log to file)
// 3. Load config (the league id argument overrides league.toml)
// 4. Open the player cache
// 5. Fetch the league and run the season analysis
// 6. Print the report and write the CSV

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use bestball_app::cli::Cli;
use bestball_app::{config, pipeline, report};
use bestball_sleeper::SleeperClient;
use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing()?;
    info!("bestball starting up");

    let config =
        config::load_config(cli.league_id.as_deref()).context("failed to load configuration")?;
    info!(
        "Config loaded: league={}, sleeper={}",
        config.league.league_id, config.sleeper.base_url
    );

    let client = SleeperClient::new(
        config.sleeper.base_url.clone(),
        Duration::from_secs(config.sleeper.timeout_secs),
    )
    .context("failed to create Sleeper client")?;
    let cache = pipeline::open_cache(&config).context("failed to open player cache")?;

    let analysis = pipeline::analyze_league(&client, &cache, &config).await?;
    info!(
        league = %analysis.league_name,
        season = %analysis.season,
        managers = analysis.report.metrics.len(),
        "analysis finished"
    );

    print!("{}", report::render(&analysis.league_name, &analysis.report));

    if !config.output.csv_path.is_empty() {
        let path = Path::new(&config.output.csv_path);
        report::write_csv_file(path, &analysis.report.metrics)?;
        println!("\nWrote {}", path.display());
        info!("Wrote {}", path.display());
    }

    Ok(())
}

/// Initialize tracing to log to a file; stdout carries the report.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let log_dir = std::env::current_dir()?.join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = std::fs::File::create(log_dir.join("bestball.log"))?;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("bestball=info,warn")),
        )
        .with_writer(log_file)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
