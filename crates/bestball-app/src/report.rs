// Season report output: CSV file and plain-text tables for stdout.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use bestball_core::{ManagerMetrics, RoundRobinStandings, SeasonReport};

/// Write one CSV row per manager, with a header.
pub fn write_csv<W: Write>(writer: W, rows: &[ManagerMetrics]) -> Result<()> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)
            .with_context(|| format!("failed to write CSV row for {}", row.manager))?;
    }
    csv.flush().context("failed to flush CSV output")?;
    Ok(())
}

pub fn write_csv_file(path: &Path, rows: &[ManagerMetrics]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    write_csv(file, rows)
}

/// Aligned metrics table, one line per manager.
pub fn metrics_table(rows: &[ManagerMetrics]) -> String {
    let width = rows
        .iter()
        .map(|r| r.manager.chars().count())
        .max()
        .unwrap_or(0)
        .max("manager".len());

    let mut out = format!(
        "{:<width$}  {:>8}  {:>6}  {:>7}  {:>8}  {:>8}  {:>8}  {:>6}  {:>6}\n",
        "manager", "win_rate", "miwr", "bb_miwr", "pf", "pa", "bb_pf", "luck", "boost"
    );
    for r in rows {
        out.push_str(&format!(
            "{:<width$}  {:>8.3}  {:>6.3}  {:>7.3}  {:>8.2}  {:>8.2}  {:>8.2}  {:>+6.3}  {:>+6.3}\n",
            r.manager,
            r.win_rate,
            r.miwr,
            r.bb_miwr,
            r.points_for,
            r.points_against,
            r.bb_points_for,
            r.luck,
            r.lineup_boost,
        ));
    }
    out
}

/// Numbered ranking by round-robin wins.
pub fn ranking(title: &str, standings: &RoundRobinStandings) -> String {
    let mut out = format!("{title} ({} weeks)\n", standings.weeks());
    for (place, entry) in standings.ranking().iter().enumerate() {
        out.push_str(&format!(
            "{:>3}. {} {:.1}/{} ({:.3})\n",
            place + 1,
            entry.manager,
            entry.wins,
            standings.max_wins(),
            entry.win_rate
        ));
    }
    out
}

/// Everything printed for a finished analysis.
pub fn render(league_name: &str, report: &SeasonReport) -> String {
    let weeks = match (report.weeks.first(), report.weeks.last()) {
        (Some(first), Some(last)) => format!("weeks {first}-{last}"),
        _ => "no weeks".to_string(),
    };
    format!(
        "{league_name}: {weeks}\n\n{}\n{}\n{}",
        metrics_table(&report.metrics),
        ranking("Matchup-independent ranking", &report.actual),
        ranking("Best-ball ranking", &report.best_ball),
    )
}
