// Configuration loading and parsing (league.toml, analysis.toml).

use std::path::{Path, PathBuf};

use bestball_core::EligibilityRules;
use serde::Deserialize;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub league: LeagueConfig,
    pub sleeper: SleeperConfig,
    pub cache: CacheConfig,
    pub output: OutputConfig,
}

impl Config {
    /// Slot vocabulary: the configured override or the standard one.
    pub fn eligibility(&self) -> EligibilityRules {
        self.league.eligibility.clone().unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    #[serde(default)]
    pub league_id: String,
    /// Display name override.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub eligibility: Option<EligibilityRules>,
}

// ---------------------------------------------------------------------------
// analysis.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct AnalysisFile {
    sleeper: SleeperConfig,
    #[serde(default)]
    cache: CacheConfig,
    #[serde(default)]
    output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SleeperConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Empty means the per-user cache directory.
    #[serde(default)]
    pub path: String,
    #[serde(default = "default_max_age_hours")]
    pub max_age_hours: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            path: String::new(),
            max_age_hours: default_max_age_hours(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Empty means no CSV file.
    #[serde(default)]
    pub csv_path: String,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_max_age_hours() -> u32 {
    24
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/analysis.toml` relative to `base_dir`. A `league_override`
/// replaces the configured league id before validation.
///
/// This does not auto-copy defaults; prefer `load_config()`.
pub fn load_config_from(
    base_dir: &Path,
    league_override: Option<&str>,
) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    let analysis_path = config_dir.join("analysis.toml");
    let analysis_text = read_file(&analysis_path)?;
    let analysis_file: AnalysisFile =
        toml::from_str(&analysis_text).map_err(|e| ConfigError::ParseError {
            path: analysis_path.clone(),
            source: e,
        })?;

    let mut league = league_file.league;
    if let Some(id) = league_override {
        league.league_id = id.trim().to_string();
    }

    let config = Config {
        league,
        sleeper: analysis_file.sleeper,
        cache: analysis_file.cache,
        output: analysis_file.output,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        // If config/ also doesn't exist, the app will fail to load config.
        // Return an error with a clear message about the missing defaults directory.
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        // Skip non-files and entries without a file name
        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };

        // Skip .example template files
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                // File already exists in config/, skip it
            }
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config(league_override: Option<&str>) -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd, league_override)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

fn invalid(field: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError {
        field: field.into(),
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let id = &config.league.league_id;
    if id.is_empty() {
        return Err(invalid(
            "league.league_id",
            "set it in config/league.toml or pass it as the first argument",
        ));
    }
    if !id.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(
            "league.league_id",
            format!("must be a numeric Sleeper league id, got `{id}`"),
        ));
    }

    if let Some(rules) = &config.league.eligibility {
        validate_eligibility(rules)?;
    }

    if config.sleeper.base_url.trim().is_empty() {
        return Err(invalid("sleeper.base_url", "must not be empty"));
    }
    if config.sleeper.timeout_secs == 0 {
        return Err(invalid("sleeper.timeout_secs", "must be greater than 0"));
    }

    Ok(())
}

fn validate_eligibility(rules: &EligibilityRules) -> Result<(), ConfigError> {
    if rules.standard.is_empty() {
        return Err(invalid("league.eligibility.standard", "must not be empty"));
    }
    for flex in &rules.flex {
        if rules.standard.contains(&flex.label) || flex.label == bestball_core::roster::BENCH {
            return Err(invalid(
                "league.eligibility.flex",
                format!("flex label `{}` clashes with a standard or bench label", flex.label),
            ));
        }
        if flex.accepts.is_empty() {
            return Err(invalid(
                "league.eligibility.flex",
                format!("flex `{}` accepts no positions", flex.label),
            ));
        }
        if let Some(unknown) = flex.accepts.iter().find(|p| !rules.standard.contains(*p)) {
            return Err(invalid(
                "league.eligibility.flex",
                format!("flex `{}` accepts unknown position `{unknown}`", flex.label),
            ));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Crate directory holding `defaults/` (the cwd under `cargo test`).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("crates/bestball-app/defaults").exists() {
            cwd.join("crates/bestball-app")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Fresh temp dir with the default analysis.toml and the given league.toml.
    fn scratch(name: &str, league_toml: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let config_dir = tmp.join("config");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&config_dir).unwrap();
        fs::copy(
            project_root().join("defaults/analysis.toml"),
            config_dir.join("analysis.toml"),
        )
        .unwrap();
        fs::write(config_dir.join("league.toml"), league_toml).unwrap();
        tmp
    }

    fn expect_field(err: ConfigError, expected: &str) {
        match err {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, expected),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn defaults_need_a_league_id() {
        let tmp = std::env::temp_dir().join("bestball_config_defaults");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();
        let root = project_root();
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        for name in ["league.toml", "analysis.toml"] {
            fs::copy(root.join("defaults").join(name), tmp.join("defaults").join(name)).unwrap();
        }
        assert_eq!(ensure_config_files(&tmp).unwrap().len(), 2);

        expect_field(load_config_from(&tmp, None).unwrap_err(), "league.league_id");

        let config = load_config_from(&tmp, Some("1048309472650346496")).unwrap();
        assert_eq!(config.league.league_id, "1048309472650346496");
        assert_eq!(config.sleeper.base_url, "https://api.sleeper.app/v1");
        assert_eq!(config.sleeper.timeout_secs, 10);
        assert_eq!(config.cache.max_age_hours, 24);
        assert!(config.cache.path.is_empty());
        assert_eq!(config.output.csv_path, "bestball.csv");
        assert_eq!(config.eligibility(), EligibilityRules::default());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_keeps_existing_files() {
        let tmp = scratch("bestball_config_keep", "[league]\nleague_id = \"42\"\n");
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults/league.toml"), "[league]\nleague_id = \"7\"\n").unwrap();
        fs::write(tmp.join("defaults/notes.toml.example"), "x = 1\n").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert!(copied.is_empty());
        assert!(!tmp.join("config/notes.toml.example").exists());
        let config = load_config_from(&tmp, None).unwrap();
        assert_eq!(config.league.league_id, "42");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn override_replaces_configured_league() {
        let tmp = scratch("bestball_config_override", "[league]\nleague_id = \"42\"\n");
        let config = load_config_from(&tmp, Some(" 99 ")).unwrap();
        assert_eq!(config.league.league_id, "99");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_non_numeric_league_id() {
        let tmp = scratch("bestball_config_bad_id", "[league]\nleague_id = \"abc\"\n");
        expect_field(load_config_from(&tmp, None).unwrap_err(), "league.league_id");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn custom_eligibility_is_loaded() {
        let league = r#"
[league]
league_id = "5"
name = "Superflex Friends"

[league.eligibility]
standard = ["QB", "RB", "WR", "TE"]

[[league.eligibility.flex]]
label = "SUPER_FLEX"
accepts = ["QB", "RB", "WR", "TE"]
"#;
        let tmp = scratch("bestball_config_superflex", league);
        let config = load_config_from(&tmp, None).unwrap();
        let rules = config.eligibility();
        assert!(rules.is_known("SUPER_FLEX"));
        assert!(!rules.is_known("FLEX"));
        assert_eq!(config.league.name.as_deref(), Some("Superflex Friends"));
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_flex_accepting_unknown_position() {
        let league = r#"
[league]
league_id = "5"

[league.eligibility]
standard = ["QB", "RB"]

[[league.eligibility.flex]]
label = "FLEX"
accepts = ["RB", "WR"]
"#;
        let tmp = scratch("bestball_config_bad_flex", league);
        expect_field(load_config_from(&tmp, None).unwrap_err(), "league.eligibility.flex");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_zero_timeout() {
        let tmp = scratch("bestball_config_timeout", "[league]\nleague_id = \"1\"\n");
        fs::write(
            tmp.join("config/analysis.toml"),
            "[sleeper]\nbase_url = \"http://localhost\"\ntimeout_secs = 0\n",
        )
        .unwrap();
        expect_field(load_config_from(&tmp, None).unwrap_err(), "sleeper.timeout_secs");
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_analysis_sections_take_defaults() {
        let tmp = scratch("bestball_config_sparse", "[league]\nleague_id = \"1\"\n");
        fs::write(
            tmp.join("config/analysis.toml"),
            "[sleeper]\nbase_url = \"http://localhost\"\n",
        )
        .unwrap();
        let config = load_config_from(&tmp, None).unwrap();
        assert_eq!(config.sleeper.timeout_secs, 10);
        assert_eq!(config.cache.max_age_hours, 24);
        assert!(config.output.csv_path.is_empty());
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn file_not_found_for_missing_league_toml() {
        let tmp = std::env::temp_dir().join("bestball_config_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        match load_config_from(&tmp, Some("1")).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("league.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        let tmp = scratch("bestball_config_parse", "[league\nleague_id = ");
        match load_config_from(&tmp, None).unwrap_err() {
            ConfigError::ParseError { path, .. } => assert!(path.ends_with("league.toml")),
            other => panic!("expected ParseError, got: {other}"),
        }
        let _ = fs::remove_dir_all(&tmp);
    }
}
