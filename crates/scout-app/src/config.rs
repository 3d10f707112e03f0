// Configuration loading and parsing (league.toml, strategy.toml).

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use scout_core::candidate::ALL_POSITIONS;
use scout_core::{Position, RankingSettings, RosterConstraintSet};

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
    pub strategy: StrategyConfig,
    pub api: ApiConfig,
    pub data_paths: DataPaths,
    pub output: OutputConfig,
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
    pub name: String,
    /// Starting budget in price units (tenths of a million).
    pub budget: u32,
    pub squad_size: usize,
    pub max_per_club: usize,
    /// Position caps keyed by position name, e.g. `GKP = 2`.
    pub positions: HashMap<String, usize>,
}

impl LeagueConfig {
    /// The squad rules for the builder. Keys that do not name a position are
    /// ignored here; `validate` rejects them on load.
    pub fn constraints(&self) -> RosterConstraintSet {
        let per_position: HashMap<Position, usize> = self
            .positions
            .iter()
            .filter_map(|(name, &cap)| Position::from_str_pos(name).map(|p| (p, cap)))
            .collect();
        RosterConstraintSet::new(per_position, self.max_per_club, self.squad_size, self.budget)
    }
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    selection: SelectionConfig,
    ranking: RankingConfig,
    api: ApiConfig,
    data_paths: DataPaths,
    output: OutputConfig,
}

/// The public strategy config assembled from the strategy.toml sections.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub selection: SelectionConfig,
    pub ranking: RankingConfig,
}

/// Which data regime to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegimeChoice {
    /// Live once enough gameweeks have been played, predicted before that.
    Auto,
    Live,
    Predicted,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SelectionConfig {
    pub preferred_clubs: usize,
    pub fixture_horizon: usize,
    pub min_relatable_gameweeks: u32,
    pub regime: RegimeChoice,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RankingConfig {
    pub availability_threshold: f64,
    pub missing_availability: f64,
    pub price_ceiling_fraction: f64,
    pub min_starts_fraction: f64,
}

impl RankingConfig {
    pub fn settings(&self) -> RankingSettings {
        RankingSettings {
            availability_threshold: self.availability_threshold,
            missing_availability: self.missing_availability,
            price_ceiling_fraction: self.price_ceiling_fraction,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub bootstrap_url: String,
    pub fixtures_url: String,
    /// Read `bootstrap-static.json` and `fixtures.json` from this directory
    /// instead of calling the API.
    #[serde(default)]
    pub offline_dir: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub predictions: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub dir: String,
    pub difficulty_horizon: usize,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

const CONFIG_FILES: [&str; 2] = ["league.toml", "strategy.toml"];

/// Load and validate configuration from `config/league.toml` and
/// `config/strategy.toml`, relative to the given `base_dir`.
///
/// This is the lower-level loading primitive that does not auto-copy defaults.
/// Prefer `load_config()` which handles default initialization automatically.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let strategy_file: StrategyFile =
        toml::from_str(&strategy_text).map_err(|e| ConfigError::ParseError {
            path: strategy_path.clone(),
            source: e,
        })?;

    let config = Config {
        league: league_file.league,
        strategy: StrategyConfig {
            selection: strategy_file.selection,
            ranking: strategy_file.ranking,
        },
        api: strategy_file.api,
        data_paths: strategy_file.data_paths,
        output: strategy_file.output,
    };

    validate(&config)?;

    Ok(config)
}

/// Copy `league.toml` and `strategy.toml` from `defaults/` into `config/`
/// when they are missing there. Returns the files written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");
    let copy_error = |message: String| ConfigError::DefaultsCopyError { message };

    if !defaults_dir.is_dir() {
        if config_dir.is_dir() {
            return Ok(Vec::new());
        }
        return Err(copy_error(format!(
            "neither defaults/ nor config/ directory found in {}",
            base_dir.display()
        )));
    }

    std::fs::create_dir_all(&config_dir)
        .map_err(|e| copy_error(format!("cannot create {}: {e}", config_dir.display())))?;

    let mut copied = Vec::new();
    for name in CONFIG_FILES {
        let (source, target) = (defaults_dir.join(name), config_dir.join(name));
        if target.exists() || !source.is_file() {
            continue;
        }
        std::fs::copy(&source, &target).map_err(|e| {
            copy_error(format!("cannot copy {} to {}: {e}", source.display(), target.display()))
        })?;
        copied.push(target);
    }
    Ok(copied)
}

/// Loads config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(|_| ConfigError::FileNotFound {
        path: PathBuf::from("."),
    })?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
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
    let league = &config.league;
    if league.budget == 0 {
        return Err(invalid("league.budget", "must be greater than 0"));
    }
    let league_sizes: &[(&str, usize)] = &[
        ("league.squad_size", league.squad_size),
        ("league.max_per_club", league.max_per_club),
    ];
    for (name, val) in league_sizes {
        if *val == 0 {
            return Err(invalid(name, "must be greater than 0"));
        }
    }

    for key in league.positions.keys() {
        if Position::from_str_pos(key).is_none() {
            return Err(invalid(
                &format!("league.positions.{key}"),
                "not a squad position",
            ));
        }
    }
    for pos in ALL_POSITIONS {
        let mut keys: Vec<&str> = league
            .positions
            .keys()
            .filter(|k| Position::from_str_pos(k) == Some(pos))
            .map(String::as_str)
            .collect();
        keys.sort_unstable();
        match keys.len() {
            0 => {
                return Err(invalid(
                    "league.positions",
                    format!("missing a cap for {}", pos.singular_name()),
                ))
            }
            1 => {}
            _ => {
                return Err(invalid(
                    "league.positions",
                    format!(
                        "duplicate cap for {} ({})",
                        pos.singular_name(),
                        keys.join(", ")
                    ),
                ))
            }
        }
    }

    let selection = &config.strategy.selection;
    let selection_sizes: &[(&str, usize)] = &[
        ("selection.preferred_clubs", selection.preferred_clubs),
        ("selection.fixture_horizon", selection.fixture_horizon),
        ("output.difficulty_horizon", config.output.difficulty_horizon),
    ];
    for (name, val) in selection_sizes {
        if *val == 0 {
            return Err(invalid(name, "must be > 0"));
        }
    }

    let ranking = &config.strategy.ranking;
    let fractions: &[(&str, f64)] = &[
        ("ranking.price_ceiling_fraction", ranking.price_ceiling_fraction),
        ("ranking.min_starts_fraction", ranking.min_starts_fraction),
    ];
    for (name, val) in fractions {
        if !(*val > 0.0 && *val <= 1.0) {
            return Err(invalid(name, format!("must be in (0.0, 1.0], got {val}")));
        }
    }
    let percentages: &[(&str, f64)] = &[
        ("ranking.availability_threshold", ranking.availability_threshold),
        ("ranking.missing_availability", ranking.missing_availability),
    ];
    for (name, val) in percentages {
        if !(0.0..=100.0).contains(val) {
            return Err(invalid(name, format!("must be between 0 and 100, got {val}")));
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
