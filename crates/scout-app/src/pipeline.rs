// One scouting run: fetch, pick a regime, rank, build and report.

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use scout_core::{
    compute_strength_indices, Candidate, CandidateRanker, ClubPreferences, LiveRanker,
    PredictedRanker, RosterBuilder, RosterSelection, Termination,
};
use scout_data::predictions::{apply_predictions, load_predictions};
use scout_data::season::{gameweeks_passed, past_seasons, season_start_year};
use scout_data::{fetch_all, DataProvider, HttpProvider, SeasonSnapshot, SnapshotProvider};

use crate::config::{Config, RegimeChoice};
use crate::report::{self, ExportPaths, ReportRow};

/// Which data the squad is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Regime {
    /// Current-season form and points-per-game.
    Live,
    /// Model predictions from earlier seasons.
    Predicted,
}

/// Live data is trusted once `min_relatable` gameweeks have been played,
/// unless the configuration forces a regime.
pub fn choose_regime(choice: RegimeChoice, gameweeks_passed: u32, min_relatable: u32) -> Regime {
    match choice {
        RegimeChoice::Live => Regime::Live,
        RegimeChoice::Predicted => Regime::Predicted,
        RegimeChoice::Auto if gameweeks_passed >= min_relatable => Regime::Live,
        RegimeChoice::Auto => Regime::Predicted,
    }
}

/// The provider the configuration asks for.
pub fn provider_for(config: &Config, base_dir: &Path) -> Box<dyn DataProvider> {
    match &config.api.offline_dir {
        Some(dir) => Box::new(SnapshotProvider::new(base_dir.join(dir))),
        None => Box::new(HttpProvider::new(
            config.api.bootstrap_url.clone(),
            config.api.fixtures_url.clone(),
        )),
    }
}

pub async fn load_snapshot(provider: &dyn DataProvider) -> anyhow::Result<SeasonSnapshot> {
    let (bootstrap, fixtures) = fetch_all(provider)
        .await
        .context("failed to fetch season data")?;
    SeasonSnapshot::from_raw(&bootstrap, &fixtures).context("failed to read season data")
}

/// The candidate pool for one regime, ready for the builder.
#[derive(Debug, Clone)]
pub struct PreparedPool {
    pub regime: Regime,
    pub gameweeks_passed: u32,
    pub candidates: Vec<Candidate>,
    /// Present for the live regime only.
    pub preferences: Option<ClubPreferences>,
}

pub fn prepare(config: &Config, snapshot: &SeasonSnapshot, base_dir: &Path) -> anyhow::Result<PreparedPool> {
    let selection = &config.strategy.selection;
    let played = gameweeks_passed(&snapshot.fixtures);
    let regime = choose_regime(selection.regime, played, selection.min_relatable_gameweeks);
    info!("{} gameweeks played, using the {:?} regime", played, regime);

    match regime {
        Regime::Live => {
            let indices =
                compute_strength_indices(&snapshot.clubs, &snapshot.fixtures, selection.fixture_horizon);
            let preferences = ClubPreferences::from_indices(&indices, selection.preferred_clubs);
            info!("defensive clubs: {}", preferences.defensive.join(", "));
            info!("offensive clubs: {}", preferences.offensive.join(", "));
            Ok(PreparedPool {
                regime,
                gameweeks_passed: played,
                candidates: snapshot.candidates.clone(),
                preferences: Some(preferences),
            })
        }
        Regime::Predicted => {
            if let Some(year) = season_start_year(&snapshot.fixtures) {
                let seasons = past_seasons(year);
                info!("predictions are based on the {} and {} seasons", seasons.prev, seasons.last);
            }
            let path = base_dir.join(&config.data_paths.predictions);
            let predictions = load_predictions(&path)
                .with_context(|| format!("failed to load predictions from {}", path.display()))?;
            let candidates = apply_predictions(
                &snapshot.candidates,
                &predictions,
                config.strategy.ranking.min_starts_fraction,
            )
            .context("failed to apply predictions")?;
            Ok(PreparedPool {
                regime,
                gameweeks_passed: played,
                candidates,
                preferences: None,
            })
        }
    }
}

/// Build the squad for a prepared pool.
pub fn select<'a>(config: &Config, pool: &'a PreparedPool) -> anyhow::Result<RosterSelection<'a>> {
    let settings = config.strategy.ranking.settings();
    let ranker: Box<dyn CandidateRanker> = match pool.regime {
        Regime::Live => Box::new(LiveRanker::new(settings)),
        Regime::Predicted => Box::new(PredictedRanker::new(settings)),
    };

    let mut builder = RosterBuilder::new(ranker.as_ref(), config.league.constraints());
    if let Some(prefs) = &pool.preferences {
        builder = builder.with_preferences(prefs.clone());
    }
    let selection = builder
        .build(&pool.candidates)
        .context("failed to build a squad")?;
    Ok(selection)
}

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub regime: Regime,
    pub gameweeks_passed: u32,
    pub bp_limit: usize,
    pub termination: Termination,
    pub remaining_budget: i64,
    pub rows: Vec<ReportRow>,
    pub paths: ExportPaths,
}

/// Full run against `provider`, writing the report under
/// `<base_dir>/<output.dir>`.
pub async fn run(
    config: &Config,
    provider: &dyn DataProvider,
    base_dir: &Path,
    date: NaiveDate,
) -> anyhow::Result<RunSummary> {
    let snapshot = load_snapshot(provider).await?;
    let pool = prepare(config, &snapshot, base_dir)?;
    let selection = select(config, &pool)?;
    info!(
        "collected {} players for {} (bp_limit={}, {:?})",
        selection.roster.len(),
        selection.roster.total_cost(),
        selection.bp_limit,
        selection.termination
    );

    let rows = report::build_report(
        selection.members(),
        &snapshot.fixtures,
        config.output.difficulty_horizon,
    );
    let out_dir = base_dir.join(&config.output.dir);
    let paths = report::export(&rows, &out_dir, date).context("failed to export the report")?;

    Ok(RunSummary {
        regime: pool.regime,
        gameweeks_passed: pool.gameweeks_passed,
        bp_limit: selection.bp_limit,
        termination: selection.termination,
        remaining_budget: selection.roster.remaining_budget(),
        rows,
        paths,
    })
}
