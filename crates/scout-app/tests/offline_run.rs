// End-to-end runs of the scout against the saved snapshot in scout-data's
// test fixtures, with inline configuration and a temporary output directory.

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::NaiveDate;

use fantasy_scout::config::{
    ApiConfig, Config, DataPaths, LeagueConfig, OutputConfig, RankingConfig, RegimeChoice,
    SelectionConfig, StrategyConfig,
};
use fantasy_scout::pipeline::{self, Regime};
use fantasy_scout::report::COMMENT_BIGGEST_STAR;
use scout_data::SnapshotProvider;

// ===========================================================================
// Test helpers
// ===========================================================================

/// The snapshot fixtures, as an absolute path so `base_dir` can differ.
fn snapshot_dir() -> PathBuf {
    let cwd = std::env::current_dir().unwrap();
    if cwd.join("../scout-data/tests/fixtures").exists() {
        cwd.join("../scout-data/tests/fixtures")
    } else if cwd.join("crates/scout-data/tests/fixtures").exists() {
        cwd.join("crates/scout-data/tests/fixtures")
    } else {
        panic!("Cannot locate scout-data fixtures from CWD {:?}", cwd);
    }
}

fn inline_config(regime: RegimeChoice) -> Config {
    let positions: HashMap<String, usize> = [("GKP", 2), ("DEF", 5), ("MID", 5), ("FWD", 3)]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

    Config {
        league: LeagueConfig {
            name: "Offline Test League".into(),
            budget: 1000,
            squad_size: 15,
            max_per_club: 3,
            positions,
        },
        strategy: StrategyConfig {
            selection: SelectionConfig {
                preferred_clubs: 7,
                fixture_horizon: 5,
                min_relatable_gameweeks: 5,
                regime,
            },
            ranking: RankingConfig {
                availability_threshold: 75.0,
                missing_availability: 75.0,
                price_ceiling_fraction: 0.75,
                min_starts_fraction: 0.6,
            },
        },
        api: ApiConfig {
            bootstrap_url: "http://127.0.0.1:9/unused".into(),
            fixtures_url: "http://127.0.0.1:9/unused".into(),
            offline_dir: Some(snapshot_dir().display().to_string()),
        },
        data_paths: DataPaths {
            predictions: snapshot_dir().join("predictions.csv").display().to_string(),
        },
        output: OutputConfig {
            dir: "results".into(),
            difficulty_horizon: 3,
        },
    }
}

fn temp_base(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// ===========================================================================
// Runs
// ===========================================================================

#[tokio::test]
async fn early_season_uses_predictions() {
    let base = temp_base("scout_offline_run_predicted");
    let config = inline_config(RegimeChoice::Auto);
    let provider = SnapshotProvider::new(snapshot_dir());
    let date = NaiveDate::from_ymd_opt(2024, 9, 7).unwrap();

    let summary = pipeline::run(&config, &provider, &base, date).await.unwrap();

    assert_eq!(summary.gameweeks_passed, 3);
    assert_eq!(summary.regime, Regime::Predicted);
    assert!(!summary.rows.is_empty());
    assert!(summary.remaining_budget >= 0);
    assert!(summary.paths.json.starts_with(base.join("results")));
    assert!(summary.paths.json.exists());
    assert!(summary.paths.csv.exists());

    let _ = std::fs::remove_dir_all(&base);
}

#[tokio::test]
async fn forced_live_run_respects_the_rules() {
    let base = temp_base("scout_offline_run_live");
    let config = inline_config(RegimeChoice::Live);
    let provider = pipeline::provider_for(&config, &base);
    let date = NaiveDate::from_ymd_opt(2024, 9, 7).unwrap();

    let summary = pipeline::run(&config, provider.as_ref(), &base, date)
        .await
        .unwrap();

    assert_eq!(summary.regime, Regime::Live);
    let rows = &summary.rows;
    // Four clubs, three players each at most.
    assert!(rows.len() <= 12);

    let mut per_club: HashMap<&str, usize> = HashMap::new();
    for row in rows {
        *per_club.entry(row.club.as_str()).or_default() += 1;
    }
    assert!(per_club.values().all(|&n| n <= 3));
    let spent: u32 = rows.iter().map(|r| r.price).sum();
    assert!(spent <= 1000);

    // Every player has a difficulty over three upcoming fixtures (each rated 2 or 4).
    assert!(rows.iter().all(|r| (6..=12).contains(&r.fixtures_difficulty)));

    // Exactly one player is tagged as the star, and it is a priciest one.
    let max_price = rows.iter().map(|r| r.price).max().unwrap();
    let stars: Vec<_> = rows
        .iter()
        .filter(|r| r.comment.as_deref() == Some(COMMENT_BIGGEST_STAR))
        .collect();
    assert_eq!(stars.len(), 1);
    assert_eq!(stars[0].price, max_price);

    let _ = std::fs::remove_dir_all(&base);
}
