// Where in the season we are, judged from the fixture list.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use scout_core::Fixture;

/// Gameweek of the last finished fixture in schedule order, 0 before the
/// season kicks off.
pub fn gameweeks_passed(fixtures: &[Fixture]) -> u32 {
    fixtures
        .iter()
        .rev()
        .find(|f| f.finished)
        .and_then(|f| f.round)
        .unwrap_or(0)
}

/// Calendar year the current (or upcoming) season starts in.
///
/// Once every fixture is finished the list describes a completed season, and
/// the next one starts in the year of its last kickoff. Otherwise the season
/// started (or will start) in the year of its first kickoff. `None` when
/// the relevant fixture has no kickoff time.
pub fn season_start_year(fixtures: &[Fixture]) -> Option<i32> {
    let first = fixtures.first()?;
    let last = fixtures.last()?;
    let reference = if first.finished && last.finished { last } else { first };
    reference.kickoff_time.map(|t| t.year())
}

/// Names of the two seasons before the one starting in `start_year`,
/// e.g. 2024 gives `prev = "2022-23"`, `last = "2023-24"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PastSeasons {
    pub prev: String,
    pub last: String,
}

pub fn past_seasons(start_year: i32) -> PastSeasons {
    PastSeasons {
        prev: season_name(start_year - 2),
        last: season_name(start_year - 1),
    }
}

fn season_name(start: i32) -> String {
    format!("{}-{:02}", start, (start + 1).rem_euclid(100))
}
