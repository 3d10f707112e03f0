// Fixture-based club strength indices and club preference lists.
//
// For every club, the attack/defence rating differentials of its next few
// fixtures are summed into an offense index and a defense index. The clubs
// with the kindest upcoming schedules become the preferred clubs for
// offensive and defensive picks respectively.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::candidate::Profile;
use crate::ranking::descending;

/// Number of upcoming fixtures that feed a club's indices.
pub const DEFAULT_FIXTURE_HORIZON: usize = 5;
/// Number of clubs on each preference list.
pub const DEFAULT_PREFERRED_CLUBS: usize = 7;

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Strength ratings of one club, as published by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubStrength {
    pub id: u32,
    pub name: String,
    pub overall: i32,
    pub overall_home: i32,
    pub overall_away: i32,
    pub attack_home: i32,
    pub attack_away: i32,
    pub defence_home: i32,
    pub defence_away: i32,
}

/// A scheduled match between two clubs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fixture {
    pub id: u32,
    /// Gameweek the fixture is scheduled in. `None` for postponed matches
    /// that have not been rescheduled yet.
    pub round: Option<u32>,
    pub finished: bool,
    pub home: u32,
    pub away: u32,
    pub home_difficulty: u8,
    pub away_difficulty: u8,
    pub kickoff_time: Option<DateTime<Utc>>,
}

impl Fixture {
    /// Not yet played and assigned to a gameweek.
    pub fn is_upcoming(&self) -> bool {
        !self.finished && self.round.is_some()
    }

    pub fn involves(&self, club_id: u32) -> bool {
        self.home == club_id || self.away == club_id
    }

    /// Difficulty rating of this fixture from `club_id`'s point of view.
    pub fn difficulty_for(&self, club_id: u32) -> Option<u8> {
        if self.away == club_id {
            Some(self.away_difficulty)
        } else if self.home == club_id {
            Some(self.home_difficulty)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Strength indices
// ---------------------------------------------------------------------------

/// Aggregated fixture outlook for one club. Higher is kinder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClubStrengthIndex {
    pub club_id: u32,
    pub name: String,
    pub offense: f64,
    pub defense: f64,
}

/// Compute offense/defense indices for every club in `clubs`.
///
/// Only upcoming fixtures count (see [`Fixture::is_upcoming`]), and at most
/// the first `horizon` of them per club, in the order given. Fixtures naming
/// a club missing from `clubs` are dropped before the horizon is applied.
///
/// For a home fixture the club gains `home defence − away attack` on defense
/// and `home attack − away defence` on offense. An away fixture subtracts the
/// home side's differentials with the roles swapped: the home attack edge
/// counts against the away defense, and the home defence edge against the
/// away offense.
///
/// The output preserves the order of `clubs`.
pub fn compute_strength_indices(
    clubs: &[ClubStrength],
    fixtures: &[Fixture],
    horizon: usize,
) -> Vec<ClubStrengthIndex> {
    let by_id: HashMap<u32, &ClubStrength> = clubs.iter().map(|c| (c.id, c)).collect();
    let upcoming: Vec<(&Fixture, &ClubStrength, &ClubStrength)> = fixtures
        .iter()
        .filter(|f| f.is_upcoming())
        .filter_map(|f| match (by_id.get(&f.home), by_id.get(&f.away)) {
            (Some(home), Some(away)) => Some((f, *home, *away)),
            _ => {
                warn!(
                    "fixture {} references an unknown club ({} vs {}), ignoring it",
                    f.id, f.home, f.away
                );
                None
            }
        })
        .collect();

    clubs
        .iter()
        .map(|club| {
            let mut offense = 0.0;
            let mut defense = 0.0;

            for (fixture, home, away) in upcoming
                .iter()
                .filter(|(f, _, _)| f.involves(club.id))
                .take(horizon)
            {
                let home_def_diff = (home.defence_home - away.attack_away) as f64;
                let home_att_diff = (home.attack_home - away.defence_away) as f64;

                if fixture.home == club.id {
                    defense += home_def_diff;
                    offense += home_att_diff;
                } else {
                    defense -= home_att_diff;
                    offense -= home_def_diff;
                }
            }

            ClubStrengthIndex {
                club_id: club.id,
                name: club.name.clone(),
                offense,
                defense,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Preference lists
// ---------------------------------------------------------------------------

/// The clubs whose players are worth picking for each profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClubPreferences {
    /// Top clubs by defense index, best first.
    pub defensive: Vec<String>,
    /// Top clubs by offense index, best first.
    pub offensive: Vec<String>,
}

impl ClubPreferences {
    /// Take the `size` best clubs by each index. Equal indices keep the
    /// order of `indices`.
    pub fn from_indices(indices: &[ClubStrengthIndex], size: usize) -> Self {
        Self {
            defensive: top_clubs_by(indices, size, |i| i.defense),
            offensive: top_clubs_by(indices, size, |i| i.offense),
        }
    }

    pub fn for_profile(&self, profile: Profile) -> &[String] {
        match profile {
            Profile::Defensive => &self.defensive,
            Profile::Offensive => &self.offensive,
        }
    }

    /// Whether `club` is on the preference list for `profile`.
    pub fn allows(&self, profile: Profile, club: &str) -> bool {
        self.for_profile(profile).iter().any(|c| c == club)
    }
}

fn top_clubs_by<F>(indices: &[ClubStrengthIndex], size: usize, key: F) -> Vec<String>
where
    F: Fn(&ClubStrengthIndex) -> f64,
{
    let mut sorted: Vec<&ClubStrengthIndex> = indices.iter().collect();
    sorted.sort_by(|a, b| descending(key(*a), key(*b)));
    sorted.into_iter().take(size).map(|i| i.name.clone()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
